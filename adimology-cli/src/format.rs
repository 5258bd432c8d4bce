//! Indonesian-style number formatting for terminal output.
//!
//! Thousands are grouped with `.` and decimals follow a `,`, as on IDX
//! broker screens: `18.145,29`.

/// Format `value` with `decimals` decimal places and grouped thousands.
pub fn format_number(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    if let Some(frac_part) = frac_part {
        out.push(',');
        out.push_str(frac_part);
    }
    out
}

/// Whole prices print without decimals, anything else with two.
pub fn format_rupiah(price: f64) -> String {
    let decimals = if price.fract() == 0.0 { 0 } else { 2 };
    format!("Rp {}", format_number(price, decimals))
}

/// Volumes and tick counts: whole numbers plain, fractions to two places.
pub fn format_quantity(value: f64) -> String {
    let decimals = if value.fract() == 0.0 { 0 } else { 2 };
    format_number(value, decimals)
}

pub fn format_pct(value: f64) -> String {
    format!("{}%", format_number(value, 2))
}
