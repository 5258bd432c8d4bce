//! Calculator inputs and operator-text coercion.

use serde::{Deserialize, Serialize};

use super::band::Price;

/// The six scalar inputs of a broker power calculation.
///
/// Volumes are in lots. Every field is expected to be non-negative; values
/// that fail coercion are carried as `0.0` so the engine rejects them
/// instead of propagating NaN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationInput {
    pub buy_lot_volume: f64,
    pub buy_average_price: Price,
    /// Auto-reject lower bound (ARB).
    pub lower_bound_price: Price,
    /// Auto-reject upper bound (ARA).
    pub upper_bound_price: Price,
    pub total_bid_volume: f64,
    pub total_offer_volume: f64,
}

impl CalculationInput {
    pub fn new(
        buy_lot_volume: f64,
        buy_average_price: Price,
        lower_bound_price: Price,
        upper_bound_price: Price,
        total_bid_volume: f64,
        total_offer_volume: f64,
    ) -> Self {
        Self {
            buy_lot_volume,
            buy_average_price,
            lower_bound_price,
            upper_bound_price,
            total_bid_volume,
            total_offer_volume,
        }
    }

    /// Coerce operator-entered text into numbers. See [`coerce_number`].
    pub fn from_raw(raw: &RawCalculationInput) -> Self {
        Self {
            buy_lot_volume: coerce_number(&raw.buy_lot_volume),
            buy_average_price: coerce_number(&raw.buy_average_price),
            lower_bound_price: coerce_number(&raw.lower_bound_price),
            upper_bound_price: coerce_number(&raw.upper_bound_price),
            total_bid_volume: coerce_number(&raw.total_bid_volume),
            total_offer_volume: coerce_number(&raw.total_offer_volume),
        }
    }

    /// Replace any non-finite field with `0.0`.
    pub fn sanitized(self) -> Self {
        Self {
            buy_lot_volume: finite_or_zero(self.buy_lot_volume),
            buy_average_price: finite_or_zero(self.buy_average_price),
            lower_bound_price: finite_or_zero(self.lower_bound_price),
            upper_bound_price: finite_or_zero(self.upper_bound_price),
            total_bid_volume: finite_or_zero(self.total_bid_volume),
            total_offer_volume: finite_or_zero(self.total_offer_volume),
        }
    }

    /// The six fields in declaration order.
    pub fn as_array(&self) -> [f64; 6] {
        [
            self.buy_lot_volume,
            self.buy_average_price,
            self.lower_bound_price,
            self.upper_bound_price,
            self.total_bid_volume,
            self.total_offer_volume,
        ]
    }
}

/// Calculator inputs exactly as typed, before coercion.
///
/// Missing fields deserialize as empty strings, which coerce to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCalculationInput {
    pub buy_lot_volume: String,
    pub buy_average_price: String,
    pub lower_bound_price: String,
    pub upper_bound_price: String,
    pub total_bid_volume: String,
    pub total_offer_volume: String,
}

impl From<&RawCalculationInput> for CalculationInput {
    fn from(raw: &RawCalculationInput) -> Self {
        Self::from_raw(raw)
    }
}

/// Parse operator text as a number.
///
/// Surrounding whitespace is ignored and empty text is zero. Anything that
/// does not parse, or parses to a non-finite value, is also zero.
pub fn coerce_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().map(finite_or_zero).unwrap_or(0.0)
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_plain_numbers() {
        assert_eq!(coerce_number("1250"), 1250.0);
        assert_eq!(coerce_number("  191 "), 191.0);
        assert_eq!(coerce_number("1e3"), 1000.0);
        assert_eq!(coerce_number("12.5"), 12.5);
    }

    #[test]
    fn coerce_invalid_text_is_zero() {
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("   "), 0.0);
        assert_eq!(coerce_number("abc"), 0.0);
        assert_eq!(coerce_number("1,250"), 0.0);
        assert_eq!(coerce_number("NaN"), 0.0);
        assert_eq!(coerce_number("inf"), 0.0);
    }

    #[test]
    fn from_raw_coerces_every_field() {
        let raw = RawCalculationInput {
            buy_lot_volume: "100000".into(),
            buy_average_price: "1250".into(),
            lower_bound_price: "191".into(),
            upper_bound_price: "280".into(),
            total_bid_volume: "oops".into(),
            total_offer_volume: String::new(),
        };
        let input = CalculationInput::from_raw(&raw);
        assert_eq!(input, CalculationInput::new(100_000.0, 1250.0, 191.0, 280.0, 0.0, 0.0));
    }

    #[test]
    fn sanitized_zeroes_non_finite_fields() {
        let input = CalculationInput::new(f64::NAN, 1250.0, f64::INFINITY, 280.0, 1.0, 2.0);
        let clean = input.sanitized();
        assert_eq!(clean.buy_lot_volume, 0.0);
        assert_eq!(clean.lower_bound_price, 0.0);
        assert_eq!(clean.buy_average_price, 1250.0);
    }
}
