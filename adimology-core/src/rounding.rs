//! Rounding helpers shared by the projector and the power engine.
//!
//! Rounding is half-up (`floor(x + 0.5)`) everywhere, so `-2.5` rounds to
//! `-2.0` rather than away from zero as `f64::round` would.

/// Round to the nearest integer, ties upward.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round to the nearest multiple of `step`, ties upward.
pub fn round_to_multiple(value: f64, step: f64) -> f64 {
    round_half_up(value / step) * step
}

/// Round to two decimal places, ties upward.
pub fn round_to_cents(value: f64) -> f64 {
    round_half_up(value * 100.0) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_up_ties() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(2.49), 2.0);
    }

    #[test]
    fn multiples_of_two() {
        assert_eq!(round_to_multiple(219.0, 2.0), 220.0);
        assert_eq!(round_to_multiple(221.0, 2.0), 222.0);
        assert_eq!(round_to_multiple(220.9, 2.0), 220.0);
    }

    #[test]
    fn cents() {
        assert_eq!(round_to_cents(5.764), 5.76);
        assert_eq!(round_to_cents(18_145.285_714), 18_145.29);
    }
}
