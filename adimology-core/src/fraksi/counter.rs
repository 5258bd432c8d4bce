//! Tick counting: integrate the inverse tick size over a price interval.

use serde::{Deserialize, Serialize};

use crate::domain::band::{Price, PriceBand, Ticks, BAND_COUNT, BAND_TABLE};

/// Tick-units contributed by one band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandTicks {
    /// Index into [`BAND_TABLE`].
    pub band: usize,
    pub tick_size: Ticks,
    pub count: Ticks,
}

impl BandTicks {
    pub fn price_band(&self) -> &'static PriceBand {
        &BAND_TABLE[self.band.min(BAND_COUNT - 1)]
    }
}

/// Per-band tick counts for a price interval, plus their sum.
///
/// `per_band` always lists every band in ascending order. Counts are
/// fractional whenever an interval edge falls between ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickBreakdown {
    pub per_band: Vec<BandTicks>,
    pub total: Ticks,
}

impl TickBreakdown {
    /// Every band present with a zero count.
    pub fn zero() -> Self {
        Self::from_counts([0.0; BAND_COUNT])
    }

    fn from_counts(counts: [Ticks; BAND_COUNT]) -> Self {
        let per_band: Vec<BandTicks> = BAND_TABLE
            .iter()
            .zip(counts)
            .enumerate()
            .map(|(band, (price_band, count))| BandTicks {
                band,
                tick_size: price_band.tick_size,
                count,
            })
            .collect();
        let total = per_band.iter().map(|b| b.count).sum();
        Self { per_band, total }
    }

    /// Bands that actually contribute ticks.
    pub fn touched(&self) -> impl Iterator<Item = &BandTicks> {
        self.per_band.iter().filter(|b| b.count > 0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.total <= 0.0
    }
}

/// Count the tick-units separating `lower_price` from `upper_price`.
///
/// Each band contributes the length of its overlap with
/// `[lower_price, upper_price)` divided by its tick size. A band is only
/// considered once `upper_price` reaches past its lower bound. Degenerate or
/// inverted intervals, and non-positive prices, give an all-zero breakdown.
pub fn count_ticks(lower_price: Price, upper_price: Price) -> TickBreakdown {
    // Negated comparisons so NaN also takes the zero path.
    if !(lower_price > 0.0) || !(upper_price > 0.0) || !(upper_price > lower_price) {
        return TickBreakdown::zero();
    }

    let mut counts = [0.0; BAND_COUNT];
    for (count, band) in counts.iter_mut().zip(BAND_TABLE.iter()) {
        if upper_price > band.lower_bound {
            let overlap =
                band.upper_bound.min(upper_price) - band.lower_bound.max(lower_price);
            *count = overlap.max(0.0) / band.tick_size;
        }
    }

    TickBreakdown::from_counts(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(breakdown: &TickBreakdown) -> Vec<f64> {
        breakdown.per_band.iter().map(|b| b.count).collect()
    }

    #[test]
    fn crosses_first_boundary() {
        let breakdown = count_ticks(100.0, 300.0);
        assert_eq!(counts(&breakdown), vec![100.0, 50.0, 0.0, 0.0, 0.0]);
        assert_eq!(breakdown.total, 150.0);
    }

    #[test]
    fn arb_ara_example() {
        let breakdown = count_ticks(191.0, 280.0);
        assert_eq!(counts(&breakdown), vec![9.0, 40.0, 0.0, 0.0, 0.0]);
        assert_eq!(breakdown.total, 49.0);
    }

    #[test]
    fn spans_every_band() {
        let breakdown = count_ticks(100.0, 6_000.0);
        // 100 + 150 + 300 + 300 + 40
        assert_eq!(counts(&breakdown), vec![100.0, 150.0, 300.0, 300.0, 40.0]);
        assert_eq!(breakdown.total, 890.0);
    }

    #[test]
    fn within_single_high_band() {
        let breakdown = count_ticks(1_000.0, 1_250.0);
        assert_eq!(breakdown.total, 50.0);
        assert_eq!(breakdown.touched().count(), 1);
    }

    #[test]
    fn fractional_counts() {
        let breakdown = count_ticks(199.5, 201.0);
        assert_eq!(counts(&breakdown), vec![0.5, 0.5, 0.0, 0.0, 0.0]);
        assert_eq!(breakdown.total, 1.0);
    }

    #[test]
    fn degenerate_intervals_are_zero() {
        assert_eq!(count_ticks(250.0, 250.0), TickBreakdown::zero());
        assert_eq!(count_ticks(280.0, 191.0), TickBreakdown::zero());
        assert_eq!(count_ticks(0.0, 280.0), TickBreakdown::zero());
        assert_eq!(count_ticks(-5.0, 280.0), TickBreakdown::zero());
        assert_eq!(count_ticks(f64::NAN, 280.0), TickBreakdown::zero());
    }

    #[test]
    fn zero_breakdown_lists_every_band() {
        let zero = TickBreakdown::zero();
        assert_eq!(zero.per_band.len(), BAND_COUNT);
        assert!(zero.is_empty());
        assert_eq!(zero.per_band[4].price_band().tick_size, 25.0);
    }
}
