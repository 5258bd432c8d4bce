//! Tick-size bands: the exchange's piecewise price increment table.

/// A price in rupiah.
pub type Price = f64;

/// A tick size (or a count of tick-units, depending on context).
pub type Ticks = f64;

/// One tick-size regime: prices in `[lower_bound, upper_bound)` move in
/// increments of `tick_size`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBand {
    pub lower_bound: Price,
    pub upper_bound: Price,
    pub tick_size: Ticks,
    pub label: &'static str,
}

impl PriceBand {
    /// Half-open membership test: the upper bound belongs to the next band.
    pub fn contains(&self, price: Price) -> bool {
        price >= self.lower_bound && price < self.upper_bound
    }

    /// True for the final, unbounded band.
    pub fn is_unbounded(&self) -> bool {
        self.upper_bound.is_infinite()
    }
}

/// Number of tick-size bands.
pub const BAND_COUNT: usize = 5;

/// Exchange tick-size table, sorted ascending by lower bound.
///
/// Bands are contiguous and non-overlapping; the last one is unbounded.
pub static BAND_TABLE: [PriceBand; BAND_COUNT] = [
    PriceBand { lower_bound: 0.0, upper_bound: 200.0, tick_size: 1.0, label: "< 200" },
    PriceBand { lower_bound: 200.0, upper_bound: 500.0, tick_size: 2.0, label: "200 - 500" },
    PriceBand { lower_bound: 500.0, upper_bound: 2_000.0, tick_size: 5.0, label: "500 - 2000" },
    PriceBand { lower_bound: 2_000.0, upper_bound: 5_000.0, tick_size: 10.0, label: "2000 - 5000" },
    PriceBand {
        lower_bound: 5_000.0,
        upper_bound: f64::INFINITY,
        tick_size: 25.0,
        label: ">= 5000",
    },
];

/// The full band table.
pub fn bands() -> &'static [PriceBand] {
    &BAND_TABLE
}

/// Band governing `price`.
///
/// Scans ascending and picks the first band whose upper bound lies above
/// `price`, so boundary prices land in the upper band. Falls back to the last
/// band for anything the scan misses (NaN).
pub fn band_at(price: Price) -> &'static PriceBand {
    BAND_TABLE
        .iter()
        .find(|band| price < band.upper_bound)
        .unwrap_or(&BAND_TABLE[BAND_COUNT - 1])
}

/// Tick size in force at `price`.
pub fn tick_size_at(price: Price) -> Ticks {
    band_at(price).tick_size
}
