//! Target projection: advance a price by a number of tick-units.
//!
//! This is the inverse of [`count_ticks`](super::count_ticks). The calculator
//! has always crossed only the 200 boundary (tick 1 to tick 2). An advance
//! that starts at 500 or above keeps its starting tick size for the whole
//! move, even when the result lands in a coarser band. That behavior is
//! kept as [`CrossingPolicy::FineBandsOnly`] and is the default; the
//! band-walking variant is available as an explicit opt-in.

use serde::{Deserialize, Serialize};

use crate::domain::band::{band_at, tick_size_at, Price, Ticks, BAND_TABLE};
use crate::rounding::round_to_multiple;

/// How band boundaries are handled while advancing a price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossingPolicy {
    /// Cross from the tick-1 band into the tick-2 band only. Starts at or
    /// above 500 advance at their own tick size without crossing.
    #[default]
    FineBandsOnly,
    /// Walk band by band, crossing every boundary on the way. A result that
    /// crossed a boundary, or that lands in the tick-2 band, is snapped onto
    /// its band's tick grid. An off-grid start that stays inside a coarser
    /// band keeps its offset, as it does under `FineBandsOnly`.
    AllBands,
}

/// Policy used by [`advance`]. Changing this switches every caller that
/// does not pick a policy explicitly.
pub const DEFAULT_CROSSING_POLICY: CrossingPolicy = CrossingPolicy::FineBandsOnly;

/// Advance `start_price` by `tick_count` ticks under the default policy.
pub fn advance(start_price: Price, tick_count: Ticks) -> Price {
    advance_with(DEFAULT_CROSSING_POLICY, start_price, tick_count)
}

/// Advance `start_price` by `tick_count` ticks under `policy`.
///
/// Non-positive tick counts or start prices return `start_price` unchanged.
pub fn advance_with(policy: CrossingPolicy, start_price: Price, tick_count: Ticks) -> Price {
    if !(tick_count > 0.0) || !(start_price > 0.0) {
        return start_price;
    }
    match policy {
        CrossingPolicy::FineBandsOnly => advance_fine_bands(start_price, tick_count),
        CrossingPolicy::AllBands => advance_all_bands(start_price, tick_count),
    }
}

/// Remaining ticks after the 200 boundary are all priced at tick 2, even
/// when the result passes 500: `advance(490, 20)` is 530, not 575. The
/// band-walking answer is [`CrossingPolicy::AllBands`].
fn advance_fine_bands(start_price: Price, tick_count: Ticks) -> Price {
    let first = &BAND_TABLE[0];
    let second = &BAND_TABLE[1];

    if start_price >= second.upper_bound {
        // No crossing above 500: the starting tick applies to the whole move.
        return start_price + tick_count * tick_size_at(start_price);
    }

    let mut price = start_price;
    let mut remaining = tick_count;
    if price < first.upper_bound {
        let room = (first.upper_bound - price) / first.tick_size;
        let used = remaining.min(room);
        price += used * first.tick_size;
        remaining -= used;
    }

    let raw = price + remaining * second.tick_size;
    if raw < first.upper_bound {
        raw
    } else {
        round_to_multiple(raw, second.tick_size)
    }
}

fn advance_all_bands(start_price: Price, tick_count: Ticks) -> Price {
    let mut price = start_price;
    let mut remaining = tick_count;
    let mut crossed = false;

    while remaining > 0.0 {
        let band = band_at(price);
        if band.is_unbounded() {
            price += remaining * band.tick_size;
            break;
        }
        let room = (band.upper_bound - price) / band.tick_size;
        if remaining < room {
            price += remaining * band.tick_size;
            break;
        }
        price = band.upper_bound;
        remaining -= room;
        crossed = true;
    }

    let landing = band_at(price);
    if crossed || *landing == BAND_TABLE[1] {
        round_to_multiple(price, landing.tick_size)
    } else {
        price
    }
}
