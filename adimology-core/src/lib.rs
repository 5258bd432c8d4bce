//! Adimology Core: the Fraksi (tick-size) power engine.
//!
//! This crate contains the pure arithmetic behind the broker power calculator:
//! - Exchange tick-size band table
//! - Tick counting across band boundaries (price interval to tick-units)
//! - Target projection (price plus tick-units to price)
//! - Power engine combining both with order-book liquidity
//!
//! Nothing here does I/O or holds state between calls.

pub mod domain;
pub mod fraksi;
pub mod power;
pub mod rounding;

pub use domain::{
    band_at, bands, coerce_number, tick_size_at, CalculationInput, Price, PriceBand,
    RawCalculationInput, Ticks, BAND_COUNT, BAND_TABLE,
};
pub use fraksi::{
    advance, advance_with, count_ticks, BandTicks, CrossingPolicy, TickBreakdown,
    DEFAULT_CROSSING_POLICY,
};
pub use power::{
    compute_power, try_compute_power, CalculationResult, PowerEngine, PowerRejection,
    BASE_TARGET_MULTIPLIER,
};
