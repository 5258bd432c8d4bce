//! Domain types for the Fraksi engine

pub mod band;
pub mod input;

pub use band::{band_at, bands, tick_size_at, Price, PriceBand, Ticks, BAND_COUNT, BAND_TABLE};
pub use input::{coerce_number, CalculationInput, RawCalculationInput};
