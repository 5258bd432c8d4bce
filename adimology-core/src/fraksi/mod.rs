//! Fraksi arithmetic: counting tick-units over a price interval and
//! advancing a price by a number of tick-units.
//!
//! The two directions are kept apart because their boundary handling
//! differs: counting always integrates across every band, advancing only
//! crosses the boundaries its [`CrossingPolicy`] allows.

pub mod counter;
pub mod projector;

pub use counter::{count_ticks, BandTicks, TickBreakdown};
pub use projector::{advance, advance_with, CrossingPolicy, DEFAULT_CROSSING_POLICY};
