//! Broker power: how many ticks a buyer's volume can push the price.
//!
//! The order-book liquidity between ARB and ARA is spread evenly over the
//! tick-units in that range. A buyer's lot volume divided by the volume per
//! tick gives the power in ticks; advancing a +5% base price by half and by
//! all of that power gives the low and high targets.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::band::{Price, Ticks};
use crate::domain::input::{CalculationInput, RawCalculationInput};
use crate::fraksi::{advance_with, count_ticks, CrossingPolicy, TickBreakdown};
use crate::rounding::round_to_cents;

/// Multiplier applied to the average buy price to get the base target.
pub const BASE_TARGET_MULTIPLIER: f64 = 1.05;

/// Everything derived from one [`CalculationInput`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub total_bid_offer_volume: f64,
    pub tick_breakdown: TickBreakdown,
    /// Full precision; use [`avg_volume_per_tick_display`](Self::avg_volume_per_tick_display)
    /// for the two-decimal figure.
    pub avg_volume_per_tick: f64,
    pub power_in_ticks: Ticks,
    pub target_5pct_price: Price,
    pub target_low_price: Price,
    pub target_high_price: Price,
    pub pct_upside_low: f64,
    pub pct_upside_high: f64,
}

impl CalculationResult {
    pub fn avg_volume_per_tick_display(&self) -> f64 {
        round_to_cents(self.avg_volume_per_tick)
    }

    /// True when every derived figure is finite.
    pub fn is_finite(&self) -> bool {
        [
            self.total_bid_offer_volume,
            self.tick_breakdown.total,
            self.avg_volume_per_tick,
            self.power_in_ticks,
            self.target_5pct_price,
            self.target_low_price,
            self.target_high_price,
            self.pct_upside_low,
            self.pct_upside_high,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Why an input could not produce a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PowerRejection {
    #[error("buy lot volume must be positive")]
    InvalidLotVolume,

    #[error("buy average price must be positive")]
    InvalidAveragePrice,

    #[error("ARB..ARA range contains no ticks")]
    EmptyTickRange,

    #[error("total bid + offer volume must be positive")]
    NoLiquidity,

    #[error("inputs too large: a derived figure overflowed")]
    Overflow,
}

impl PowerRejection {
    /// Short machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidLotVolume => "invalid_lot_volume",
            Self::InvalidAveragePrice => "invalid_average_price",
            Self::EmptyTickRange => "empty_tick_range",
            Self::NoLiquidity => "no_liquidity",
            Self::Overflow => "overflow",
        }
    }
}

/// Power calculator parameterised by the projector's crossing policy.
///
/// Stateless; the default engine reproduces the calculator exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerEngine {
    pub crossing: CrossingPolicy,
}

impl PowerEngine {
    pub fn new(crossing: CrossingPolicy) -> Self {
        Self { crossing }
    }

    /// Compute a result, or `None` when the input is insufficient.
    pub fn compute(&self, input: &CalculationInput) -> Option<CalculationResult> {
        self.try_compute(input).ok()
    }

    /// Compute a result, reporting why an insufficient input was rejected.
    pub fn try_compute(
        &self,
        input: &CalculationInput,
    ) -> Result<CalculationResult, PowerRejection> {
        let input = input.sanitized();
        let outcome = self.evaluate(&input);
        if let Err(rejection) = &outcome {
            tracing::debug!(reason = rejection.code(), ?input, "power calculation rejected");
        }
        outcome
    }

    /// Coerce raw operator text and compute.
    pub fn compute_raw(&self, raw: &RawCalculationInput) -> Option<CalculationResult> {
        self.compute(&CalculationInput::from_raw(raw))
    }

    fn evaluate(&self, input: &CalculationInput) -> Result<CalculationResult, PowerRejection> {
        if input.buy_lot_volume <= 0.0 {
            return Err(PowerRejection::InvalidLotVolume);
        }
        if input.buy_average_price <= 0.0 {
            return Err(PowerRejection::InvalidAveragePrice);
        }

        let total_bid_offer_volume = input.total_bid_volume + input.total_offer_volume;
        let tick_breakdown = count_ticks(input.lower_bound_price, input.upper_bound_price);

        if tick_breakdown.total <= 0.0 {
            return Err(PowerRejection::EmptyTickRange);
        }
        if total_bid_offer_volume <= 0.0 {
            return Err(PowerRejection::NoLiquidity);
        }

        let avg_volume_per_tick = total_bid_offer_volume / tick_breakdown.total;
        let power_in_ticks = (input.buy_lot_volume / avg_volume_per_tick).floor();

        let target_5pct_price = (input.buy_average_price * BASE_TARGET_MULTIPLIER).floor();
        let target_low_price =
            advance_with(self.crossing, target_5pct_price, (power_in_ticks / 2.0).floor());
        let target_high_price = advance_with(self.crossing, target_5pct_price, power_in_ticks);

        let upside = |target: Price| {
            round_to_cents((target - input.buy_average_price) / input.buy_average_price * 100.0)
        };

        let result = CalculationResult {
            total_bid_offer_volume,
            tick_breakdown,
            avg_volume_per_tick,
            power_in_ticks,
            target_5pct_price,
            target_low_price,
            target_high_price,
            pct_upside_low: upside(target_low_price),
            pct_upside_high: upside(target_high_price),
        };
        if !result.is_finite() {
            return Err(PowerRejection::Overflow);
        }
        Ok(result)
    }
}

/// Compute with the default engine.
pub fn compute_power(input: &CalculationInput) -> Option<CalculationResult> {
    PowerEngine::default().compute(input)
}

/// Compute with the default engine, reporting the rejection reason.
pub fn try_compute_power(input: &CalculationInput) -> Result<CalculationResult, PowerRejection> {
    PowerEngine::default().try_compute(input)
}
