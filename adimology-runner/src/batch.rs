//! CSV batch evaluation of many order-book snapshots.
//!
//! Input rows carry the six calculator fields as text and are coerced the
//! same way operator input is. Each output row repeats the coerced input,
//! a `status` column (`ok` or a rejection code) and the result columns,
//! which are empty for rejected rows.

use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;

use adimology_core::{CalculationInput, PowerEngine, RawCalculationInput};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const STATUS_OK: &str = "ok";

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One evaluated row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub buy_lot_volume: f64,
    pub buy_average_price: f64,
    pub lower_bound_price: f64,
    pub upper_bound_price: f64,
    pub total_bid_volume: f64,
    pub total_offer_volume: f64,
    pub status: String,
    pub total_bid_offer_volume: Option<f64>,
    pub tick_total: Option<f64>,
    pub avg_volume_per_tick: Option<f64>,
    pub power_in_ticks: Option<f64>,
    pub target_5pct_price: Option<f64>,
    pub target_low_price: Option<f64>,
    pub target_high_price: Option<f64>,
    pub pct_upside_low: Option<f64>,
    pub pct_upside_high: Option<f64>,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    fn rejected(input: CalculationInput, status: &str) -> Self {
        Self {
            buy_lot_volume: input.buy_lot_volume,
            buy_average_price: input.buy_average_price,
            lower_bound_price: input.lower_bound_price,
            upper_bound_price: input.upper_bound_price,
            total_bid_volume: input.total_bid_volume,
            total_offer_volume: input.total_offer_volume,
            status: status.to_string(),
            total_bid_offer_volume: None,
            tick_total: None,
            avg_volume_per_tick: None,
            power_in_ticks: None,
            target_5pct_price: None,
            target_low_price: None,
            target_high_price: None,
            pct_upside_low: None,
            pct_upside_high: None,
        }
    }
}

/// Evaluate one raw row.
pub fn evaluate_row(engine: &PowerEngine, raw: &RawCalculationInput) -> BatchOutcome {
    let input = CalculationInput::from_raw(raw);
    match engine.try_compute(&input) {
        Ok(result) => BatchOutcome {
            status: STATUS_OK.to_string(),
            total_bid_offer_volume: Some(result.total_bid_offer_volume),
            tick_total: Some(result.tick_breakdown.total),
            avg_volume_per_tick: Some(result.avg_volume_per_tick_display()),
            power_in_ticks: Some(result.power_in_ticks),
            target_5pct_price: Some(result.target_5pct_price),
            target_low_price: Some(result.target_low_price),
            target_high_price: Some(result.target_high_price),
            pct_upside_low: Some(result.pct_upside_low),
            pct_upside_high: Some(result.pct_upside_high),
            ..BatchOutcome::rejected(input, STATUS_OK)
        },
        Err(rejection) => BatchOutcome::rejected(input, rejection.code()),
    }
}

/// Evaluate rows in input order, fanning out over rayon when `parallel`.
pub fn evaluate_rows(
    engine: &PowerEngine,
    rows: &[RawCalculationInput],
    parallel: bool,
) -> Vec<BatchOutcome> {
    if parallel {
        rows.par_iter().map(|raw| evaluate_row(engine, raw)).collect()
    } else {
        rows.iter().map(|raw| evaluate_row(engine, raw)).collect()
    }
}

/// Read raw rows from CSV with a header line. Missing columns are blank.
pub fn read_batch<R: Read>(reader: R) -> Result<Vec<RawCalculationInput>, BatchError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let rows = reader
        .deserialize::<RawCalculationInput>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn read_batch_csv(path: &Path) -> Result<Vec<RawCalculationInput>, BatchError> {
    let file = std::fs::File::open(path)?;
    read_batch(file)
}

/// Write outcomes as CSV with a header line.
pub fn write_batch<W: Write>(writer: W, outcomes: &[BatchOutcome]) -> Result<(), BatchError> {
    let mut writer = csv::Writer::from_writer(writer);
    for outcome in outcomes {
        writer.serialize(outcome)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_batch_csv(path: &Path, outcomes: &[BatchOutcome]) -> Result<(), BatchError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = std::fs::File::create(path)?;
    write_batch(file, outcomes)
}

/// Row counts by status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub ok: usize,
    pub rejected: BTreeMap<String, usize>,
}

pub fn summarize(outcomes: &[BatchOutcome]) -> BatchSummary {
    let mut summary = BatchSummary {
        total: outcomes.len(),
        ..BatchSummary::default()
    };
    for outcome in outcomes {
        if outcome.is_ok() {
            summary.ok += 1;
        } else {
            *summary.rejected.entry(outcome.status.clone()).or_insert(0) += 1;
        }
    }
    summary
}
