//! Adimology Runner: everything around the engine that is not arithmetic.
//!
//! This crate builds on `adimology-core` to provide:
//! - TOML application configuration
//! - Bounded calculation history persisted as JSON
//! - Memoized power calculations keyed by input
//! - CSV batch evaluation, optionally parallel

pub mod batch;
pub mod config;
pub mod history;
pub mod memo;

pub use batch::{
    evaluate_row, evaluate_rows, read_batch, read_batch_csv, summarize, write_batch,
    write_batch_csv, BatchError, BatchOutcome, BatchSummary, STATUS_OK,
};
pub use config::{AppConfig, BatchConfig, ConfigError, EngineConfig, HistoryConfig};
pub use history::{
    entry_id, CalculationHistory, HistoryEntry, HistoryError, HistoryStore,
    DEFAULT_HISTORY_CAPACITY,
};
pub use memo::{PowerMemo, DEFAULT_MEMO_CAPACITY};
