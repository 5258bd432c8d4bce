//! Adimology CLI: broker power calculator and Fraksi tools.
//!
//! Commands:
//! - `calc`: power and target prices for one order-book snapshot
//! - `bands`: print the tick-size table
//! - `ticks`: tick-units between two prices, band by band
//! - `target`: advance a price by a number of ticks
//! - `batch`: evaluate a CSV of snapshots
//! - `history`: list, show, delete or clear committed calculations

mod format;

use std::path::{Path, PathBuf};

use adimology_core::{
    advance_with, bands, count_ticks, CalculationInput, CalculationResult, CrossingPolicy,
    PowerEngine, RawCalculationInput, TickBreakdown,
};
use adimology_runner::{
    evaluate_rows, read_batch_csv, summarize, write_batch_csv, AppConfig, HistoryEntry,
    HistoryStore,
};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::format::{format_number, format_pct, format_quantity, format_rupiah};

#[derive(Parser)]
#[command(
    name = "adimology",
    about = "Adimology: broker power and Fraksi target calculator"
)]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute broker power and target prices.
    Calc {
        #[command(flatten)]
        input: CalcArgs,

        /// Print the result as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Commit the calculation to history.
        #[arg(long, default_value_t = false)]
        save: bool,

        /// Cross every band boundary when projecting targets.
        #[arg(long, default_value_t = false)]
        all_bands: bool,
    },
    /// Print the tick-size band table.
    Bands,
    /// Count tick-units between two prices.
    Ticks {
        lower: f64,
        upper: f64,

        /// Print the breakdown as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Advance a price by a number of ticks.
    Target {
        price: f64,
        ticks: f64,

        /// Cross every band boundary on the way.
        #[arg(long, default_value_t = false)]
        all_bands: bool,
    },
    /// Evaluate a CSV of snapshots and write the results as CSV.
    Batch {
        /// Input CSV with one snapshot per row.
        #[arg(long)]
        input: PathBuf,

        /// Output CSV.
        #[arg(long)]
        output: PathBuf,

        /// Evaluate rows on a single thread.
        #[arg(long, default_value_t = false)]
        sequential: bool,

        /// Cross every band boundary when projecting targets.
        #[arg(long, default_value_t = false)]
        all_bands: bool,
    },
    /// Committed calculation history.
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

/// Calculator fields, taken as text and coerced like form input.
#[derive(Args)]
struct CalcArgs {
    /// Broker buy volume, in lots.
    #[arg(long, default_value = "")]
    lot: String,

    /// Broker average buy price.
    #[arg(long, default_value = "")]
    avg: String,

    /// Auto-reject lower bound (ARB).
    #[arg(long, default_value = "")]
    arb: String,

    /// Auto-reject upper bound (ARA).
    #[arg(long, default_value = "")]
    ara: String,

    /// Total bid volume, in lots.
    #[arg(long, default_value = "")]
    bid: String,

    /// Total offer volume, in lots.
    #[arg(long, default_value = "")]
    offer: String,
}

impl From<CalcArgs> for RawCalculationInput {
    fn from(args: CalcArgs) -> Self {
        Self {
            buy_lot_volume: args.lot,
            buy_average_price: args.avg,
            lower_bound_price: args.arb,
            upper_bound_price: args.ara,
            total_bid_volume: args.bid,
            total_offer_volume: args.offer,
        }
    }
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List entries, newest first.
    List {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show one entry in full.
    Show { id: String },
    /// Delete one entry.
    Delete { id: String },
    /// Delete every entry.
    Clear {
        /// Actually delete (without this flag, only reports what would be removed).
        #[arg(long, default_value_t = false)]
        confirm: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AppConfig::default(),
    };
    init_tracing(&config.log_level);
    tracing::debug!(config = ?cli.config, "configuration loaded");

    match cli.command {
        Commands::Calc {
            input,
            json,
            save,
            all_bands,
        } => run_calc(&config, input.into(), json, save, all_bands),
        Commands::Bands => {
            print_bands();
            Ok(())
        }
        Commands::Ticks { lower, upper, json } => run_ticks(lower, upper, json),
        Commands::Target {
            price,
            ticks,
            all_bands,
        } => {
            let policy = crossing_policy(&config, all_bands);
            let target = advance_with(policy, price, ticks);
            println!("{}", format_rupiah(target));
            Ok(())
        }
        Commands::Batch {
            input,
            output,
            sequential,
            all_bands,
        } => run_batch(&config, &input, &output, sequential, all_bands),
        Commands::History { action } => run_history(&config, action),
    }
}

/// `RUST_LOG` wins; otherwise the configured level. Logs go to stderr so
/// stdout carries only results.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn crossing_policy(config: &AppConfig, all_bands: bool) -> CrossingPolicy {
    if all_bands {
        CrossingPolicy::AllBands
    } else {
        config.engine.crossing
    }
}

fn history_store(config: &AppConfig) -> HistoryStore {
    let path = config.history.path.clone().unwrap_or_else(default_history_path);
    HistoryStore::new(path, config.history.capacity)
}

fn default_history_path() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("adimology").join("history.json"),
        None => PathBuf::from("adimology-history.json"),
    }
}

fn run_calc(
    config: &AppConfig,
    raw: RawCalculationInput,
    json: bool,
    save: bool,
    all_bands: bool,
) -> Result<()> {
    let engine = PowerEngine::new(crossing_policy(config, all_bands));
    let input = CalculationInput::from_raw(&raw);

    let result = match engine.try_compute(&input) {
        Ok(result) => result,
        Err(rejection) => bail!("insufficient data to calculate: {rejection}"),
    };

    if json {
        let payload = serde_json::json!({ "input": input, "result": result });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print_result(&input, &result);
    }

    if save {
        let store = history_store(config);
        let entry = store
            .commit(input, result)
            .with_context(|| format!("failed to save history to {}", store.path().display()))?;
        tracing::info!(id = %entry.id, "calculation saved");
        if !json {
            println!();
            println!("Saved as {} in {}", entry.id, store.path().display());
        }
    }

    Ok(())
}

fn print_result(input: &CalculationInput, result: &CalculationResult) {
    println!(
        "{:<24} {} lot @ {}",
        "Broker buy",
        format_quantity(input.buy_lot_volume),
        format_rupiah(input.buy_average_price)
    );
    println!(
        "{:<24} {} - {}",
        "ARB - ARA",
        format_rupiah(input.lower_bound_price),
        format_rupiah(input.upper_bound_price)
    );
    println!(
        "{:<24} {} lot",
        "Total bid + offer",
        format_quantity(result.total_bid_offer_volume)
    );
    println!();
    print_breakdown(&result.tick_breakdown);
    println!();
    println!(
        "{:<24} {} lot",
        "Avg volume per tick",
        format_number(result.avg_volume_per_tick_display(), 2)
    );
    println!("{:<24} {} ticks", "Power", format_quantity(result.power_in_ticks));
    println!("{:<24} {}", "Target +5%", format_rupiah(result.target_5pct_price));
    println!(
        "{:<24} {}  (+{})",
        "Target low (1/2 power)",
        format_rupiah(result.target_low_price),
        format_pct(result.pct_upside_low)
    );
    println!(
        "{:<24} {}  (+{})",
        "Target high (power)",
        format_rupiah(result.target_high_price),
        format_pct(result.pct_upside_high)
    );
}

fn print_breakdown(breakdown: &TickBreakdown) {
    println!("{:<14} {:>6} {:>12}", "Band", "Tick", "Ticks");
    println!("{}", "-".repeat(34));
    for band in breakdown.touched() {
        println!(
            "{:<14} {:>6} {:>12}",
            band.price_band().label,
            format_quantity(band.tick_size),
            format_quantity(band.count)
        );
    }
    println!("{}", "-".repeat(34));
    println!("{:<14} {:>6} {:>12}", "Total", "", format_quantity(breakdown.total));
}

fn print_bands() {
    println!("{:<14} {:>10} {:>10} {:>6}", "Band", "From", "To", "Tick");
    println!("{}", "-".repeat(43));
    for band in bands() {
        let upper = if band.is_unbounded() {
            "-".to_string()
        } else {
            format_quantity(band.upper_bound)
        };
        println!(
            "{:<14} {:>10} {:>10} {:>6}",
            band.label,
            format_quantity(band.lower_bound),
            upper,
            format_quantity(band.tick_size)
        );
    }
}

fn run_ticks(lower: f64, upper: f64, json: bool) -> Result<()> {
    let breakdown = count_ticks(lower, upper);
    if json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
    } else {
        print_breakdown(&breakdown);
    }
    Ok(())
}

fn run_batch(
    config: &AppConfig,
    input: &Path,
    output: &Path,
    sequential: bool,
    all_bands: bool,
) -> Result<()> {
    let rows = read_batch_csv(input)
        .with_context(|| format!("failed to read batch input {}", input.display()))?;
    let engine = PowerEngine::new(crossing_policy(config, all_bands));
    let parallel = config.batch.parallel && !sequential;

    tracing::info!(rows = rows.len(), parallel, "evaluating batch");
    let outcomes = evaluate_rows(&engine, &rows, parallel);
    write_batch_csv(output, &outcomes)
        .with_context(|| format!("failed to write batch output {}", output.display()))?;

    let summary = summarize(&outcomes);
    println!("Rows: {}", summary.total);
    println!("OK: {}", summary.ok);
    for (status, count) in &summary.rejected {
        println!("Rejected ({status}): {count}");
    }
    println!("Results saved to: {}", output.display());
    Ok(())
}

fn run_history(config: &AppConfig, action: HistoryAction) -> Result<()> {
    let store = history_store(config);
    let location = store.path().display().to_string();

    match action {
        HistoryAction::List { json } => {
            let history = store
                .load()
                .with_context(|| format!("failed to load history {location}"))?;
            if json {
                let entries: Vec<&HistoryEntry> = history.newest_first().collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }
            if history.is_empty() {
                println!("History is empty: {location}");
                return Ok(());
            }
            println!(
                "{:<16}  {:<19}  {:>12}  {:>12}  {:>12}",
                "ID", "Saved (UTC)", "Avg", "Target low", "Target high"
            );
            println!("{}", "-".repeat(79));
            for entry in history.newest_first() {
                println!(
                    "{:<16}  {:<19}  {:>12}  {:>12}  {:>12}",
                    entry.id,
                    entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    format_rupiah(entry.input.buy_average_price),
                    format_rupiah(entry.result.target_low_price),
                    format_rupiah(entry.result.target_high_price),
                );
            }
            println!();
            println!("{} of {} entries", history.len(), history.capacity());
        }
        HistoryAction::Show { id } => {
            let history = store
                .load()
                .with_context(|| format!("failed to load history {location}"))?;
            let Some(entry) = history.get(&id) else {
                bail!("no history entry with id {id}");
            };
            println!("{:<24} {}", "ID", entry.id);
            println!("{:<24} {}", "Saved (UTC)", entry.timestamp.format("%Y-%m-%d %H:%M:%S"));
            println!();
            print_result(&entry.input, &entry.result);
        }
        HistoryAction::Delete { id } => {
            let removed = store.delete(&id)?;
            println!("Deleted {}", removed.id);
        }
        HistoryAction::Clear { confirm } => {
            if !confirm {
                let count = store.load()?.len();
                println!("Would remove {count} entries from {location}");
                println!("Run with --confirm to delete.");
                return Ok(());
            }
            let removed = store.clear()?;
            tracing::info!(removed, "history cleared");
            println!("Removed {removed} entries from {location}");
        }
    }

    Ok(())
}
