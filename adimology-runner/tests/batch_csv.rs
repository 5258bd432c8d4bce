//! CSV batch evaluation through files on disk.

use adimology_core::{CrossingPolicy, PowerEngine, RawCalculationInput};
use adimology_runner::{
    evaluate_rows, read_batch_csv, summarize, write_batch_csv, BatchOutcome, STATUS_OK,
};

fn raw(fields: [&str; 6]) -> RawCalculationInput {
    RawCalculationInput {
        buy_lot_volume: fields[0].into(),
        buy_average_price: fields[1].into(),
        lower_bound_price: fields[2].into(),
        upper_bound_price: fields[3].into(),
        total_bid_volume: fields[4].into(),
        total_offer_volume: fields[5].into(),
    }
}

fn sample_rows() -> Vec<RawCalculationInput> {
    let mut rows = Vec::new();
    for i in 0..200u32 {
        let lot = (50_000 + i * 1_000).to_string();
        let avg = (150 + i * 25).to_string();
        rows.push(raw([&lot, &avg, "191", "280", "205792", "683327"]));
    }
    rows.push(raw(["", "1250", "191", "280", "205792", "683327"]));
    rows.push(raw(["100000", "1250", "191", "280", "n/a", "0"]));
    rows
}

#[test]
fn parallel_matches_sequential() {
    let engine = PowerEngine::default();
    let rows = sample_rows();
    let sequential = evaluate_rows(&engine, &rows, false);
    let parallel = evaluate_rows(&engine, &rows, true);
    assert_eq!(sequential, parallel);
}

#[test]
fn malformed_cells_surface_as_rejections() {
    let outcomes = evaluate_rows(&PowerEngine::default(), &sample_rows(), true);
    let summary = summarize(&outcomes);
    assert_eq!(summary.total, 202);
    assert_eq!(summary.ok, 200);
    assert_eq!(summary.rejected.get("invalid_lot_volume"), Some(&1));
    assert_eq!(summary.rejected.get("no_liquidity"), Some(&1));
    let last = outcomes.last().unwrap();
    assert_eq!(last.total_bid_volume, 0.0);
}

#[test]
fn file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("input.csv");
    let output_path = dir.path().join("out").join("results.csv");
    std::fs::write(
        &input_path,
        "buy_lot_volume,buy_average_price,lower_bound_price,upper_bound_price,total_bid_volume,total_offer_volume\n\
         100000, 1250 ,191,280,205792,683327\n\
         1000000,1900,191,280,205792,683327\n",
    )
    .unwrap();

    let rows = read_batch_csv(&input_path).unwrap();
    let engine = PowerEngine::new(CrossingPolicy::AllBands);
    let outcomes = evaluate_rows(&engine, &rows, true);
    write_batch_csv(&output_path, &outcomes).unwrap();

    let mut reader = csv::Reader::from_path(&output_path).unwrap();
    let back: Vec<BatchOutcome> = reader.deserialize().collect::<Result<_, _>>().unwrap();
    assert_eq!(back.len(), 2);
    assert!(back.iter().all(|o| o.status == STATUS_OK));
    // No boundary crossed, so the off-grid 1312 base keeps its offset.
    assert_eq!(back[0].target_high_price, Some(1337.0));
    // Band walking crosses 2000 on the second row.
    assert_eq!(back[1].target_high_price, Some(2540.0));
}
