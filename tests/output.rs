mod common;

use common::sample_dataset;
use phonepe_insights::output::{render_pivot, write_csv, write_json, write_pivot_csv};
use phonepe_insights::reports::{
    dashboard_summary, device_engagement_by_brand, transactions_by_quarter_and_type,
};
use phonepe_insights::types::QuarterTypePivot;
use std::fs;

#[test]
fn pivot_csv_has_one_column_per_transaction_type() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pivot.csv");
    let pivot = transactions_by_quarter_and_type(&sample_dataset(), "goa", 2022);
    write_pivot_csv(&path, &pivot).unwrap();

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<String> = rdr.headers().unwrap().iter().map(str::to_string).collect();
    assert_eq!(headers, vec!["Quarter", "Merchant payments", "Recharge"]);
    let rows: Vec<Vec<String>> = rdr
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    assert_eq!(rows, vec![vec!["1", "0", "150"], vec!["2", "70", "30"]]);
}

#[test]
fn empty_pivot_writes_only_the_quarter_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    write_pivot_csv(&path, &QuarterTypePivot::default()).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap().trim(), "Quarter");
}

#[test]
fn rendered_pivot_is_a_markdown_table() {
    let pivot = transactions_by_quarter_and_type(&sample_dataset(), "goa", 2022);
    let table = render_pivot(&pivot);
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].contains("Quarter") && lines[0].contains("Recharge"));
    assert!(lines[2].contains("Q1") && lines[2].contains("150.00"));
    assert!(lines[3].contains("Q2") && lines[3].contains("70.00"));
}

#[test]
fn report_rows_write_with_renamed_headers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("brands.csv");
    write_csv(&path, &device_engagement_by_brand(&sample_dataset(), "goa")).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec!["Brand,RegisteredUsers,AppOpens", "Samsung,300,20", "Xiaomi,250,100"]
    );
}

#[test]
fn summary_json_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summary.json");
    write_json(&path, &dashboard_summary(&sample_dataset(), "goa", 2022)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["year"], 2022);
    assert_eq!(value["states_on_map"], 3);
}
