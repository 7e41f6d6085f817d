use crate::error::InsightsResult;
use crate::types::QuarterTypePivot;
use crate::util::format_number;
use serde::Serialize;
use std::path::Path;
use tabled::{builder::Builder, settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> InsightsResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

/// The pivot has one column per transaction type, so it is written record
/// by record instead of through `serialize`.
pub fn write_pivot_csv(path: &Path, pivot: &QuarterTypePivot) -> InsightsResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    let mut header = vec!["Quarter".to_string()];
    header.extend(pivot.transaction_types.iter().cloned());
    wtr.write_record(&header)?;
    for row in &pivot.rows {
        let mut record = vec![row.quarter.to_string()];
        record.extend(row.amounts.iter().map(|a| a.to_string()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> InsightsResult<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

pub fn render_pivot(pivot: &QuarterTypePivot) -> String {
    let mut builder = Builder::default();
    let mut header = vec!["Quarter".to_string()];
    header.extend(pivot.transaction_types.iter().cloned());
    builder.push_record(header);
    for row in &pivot.rows {
        let mut record = vec![format!("Q{}", row.quarter)];
        record.extend(row.amounts.iter().map(|a| format_number(*a, 2)));
        builder.push_record(record);
    }
    builder.build().with(Style::markdown()).to_string()
}

pub fn preview_pivot(pivot: &QuarterTypePivot) {
    if pivot.is_empty() {
        println!("(no rows)\n");
        return;
    }
    println!("{}\n", render_pivot(pivot));
}
