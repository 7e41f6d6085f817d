//! Fact-table sources.
//!
//! The aggregation layer never talks to a database or file directly; it asks
//! a [`FactTableProvider`] for a named table and gets back header-plus-rows
//! text. Connection details and credentials stay with whoever builds the
//! provider.
use crate::error::{InsightsError, InsightsResult};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactTable {
    UserActivity,
    TransactionMap,
    Insurance,
}

impl FactTable {
    pub const ALL: [FactTable; 3] = [
        FactTable::UserActivity,
        FactTable::TransactionMap,
        FactTable::Insurance,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FactTable::UserActivity => "user_activity",
            FactTable::TransactionMap => "transaction_map",
            FactTable::Insurance => "insurance",
        }
    }

    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            FactTable::UserActivity => &[
                "state",
                "year",
                "brand",
                "registered_users_count",
                "app_opens",
            ],
            FactTable::TransactionMap => &[
                "state",
                "year",
                "quarter",
                "transaction_type",
                "transaction_amount",
            ],
            FactTable::Insurance => &[
                "state",
                "year",
                "transaction_count",
                "transaction_amount",
            ],
        }
    }
}

impl fmt::Display for FactTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A table as read from a provider: header row plus text records.
/// Header names are trimmed and lower-cased on construction.
/// `unreadable_rows` counts records the source could not decode at all.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub name: String,
    headers: StringRecord,
    records: Vec<StringRecord>,
    unreadable_rows: usize,
}

impl RawTable {
    pub fn new<H, S>(name: &str, headers: H, records: Vec<StringRecord>) -> Self
    where
        H: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let headers: StringRecord = headers
            .into_iter()
            .map(|h| h.as_ref().trim().to_lowercase())
            .collect();
        RawTable {
            name: name.to_string(),
            headers,
            records,
            unreadable_rows: 0,
        }
    }

    pub fn with_unreadable_rows(mut self, count: usize) -> Self {
        self.unreadable_rows = count;
        self
    }

    pub fn unreadable_rows(&self) -> usize {
        self.unreadable_rows
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn records(&self) -> &[StringRecord] {
        &self.records
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// Fails with a schema error naming the first column from `columns`
    /// that the table lacks.
    pub fn require_columns(&self, columns: &[&str]) -> InsightsResult<()> {
        match columns.iter().find(|c| !self.has_column(c)) {
            Some(missing) => Err(InsightsError::Schema {
                table: self.name.clone(),
                column: (*missing).to_string(),
            }),
            None => Ok(()),
        }
    }
}

pub trait FactTableProvider {
    fn read_table(&self, table: FactTable) -> InsightsResult<RawTable>;
}

/// Reads `<dir>/<table>.csv` for each fact table.
#[derive(Debug, Clone)]
pub struct CsvDirectoryProvider {
    dir: PathBuf,
}

impl CsvDirectoryProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        CsvDirectoryProvider { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn table_path(&self, table: FactTable) -> PathBuf {
        self.dir.join(format!("{}.csv", table.name()))
    }
}

impl FactTableProvider for CsvDirectoryProvider {
    fn read_table(&self, table: FactTable) -> InsightsResult<RawTable> {
        let path = self.table_path(table);
        let unavailable = |e: csv::Error| InsightsError::DataUnavailable {
            table: table.name().to_string(),
            reason: format!("{}: {}", path.display(), e),
        };
        let mut rdr = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::All)
            .from_path(&path)
            .map_err(unavailable)?;
        let headers = rdr.headers().map_err(unavailable)?.clone();
        let mut records = Vec::new();
        let mut unreadable = 0usize;
        for result in rdr.byte_records() {
            let raw = match result {
                Ok(r) => r,
                Err(e) if e.is_io_error() => return Err(unavailable(e)),
                Err(_) => {
                    unreadable += 1;
                    continue;
                }
            };
            // Rows with bytes that are not UTF-8 are skipped, not fatal.
            match StringRecord::from_byte_record(raw) {
                Ok(r) => records.push(r),
                Err(_) => unreadable += 1,
            }
        }
        log::debug!(
            "read {} rows from {} ({} unreadable)",
            records.len(),
            path.display(),
            unreadable
        );
        Ok(RawTable::new(table.name(), headers.iter(), records).with_unreadable_rows(unreadable))
    }
}

/// Tables held in memory, for callers that already have the rows (and for
/// tests).
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    tables: HashMap<FactTable, RawTable>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: FactTable, headers: &[&str], rows: &[&[&str]]) -> Self {
        let records = rows.iter().map(|r| StringRecord::from(r.to_vec())).collect();
        self.tables
            .insert(table, RawTable::new(table.name(), headers.iter(), records));
        self
    }
}

impl FactTableProvider for InMemoryProvider {
    fn read_table(&self, table: FactTable) -> InsightsResult<RawTable> {
        self.tables
            .get(&table)
            .cloned()
            .ok_or_else(|| InsightsError::DataUnavailable {
                table: table.name().to_string(),
                reason: "table not present in dataset".to_string(),
            })
    }
}
