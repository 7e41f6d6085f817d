use crate::error::InsightsResult;
use crate::provider::{FactTable, FactTableProvider, RawTable};
use crate::types::{
    InsuranceRecord, RawInsuranceRow, RawTransactionMapRow, RawUserActivityRow,
    TransactionMapRecord, UserActivityRecord,
};
use crate::util::{clean_text, parse_count_safe, parse_f64_safe, parse_i32_safe};
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableLoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub skipped_rows: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub user_activity: TableLoadReport,
    pub transaction_map: TableLoadReport,
    pub insurance: TableLoadReport,
}

impl LoadReport {
    pub fn skipped_rows(&self) -> usize {
        self.user_activity.skipped_rows
            + self.transaction_map.skipped_rows
            + self.insurance.skipped_rows
    }
}

/// The three fact tables, cleaned and typed. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub user_activity: Vec<UserActivityRecord>,
    pub transaction_map: Vec<TransactionMapRecord>,
    pub insurance: Vec<InsuranceRecord>,
}

impl Dataset {
    pub fn from_rows(
        user_activity: Vec<UserActivityRecord>,
        transaction_map: Vec<TransactionMapRecord>,
        insurance: Vec<InsuranceRecord>,
    ) -> Self {
        Dataset {
            user_activity,
            transaction_map,
            insurance,
        }
    }

    /// Read and clean every fact table. A provider failure or a missing
    /// column aborts the load; individual bad rows are skipped and counted.
    pub fn load(provider: &dyn FactTableProvider) -> InsightsResult<(Dataset, LoadReport)> {
        let users = provider.read_table(FactTable::UserActivity)?;
        let (user_activity, user_report) =
            clean_table(&users, FactTable::UserActivity, clean_user_activity)?;

        let transactions = provider.read_table(FactTable::TransactionMap)?;
        let (transaction_map, transaction_report) =
            clean_table(&transactions, FactTable::TransactionMap, clean_transaction)?;

        let policies = provider.read_table(FactTable::Insurance)?;
        let (insurance, insurance_report) =
            clean_table(&policies, FactTable::Insurance, clean_insurance)?;

        let report = LoadReport {
            user_activity: user_report,
            transaction_map: transaction_report,
            insurance: insurance_report,
        };
        if report.skipped_rows() > 0 {
            log::warn!("skipped {} malformed fact rows", report.skipped_rows());
        }
        log::info!(
            "loaded {} user, {} transaction, {} insurance rows",
            user_activity.len(),
            transaction_map.len(),
            insurance.len()
        );
        Ok((
            Dataset {
                user_activity,
                transaction_map,
                insurance,
            },
            report,
        ))
    }
}

fn clean_table<R, T>(
    raw: &RawTable,
    table: FactTable,
    clean: fn(R) -> Option<T>,
) -> InsightsResult<(Vec<T>, TableLoadReport)>
where
    R: DeserializeOwned,
{
    raw.require_columns(table.required_columns())?;

    let mut report = TableLoadReport {
        total_rows: raw.unreadable_rows(),
        skipped_rows: raw.unreadable_rows(),
        ..TableLoadReport::default()
    };
    let mut out = Vec::with_capacity(raw.records().len());
    for record in raw.records() {
        report.total_rows += 1;
        let row = match record.deserialize::<R>(Some(raw.headers())) {
            Ok(r) => r,
            Err(_) => {
                report.skipped_rows += 1;
                continue;
            }
        };
        match clean(row) {
            Some(r) => out.push(r),
            None => report.skipped_rows += 1,
        }
    }
    report.loaded_rows = out.len();
    log::debug!(
        "{}: {} rows, {} skipped",
        table,
        report.total_rows,
        report.skipped_rows
    );
    Ok((out, report))
}

fn clean_user_activity(row: RawUserActivityRow) -> Option<UserActivityRecord> {
    Some(UserActivityRecord {
        state: clean_text(row.state)?,
        year: parse_i32_safe(row.year.as_deref())?,
        brand: clean_text(row.brand).unwrap_or_else(|| "Unknown".to_string()),
        registered_users_count: parse_count_safe(row.registered_users_count.as_deref())?,
        app_opens: parse_count_safe(row.app_opens.as_deref())?,
    })
}

fn clean_transaction(row: RawTransactionMapRow) -> Option<TransactionMapRecord> {
    let quarter = match parse_i32_safe(row.quarter.as_deref()) {
        Some(q @ 1..=4) => q as u8,
        _ => return None,
    };
    let transaction_amount = match parse_f64_safe(row.transaction_amount.as_deref()) {
        Some(v) if v >= 0.0 => v,
        _ => return None,
    };
    Some(TransactionMapRecord {
        state: clean_text(row.state)?,
        year: parse_i32_safe(row.year.as_deref())?,
        quarter,
        transaction_type: clean_text(row.transaction_type)
            .unwrap_or_else(|| "Unspecified".to_string()),
        transaction_amount,
    })
}

fn clean_insurance(row: RawInsuranceRow) -> Option<InsuranceRecord> {
    let transaction_amount = match parse_f64_safe(row.transaction_amount.as_deref()) {
        Some(v) if v >= 0.0 => v,
        _ => return None,
    };
    Some(InsuranceRecord {
        state: clean_text(row.state)?,
        year: parse_i32_safe(row.year.as_deref())?,
        transaction_count: parse_count_safe(row.transaction_count.as_deref())?,
        transaction_amount,
    })
}
