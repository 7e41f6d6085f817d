use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::util::{display_amount, display_count};

// Raw rows as they come off a fact table. Every field is optional text so a
// single bad cell skips the row instead of failing the whole read.

#[derive(Debug, Deserialize)]
pub struct RawUserActivityRow {
    pub state: Option<String>,
    pub year: Option<String>,
    pub brand: Option<String>,
    pub registered_users_count: Option<String>,
    pub app_opens: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawTransactionMapRow {
    pub state: Option<String>,
    pub year: Option<String>,
    pub quarter: Option<String>,
    pub transaction_type: Option<String>,
    pub transaction_amount: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawInsuranceRow {
    pub state: Option<String>,
    pub year: Option<String>,
    pub transaction_count: Option<String>,
    pub transaction_amount: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserActivityRecord {
    pub state: String,
    pub year: i32,
    pub brand: String,
    pub registered_users_count: u64,
    pub app_opens: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionMapRecord {
    pub state: String,
    pub year: i32,
    pub quarter: u8,
    pub transaction_type: String,
    pub transaction_amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsuranceRecord {
    pub state: String,
    pub year: i32,
    pub transaction_count: u64,
    pub transaction_amount: f64,
}

/// Quarter x transaction-type pivot. `amounts` in each row line up with
/// `transaction_types`; combinations absent from the data hold `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct QuarterTypePivot {
    pub transaction_types: Vec<String>,
    pub rows: Vec<QuarterTypeRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuarterTypeRow {
    pub quarter: u8,
    pub amounts: Vec<f64>,
}

impl QuarterTypePivot {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Amount for one cell. Unknown quarters or types read as zero so
    /// charts can ask for any key without checking first.
    pub fn amount(&self, quarter: u8, transaction_type: &str) -> f64 {
        let Some(col) = self
            .transaction_types
            .iter()
            .position(|t| t == transaction_type)
        else {
            return 0.0;
        };
        self.rows
            .iter()
            .find(|r| r.quarter == quarter)
            .and_then(|r| r.amounts.get(col).copied())
            .unwrap_or(0.0)
    }

    pub fn quarter_total(&self, quarter: u8) -> f64 {
        self.rows
            .iter()
            .find(|r| r.quarter == quarter)
            .map(|r| r.amounts.iter().sum())
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct BrandEngagementRow {
    #[serde(rename = "Brand")]
    #[tabled(rename = "Brand")]
    pub brand: String,
    #[serde(rename = "RegisteredUsers")]
    #[tabled(rename = "RegisteredUsers", display_with = "display_count")]
    pub registered_users: u64,
    #[serde(rename = "AppOpens")]
    #[tabled(rename = "AppOpens", display_with = "display_count")]
    pub app_opens: u64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct InsuranceYearRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Policies")]
    #[tabled(rename = "Policies", display_with = "display_count")]
    pub policies: u64,
    #[serde(rename = "Premium")]
    #[tabled(rename = "Premium", display_with = "display_amount")]
    pub premium: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct StateAmountRow {
    #[serde(rename = "State")]
    #[tabled(rename = "State")]
    pub state: String,
    #[serde(rename = "Total")]
    #[tabled(rename = "Total", display_with = "display_amount")]
    pub total: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct YearEngagementRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "RegisteredUsers")]
    #[tabled(rename = "RegisteredUsers", display_with = "display_count")]
    pub registered_users: u64,
    #[serde(rename = "AppOpens")]
    #[tabled(rename = "AppOpens", display_with = "display_count")]
    pub app_opens: u64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct StateTotalRow {
    #[serde(rename = "State")]
    #[tabled(rename = "State")]
    pub state: String,
    #[serde(rename = "TransactionAmount")]
    #[tabled(rename = "TransactionAmount", display_with = "display_amount")]
    pub transaction_amount: f64,
}

/// Values offered by the state and year selectors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    pub states: Vec<String>,
    pub years: Vec<i32>,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub generated_at: DateTime<Utc>,
    pub state: String,
    pub year: i32,
    pub total_transaction_amount: f64,
    pub total_registered_users: u64,
    pub total_app_opens: u64,
    pub total_policies: u64,
    pub total_premium: f64,
    pub states_on_map: usize,
}
