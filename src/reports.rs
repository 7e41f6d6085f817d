//! The six dashboard aggregations plus the selector options and summary.
//!
//! Each report is a pure function of the dataset and its filter. A filter
//! that matches nothing yields an empty table and a warning in the log.
use crate::loader::Dataset;
use crate::types::{
    BrandEngagementRow, DashboardSummary, FilterOptions, InsuranceYearRow, QuarterTypePivot,
    QuarterTypeRow, StateAmountRow, StateTotalRow, YearEngagementRow,
};
use crate::util::{same_state, state_key, title_case};
use chrono::Utc;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub const DEFAULT_TOP_STATES: usize = 10;

/// Counts are capped at `u64::MAX` rather than wrapping.
fn saturating_total(values: impl Iterator<Item = u64>) -> u64 {
    values.fold(0, u64::saturating_add)
}

fn warn_empty(report: &str, filter: &str) {
    log::warn!("{}: no rows matched {}", report, filter);
}

/// Quarterly transaction amounts for one state and year, one column per
/// transaction type. Quarters ascend; types are sorted by name.
pub fn transactions_by_quarter_and_type(data: &Dataset, state: &str, year: i32) -> QuarterTypePivot {
    let mut cells: BTreeMap<(u8, &str), f64> = BTreeMap::new();
    for r in data
        .transaction_map
        .iter()
        .filter(|r| r.year == year && same_state(&r.state, state))
    {
        *cells.entry((r.quarter, r.transaction_type.as_str())).or_insert(0.0) +=
            r.transaction_amount;
    }
    if cells.is_empty() {
        warn_empty("transactions_by_quarter_and_type", &format!("{state}/{year}"));
        return QuarterTypePivot::default();
    }

    let types: BTreeSet<&str> = cells.keys().map(|(_, t)| *t).collect();
    let quarters: BTreeSet<u8> = cells.keys().map(|(q, _)| *q).collect();
    let rows = quarters
        .into_iter()
        .map(|quarter| QuarterTypeRow {
            quarter,
            amounts: types
                .iter()
                .map(|t| cells.get(&(quarter, *t)).copied().unwrap_or(0.0))
                .collect(),
        })
        .collect();
    QuarterTypePivot {
        transaction_types: types.into_iter().map(str::to_string).collect(),
        rows,
    }
}

/// Registered users and app opens per device brand in one state, most
/// users first. Brands with equal counts keep first-seen order.
pub fn device_engagement_by_brand(data: &Dataset, state: &str) -> Vec<BrandEngagementRow> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut rows: Vec<BrandEngagementRow> = Vec::new();
    for r in data
        .user_activity
        .iter()
        .filter(|r| same_state(&r.state, state))
    {
        let i = *index.entry(r.brand.as_str()).or_insert_with(|| {
            rows.push(BrandEngagementRow {
                brand: r.brand.clone(),
                registered_users: 0,
                app_opens: 0,
            });
            rows.len() - 1
        });
        let row = &mut rows[i];
        row.registered_users = row.registered_users.saturating_add(r.registered_users_count);
        row.app_opens = row.app_opens.saturating_add(r.app_opens);
    }
    if rows.is_empty() {
        warn_empty("device_engagement_by_brand", state);
    }
    rows.sort_by(|a, b| b.registered_users.cmp(&a.registered_users));
    rows
}

/// Policies sold and premium collected per year in one state.
pub fn insurance_by_year(data: &Dataset, state: &str) -> Vec<InsuranceYearRow> {
    let mut by_year: BTreeMap<i32, (u64, f64)> = BTreeMap::new();
    for r in data.insurance.iter().filter(|r| same_state(&r.state, state)) {
        let e = by_year.entry(r.year).or_insert((0, 0.0));
        e.0 = e.0.saturating_add(r.transaction_count);
        e.1 += r.transaction_amount;
    }
    if by_year.is_empty() {
        warn_empty("insurance_by_year", state);
    }
    by_year
        .into_iter()
        .map(|(year, (policies, premium))| InsuranceYearRow {
            year,
            policies,
            premium,
        })
        .collect()
}

/// States ranked by total insurance amount, at most `limit` of them.
/// Spellings that differ only by case count as one state, shown with the
/// first spelling seen. Ties keep the order in which states first appear.
pub fn top_states_by_insurance_amount(data: &Dataset, limit: usize) -> Vec<StateAmountRow> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<StateAmountRow> = Vec::new();
    for r in &data.insurance {
        let i = *index.entry(state_key(&r.state)).or_insert_with(|| {
            rows.push(StateAmountRow {
                state: r.state.clone(),
                total: 0.0,
            });
            rows.len() - 1
        });
        rows[i].total += r.transaction_amount;
    }
    // `sort_by` is stable, which is what keeps ties in first-seen order.
    rows.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));
    rows.truncate(limit);
    rows
}

/// Registered users and app opens per year in one state.
pub fn user_engagement_by_year(data: &Dataset, state: &str) -> Vec<YearEngagementRow> {
    let mut by_year: BTreeMap<i32, (u64, u64)> = BTreeMap::new();
    for r in data
        .user_activity
        .iter()
        .filter(|r| same_state(&r.state, state))
    {
        let e = by_year.entry(r.year).or_insert((0, 0));
        e.0 = e.0.saturating_add(r.registered_users_count);
        e.1 = e.1.saturating_add(r.app_opens);
    }
    if by_year.is_empty() {
        warn_empty("user_engagement_by_year", state);
    }
    by_year
        .into_iter()
        .map(|(year, (registered_users, app_opens))| YearEngagementRow {
            year,
            registered_users,
            app_opens,
        })
        .collect()
}

/// Total transaction amount per state for the choropleth, with names
/// title-cased to match the boundary reference. Spellings that differ only
/// by case collapse into one row. Rows are sorted by state name.
pub fn statewise_transaction_totals(data: &Dataset) -> Vec<StateTotalRow> {
    let mut by_state: BTreeMap<String, f64> = BTreeMap::new();
    for r in &data.transaction_map {
        *by_state.entry(title_case(&r.state)).or_insert(0.0) += r.transaction_amount;
    }
    by_state
        .into_iter()
        .map(|(state, transaction_amount)| StateTotalRow {
            state,
            transaction_amount,
        })
        .collect()
}

/// Sorted distinct states and years offered by the selectors, taken from
/// the user-activity table.
pub fn filter_options(data: &Dataset) -> FilterOptions {
    let mut seen: BTreeMap<String, &str> = BTreeMap::new();
    for r in &data.user_activity {
        seen.entry(state_key(&r.state)).or_insert(r.state.as_str());
    }
    let mut states: Vec<String> = seen.into_values().map(str::to_string).collect();
    states.sort();
    let years: BTreeSet<i32> = data.user_activity.iter().map(|r| r.year).collect();
    FilterOptions {
        states,
        years: years.into_iter().collect(),
    }
}

pub fn dashboard_summary(data: &Dataset, state: &str, year: i32) -> DashboardSummary {
    DashboardSummary {
        generated_at: Utc::now(),
        state: state.to_string(),
        year,
        total_transaction_amount: data.transaction_map.iter().map(|r| r.transaction_amount).sum(),
        total_registered_users: saturating_total(
            data.user_activity.iter().map(|r| r.registered_users_count),
        ),
        total_app_opens: saturating_total(data.user_activity.iter().map(|r| r.app_opens)),
        total_policies: saturating_total(data.insurance.iter().map(|r| r.transaction_count)),
        total_premium: data.insurance.iter().map(|r| r.transaction_amount).sum(),
        states_on_map: statewise_transaction_totals(data).len(),
    }
}
