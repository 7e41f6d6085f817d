//! Explicit memoization of report results.
//!
//! Reports are pure functions of (dataset, filter), so a result can be kept
//! until the dataset changes. [`Dashboard`] owns both and clears the cache
//! whenever the fact tables are reloaded.
use crate::error::InsightsResult;
use crate::loader::{Dataset, LoadReport};
use crate::provider::FactTableProvider;
use crate::reports;
use crate::types::{
    BrandEngagementRow, FilterOptions, InsuranceYearRow, QuarterTypePivot, StateAmountRow,
    StateTotalRow, YearEngagementRow,
};
use crate::util::state_key;
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Default)]
pub struct ReportCache {
    quarter_type: HashMap<(String, i32), QuarterTypePivot>,
    brand: HashMap<String, Vec<BrandEngagementRow>>,
    insurance_year: HashMap<String, Vec<InsuranceYearRow>>,
    top_states: HashMap<usize, Vec<StateAmountRow>>,
    user_year: HashMap<String, Vec<YearEngagementRow>>,
    statewise: Option<Vec<StateTotalRow>>,
    stats: CacheStats,
}

impl ReportCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.quarter_type.len()
            + self.brand.len()
            + self.insurance_year.len()
            + self.top_states.len()
            + self.user_year.len()
            + usize::from(self.statewise.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.quarter_type.clear();
        self.brand.clear();
        self.insurance_year.clear();
        self.top_states.clear();
        self.user_year.clear();
        self.statewise = None;
    }
}

fn memo<K, V, F>(map: &mut HashMap<K, V>, stats: &mut CacheStats, key: K, compute: F) -> V
where
    K: Eq + Hash,
    V: Clone,
    F: FnOnce() -> V,
{
    if let Some(hit) = map.get(&key) {
        stats.hits += 1;
        return hit.clone();
    }
    stats.misses += 1;
    let value = compute();
    map.insert(key, value.clone());
    value
}

/// A loaded dataset plus the cache of reports computed over it.
#[derive(Debug, Default)]
pub struct Dashboard {
    data: Dataset,
    cache: ReportCache,
}

impl Dashboard {
    pub fn new(data: Dataset) -> Self {
        Dashboard {
            data,
            cache: ReportCache::new(),
        }
    }

    pub fn load(provider: &dyn FactTableProvider) -> InsightsResult<(Self, LoadReport)> {
        let (data, report) = Dataset::load(provider)?;
        Ok((Dashboard::new(data), report))
    }

    /// Replace the fact tables. The cache is dropped only after the new
    /// tables loaded, so a failed reload leaves the old state usable.
    pub fn reload(&mut self, provider: &dyn FactTableProvider) -> InsightsResult<LoadReport> {
        let (data, report) = Dataset::load(provider)?;
        self.data = data;
        self.cache.clear();
        log::info!("fact tables reloaded, report cache cleared");
        Ok(report)
    }

    pub fn data(&self) -> &Dataset {
        &self.data
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn cached_reports(&self) -> usize {
        self.cache.len()
    }

    pub fn filter_options(&self) -> FilterOptions {
        reports::filter_options(&self.data)
    }

    pub fn transactions_by_quarter_and_type(&mut self, state: &str, year: i32) -> QuarterTypePivot {
        let data = &self.data;
        memo(
            &mut self.cache.quarter_type,
            &mut self.cache.stats,
            (state_key(state), year),
            || reports::transactions_by_quarter_and_type(data, state, year),
        )
    }

    pub fn device_engagement_by_brand(&mut self, state: &str) -> Vec<BrandEngagementRow> {
        let data = &self.data;
        memo(
            &mut self.cache.brand,
            &mut self.cache.stats,
            state_key(state),
            || reports::device_engagement_by_brand(data, state),
        )
    }

    pub fn insurance_by_year(&mut self, state: &str) -> Vec<InsuranceYearRow> {
        let data = &self.data;
        memo(
            &mut self.cache.insurance_year,
            &mut self.cache.stats,
            state_key(state),
            || reports::insurance_by_year(data, state),
        )
    }

    pub fn top_states_by_insurance_amount(&mut self, limit: usize) -> Vec<StateAmountRow> {
        let data = &self.data;
        memo(
            &mut self.cache.top_states,
            &mut self.cache.stats,
            limit,
            || reports::top_states_by_insurance_amount(data, limit),
        )
    }

    pub fn user_engagement_by_year(&mut self, state: &str) -> Vec<YearEngagementRow> {
        let data = &self.data;
        memo(
            &mut self.cache.user_year,
            &mut self.cache.stats,
            state_key(state),
            || reports::user_engagement_by_year(data, state),
        )
    }

    pub fn statewise_transaction_totals(&mut self) -> Vec<StateTotalRow> {
        if let Some(hit) = &self.cache.statewise {
            self.cache.stats.hits += 1;
            return hit.clone();
        }
        self.cache.stats.misses += 1;
        let totals = reports::statewise_transaction_totals(&self.data);
        self.cache.statewise = Some(totals.clone());
        totals
    }
}
