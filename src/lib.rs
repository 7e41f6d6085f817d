//! Aggregation layer for the PhonePe insights dashboard.
//!
//! Fact tables (user activity, transaction map, insurance) come in through a
//! [`provider::FactTableProvider`], are cleaned by [`loader::Dataset::load`],
//! and are reshaped into chart-ready tables by the functions in [`reports`].
//! [`cache::Dashboard`] memoizes those reports per filter.
pub mod cache;
pub mod config;
pub mod error;
pub mod loader;
pub mod output;
pub mod provider;
pub mod reports;
pub mod types;
pub mod util;

pub use cache::Dashboard;
pub use error::{InsightsError, InsightsResult};
pub use loader::{Dataset, LoadReport};
pub use provider::{CsvDirectoryProvider, FactTable, FactTableProvider, InMemoryProvider};
