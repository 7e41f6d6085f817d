use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightsError {
    #[error("Fact table '{table}' is unavailable: {reason}")]
    DataUnavailable { table: String, reason: String },

    #[error("Table '{table}' is missing expected column '{column}'")]
    Schema { table: String, column: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type InsightsResult<T> = Result<T, InsightsError>;
