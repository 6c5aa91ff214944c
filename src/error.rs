use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Failed to load budget data from {path}: {details}")]
    DataLoad { path: String, details: String },

    #[error("Invalid quarter key '{0}': expected format YYYYQn")]
    InvalidQuarterKey(String),

    #[error("No usable quarterly records remained after validation")]
    EmptyBudget,

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
