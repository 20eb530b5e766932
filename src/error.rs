use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueryError>;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Location not found: '{location}'")]
    LocationNotFound { location: String },

    #[error("Invalid neighbor count {requested}: must be between 1 and {available}")]
    InvalidNeighborCount { requested: usize, available: usize },

    #[error("Unknown metal column: '{column}'")]
    UnknownColumn { column: String },

    #[error("Dataset contains no districts")]
    EmptyDataset,

    #[error("Row index {index} out of range for dataset of {rows} rows")]
    RowOutOfRange { index: usize, rows: usize },

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Geocoding request failed: {0}")]
    Geocoding(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
