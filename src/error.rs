//! Error types for market_db

use thiserror::Error;

/// Main error type for market_db
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid entity type: {0}")]
    InvalidEntityType(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("DataFrame error: {0}")]
    DataFrameError(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Result type alias for market_db operations
pub type Result<T> = std::result::Result<T, StoreError>;
