use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

impl FieldError {
    pub fn new(field: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        FieldError {
            field: field.to_string(),
            title: title.into(),
            description: description.into(),
        }
    }
}

#[derive(Error, Debug, Serialize)]
pub enum NexusError {
    /// Generic input validation error with detailed field information
    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),

    /// A split must carry at least one card
    #[error("Payment split is empty")]
    EmptySplit,

    /// Edited index does not address an entry of the split
    #[error("Split index {index} out of range for {len} entries")]
    InvalidSplitIndex { index: usize, len: usize },

    /// The same card appears twice in one split
    #[error("Card {0} appears more than once in the split")]
    DuplicateCard(String),

    /// Entry amounts no longer add up to the split's fixed total
    #[error("Split total {actual} does not match original total {expected}")]
    SplitOutOfBalance { expected: Decimal, actual: Decimal },

    /// An edit arrived while no split is being edited
    #[error("No active payment split")]
    NoActiveSplit,

    /// Funding account missing or not cash-bearing
    #[error("Funding account {0} not found")]
    FundingAccountNotFound(String),

    /// The AI optimizer call failed or returned something unusable
    #[error("Optimizer error: {0}")]
    OptimizerError(String),

    /// Missing or invalid bearer token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Logging error: {0}")]
    LoggingError(String),

    #[error("Cache error: {0}")]
    CacheError(String),
}

impl NexusError {
    pub fn invalid_input(field: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        NexusError::InvalidInput(field.to_string(), FieldError::new(field, title, description))
    }
}
