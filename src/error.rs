//! Error types for settlement, exposure loading and the predictive artifact
//!
//! An empty row set after filtering is not an error; see
//! [`SettlementOutcome::NoMatchingData`](crate::settlement::SettlementOutcome).

use thiserror::Error;

/// Errors raised while producing exposure rows
#[derive(Error, Debug)]
pub enum ExposureError {
    #[error("exposure file could not be read: {0}")]
    Io(#[from] std::io::Error),

    #[error("exposure CSV is malformed: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid value for {field} in region {region}: {value}")]
    InvalidValue {
        region: String,
        field: &'static str,
        value: f64,
    },

    #[error("exposure row has an empty region code")]
    MissingRegion,
}

/// Errors raised while loading or evaluating the predictive artifact
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("model artifact could not be read: {0}")]
    Io(#[from] std::io::Error),

    #[error("model artifact is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("model expects {expected} inputs but schema declares {actual} features")]
    WidthMismatch { expected: usize, actual: usize },

    #[error("model produced a non-finite prediction for region {region}")]
    NonFinitePrediction { region: String },

    #[error("tree {tree} is invalid: {reason}")]
    InvalidTree { tree: usize, reason: String },
}

/// Errors raised when building treaty parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreatyError {
    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },
}

/// Top-level error for the two exposed operations
#[derive(Error, Debug)]
pub enum SettlementError {
    #[error("exposure data unavailable: {0}")]
    DataUnavailable(#[from] ExposureError),

    #[error("predictive model unavailable; train and export the artifact first")]
    ModelUnavailable,

    #[error("feature schema mismatch: missing {missing:?}, unexpected {unexpected:?}")]
    SchemaMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("invalid treaty: {0}")]
    InvalidTreaty(#[from] TreatyError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

impl SettlementError {
    /// Whether the caller should report this as a temporarily unavailable service
    /// rather than a data failure.
    pub fn is_service_unavailable(&self) -> bool {
        matches!(self, SettlementError::ModelUnavailable)
    }
}
