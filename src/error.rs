//! Error types shared by the loaders, the pipeline and the prediction service.

use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Failure while loading a reference table at startup
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("failed to read reference table {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("reference table {path} has no '{column}' column")]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("reference table {path}, record {record}: invalid number '{value}' in '{column}'")]
    InvalidNumber {
        path: PathBuf,
        record: u64,
        column: &'static str,
        value: String,
    },
}

/// Failure while loading the model or one of the scalers
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("artifact {path} is invalid: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// Outcome of a failed prediction request.
///
/// Validation failures carry per-field detail; everything after validation is
/// reported as a single opaque failure.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("invalid input: {0}")]
    Invalid(#[from] ValidationErrors),

    #[error("Prediction failed")]
    PredictionFailed,
}

/// Failure inside the feature pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("feature scaler does not match the scaled columns: {0}")]
    ScalerMismatch(String),

    #[error("column '{column}' is not finite after preprocessing")]
    NonFinite { column: &'static str },
}
