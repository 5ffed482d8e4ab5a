//! # Engine Error Types
//!
//! One error enum for the orchestration layer, wrapping the core and
//! database errors it composes over.

use thiserror::Error;

use gstr_core::CoreError;
use gstr_db::DbError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The company has no GSTIN configured. Checked before any fetch.
    #[error("Please enter GSTIN for Company {company}")]
    MissingGstin { company: String },

    /// The period bounds are inconsistent.
    #[error("Invalid return period: {0}")]
    InvalidPeriod(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
