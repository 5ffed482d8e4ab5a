//! # Error Types
//!
//! Domain-specific error types for gstr-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  gstr-core errors (this file)                                          │
//! │  └── CoreError        - Classification / aggregation failures          │
//! │                                                                         │
//! │  gstr-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  gstr-engine errors (separate crate)                                   │
//! │  └── EngineError      - Report assembly failures (wraps the above)     │
//! │                                                                         │
//! │  Flow: CoreError → EngineError → caller / Failed status                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (invoice number, company, etc.)
//! 3. Errors are enum variants, never String
//! 4. A single bad row fails the whole report - no best-effort filings

use thiserror::Error;

/// Core classification and aggregation errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A row matched no category predicate.
    ///
    /// ## When This Occurs
    /// Never, by construction of the predicate chain. If it does, the
    /// chain is no longer exhaustive and the whole run must abort -
    /// silently defaulting a row would produce an incorrect filing.
    #[error("Invoice {invoice_no} matched no GSTR category; predicate chain is not exhaustive")]
    UnclassifiableInvoice { invoice_no: String },

    /// A row was consumed by a pass that requires classification first.
    #[error("Invoice {invoice_no} has not been classified")]
    NotClassified { invoice_no: String },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::UnclassifiableInvoice {
            invoice_no: "SINV-00042".to_string(),
        };
        assert!(err.to_string().contains("SINV-00042"));
        assert!(err.to_string().contains("not exhaustive"));
    }
}
