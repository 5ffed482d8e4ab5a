//! # gstr-core: Pure Return Logic for GST Return Aggregation
//!
//! This crate is the **heart** of the return engine. It contains all
//! classification and aggregation logic as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    GST Return Engine Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                gstr-engine (Orchestration)                      │   │
//! │  │   report lifecycle ──► section assembly ──► notification        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ gstr-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  classify │  │ aggregate │  │ docseries │  │   │
//! │  │   │  rows,    │  │ predicate │  │  buckets, │  │  series   │  │   │
//! │  │   │  enums    │  │   chain   │  │  overview │  │   runs    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐                                 │   │
//! │  │   │  amount   │  │  report   │                                 │   │
//! │  │   │ TaxAmounts│  │ GSTR-3B   │                                 │   │
//! │  │   └───────────┘  └───────────┘                                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    gstr-db (Database Layer)                     │   │
//! │  │            SQLite queries, migrations, repositories             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (TransactionRow, categories, treatments)
//! - [`amount`] - Tax amount accumulator with deferred rounding
//! - [`classify`] - Ordered predicate chain assigning categories
//! - [`aggregate`] - Sub-category buckets and the two-level overview
//! - [`docseries`] - Document numbering runs and gap detection
//! - [`report`] - Typed GSTR-3B statutory payload
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every classification is deterministic - same row = same category
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Deferred Rounding**: Sums accumulate unrounded; `round2` runs once at serialization
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use gstr_core::classify::classify_all;
//! use gstr_core::aggregate::{overview, summarize};
//!
//! let mut rows = Vec::new(); // fetched by gstr-db in production
//! classify_all(&mut rows).unwrap();
//!
//! let summary = summarize(&rows).unwrap();
//! let lines = overview(&summary, false);
//! assert!(lines.iter().all(|l| l.indent <= 1));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregate;
pub mod amount;
pub mod classify;
pub mod docseries;
pub mod error;
pub mod report;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use gstr_core::TransactionRow` instead of
// `use gstr_core::types::TransactionRow`

pub use amount::{round2, TaxAmounts};
pub use error::{CoreError, CoreResult};
pub use report::Gstr3bReport;
pub use types::*;
