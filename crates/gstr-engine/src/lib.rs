//! # gstr-engine: Report Orchestration
//!
//! Ties the pure return logic in gstr-core to the transaction store in
//! gstr-db: assembles the GSTR-3B payload, renders the GSTR-1 overview
//! and document summary, and drives report generation through its
//! lifecycle.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     gstr-engine (THIS CRATE)                            │
//! │                                                                         │
//! │   ┌──────────────┐   ┌──────────────┐   ┌────────────────────────────┐ │
//! │   │  assembler   │   │   overview   │   │          runner            │ │
//! │   │              │   │              │   │                            │ │
//! │   │ GSTR-3B      │   │ classify +   │   │ In Process → Generated /   │ │
//! │   │ sections     │   │ aggregate +  │   │ Failed, background spawn,  │ │
//! │   │ 3.1 … 5      │   │ doc series   │   │ completion notices         │ │
//! │   └──────┬───────┘   └──────┬───────┘   └─────────────┬──────────────┘ │
//! │          │                  │                         │                │
//! └──────────┼──────────────────┼─────────────────────────┼────────────────┘
//!            ▼                  ▼                         ▼
//!       gstr-core          gstr-core                   gstr-db
//!       (report.rs)        (classify/aggregate/        (reports repo)
//!                           docseries)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use gstr_db::{Database, DbConfig};
//! use gstr_engine::{ReportContext, ReportRunner};
//!
//! let db = Arc::new(Database::new(DbConfig::new("returns.db")).await?);
//! let ctx = ReportContext::for_month("Acme Pvt Ltd", "24AAACC1206D1ZM", 2025, 1)?;
//!
//! let runner = ReportRunner::new(db);
//! let report_id = runner.generate(&ctx).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod assembler;
pub mod config;
pub mod error;
pub mod overview;
pub mod runner;

// =============================================================================
// Re-exports
// =============================================================================

pub use assembler::{AssembledReport, ReportAssembler};
pub use config::ReportContext;
pub use error::{EngineError, EngineResult};
pub use overview::OverviewBuilder;
pub use runner::{GenerationNotice, ReportRunner};
