//! # gstr-db: Transaction Store for GST Return Aggregation
//!
//! This crate provides database access for the return aggregation
//! engine. It uses SQLite for local storage with sqlx for async
//! operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Return Aggregation Data Flow                      │
//! │                                                                         │
//! │  gstr-engine (assembler / overview / runner)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     gstr-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │  │   │
//! │  │   │               │    │ Transactions   │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ Itc / Advances │    │ 001_initial_ │  │   │
//! │  │   │ Connection    │    │ Inward / Docs  │    │ schema.sql   │  │   │
//! │  │   │ Management    │    │ Reports        │    │              │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   invoices, journal vouchers, advances, bills of entry,        │   │
//! │  │   generated report rows                                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (transactions, itc, ...)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gstr_db::{Database, DbConfig};
//! use gstr_db::repository::ReportScope;
//!
//! let db = Database::new(DbConfig::new("path/to/returns.db")).await?;
//!
//! let scope = ReportScope::new("Acme Pvt Ltd", "24AAACC1206D1ZM", from, to);
//! let rows = db.transactions().fetch_sales(&scope, false).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::ReportScope;

// Repository re-exports for convenience
pub use repository::advances::AdvanceRepository;
pub use repository::documents::DocumentRepository;
pub use repository::inward::InwardSupplyRepository;
pub use repository::itc::ItcRepository;
pub use repository::reports::ReportRepository;
pub use repository::transactions::TransactionRepository;
