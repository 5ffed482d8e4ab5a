//! # Repository Pattern Implementation
//!
//! Each repository owns the queries for one report concern. All fetchers
//! take a [`ReportScope`] so the common filing-period conditions are
//! applied uniformly.
//!
//! ## Common Scope Conditions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every tax-total fetcher applies ALL of these:                          │
//! │                                                                         │
//! │   • docstatus = 1            only submitted documents                   │
//! │   • is_opening = 0           opening entries never enter totals         │
//! │   • posting_date in period   inclusive [from_date, to_date]             │
//! │   • company + company_gstin  one registration at a time                 │
//! │   • party GSTIN ≠ own GSTIN  self-billed documents are excluded         │
//! │                                                                         │
//! │  The document-series fetchers are the exception: they read ALL          │
//! │  doc statuses, because draft and cancelled numbers still occupy         │
//! │  slots in a numbering series.                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

pub mod advances;
pub mod documents;
pub mod inward;
pub mod itc;
pub mod reports;
pub mod transactions;

/// Filing scope shared by every fetcher: one company registration and
/// one return period.
#[derive(Debug, Clone)]
pub struct ReportScope {
    pub company: String,
    pub company_gstin: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

impl ReportScope {
    pub fn new(
        company: impl Into<String>,
        company_gstin: impl Into<String>,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> Self {
        ReportScope {
            company: company.into(),
            company_gstin: company_gstin.into(),
            from_date,
            to_date,
        }
    }
}
