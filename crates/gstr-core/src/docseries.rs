//! # Document Series Analyzer
//!
//! Splits a name-ordered document stream into contiguous numbering runs
//! for the "documents issued" section of the return. Gaps in serial
//! numbers start a new run, which is how missing documents surface.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   name-ordered documents                                                │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   reorder amendments to the end   (SINV-00001-1 breaks runs otherwise)  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   bucket by nature of document   (exclusion buckets first)              │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   split each bucket into runs    (successor check on adjacent names)    │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   per-run counts: draft / submitted / cancelled / total issued          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use crate::types::DocStatus;

// =============================================================================
// Input Rows
// =============================================================================

/// Which transaction stream a document came from. Decides its nature
/// bucket after the exclusion checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSource {
    Sales,
    Purchase,
}

/// One document as fetched for series analysis, in name order.
#[derive(Debug, Clone)]
pub struct DocumentRow {
    pub name: String,
    pub naming_series: String,
    pub status: DocStatus,
    /// Name of the document this one amends, if any.
    pub amended_from: Option<String>,
    /// Party GSTIN equals the company's own registration.
    pub same_gstin_billing: bool,
    pub is_opening: bool,
    pub is_return: bool,
    pub is_debit_note: bool,
    pub source: DocumentSource,
}

// =============================================================================
// Nature of Document
// =============================================================================

/// Reporting bucket of a document run.
///
/// The three exclusion buckets keep problem documents visible in the
/// summary instead of silently dropping them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NatureOfDocument {
    ExcludedInvalidInvoiceNumber,
    ExcludedSameGstinBilling,
    ExcludedOpeningEntry,
    OutwardInvoice,
    DebitNote,
    CreditNote,
    InwardFromUnregistered,
}

impl NatureOfDocument {
    /// Buckets in report order: exclusions first, then inward, then the
    /// sales streams.
    pub const ALL: [NatureOfDocument; 7] = [
        NatureOfDocument::ExcludedInvalidInvoiceNumber,
        NatureOfDocument::ExcludedSameGstinBilling,
        NatureOfDocument::ExcludedOpeningEntry,
        NatureOfDocument::InwardFromUnregistered,
        NatureOfDocument::CreditNote,
        NatureOfDocument::DebitNote,
        NatureOfDocument::OutwardInvoice,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            NatureOfDocument::ExcludedInvalidInvoiceNumber => {
                "Excluded from Report (Invalid Invoice Number)"
            }
            NatureOfDocument::ExcludedSameGstinBilling => {
                "Excluded from Report (Same GSTIN Billing)"
            }
            NatureOfDocument::ExcludedOpeningEntry => "Excluded from Report (Is Opening Entry)",
            NatureOfDocument::OutwardInvoice => "Invoices for outward supply",
            NatureOfDocument::DebitNote => "Debit Note",
            NatureOfDocument::CreditNote => "Credit Note",
            NatureOfDocument::InwardFromUnregistered => {
                "Invoices for inward supply from unregistered person"
            }
        }
    }

    /// Assigns the bucket. Exclusion checks run first and in this order.
    fn of(doc: &DocumentRow) -> Self {
        if !is_valid_invoice_number(&doc.name) {
            NatureOfDocument::ExcludedInvalidInvoiceNumber
        } else if doc.is_opening {
            NatureOfDocument::ExcludedOpeningEntry
        } else if doc.same_gstin_billing {
            NatureOfDocument::ExcludedSameGstinBilling
        } else if doc.source == DocumentSource::Purchase {
            NatureOfDocument::InwardFromUnregistered
        } else if doc.is_return {
            NatureOfDocument::CreditNote
        } else if doc.is_debit_note {
            NatureOfDocument::DebitNote
        } else {
            NatureOfDocument::OutwardInvoice
        }
    }
}

/// Statutory invoice-number format: at most 16 characters, drawn from
/// letters, digits, `-` and `/`.
pub fn is_valid_invoice_number(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 16
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '/')
}

// =============================================================================
// Series Runs
// =============================================================================

/// One contiguous numbering run of a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSeries {
    pub naming_series: String,
    pub nature_of_document: NatureOfDocument,
    pub from_serial_no: String,
    pub to_serial_no: String,
    pub total_submitted: i64,
    pub cancelled: i64,
    pub total_draft: i64,
    /// Draft + submitted + cancelled.
    pub total_issued: i64,
}

/// Decides whether `second` is the immediate successor of `first` in
/// the same naming series.
///
/// Letters must match as a joined string, the digit strings must have
/// equal length, and after stripping the longest common trailing digit
/// run the remaining numbers must differ by exactly one.
///
/// Two false-positive shapes are accepted deliberately, matching what
/// filed summaries have always shown:
/// * serial jumps that differ only in a shared trailing run, e.g.
///   `SINV-00010-2023` then `SINV-00020-2023`
/// * identical serials under different middle segments, e.g.
///   `SINV-01-2023-001` then `SINV-02-2023-001`
pub fn is_successor(first: &str, second: &str) -> bool {
    let letters = |s: &str| -> String { s.chars().filter(|c| c.is_ascii_alphabetic()).collect() };
    let digits = |s: &str| -> Vec<u8> {
        s.chars()
            .filter(|c| c.is_ascii_digit())
            .map(|c| c as u8 - b'0')
            .collect()
    };

    if letters(first) != letters(second) {
        return false;
    }

    let mut n0 = digits(first);
    let mut n1 = digits(second);
    if n0.len() != n1.len() {
        return false;
    }

    // Strip the longest common trailing digit run (year suffixes etc.),
    // never consuming the full string
    let mut suffix = 0;
    for i in (1..n0.len()).rev() {
        if n0[i] != n1[i] {
            break;
        }
        suffix += 1;
    }
    n0.truncate(n0.len() - suffix);
    n1.truncate(n1.len() - suffix);

    // Digit strings are short in practice but unvalidated names pass
    // through here too, so accumulate wide
    let value = |digits: &[u8]| -> i128 {
        let mut v = 0_i128;
        for d in digits {
            v = v.saturating_mul(10).saturating_add(i128::from(*d));
        }
        v
    };

    value(&n1) - value(&n0) == 1
}

/// Moves amended documents to the end of the stream.
///
/// An amendment like `SINV-00001-1` sits between `SINV-00001` and
/// `SINV-00002` in name order and would otherwise split the run.
/// Chained amendments (`-1-1`) follow their parent out.
pub fn reorder_amended(docs: Vec<DocumentRow>) -> Vec<DocumentRow> {
    let mut amended_names: Vec<String> = Vec::new();
    let mut regular = Vec::with_capacity(docs.len());
    let mut amended = Vec::new();

    for doc in docs {
        let is_amendment = match &doc.amended_from {
            Some(parent) => {
                parent.len() != doc.name.len() || amended_names.iter().any(|n| n == parent)
            }
            None => false,
        };

        if is_amendment {
            amended_names.push(doc.name.clone());
            amended.push(doc);
        } else {
            regular.push(doc);
        }
    }

    regular.extend(amended);
    regular
}

/// Splits one nature bucket into contiguous runs with status counts.
fn split_into_runs(docs: &[DocumentRow], nature: NatureOfDocument) -> Vec<DocumentSeries> {
    let mut runs = Vec::new();
    let mut start = 0;

    for i in 1..=docs.len() {
        let run_ends = i == docs.len() || !is_successor(&docs[i - 1].name, &docs[i].name);
        if !run_ends {
            continue;
        }

        let run = &docs[start..i];
        let total_draft = run.iter().filter(|d| d.status == DocStatus::Draft).count() as i64;
        let total_submitted = run
            .iter()
            .filter(|d| d.status == DocStatus::Submitted)
            .count() as i64;
        let cancelled = run
            .iter()
            .filter(|d| d.status == DocStatus::Cancelled)
            .count() as i64;

        runs.push(DocumentSeries {
            naming_series: run[0].naming_series.replace('.', ""),
            nature_of_document: nature,
            from_serial_no: run[0].name.clone(),
            to_serial_no: run[run.len() - 1].name.clone(),
            total_submitted,
            cancelled,
            total_draft,
            total_issued: total_draft + total_submitted + cancelled,
        });
        start = i;
    }

    runs
}

/// Full analysis of one name-ordered document stream.
pub fn summarize_documents(docs: Vec<DocumentRow>) -> Vec<DocumentSeries> {
    let docs = reorder_amended(docs);

    let mut summary = Vec::new();
    for nature in NatureOfDocument::ALL {
        let bucket: Vec<DocumentRow> = docs
            .iter()
            .filter(|d| NatureOfDocument::of(d) == nature)
            .cloned()
            .collect();
        summary.extend(split_into_runs(&bucket, nature));
    }

    summary
}

// =============================================================================
// Unit Tests
// =============================================================================
