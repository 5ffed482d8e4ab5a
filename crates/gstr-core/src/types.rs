//! # Domain Types
//!
//! Core domain types for GST return aggregation.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ TransactionRow  │   │ Classification  │   │   GstCategory   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  invoice_no     │   │  category       │   │  B2b            │       │
//! │  │  place_of_supply│   │  sub_category   │   │  B2cLarge       │       │
//! │  │  tax amounts    │   │  invoice_type   │   │  Export ...     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  GstTreatment   │   │PartyGstCategory │   │    DocStatus    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Taxable        │   │  Registered     │   │  Draft (0)      │       │
//! │  │  NilRated ...   │   │  Overseas ...   │   │  Submitted (1)  │       │
//! │  └─────────────────┘   └─────────────────┘   │  Cancelled (2)  │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## GSTIN State Codes
//! The first two characters of a GSTIN are the state code of the
//! registration. Place-of-supply values carry the same two-digit prefix
//! (`"24-Gujarat"`), which is what makes intra/inter-state checks a
//! string-prefix comparison.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::amount::TaxAmounts;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Place-of-supply value used for exports.
///
/// An invoice is an export only when its place of supply is this fixed
/// value AND the counterparty registration category is Overseas.
pub const OTHER_COUNTRIES_POS: &str = "96-Other Countries";

/// Fallback place of supply when the field is absent on outward supplies.
pub const DEFAULT_POS: &str = "00-Other Territory";

/// Date from which the reduced B2C-Large invoice-total limit applies.
///
/// Notification 12/2024: the inter-state B2C reporting threshold dropped
/// from 2.5 lakh to 1 lakh for documents dated on or after this day.
pub const B2CL_LIMIT_REDUCED_FROM: NaiveDate = match NaiveDate::from_ymd_opt(2024, 11, 1) {
    Some(d) => d,
    None => panic!("invalid B2CL cutoff date"),
};

/// Returns the B2C-Large invoice-total limit applicable on a posting date.
///
/// The limit is period-dependent: the comparison against it is always
/// strict greater-than, so an invoice exactly at the limit stays B2C (Others).
pub fn b2c_limit(posting_date: NaiveDate) -> f64 {
    if posting_date >= B2CL_LIMIT_REDUCED_FROM {
        100_000.0
    } else {
        250_000.0
    }
}

/// Extracts the two-digit state code from a GSTIN.
pub fn gstin_state_code(gstin: &str) -> &str {
    &gstin[..gstin.len().min(2)]
}

/// Extracts the two-digit state code from a place-of-supply value
/// (`"24-Gujarat"` → `"24"`).
pub fn pos_state_code(place_of_supply: &str) -> &str {
    &place_of_supply[..place_of_supply.len().min(2)]
}

// =============================================================================
// GST Treatment
// =============================================================================

/// Item-level tax treatment of a supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum GstTreatment {
    #[serde(rename = "Taxable")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Taxable"))]
    Taxable,
    #[serde(rename = "Nil-Rated")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Nil-Rated"))]
    NilRated,
    #[serde(rename = "Exempted")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Exempted"))]
    Exempted,
    #[serde(rename = "Non-GST")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Non-GST"))]
    NonGst,
    #[serde(rename = "Zero-Rated")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Zero-Rated"))]
    ZeroRated,
}

impl GstTreatment {
    /// Statutory display string, as stored on transaction rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            GstTreatment::Taxable => "Taxable",
            GstTreatment::NilRated => "Nil-Rated",
            GstTreatment::Exempted => "Exempted",
            GstTreatment::NonGst => "Non-GST",
            GstTreatment::ZeroRated => "Zero-Rated",
        }
    }
}

// =============================================================================
// Party GST Category
// =============================================================================

/// Registration category of the counterparty.
///
/// Drives sub-category assignment (SEZ / deemed export / composition)
/// and the section 3.2 inter-state breakdown of GSTR-3B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum PartyGstCategory {
    #[serde(rename = "Registered Regular")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Registered Regular"))]
    RegisteredRegular,
    #[serde(rename = "Registered Composition")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Registered Composition"))]
    RegisteredComposition,
    #[serde(rename = "Unregistered")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Unregistered"))]
    Unregistered,
    #[serde(rename = "SEZ")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "SEZ"))]
    Sez,
    #[serde(rename = "Overseas")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Overseas"))]
    Overseas,
    #[serde(rename = "Deemed Export")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Deemed Export"))]
    DeemedExport,
    #[serde(rename = "UIN Holders")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "UIN Holders"))]
    UinHolders,
}

impl PartyGstCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartyGstCategory::RegisteredRegular => "Registered Regular",
            PartyGstCategory::RegisteredComposition => "Registered Composition",
            PartyGstCategory::Unregistered => "Unregistered",
            PartyGstCategory::Sez => "SEZ",
            PartyGstCategory::Overseas => "Overseas",
            PartyGstCategory::DeemedExport => "Deemed Export",
            PartyGstCategory::UinHolders => "UIN Holders",
        }
    }
}

// =============================================================================
// Document Status
// =============================================================================

/// Submission status of a document, matching the stored status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocStatus {
    /// Saved but not submitted (code 0).
    Draft,
    /// Submitted (code 1). Only submitted documents enter tax totals.
    Submitted,
    /// Cancelled after submission (code 2).
    Cancelled,
}

impl DocStatus {
    /// Converts a stored status code. Unknown codes are treated as Draft.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => DocStatus::Submitted,
            2 => DocStatus::Cancelled,
            _ => DocStatus::Draft,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            DocStatus::Draft => 0,
            DocStatus::Submitted => 1,
            DocStatus::Cancelled => 2,
        }
    }
}

// =============================================================================
// Categories
// =============================================================================

/// Top-level regulatory category of a transaction row.
///
/// Exactly one category is assigned per row. The variants are listed in
/// classification priority order; see [`crate::classify`] for why the
/// order is load-bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GstCategory {
    B2b,
    B2cLarge,
    Export,
    B2cSmall,
    NilExempt,
    CdnRegistered,
    CdnUnregistered,
    EcommerceSupply,
}

impl GstCategory {
    /// All categories in statutory overview order.
    pub const ALL: [GstCategory; 8] = [
        GstCategory::B2b,
        GstCategory::B2cLarge,
        GstCategory::Export,
        GstCategory::B2cSmall,
        GstCategory::NilExempt,
        GstCategory::CdnRegistered,
        GstCategory::CdnUnregistered,
        GstCategory::EcommerceSupply,
    ];

    /// Statutory description used in overview rows.
    pub fn description(&self) -> &'static str {
        match self {
            GstCategory::B2b => "B2B, SEZ, DE",
            GstCategory::B2cLarge => "B2C (Large)",
            GstCategory::Export => "Exports",
            GstCategory::B2cSmall => "B2C (Others)",
            GstCategory::NilExempt => "Nil-Rated, Exempted, Non-GST",
            GstCategory::CdnRegistered => "Credit/Debit Notes (Registered)",
            GstCategory::CdnUnregistered => "Credit/Debit Notes (Unregistered)",
            GstCategory::EcommerceSupply => "E-commerce Supplies",
        }
    }

    /// Sub-categories nested under this category, in overview order.
    pub fn sub_categories(&self) -> &'static [GstSubCategory] {
        match self {
            GstCategory::B2b => &[
                GstSubCategory::B2bRegular,
                GstSubCategory::B2bReverseCharge,
                GstSubCategory::SezWithPayment,
                GstSubCategory::SezWithoutPayment,
                GstSubCategory::DeemedExports,
            ],
            GstCategory::B2cLarge => &[GstSubCategory::B2cLarge],
            GstCategory::Export => &[
                GstSubCategory::ExportWithPayment,
                GstSubCategory::ExportWithoutPayment,
            ],
            GstCategory::B2cSmall => &[GstSubCategory::B2cSmall],
            GstCategory::NilExempt => &[GstSubCategory::NilExempt],
            GstCategory::CdnRegistered => &[GstSubCategory::Cdnr],
            GstCategory::CdnUnregistered => &[GstSubCategory::Cdnur],
            GstCategory::EcommerceSupply => &[
                GstSubCategory::EcommerceTcs,
                GstSubCategory::EcommerceOperatorLiable,
            ],
        }
    }
}

/// Sub-category nested under a [`GstCategory`].
///
/// Deterministic function of category plus row attributes; computed once
/// per row per processing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GstSubCategory {
    B2bRegular,
    B2bReverseCharge,
    SezWithPayment,
    SezWithoutPayment,
    DeemedExports,
    B2cLarge,
    ExportWithPayment,
    ExportWithoutPayment,
    B2cSmall,
    NilExempt,
    Cdnr,
    Cdnur,
    /// Supplies through an e-commerce operator collecting TCS u/s 52.
    EcommerceTcs,
    /// Supplies on which the e-commerce operator pays tax u/s 9(5).
    EcommerceOperatorLiable,
}

impl GstSubCategory {
    /// All sub-categories, in overview order.
    pub const ALL: [GstSubCategory; 14] = [
        GstSubCategory::B2bRegular,
        GstSubCategory::B2bReverseCharge,
        GstSubCategory::SezWithPayment,
        GstSubCategory::SezWithoutPayment,
        GstSubCategory::DeemedExports,
        GstSubCategory::B2cLarge,
        GstSubCategory::ExportWithPayment,
        GstSubCategory::ExportWithoutPayment,
        GstSubCategory::B2cSmall,
        GstSubCategory::NilExempt,
        GstSubCategory::Cdnr,
        GstSubCategory::Cdnur,
        GstSubCategory::EcommerceTcs,
        GstSubCategory::EcommerceOperatorLiable,
    ];

    /// Statutory description used in overview rows.
    pub fn description(&self) -> &'static str {
        match self {
            GstSubCategory::B2bRegular => "B2B Regular",
            GstSubCategory::B2bReverseCharge => "B2B Reverse Charge",
            GstSubCategory::SezWithPayment => "SEZ With Payment of Tax",
            GstSubCategory::SezWithoutPayment => "SEZ Without Payment of Tax",
            GstSubCategory::DeemedExports => "Deemed Exports",
            GstSubCategory::B2cLarge => "B2C (Large)",
            GstSubCategory::ExportWithPayment => "Export With Payment of Tax",
            GstSubCategory::ExportWithoutPayment => "Export Without Payment of Tax",
            GstSubCategory::B2cSmall => "B2C (Others)",
            GstSubCategory::NilExempt => "Nil-Rated, Exempted, Non-GST",
            GstSubCategory::Cdnr => "Credit/Debit Notes (Registered)",
            GstSubCategory::Cdnur => "Credit/Debit Notes (Unregistered)",
            GstSubCategory::EcommerceTcs => "Liable to collect tax u/s 52(TCS)",
            GstSubCategory::EcommerceOperatorLiable => "Liable to pay tax u/s 9(5)",
        }
    }
}

// =============================================================================
// Invoice Type Tag
// =============================================================================

/// Statutory invoice-type tag filled in by the sub-category pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceTypeTag {
    /// Regular B2B supply ("R").
    Regular,
    /// SEZ supply with payment of tax ("SEWP").
    SezWithPayment,
    /// SEZ supply without payment of tax ("SEWOP").
    SezWithoutPayment,
    /// Deemed export ("DE").
    DeemedExport,
    /// Export with payment of tax ("WPAY").
    WithPayment,
    /// Export without payment of tax ("WOPAY").
    WithoutPayment,
    /// Note against an export with payment of tax ("EXPWP").
    ExportWithPayment,
    /// Note against an export without payment of tax ("EXPWOP").
    ExportWithoutPayment,
    /// Note against a large inter-state B2C invoice ("B2CL").
    B2clNote,
    /// Nil-rated/exempt/non-GST supply description line.
    NilExemptSupplies {
        inter_state: bool,
        registered: bool,
    },
}

impl InvoiceTypeTag {
    /// The tag as it appears in the statutory payload.
    pub fn label(&self) -> String {
        match self {
            InvoiceTypeTag::Regular => "R".to_string(),
            InvoiceTypeTag::SezWithPayment => "SEWP".to_string(),
            InvoiceTypeTag::SezWithoutPayment => "SEWOP".to_string(),
            InvoiceTypeTag::DeemedExport => "DE".to_string(),
            InvoiceTypeTag::WithPayment => "WPAY".to_string(),
            InvoiceTypeTag::WithoutPayment => "WOPAY".to_string(),
            InvoiceTypeTag::ExportWithPayment => "EXPWP".to_string(),
            InvoiceTypeTag::ExportWithoutPayment => "EXPWOP".to_string(),
            InvoiceTypeTag::B2clNote => "B2CL".to_string(),
            InvoiceTypeTag::NilExemptSupplies {
                inter_state,
                registered,
            } => {
                let supply_type = if *inter_state { "Inter-State" } else { "Intra-State" };
                let registration = if *registered { "registered" } else { "unregistered" };
                format!("{supply_type} supplies to {registration} persons")
            }
        }
    }
}

// =============================================================================
// Classification
// =============================================================================

/// Result of classifying one transaction row.
///
/// Attached to the row in place; never recomputed within a processing
/// pass once set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: GstCategory,
    pub sub_category: GstSubCategory,
    pub invoice_type: Option<InvoiceTypeTag>,
    /// Set only for rows carrying an e-commerce operator GSTIN; such rows
    /// contribute to this bucket in addition to their primary bucket.
    pub ecommerce_supply_type: Option<GstSubCategory>,
}

// =============================================================================
// Transaction Row
// =============================================================================

/// One invoice line item, flattened from the transaction store.
///
/// Immutable once fetched, except for the `classification` slot which is
/// filled during the classification pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRow {
    /// Document name / invoice number.
    pub invoice_no: String,
    pub posting_date: NaiveDate,
    /// Counterparty registration number, if registered.
    pub party_gstin: Option<String>,
    /// Registration number the transaction was booked under.
    pub company_gstin: String,
    /// E-commerce operator registration number, if sold through one.
    pub ecommerce_gstin: Option<String>,
    /// `"24-Gujarat"` style jurisdiction code; absent values get the
    /// lenient intra-state default during classification.
    pub place_of_supply: Option<String>,
    pub gst_treatment: GstTreatment,
    pub party_gst_category: PartyGstCategory,
    /// Credit note flag.
    pub is_return: bool,
    pub is_debit_note: bool,
    pub is_reverse_charge: bool,
    /// Export (or SEZ supply) made with payment of tax.
    pub is_export_with_tax: bool,
    /// Invoice this note was raised against, if any.
    pub return_against: Option<String>,
    /// Rounded total of this document.
    pub invoice_total: f64,
    /// Rounded total of the originating invoice for notes (0 otherwise).
    pub returned_invoice_total: f64,
    pub taxable_value: f64,
    pub igst_amount: f64,
    pub cgst_amount: f64,
    pub sgst_amount: f64,
    pub cess_amount: f64,
    /// Filled by the classification pass; `None` until then.
    pub classification: Option<Classification>,
}

impl TransactionRow {
    /// True when the counterparty has a registration number on file.
    #[inline]
    pub fn has_party_gstin(&self) -> bool {
        self.party_gstin.as_deref().is_some_and(|g| !g.is_empty())
    }

    /// True when the row references an e-commerce operator.
    #[inline]
    pub fn has_ecommerce_gstin(&self) -> bool {
        self.ecommerce_gstin
            .as_deref()
            .is_some_and(|g| !g.is_empty())
    }

    /// Tax amounts of this line as an accumulator value.
    pub fn amounts(&self) -> TaxAmounts {
        TaxAmounts {
            taxable_value: self.taxable_value,
            igst: self.igst_amount,
            cgst: self.cgst_amount,
            sgst: self.sgst_amount,
            cess: self.cess_amount,
        }
    }

    /// State code of the company registration.
    pub fn company_state_code(&self) -> &str {
        gstin_state_code(&self.company_gstin)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_b2c_limit_cutoff() {
        let before = NaiveDate::from_ymd_opt(2024, 10, 31).unwrap();
        let on = NaiveDate::from_ymd_opt(2024, 11, 1).unwrap();
        let after = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();

        assert_eq!(b2c_limit(before), 250_000.0);
        assert_eq!(b2c_limit(on), 100_000.0);
        assert_eq!(b2c_limit(after), 100_000.0);
    }

    #[test]
    fn test_state_code_helpers() {
        assert_eq!(gstin_state_code("24AAACC1206D1ZM"), "24");
        assert_eq!(pos_state_code("24-Gujarat"), "24");
        assert_eq!(pos_state_code("96-Other Countries"), "96");
    }

    #[test]
    fn test_doc_status_codes() {
        assert_eq!(DocStatus::from_code(0), DocStatus::Draft);
        assert_eq!(DocStatus::from_code(1), DocStatus::Submitted);
        assert_eq!(DocStatus::from_code(2), DocStatus::Cancelled);
        assert_eq!(DocStatus::Submitted.code(), 1);
    }

    #[test]
    fn test_nil_exempt_invoice_type_labels() {
        let tag = InvoiceTypeTag::NilExemptSupplies {
            inter_state: true,
            registered: false,
        };
        assert_eq!(tag.label(), "Inter-State supplies to unregistered persons");

        let tag = InvoiceTypeTag::NilExemptSupplies {
            inter_state: false,
            registered: true,
        };
        assert_eq!(tag.label(), "Intra-State supplies to registered persons");
    }

    #[test]
    fn test_category_sub_categories_cover_all() {
        let mut seen: Vec<GstSubCategory> = GstCategory::ALL
            .iter()
            .flat_map(|c| c.sub_categories().iter().copied())
            .collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), GstSubCategory::ALL.len());
    }
}
