//! # Invoice Classifier
//!
//! Pure-function predicate engine assigning exactly one regulatory
//! category (and sub-category) to each transaction row.
//!
//! ## Predicate Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Category Chain (FIRST MATCH WINS)                          │
//! │                                                                         │
//! │   1. B2B              registered, not a note, not nil/exempt           │
//! │   2. B2C (Large)      unregistered, inter-state, above period limit    │
//! │   3. Exports          overseas party, PoS 96-Other Countries           │
//! │   4. B2C (Others)     unregistered remainder                           │
//! │   5. Nil/Exempt       nil-rated, exempted or non-GST treatment         │
//! │   6. CDNR             credit/debit note, registered party              │
//! │   7. CDNUR            credit/debit note, unregistered (export/B2CL)    │
//! │   8. E-commerce       any row with an e-commerce operator GSTIN        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The order is a documented invariant, not an implementation accident:
//! the predicates are not independently exhaustive. A credit note sold
//! through an e-commerce operator must land in CDNR/CDNUR, not in the
//! e-commerce category, and a nil-rated note must land in Nil/Exempt
//! before the note categories are considered. Reordering the chain
//! changes real classifications (covered by tests below).
//!
//! ## Condition Cache
//! Predicates share sub-conditions (`is_export`, `is_inter_state`, ...).
//! Each row gets a fresh [`ConditionCache`] so every sub-condition is
//! computed at most once per row per processing pass.

use crate::error::{CoreError, CoreResult};
use crate::types::{
    b2c_limit, pos_state_code, Classification, GstCategory, GstSubCategory, GstTreatment,
    InvoiceTypeTag, PartyGstCategory, TransactionRow, OTHER_COUNTRIES_POS,
};

// =============================================================================
// Condition Cache
// =============================================================================

/// Per-row memoized boolean conditions.
///
/// Cleared (re-created) at the start of each row's processing pass;
/// replaces ad-hoc per-call memoization with an explicit value object.
#[derive(Debug, Default)]
pub struct ConditionCache {
    nil_rated: Option<bool>,
    exempted: Option<bool>,
    non_gst: Option<bool>,
    nil_exempt_non_gst: Option<bool>,
    cn_dn: Option<bool>,
    gstin_not_export: Option<bool>,
    export: Option<bool>,
    inter_state: Option<bool>,
    b2cl_invoice: Option<bool>,
    b2cl_note: Option<bool>,
}

impl ConditionCache {
    pub fn new() -> Self {
        ConditionCache::default()
    }

    fn is_nil_rated(&mut self, row: &TransactionRow) -> bool {
        *self
            .nil_rated
            .get_or_insert(row.gst_treatment == GstTreatment::NilRated)
    }

    fn is_exempted(&mut self, row: &TransactionRow) -> bool {
        *self
            .exempted
            .get_or_insert(row.gst_treatment == GstTreatment::Exempted)
    }

    fn is_non_gst(&mut self, row: &TransactionRow) -> bool {
        *self
            .non_gst
            .get_or_insert(row.gst_treatment == GstTreatment::NonGst)
    }

    /// Nil-rated, exempted or non-GST treatment, excluding exports.
    ///
    /// Used as a guard by every other category; the Nil/Exempt category
    /// predicate itself does NOT exclude exports.
    fn is_nil_exempt_non_gst(&mut self, row: &TransactionRow) -> bool {
        if let Some(v) = self.nil_exempt_non_gst {
            return v;
        }
        let v = !self.is_export(row)
            && (self.is_nil_rated(row) || self.is_exempted(row) || self.is_non_gst(row));
        self.nil_exempt_non_gst = Some(v);
        v
    }

    fn is_cn_dn(&mut self, row: &TransactionRow) -> bool {
        *self.cn_dn.get_or_insert(row.is_return || row.is_debit_note)
    }

    fn has_gstin_and_is_not_export(&mut self, row: &TransactionRow) -> bool {
        if let Some(v) = self.gstin_not_export {
            return v;
        }
        let v = row.has_party_gstin() && !self.is_export(row);
        self.gstin_not_export = Some(v);
        v
    }

    fn is_export(&mut self, row: &TransactionRow) -> bool {
        *self.export.get_or_insert(
            row.place_of_supply.as_deref() == Some(OTHER_COUNTRIES_POS)
                && row.party_gst_category == PartyGstCategory::Overseas,
        )
    }

    /// Inter-state supply: company state code differs from the
    /// place-of-supply state code.
    ///
    /// Defaults to false when place of supply is absent - a documented
    /// lenient default, not a data-quality error. Such rows are listed
    /// separately for manual review by the assembler.
    fn is_inter_state(&mut self, row: &TransactionRow) -> bool {
        if let Some(v) = self.inter_state {
            return v;
        }
        let v = match row.place_of_supply.as_deref() {
            None | Some("") => false,
            Some(pos) => row.company_state_code() != pos_state_code(pos),
        };
        self.inter_state = Some(v);
        v
    }

    /// B2C-Large check for plain invoices: |total| strictly above the
    /// period-dependent limit, and inter-state.
    fn is_b2cl_invoice(&mut self, row: &TransactionRow) -> bool {
        if let Some(v) = self.b2cl_invoice {
            return v;
        }
        let v = row.invoice_total.abs() > b2c_limit(row.posting_date) && self.is_inter_state(row);
        self.b2cl_invoice = Some(v);
        v
    }

    /// B2C-Large check for credit/debit notes.
    ///
    /// For a note raised against an invoice, either total may be
    /// understated in partial-note cases, so the larger of the two
    /// absolute totals is compared against the limit.
    fn is_b2cl_note(&mut self, row: &TransactionRow) -> bool {
        if let Some(v) = self.b2cl_note {
            return v;
        }
        let invoice_total = if row.return_against.is_some() {
            row.invoice_total.abs().max(row.returned_invoice_total.abs())
        } else {
            row.invoice_total
        };
        let v = invoice_total.abs() > b2c_limit(row.posting_date) && self.is_inter_state(row);
        self.b2cl_note = Some(v);
        v
    }
}

// =============================================================================
// Category Predicates
// =============================================================================

fn is_b2b(cache: &mut ConditionCache, row: &TransactionRow) -> bool {
    !cache.is_nil_exempt_non_gst(row)
        && !cache.is_cn_dn(row)
        && cache.has_gstin_and_is_not_export(row)
}

fn is_b2c_large(cache: &mut ConditionCache, row: &TransactionRow) -> bool {
    !cache.is_nil_exempt_non_gst(row)
        && !cache.is_cn_dn(row)
        && !cache.has_gstin_and_is_not_export(row)
        && !cache.is_export(row)
        && cache.is_b2cl_invoice(row)
}

fn is_export(cache: &mut ConditionCache, row: &TransactionRow) -> bool {
    !cache.is_nil_exempt_non_gst(row) && !cache.is_cn_dn(row) && cache.is_export(row)
}

fn is_b2c_small(cache: &mut ConditionCache, row: &TransactionRow) -> bool {
    !cache.is_nil_exempt_non_gst(row)
        && !cache.has_gstin_and_is_not_export(row)
        && !cache.is_export(row)
        && (!cache.is_b2cl_note(row) || !cache.is_b2cl_invoice(row))
}

fn is_nil_exempt(cache: &mut ConditionCache, row: &TransactionRow) -> bool {
    cache.is_nil_rated(row) || cache.is_exempted(row) || cache.is_non_gst(row)
}

fn is_cdnr(cache: &mut ConditionCache, row: &TransactionRow) -> bool {
    !cache.is_nil_exempt_non_gst(row)
        && cache.is_cn_dn(row)
        && cache.has_gstin_and_is_not_export(row)
}

fn is_cdnur(cache: &mut ConditionCache, row: &TransactionRow) -> bool {
    !cache.is_nil_exempt_non_gst(row)
        && cache.is_cn_dn(row)
        && !cache.has_gstin_and_is_not_export(row)
        && (cache.is_export(row) || cache.is_b2cl_note(row))
}

fn is_ecommerce(_cache: &mut ConditionCache, row: &TransactionRow) -> bool {
    row.has_ecommerce_gstin()
}

// =============================================================================
// Sub-Category Assignment
// =============================================================================
// Pure lookups over party category and row flags - no predicate chains.

/// Shared by B2B and CDNR: deemed export / SEZ / reverse charge / regular.
fn assign_b2b_cdnr(
    _cache: &mut ConditionCache,
    row: &TransactionRow,
) -> (GstSubCategory, Option<InvoiceTypeTag>) {
    match row.party_gst_category {
        PartyGstCategory::DeemedExport => (
            GstSubCategory::DeemedExports,
            Some(InvoiceTypeTag::DeemedExport),
        ),
        PartyGstCategory::Sez => {
            if row.is_export_with_tax {
                (
                    GstSubCategory::SezWithPayment,
                    Some(InvoiceTypeTag::SezWithPayment),
                )
            } else {
                (
                    GstSubCategory::SezWithoutPayment,
                    Some(InvoiceTypeTag::SezWithoutPayment),
                )
            }
        }
        _ if row.is_reverse_charge => (
            GstSubCategory::B2bReverseCharge,
            Some(InvoiceTypeTag::Regular),
        ),
        _ => (GstSubCategory::B2bRegular, Some(InvoiceTypeTag::Regular)),
    }
}

fn assign_b2cl(
    _cache: &mut ConditionCache,
    _row: &TransactionRow,
) -> (GstSubCategory, Option<InvoiceTypeTag>) {
    // No invoice type for B2C (Large)
    (GstSubCategory::B2cLarge, None)
}

fn assign_export(
    _cache: &mut ConditionCache,
    row: &TransactionRow,
) -> (GstSubCategory, Option<InvoiceTypeTag>) {
    if row.is_export_with_tax {
        (
            GstSubCategory::ExportWithPayment,
            Some(InvoiceTypeTag::WithPayment),
        )
    } else {
        (
            GstSubCategory::ExportWithoutPayment,
            Some(InvoiceTypeTag::WithoutPayment),
        )
    }
}

fn assign_b2cs(
    _cache: &mut ConditionCache,
    _row: &TransactionRow,
) -> (GstSubCategory, Option<InvoiceTypeTag>) {
    (GstSubCategory::B2cSmall, None)
}

fn assign_nil_exempt(
    cache: &mut ConditionCache,
    row: &TransactionRow,
) -> (GstSubCategory, Option<InvoiceTypeTag>) {
    let registered = cache.has_gstin_and_is_not_export(row);
    let inter_state = cache.is_inter_state(row);
    (
        GstSubCategory::NilExempt,
        Some(InvoiceTypeTag::NilExemptSupplies {
            inter_state,
            registered,
        }),
    )
}

fn assign_cdnr(
    cache: &mut ConditionCache,
    row: &TransactionRow,
) -> (GstSubCategory, Option<InvoiceTypeTag>) {
    let (_, invoice_type) = assign_b2b_cdnr(cache, row);
    (GstSubCategory::Cdnr, invoice_type)
}

fn assign_cdnur(
    cache: &mut ConditionCache,
    row: &TransactionRow,
) -> (GstSubCategory, Option<InvoiceTypeTag>) {
    let invoice_type = if cache.is_export(row) {
        if row.is_export_with_tax {
            InvoiceTypeTag::ExportWithPayment
        } else {
            InvoiceTypeTag::ExportWithoutPayment
        }
    } else {
        InvoiceTypeTag::B2clNote
    };
    (GstSubCategory::Cdnur, Some(invoice_type))
}

fn assign_ecommerce(
    _cache: &mut ConditionCache,
    row: &TransactionRow,
) -> (GstSubCategory, Option<InvoiceTypeTag>) {
    (ecommerce_supply_type(row), None)
}

/// E-commerce supply bucket: operator pays tax u/s 9(5) for
/// reverse-charge supplies, otherwise operator collects TCS u/s 52.
pub fn ecommerce_supply_type(row: &TransactionRow) -> GstSubCategory {
    if row.is_reverse_charge {
        GstSubCategory::EcommerceOperatorLiable
    } else {
        GstSubCategory::EcommerceTcs
    }
}

// =============================================================================
// Category Chain
// =============================================================================

/// One entry of the ordered classification chain.
pub struct CategoryRule {
    pub category: GstCategory,
    pub matches: fn(&mut ConditionCache, &TransactionRow) -> bool,
    pub assign: fn(&mut ConditionCache, &TransactionRow) -> (GstSubCategory, Option<InvoiceTypeTag>),
}

/// The classification chain, in declared priority order.
///
/// The order is load-bearing (see module docs). Do not reorder.
pub const CATEGORY_CHAIN: [CategoryRule; 8] = [
    CategoryRule {
        category: GstCategory::B2b,
        matches: is_b2b,
        assign: assign_b2b_cdnr,
    },
    CategoryRule {
        category: GstCategory::B2cLarge,
        matches: is_b2c_large,
        assign: assign_b2cl,
    },
    CategoryRule {
        category: GstCategory::Export,
        matches: is_export,
        assign: assign_export,
    },
    CategoryRule {
        category: GstCategory::B2cSmall,
        matches: is_b2c_small,
        assign: assign_b2cs,
    },
    CategoryRule {
        category: GstCategory::NilExempt,
        matches: is_nil_exempt,
        assign: assign_nil_exempt,
    },
    CategoryRule {
        category: GstCategory::CdnRegistered,
        matches: is_cdnr,
        assign: assign_cdnr,
    },
    CategoryRule {
        category: GstCategory::CdnUnregistered,
        matches: is_cdnur,
        assign: assign_cdnur,
    },
    CategoryRule {
        category: GstCategory::EcommerceSupply,
        matches: is_ecommerce,
        assign: assign_ecommerce,
    },
];

/// Classifies one row against an explicit chain (first match wins).
///
/// Kept separate from [`classify_row`] so tests can prove the chain
/// order matters by running a permuted chain.
fn classify_row_with_chain(row: &mut TransactionRow, chain: &[CategoryRule]) -> CoreResult<()> {
    // Fresh cache per row: conditions are memoized within one pass only
    let mut cache = ConditionCache::new();

    for rule in chain {
        if !(rule.matches)(&mut cache, row) {
            continue;
        }

        let (sub_category, invoice_type) = (rule.assign)(&mut cache, row);
        let ecommerce = row.has_ecommerce_gstin().then(|| ecommerce_supply_type(row));
        row.classification = Some(Classification {
            category: rule.category,
            sub_category,
            invoice_type,
            ecommerce_supply_type: ecommerce,
        });
        return Ok(());
    }

    Err(CoreError::UnclassifiableInvoice {
        invoice_no: row.invoice_no.clone(),
    })
}

/// Classifies one transaction row in place.
///
/// Every row lands in exactly one category; a fall-through is an
/// internal-consistency error that aborts the run.
pub fn classify_row(row: &mut TransactionRow) -> CoreResult<()> {
    classify_row_with_chain(row, &CATEGORY_CHAIN)
}

/// Classifies a full row set in place. Fails on the first
/// unclassifiable row - partial classification is never usable.
pub fn classify_all(rows: &mut [TransactionRow]) -> CoreResult<()> {
    for row in rows.iter_mut() {
        if row.classification.is_none() {
            classify_row(row)?;
        }
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
