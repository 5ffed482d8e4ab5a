//! # Summary Aggregator
//!
//! Folds classified transaction rows into per-sub-category totals and
//! renders the two-level overview used by the return preparer.
//!
//! ## Aggregation Invariants
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Aggregation Rules                                  │
//! │                                                                         │
//! │  • Amounts accumulate per ITEM row (an invoice may span many rows)     │
//! │  • Record counts are per unique INVOICE NUMBER, not per row            │
//! │  • Rows sold through an e-commerce operator contribute TWICE:          │
//! │      once to their primary bucket, once to the e-commerce bucket       │
//! │  • The overview therefore over-counts; a diagnostic row with a         │
//! │      NEGATIVE record count surfaces the overlap explicitly             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Serialize;

use crate::amount::TaxAmounts;
use crate::error::{CoreError, CoreResult};
use crate::types::{GstCategory, GstSubCategory, TransactionRow};

/// Diagnostic row label for invoices counted in more than one
/// top-level bucket. Wording kept as filed returns expect it.
pub const OVERLAP_DESCRIPTION: &str =
    "Overlaping Invoices in Nil-Rated/Exempt/Non-GST and E-commerce Sales";

// =============================================================================
// Sub-Category Totals
// =============================================================================

/// Running totals for one sub-category bucket.
#[derive(Debug, Clone, Default)]
pub struct SubCategoryTotals {
    pub amounts: TaxAmounts,
    /// Invoice numbers seen in this bucket. Record counts come from this
    /// set so multi-item invoices count once.
    pub unique_invoices: BTreeSet<String>,
}

impl SubCategoryTotals {
    pub fn no_of_records(&self) -> i64 {
        self.unique_invoices.len() as i64
    }

    fn absorb(&mut self, row: &TransactionRow) {
        self.amounts += row.amounts();
        self.unique_invoices.insert(row.invoice_no.clone());
    }
}

/// Totals for every sub-category, including empty buckets.
#[derive(Debug, Clone)]
pub struct SubCategorySummary {
    buckets: BTreeMap<GstSubCategory, SubCategoryTotals>,
}

impl SubCategorySummary {
    pub fn bucket(&self, sub_category: GstSubCategory) -> &SubCategoryTotals {
        // Every sub-category is seeded in summarize(), so the lookup
        // cannot miss.
        &self.buckets[&sub_category]
    }
}

/// Folds a classified row set into per-sub-category totals.
///
/// Every row must already carry a classification; an unclassified row is
/// an internal-consistency error, never silently skipped.
pub fn summarize(rows: &[TransactionRow]) -> CoreResult<SubCategorySummary> {
    let mut buckets: BTreeMap<GstSubCategory, SubCategoryTotals> = GstSubCategory::ALL
        .iter()
        .map(|sc| (*sc, SubCategoryTotals::default()))
        .collect();

    for row in rows {
        let cls = row
            .classification
            .as_ref()
            .ok_or_else(|| CoreError::NotClassified {
                invoice_no: row.invoice_no.clone(),
            })?;

        if let Some(bucket) = buckets.get_mut(&cls.sub_category) {
            bucket.absorb(row);
        }

        // Dual contribution for e-commerce operator sales
        if let Some(ecommerce) = cls.ecommerce_supply_type {
            if let Some(bucket) = buckets.get_mut(&ecommerce) {
                bucket.absorb(row);
            }
        }
    }

    Ok(SubCategorySummary { buckets })
}

// =============================================================================
// Overview
// =============================================================================

/// One rendered overview line. `indent` 0 is a category total, 1 a
/// sub-category detail line beneath it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewRow {
    pub description: String,
    pub no_of_records: i64,
    pub indent: u8,
    #[serde(flatten)]
    pub amounts: TaxAmounts,
}

/// Renders the two-level category overview.
///
/// Category rows (indent 0) are sums of their sub-category rows
/// (indent 1); empty sub-categories still render with zero totals. The
/// e-commerce category only renders when operator sales are enabled for
/// the company. A trailing diagnostic row carries a negative record
/// count for invoices present in more than one top-level bucket.
pub fn overview(summary: &SubCategorySummary, include_ecommerce: bool) -> Vec<OverviewRow> {
    let mut rows = Vec::new();

    for category in GstCategory::ALL {
        if category == GstCategory::EcommerceSupply && !include_ecommerce {
            continue;
        }

        let mut category_records = 0;
        let mut category_amounts = TaxAmounts::zero();
        let category_index = rows.len();
        rows.push(OverviewRow {
            description: category.description().to_string(),
            no_of_records: 0,
            indent: 0,
            amounts: TaxAmounts::zero(),
        });

        for sub_category in category.sub_categories() {
            let bucket = summary.bucket(*sub_category);
            category_records += bucket.no_of_records();
            category_amounts += bucket.amounts;
            rows.push(OverviewRow {
                description: sub_category.description().to_string(),
                no_of_records: bucket.no_of_records(),
                indent: 1,
                amounts: bucket.amounts,
            });
        }

        rows[category_index].no_of_records = category_records;
        rows[category_index].amounts = category_amounts;
    }

    if let Some(overlap) = overlap_row(summary) {
        rows.push(overlap);
    }

    rows
}

/// Counts invoices that appear in more than one of the three disjoint
/// top-level groupings: nil/exempt, e-commerce, and everything else.
///
/// Pairwise intersections are summed, so an invoice present in all
/// three groups is counted once per overlapping pair.
fn overlap_row(summary: &SubCategorySummary) -> Option<OverviewRow> {
    let nil_exempt = &summary.bucket(GstSubCategory::NilExempt).unique_invoices;

    let mut ecommerce: BTreeSet<&String> = BTreeSet::new();
    ecommerce.extend(&summary.bucket(GstSubCategory::EcommerceTcs).unique_invoices);
    ecommerce.extend(
        &summary
            .bucket(GstSubCategory::EcommerceOperatorLiable)
            .unique_invoices,
    );

    let mut taxable: BTreeSet<&String> = BTreeSet::new();
    for sub_category in GstSubCategory::ALL {
        if matches!(
            sub_category,
            GstSubCategory::NilExempt
                | GstSubCategory::EcommerceTcs
                | GstSubCategory::EcommerceOperatorLiable
        ) {
            continue;
        }
        taxable.extend(&summary.bucket(sub_category).unique_invoices);
    }

    let nil_exempt: BTreeSet<&String> = nil_exempt.iter().collect();
    let groups = [&nil_exempt, &ecommerce, &taxable];

    let mut overlapping = 0_i64;
    for i in 0..groups.len() {
        for j in (i + 1)..groups.len() {
            overlapping += groups[i].intersection(groups[j]).count() as i64;
        }
    }

    if overlapping == 0 {
        return None;
    }

    Some(OverviewRow {
        description: OVERLAP_DESCRIPTION.to_string(),
        no_of_records: -overlapping,
        indent: 0,
        amounts: TaxAmounts::zero(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
