//! # Inward Nil-Rated / Exempt / Non-GST Queries
//!
//! Section 5 rows: purchase item values that carry no tax, either
//! because the item is nil-rated, exempted or non-GST, or because the
//! supplier is under the composition scheme.

use sqlx::{FromRow, SqlitePool};

use gstr_core::types::GstTreatment;

use crate::error::DbResult;
use crate::repository::ReportScope;

/// One untaxed inward item row. When the place of supply is missing
/// the assembler falls back to the supplier's state code.
#[derive(Debug, Clone, FromRow)]
pub struct InwardNilExemptRow {
    pub place_of_supply: Option<String>,
    pub supplier_state_code: Option<String>,
    pub taxable_value: f64,
    pub gst_treatment: GstTreatment,
}

#[derive(Debug, Clone)]
pub struct InwardSupplyRepository {
    pool: SqlitePool,
}

impl InwardSupplyRepository {
    pub fn new(pool: SqlitePool) -> Self {
        InwardSupplyRepository { pool }
    }

    /// Untaxed inward item rows for the scope. Composition-supplier
    /// purchases qualify even when the item itself is marked taxable.
    pub async fn fetch_nil_exempt(&self, scope: &ReportScope) -> DbResult<Vec<InwardNilExemptRow>> {
        let rows = sqlx::query_as::<_, InwardNilExemptRow>(
            r#"
            SELECT
                pi.place_of_supply,
                pi.supplier_state_code,
                item.taxable_value,
                item.gst_treatment
            FROM purchase_invoices pi
            JOIN purchase_invoice_items item ON item.parent = pi.name
            WHERE pi.docstatus = 1
              AND pi.is_opening = 0
              AND pi.posting_date BETWEEN ?1 AND ?2
              AND pi.company = ?3
              AND pi.company_gstin = ?4
              AND pi.company_gstin != IFNULL(pi.supplier_gstin, '')
              AND (item.gst_treatment != 'Taxable' OR pi.gst_category = 'Registered Composition')
            ORDER BY pi.posting_date, pi.name
            "#,
        )
        .bind(scope.from_date)
        .bind(scope.to_date)
        .bind(&scope.company)
        .bind(&scope.company_gstin)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
