//! # GSTR-1 Overview Builder
//!
//! Fetch, classify, aggregate: the outward-supply overview grouped by
//! category and sub-category, plus the documents-issued summary built
//! from the period's document series.

use tracing::info;

use gstr_core::aggregate::{overview, summarize, OverviewRow};
use gstr_core::classify::classify_all;
use gstr_core::docseries::{summarize_documents, DocumentSeries};
use gstr_db::Database;

use crate::config::ReportContext;
use crate::error::EngineResult;

/// Builds the outward-supply overview and document summary for one
/// period.
pub struct OverviewBuilder<'a> {
    db: &'a Database,
    ctx: &'a ReportContext,
}

impl<'a> OverviewBuilder<'a> {
    pub fn new(db: &'a Database, ctx: &'a ReportContext) -> Self {
        OverviewBuilder { db, ctx }
    }

    /// Classifies every sales row of the period and renders the
    /// two-level category overview, overlap diagnostic included.
    pub async fn build_overview(&self) -> EngineResult<Vec<OverviewRow>> {
        let scope = self.ctx.scope();
        let mut rows = self.db.transactions().fetch_sales(&scope, false).await?;

        classify_all(&mut rows)?;
        let summary = summarize(&rows)?;
        let overview_rows = overview(&summary, self.ctx.enable_ecommerce_supplies);

        info!(
            invoice_rows = rows.len(),
            overview_rows = overview_rows.len(),
            "Built outward-supply overview"
        );
        Ok(overview_rows)
    }

    /// Summarizes the document series issued in the period: sales
    /// invoices, notes, and self-invoices for unregistered
    /// reverse-charge purchases.
    pub async fn build_document_summary(&self) -> EngineResult<Vec<DocumentSeries>> {
        let scope = self.ctx.scope();

        let mut docs = self.db.documents().fetch_sales_documents(&scope).await?;
        docs.extend(self.db.documents().fetch_purchase_documents(&scope).await?);

        Ok(summarize_documents(docs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use gstr_core::docseries::NatureOfDocument;
    use gstr_db::pool::DbConfig;
    use gstr_db::repository::transactions::{NewInvoiceItem, NewSalesInvoice};

    const COMPANY: &str = "Test Traders Pvt Ltd";
    const GSTIN: &str = "24AAACC1206D1ZM";

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn ctx() -> ReportContext {
        ReportContext::for_month(COMPANY, GSTIN, 2025, 1).unwrap()
    }

    #[tokio::test]
    async fn test_overview_totals_reconcile_with_input() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        // B2C intra-state sale
        let mut b2c = NewSalesInvoice::new("SINV-00001", date(10), COMPANY, GSTIN);
        b2c.place_of_supply = Some("24-Gujarat".to_string());
        b2c.items = vec![NewInvoiceItem::taxable(1000.0, 0.0, 90.0, 90.0)];
        db.transactions().insert_sales_invoice(&b2c).await.unwrap();

        // B2B sale to a registered party
        let mut b2b = NewSalesInvoice::new("SINV-00002", date(11), COMPANY, GSTIN);
        b2b.gst_category = gstr_core::types::PartyGstCategory::RegisteredRegular;
        b2b.party_gstin = Some("27AAACM1206D1ZK".to_string());
        b2b.place_of_supply = Some("27-Maharashtra".to_string());
        b2b.items = vec![NewInvoiceItem::taxable(5000.0, 900.0, 0.0, 0.0)];
        db.transactions().insert_sales_invoice(&b2b).await.unwrap();

        let ctx = ctx();
        let rows = OverviewBuilder::new(&db, &ctx).build_overview().await.unwrap();

        // category rows (indent 0) sum to the seeded taxable value
        let category_taxable: f64 = rows
            .iter()
            .filter(|r| r.indent == 0 && r.no_of_records >= 0)
            .map(|r| r.amounts.taxable_value)
            .sum();
        assert_eq!(category_taxable, 6000.0);

        let b2b_row = rows
            .iter()
            .find(|r| r.indent == 0 && r.description.contains("B2B"))
            .unwrap();
        assert_eq!(b2b_row.no_of_records, 1);
        assert_eq!(b2b_row.amounts.igst, 900.0);
    }

    #[tokio::test]
    async fn test_document_summary_covers_notes_and_invoices() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        for name in ["SINV-00001", "SINV-00002"] {
            let mut invoice = NewSalesInvoice::new(name, date(10), COMPANY, GSTIN);
            invoice.place_of_supply = Some("24-Gujarat".to_string());
            db.transactions().insert_sales_invoice(&invoice).await.unwrap();
        }

        let mut note = NewSalesInvoice::new("SCN-00001", date(20), COMPANY, GSTIN);
        note.naming_series = "SCN-.#####".to_string();
        note.is_return = true;
        note.return_against = Some("SINV-00001".to_string());
        db.transactions().insert_sales_invoice(&note).await.unwrap();

        let ctx = ctx();
        let summary = OverviewBuilder::new(&db, &ctx)
            .build_document_summary()
            .await
            .unwrap();

        let invoices = summary
            .iter()
            .find(|s| s.nature_of_document == NatureOfDocument::OutwardInvoice)
            .unwrap();
        assert_eq!(invoices.total_issued, 2);
        assert_eq!(invoices.from_serial_no, "SINV-00001");
        assert_eq!(invoices.to_serial_no, "SINV-00002");

        let notes = summary
            .iter()
            .find(|s| s.nature_of_document == NatureOfDocument::CreditNote)
            .unwrap();
        assert_eq!(notes.total_issued, 1);
    }
}
