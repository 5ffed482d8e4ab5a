//! # Document Series Fetchers
//!
//! Rows for the documents-issued summary. Unlike the transaction
//! fetchers these include drafts and cancelled documents, since the
//! summary reports every serial consumed in the period. Opening and
//! self-billed documents are fetched too and excluded downstream,
//! where they stay visible as exclusion buckets.

use sqlx::{FromRow, SqlitePool};

use gstr_core::docseries::{DocumentRow, DocumentSource};
use gstr_core::types::DocStatus;

use crate::error::DbResult;
use crate::repository::ReportScope;

#[derive(Debug, FromRow)]
struct DocumentRecord {
    name: String,
    naming_series: String,
    docstatus: i64,
    amended_from: Option<String>,
    same_gstin_billing: bool,
    is_opening: bool,
    is_return: bool,
    is_debit_note: bool,
}

impl DocumentRecord {
    fn into_row(self, source: DocumentSource) -> DocumentRow {
        DocumentRow {
            name: self.name,
            naming_series: self.naming_series,
            status: DocStatus::from_code(self.docstatus),
            amended_from: self.amended_from.filter(|a| !a.is_empty()),
            same_gstin_billing: self.same_gstin_billing,
            is_opening: self.is_opening,
            is_return: self.is_return,
            is_debit_note: self.is_debit_note,
            source,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: SqlitePool,
}

impl DocumentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        DocumentRepository { pool }
    }

    /// All sales documents in the period, name order, every docstatus.
    pub async fn fetch_sales_documents(&self, scope: &ReportScope) -> DbResult<Vec<DocumentRow>> {
        let records = sqlx::query_as::<_, DocumentRecord>(
            r#"
            SELECT
                name,
                naming_series,
                docstatus,
                amended_from,
                IFNULL(party_gstin, '') = company_gstin AS same_gstin_billing,
                is_opening,
                is_return,
                is_debit_note
            FROM sales_invoices
            WHERE posting_date BETWEEN ?1 AND ?2
              AND company = ?3
              AND company_gstin = ?4
            ORDER BY name
            "#,
        )
        .bind(scope.from_date)
        .bind(scope.to_date)
        .bind(&scope.company)
        .bind(&scope.company_gstin)
        .fetch_all(&self.pool)
        .await?;

        Ok(records
            .into_iter()
            .map(|r| r.into_row(DocumentSource::Sales))
            .collect())
    }

    /// Self-invoices raised for reverse-charge purchases from
    /// unregistered suppliers, name order, every docstatus.
    pub async fn fetch_purchase_documents(
        &self,
        scope: &ReportScope,
    ) -> DbResult<Vec<DocumentRow>> {
        let records = sqlx::query_as::<_, DocumentRecord>(
            r#"
            SELECT
                name,
                naming_series,
                docstatus,
                amended_from,
                IFNULL(supplier_gstin, '') = company_gstin AS same_gstin_billing,
                is_opening,
                0 AS is_return,
                0 AS is_debit_note
            FROM purchase_invoices
            WHERE posting_date BETWEEN ?1 AND ?2
              AND company = ?3
              AND company_gstin = ?4
              AND is_reverse_charge = 1
              AND IFNULL(supplier_gstin, '') = ''
            ORDER BY name
            "#,
        )
        .bind(scope.from_date)
        .bind(scope.to_date)
        .bind(&scope.company)
        .bind(&scope.company_gstin)
        .fetch_all(&self.pool)
        .await?;

        Ok(records
            .into_iter()
            .map(|r| r.into_row(DocumentSource::Purchase))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::transactions::{NewPurchaseInvoice, NewSalesInvoice};
    use chrono::NaiveDate;

    const COMPANY: &str = "Test Traders Pvt Ltd";
    const GSTIN: &str = "24AAACC1206D1ZM";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scope() -> ReportScope {
        ReportScope::new(COMPANY, GSTIN, date(2025, 1, 1), date(2025, 1, 31))
    }

    #[tokio::test]
    async fn test_all_statuses_fetched_in_name_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        for (name, status) in [
            ("SINV-00002", DocStatus::Cancelled),
            ("SINV-00001", DocStatus::Submitted),
            ("SINV-00003", DocStatus::Draft),
        ] {
            let mut invoice = NewSalesInvoice::new(name, date(2025, 1, 10), COMPANY, GSTIN);
            invoice.docstatus = status;
            db.transactions().insert_sales_invoice(&invoice).await.unwrap();
        }

        let docs = db.documents().fetch_sales_documents(&scope()).await.unwrap();
        let names: Vec<&str> = docs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["SINV-00001", "SINV-00002", "SINV-00003"]);
        assert_eq!(docs[1].status, DocStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_purchase_fetch_limited_to_unregistered_reverse_charge() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut self_invoice =
            NewPurchaseInvoice::new("PINV-00001", date(2025, 1, 5), COMPANY, GSTIN);
        self_invoice.is_reverse_charge = true;
        db.transactions().insert_purchase_invoice(&self_invoice).await.unwrap();

        // registered supplier, not a self-invoice
        let mut registered =
            NewPurchaseInvoice::new("PINV-00002", date(2025, 1, 6), COMPANY, GSTIN);
        registered.is_reverse_charge = true;
        registered.supplier_gstin = Some("27AAACM1206D1ZK".to_string());
        db.transactions().insert_purchase_invoice(&registered).await.unwrap();

        // forward-charge purchase
        let plain = NewPurchaseInvoice::new("PINV-00003", date(2025, 1, 7), COMPANY, GSTIN);
        db.transactions().insert_purchase_invoice(&plain).await.unwrap();

        let docs = db.documents().fetch_purchase_documents(&scope()).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].name, "PINV-00001");
        assert_eq!(docs[0].source, DocumentSource::Purchase);
    }
}
