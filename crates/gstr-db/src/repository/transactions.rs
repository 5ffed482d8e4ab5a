//! # Transaction Row Fetcher
//!
//! Flattens invoices and their item rows into [`TransactionRow`]s for
//! classification and aggregation. One database row per invoice ITEM;
//! invoice-level fields repeat on every item row.
//!
//! ## Fetch Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   sales_invoices ──┬── JOIN items        (amounts per treatment)        │
//! │                    └── LEFT JOIN self    (originating invoice total     │
//! │                                           for credit/debit notes)       │
//! │                                                                         │
//! │   purchase_invoices ── JOIN items        (reverse-charge inward rows)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use chrono::NaiveDate;
use gstr_core::types::{DocStatus, GstTreatment, PartyGstCategory, TransactionRow};

use crate::error::DbResult;
use crate::repository::ReportScope;

// =============================================================================
// Row Records
// =============================================================================

/// Raw fetched row, one per invoice item.
#[derive(Debug, FromRow)]
struct FlatRowRecord {
    invoice_no: String,
    posting_date: NaiveDate,
    party_gstin: Option<String>,
    company_gstin: String,
    ecommerce_gstin: Option<String>,
    place_of_supply: Option<String>,
    gst_category: PartyGstCategory,
    is_return: bool,
    is_debit_note: bool,
    is_reverse_charge: bool,
    is_export_with_tax: bool,
    return_against: Option<String>,
    invoice_total: f64,
    returned_invoice_total: f64,
    gst_treatment: GstTreatment,
    taxable_value: f64,
    igst_amount: f64,
    cgst_amount: f64,
    sgst_amount: f64,
    cess_amount: f64,
}

impl FlatRowRecord {
    fn into_transaction_row(self) -> TransactionRow {
        TransactionRow {
            invoice_no: self.invoice_no,
            posting_date: self.posting_date,
            party_gstin: self.party_gstin.filter(|g| !g.is_empty()),
            company_gstin: self.company_gstin,
            ecommerce_gstin: self.ecommerce_gstin.filter(|g| !g.is_empty()),
            place_of_supply: self.place_of_supply.filter(|p| !p.is_empty()),
            gst_treatment: self.gst_treatment,
            party_gst_category: self.gst_category,
            is_return: self.is_return,
            is_debit_note: self.is_debit_note,
            is_reverse_charge: self.is_reverse_charge,
            is_export_with_tax: self.is_export_with_tax,
            return_against: self.return_against.filter(|r| !r.is_empty()),
            invoice_total: self.invoice_total,
            returned_invoice_total: self.returned_invoice_total,
            taxable_value: self.taxable_value,
            igst_amount: self.igst_amount,
            cgst_amount: self.cgst_amount,
            sgst_amount: self.sgst_amount,
            cess_amount: self.cess_amount,
            classification: None,
        }
    }
}

// =============================================================================
// Insert Payloads
// =============================================================================

/// One invoice item row for seeding.
#[derive(Debug, Clone)]
pub struct NewInvoiceItem {
    pub gst_treatment: GstTreatment,
    pub taxable_value: f64,
    pub igst_amount: f64,
    pub cgst_amount: f64,
    pub sgst_amount: f64,
    pub cess_amount: f64,
}

impl NewInvoiceItem {
    /// A taxable item with the given value and taxes.
    pub fn taxable(taxable_value: f64, igst: f64, cgst: f64, sgst: f64) -> Self {
        NewInvoiceItem {
            gst_treatment: GstTreatment::Taxable,
            taxable_value,
            igst_amount: igst,
            cgst_amount: cgst,
            sgst_amount: sgst,
            cess_amount: 0.0,
        }
    }
}

/// Sales invoice seed payload, items included.
#[derive(Debug, Clone)]
pub struct NewSalesInvoice {
    pub name: String,
    pub naming_series: String,
    pub posting_date: NaiveDate,
    pub company: String,
    pub company_gstin: String,
    pub party_gstin: Option<String>,
    pub ecommerce_gstin: Option<String>,
    pub place_of_supply: Option<String>,
    pub gst_category: PartyGstCategory,
    pub is_return: bool,
    pub is_debit_note: bool,
    pub is_reverse_charge: bool,
    pub is_export_with_tax: bool,
    pub is_opening: bool,
    pub return_against: Option<String>,
    pub amended_from: Option<String>,
    pub invoice_total: f64,
    pub docstatus: DocStatus,
    pub items: Vec<NewInvoiceItem>,
}

impl NewSalesInvoice {
    /// Submitted intra-state retail invoice; edit fields as needed.
    pub fn new(
        name: &str,
        posting_date: NaiveDate,
        company: &str,
        company_gstin: &str,
    ) -> Self {
        NewSalesInvoice {
            name: name.to_string(),
            naming_series: "SINV-.#####".to_string(),
            posting_date,
            company: company.to_string(),
            company_gstin: company_gstin.to_string(),
            party_gstin: None,
            ecommerce_gstin: None,
            place_of_supply: None,
            gst_category: PartyGstCategory::Unregistered,
            is_return: false,
            is_debit_note: false,
            is_reverse_charge: false,
            is_export_with_tax: false,
            is_opening: false,
            return_against: None,
            amended_from: None,
            invoice_total: 0.0,
            docstatus: DocStatus::Submitted,
            items: Vec::new(),
        }
    }
}

/// Purchase invoice seed payload, items included.
#[derive(Debug, Clone)]
pub struct NewPurchaseInvoice {
    pub name: String,
    pub naming_series: String,
    pub posting_date: NaiveDate,
    pub company: String,
    pub company_gstin: String,
    pub supplier_gstin: Option<String>,
    pub supplier_state_code: Option<String>,
    pub place_of_supply: Option<String>,
    pub gst_category: PartyGstCategory,
    pub is_reverse_charge: bool,
    pub is_opening: bool,
    pub amended_from: Option<String>,
    pub itc_classification: Option<String>,
    pub ineligibility_reason: Option<String>,
    pub invoice_total: f64,
    pub docstatus: DocStatus,
    pub items: Vec<NewInvoiceItem>,
}

impl NewPurchaseInvoice {
    pub fn new(
        name: &str,
        posting_date: NaiveDate,
        company: &str,
        company_gstin: &str,
    ) -> Self {
        NewPurchaseInvoice {
            name: name.to_string(),
            naming_series: "PINV-.#####".to_string(),
            posting_date,
            company: company.to_string(),
            company_gstin: company_gstin.to_string(),
            supplier_gstin: None,
            supplier_state_code: None,
            place_of_supply: None,
            gst_category: PartyGstCategory::Unregistered,
            is_reverse_charge: false,
            is_opening: false,
            amended_from: None,
            itc_classification: None,
            ineligibility_reason: None,
            invoice_total: 0.0,
            docstatus: DocStatus::Submitted,
            items: Vec::new(),
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Fetches flattened transaction rows and seeds invoice fixtures.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

const SALES_FETCH_SQL: &str = r#"
SELECT
    si.name AS invoice_no,
    si.posting_date,
    si.party_gstin,
    si.company_gstin,
    si.ecommerce_gstin,
    si.place_of_supply,
    si.gst_category,
    si.is_return,
    si.is_debit_note,
    si.is_reverse_charge,
    si.is_export_with_tax,
    si.return_against,
    si.invoice_total,
    IFNULL(orig.invoice_total, 0.0) AS returned_invoice_total,
    item.gst_treatment,
    item.taxable_value,
    item.igst_amount,
    item.cgst_amount,
    item.sgst_amount,
    item.cess_amount
FROM sales_invoices si
JOIN sales_invoice_items item ON item.parent = si.name
LEFT JOIN sales_invoices orig ON orig.name = si.return_against
WHERE si.docstatus = 1
  AND si.is_opening = 0
  AND si.posting_date BETWEEN ?1 AND ?2
  AND si.company = ?3
  AND si.company_gstin = ?4
  AND si.company_gstin != IFNULL(si.party_gstin, '')
"#;

const PURCHASE_FETCH_SQL: &str = r#"
SELECT
    pi.name AS invoice_no,
    pi.posting_date,
    pi.supplier_gstin AS party_gstin,
    pi.company_gstin,
    NULL AS ecommerce_gstin,
    pi.place_of_supply,
    pi.gst_category,
    0 AS is_return,
    0 AS is_debit_note,
    pi.is_reverse_charge,
    0 AS is_export_with_tax,
    NULL AS return_against,
    pi.invoice_total,
    0.0 AS returned_invoice_total,
    item.gst_treatment,
    item.taxable_value,
    item.igst_amount,
    item.cgst_amount,
    item.sgst_amount,
    item.cess_amount
FROM purchase_invoices pi
JOIN purchase_invoice_items item ON item.parent = pi.name
WHERE pi.docstatus = 1
  AND pi.is_opening = 0
  AND pi.posting_date BETWEEN ?1 AND ?2
  AND pi.company = ?3
  AND pi.company_gstin = ?4
  AND pi.company_gstin != IFNULL(pi.supplier_gstin, '')
"#;

impl TransactionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Fetches sales transaction rows for the scope, one per item row.
    ///
    /// `reverse_charge_only` restricts to reverse-charge invoices (used
    /// by the e-commerce carve-out and tax suppression passes).
    pub async fn fetch_sales(
        &self,
        scope: &ReportScope,
        reverse_charge_only: bool,
    ) -> DbResult<Vec<TransactionRow>> {
        let mut sql = SALES_FETCH_SQL.to_string();
        if reverse_charge_only {
            sql.push_str("  AND si.is_reverse_charge = 1\n");
        }
        sql.push_str("ORDER BY si.posting_date, si.name");

        let records = sqlx::query_as::<_, FlatRowRecord>(&sql)
            .bind(scope.from_date)
            .bind(scope.to_date)
            .bind(&scope.company)
            .bind(&scope.company_gstin)
            .fetch_all(&self.pool)
            .await?;

        debug!(rows = records.len(), "Fetched sales transaction rows");

        Ok(records
            .into_iter()
            .map(FlatRowRecord::into_transaction_row)
            .collect())
    }

    /// Fetches purchase transaction rows for the scope.
    ///
    /// The reverse-charge filter is what section 3.1(d) consumes.
    pub async fn fetch_purchases(
        &self,
        scope: &ReportScope,
        reverse_charge_only: bool,
    ) -> DbResult<Vec<TransactionRow>> {
        let mut sql = PURCHASE_FETCH_SQL.to_string();
        if reverse_charge_only {
            sql.push_str("  AND pi.is_reverse_charge = 1\n");
        }
        sql.push_str("ORDER BY pi.posting_date, pi.name");

        let records = sqlx::query_as::<_, FlatRowRecord>(&sql)
            .bind(scope.from_date)
            .bind(scope.to_date)
            .bind(&scope.company)
            .bind(&scope.company_gstin)
            .fetch_all(&self.pool)
            .await?;

        debug!(rows = records.len(), "Fetched purchase transaction rows");

        Ok(records
            .into_iter()
            .map(FlatRowRecord::into_transaction_row)
            .collect())
    }

    /// Total taxable value of reverse-charge sales made through an
    /// e-commerce operator (section 3.1.1, carved out of 3.1(a)).
    pub async fn ecommerce_reverse_charge_taxable(&self, scope: &ReportScope) -> DbResult<f64> {
        let total: f64 = sqlx::query_scalar(
            r#"
            SELECT IFNULL(SUM(item.taxable_value), 0.0)
            FROM sales_invoices si
            JOIN sales_invoice_items item ON item.parent = si.name
            WHERE si.docstatus = 1
              AND si.is_opening = 0
              AND si.posting_date BETWEEN ?1 AND ?2
              AND si.company = ?3
              AND si.company_gstin = ?4
              AND si.company_gstin != IFNULL(si.party_gstin, '')
              AND si.is_reverse_charge = 1
              AND IFNULL(si.ecommerce_gstin, '') != ''
            "#,
        )
        .bind(scope.from_date)
        .bind(scope.to_date)
        .bind(&scope.company)
        .bind(&scope.company_gstin)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// Invoice names with no place of supply, excluding overseas
    /// parties (exports legitimately carry none in some flows). Listed
    /// on the report record for manual review.
    pub async fn missing_place_of_supply(&self, scope: &ReportScope) -> DbResult<Vec<String>> {
        let names: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT name FROM sales_invoices
            WHERE docstatus = 1
              AND is_opening = 0
              AND posting_date BETWEEN ?1 AND ?2
              AND company = ?3
              AND company_gstin = ?4
              AND IFNULL(place_of_supply, '') = ''
              AND gst_category != 'Overseas'
            UNION ALL
            SELECT name FROM purchase_invoices
            WHERE docstatus = 1
              AND is_opening = 0
              AND posting_date BETWEEN ?1 AND ?2
              AND company = ?3
              AND company_gstin = ?4
              AND IFNULL(place_of_supply, '') = ''
              AND gst_category != 'Overseas'
            ORDER BY name
            "#,
        )
        .bind(scope.from_date)
        .bind(scope.to_date)
        .bind(&scope.company)
        .bind(&scope.company_gstin)
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }

    // =========================================================================
    // Seeding
    // =========================================================================

    /// Inserts a sales invoice with its item rows.
    pub async fn insert_sales_invoice(&self, invoice: &NewSalesInvoice) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales_invoices (
                name, naming_series, posting_date, company, company_gstin,
                party_gstin, ecommerce_gstin, place_of_supply, gst_category,
                is_return, is_debit_note, is_reverse_charge, is_export_with_tax,
                is_opening, return_against, amended_from, invoice_total, docstatus
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
            "#,
        )
        .bind(&invoice.name)
        .bind(&invoice.naming_series)
        .bind(invoice.posting_date)
        .bind(&invoice.company)
        .bind(&invoice.company_gstin)
        .bind(&invoice.party_gstin)
        .bind(&invoice.ecommerce_gstin)
        .bind(&invoice.place_of_supply)
        .bind(invoice.gst_category)
        .bind(invoice.is_return)
        .bind(invoice.is_debit_note)
        .bind(invoice.is_reverse_charge)
        .bind(invoice.is_export_with_tax)
        .bind(invoice.is_opening)
        .bind(&invoice.return_against)
        .bind(&invoice.amended_from)
        .bind(invoice.invoice_total)
        .bind(invoice.docstatus.code())
        .execute(&mut *tx)
        .await?;

        for item in &invoice.items {
            sqlx::query(
                r#"
                INSERT INTO sales_invoice_items (
                    parent, gst_treatment, taxable_value,
                    igst_amount, cgst_amount, sgst_amount, cess_amount
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&invoice.name)
            .bind(item.gst_treatment)
            .bind(item.taxable_value)
            .bind(item.igst_amount)
            .bind(item.cgst_amount)
            .bind(item.sgst_amount)
            .bind(item.cess_amount)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Inserts a purchase invoice with its item rows.
    pub async fn insert_purchase_invoice(&self, invoice: &NewPurchaseInvoice) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO purchase_invoices (
                name, naming_series, posting_date, company, company_gstin,
                supplier_gstin, supplier_state_code, place_of_supply, gst_category,
                is_reverse_charge, is_opening, amended_from,
                itc_classification, ineligibility_reason, invoice_total, docstatus
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
        )
        .bind(&invoice.name)
        .bind(&invoice.naming_series)
        .bind(invoice.posting_date)
        .bind(&invoice.company)
        .bind(&invoice.company_gstin)
        .bind(&invoice.supplier_gstin)
        .bind(&invoice.supplier_state_code)
        .bind(&invoice.place_of_supply)
        .bind(invoice.gst_category)
        .bind(invoice.is_reverse_charge)
        .bind(invoice.is_opening)
        .bind(&invoice.amended_from)
        .bind(&invoice.itc_classification)
        .bind(&invoice.ineligibility_reason)
        .bind(invoice.invoice_total)
        .bind(invoice.docstatus.code())
        .execute(&mut *tx)
        .await?;

        for item in &invoice.items {
            sqlx::query(
                r#"
                INSERT INTO purchase_invoice_items (
                    parent, gst_treatment, taxable_value,
                    igst_amount, cgst_amount, sgst_amount, cess_amount
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&invoice.name)
            .bind(item.gst_treatment)
            .bind(item.taxable_value)
            .bind(item.igst_amount)
            .bind(item.cgst_amount)
            .bind(item.sgst_amount)
            .bind(item.cess_amount)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    const COMPANY: &str = "Test Traders Pvt Ltd";
    const GSTIN: &str = "24AAACC1206D1ZM";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scope() -> ReportScope {
        ReportScope::new(COMPANY, GSTIN, date(2025, 1, 1), date(2025, 1, 31))
    }

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_fetch_flattens_items() {
        let db = db().await;
        let repo = db.transactions();

        let mut invoice = NewSalesInvoice::new("SINV-00001", date(2025, 1, 10), COMPANY, GSTIN);
        invoice.place_of_supply = Some("24-Gujarat".to_string());
        invoice.invoice_total = 1180.0;
        invoice.items = vec![
            NewInvoiceItem::taxable(400.0, 0.0, 36.0, 36.0),
            NewInvoiceItem::taxable(600.0, 0.0, 54.0, 54.0),
        ];
        repo.insert_sales_invoice(&invoice).await.unwrap();

        let rows = repo.fetch_sales(&scope(), false).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.invoice_no == "SINV-00001"));
        let taxable: f64 = rows.iter().map(|r| r.taxable_value).sum();
        assert_eq!(taxable, 1000.0);
    }

    #[tokio::test]
    async fn test_scope_conditions_exclude_rows() {
        let db = db().await;
        let repo = db.transactions();

        // draft
        let mut draft = NewSalesInvoice::new("SINV-00001", date(2025, 1, 10), COMPANY, GSTIN);
        draft.docstatus = DocStatus::Draft;
        draft.items = vec![NewInvoiceItem::taxable(100.0, 0.0, 9.0, 9.0)];
        repo.insert_sales_invoice(&draft).await.unwrap();

        // opening entry
        let mut opening = NewSalesInvoice::new("SINV-00002", date(2025, 1, 10), COMPANY, GSTIN);
        opening.is_opening = true;
        opening.items = vec![NewInvoiceItem::taxable(100.0, 0.0, 9.0, 9.0)];
        repo.insert_sales_invoice(&opening).await.unwrap();

        // self-billed (party GSTIN = company GSTIN)
        let mut self_billed =
            NewSalesInvoice::new("SINV-00003", date(2025, 1, 10), COMPANY, GSTIN);
        self_billed.party_gstin = Some(GSTIN.to_string());
        self_billed.items = vec![NewInvoiceItem::taxable(100.0, 0.0, 9.0, 9.0)];
        repo.insert_sales_invoice(&self_billed).await.unwrap();

        // outside the period
        let mut outside = NewSalesInvoice::new("SINV-00004", date(2025, 2, 10), COMPANY, GSTIN);
        outside.items = vec![NewInvoiceItem::taxable(100.0, 0.0, 9.0, 9.0)];
        repo.insert_sales_invoice(&outside).await.unwrap();

        // the one valid row
        let mut valid = NewSalesInvoice::new("SINV-00005", date(2025, 1, 20), COMPANY, GSTIN);
        valid.items = vec![NewInvoiceItem::taxable(100.0, 0.0, 9.0, 9.0)];
        repo.insert_sales_invoice(&valid).await.unwrap();

        let rows = repo.fetch_sales(&scope(), false).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].invoice_no, "SINV-00005");
    }

    #[tokio::test]
    async fn test_note_carries_returned_invoice_total() {
        let db = db().await;
        let repo = db.transactions();

        let mut original = NewSalesInvoice::new("SINV-00001", date(2025, 1, 5), COMPANY, GSTIN);
        original.invoice_total = 300_000.0;
        original.items = vec![NewInvoiceItem::taxable(254_237.0, 45_763.0, 0.0, 0.0)];
        repo.insert_sales_invoice(&original).await.unwrap();

        let mut note = NewSalesInvoice::new("SINV-00009", date(2025, 1, 20), COMPANY, GSTIN);
        note.is_return = true;
        note.return_against = Some("SINV-00001".to_string());
        note.invoice_total = -50_000.0;
        note.items = vec![NewInvoiceItem::taxable(-42_372.0, -7_628.0, 0.0, 0.0)];
        repo.insert_sales_invoice(&note).await.unwrap();

        let rows = repo.fetch_sales(&scope(), false).await.unwrap();
        let note_row = rows.iter().find(|r| r.invoice_no == "SINV-00009").unwrap();
        assert_eq!(note_row.returned_invoice_total, 300_000.0);
        assert!(note_row.is_return);
    }

    #[tokio::test]
    async fn test_reverse_charge_filter_and_ecommerce_total() {
        let db = db().await;
        let repo = db.transactions();

        let mut plain = NewSalesInvoice::new("SINV-00001", date(2025, 1, 10), COMPANY, GSTIN);
        plain.items = vec![NewInvoiceItem::taxable(500.0, 0.0, 45.0, 45.0)];
        repo.insert_sales_invoice(&plain).await.unwrap();

        let mut rcm = NewSalesInvoice::new("SINV-00002", date(2025, 1, 11), COMPANY, GSTIN);
        rcm.is_reverse_charge = true;
        rcm.ecommerce_gstin = Some("29AAACE1206D1Z1".to_string());
        rcm.items = vec![NewInvoiceItem::taxable(1500.0, 0.0, 0.0, 0.0)];
        repo.insert_sales_invoice(&rcm).await.unwrap();

        let rcm_rows = repo.fetch_sales(&scope(), true).await.unwrap();
        assert_eq!(rcm_rows.len(), 1);
        assert_eq!(rcm_rows[0].invoice_no, "SINV-00002");

        let total = repo.ecommerce_reverse_charge_taxable(&scope()).await.unwrap();
        assert_eq!(total, 1500.0);
    }

    #[tokio::test]
    async fn test_missing_place_of_supply_scan() {
        let db = db().await;
        let repo = db.transactions();

        let mut missing = NewSalesInvoice::new("SINV-00001", date(2025, 1, 10), COMPANY, GSTIN);
        missing.items = vec![NewInvoiceItem::taxable(100.0, 0.0, 9.0, 9.0)];
        repo.insert_sales_invoice(&missing).await.unwrap();

        // overseas party without PoS is not flagged
        let mut overseas = NewSalesInvoice::new("SINV-00002", date(2025, 1, 11), COMPANY, GSTIN);
        overseas.gst_category = PartyGstCategory::Overseas;
        overseas.items = vec![NewInvoiceItem::taxable(100.0, 0.0, 0.0, 0.0)];
        repo.insert_sales_invoice(&overseas).await.unwrap();

        let names = repo.missing_place_of_supply(&scope()).await.unwrap();
        assert_eq!(names, vec!["SINV-00001".to_string()]);
    }
}
