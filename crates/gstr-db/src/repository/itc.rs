//! # Input Tax Credit Queries
//!
//! Everything section 4 of the return draws on: credit availed per
//! classification, import taxes from bills of entry, reversal and
//! reclaim journal vouchers, and ineligible purchase totals.

use std::collections::HashMap;

use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use chrono::NaiveDate;
use gstr_core::types::DocStatus;

use crate::error::DbResult;
use crate::repository::ReportScope;

/// Ineligibility reason that keeps credit out of the availed table
/// entirely (reported under 4(D)(2) instead).
pub const REASON_POS_RULES: &str = "ITC restricted due to PoS rules";

/// Ineligibility reason reported as a reversal under 4(B)(1).
pub const REASON_SECTION_17_5: &str = "Ineligible As Per Section 17(5)";

/// Journal reversal reason that lands in 4(B)(1) rather than 4(B)(2).
pub const REASON_RULES_42_43: &str = "As per rules 42 & 43 of CGST Rules";

// =============================================================================
// Row Shapes
// =============================================================================

/// Summed tax amounts for one grouping key.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TaxTotals {
    pub igst: f64,
    pub cgst: f64,
    pub sgst: f64,
    pub cess: f64,
}

#[derive(Debug, FromRow)]
struct ClassificationTotalRecord {
    itc_classification: String,
    igst: f64,
    cgst: f64,
    sgst: f64,
    cess: f64,
}

/// One reversal voucher line, summed per tax type and reason.
#[derive(Debug, Clone, FromRow)]
pub struct JournalReversalRow {
    pub gst_tax_type: String,
    pub ineligibility_reason: Option<String>,
    pub amount: f64,
}

/// One reclaim voucher line, summed per tax type.
#[derive(Debug, Clone, FromRow)]
pub struct JournalReclaimRow {
    pub gst_tax_type: String,
    pub amount: f64,
}

// =============================================================================
// Insert Payloads
// =============================================================================

#[derive(Debug, Clone)]
pub struct NewBoeTax {
    pub gst_tax_type: String,
    pub tax_amount: f64,
}

#[derive(Debug, Clone)]
pub struct NewBillOfEntry {
    pub name: String,
    pub posting_date: NaiveDate,
    pub company_gstin: String,
    pub docstatus: DocStatus,
    pub taxes: Vec<NewBoeTax>,
}

#[derive(Debug, Clone)]
pub struct NewJournalAccount {
    pub gst_tax_type: Option<String>,
    pub credit_amount: f64,
    pub debit_amount: f64,
}

#[derive(Debug, Clone)]
pub struct NewJournalEntry {
    pub name: String,
    pub posting_date: NaiveDate,
    pub company: String,
    pub company_gstin: String,
    /// 'Reversal Of ITC' or 'Reclaim of ITC Reversal'.
    pub voucher_type: String,
    pub ineligibility_reason: Option<String>,
    pub is_opening: bool,
    pub docstatus: DocStatus,
    pub accounts: Vec<NewJournalAccount>,
}

// =============================================================================
// Repository
// =============================================================================

#[derive(Debug, Clone)]
pub struct ItcRepository {
    pool: SqlitePool,
}

impl ItcRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ItcRepository { pool }
    }

    /// Credit availed per ITC classification, keyed by the stored
    /// classification string.
    ///
    /// PoS-restricted purchases are excluded here; their credit never
    /// enters the availed table.
    pub async fn availed_by_classification(
        &self,
        scope: &ReportScope,
    ) -> DbResult<HashMap<String, TaxTotals>> {
        let records = sqlx::query_as::<_, ClassificationTotalRecord>(
            r#"
            SELECT
                pi.itc_classification,
                IFNULL(SUM(item.igst_amount), 0.0) AS igst,
                IFNULL(SUM(item.cgst_amount), 0.0) AS cgst,
                IFNULL(SUM(item.sgst_amount), 0.0) AS sgst,
                IFNULL(SUM(item.cess_amount), 0.0) AS cess
            FROM purchase_invoices pi
            JOIN purchase_invoice_items item ON item.parent = pi.name
            WHERE pi.docstatus = 1
              AND pi.is_opening = 0
              AND pi.posting_date BETWEEN ?1 AND ?2
              AND pi.company = ?3
              AND pi.company_gstin = ?4
              AND pi.company_gstin != IFNULL(pi.supplier_gstin, '')
              AND IFNULL(pi.itc_classification, '') != ''
              AND IFNULL(pi.ineligibility_reason, '') != ?5
            GROUP BY pi.itc_classification
            "#,
        )
        .bind(scope.from_date)
        .bind(scope.to_date)
        .bind(&scope.company)
        .bind(&scope.company_gstin)
        .bind(REASON_POS_RULES)
        .fetch_all(&self.pool)
        .await?;

        debug!(groups = records.len(), "Fetched ITC availed totals");

        Ok(records
            .into_iter()
            .map(|r| {
                (
                    r.itc_classification,
                    TaxTotals {
                        igst: r.igst,
                        cgst: r.cgst,
                        sgst: r.sgst,
                        cess: r.cess,
                    },
                )
            })
            .collect())
    }

    /// IGST and cess paid on bills of entry, added to import-of-goods
    /// credit. Bills of entry carry no CGST/SGST.
    pub async fn bill_of_entry_totals(&self, scope: &ReportScope) -> DbResult<(f64, f64)> {
        #[derive(FromRow)]
        struct BoeTotals {
            igst: f64,
            cess: f64,
        }

        let totals = sqlx::query_as::<_, BoeTotals>(
            r#"
            SELECT
                IFNULL(SUM(CASE WHEN tax.gst_tax_type = 'igst' THEN tax.tax_amount ELSE 0.0 END), 0.0) AS igst,
                IFNULL(SUM(CASE WHEN tax.gst_tax_type LIKE 'cess%' THEN tax.tax_amount ELSE 0.0 END), 0.0) AS cess
            FROM bill_of_entry boe
            JOIN bill_of_entry_taxes tax ON tax.parent = boe.name
            WHERE boe.docstatus = 1
              AND boe.posting_date BETWEEN ?1 AND ?2
              AND boe.company_gstin = ?3
            "#,
        )
        .bind(scope.from_date)
        .bind(scope.to_date)
        .bind(&scope.company_gstin)
        .fetch_one(&self.pool)
        .await?;

        Ok((totals.igst, totals.cess))
    }

    /// Reversal voucher amounts (credit side), summed per tax type and
    /// ineligibility reason.
    pub async fn reversal_entries(&self, scope: &ReportScope) -> DbResult<Vec<JournalReversalRow>> {
        let rows = sqlx::query_as::<_, JournalReversalRow>(
            r#"
            SELECT
                acc.gst_tax_type,
                je.ineligibility_reason,
                IFNULL(SUM(acc.credit_amount), 0.0) AS amount
            FROM journal_entries je
            JOIN journal_entry_accounts acc ON acc.parent = je.name
            WHERE je.docstatus = 1
              AND je.is_opening = 0
              AND je.posting_date BETWEEN ?1 AND ?2
              AND je.company = ?3
              AND je.company_gstin = ?4
              AND je.voucher_type = 'Reversal Of ITC'
              AND IFNULL(acc.gst_tax_type, '') != ''
            GROUP BY acc.gst_tax_type, je.ineligibility_reason
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

    /// Reclaim voucher amounts (debit side), summed per tax type.
    pub async fn reclaim_entries(&self, scope: &ReportScope) -> DbResult<Vec<JournalReclaimRow>> {
        let rows = sqlx::query_as::<_, JournalReclaimRow>(
            r#"
            SELECT
                acc.gst_tax_type,
                IFNULL(SUM(acc.debit_amount), 0.0) AS amount
            FROM journal_entries je
            JOIN journal_entry_accounts acc ON acc.parent = je.name
            WHERE je.docstatus = 1
              AND je.is_opening = 0
              AND je.posting_date BETWEEN ?1 AND ?2
              AND je.company = ?3
              AND je.company_gstin = ?4
              AND je.voucher_type = 'Reclaim of ITC Reversal'
              AND IFNULL(acc.gst_tax_type, '') != ''
            GROUP BY acc.gst_tax_type
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

    /// Summed taxes of purchase invoices ineligible for the given
    /// reason, regardless of ITC classification.
    pub async fn ineligible_purchase_totals(
        &self,
        scope: &ReportScope,
        reason: &str,
    ) -> DbResult<TaxTotals> {
        #[derive(FromRow)]
        struct Totals {
            igst: f64,
            cgst: f64,
            sgst: f64,
            cess: f64,
        }

        let totals = sqlx::query_as::<_, Totals>(
            r#"
            SELECT
                IFNULL(SUM(item.igst_amount), 0.0) AS igst,
                IFNULL(SUM(item.cgst_amount), 0.0) AS cgst,
                IFNULL(SUM(item.sgst_amount), 0.0) AS sgst,
                IFNULL(SUM(item.cess_amount), 0.0) AS cess
            FROM purchase_invoices pi
            JOIN purchase_invoice_items item ON item.parent = pi.name
            WHERE pi.docstatus = 1
              AND pi.is_opening = 0
              AND pi.posting_date BETWEEN ?1 AND ?2
              AND pi.company = ?3
              AND pi.company_gstin = ?4
              AND pi.company_gstin != IFNULL(pi.supplier_gstin, '')
              AND IFNULL(pi.ineligibility_reason, '') = ?5
            "#,
        )
        .bind(scope.from_date)
        .bind(scope.to_date)
        .bind(&scope.company)
        .bind(&scope.company_gstin)
        .bind(reason)
        .fetch_one(&self.pool)
        .await?;

        Ok(TaxTotals {
            igst: totals.igst,
            cgst: totals.cgst,
            sgst: totals.sgst,
            cess: totals.cess,
        })
    }

    // =========================================================================
    // Seeding
    // =========================================================================

    pub async fn insert_bill_of_entry(&self, boe: &NewBillOfEntry) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO bill_of_entry (name, posting_date, company_gstin, docstatus)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&boe.name)
        .bind(boe.posting_date)
        .bind(&boe.company_gstin)
        .bind(boe.docstatus.code())
        .execute(&mut *tx)
        .await?;

        for boe_tax in &boe.taxes {
            sqlx::query(
                "INSERT INTO bill_of_entry_taxes (parent, gst_tax_type, tax_amount)
                 VALUES (?1, ?2, ?3)",
            )
            .bind(&boe.name)
            .bind(&boe_tax.gst_tax_type)
            .bind(boe_tax.tax_amount)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn insert_journal_entry(&self, entry: &NewJournalEntry) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO journal_entries (
                name, posting_date, company, company_gstin,
                voucher_type, ineligibility_reason, is_opening, docstatus
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&entry.name)
        .bind(entry.posting_date)
        .bind(&entry.company)
        .bind(&entry.company_gstin)
        .bind(&entry.voucher_type)
        .bind(&entry.ineligibility_reason)
        .bind(entry.is_opening)
        .bind(entry.docstatus.code())
        .execute(&mut *tx)
        .await?;

        for account in &entry.accounts {
            sqlx::query(
                "INSERT INTO journal_entry_accounts (parent, gst_tax_type, credit_amount, debit_amount)
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(&entry.name)
            .bind(&account.gst_tax_type)
            .bind(account.credit_amount)
            .bind(account.debit_amount)
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
    use crate::repository::transactions::{NewInvoiceItem, NewPurchaseInvoice};

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
    async fn test_availed_excludes_pos_restricted() {
        let db = db().await;

        let mut eligible = NewPurchaseInvoice::new("PINV-00001", date(2025, 1, 5), COMPANY, GSTIN);
        eligible.itc_classification = Some("All Other ITC".to_string());
        eligible.items = vec![NewInvoiceItem::taxable(1000.0, 180.0, 0.0, 0.0)];
        db.transactions().insert_purchase_invoice(&eligible).await.unwrap();

        let mut restricted =
            NewPurchaseInvoice::new("PINV-00002", date(2025, 1, 6), COMPANY, GSTIN);
        restricted.itc_classification = Some("All Other ITC".to_string());
        restricted.ineligibility_reason = Some(REASON_POS_RULES.to_string());
        restricted.items = vec![NewInvoiceItem::taxable(500.0, 90.0, 0.0, 0.0)];
        db.transactions().insert_purchase_invoice(&restricted).await.unwrap();

        let availed = db.itc().availed_by_classification(&scope()).await.unwrap();
        assert_eq!(availed["All Other ITC"].igst, 180.0);

        // but the restricted invoice shows up under its reason
        let pos = db
            .itc()
            .ineligible_purchase_totals(&scope(), REASON_POS_RULES)
            .await
            .unwrap();
        assert_eq!(pos.igst, 90.0);
    }

    #[tokio::test]
    async fn test_bill_of_entry_totals() {
        let db = db().await;
        let repo = db.itc();

        repo.insert_bill_of_entry(&NewBillOfEntry {
            name: "BOE-00001".to_string(),
            posting_date: date(2025, 1, 12),
            company_gstin: GSTIN.to_string(),
            docstatus: DocStatus::Submitted,
            taxes: vec![
                NewBoeTax { gst_tax_type: "igst".to_string(), tax_amount: 4200.0 },
                NewBoeTax { gst_tax_type: "cess".to_string(), tax_amount: 300.0 },
                NewBoeTax { gst_tax_type: "cess_non_advol".to_string(), tax_amount: 50.0 },
            ],
        })
        .await
        .unwrap();

        // draft bill is ignored
        repo.insert_bill_of_entry(&NewBillOfEntry {
            name: "BOE-00002".to_string(),
            posting_date: date(2025, 1, 13),
            company_gstin: GSTIN.to_string(),
            docstatus: DocStatus::Draft,
            taxes: vec![NewBoeTax { gst_tax_type: "igst".to_string(), tax_amount: 999.0 }],
        })
        .await
        .unwrap();

        let (igst, cess) = repo.bill_of_entry_totals(&scope()).await.unwrap();
        assert_eq!(igst, 4200.0);
        assert_eq!(cess, 350.0);
    }

    #[tokio::test]
    async fn test_reversal_and_reclaim_grouping() {
        let db = db().await;
        let repo = db.itc();

        repo.insert_journal_entry(&NewJournalEntry {
            name: "JV-00001".to_string(),
            posting_date: date(2025, 1, 15),
            company: COMPANY.to_string(),
            company_gstin: GSTIN.to_string(),
            voucher_type: "Reversal Of ITC".to_string(),
            ineligibility_reason: Some(REASON_RULES_42_43.to_string()),
            is_opening: false,
            docstatus: DocStatus::Submitted,
            accounts: vec![
                NewJournalAccount {
                    gst_tax_type: Some("cgst".to_string()),
                    credit_amount: 250.0,
                    debit_amount: 0.0,
                },
                NewJournalAccount {
                    gst_tax_type: Some("sgst".to_string()),
                    credit_amount: 250.0,
                    debit_amount: 0.0,
                },
                // non-tax ledger line is skipped
                NewJournalAccount { gst_tax_type: None, credit_amount: 0.0, debit_amount: 500.0 },
            ],
        })
        .await
        .unwrap();

        repo.insert_journal_entry(&NewJournalEntry {
            name: "JV-00002".to_string(),
            posting_date: date(2025, 1, 16),
            company: COMPANY.to_string(),
            company_gstin: GSTIN.to_string(),
            voucher_type: "Reclaim of ITC Reversal".to_string(),
            ineligibility_reason: None,
            is_opening: false,
            docstatus: DocStatus::Submitted,
            accounts: vec![NewJournalAccount {
                gst_tax_type: Some("igst".to_string()),
                credit_amount: 0.0,
                debit_amount: 120.0,
            }],
        })
        .await
        .unwrap();

        let reversals = repo.reversal_entries(&scope()).await.unwrap();
        assert_eq!(reversals.len(), 2);
        assert!(reversals
            .iter()
            .all(|r| r.ineligibility_reason.as_deref() == Some(REASON_RULES_42_43)));
        let total: f64 = reversals.iter().map(|r| r.amount).sum();
        assert_eq!(total, 500.0);

        let reclaims = repo.reclaim_entries(&scope()).await.unwrap();
        assert_eq!(reclaims.len(), 1);
        assert_eq!(reclaims[0].gst_tax_type, "igst");
        assert_eq!(reclaims[0].amount, 120.0);
    }
}
