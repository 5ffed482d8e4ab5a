//! # Advance Payment Queries
//!
//! Advances received against future supplies (table 11A) and advances
//! adjusted against invoices raised this period (table 11B). Adjusted
//! rows are applied with a negative sign by the assembler.

use sqlx::{FromRow, SqlitePool};

use chrono::NaiveDate;
use gstr_core::types::DocStatus;

use crate::error::DbResult;
use crate::repository::ReportScope;

/// Which side of the advance ledger to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceEntryType {
    Received,
    Adjusted,
}

impl AdvanceEntryType {
    fn as_str(&self) -> &'static str {
        match self {
            AdvanceEntryType::Received => "Received",
            AdvanceEntryType::Adjusted => "Adjusted",
        }
    }
}

/// One advance row. `tax_amount` is the combined GST liability; the
/// assembler splits it in half for intra-state supplies.
#[derive(Debug, Clone, FromRow)]
pub struct AdvanceRow {
    pub place_of_supply: String,
    pub taxable_value: f64,
    pub tax_amount: f64,
    pub cess_amount: f64,
}

#[derive(Debug, Clone)]
pub struct NewAdvanceEntry {
    pub posting_date: NaiveDate,
    pub company: String,
    pub company_gstin: String,
    pub place_of_supply: String,
    pub entry_type: AdvanceEntryType,
    pub taxable_value: f64,
    pub tax_amount: f64,
    pub cess_amount: f64,
    pub docstatus: DocStatus,
}

#[derive(Debug, Clone)]
pub struct AdvanceRepository {
    pool: SqlitePool,
}

impl AdvanceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        AdvanceRepository { pool }
    }

    /// Advance rows for the scope, one per payment entry.
    pub async fn fetch(
        &self,
        scope: &ReportScope,
        entry_type: AdvanceEntryType,
    ) -> DbResult<Vec<AdvanceRow>> {
        let rows = sqlx::query_as::<_, AdvanceRow>(
            r#"
            SELECT place_of_supply, taxable_value, tax_amount, cess_amount
            FROM payment_entries
            WHERE docstatus = 1
              AND posting_date BETWEEN ?1 AND ?2
              AND company = ?3
              AND company_gstin = ?4
              AND entry_type = ?5
            ORDER BY posting_date, id
            "#,
        )
        .bind(scope.from_date)
        .bind(scope.to_date)
        .bind(&scope.company)
        .bind(&scope.company_gstin)
        .bind(entry_type.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn insert(&self, entry: &NewAdvanceEntry) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO payment_entries (
                posting_date, company, company_gstin, place_of_supply,
                entry_type, taxable_value, tax_amount, cess_amount, docstatus
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(entry.posting_date)
        .bind(&entry.company)
        .bind(&entry.company_gstin)
        .bind(&entry.place_of_supply)
        .bind(entry.entry_type.as_str())
        .bind(entry.taxable_value)
        .bind(entry.tax_amount)
        .bind(entry.cess_amount)
        .bind(entry.docstatus.code())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

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

    fn entry(entry_type: AdvanceEntryType, pos: &str, taxable: f64, tax: f64) -> NewAdvanceEntry {
        NewAdvanceEntry {
            posting_date: date(2025, 1, 14),
            company: COMPANY.to_string(),
            company_gstin: GSTIN.to_string(),
            place_of_supply: pos.to_string(),
            entry_type,
            taxable_value: taxable,
            tax_amount: tax,
            cess_amount: 0.0,
            docstatus: DocStatus::Submitted,
        }
    }

    #[tokio::test]
    async fn test_fetch_is_split_by_entry_type() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.advances();

        repo.insert(&entry(AdvanceEntryType::Received, "24-Gujarat", 10_000.0, 1800.0))
            .await
            .unwrap();
        repo.insert(&entry(AdvanceEntryType::Received, "29-Karnataka", 5_000.0, 900.0))
            .await
            .unwrap();
        repo.insert(&entry(AdvanceEntryType::Adjusted, "24-Gujarat", 4_000.0, 720.0))
            .await
            .unwrap();

        let received = repo.fetch(&scope(), AdvanceEntryType::Received).await.unwrap();
        assert_eq!(received.len(), 2);
        let taxable: f64 = received.iter().map(|r| r.taxable_value).sum();
        assert_eq!(taxable, 15_000.0);

        let adjusted = repo.fetch(&scope(), AdvanceEntryType::Adjusted).await.unwrap();
        assert_eq!(adjusted.len(), 1);
        assert_eq!(adjusted[0].tax_amount, 720.0);
    }

    #[tokio::test]
    async fn test_draft_entries_excluded() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.advances();

        let mut draft = entry(AdvanceEntryType::Received, "24-Gujarat", 1_000.0, 180.0);
        draft.docstatus = DocStatus::Draft;
        repo.insert(&draft).await.unwrap();

        let received = repo.fetch(&scope(), AdvanceEntryType::Received).await.unwrap();
        assert!(received.is_empty());
    }
}
