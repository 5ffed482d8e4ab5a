//! # Report Context
//!
//! Validated inputs for one report run: registration, period bounds
//! and feature switches. Validation happens up front so a misconfigured
//! company fails before any row is fetched.

use chrono::{Datelike, NaiveDate};

use gstr_core::types::gstin_state_code;
use gstr_db::ReportScope;

use crate::error::{EngineError, EngineResult};

/// Inputs for one report generation run.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub company: String,
    pub gstin: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    /// Include the e-commerce category in the GSTR-1 overview.
    pub enable_ecommerce_supplies: bool,
}

impl ReportContext {
    /// Builds a context with explicit period bounds.
    pub fn new(
        company: &str,
        gstin: &str,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> EngineResult<Self> {
        if gstin.trim().is_empty() {
            return Err(EngineError::MissingGstin {
                company: company.to_string(),
            });
        }
        if from_date > to_date {
            return Err(EngineError::InvalidPeriod(format!(
                "{} is after {}",
                from_date, to_date
            )));
        }

        Ok(ReportContext {
            company: company.to_string(),
            gstin: gstin.to_string(),
            from_date,
            to_date,
            enable_ecommerce_supplies: false,
        })
    }

    /// Builds a context spanning one calendar month.
    pub fn for_month(company: &str, gstin: &str, year: i32, month: u32) -> EngineResult<Self> {
        let from_date = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| EngineError::InvalidPeriod(format!("{:02}{}", month, year)))?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let to_date = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .ok_or_else(|| EngineError::InvalidPeriod(format!("{:02}{}", month, year)))?
            .pred_opt()
            .ok_or_else(|| EngineError::InvalidPeriod(format!("{:02}{}", month, year)))?;

        Self::new(company, gstin, from_date, to_date)
    }

    pub fn with_ecommerce_supplies(mut self, enabled: bool) -> Self {
        self.enable_ecommerce_supplies = enabled;
        self
    }

    /// Return period as MMYYYY, from the period start.
    pub fn ret_period(&self) -> String {
        format!("{:02}{}", self.from_date.month(), self.from_date.year())
    }

    /// Two-digit state code of the registration.
    pub fn state_code(&self) -> &str {
        gstin_state_code(&self.gstin)
    }

    /// Database scope covering this context.
    pub fn scope(&self) -> ReportScope {
        ReportScope::new(&self.company, &self.gstin, self.from_date, self.to_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_gstin_rejected() {
        let result = ReportContext::for_month("Acme Pvt Ltd", "  ", 2025, 1);
        assert!(matches!(result, Err(EngineError::MissingGstin { .. })));
    }

    #[test]
    fn test_month_bounds_and_period() {
        let ctx = ReportContext::for_month("Acme Pvt Ltd", "24AAACC1206D1ZM", 2025, 2).unwrap();
        assert_eq!(ctx.from_date, NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        assert_eq!(ctx.to_date, NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
        assert_eq!(ctx.ret_period(), "022025");
        assert_eq!(ctx.state_code(), "24");

        let december =
            ReportContext::for_month("Acme Pvt Ltd", "24AAACC1206D1ZM", 2024, 12).unwrap();
        assert_eq!(december.to_date, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_inverted_period_rejected() {
        let result = ReportContext::new(
            "Acme Pvt Ltd",
            "24AAACC1206D1ZM",
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        );
        assert!(matches!(result, Err(EngineError::InvalidPeriod(_))));
    }
}
