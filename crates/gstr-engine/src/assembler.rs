//! # GSTR-3B Report Assembler
//!
//! Builds the monthly summary return from the transaction store, one
//! section at a time. Every pass accumulates unrounded sums into the
//! typed payload; rounding happens once at the end.
//!
//! ## Assembly Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Outward supplies by GST treatment (3.1 a/b/c/e)                     │
//! │     + inter-state breakdown for unreg/comp/UIN parties (3.2)            │
//! │  2. Reverse-charge inward supplies from purchases (3.1 d)               │
//! │  3. Advances received minus adjusted, folded into 3.1(a)                │
//! │  4. ITC available per classification + bill-of-entry imports (4 A)      │
//! │     reversals from journals and ineligible purchases (4 B)              │
//! │     reclaim and PoS-restricted credit (4 D)                             │
//! │  5. Inward nil/exempt/non-GST split inter/intra (5)                     │
//! │  6. Reverse-charge e-commerce carve-out (3.1.1 vs 3.1 a)                │
//! │  7. Missing place-of-supply scan, rounding                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reverse-charge SALES contribute taxable value but never tax amounts;
//! the tax is payable by the recipient or the operator.

use std::collections::BTreeMap;

use tracing::{debug, info};

use gstr_core::report::{itc_type, Gstr3bReport, InterStateSupply, ItcDetail, ItcElg, ItcNet};
use gstr_core::types::{
    pos_state_code, GstTreatment, PartyGstCategory, TransactionRow, DEFAULT_POS,
};
use gstr_db::repository::advances::AdvanceEntryType;
use gstr_db::repository::itc::{TaxTotals, REASON_POS_RULES, REASON_RULES_42_43, REASON_SECTION_17_5};
use gstr_db::Database;

use crate::config::ReportContext;
use crate::error::EngineResult;

/// ITC classification strings as stored on purchase invoices, in
/// 4(A) row order.
const ITC_CLASSIFICATION_MAP: [(&str, &str); 5] = [
    (itc_type::IMPORT_OF_GOODS, "Import Of Goods"),
    (itc_type::IMPORT_OF_SERVICES, "Import Of Service"),
    (itc_type::REVERSE_CHARGE, "ITC on Reverse Charge"),
    (itc_type::INPUT_SERVICE_DISTRIBUTOR, "Input Service Distributor"),
    (itc_type::ALL_OTHER, "All Other ITC"),
];

/// A finished assembly run: the rounded payload plus the invoices
/// flagged for manual review.
#[derive(Debug, Clone)]
pub struct AssembledReport {
    pub report: Gstr3bReport,
    pub missing_field_invoices: Vec<String>,
}

/// Assembles one GSTR-3B payload for a context.
pub struct ReportAssembler<'a> {
    db: &'a Database,
    ctx: &'a ReportContext,
}

impl<'a> ReportAssembler<'a> {
    pub fn new(db: &'a Database, ctx: &'a ReportContext) -> Self {
        ReportAssembler { db, ctx }
    }

    /// Runs every assembly pass and returns the rounded payload.
    pub async fn assemble(&self) -> EngineResult<AssembledReport> {
        let scope = self.ctx.scope();
        let mut report = Gstr3bReport::new(&self.ctx.gstin, &self.ctx.ret_period());

        let sales = self.db.transactions().fetch_sales(&scope, false).await?;
        self.apply_outward_supplies(&mut report, &sales);

        let purchases = self.db.transactions().fetch_purchases(&scope, true).await?;
        Self::apply_reverse_charge_inward(&mut report, &purchases);

        self.apply_advances(&mut report).await?;
        self.apply_itc(&mut report).await?;
        self.apply_inward_nil_exempt(&mut report).await?;
        self.apply_ecommerce_carve_out(&mut report).await?;

        let missing_field_invoices = self
            .db
            .transactions()
            .missing_place_of_supply(&scope)
            .await?;

        info!(
            gstin = %self.ctx.gstin,
            ret_period = %report.ret_period,
            missing_pos = missing_field_invoices.len(),
            "Assembled GSTR-3B payload"
        );

        Ok(AssembledReport {
            report: report.rounded(),
            missing_field_invoices,
        })
    }

    // =========================================================================
    // Section 3.1 / 3.2 - Outward Supplies
    // =========================================================================

    fn apply_outward_supplies(&self, report: &mut Gstr3bReport, rows: &[TransactionRow]) {
        // (category, place of supply) -> accumulated 3.2 line
        let mut inter_state: BTreeMap<(u8, String), InterStateSupply> = BTreeMap::new();
        let company_state = self.ctx.state_code();

        for row in rows {
            // recipient or operator pays the tax on reverse-charge sales
            let (igst, cgst, sgst, cess) = if row.is_reverse_charge {
                (0.0, 0.0, 0.0, 0.0)
            } else {
                (row.igst_amount, row.cgst_amount, row.sgst_amount, row.cess_amount)
            };

            match row.gst_treatment {
                GstTreatment::Taxable => {
                    let section = &mut report.sup_details.osup_det;
                    section.txval += row.taxable_value;
                    section.iamt += igst;
                    section.camt += cgst;
                    section.samt += sgst;
                    section.csamt += cess;
                }
                GstTreatment::ZeroRated => {
                    let section = &mut report.sup_details.osup_zero;
                    section.txval += row.taxable_value;
                    section.iamt += igst;
                    section.csamt += cess;
                }
                GstTreatment::NilRated | GstTreatment::Exempted => {
                    report.sup_details.osup_nil_exmp.txval += row.taxable_value;
                }
                GstTreatment::NonGst => {
                    report.sup_details.osup_nongst.txval += row.taxable_value;
                }
            }

            // 3.2 covers taxable supplies to three party categories only
            if row.gst_treatment != GstTreatment::Taxable {
                continue;
            }
            let bucket = match row.party_gst_category {
                PartyGstCategory::Unregistered => 0u8,
                PartyGstCategory::RegisteredComposition => 1,
                PartyGstCategory::UinHolders => 2,
                _ => continue,
            };

            let place_of_supply = row.place_of_supply.as_deref().unwrap_or(DEFAULT_POS);
            if pos_state_code(place_of_supply) == company_state {
                continue;
            }

            let line = inter_state
                .entry((bucket, place_of_supply.to_string()))
                .or_insert_with(|| InterStateSupply {
                    pos: pos_state_code(place_of_supply).to_string(),
                    txval: 0.0,
                    iamt: 0.0,
                });
            line.txval += row.taxable_value;
            line.iamt += igst;
        }

        for ((bucket, _), line) in inter_state {
            let section = match bucket {
                0 => &mut report.inter_sup.unreg_details,
                1 => &mut report.inter_sup.comp_details,
                _ => &mut report.inter_sup.uin_details,
            };
            section.push(line);
        }
    }

    // =========================================================================
    // Section 3.1(d) - Inward Supplies Liable to Reverse Charge
    // =========================================================================

    fn apply_reverse_charge_inward(report: &mut Gstr3bReport, rows: &[TransactionRow]) {
        let section = &mut report.sup_details.isup_rev;
        for row in rows {
            section.txval += row.taxable_value;
            section.iamt += row.igst_amount;
            section.camt += row.cgst_amount;
            section.samt += row.sgst_amount;
            section.csamt += row.cess_amount;
        }
    }

    // =========================================================================
    // Section 3.1(a) - Advances Received / Adjusted
    // =========================================================================

    /// Advances received add to 3.1(a); advances adjusted against
    /// invoices raised this period are backed out again. Intra-state
    /// advances split the combined tax evenly into CGST and SGST.
    async fn apply_advances(&self, report: &mut Gstr3bReport) -> EngineResult<()> {
        let scope = self.ctx.scope();
        let company_state = self.ctx.state_code();
        let section = &mut report.sup_details.osup_det;

        for (entry_type, multiplier) in [
            (AdvanceEntryType::Received, 1.0),
            (AdvanceEntryType::Adjusted, -1.0),
        ] {
            let rows = self.db.advances().fetch(&scope, entry_type).await?;
            debug!(?entry_type, rows = rows.len(), "Applying advance entries");

            for row in rows {
                let is_intra_state = pos_state_code(&row.place_of_supply) == company_state;
                let tax_amount = row.tax_amount * multiplier;

                section.txval += row.taxable_value * multiplier;
                if is_intra_state {
                    section.camt += tax_amount / 2.0;
                    section.samt += tax_amount / 2.0;
                } else {
                    section.iamt += tax_amount;
                }
                section.csamt += row.cess_amount * multiplier;
            }
        }

        Ok(())
    }

    // =========================================================================
    // Section 4 - Input Tax Credit
    // =========================================================================

    async fn apply_itc(&self, report: &mut Gstr3bReport) -> EngineResult<()> {
        let scope = self.ctx.scope();
        let itc = self.db.itc();

        // 4(A): availed credit plus import taxes from bills of entry
        let mut availed = itc.availed_by_classification(&scope).await?;
        let (boe_igst, boe_cess) = itc.bill_of_entry_totals(&scope).await?;
        let import_of_goods = availed.entry("Import Of Goods".to_string()).or_default();
        import_of_goods.igst += boe_igst;
        import_of_goods.cess += boe_cess;

        for (ty, classification) in ITC_CLASSIFICATION_MAP {
            if let Some(index) = ItcElg::available_index(ty) {
                let totals = availed.get(classification).copied().unwrap_or_default();
                set_detail(&mut report.itc_elg.itc_avl[index], totals);
            }
        }
        report.itc_elg.recompute_net();

        // 4(B): journal reversal vouchers, rules 42 & 43 vs others
        for entry in itc.reversal_entries(&scope).await? {
            let index = if entry.ineligibility_reason.as_deref() == Some(REASON_RULES_42_43) {
                0
            } else {
                1
            };
            add_tax(&mut report.itc_elg.itc_rev[index], &entry.gst_tax_type, entry.amount);
            sub_net(&mut report.itc_elg.itc_net, &entry.gst_tax_type, entry.amount);
        }

        // 4(B)(1): section 17(5) purchases reverse their own credit
        let blocked = itc
            .ineligible_purchase_totals(&scope, REASON_SECTION_17_5)
            .await?;
        add_totals(&mut report.itc_elg.itc_rev[0], blocked);
        report.itc_elg.itc_net.iamt -= blocked.igst;
        report.itc_elg.itc_net.camt -= blocked.cgst;
        report.itc_elg.itc_net.samt -= blocked.sgst;
        report.itc_elg.itc_net.csamt -= blocked.cess;

        // 4(D)(2): PoS-restricted credit was never availed
        let restricted = itc
            .ineligible_purchase_totals(&scope, REASON_POS_RULES)
            .await?;
        add_totals(&mut report.itc_elg.itc_inelg[1], restricted);

        // 4(D)(1): reclaim of earlier reversals
        for entry in itc.reclaim_entries(&scope).await? {
            add_tax(&mut report.itc_elg.itc_inelg[0], &entry.gst_tax_type, entry.amount);
        }

        Ok(())
    }

    // =========================================================================
    // Section 5 - Inward Nil/Exempt Supplies
    // =========================================================================

    /// Missing place of supply falls back to the company's state, as
    /// does a missing supplier state; both-missing rows count intra.
    async fn apply_inward_nil_exempt(&self, report: &mut Gstr3bReport) -> EngineResult<()> {
        let scope = self.ctx.scope();
        let company_state = self.ctx.state_code();

        for row in self.db.inward().fetch_nil_exempt(&scope).await? {
            let supplier_state = row.supplier_state_code.as_deref().unwrap_or(company_state);
            let pos_state = row
                .place_of_supply
                .as_deref()
                .map(pos_state_code)
                .unwrap_or(company_state);
            let is_intra_state = supplier_state == pos_state;

            let index = if row.gst_treatment == GstTreatment::NonGst { 1 } else { 0 };
            let detail = &mut report.inward_sup.isup_details[index];
            if is_intra_state {
                detail.intra += row.taxable_value;
            } else {
                detail.inter += row.taxable_value;
            }
        }

        Ok(())
    }

    // =========================================================================
    // Section 3.1.1 - E-commerce Operator Carve-out
    // =========================================================================

    /// Reverse-charge sales through an e-commerce operator move from
    /// 3.1(a) to 3.1.1; their taxable value was accumulated in the
    /// outward pass and is subtracted here.
    async fn apply_ecommerce_carve_out(&self, report: &mut Gstr3bReport) -> EngineResult<()> {
        let scope = self.ctx.scope();
        let taxable_value = self
            .db
            .transactions()
            .ecommerce_reverse_charge_taxable(&scope)
            .await?;

        report.eco_dtls.eco_reg_sup.txval += taxable_value;
        report.sup_details.osup_det.txval -= taxable_value;
        Ok(())
    }
}

// =============================================================================
// Tax Amount Plumbing
// =============================================================================

fn set_detail(detail: &mut ItcDetail, totals: TaxTotals) {
    detail.iamt = totals.igst;
    detail.camt = totals.cgst;
    detail.samt = totals.sgst;
    detail.csamt = totals.cess;
}

fn add_totals(detail: &mut ItcDetail, totals: TaxTotals) {
    detail.iamt += totals.igst;
    detail.camt += totals.cgst;
    detail.samt += totals.sgst;
    detail.csamt += totals.cess;
}

fn add_tax(detail: &mut ItcDetail, gst_tax_type: &str, amount: f64) {
    match gst_tax_type {
        "igst" => detail.iamt += amount,
        "cgst" => detail.camt += amount,
        "sgst" => detail.samt += amount,
        "cess" | "cess_non_advol" => detail.csamt += amount,
        _ => {}
    }
}

fn sub_net(net: &mut ItcNet, gst_tax_type: &str, amount: f64) {
    match gst_tax_type {
        "igst" => net.iamt -= amount,
        "cgst" => net.camt -= amount,
        "sgst" => net.samt -= amount,
        "cess" | "cess_non_advol" => net.csamt -= amount,
        _ => {}
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use gstr_core::types::DocStatus;
    use gstr_db::pool::DbConfig;
    use gstr_db::repository::advances::NewAdvanceEntry;
    use gstr_db::repository::itc::{
        NewBillOfEntry, NewBoeTax, NewJournalAccount, NewJournalEntry,
    };
    use gstr_db::repository::transactions::{
        NewInvoiceItem, NewPurchaseInvoice, NewSalesInvoice,
    };

    const COMPANY: &str = "Test Traders Pvt Ltd";
    const GSTIN: &str = "24AAACC1206D1ZM";

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn ctx() -> ReportContext {
        ReportContext::for_month(COMPANY, GSTIN, 2025, 1).unwrap()
    }

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn item(treatment: GstTreatment, taxable: f64, igst: f64) -> NewInvoiceItem {
        NewInvoiceItem {
            gst_treatment: treatment,
            taxable_value: taxable,
            igst_amount: igst,
            cgst_amount: 0.0,
            sgst_amount: 0.0,
            cess_amount: 0.0,
        }
    }

    #[tokio::test]
    async fn test_outward_supplies_split_by_treatment() {
        let db = db().await;

        let mut invoice = NewSalesInvoice::new("SINV-00001", date(10), COMPANY, GSTIN);
        invoice.place_of_supply = Some("24-Gujarat".to_string());
        invoice.items = vec![
            NewInvoiceItem::taxable(1000.0, 0.0, 90.0, 90.0),
            item(GstTreatment::NilRated, 200.0, 0.0),
            item(GstTreatment::NonGst, 50.0, 0.0),
        ];
        db.transactions().insert_sales_invoice(&invoice).await.unwrap();

        let mut export = NewSalesInvoice::new("SINV-00002", date(11), COMPANY, GSTIN);
        export.gst_category = PartyGstCategory::Overseas;
        export.place_of_supply = Some("96-Other Countries".to_string());
        export.is_export_with_tax = true;
        export.items = vec![item(GstTreatment::ZeroRated, 5000.0, 900.0)];
        db.transactions().insert_sales_invoice(&export).await.unwrap();

        let ctx = ctx();
        let assembled = ReportAssembler::new(&db, &ctx).assemble().await.unwrap();
        let sup = &assembled.report.sup_details;

        assert_eq!(sup.osup_det.txval, 1000.0);
        assert_eq!(sup.osup_det.camt, 90.0);
        assert_eq!(sup.osup_nil_exmp.txval, 200.0);
        assert_eq!(sup.osup_nongst.txval, 50.0);
        assert_eq!(sup.osup_zero.txval, 5000.0);
        assert_eq!(sup.osup_zero.iamt, 900.0);
    }

    #[tokio::test]
    async fn test_reverse_charge_sales_suppress_taxes() {
        let db = db().await;

        let mut rcm = NewSalesInvoice::new("SINV-00001", date(10), COMPANY, GSTIN);
        rcm.is_reverse_charge = true;
        rcm.place_of_supply = Some("24-Gujarat".to_string());
        rcm.items = vec![item(GstTreatment::Taxable, 2000.0, 360.0)];
        db.transactions().insert_sales_invoice(&rcm).await.unwrap();

        let ctx = ctx();
        let assembled = ReportAssembler::new(&db, &ctx).assemble().await.unwrap();
        let sup = &assembled.report.sup_details;

        assert_eq!(sup.osup_det.txval, 2000.0);
        assert_eq!(sup.osup_det.iamt, 0.0);
    }

    #[tokio::test]
    async fn test_inter_state_breakdown_for_unregistered() {
        let db = db().await;

        // inter-state B2C sale
        let mut inter = NewSalesInvoice::new("SINV-00001", date(10), COMPANY, GSTIN);
        inter.place_of_supply = Some("27-Maharashtra".to_string());
        inter.items = vec![item(GstTreatment::Taxable, 3000.0, 540.0)];
        db.transactions().insert_sales_invoice(&inter).await.unwrap();

        // intra-state sale, no 3.2 line
        let mut intra = NewSalesInvoice::new("SINV-00002", date(11), COMPANY, GSTIN);
        intra.place_of_supply = Some("24-Gujarat".to_string());
        intra.items = vec![NewInvoiceItem::taxable(1000.0, 0.0, 90.0, 90.0)];
        db.transactions().insert_sales_invoice(&intra).await.unwrap();

        // registered party never appears in 3.2
        let mut b2b = NewSalesInvoice::new("SINV-00003", date(12), COMPANY, GSTIN);
        b2b.gst_category = PartyGstCategory::RegisteredRegular;
        b2b.party_gstin = Some("27AAACM1206D1ZK".to_string());
        b2b.place_of_supply = Some("27-Maharashtra".to_string());
        b2b.items = vec![item(GstTreatment::Taxable, 9000.0, 1620.0)];
        db.transactions().insert_sales_invoice(&b2b).await.unwrap();

        let ctx = ctx();
        let assembled = ReportAssembler::new(&db, &ctx).assemble().await.unwrap();
        let inter_sup = &assembled.report.inter_sup;

        assert_eq!(inter_sup.unreg_details.len(), 1);
        assert_eq!(inter_sup.unreg_details[0].pos, "27");
        assert_eq!(inter_sup.unreg_details[0].txval, 3000.0);
        assert_eq!(inter_sup.unreg_details[0].iamt, 540.0);
        assert!(inter_sup.comp_details.is_empty());
        assert!(inter_sup.uin_details.is_empty());
    }

    #[tokio::test]
    async fn test_reverse_charge_purchases_fill_isup_rev() {
        let db = db().await;

        let mut rcm = NewPurchaseInvoice::new("PINV-00001", date(8), COMPANY, GSTIN);
        rcm.is_reverse_charge = true;
        rcm.items = vec![NewInvoiceItem::taxable(4000.0, 0.0, 360.0, 360.0)];
        db.transactions().insert_purchase_invoice(&rcm).await.unwrap();

        // forward-charge purchase stays out of 3.1(d)
        let mut plain = NewPurchaseInvoice::new("PINV-00002", date(9), COMPANY, GSTIN);
        plain.items = vec![NewInvoiceItem::taxable(7000.0, 0.0, 630.0, 630.0)];
        db.transactions().insert_purchase_invoice(&plain).await.unwrap();

        let ctx = ctx();
        let assembled = ReportAssembler::new(&db, &ctx).assemble().await.unwrap();
        let isup_rev = &assembled.report.sup_details.isup_rev;

        assert_eq!(isup_rev.txval, 4000.0);
        assert_eq!(isup_rev.camt, 360.0);
        assert_eq!(isup_rev.samt, 360.0);
    }

    #[tokio::test]
    async fn test_advances_intra_split_and_adjustment() {
        let db = db().await;

        // intra-state advance: tax halves into CGST/SGST
        db.advances()
            .insert(&NewAdvanceEntry {
                posting_date: date(5),
                company: COMPANY.to_string(),
                company_gstin: GSTIN.to_string(),
                place_of_supply: "24-Gujarat".to_string(),
                entry_type: AdvanceEntryType::Received,
                taxable_value: 10_000.0,
                tax_amount: 1800.0,
                cess_amount: 0.0,
                docstatus: DocStatus::Submitted,
            })
            .await
            .unwrap();

        // inter-state advance
        db.advances()
            .insert(&NewAdvanceEntry {
                posting_date: date(6),
                company: COMPANY.to_string(),
                company_gstin: GSTIN.to_string(),
                place_of_supply: "27-Maharashtra".to_string(),
                entry_type: AdvanceEntryType::Received,
                taxable_value: 5000.0,
                tax_amount: 900.0,
                cess_amount: 0.0,
                docstatus: DocStatus::Submitted,
            })
            .await
            .unwrap();

        // part of the intra advance gets adjusted
        db.advances()
            .insert(&NewAdvanceEntry {
                posting_date: date(20),
                company: COMPANY.to_string(),
                company_gstin: GSTIN.to_string(),
                place_of_supply: "24-Gujarat".to_string(),
                entry_type: AdvanceEntryType::Adjusted,
                taxable_value: 4000.0,
                tax_amount: 720.0,
                cess_amount: 0.0,
                docstatus: DocStatus::Submitted,
            })
            .await
            .unwrap();

        let ctx = ctx();
        let assembled = ReportAssembler::new(&db, &ctx).assemble().await.unwrap();
        let osup_det = &assembled.report.sup_details.osup_det;

        assert_eq!(osup_det.txval, 11_000.0);
        assert_eq!(osup_det.camt, (1800.0 - 720.0) / 2.0);
        assert_eq!(osup_det.samt, (1800.0 - 720.0) / 2.0);
        assert_eq!(osup_det.iamt, 900.0);
    }

    #[tokio::test]
    async fn test_itc_sections_end_to_end() {
        let db = db().await;

        // availed credit
        let mut purchase = NewPurchaseInvoice::new("PINV-00001", date(5), COMPANY, GSTIN);
        purchase.supplier_gstin = Some("27AAACM1206D1ZK".to_string());
        purchase.itc_classification = Some("All Other ITC".to_string());
        purchase.items = vec![item(GstTreatment::Taxable, 10_000.0, 1800.0)];
        db.transactions().insert_purchase_invoice(&purchase).await.unwrap();

        // import credit via bill of entry
        db.itc()
            .insert_bill_of_entry(&NewBillOfEntry {
                name: "BOE-00001".to_string(),
                posting_date: date(7),
                company_gstin: GSTIN.to_string(),
                docstatus: DocStatus::Submitted,
                taxes: vec![NewBoeTax {
                    gst_tax_type: "igst".to_string(),
                    tax_amount: 500.0,
                }],
            })
            .await
            .unwrap();

        // rules 42 & 43 journal reversal
        db.itc()
            .insert_journal_entry(&NewJournalEntry {
                name: "JV-00001".to_string(),
                posting_date: date(15),
                company: COMPANY.to_string(),
                company_gstin: GSTIN.to_string(),
                voucher_type: "Reversal Of ITC".to_string(),
                ineligibility_reason: Some(REASON_RULES_42_43.to_string()),
                is_opening: false,
                docstatus: DocStatus::Submitted,
                accounts: vec![NewJournalAccount {
                    gst_tax_type: Some("igst".to_string()),
                    credit_amount: 300.0,
                    debit_amount: 0.0,
                }],
            })
            .await
            .unwrap();

        // section 17(5) blocked credit
        let mut blocked = NewPurchaseInvoice::new("PINV-00002", date(9), COMPANY, GSTIN);
        blocked.itc_classification = Some("All Other ITC".to_string());
        blocked.ineligibility_reason = Some(REASON_SECTION_17_5.to_string());
        blocked.items = vec![item(GstTreatment::Taxable, 1000.0, 180.0)];
        db.transactions().insert_purchase_invoice(&blocked).await.unwrap();

        // PoS-restricted credit
        let mut restricted = NewPurchaseInvoice::new("PINV-00003", date(9), COMPANY, GSTIN);
        restricted.itc_classification = Some("All Other ITC".to_string());
        restricted.ineligibility_reason = Some(REASON_POS_RULES.to_string());
        restricted.items = vec![item(GstTreatment::Taxable, 2000.0, 360.0)];
        db.transactions().insert_purchase_invoice(&restricted).await.unwrap();

        // reclaim voucher
        db.itc()
            .insert_journal_entry(&NewJournalEntry {
                name: "JV-00002".to_string(),
                posting_date: date(18),
                company: COMPANY.to_string(),
                company_gstin: GSTIN.to_string(),
                voucher_type: "Reclaim of ITC Reversal".to_string(),
                ineligibility_reason: None,
                is_opening: false,
                docstatus: DocStatus::Submitted,
                accounts: vec![NewJournalAccount {
                    gst_tax_type: Some("igst".to_string()),
                    credit_amount: 0.0,
                    debit_amount: 100.0,
                }],
            })
            .await
            .unwrap();

        let ctx = ctx();
        let assembled = ReportAssembler::new(&db, &ctx).assemble().await.unwrap();
        let itc = &assembled.report.itc_elg;

        // 4(A): availed includes 17(5) invoice (still classified) and BoE
        assert_eq!(itc.itc_avl[0].iamt, 500.0); // IMPG from bill of entry
        assert_eq!(itc.itc_avl[4].iamt, 1800.0 + 180.0); // OTH, PoS row excluded

        // 4(B): journal reversal in row 0 plus 17(5) amounts
        assert_eq!(itc.itc_rev[0].iamt, 300.0 + 180.0);

        // 4(C): availed minus reversals
        assert_eq!(itc.itc_net.iamt, 500.0 + 1980.0 - 300.0 - 180.0);

        // 4(D): reclaim first, PoS-restricted second
        assert_eq!(itc.itc_inelg[0].iamt, 100.0);
        assert_eq!(itc.itc_inelg[1].iamt, 360.0);
    }

    #[tokio::test]
    async fn test_inward_nil_exempt_split() {
        let db = db().await;

        // exempt item from an intra-state supplier
        let mut intra = NewPurchaseInvoice::new("PINV-00001", date(10), COMPANY, GSTIN);
        intra.supplier_state_code = Some("24".to_string());
        intra.place_of_supply = Some("24-Gujarat".to_string());
        intra.items = vec![item(GstTreatment::Exempted, 800.0, 0.0)];
        db.transactions().insert_purchase_invoice(&intra).await.unwrap();

        // non-GST item from another state
        let mut inter = NewPurchaseInvoice::new("PINV-00002", date(11), COMPANY, GSTIN);
        inter.supplier_state_code = Some("27".to_string());
        inter.place_of_supply = Some("24-Gujarat".to_string());
        inter.items = vec![item(GstTreatment::NonGst, 300.0, 0.0)];
        db.transactions().insert_purchase_invoice(&inter).await.unwrap();

        let ctx = ctx();
        let assembled = ReportAssembler::new(&db, &ctx).assemble().await.unwrap();
        let details = &assembled.report.inward_sup.isup_details;

        assert_eq!(details[0].intra, 800.0);
        assert_eq!(details[0].inter, 0.0);
        assert_eq!(details[1].inter, 300.0);
        assert_eq!(details[1].intra, 0.0);
    }

    #[tokio::test]
    async fn test_ecommerce_carve_out_moves_taxable_value() {
        let db = db().await;

        let mut rcm = NewSalesInvoice::new("SINV-00001", date(10), COMPANY, GSTIN);
        rcm.is_reverse_charge = true;
        rcm.ecommerce_gstin = Some("29AAACE1206D1Z1".to_string());
        rcm.place_of_supply = Some("24-Gujarat".to_string());
        rcm.items = vec![item(GstTreatment::Taxable, 1500.0, 0.0)];
        db.transactions().insert_sales_invoice(&rcm).await.unwrap();

        let mut plain = NewSalesInvoice::new("SINV-00002", date(11), COMPANY, GSTIN);
        plain.place_of_supply = Some("24-Gujarat".to_string());
        plain.items = vec![NewInvoiceItem::taxable(1000.0, 0.0, 90.0, 90.0)];
        db.transactions().insert_sales_invoice(&plain).await.unwrap();

        let ctx = ctx();
        let assembled = ReportAssembler::new(&db, &ctx).assemble().await.unwrap();

        assert_eq!(assembled.report.eco_dtls.eco_reg_sup.txval, 1500.0);
        // 3.1(a) keeps only the plain sale
        assert_eq!(assembled.report.sup_details.osup_det.txval, 1000.0);
    }

    #[tokio::test]
    async fn test_missing_pos_invoices_listed() {
        let db = db().await;

        let mut missing = NewSalesInvoice::new("SINV-00001", date(10), COMPANY, GSTIN);
        missing.items = vec![NewInvoiceItem::taxable(100.0, 0.0, 9.0, 9.0)];
        db.transactions().insert_sales_invoice(&missing).await.unwrap();

        let ctx = ctx();
        let assembled = ReportAssembler::new(&db, &ctx).assemble().await.unwrap();
        assert_eq!(assembled.missing_field_invoices, vec!["SINV-00001".to_string()]);
    }
}
