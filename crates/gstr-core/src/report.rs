//! # GSTR-3B Payload
//!
//! Typed rendition of the monthly summary return, replacing the
//! mutate-a-JSON-template approach with a schema the compiler checks.
//! Field names serialize to the statutory keys.
//!
//! ## Section Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  3.1  sup_details   outward supplies + inward reverse charge            │
//! │  3.1.1 eco_dtls     supplies taxed in the e-commerce operator's hands   │
//! │  3.2  inter_sup     inter-state supplies to unregistered/comp/UIN       │
//! │  4    itc_elg       input tax credit: available / reversed / net        │
//! │  5    inward_sup    inward nil-rated, exempt and non-GST supplies       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Amounts stay unrounded while sections accumulate; [`Gstr3bReport::rounded`]
//! produces the 2-decimal payload right before serialization.

use serde::{Deserialize, Serialize};

use crate::amount::round2;

// =============================================================================
// Section 3.1 - Outward Supplies
// =============================================================================

/// One row of section 3.1 with all four tax components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplyDetail {
    pub txval: f64,
    pub iamt: f64,
    pub camt: f64,
    pub samt: f64,
    pub csamt: f64,
}

/// Zero-rated row: no central/state components by construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ZeroRatedDetail {
    pub txval: f64,
    pub iamt: f64,
    pub csamt: f64,
}

/// Taxable-value-only row (nil/exempt and non-GST outward supplies).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueOnlyDetail {
    pub txval: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupDetails {
    /// (a) Outward taxable supplies (other than zero/nil/exempt).
    pub osup_det: SupplyDetail,
    /// (b) Outward taxable supplies (zero rated).
    pub osup_zero: ZeroRatedDetail,
    /// (c) Other outward supplies (nil rated, exempted).
    pub osup_nil_exmp: ValueOnlyDetail,
    /// (d) Inward supplies liable to reverse charge.
    pub isup_rev: SupplyDetail,
    /// (e) Non-GST outward supplies.
    pub osup_nongst: ValueOnlyDetail,
}

// =============================================================================
// Section 3.1.1 - E-commerce Operator Supplies
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EcoDetails {
    /// Supplies on which the e-commerce operator pays tax u/s 9(5),
    /// reported by the supplier at value only.
    pub eco_reg_sup: ValueOnlyDetail,
}

// =============================================================================
// Section 3.2 - Inter-State Supplies
// =============================================================================

/// One place-of-supply line of section 3.2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterStateSupply {
    /// Two-digit place-of-supply state code.
    pub pos: String,
    pub txval: f64,
    pub iamt: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterSup {
    /// Supplies made to unregistered persons.
    pub unreg_details: Vec<InterStateSupply>,
    /// Supplies made to composition taxable persons.
    pub comp_details: Vec<InterStateSupply>,
    /// Supplies made to UIN holders.
    pub uin_details: Vec<InterStateSupply>,
}

// =============================================================================
// Section 4 - Input Tax Credit
// =============================================================================

/// Typed `ty` discriminants of the ITC-available table.
pub mod itc_type {
    pub const IMPORT_OF_GOODS: &str = "IMPG";
    pub const IMPORT_OF_SERVICES: &str = "IMPS";
    pub const REVERSE_CHARGE: &str = "ISRC";
    pub const INPUT_SERVICE_DISTRIBUTOR: &str = "ISD";
    pub const ALL_OTHER: &str = "OTH";
    /// Reversal row: as per rules 42 & 43.
    pub const REVERSAL_RULES: &str = "RUL";
    /// Reversal row: others.
    pub const REVERSAL_OTHERS: &str = "OTH";
}

/// One typed row of the ITC tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItcDetail {
    pub ty: String,
    pub iamt: f64,
    pub camt: f64,
    pub samt: f64,
    pub csamt: f64,
}

impl ItcDetail {
    pub fn new(ty: &str) -> Self {
        ItcDetail {
            ty: ty.to_string(),
            iamt: 0.0,
            camt: 0.0,
            samt: 0.0,
            csamt: 0.0,
        }
    }
}

/// Net ITC row, without a discriminant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ItcNet {
    pub iamt: f64,
    pub camt: f64,
    pub samt: f64,
    pub csamt: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItcElg {
    /// 4(A) ITC available: IMPG, IMPS, ISRC, ISD, OTH in fixed order.
    pub itc_avl: [ItcDetail; 5],
    /// 4(B) ITC reversed: rules 42 & 43, then others.
    pub itc_rev: [ItcDetail; 2],
    /// 4(C) Net ITC = available - reversed.
    pub itc_net: ItcNet,
    /// 4(D) Ineligible ITC: reclaim of earlier reversals, then others.
    pub itc_inelg: [ItcDetail; 2],
}

impl Default for ItcElg {
    fn default() -> Self {
        ItcElg {
            itc_avl: [
                ItcDetail::new(itc_type::IMPORT_OF_GOODS),
                ItcDetail::new(itc_type::IMPORT_OF_SERVICES),
                ItcDetail::new(itc_type::REVERSE_CHARGE),
                ItcDetail::new(itc_type::INPUT_SERVICE_DISTRIBUTOR),
                ItcDetail::new(itc_type::ALL_OTHER),
            ],
            itc_rev: [
                ItcDetail::new(itc_type::REVERSAL_RULES),
                ItcDetail::new(itc_type::REVERSAL_OTHERS),
            ],
            itc_net: ItcNet::default(),
            itc_inelg: [
                ItcDetail::new(itc_type::REVERSAL_RULES),
                ItcDetail::new(itc_type::REVERSAL_OTHERS),
            ],
        }
    }
}

impl ItcElg {
    /// Row index into `itc_avl` for an ITC classification discriminant,
    /// if it belongs there.
    pub fn available_index(ty: &str) -> Option<usize> {
        match ty {
            itc_type::IMPORT_OF_GOODS => Some(0),
            itc_type::IMPORT_OF_SERVICES => Some(1),
            itc_type::REVERSE_CHARGE => Some(2),
            itc_type::INPUT_SERVICE_DISTRIBUTOR => Some(3),
            itc_type::ALL_OTHER => Some(4),
            _ => None,
        }
    }

    /// Recomputes 4(C) as the sum of 4(A); reversal passes subtract
    /// from it afterwards.
    pub fn recompute_net(&mut self) {
        self.itc_net = ItcNet::default();
        for row in &self.itc_avl {
            self.itc_net.iamt += row.iamt;
            self.itc_net.camt += row.camt;
            self.itc_net.samt += row.samt;
            self.itc_net.csamt += row.csamt;
        }
    }
}

// =============================================================================
// Section 5 - Inward Nil/Exempt Supplies
// =============================================================================

/// Typed `ty` discriminants of the inward supplies table.
pub mod inward_type {
    pub const COMPOSITION_NIL_EXEMPT: &str = "GST";
    pub const NON_GST: &str = "NONGST";
}

/// One row of section 5, split inter/intra state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InwardSupplyDetail {
    pub ty: String,
    pub inter: f64,
    pub intra: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InwardSup {
    /// Composition/nil/exempt row first, non-GST row second.
    pub isup_details: [InwardSupplyDetail; 2],
}

impl Default for InwardSup {
    fn default() -> Self {
        InwardSup {
            isup_details: [
                InwardSupplyDetail {
                    ty: inward_type::COMPOSITION_NIL_EXEMPT.to_string(),
                    inter: 0.0,
                    intra: 0.0,
                },
                InwardSupplyDetail {
                    ty: inward_type::NON_GST.to_string(),
                    inter: 0.0,
                    intra: 0.0,
                },
            ],
        }
    }
}

// =============================================================================
// Full Report
// =============================================================================

/// The complete GSTR-3B payload for one registration and period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gstr3bReport {
    pub gstin: String,
    /// Return period as `MMYYYY`.
    pub ret_period: String,
    pub sup_details: SupDetails,
    pub eco_dtls: EcoDetails,
    pub inter_sup: InterSup,
    pub itc_elg: ItcElg,
    pub inward_sup: InwardSup,
}

impl Gstr3bReport {
    pub fn new(gstin: &str, ret_period: &str) -> Self {
        Gstr3bReport {
            gstin: gstin.to_string(),
            ret_period: ret_period.to_string(),
            sup_details: SupDetails::default(),
            eco_dtls: EcoDetails::default(),
            inter_sup: InterSup::default(),
            itc_elg: ItcElg::default(),
            inward_sup: InwardSup::default(),
        }
    }

    /// Rounds every amount to 2 decimals. Runs once, after all sections
    /// have accumulated their unrounded sums.
    pub fn rounded(&self) -> Self {
        let mut report = self.clone();

        for detail in [
            &mut report.sup_details.osup_det,
            &mut report.sup_details.isup_rev,
        ] {
            detail.txval = round2(detail.txval);
            detail.iamt = round2(detail.iamt);
            detail.camt = round2(detail.camt);
            detail.samt = round2(detail.samt);
            detail.csamt = round2(detail.csamt);
        }
        report.sup_details.osup_zero.txval = round2(report.sup_details.osup_zero.txval);
        report.sup_details.osup_zero.iamt = round2(report.sup_details.osup_zero.iamt);
        report.sup_details.osup_zero.csamt = round2(report.sup_details.osup_zero.csamt);
        report.sup_details.osup_nil_exmp.txval = round2(report.sup_details.osup_nil_exmp.txval);
        report.sup_details.osup_nongst.txval = round2(report.sup_details.osup_nongst.txval);
        report.eco_dtls.eco_reg_sup.txval = round2(report.eco_dtls.eco_reg_sup.txval);

        for section in [
            &mut report.inter_sup.unreg_details,
            &mut report.inter_sup.comp_details,
            &mut report.inter_sup.uin_details,
        ] {
            for entry in section.iter_mut() {
                entry.txval = round2(entry.txval);
                entry.iamt = round2(entry.iamt);
            }
        }

        for row in report
            .itc_elg
            .itc_avl
            .iter_mut()
            .chain(report.itc_elg.itc_rev.iter_mut())
            .chain(report.itc_elg.itc_inelg.iter_mut())
        {
            row.iamt = round2(row.iamt);
            row.camt = round2(row.camt);
            row.samt = round2(row.samt);
            row.csamt = round2(row.csamt);
        }
        report.itc_elg.itc_net.iamt = round2(report.itc_elg.itc_net.iamt);
        report.itc_elg.itc_net.camt = round2(report.itc_elg.itc_net.camt);
        report.itc_elg.itc_net.samt = round2(report.itc_elg.itc_net.samt);
        report.itc_elg.itc_net.csamt = round2(report.itc_elg.itc_net.csamt);

        for row in report.inward_sup.isup_details.iter_mut() {
            row.inter = round2(row.inter);
            row.intra = round2(row.intra);
        }

        report
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
