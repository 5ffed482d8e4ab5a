//! # Tax Amounts
//!
//! Accumulator type for the four GST tax components plus taxable value.
//!
//! ## Why Deferred Rounding?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ROUNDING IS A SERIALIZATION CONCERN                                    │
//! │                                                                         │
//! │  Rounding per addend compounds error:                                   │
//! │    round2(10.005) + round2(10.005) = 10.01 + 10.01 = 20.02  ❌         │
//! │                                                                         │
//! │  Rounding once at the end does not:                                     │
//! │    round2(10.005 + 10.005)         = round2(20.01) = 20.01  ✓          │
//! │                                                                         │
//! │  Every aggregation pass therefore accumulates UNROUNDED sums.          │
//! │  `round2` runs exactly once, on the final statutory payload.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Rounds a monetary value to 2 decimal places (half away from zero).
///
/// Applied only at final serialization; see the module docs.
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Taxable value plus the four tax components of one or more lines.
///
/// Field names follow the statutory abbreviations: integrated (IGST),
/// central (CGST), state (SGST) and cess.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxAmounts {
    pub taxable_value: f64,
    pub igst: f64,
    pub cgst: f64,
    pub sgst: f64,
    pub cess: f64,
}

impl TaxAmounts {
    /// Zero amounts.
    pub fn zero() -> Self {
        TaxAmounts::default()
    }

    /// Returns a copy with every component rounded to 2 decimals.
    pub fn rounded(&self) -> Self {
        TaxAmounts {
            taxable_value: round2(self.taxable_value),
            igst: round2(self.igst),
            cgst: round2(self.cgst),
            sgst: round2(self.sgst),
            cess: round2(self.cess),
        }
    }

    /// True when every component is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.taxable_value == 0.0
            && self.igst == 0.0
            && self.cgst == 0.0
            && self.sgst == 0.0
            && self.cess == 0.0
    }
}

impl Add for TaxAmounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        TaxAmounts {
            taxable_value: self.taxable_value + other.taxable_value,
            igst: self.igst + other.igst,
            cgst: self.cgst + other.cgst,
            sgst: self.sgst + other.sgst,
            cess: self.cess + other.cess,
        }
    }
}

impl AddAssign for TaxAmounts {
    fn add_assign(&mut self, other: Self) {
        self.taxable_value += other.taxable_value;
        self.igst += other.igst;
        self.cgst += other.cgst;
        self.sgst += other.sgst;
        self.cess += other.cess;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
