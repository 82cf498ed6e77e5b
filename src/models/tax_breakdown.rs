//! The itemized result of a tax calculation.
//!
//! This module contains the [`TaxBreakdown`] value object and the
//! [`TaxCalculation`] wrapper that pairs it with an audit trace.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AuditTrace, LocalityId};

/// Every intermediate and final amount of a salary tax calculation.
///
/// All `yearly_*` amounts are for the full tax year. Amounts are never
/// negative; each one carries the rounding of the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    /// The tax year whose constants were applied.
    pub tax_year: i32,
    /// The locality the rates belong to.
    pub locality_id: LocalityId,

    /// Gross salary per month, as supplied.
    pub gross_monthly_salary: Decimal,
    /// Gross salary for the year (monthly × 12).
    pub yearly_gross: Decimal,

    /// Municipal tax rate used.
    pub local_tax_rate: Decimal,
    /// Regional tax rate used.
    pub regional_tax_rate: Decimal,
    /// State tax rate above the threshold.
    pub state_tax_rate: Decimal,
    /// Burial fee rate used.
    pub burial_fee_rate: Decimal,
    /// Church fee rate used (zero for non-members).
    pub church_fee_rate: Decimal,

    /// Basic deduction, a multiple of 100.
    pub yearly_basic_deduction: Decimal,
    /// Gross less basic deduction, never negative.
    pub yearly_taxable_income: Decimal,
    /// Municipal tax before reductions.
    pub yearly_local_tax: Decimal,
    /// Regional tax before reductions.
    pub yearly_regional_tax: Decimal,
    /// State tax before reductions.
    pub yearly_state_tax: Decimal,
    /// Social (pension) contribution charged.
    pub yearly_social_contribution: Decimal,
    /// Employment tax credit, in whole units.
    pub yearly_job_tax_credit: Decimal,
    /// Flat income reduction, in whole units.
    pub yearly_flat_income_reduction: Decimal,
    /// Public-service fee, in whole units.
    pub yearly_public_service_fee: Decimal,
    /// Burial fee, in whole units.
    pub yearly_burial_fee: Decimal,
    /// Church fee, in whole units.
    pub yearly_church_fee: Decimal,

    /// The part of the social contribution offset against local and state tax.
    pub yearly_social_contribution_reduction: Decimal,
    /// Local tax bucket (municipal + regional) after all reductions.
    pub yearly_local_tax_after_reductions: Decimal,
    /// State tax after the social-contribution reduction.
    pub yearly_state_tax_after_reductions: Decimal,

    /// Total tax for the year.
    pub yearly_total_tax: Decimal,
    /// Total tax per month, rounded to two decimals.
    pub monthly_total_tax: Decimal,
    /// Gross monthly salary less monthly tax.
    pub net_monthly_salary: Decimal,
    /// Yearly total tax over yearly gross, four decimals.
    pub effective_tax_rate: Decimal,
}

impl TaxBreakdown {
    /// Returns every currency component paired with its field name.
    ///
    /// Useful for asserting the non-negativity invariant over the whole result.
    pub fn components(&self) -> [(&'static str, Decimal); 20] {
        [
            ("yearly_gross", self.yearly_gross),
            ("yearly_basic_deduction", self.yearly_basic_deduction),
            ("yearly_taxable_income", self.yearly_taxable_income),
            ("yearly_local_tax", self.yearly_local_tax),
            ("yearly_regional_tax", self.yearly_regional_tax),
            ("yearly_state_tax", self.yearly_state_tax),
            ("yearly_social_contribution", self.yearly_social_contribution),
            ("yearly_job_tax_credit", self.yearly_job_tax_credit),
            ("yearly_flat_income_reduction", self.yearly_flat_income_reduction),
            ("yearly_public_service_fee", self.yearly_public_service_fee),
            ("yearly_burial_fee", self.yearly_burial_fee),
            ("yearly_church_fee", self.yearly_church_fee),
            (
                "yearly_social_contribution_reduction",
                self.yearly_social_contribution_reduction,
            ),
            (
                "yearly_local_tax_after_reductions",
                self.yearly_local_tax_after_reductions,
            ),
            (
                "yearly_state_tax_after_reductions",
                self.yearly_state_tax_after_reductions,
            ),
            ("yearly_total_tax", self.yearly_total_tax),
            ("monthly_total_tax", self.monthly_total_tax),
            ("net_monthly_salary", self.net_monthly_salary),
            ("effective_tax_rate", self.effective_tax_rate),
            ("gross_monthly_salary", self.gross_monthly_salary),
        ]
    }
}

/// A breakdown together with the audit trace explaining it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalculation {
    /// The itemized result.
    pub breakdown: TaxBreakdown,
    /// The steps and warnings recorded while computing it.
    pub audit_trace: AuditTrace,
}
