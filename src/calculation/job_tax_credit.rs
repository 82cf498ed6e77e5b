//! Job tax credit (employment tax credit) calculation.
//!
//! The credit is a reduction of the local tax bucket only. For people under
//! the senior age it depends on the basic deduction and the local tax rate;
//! for seniors it is a simpler function of income alone.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::TaxYearConstants;

use super::basic_deduction::calculate_basic_deduction;
use super::rounding::{round_down_to_hundred, round_down_to_unit};

/// The job tax credit together with the intermediate values behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobTaxCreditResult {
    /// The yearly credit, in whole currency units.
    pub credit: Decimal,
    /// The income the bands were evaluated on (rounded down to 100 for the standard path).
    pub income_used: Decimal,
    /// The credit base before the basic deduction is subtracted (standard path only).
    pub credit_base: Option<Decimal>,
    /// The basic deduction subtracted from the credit base (standard path only).
    pub basic_deduction: Option<Decimal>,
    /// The rate the credit base was multiplied by (standard path only).
    pub applied_rate: Option<Decimal>,
    /// True when the adjusted rate was not positive and the unadjusted rate was used.
    pub rate_guard_applied: bool,
}

impl JobTaxCreditResult {
    fn zero(income_used: Decimal) -> Self {
        Self {
            credit: Decimal::ZERO,
            income_used,
            credit_base: None,
            basic_deduction: None,
            applied_rate: None,
            rate_guard_applied: false,
        }
    }
}

/// Returns the local rate the credit base is multiplied by.
///
/// The fixed burial and church fee share is excluded from the combined local
/// rate. If that leaves a rate of zero or less, the combined rate is used
/// unchanged and the second value is `true`.
pub fn adjusted_credit_rate(
    combined_local_rate: Decimal,
    constants: &TaxYearConstants,
) -> (Decimal, bool) {
    let adjusted = combined_local_rate - constants.credit_rate_adjustment;
    if adjusted <= Decimal::ZERO {
        (combined_local_rate, true)
    } else {
        (adjusted, false)
    }
}

/// Computes the yearly job tax credit.
///
/// # Arguments
///
/// * `yearly_income` - Yearly gross employment income
/// * `combined_local_rate` - Municipal plus regional tax rate
/// * `is_senior` - Whether the senior credit applies
/// * `constants` - The tax year's constants
///
/// # Examples
///
/// ```
/// use tax_engine::calculation::calculate_job_tax_credit;
/// use tax_engine::config::TaxYearConstants;
/// use rust_decimal::Decimal;
///
/// let constants = TaxYearConstants::for_year(2026).unwrap();
/// let result = calculate_job_tax_credit(
///     Decimal::new(450000, 0),
///     Decimal::new(3465, 4),
///     false,
///     &constants,
/// );
/// assert_eq!(result.credit, Decimal::new(51285, 0));
/// ```
pub fn calculate_job_tax_credit(
    yearly_income: Decimal,
    combined_local_rate: Decimal,
    is_senior: bool,
    constants: &TaxYearConstants,
) -> JobTaxCreditResult {
    if yearly_income <= Decimal::ZERO {
        return JobTaxCreditResult::zero(Decimal::ZERO);
    }

    if is_senior {
        senior_credit(yearly_income, constants)
    } else {
        standard_credit(yearly_income, combined_local_rate, constants)
    }
}

fn standard_credit(
    yearly_income: Decimal,
    combined_local_rate: Decimal,
    constants: &TaxYearConstants,
) -> JobTaxCreditResult {
    let income = round_down_to_hundred(yearly_income);
    let pbb = constants.price_base_amount;

    let credit_base = constants.job_credit_base.evaluate(income, pbb);
    let basic_deduction = calculate_basic_deduction(income, false, constants);
    let (rate, rate_guard_applied) = adjusted_credit_rate(combined_local_rate, constants);

    let net_base = (credit_base - basic_deduction).max(Decimal::ZERO);
    let credit = round_down_to_unit(net_base * rate);

    JobTaxCreditResult {
        credit,
        income_used: income,
        credit_base: Some(credit_base),
        basic_deduction: Some(basic_deduction),
        applied_rate: Some(rate),
        rate_guard_applied,
    }
}

fn senior_credit(yearly_income: Decimal, constants: &TaxYearConstants) -> JobTaxCreditResult {
    let raw = constants
        .senior_job_credit
        .evaluate(yearly_income, constants.price_base_amount);

    JobTaxCreditResult {
        credit: round_down_to_unit(raw.max(Decimal::ZERO)),
        ..JobTaxCreditResult::zero(yearly_income)
    }
}
