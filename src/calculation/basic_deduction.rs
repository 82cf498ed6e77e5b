//! Basic deduction calculation.
//!
//! The basic deduction is a tax-free allowance subtracted from yearly gross
//! income. It rises with income to a maximum and then falls again, and
//! seniors get an additional enhancement on top.

use rust_decimal::Decimal;

use crate::config::TaxYearConstants;

use super::rounding::round_up_to_hundred;

/// Computes the yearly basic deduction for a yearly income.
///
/// The standard bands are evaluated and clamped to the income. For seniors
/// the enhanced-deduction bands are added before rounding. The combined
/// amount is rounded up to the nearest 100 and never exceeds the income.
///
/// Incomes of zero or less give no deduction.
///
/// # Examples
///
/// ```
/// use tax_engine::calculation::calculate_basic_deduction;
/// use tax_engine::config::TaxYearConstants;
/// use rust_decimal::Decimal;
///
/// let constants = TaxYearConstants::for_year(2026).unwrap();
///
/// // 0.77 PBB − 10% × (450 000 − 3.11 PBB) = 18 995.20, rounded up
/// let deduction = calculate_basic_deduction(Decimal::new(450000, 0), false, &constants);
/// assert_eq!(deduction, Decimal::new(19000, 0));
/// ```
pub fn calculate_basic_deduction(
    yearly_income: Decimal,
    is_senior: bool,
    constants: &TaxYearConstants,
) -> Decimal {
    if yearly_income <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let pbb = constants.price_base_amount;
    let standard = constants
        .basic_deduction
        .evaluate(yearly_income, pbb)
        .min(yearly_income);

    let total = if is_senior {
        standard + constants.senior_basic_deduction.evaluate(yearly_income, pbb)
    } else {
        standard
    };

    round_up_to_hundred(total.max(Decimal::ZERO)).min(yearly_income)
}
