//! State tax, social contribution, flat income reduction and public-service fee.
//!
//! Each charge is an independent function of yearly gross or yearly taxable
//! income and applies its own rounding rule.

use rust_decimal::Decimal;

use crate::config::TaxYearConstants;

use super::rounding::{round_down_to_unit, round_half_up, round_to_hundred_half_down};

/// State income tax: a flat rate on taxable income above the threshold,
/// rounded to two decimals.
///
/// ```
/// use tax_engine::calculation::calculate_state_tax;
/// use tax_engine::config::TaxYearConstants;
/// use rust_decimal::Decimal;
///
/// let constants = TaxYearConstants::for_year(2026).unwrap();
/// assert_eq!(calculate_state_tax(Decimal::new(700000, 0), &constants), Decimal::new(11400, 0));
/// ```
pub fn calculate_state_tax(taxable_income: Decimal, constants: &TaxYearConstants) -> Decimal {
    let rule = &constants.state_tax;
    if taxable_income <= rule.threshold {
        return Decimal::ZERO;
    }
    round_half_up((taxable_income - rule.threshold) * rule.rate, 2)
}

/// General pension contribution on yearly gross income.
///
/// Seniors and incomes below the minimum pay nothing. Otherwise the rate is
/// applied to income up to the maximum base, the result is rounded to the
/// nearest 100 (an exact remainder of 50 rounds down), and finally capped.
pub fn calculate_social_contribution(
    yearly_gross: Decimal,
    is_senior: bool,
    constants: &TaxYearConstants,
) -> Decimal {
    let rule = &constants.social_contribution;
    if is_senior || yearly_gross < rule.min_income {
        return Decimal::ZERO;
    }

    let contribution = yearly_gross.min(rule.max_base) * rule.rate;
    round_to_hundred_half_down(contribution).min(rule.max_amount)
}

/// Flat reduction on taxable income: a fraction of the excess above the
/// threshold, reaching its cap at the plateau threshold. Rounded down.
pub fn calculate_flat_income_reduction(
    taxable_income: Decimal,
    constants: &TaxYearConstants,
) -> Decimal {
    let rule = &constants.flat_income_reduction;
    if taxable_income <= rule.threshold {
        return Decimal::ZERO;
    }
    if taxable_income >= rule.plateau_threshold {
        return rule.cap;
    }
    round_down_to_unit((taxable_income - rule.threshold) * rule.rate)
}

/// Public-service fee: a fraction of taxable income, capped once taxable
/// income reaches the threshold. Rounded down.
pub fn calculate_public_service_fee(
    taxable_income: Decimal,
    constants: &TaxYearConstants,
) -> Decimal {
    let rule = &constants.public_service_fee;
    if taxable_income <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    if taxable_income >= rule.threshold {
        return rule.cap;
    }
    round_down_to_unit(taxable_income * rule.rate)
}
