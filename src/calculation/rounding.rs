//! Rounding rules used by the tax formulas.
//!
//! Each quantity in the calculation has its own published rounding rule.
//! These helpers are applied exactly once, at the point each rule names.

use rust_decimal::{Decimal, RoundingStrategy};

const HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);
const FIFTY: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Rounds to `dp` decimal places, with midpoints rounded away from zero.
///
/// ```
/// use tax_engine::calculation::round_half_up;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_half_up(Decimal::new(8249875, 3), 2), Decimal::new(824988, 2));
/// ```
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Drops any fractional part, keeping whole currency units.
pub fn round_down_to_unit(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::ToZero)
}

/// Rounds up to the next multiple of 100.
pub fn round_up_to_hundred(value: Decimal) -> Decimal {
    (value / HUNDRED).round_dp_with_strategy(0, RoundingStrategy::AwayFromZero) * HUNDRED
}

/// Rounds down to the previous multiple of 100.
pub fn round_down_to_hundred(value: Decimal) -> Decimal {
    (value / HUNDRED).round_dp_with_strategy(0, RoundingStrategy::ToZero) * HUNDRED
}

/// Rounds to the nearest multiple of 100, where a remainder of exactly 50
/// goes to the lower hundred.
///
/// ```
/// use tax_engine::calculation::round_to_hundred_half_down;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_to_hundred_half_down(Decimal::new(31550, 0)), Decimal::new(31500, 0));
/// assert_eq!(round_to_hundred_half_down(Decimal::new(3155001, 2)), Decimal::new(31600, 0));
/// ```
pub fn round_to_hundred_half_down(value: Decimal) -> Decimal {
    let remainder = value % HUNDRED;
    let lower = value - remainder;

    if remainder > FIFTY {
        lower + HUNDRED
    } else {
        lower
    }
}
