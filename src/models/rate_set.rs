//! The set of locality rates applied by a calculation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The four proportional rates that apply to a locality on a given date.
///
/// Each rate is a decimal fraction (0.228 for 22.8%). The rate provider is
/// responsible for substituting defaults; the engine uses the values as given.
///
/// # Example
///
/// ```
/// use tax_engine::models::RateSet;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let rates = RateSet::new(
///     Decimal::from_str("0.228").unwrap(),
///     Decimal::from_str("0.1185").unwrap(),
///     Decimal::from_str("0.00292").unwrap(),
///     Decimal::ZERO,
/// );
/// assert_eq!(rates.combined_local_rate(), Decimal::from_str("0.3465").unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSet {
    /// Municipal income tax rate.
    pub local_tax_rate: Decimal,
    /// Regional income tax rate.
    pub regional_tax_rate: Decimal,
    /// Burial fee rate.
    pub burial_fee_rate: Decimal,
    /// Church fee rate, charged to members only.
    pub church_fee_rate: Decimal,
}

impl RateSet {
    /// Creates a rate set from its four rates.
    pub fn new(
        local_tax_rate: Decimal,
        regional_tax_rate: Decimal,
        burial_fee_rate: Decimal,
        church_fee_rate: Decimal,
    ) -> Self {
        Self {
            local_tax_rate,
            regional_tax_rate,
            burial_fee_rate,
            church_fee_rate,
        }
    }

    /// Municipal plus regional rate, the rate of the local tax bucket.
    pub fn combined_local_rate(&self) -> Decimal {
        self.local_tax_rate + self.regional_tax_rate
    }

    /// Checks that every rate lies within `[0, 1]`.
    pub fn validate(&self) -> EngineResult<()> {
        let named = [
            ("local_tax_rate", self.local_tax_rate),
            ("regional_tax_rate", self.regional_tax_rate),
            ("burial_fee_rate", self.burial_fee_rate),
            ("church_fee_rate", self.church_fee_rate),
        ];

        for (field, rate) in named {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(EngineError::invalid_input(
                    field,
                    format!("must be between 0 and 1, got {}", rate),
                ));
            }
        }
        Ok(())
    }
}
