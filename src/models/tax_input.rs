//! Tax input model and related types.
//!
//! This module defines the [`TaxInput`] struct describing one salary to be
//! taxed, the opaque [`LocalityId`] handle, and the [`TaxRequest`] wire shape
//! whose fields may be missing.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Largest accepted gross monthly salary.
///
/// Keeps every yearly product of salary and rate well inside the range of
/// [`Decimal`].
pub const MAX_GROSS_MONTHLY_SALARY: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Opaque handle identifying the locality (municipality) whose rates apply.
///
/// The engine never interprets the value; it is resolved by the caller and
/// passed through to the rate provider and the calculation sink.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalityId(String);

impl LocalityId {
    /// Creates a locality id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocalityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocalityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// The salary and personal circumstances for a single calculation.
///
/// # Example
///
/// ```
/// use tax_engine::models::TaxInput;
/// use rust_decimal::Decimal;
///
/// let input = TaxInput::new(Decimal::new(37500, 0), "0180", false, false).unwrap();
/// assert_eq!(input.locality_id.as_str(), "0180");
///
/// assert!(TaxInput::new(Decimal::new(-1, 0), "0180", false, false).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxInput {
    /// Gross salary per month.
    pub gross_monthly_salary: Decimal,
    /// The locality whose rates were resolved for this calculation.
    pub locality_id: LocalityId,
    /// Whether the person pays the church membership fee.
    #[serde(default)]
    pub is_church_member: bool,
    /// Whether the enhanced senior rules apply.
    #[serde(default)]
    pub is_senior: bool,
}

impl TaxInput {
    /// Creates a validated tax input.
    ///
    /// Returns [`EngineError::InvalidInput`] if the gross salary is negative.
    pub fn new(
        gross_monthly_salary: Decimal,
        locality_id: impl Into<LocalityId>,
        is_church_member: bool,
        is_senior: bool,
    ) -> EngineResult<Self> {
        let input = Self {
            gross_monthly_salary,
            locality_id: locality_id.into(),
            is_church_member,
            is_senior,
        };
        input.validate()?;
        Ok(input)
    }

    /// Checks that the gross salary is non-negative and at most
    /// [`MAX_GROSS_MONTHLY_SALARY`].
    pub fn validate(&self) -> EngineResult<()> {
        if self.gross_monthly_salary.is_sign_negative() && !self.gross_monthly_salary.is_zero() {
            return Err(EngineError::invalid_input(
                "gross_monthly_salary",
                format!("must not be negative, got {}", self.gross_monthly_salary),
            ));
        }
        if self.gross_monthly_salary > MAX_GROSS_MONTHLY_SALARY {
            return Err(EngineError::invalid_input(
                "gross_monthly_salary",
                format!(
                    "must not exceed {}, got {}",
                    MAX_GROSS_MONTHLY_SALARY, self.gross_monthly_salary
                ),
            ));
        }
        Ok(())
    }
}

/// A tax request as received from an outer layer, where the salary may be absent.
///
/// Convert into a [`TaxInput`] with `TryFrom`; a missing or negative salary
/// is rejected with [`EngineError::InvalidInput`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxRequest {
    /// Gross salary per month, if supplied.
    #[serde(default)]
    pub gross_monthly_salary: Option<Decimal>,
    /// The resolved locality id.
    pub locality_id: LocalityId,
    /// Whether the person pays the church membership fee.
    #[serde(default)]
    pub is_church_member: bool,
    /// Whether the enhanced senior rules apply.
    #[serde(default)]
    pub is_senior: bool,
}

impl TryFrom<TaxRequest> for TaxInput {
    type Error = EngineError;

    fn try_from(req: TaxRequest) -> EngineResult<Self> {
        let gross = req.gross_monthly_salary.ok_or_else(|| {
            EngineError::invalid_input("gross_monthly_salary", "is required")
        })?;
        TaxInput::new(gross, req.locality_id, req.is_church_member, req.is_senior)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_new_accepts_zero_salary() {
        let input = TaxInput::new(Decimal::ZERO, "0180", false, false);
        assert!(input.is_ok());
    }

    #[test]
    fn test_new_accepts_negative_zero() {
        let input = TaxInput::new(dec("-0.00"), "0180", false, false);
        assert!(input.is_ok());
    }

    #[test]
    fn test_new_rejects_negative_salary() {
        let result = TaxInput::new(dec("-0.01"), "0180", false, false);
        match result {
            Err(EngineError::InvalidInput { field, message }) => {
                assert_eq!(field, "gross_monthly_salary");
                assert!(message.contains("-0.01"));
            }
            _ => panic!("Expected InvalidInput error"),
        }
    }

    #[test]
    fn test_new_accepts_maximum_salary() {
        assert!(TaxInput::new(MAX_GROSS_MONTHLY_SALARY, "0180", false, false).is_ok());
    }

    #[test]
    fn test_new_rejects_salary_above_maximum() {
        let above = MAX_GROSS_MONTHLY_SALARY + dec("0.01");
        match TaxInput::new(above, "0180", false, false) {
            Err(EngineError::InvalidInput { field, message }) => {
                assert_eq!(field, "gross_monthly_salary");
                assert!(message.contains("must not exceed"));
            }
            _ => panic!("Expected InvalidInput error"),
        }
    }

    #[test]
    fn test_new_rejects_salary_near_decimal_max() {
        let result = TaxInput::new(Decimal::MAX / Decimal::new(10, 0), "0180", false, false);
        assert!(matches!(result, Err(EngineError::InvalidInput { .. })));
    }

    #[test]
    fn test_deserialize_input_with_defaults() {
        let json = r#"{
            "gross_monthly_salary": "37500",
            "locality_id": "0180"
        }"#;

        let input: TaxInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.gross_monthly_salary, dec("37500"));
        assert_eq!(input.locality_id, LocalityId::new("0180"));
        assert!(!input.is_church_member);
        assert!(!input.is_senior);
    }

    #[test]
    fn test_request_without_salary_is_invalid() {
        let json = r#"{ "locality_id": "0180", "is_church_member": true }"#;
        let request: TaxRequest = serde_json::from_str(json).unwrap();

        match TaxInput::try_from(request) {
            Err(EngineError::InvalidInput { field, message }) => {
                assert_eq!(field, "gross_monthly_salary");
                assert_eq!(message, "is required");
            }
            _ => panic!("Expected InvalidInput error"),
        }
    }

    #[test]
    fn test_request_converts_to_input() {
        let request = TaxRequest {
            gross_monthly_salary: Some(dec("42000")),
            locality_id: LocalityId::new("1480"),
            is_church_member: true,
            is_senior: true,
        };

        let input = TaxInput::try_from(request).unwrap();
        assert_eq!(input.gross_monthly_salary, dec("42000"));
        assert!(input.is_church_member);
        assert!(input.is_senior);
    }

    #[test]
    fn test_locality_id_serializes_as_plain_string() {
        let id = LocalityId::new("0180");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"0180\"");
        assert_eq!(id.to_string(), "0180");
    }
}
