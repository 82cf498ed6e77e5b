//! The fire-and-forget record offered to a calculation sink.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{LocalityId, TaxBreakdown};

/// Summary of one completed calculation, for analytics and auditing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationRecord {
    /// Unique id of this record.
    pub record_id: Uuid,
    /// The locality the calculation was made for.
    pub locality_id: LocalityId,
    /// Gross salary per month.
    pub gross_monthly_salary: Decimal,
    /// Total tax per month.
    pub monthly_total_tax: Decimal,
    /// Net salary per month.
    pub net_monthly_salary: Decimal,
    /// When the record was created.
    pub recorded_at: DateTime<Utc>,
}

impl CalculationRecord {
    /// Builds a record from a finished breakdown.
    pub fn from_breakdown(breakdown: &TaxBreakdown) -> Self {
        Self {
            record_id: Uuid::new_v4(),
            locality_id: breakdown.locality_id.clone(),
            gross_monthly_salary: breakdown.gross_monthly_salary,
            monthly_total_tax: breakdown.monthly_total_tax,
            net_monthly_salary: breakdown.net_monthly_salary,
            recorded_at: Utc::now(),
        }
    }
}
