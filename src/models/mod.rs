//! Core data models for the Salary Tax Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod audit;
mod calculation_record;
mod rate_set;
mod tax_breakdown;
mod tax_input;

pub use audit::{AuditStep, AuditTrace, AuditWarning};
pub use calculation_record::CalculationRecord;
pub use rate_set::RateSet;
pub use tax_breakdown::{TaxBreakdown, TaxCalculation};
pub use tax_input::{LocalityId, MAX_GROSS_MONTHLY_SALARY, TaxInput, TaxRequest};
