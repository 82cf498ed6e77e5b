//! Calculation logic for the Salary Tax Engine.
//!
//! This module contains the pure tax formulas: piecewise-linear band
//! schedules, the rounding rules, the basic deduction, the job tax credit,
//! the supplementary charges (state tax, social contribution, flat income
//! reduction, public-service fee), the reduction allocation across tax
//! buckets, and the [`TaxOrchestrator`] that sequences them. Finished
//! calculations leave the core through the [`CalculationSink`] seam.

mod allocation;
mod bands;
mod basic_deduction;
mod job_tax_credit;
mod orchestrator;
mod rounding;
mod sink;
mod supplementary;

pub use allocation::{Allocation, BucketBalances, TaxBucket, allocate_reduction};
pub use bands::{Band, BandSchedule, BandScheduleBuilder, LinearFormula};
pub use basic_deduction::calculate_basic_deduction;
pub use job_tax_credit::{JobTaxCreditResult, adjusted_credit_rate, calculate_job_tax_credit};
pub use orchestrator::{
    TaxOrchestrator, WARNING_ADJUSTED_RATE_UNDERFLOW, WARNING_REDUCTION_NOT_CONSUMED,
};
pub use rounding::{
    round_down_to_hundred, round_down_to_unit, round_half_up, round_to_hundred_half_down,
    round_up_to_hundred,
};
pub use sink::CalculationSink;
pub use supplementary::{
    calculate_flat_income_reduction, calculate_public_service_fee, calculate_social_contribution,
    calculate_state_tax,
};
