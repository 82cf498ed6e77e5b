//! The tax orchestrator.
//!
//! [`TaxOrchestrator`] runs the individual rules in order, offsets the
//! reductions against the local and state buckets, and assembles the
//! itemized [`TaxBreakdown`]. It holds no per-call state, so one instance can
//! serve any number of concurrent calculations.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::TaxYearConstants;
use crate::error::EngineResult;
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, CalculationRecord, RateSet, TaxBreakdown, TaxCalculation,
    TaxInput,
};
use super::allocation::{Allocation, BucketBalances, TaxBucket};
use super::basic_deduction::calculate_basic_deduction;
use super::job_tax_credit::calculate_job_tax_credit;
use super::rounding::{round_down_to_unit, round_half_up};
use super::sink::CalculationSink;
use super::supplementary::{
    calculate_flat_income_reduction, calculate_public_service_fee, calculate_social_contribution,
    calculate_state_tax,
};

/// Warning code raised when the adjusted job credit rate was not positive.
pub const WARNING_ADJUSTED_RATE_UNDERFLOW: &str = "ADJUSTED_RATE_UNDERFLOW";

/// Warning code raised when a reduction was larger than the buckets it may use.
pub const WARNING_REDUCTION_NOT_CONSUMED: &str = "REDUCTION_NOT_CONSUMED";

/// Computes itemized salary tax for one tax year.
///
/// # Example
///
/// ```
/// use tax_engine::calculation::TaxOrchestrator;
/// use tax_engine::models::{RateSet, TaxInput};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let orchestrator = TaxOrchestrator::for_year(2026).unwrap();
/// let input = TaxInput::new(Decimal::new(37500, 0), "0180", false, false).unwrap();
/// let rates = RateSet::new(
///     Decimal::from_str("0.228").unwrap(),
///     Decimal::from_str("0.1185").unwrap(),
///     Decimal::from_str("0.00292").unwrap(),
///     Decimal::ZERO,
/// );
///
/// let breakdown = orchestrator.compute(&input, &rates).unwrap();
/// assert_eq!(breakdown.net_monthly_salary, Decimal::from_str("29250.12").unwrap());
/// ```
#[derive(Clone)]
pub struct TaxOrchestrator {
    constants: TaxYearConstants,
    sink: Option<Arc<dyn CalculationSink>>,
}

impl fmt::Debug for TaxOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaxOrchestrator")
            .field("tax_year", &self.constants.tax_year)
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

impl TaxOrchestrator {
    /// Creates an orchestrator for the given constants, without a sink.
    pub fn new(constants: TaxYearConstants) -> Self {
        Self {
            constants,
            sink: None,
        }
    }

    /// Creates an orchestrator using the built-in constants for a tax year.
    pub fn for_year(year: i32) -> EngineResult<Self> {
        Ok(Self::new(TaxYearConstants::for_year(year)?))
    }

    /// Offers a [`CalculationRecord`] to `sink` after every calculation.
    pub fn with_sink(mut self, sink: Arc<dyn CalculationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// The constants this orchestrator applies.
    pub fn constants(&self) -> &TaxYearConstants {
        &self.constants
    }

    /// Computes the itemized breakdown for a salary.
    ///
    /// Returns [`EngineError::InvalidInput`](crate::error::EngineError::InvalidInput)
    /// for a negative salary or a rate outside `[0, 1]`; nothing is computed
    /// in that case.
    pub fn compute(&self, input: &TaxInput, rates: &RateSet) -> EngineResult<TaxBreakdown> {
        Ok(self.compute_with_trace(input, rates)?.breakdown)
    }

    /// Computes the breakdown together with an audit trace of every rule applied.
    pub fn compute_with_trace(
        &self,
        input: &TaxInput,
        rates: &RateSet,
    ) -> EngineResult<TaxCalculation> {
        let start_time = Instant::now();
        input.validate()?;
        rates.validate()?;

        let c = &self.constants;
        let mut trace = TraceRecorder::default();

        // 1. Yearly gross
        let months = Decimal::from(c.months_per_year);
        let yearly_gross = input.gross_monthly_salary * months;
        trace.record(
            "yearly_gross",
            "Yearly Gross Income",
            "7.1",
            serde_json::json!({
                "gross_monthly_salary": input.gross_monthly_salary.to_string(),
                "months": c.months_per_year
            }),
            serde_json::json!({ "yearly_gross": yearly_gross.to_string() }),
            format!(
                "{} x {} = {}",
                input.gross_monthly_salary.normalize(),
                c.months_per_year,
                yearly_gross.normalize()
            ),
        );

        // 2-3. Basic deduction and taxable income
        let basic_deduction = calculate_basic_deduction(yearly_gross, input.is_senior, c);
        let taxable_income = (yearly_gross - basic_deduction).max(Decimal::ZERO);
        trace.record(
            "basic_deduction",
            "Basic Deduction",
            if input.is_senior { "6.1, 6.2" } else { "6.1" },
            serde_json::json!({
                "yearly_gross": yearly_gross.to_string(),
                "is_senior": input.is_senior,
                "price_base_amount": c.price_base_amount.to_string()
            }),
            serde_json::json!({
                "basic_deduction": basic_deduction.to_string(),
                "taxable_income": taxable_income.to_string()
            }),
            format!(
                "Deduction {} kr (rounded up to 100), taxable income {} kr",
                basic_deduction.normalize(),
                taxable_income.normalize()
            ),
        );

        // 4. Local bucket
        let local_tax = round_half_up(taxable_income * rates.local_tax_rate, 2);
        let regional_tax = round_half_up(taxable_income * rates.regional_tax_rate, 2);
        let local_bucket = local_tax + regional_tax;
        trace.record(
            "local_tax",
            "Municipal and Regional Tax",
            "7.3",
            serde_json::json!({
                "taxable_income": taxable_income.to_string(),
                "local_tax_rate": rates.local_tax_rate.to_string(),
                "regional_tax_rate": rates.regional_tax_rate.to_string()
            }),
            serde_json::json!({
                "local_tax": local_tax.to_string(),
                "regional_tax": regional_tax.to_string(),
                "local_bucket": local_bucket.to_string()
            }),
            format!(
                "{} kr + {} kr = {} kr",
                local_tax.normalize(),
                regional_tax.normalize(),
                local_bucket.normalize()
            ),
        );

        // 5. Supplementary charges
        let state_tax = calculate_state_tax(taxable_income, c);
        trace.record(
            "state_tax",
            "State Income Tax",
            "7.2",
            serde_json::json!({
                "taxable_income": taxable_income.to_string(),
                "threshold": c.state_tax.threshold.to_string(),
                "rate": c.state_tax.rate.to_string()
            }),
            serde_json::json!({ "state_tax": state_tax.to_string() }),
            if state_tax.is_zero() {
                format!(
                    "Taxable income {} kr does not exceed threshold {} kr",
                    taxable_income.normalize(),
                    c.state_tax.threshold.normalize()
                )
            } else {
                format!(
                    "{} x ({} kr - {} kr) = {} kr",
                    c.state_tax.rate.normalize(),
                    taxable_income.normalize(),
                    c.state_tax.threshold.normalize(),
                    state_tax.normalize()
                )
            },
        );

        let social_contribution = calculate_social_contribution(yearly_gross, input.is_senior, c);
        trace.record(
            "social_contribution",
            "General Pension Contribution",
            "7.4",
            serde_json::json!({
                "yearly_gross": yearly_gross.to_string(),
                "is_senior": input.is_senior,
                "max_base": c.social_contribution.max_base.to_string()
            }),
            serde_json::json!({ "social_contribution": social_contribution.to_string() }),
            format!(
                "Contribution {} kr (nearest 100, 50 rounds down, max {} kr)",
                social_contribution.normalize(),
                c.social_contribution.max_amount.normalize()
            ),
        );

        let flat_reduction = calculate_flat_income_reduction(taxable_income, c);
        let public_service_fee = calculate_public_service_fee(taxable_income, c);
        trace.record(
            "flat_reduction_and_public_service",
            "Earned Income Reduction and Public-Service Fee",
            "7.5.4, 7.6",
            serde_json::json!({ "taxable_income": taxable_income.to_string() }),
            serde_json::json!({
                "flat_income_reduction": flat_reduction.to_string(),
                "public_service_fee": public_service_fee.to_string()
            }),
            format!(
                "Reduction {} kr, fee {} kr",
                flat_reduction.normalize(),
                public_service_fee.normalize()
            ),
        );

        // 6. Job tax credit
        let job = calculate_job_tax_credit(
            yearly_gross,
            rates.combined_local_rate(),
            input.is_senior,
            c,
        );
        trace.record(
            "job_tax_credit",
            "Job Tax Credit",
            "7.5.2",
            serde_json::json!({
                "income_used": job.income_used.to_string(),
                "combined_local_rate": rates.combined_local_rate().to_string(),
                "is_senior": input.is_senior
            }),
            serde_json::json!({
                "credit": job.credit.to_string(),
                "credit_base": job.credit_base.map(|v| v.to_string()),
                "applied_rate": job.applied_rate.map(|v| v.to_string())
            }),
            match (job.credit_base, job.basic_deduction, job.applied_rate) {
                (Some(base), Some(deduction), Some(rate)) => format!(
                    "({} kr - {} kr) x {} = {} kr",
                    base.normalize(),
                    deduction.normalize(),
                    rate.normalize(),
                    job.credit.normalize()
                ),
                _ => format!("Senior credit {} kr", job.credit.normalize()),
            },
        );
        if job.rate_guard_applied {
            trace.warn(
                WARNING_ADJUSTED_RATE_UNDERFLOW,
                format!(
                    "Local rate {} minus {} is not positive; credit uses the unadjusted rate",
                    rates.combined_local_rate().normalize(),
                    c.credit_rate_adjustment.normalize()
                ),
                "medium",
            );
        }

        // 7. Membership fees
        let burial_fee = round_down_to_unit(taxable_income * rates.burial_fee_rate);
        let church_fee_rate = if input.is_church_member {
            rates.church_fee_rate
        } else {
            Decimal::ZERO
        };
        let church_fee = round_down_to_unit(taxable_income * church_fee_rate);
        trace.record(
            "membership_fees",
            "Burial and Church Fees",
            "7.3",
            serde_json::json!({
                "taxable_income": taxable_income.to_string(),
                "burial_fee_rate": rates.burial_fee_rate.to_string(),
                "church_fee_rate": church_fee_rate.to_string(),
                "is_church_member": input.is_church_member
            }),
            serde_json::json!({
                "burial_fee": burial_fee.to_string(),
                "church_fee": church_fee.to_string()
            }),
            format!(
                "Burial {} kr, church {} kr",
                burial_fee.normalize(),
                church_fee.normalize()
            ),
        );

        // 8. Reductions: job credit and flat reduction against the local bucket,
        // then the social contribution against local and the remainder against state.
        let mut balances = BucketBalances::new(local_bucket, state_tax);
        let job_allocation = balances.apply(job.credit, &[TaxBucket::Local]);
        let flat_allocation = balances.apply(flat_reduction, &[TaxBucket::Local]);
        let social_allocation =
            balances.apply(social_contribution, &[TaxBucket::Local, TaxBucket::State]);

        for (name, allocation) in [
            ("job tax credit", &job_allocation),
            ("flat income reduction", &flat_allocation),
            ("social contribution reduction", &social_allocation),
        ] {
            warn_unconsumed(&mut trace, name, allocation);
        }

        let social_reduction = social_allocation.total_consumed();
        trace.record(
            "reductions",
            "Tax Reductions",
            "7.5",
            serde_json::json!({
                "local_bucket": local_bucket.to_string(),
                "state_tax": state_tax.to_string(),
                "job_tax_credit": job.credit.to_string(),
                "flat_income_reduction": flat_reduction.to_string(),
                "social_contribution": social_contribution.to_string()
            }),
            serde_json::json!({
                "local_after_reductions": balances.local.to_string(),
                "state_after_reductions": balances.state.to_string(),
                "social_reduction_local": social_allocation.consumed_from(TaxBucket::Local).to_string(),
                "social_reduction_state": social_allocation.consumed_from(TaxBucket::State).to_string()
            }),
            format!(
                "Local {} kr -> {} kr, state {} kr -> {} kr",
                local_bucket.normalize(),
                balances.local.normalize(),
                state_tax.normalize(),
                balances.state.normalize()
            ),
        );

        // 9-11. Totals
        let yearly_total_tax = balances.local
            + balances.state
            + burial_fee
            + church_fee
            + social_contribution
            + public_service_fee;
        let monthly_total_tax = round_half_up(yearly_total_tax / months, 2);
        let net_monthly_salary = input.gross_monthly_salary - monthly_total_tax;
        let effective_tax_rate = if yearly_gross.is_zero() {
            Decimal::ZERO
        } else {
            round_half_up(yearly_total_tax / yearly_gross, 4)
        };
        trace.record(
            "total_tax",
            "Total Tax",
            "8",
            serde_json::json!({
                "local_after_reductions": balances.local.to_string(),
                "state_after_reductions": balances.state.to_string(),
                "burial_fee": burial_fee.to_string(),
                "church_fee": church_fee.to_string(),
                "social_contribution": social_contribution.to_string(),
                "public_service_fee": public_service_fee.to_string()
            }),
            serde_json::json!({
                "yearly_total_tax": yearly_total_tax.to_string(),
                "monthly_total_tax": monthly_total_tax.to_string(),
                "net_monthly_salary": net_monthly_salary.to_string(),
                "effective_tax_rate": effective_tax_rate.to_string()
            }),
            format!(
                "Yearly {} kr / {} = {} kr per month, net {} kr",
                yearly_total_tax.normalize(),
                c.months_per_year,
                monthly_total_tax.normalize(),
                net_monthly_salary.normalize()
            ),
        );

        let breakdown = TaxBreakdown {
            tax_year: c.tax_year,
            locality_id: input.locality_id.clone(),
            gross_monthly_salary: input.gross_monthly_salary,
            yearly_gross,
            local_tax_rate: rates.local_tax_rate,
            regional_tax_rate: rates.regional_tax_rate,
            state_tax_rate: c.state_tax.rate,
            burial_fee_rate: rates.burial_fee_rate,
            church_fee_rate,
            yearly_basic_deduction: basic_deduction,
            yearly_taxable_income: taxable_income,
            yearly_local_tax: local_tax,
            yearly_regional_tax: regional_tax,
            yearly_state_tax: state_tax,
            yearly_social_contribution: social_contribution,
            yearly_job_tax_credit: job.credit,
            yearly_flat_income_reduction: flat_reduction,
            yearly_public_service_fee: public_service_fee,
            yearly_burial_fee: burial_fee,
            yearly_church_fee: church_fee,
            yearly_social_contribution_reduction: social_reduction,
            yearly_local_tax_after_reductions: balances.local,
            yearly_state_tax_after_reductions: balances.state,
            yearly_total_tax,
            monthly_total_tax,
            net_monthly_salary,
            effective_tax_rate,
        };

        debug!(
            locality = %breakdown.locality_id,
            tax_year = breakdown.tax_year,
            yearly_gross = %breakdown.yearly_gross,
            yearly_total_tax = %breakdown.yearly_total_tax,
            net_monthly_salary = %breakdown.net_monthly_salary,
            "Tax calculated"
        );

        if let Some(sink) = &self.sink {
            sink.offer(CalculationRecord::from_breakdown(&breakdown));
        }

        Ok(TaxCalculation {
            breakdown,
            audit_trace: trace.finish(start_time),
        })
    }
}

fn warn_unconsumed(trace: &mut TraceRecorder, name: &str, allocation: &Allocation) {
    if allocation.unconsumed > Decimal::ZERO {
        trace.warn(
            WARNING_REDUCTION_NOT_CONSUMED,
            format!(
                "{} kr of the {} exceeded the remaining tax and was not used",
                allocation.unconsumed.normalize(),
                name
            ),
            "low",
        );
    }
}

#[derive(Default)]
struct TraceRecorder {
    steps: Vec<AuditStep>,
    warnings: Vec<AuditWarning>,
}

impl TraceRecorder {
    fn record(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        clause_ref: &str,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: String,
    ) {
        self.steps.push(AuditStep {
            step_number: self.steps.len() as u32 + 1,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            clause_ref: clause_ref.to_string(),
            input,
            output,
            reasoning,
        });
    }

    fn warn(&mut self, code: &str, message: String, severity: &str) {
        self.warnings.push(AuditWarning {
            code: code.to_string(),
            message,
            severity: severity.to_string(),
        });
    }

    fn finish(self, start_time: Instant) -> AuditTrace {
        AuditTrace {
            steps: self.steps,
            warnings: self.warnings,
            duration_us: start_time.elapsed().as_micros() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::MAX_GROSS_MONTHLY_SALARY;
    use std::str::FromStr;
    use std::sync::Mutex;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn orchestrator() -> TaxOrchestrator {
        TaxOrchestrator::for_year(2026).unwrap()
    }

    fn reference_rates() -> RateSet {
        RateSet::new(dec("0.228"), dec("0.1185"), dec("0.00292"), Decimal::ZERO)
    }

    fn input(gross: &str) -> TaxInput {
        TaxInput::new(dec(gross), "ref", false, false).unwrap()
    }

    #[derive(Default)]
    struct RecordingSink {
        records: Mutex<Vec<CalculationRecord>>,
    }

    impl CalculationSink for RecordingSink {
        fn offer(&self, record: CalculationRecord) {
            self.records.lock().unwrap().push(record);
        }
    }

    #[test]
    fn test_reference_scenario() {
        let b = orchestrator().compute(&input("37500"), &reference_rates()).unwrap();

        assert_eq!(b.yearly_gross, dec("450000"));
        assert_eq!(b.yearly_basic_deduction, dec("19000"));
        assert_eq!(b.yearly_taxable_income, dec("431000"));
        assert_eq!(b.yearly_local_tax, dec("98268"));
        assert_eq!(b.yearly_regional_tax, dec("51073.5"));
        assert_eq!(b.yearly_state_tax, Decimal::ZERO);
        assert_eq!(b.yearly_burial_fee, dec("1258"));
        assert_eq!(b.yearly_church_fee, Decimal::ZERO);
        assert_eq!(b.yearly_job_tax_credit, dec("51285"));
        assert_eq!(b.yearly_flat_income_reduction, dec("1500"));
        assert_eq!(b.yearly_social_contribution, dec("31500"));
        assert_eq!(b.yearly_public_service_fee, dec("1184"));
        assert_eq!(b.yearly_total_tax, dec("98998.5"));
        assert_eq!(b.monthly_total_tax, dec("8249.88"));
        assert_eq!(b.net_monthly_salary, dec("29250.12"));
        assert_eq!(b.effective_tax_rate, dec("0.2200"));
    }

    #[test]
    fn test_reference_scenario_reductions() {
        let b = orchestrator().compute(&input("37500"), &reference_rates()).unwrap();

        // 149 341.50 − 51 285 − 1 500 − 31 500
        assert_eq!(b.yearly_local_tax_after_reductions, dec("65056.5"));
        assert_eq!(b.yearly_state_tax_after_reductions, Decimal::ZERO);
        assert_eq!(b.yearly_social_contribution_reduction, dec("31500"));
    }

    #[test]
    fn test_zero_salary_gives_all_zero() {
        let b = orchestrator().compute(&input("0"), &reference_rates()).unwrap();

        for (name, value) in b.components() {
            assert_eq!(value, Decimal::ZERO, "{} should be zero", name);
        }
    }

    #[test]
    fn test_negative_salary_rejected() {
        let bad = TaxInput {
            gross_monthly_salary: dec("-100"),
            locality_id: "ref".into(),
            is_church_member: false,
            is_senior: false,
        };

        match orchestrator().compute(&bad, &reference_rates()) {
            Err(EngineError::InvalidInput { field, .. }) => {
                assert_eq!(field, "gross_monthly_salary")
            }
            _ => panic!("Expected InvalidInput error"),
        }
    }

    #[test]
    fn test_oversized_salary_rejected_instead_of_overflowing() {
        let huge = TaxInput {
            gross_monthly_salary: Decimal::MAX / Decimal::new(10, 0),
            locality_id: "ref".into(),
            is_church_member: true,
            is_senior: false,
        };

        match orchestrator().compute_with_trace(&huge, &reference_rates()) {
            Err(EngineError::InvalidInput { field, .. }) => {
                assert_eq!(field, "gross_monthly_salary")
            }
            _ => panic!("Expected InvalidInput error"),
        }
    }

    #[test]
    fn test_maximum_salary_computes() {
        let top = TaxInput::new(MAX_GROSS_MONTHLY_SALARY, "ref", true, false).unwrap();
        let b = orchestrator().compute(&top, &reference_rates()).unwrap();

        assert_eq!(b.yearly_gross, dec("12000000000"));
        assert!(b.net_monthly_salary < b.gross_monthly_salary);
    }

    #[test]
    fn test_invalid_rate_rejected() {
        let mut rates = reference_rates();
        rates.local_tax_rate = dec("22.8");

        match orchestrator().compute(&input("37500"), &rates) {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "local_tax_rate"),
            _ => panic!("Expected InvalidInput error"),
        }
    }

    #[test]
    fn test_church_fee_only_for_members() {
        let rates = RateSet::new(dec("0.228"), dec("0.1185"), dec("0.00292"), dec("0.01"));

        let member = TaxInput::new(dec("37500"), "ref", true, false).unwrap();
        let b = orchestrator().compute(&member, &rates).unwrap();
        assert_eq!(b.yearly_church_fee, dec("4310"));
        assert_eq!(b.church_fee_rate, dec("0.01"));
        assert_eq!(b.yearly_total_tax, dec("103308.5"));

        let b = orchestrator().compute(&input("37500"), &rates).unwrap();
        assert_eq!(b.yearly_church_fee, Decimal::ZERO);
        assert_eq!(b.church_fee_rate, Decimal::ZERO);
    }

    #[test]
    fn test_high_income_social_reduction_spills_to_state() {
        // Tiny local rate: the local bucket is gone before the social reduction.
        let rates = RateSet::new(dec("0.0001"), Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
        let b = orchestrator().compute(&input("100000"), &rates).unwrap();

        // yearly 1 200 000, taxable 1 182 600, state tax 20% × 539 600
        assert_eq!(b.yearly_taxable_income, dec("1182600"));
        assert_eq!(b.yearly_state_tax, dec("107920"));
        assert_eq!(b.yearly_local_tax_after_reductions, Decimal::ZERO);
        assert_eq!(b.yearly_social_contribution, dec("47100"));
        assert_eq!(b.yearly_state_tax_after_reductions, dec("60820"));
        assert_eq!(b.yearly_social_contribution_reduction, dec("47100"));
    }

    #[test]
    fn test_senior_has_no_social_contribution() {
        let senior = TaxInput::new(dec("37500"), "ref", false, true).unwrap();
        let b = orchestrator().compute(&senior, &reference_rates()).unwrap();

        assert_eq!(b.yearly_social_contribution, Decimal::ZERO);
        assert_eq!(b.yearly_social_contribution_reduction, Decimal::ZERO);
        // enhanced deduction: 18 995.20 + 0.017 PBB + 33.8% × 450 000 = 172 101.60
        assert_eq!(b.yearly_basic_deduction, dec("172200"));
        // senior credit: 0.6293 PBB
        assert_eq!(b.yearly_job_tax_credit, dec("37254"));
    }

    #[test]
    fn test_compute_is_deterministic() {
        let o = orchestrator();
        let first = o.compute(&input("41234.56"), &reference_rates()).unwrap();
        let second = o.compute(&input("41234.56"), &reference_rates()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_trace_records_each_rule_in_order() {
        let calculation = orchestrator()
            .compute_with_trace(&input("37500"), &reference_rates())
            .unwrap();
        let trace = &calculation.audit_trace;

        let rule_ids: Vec<&str> = trace.steps.iter().map(|s| s.rule_id.as_str()).collect();
        assert_eq!(
            rule_ids,
            vec![
                "yearly_gross",
                "basic_deduction",
                "local_tax",
                "state_tax",
                "social_contribution",
                "flat_reduction_and_public_service",
                "job_tax_credit",
                "membership_fees",
                "reductions",
                "total_tax",
            ]
        );
        for (i, step) in trace.steps.iter().enumerate() {
            assert_eq!(step.step_number, i as u32 + 1);
        }

        let job = trace.step("job_tax_credit").unwrap();
        assert_eq!(job.clause_ref, "7.5.2");
        assert_eq!(job.output["credit"], "51285");
        assert!(trace.warnings.is_empty());
    }

    #[test]
    fn test_trace_reasoning_states_amounts_in_kronor() {
        let calculation = orchestrator()
            .compute_with_trace(&input("80000"), &reference_rates())
            .unwrap();
        let trace = &calculation.audit_trace;

        for step in &trace.steps {
            assert!(!step.reasoning.contains('$'), "{}: {}", step.rule_id, step.reasoning);
        }
        assert!(trace.step("job_tax_credit").unwrap().reasoning.contains(" kr"));
        assert!(trace.step("state_tax").unwrap().reasoning.contains(" kr"));
    }

    #[test]
    fn test_trace_warns_on_rate_guard() {
        let rates = RateSet::new(dec("0.005"), dec("0.005"), Decimal::ZERO, Decimal::ZERO);
        let calculation = orchestrator()
            .compute_with_trace(&input("37500"), &rates)
            .unwrap();

        assert!(calculation.audit_trace.has_warning(WARNING_ADJUSTED_RATE_UNDERFLOW));
    }

    #[test]
    fn test_trace_warns_when_credit_exceeds_local_bucket() {
        // Low income: job credit larger than the little local tax there is.
        let calculation = orchestrator()
            .compute_with_trace(&input("3000"), &reference_rates())
            .unwrap();

        assert!(calculation.audit_trace.has_warning(WARNING_REDUCTION_NOT_CONSUMED));
        assert_eq!(
            calculation.breakdown.yearly_local_tax_after_reductions,
            Decimal::ZERO
        );
    }

    #[test]
    fn test_sink_receives_record() {
        let sink = Arc::new(RecordingSink::default());
        let o = orchestrator().with_sink(sink.clone());

        let b = o.compute(&input("37500"), &reference_rates()).unwrap();

        let records = sink.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].locality_id.as_str(), "ref");
        assert_eq!(records[0].gross_monthly_salary, dec("37500"));
        assert_eq!(records[0].monthly_total_tax, b.monthly_total_tax);
        assert_eq!(records[0].net_monthly_salary, b.net_monthly_salary);
    }

    #[test]
    fn test_sink_not_offered_invalid_input() {
        let sink = Arc::new(RecordingSink::default());
        let o = orchestrator().with_sink(sink.clone());

        let mut rates = reference_rates();
        rates.burial_fee_rate = dec("-0.1");
        assert!(o.compute(&input("37500"), &rates).is_err());
        assert!(sink.records.lock().unwrap().is_empty());
    }

    #[test]
    fn test_debug_shows_year() {
        let text = format!("{:?}", orchestrator());
        assert!(text.contains("2026"));
        assert!(text.contains("has_sink: false"));
    }
}
