//! Caller-side wiring of rate lookup, tax year selection and calculation.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tracing::info;

use crate::calculation::{CalculationSink, TaxOrchestrator};
use crate::config::SUPPORTED_TAX_YEARS;
use crate::error::{EngineError, EngineResult};
use crate::models::{TaxBreakdown, TaxCalculation, TaxInput};

use super::rate_provider::RateProvider;

/// Calculates tax for a locality on a date.
///
/// The service picks the tax year from the effective date, resolves the
/// locality's rates through its [`RateProvider`] and runs the matching
/// [`TaxOrchestrator`].
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tax_engine::config::RateTableLoader;
/// use tax_engine::service::{StaticRateProvider, TaxService, TracingSink};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let table = RateTableLoader::load("./config/sample").unwrap().into_table();
/// let service = TaxService::new(Arc::new(StaticRateProvider::new(table)))
///     .with_sink(Arc::new(TracingSink));
///
/// let date = NaiveDate::from_ymd_opt(2026, 1, 25).unwrap();
/// let breakdown = service
///     .calculate_by_code("0180", Decimal::new(37500, 0), false, false, date)
///     .unwrap();
/// println!("Net salary: {}", breakdown.net_monthly_salary);
/// ```
#[derive(Clone)]
pub struct TaxService {
    provider: Arc<dyn RateProvider>,
    orchestrators: HashMap<i32, TaxOrchestrator>,
}

impl TaxService {
    /// Creates a service for every supported tax year, without a sink.
    pub fn new(provider: Arc<dyn RateProvider>) -> Self {
        let orchestrators = SUPPORTED_TAX_YEARS
            .iter()
            .filter_map(|&year| TaxOrchestrator::for_year(year).ok())
            .map(|o| (o.constants().tax_year, o))
            .collect();

        Self {
            provider,
            orchestrators,
        }
    }

    /// Offers every completed calculation to `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn CalculationSink>) -> Self {
        self.orchestrators = self
            .orchestrators
            .into_iter()
            .map(|(year, o)| (year, o.with_sink(sink.clone())))
            .collect();
        self
    }

    /// Returns the orchestrator for a tax year.
    pub fn orchestrator(&self, year: i32) -> EngineResult<&TaxOrchestrator> {
        self.orchestrators
            .get(&year)
            .ok_or(EngineError::UnsupportedTaxYear { year })
    }

    /// Calculates the breakdown for `input` using the rates in force on `date`.
    pub fn calculate(&self, input: &TaxInput, date: NaiveDate) -> EngineResult<TaxBreakdown> {
        Ok(self.calculate_with_trace(input, date)?.breakdown)
    }

    /// Like [`calculate`](Self::calculate), also returning the audit trace.
    pub fn calculate_with_trace(
        &self,
        input: &TaxInput,
        date: NaiveDate,
    ) -> EngineResult<TaxCalculation> {
        let orchestrator = self.orchestrator(date.year())?;
        let rates = self.provider.get_rates(&input.locality_id, date)?;
        let calculation = orchestrator.compute_with_trace(input, &rates)?;

        info!(
            locality = %input.locality_id,
            tax_year = date.year(),
            gross_monthly_salary = %input.gross_monthly_salary,
            monthly_total_tax = %calculation.breakdown.monthly_total_tax,
            duration_us = calculation.audit_trace.duration_us,
            "Tax calculation completed"
        );

        Ok(calculation)
    }

    /// Resolves a locality by its official code and calculates the breakdown.
    pub fn calculate_by_code(
        &self,
        code: &str,
        gross_monthly_salary: Decimal,
        is_church_member: bool,
        is_senior: bool,
        date: NaiveDate,
    ) -> EngineResult<TaxBreakdown> {
        let locality_id = self.provider.locality_for_code(code)?;
        let input = TaxInput::new(gross_monthly_salary, locality_id, is_church_member, is_senior)?;
        self.calculate(&input, date)
    }
}
