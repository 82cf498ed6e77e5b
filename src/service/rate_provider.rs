//! Locality rate lookup.
//!
//! The engine itself only consumes a [`RateSet`]; where those rates come from
//! is the business of a [`RateProvider`]. [`StaticRateProvider`] serves them
//! from a rate table loaded at startup.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::config::{LocalityConfig, RateRecord, RateTable};
use crate::error::{EngineError, EngineResult};
use crate::models::{LocalityId, RateSet};

/// Resolves the rates that apply to a locality on a date.
pub trait RateProvider: Send + Sync {
    /// Returns the four rates for `locality` on `date`, substituting defaults
    /// for any rate the provider has no value for.
    ///
    /// Returns [`EngineError::UnknownLocality`] if the locality is not known.
    fn get_rates(&self, locality: &LocalityId, date: NaiveDate) -> EngineResult<RateSet>;

    /// Maps an official locality code to its id.
    fn locality_for_code(&self, code: &str) -> EngineResult<LocalityId>;
}

/// Which of the four rates is being resolved.
#[derive(Debug, Clone, Copy)]
enum RateKind {
    Local,
    Regional,
    Burial,
    Church,
}

impl RateKind {
    fn name(self) -> &'static str {
        match self {
            RateKind::Local => "local_tax_rate",
            RateKind::Regional => "regional_tax_rate",
            RateKind::Burial => "burial_fee_rate",
            RateKind::Church => "church_fee_rate",
        }
    }

    fn pick(self, record: &RateRecord) -> Option<Decimal> {
        match self {
            RateKind::Local => record.local_tax_rate,
            RateKind::Regional => record.regional_tax_rate,
            RateKind::Burial => record.burial_fee_rate,
            RateKind::Church => record.church_fee_rate,
        }
    }

    fn default_from(self, defaults: &RateSet) -> Decimal {
        match self {
            RateKind::Local => defaults.local_tax_rate,
            RateKind::Regional => defaults.regional_tax_rate,
            RateKind::Burial => defaults.burial_fee_rate,
            RateKind::Church => defaults.church_fee_rate,
        }
    }
}

/// A [`RateProvider`] backed by an in-memory [`RateTable`].
///
/// # Example
///
/// ```no_run
/// use tax_engine::config::RateTableLoader;
/// use tax_engine::service::{RateProvider, StaticRateProvider};
/// use chrono::NaiveDate;
///
/// let table = RateTableLoader::load("./config/sample").unwrap().into_table();
/// let provider = StaticRateProvider::new(table);
///
/// let id = provider.locality_for_code("0180").unwrap();
/// let rates = provider
///     .get_rates(&id, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
///     .unwrap();
/// println!("Combined local rate: {}", rates.combined_local_rate());
/// ```
#[derive(Debug, Clone)]
pub struct StaticRateProvider {
    table: Arc<RateTable>,
}

impl StaticRateProvider {
    /// Creates a provider serving rates from `table`.
    pub fn new(table: RateTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    /// Returns the underlying rate table.
    pub fn table(&self) -> &RateTable {
        &self.table
    }

    fn resolve(&self, locality: &LocalityConfig, date: NaiveDate, kind: RateKind) -> Decimal {
        match locality.resolve_rate(date, |record| kind.pick(record)) {
            Some(rate) => rate,
            None => {
                let fallback = kind.default_from(self.table.defaults());
                match kind {
                    RateKind::Local | RateKind::Regional => info!(
                        locality = %locality.id,
                        rate = kind.name(),
                        default = %fallback,
                        %date,
                        "No rate found, using default"
                    ),
                    RateKind::Burial | RateKind::Church => debug!(
                        locality = %locality.id,
                        rate = kind.name(),
                        default = %fallback,
                        %date,
                        "No rate found, using default"
                    ),
                }
                fallback
            }
        }
    }
}

impl RateProvider for StaticRateProvider {
    fn get_rates(&self, locality: &LocalityId, date: NaiveDate) -> EngineResult<RateSet> {
        let config = self
            .table
            .locality(locality)
            .ok_or_else(|| EngineError::UnknownLocality {
                locality: locality.to_string(),
            })?;

        Ok(RateSet::new(
            self.resolve(config, date, RateKind::Local),
            self.resolve(config, date, RateKind::Regional),
            self.resolve(config, date, RateKind::Burial),
            self.resolve(config, date, RateKind::Church),
        ))
    }

    fn locality_for_code(&self, code: &str) -> EngineResult<LocalityId> {
        self.table
            .locality_by_code(code)
            .map(|l| l.id.clone())
            .ok_or_else(|| EngineError::UnknownLocality {
                locality: code.to_string(),
            })
    }
}
