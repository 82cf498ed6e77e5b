//! Configuration types for locality rate tables.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML rate table files.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashSet;

use crate::error::{EngineError, EngineResult};
use crate::models::{LocalityId, RateSet};

/// Default rates file structure (`defaults.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultsConfig {
    /// Rates used when a locality has no valid record for a rate.
    pub defaults: RateSet,
}

/// Localities file structure (`localities.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct LocalitiesConfig {
    /// Every locality in the table.
    pub localities: Vec<LocalityConfig>,
}

/// A dated set of rates for one locality.
///
/// Any rate may be absent; the rate provider then looks at older records and
/// finally falls back to the table defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RateRecord {
    /// First date the record applies to.
    pub effective_from: NaiveDate,
    /// Last date the record applies to, if it has ended.
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
    /// Municipal income tax rate.
    #[serde(default)]
    pub local_tax_rate: Option<Decimal>,
    /// Regional income tax rate.
    #[serde(default)]
    pub regional_tax_rate: Option<Decimal>,
    /// Burial fee rate.
    #[serde(default)]
    pub burial_fee_rate: Option<Decimal>,
    /// Church fee rate.
    #[serde(default)]
    pub church_fee_rate: Option<Decimal>,
}

impl RateRecord {
    /// Returns true if the record applies on `date` (both ends inclusive).
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        self.effective_from <= date && self.effective_to.is_none_or(|to| date <= to)
    }

    fn named_rates(&self) -> [(&'static str, Option<Decimal>); 4] {
        [
            ("local_tax_rate", self.local_tax_rate),
            ("regional_tax_rate", self.regional_tax_rate),
            ("burial_fee_rate", self.burial_fee_rate),
            ("church_fee_rate", self.church_fee_rate),
        ]
    }
}

/// A locality (municipality) and its dated rate records.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocalityConfig {
    /// Stable id passed to the engine.
    pub id: LocalityId,
    /// Official municipality code (e.g. "0180").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// The region the locality belongs to.
    #[serde(default)]
    pub region: Option<String>,
    /// Rate records, sorted oldest first once loaded.
    #[serde(default)]
    pub rates: Vec<RateRecord>,
}

impl LocalityConfig {
    /// Resolves one rate on `date` from the most recent effective record
    /// that carries it.
    ///
    /// ```
    /// use tax_engine::config::{LocalityConfig, RateRecord};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let locality = LocalityConfig {
    ///     id: "uppsala".into(),
    ///     code: "0380".to_string(),
    ///     name: "Uppsala".to_string(),
    ///     region: None,
    ///     rates: vec![RateRecord {
    ///         effective_from: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
    ///         effective_to: None,
    ///         local_tax_rate: Some(Decimal::new(2185, 4)),
    ///         regional_tax_rate: None,
    ///         burial_fee_rate: None,
    ///         church_fee_rate: None,
    ///     }],
    /// };
    ///
    /// let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    /// assert_eq!(locality.resolve_rate(date, |r| r.local_tax_rate), Some(Decimal::new(2185, 4)));
    /// assert_eq!(locality.resolve_rate(date, |r| r.burial_fee_rate), None);
    /// ```
    pub fn resolve_rate<F>(&self, date: NaiveDate, pick: F) -> Option<Decimal>
    where
        F: Fn(&RateRecord) -> Option<Decimal>,
    {
        self.rates
            .iter()
            .rev()
            .filter(|record| record.is_effective_on(date))
            .find_map(pick)
    }
}

/// The complete rate table loaded from YAML files.
#[derive(Debug, Clone)]
pub struct RateTable {
    defaults: RateSet,
    localities: Vec<LocalityConfig>,
}

impl RateTable {
    /// Creates a validated rate table.
    ///
    /// Each locality's records are sorted by `effective_from`. Returns
    /// [`EngineError::InvalidInput`] for a default or record rate outside
    /// `[0, 1]`, or for a duplicated locality id or code.
    pub fn new(defaults: RateSet, localities: Vec<LocalityConfig>) -> EngineResult<Self> {
        defaults.validate()?;

        let mut ids = HashSet::new();
        let mut codes = HashSet::new();
        let mut sorted = Vec::with_capacity(localities.len());

        for mut locality in localities {
            if !ids.insert(locality.id.clone()) {
                return Err(EngineError::invalid_input(
                    "id",
                    format!("duplicate locality id '{}'", locality.id),
                ));
            }
            if !codes.insert(locality.code.clone()) {
                return Err(EngineError::invalid_input(
                    "code",
                    format!("duplicate locality code '{}'", locality.code),
                ));
            }

            for record in &locality.rates {
                for (field, rate) in record.named_rates() {
                    let Some(rate) = rate else { continue };
                    if rate < Decimal::ZERO || rate > Decimal::ONE {
                        return Err(EngineError::invalid_input(
                            field,
                            format!(
                                "locality '{}' record from {}: must be between 0 and 1, got {}",
                                locality.id, record.effective_from, rate
                            ),
                        ));
                    }
                }
            }

            locality
                .rates
                .sort_by(|a, b| a.effective_from.cmp(&b.effective_from));
            sorted.push(locality);
        }

        Ok(Self {
            defaults,
            localities: sorted,
        })
    }

    /// Returns the default rates.
    pub fn defaults(&self) -> &RateSet {
        &self.defaults
    }

    /// Returns all localities.
    pub fn localities(&self) -> &[LocalityConfig] {
        &self.localities
    }

    /// Finds a locality by id.
    pub fn locality(&self, id: &LocalityId) -> Option<&LocalityConfig> {
        self.localities.iter().find(|l| &l.id == id)
    }

    /// Finds a locality by its official code.
    pub fn locality_by_code(&self, code: &str) -> Option<&LocalityConfig> {
        self.localities.iter().find(|l| l.code == code)
    }
}
