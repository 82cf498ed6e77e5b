//! Configuration for the Salary Tax Engine.
//!
//! Two kinds of configuration live here: the built-in [`TaxYearConstants`]
//! published for each tax year, and locality rate tables loaded from YAML
//! files by the [`RateTableLoader`].
//!
//! # Example
//!
//! ```no_run
//! use tax_engine::config::{RateTableLoader, TaxYearConstants};
//!
//! let constants = TaxYearConstants::for_year(2026).unwrap();
//! let loader = RateTableLoader::load("./config/sample").unwrap();
//! println!(
//!     "{} localities, price base amount {}",
//!     loader.table().localities().len(),
//!     constants.price_base_amount
//! );
//! ```

mod loader;
mod tax_year;
mod types;

pub use loader::RateTableLoader;
pub use tax_year::{
    FlatReductionRule, PublicServiceFeeRule, SUPPORTED_TAX_YEARS, SocialContributionRule,
    StateTaxRule, TaxYearConstants,
};
pub use types::{DefaultsConfig, LocalitiesConfig, LocalityConfig, RateRecord, RateTable};
