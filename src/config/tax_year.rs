//! Versioned tax constants, keyed by tax year.
//!
//! All thresholds, factors and caps published for a tax year live in one
//! [`TaxYearConstants`] value. Band bounds are multiples of the year's price
//! base amount; fixed amounts (thresholds, caps) are in whole currency units.
//! Section numbers refer to the tax authority's technical description of the
//! withholding tables (SKV 433).

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{BandSchedule, LinearFormula};
use crate::error::{EngineError, EngineResult};

/// Tax years with a built-in constants table.
pub const SUPPORTED_TAX_YEARS: &[i32] = &[2025, 2026];

fn d(num: i64, scale: u32) -> Decimal {
    Decimal::new(num, scale)
}

/// State income tax on taxable income above a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTaxRule {
    /// Taxable income at or below which no state tax is due.
    pub threshold: Decimal,
    /// Rate applied to the excess above the threshold.
    pub rate: Decimal,
}

/// General pension contribution charged on gross income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialContributionRule {
    /// Contribution rate.
    pub rate: Decimal,
    /// Gross income below which no contribution is charged.
    pub min_income: Decimal,
    /// Gross income above this is not charged.
    pub max_base: Decimal,
    /// Absolute maximum contribution after rounding.
    pub max_amount: Decimal,
}

/// Flat reduction on taxable (earned) income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatReductionRule {
    /// Taxable income at or below which no reduction is given.
    pub threshold: Decimal,
    /// Fraction of the excess above the threshold.
    pub rate: Decimal,
    /// Maximum reduction.
    pub cap: Decimal,
    /// Taxable income from which the cap applies.
    pub plateau_threshold: Decimal,
}

/// Public-service fee on taxable income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicServiceFeeRule {
    /// Fee rate.
    pub rate: Decimal,
    /// Maximum fee.
    pub cap: Decimal,
    /// Taxable income from which the cap applies.
    pub threshold: Decimal,
}

/// Every constant needed to compute tax for one tax year.
///
/// # Example
///
/// ```
/// use tax_engine::config::TaxYearConstants;
/// use rust_decimal::Decimal;
///
/// let constants = TaxYearConstants::for_year(2026).unwrap();
/// assert_eq!(constants.price_base_amount, Decimal::new(59200, 0));
/// assert!(TaxYearConstants::for_year(1990).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearConstants {
    /// The tax year these constants apply to.
    pub tax_year: i32,
    /// Number of pay periods per year.
    pub months_per_year: u32,
    /// Yearly reference amount all band bounds are expressed in.
    pub price_base_amount: Decimal,
    /// Age a person must have reached before the start of the year for the senior rules.
    pub senior_age: u32,

    /// Basic deduction bands (section 6.1).
    pub basic_deduction: BandSchedule,
    /// Enhanced basic deduction bands for seniors (section 6.2).
    pub senior_basic_deduction: BandSchedule,
    /// Job tax credit base bands (section 7.5.2).
    pub job_credit_base: BandSchedule,
    /// Job tax credit bands for seniors (section 7.5.2).
    pub senior_job_credit: BandSchedule,
    /// Burial and church fee share of the local rate excluded from the job credit rate.
    pub credit_rate_adjustment: Decimal,

    /// State income tax (section 7.2).
    pub state_tax: StateTaxRule,
    /// General pension contribution (section 7.4).
    pub social_contribution: SocialContributionRule,
    /// Flat earned-income reduction (section 7.5.4).
    pub flat_income_reduction: FlatReductionRule,
    /// Public-service fee (section 7.6).
    pub public_service_fee: PublicServiceFeeRule,
}

impl TaxYearConstants {
    /// Returns the constants table for a tax year.
    ///
    /// Returns [`EngineError::UnsupportedTaxYear`] for years without a table.
    pub fn for_year(year: i32) -> EngineResult<Self> {
        match year {
            2025 => Ok(Self::year_2025()),
            2026 => Ok(Self::year_2026()),
            _ => Err(EngineError::UnsupportedTaxYear { year }),
        }
    }

    /// Returns the constants table for the tax year containing `date`.
    pub fn for_date(date: NaiveDate) -> EngineResult<Self> {
        Self::for_year(date.year())
    }

    /// Returns true if a person born on `date_of_birth` gets the senior rules
    /// this year, i.e. had reached the senior age before the year started.
    pub fn is_senior(&self, date_of_birth: NaiveDate) -> bool {
        date_of_birth.year() < self.tax_year - self.senior_age as i32
    }

    fn year_2026() -> Self {
        Self {
            tax_year: 2026,
            months_per_year: 12,
            price_base_amount: d(59200, 0),
            senior_age: 66,
            basic_deduction: standard_basic_deduction_bands(),
            senior_basic_deduction: senior_basic_deduction_bands(),
            job_credit_base: job_credit_base_bands(),
            senior_job_credit: senior_job_credit_bands(),
            credit_rate_adjustment: d(116, 4),
            state_tax: StateTaxRule {
                threshold: d(643000, 0),
                rate: d(20, 2),
            },
            social_contribution: SocialContributionRule {
                rate: d(7, 2),
                min_income: d(25042, 0),
                max_base: d(673038, 0),
                max_amount: d(47100, 0),
            },
            flat_income_reduction: FlatReductionRule {
                threshold: d(40000, 0),
                rate: d(75, 4),
                cap: d(1500, 0),
                plateau_threshold: d(240000, 0),
            },
            public_service_fee: PublicServiceFeeRule {
                rate: d(1, 2),
                cap: d(1184, 0),
                threshold: d(118400, 0),
            },
        }
    }

    fn year_2025() -> Self {
        Self {
            tax_year: 2025,
            months_per_year: 12,
            price_base_amount: d(58800, 0),
            senior_age: 66,
            basic_deduction: standard_basic_deduction_bands(),
            senior_basic_deduction: senior_basic_deduction_bands(),
            job_credit_base: job_credit_base_bands(),
            senior_job_credit: senior_job_credit_bands(),
            credit_rate_adjustment: d(116, 4),
            state_tax: StateTaxRule {
                threshold: d(625800, 0),
                rate: d(20, 2),
            },
            social_contribution: SocialContributionRule {
                rate: d(7, 2),
                min_income: d(24873, 0),
                max_base: d(650442, 0),
                max_amount: d(45500, 0),
            },
            flat_income_reduction: FlatReductionRule {
                threshold: d(40000, 0),
                rate: d(75, 4),
                cap: d(1500, 0),
                plateau_threshold: d(240000, 0),
            },
            public_service_fee: PublicServiceFeeRule {
                rate: d(1, 2),
                cap: d(1249, 0),
                threshold: d(124900, 0),
            },
        }
    }
}

/// Bell-shaped basic deduction: flat, rising, flat maximum, falling, flat.
fn standard_basic_deduction_bands() -> BandSchedule {
    BandSchedule::builder()
        .up_to(d(99, 2), LinearFormula::flat(d(423, 3)))
        .up_to(d(272, 2), LinearFormula::new(d(423, 3), d(20, 2), d(99, 2)))
        .up_to(d(311, 2), LinearFormula::flat(d(77, 2)))
        .up_to(d(788, 2), LinearFormula::new(d(77, 2), d(-10, 2), d(311, 2)))
        .above(LinearFormula::flat(d(293, 3)))
}

fn senior_basic_deduction_bands() -> BandSchedule {
    BandSchedule::builder()
        .up_to(d(91, 2), LinearFormula::flat(d(687, 3)))
        .up_to(d(111, 2), LinearFormula::proportional(d(885, 3), d(-20, 2)))
        .up_to(d(1965, 3), LinearFormula::proportional(d(600, 3), d(57, 3)))
        .up_to(d(272, 2), LinearFormula::proportional(d(333, 3), d(1949, 4)))
        .up_to(d(311, 2), LinearFormula::proportional(d(-212, 3), d(3949, 4)))
        .up_to(d(324, 2), LinearFormula::proportional(d(-523, 3), d(4949, 4)))
        .up_to(d(500, 2), LinearFormula::proportional(d(-73, 3), d(356, 3)))
        .up_to(d(788, 2), LinearFormula::proportional(d(17, 3), d(338, 3)))
        .up_to(d(808, 2), LinearFormula::proportional(d(703, 3), d(251, 3)))
        .up_to(d(1116, 2), LinearFormula::flat(d(2732, 3)))
        .up_to(d(1284, 2), LinearFormula::proportional(d(9651, 3), d(-62, 2)))
        .above(LinearFormula::flat(d(1691, 3)))
}

fn job_credit_base_bands() -> BandSchedule {
    BandSchedule::builder()
        .up_to(d(91, 2), LinearFormula::proportional(Decimal::ZERO, Decimal::ONE))
        .up_to(d(324, 2), LinearFormula::new(d(91, 2), d(3874, 4), d(91, 2)))
        .up_to(d(808, 2), LinearFormula::new(d(1813, 3), d(251, 3), d(324, 2)))
        .above(LinearFormula::flat(d(3027, 3)))
}

fn senior_job_credit_bands() -> BandSchedule {
    BandSchedule::builder()
        .up_to(d(175, 2), LinearFormula::proportional(Decimal::ZERO, d(22, 2)))
        .up_to(d(524, 2), LinearFormula::proportional(d(2635, 4), d(7, 2)))
        .above(LinearFormula::flat(d(6293, 4)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_every_supported_year_has_a_table() {
        for &year in SUPPORTED_TAX_YEARS {
            let constants = TaxYearConstants::for_year(year).unwrap();
            assert_eq!(constants.tax_year, year);
            assert_eq!(constants.months_per_year, 12);
        }
    }

    #[test]
    fn test_unknown_year_is_rejected() {
        match TaxYearConstants::for_year(2031) {
            Err(EngineError::UnsupportedTaxYear { year }) => assert_eq!(year, 2031),
            _ => panic!("Expected UnsupportedTaxYear error"),
        }
    }

    #[test]
    fn test_for_date_uses_calendar_year() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(TaxYearConstants::for_date(date).unwrap().tax_year, 2025);
    }

    #[test]
    fn test_2026_basic_deduction_bounds() {
        let constants = TaxYearConstants::for_year(2026).unwrap();
        let bounds = constants
            .basic_deduction
            .boundaries(constants.price_base_amount);

        assert_eq!(
            bounds,
            vec![dec("58608"), dec("161024"), dec("184112"), dec("466496")]
        );
    }

    #[test]
    fn test_2026_senior_deduction_has_eleven_bounded_bands() {
        let constants = TaxYearConstants::for_year(2026).unwrap();
        assert_eq!(constants.senior_basic_deduction.bands().len(), 11);
        assert_eq!(constants.senior_basic_deduction.band_count(), 12);
    }

    #[test]
    fn test_2026_job_credit_bounds() {
        let constants = TaxYearConstants::for_year(2026).unwrap();
        let pbb = constants.price_base_amount;

        assert_eq!(
            constants.job_credit_base.boundaries(pbb),
            vec![dec("53872"), dec("191808"), dec("478336")]
        );
        assert_eq!(
            constants.senior_job_credit.boundaries(pbb),
            vec![dec("103600"), dec("310208")]
        );
    }

    #[test]
    fn test_social_contribution_cap_matches_rounded_max_base() {
        for &year in SUPPORTED_TAX_YEARS {
            let rule = TaxYearConstants::for_year(year).unwrap().social_contribution;
            let at_max = crate::calculation::round_to_hundred_half_down(rule.max_base * rule.rate);
            assert_eq!(at_max, rule.max_amount, "year {}", year);
        }
    }

    #[test]
    fn test_flat_reduction_plateau_matches_cap() {
        for &year in SUPPORTED_TAX_YEARS {
            let rule = TaxYearConstants::for_year(year).unwrap().flat_income_reduction;
            assert_eq!((rule.plateau_threshold - rule.threshold) * rule.rate, rule.cap);
        }
    }

    #[test]
    fn test_public_service_threshold_matches_cap() {
        for &year in SUPPORTED_TAX_YEARS {
            let rule = TaxYearConstants::for_year(year).unwrap().public_service_fee;
            assert_eq!(rule.threshold * rule.rate, rule.cap);
        }
    }

    #[test]
    fn test_is_senior_requires_age_reached_before_year_start() {
        let constants = TaxYearConstants::for_year(2026).unwrap();

        assert!(constants.is_senior(NaiveDate::from_ymd_opt(1959, 12, 31).unwrap()));
        assert!(!constants.is_senior(NaiveDate::from_ymd_opt(1960, 1, 1).unwrap()));
    }
}
