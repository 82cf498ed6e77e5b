//! Piecewise-linear band schedules.
//!
//! Every non-linear rule in the tax code (basic deduction, senior
//! enhancement, job tax credit) is a list of income bands, each with its own
//! linear formula. Band bounds and formula coefficients are expressed as
//! multiples of the yearly reference amount (the price base amount), so a
//! schedule is pure data and only needs the reference amount to be evaluated.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A linear function of income.
///
/// Evaluates to `base × reference + slope × (income − anchor × reference)`.
///
/// # Example
///
/// ```
/// use tax_engine::calculation::LinearFormula;
/// use rust_decimal::Decimal;
///
/// // 0.77 PBB − 10% × (income − 3.11 PBB)
/// let formula = LinearFormula::new(
///     Decimal::new(77, 2),
///     Decimal::new(-10, 2),
///     Decimal::new(311, 2),
/// );
/// let pbb = Decimal::new(59200, 0);
/// assert_eq!(formula.evaluate(Decimal::new(450000, 0), pbb), Decimal::new(189952, 1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearFormula {
    /// Constant term, in multiples of the reference amount.
    pub base: Decimal,
    /// Fraction of income (above the anchor) added per unit.
    pub slope: Decimal,
    /// Income offset the slope is measured from, in multiples of the reference amount.
    pub anchor: Decimal,
}

impl LinearFormula {
    /// Creates a formula from its coefficients.
    pub fn new(base: Decimal, slope: Decimal, anchor: Decimal) -> Self {
        Self {
            base,
            slope,
            anchor,
        }
    }

    /// A constant amount of `base × reference`.
    pub fn flat(base: Decimal) -> Self {
        Self::new(base, Decimal::ZERO, Decimal::ZERO)
    }

    /// `base × reference + slope × income`.
    pub fn proportional(base: Decimal, slope: Decimal) -> Self {
        Self::new(base, slope, Decimal::ZERO)
    }

    /// Evaluates the formula for an income, without rounding.
    pub fn evaluate(&self, income: Decimal, reference: Decimal) -> Decimal {
        self.base * reference + self.slope * (income - self.anchor * reference)
    }
}

/// A bounded band: applies to incomes up to and including `upper × reference`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    /// Inclusive upper bound, in multiples of the reference amount.
    pub upper: Decimal,
    /// The formula applied within the band.
    pub formula: LinearFormula,
}

/// An ordered list of bounded bands followed by an open top band.
///
/// Bands are searched in order; the first band whose upper bound is at or
/// above the income applies, and incomes above the last bound use the open
/// top formula.
///
/// # Example
///
/// ```
/// use tax_engine::calculation::{BandSchedule, LinearFormula};
/// use rust_decimal::Decimal;
///
/// let schedule = BandSchedule::builder()
///     .up_to(Decimal::ONE, LinearFormula::proportional(Decimal::ZERO, Decimal::ONE))
///     .above(LinearFormula::flat(Decimal::ONE));
///
/// let reference = Decimal::new(100, 0);
/// assert_eq!(schedule.evaluate(Decimal::new(40, 0), reference), Decimal::new(40, 0));
/// assert_eq!(schedule.evaluate(Decimal::new(250, 0), reference), Decimal::new(100, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandSchedule {
    bands: Vec<Band>,
    above: LinearFormula,
}

impl BandSchedule {
    /// Starts building a schedule from its lowest band upwards.
    pub fn builder() -> BandScheduleBuilder {
        BandScheduleBuilder { bands: Vec::new() }
    }

    /// The bounded bands, lowest first.
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// The formula used above the last bounded band.
    pub fn top_formula(&self) -> &LinearFormula {
        &self.above
    }

    /// Total number of bands, including the open top band.
    pub fn band_count(&self) -> usize {
        self.bands.len() + 1
    }

    /// Returns the zero-based index of the band an income falls in.
    pub fn band_index(&self, income: Decimal, reference: Decimal) -> usize {
        self.bands
            .iter()
            .position(|band| income <= band.upper * reference)
            .unwrap_or(self.bands.len())
    }

    /// Returns the formula that applies to an income.
    pub fn formula_for(&self, income: Decimal, reference: Decimal) -> &LinearFormula {
        match self.bands.get(self.band_index(income, reference)) {
            Some(band) => &band.formula,
            None => &self.above,
        }
    }

    /// Evaluates the schedule for an income, without rounding.
    pub fn evaluate(&self, income: Decimal, reference: Decimal) -> Decimal {
        self.formula_for(income, reference).evaluate(income, reference)
    }

    /// The absolute band boundaries for a reference amount, lowest first.
    pub fn boundaries(&self, reference: Decimal) -> Vec<Decimal> {
        self.bands.iter().map(|b| b.upper * reference).collect()
    }
}

/// Builder for [`BandSchedule`]; finish with [`BandScheduleBuilder::above`].
#[derive(Debug, Clone, Default)]
pub struct BandScheduleBuilder {
    bands: Vec<Band>,
}

impl BandScheduleBuilder {
    /// Adds a band covering incomes up to `upper × reference`.
    ///
    /// Bands must be added in ascending order of `upper`.
    pub fn up_to(mut self, upper: Decimal, formula: LinearFormula) -> Self {
        debug_assert!(
            self.bands.last().is_none_or(|prev| prev.upper < upper),
            "bands must be added in ascending order"
        );
        self.bands.push(Band { upper, formula });
        self
    }

    /// Closes the schedule with the formula for all higher incomes.
    pub fn above(self, formula: LinearFormula) -> BandSchedule {
        BandSchedule {
            bands: self.bands,
            above: formula,
        }
    }
}
