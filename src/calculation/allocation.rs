//! Sequential allocation of tax reductions across tax buckets.
//!
//! A reduction is consumed from buckets in the order given, each bucket
//! absorbing at most its remaining capacity. Whatever no bucket can absorb
//! is left unconsumed; a bucket is never driven below zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A tax bucket that reductions can be offset against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxBucket {
    /// Municipal plus regional income tax.
    Local,
    /// State income tax.
    State,
}

/// The outcome of allocating one reduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Amount consumed from each bucket, in allocation order.
    pub consumed: Vec<(TaxBucket, Decimal)>,
    /// The part of the reduction no bucket could absorb.
    pub unconsumed: Decimal,
}

impl Allocation {
    /// Amount consumed from one bucket (zero if the bucket was not offered).
    pub fn consumed_from(&self, bucket: TaxBucket) -> Decimal {
        self.consumed
            .iter()
            .filter(|(b, _)| *b == bucket)
            .map(|(_, amount)| *amount)
            .sum()
    }

    /// Total amount consumed across all buckets.
    pub fn total_consumed(&self) -> Decimal {
        self.consumed.iter().map(|(_, amount)| *amount).sum()
    }
}

/// Allocates `reduction` across `buckets` in order.
///
/// Each `(bucket, capacity)` pair absorbs `min(remaining, capacity)`;
/// negative capacities are treated as zero, as is a negative reduction.
///
/// # Example
///
/// ```
/// use tax_engine::calculation::{allocate_reduction, TaxBucket};
/// use rust_decimal::Decimal;
///
/// let allocation = allocate_reduction(
///     Decimal::new(500, 0),
///     &[(TaxBucket::Local, Decimal::new(300, 0)), (TaxBucket::State, Decimal::new(1000, 0))],
/// );
/// assert_eq!(allocation.consumed_from(TaxBucket::Local), Decimal::new(300, 0));
/// assert_eq!(allocation.consumed_from(TaxBucket::State), Decimal::new(200, 0));
/// assert_eq!(allocation.unconsumed, Decimal::ZERO);
/// ```
pub fn allocate_reduction(reduction: Decimal, buckets: &[(TaxBucket, Decimal)]) -> Allocation {
    let mut remaining = reduction.max(Decimal::ZERO);
    let mut consumed = Vec::with_capacity(buckets.len());

    for &(bucket, capacity) in buckets {
        let take = remaining.min(capacity.max(Decimal::ZERO));
        consumed.push((bucket, take));
        remaining -= take;
    }

    Allocation {
        consumed,
        unconsumed: remaining,
    }
}

/// Remaining value of the local and state buckets while reductions are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketBalances {
    /// What is left of the local bucket.
    pub local: Decimal,
    /// What is left of the state bucket.
    pub state: Decimal,
}

impl BucketBalances {
    /// Starts from the full value of both buckets.
    pub fn new(local: Decimal, state: Decimal) -> Self {
        Self { local, state }
    }

    /// Remaining value of a bucket.
    pub fn get(&self, bucket: TaxBucket) -> Decimal {
        match bucket {
            TaxBucket::Local => self.local,
            TaxBucket::State => self.state,
        }
    }

    /// Applies a reduction to the given buckets in order and deducts what
    /// each consumed.
    pub fn apply(&mut self, reduction: Decimal, order: &[TaxBucket]) -> Allocation {
        let offered: Vec<(TaxBucket, Decimal)> =
            order.iter().map(|&bucket| (bucket, self.get(bucket))).collect();
        let allocation = allocate_reduction(reduction, &offered);

        for &(bucket, amount) in &allocation.consumed {
            match bucket {
                TaxBucket::Local => self.local -= amount,
                TaxBucket::State => self.state -= amount,
            }
        }
        allocation
    }
}
