//! The sink seam.
//!
//! After each successful calculation the orchestrator offers a
//! [`CalculationRecord`] to its sink. Offering never blocks the calculation
//! and never fails it; a sink that cannot deliver logs and drops the record.

use crate::models::CalculationRecord;

/// Fire-and-forget receiver of calculation records.
pub trait CalculationSink: Send + Sync {
    /// Offers a record. Must return promptly and must not panic.
    fn offer(&self, record: CalculationRecord);
}
