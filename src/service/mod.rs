//! Collaborators around the pure calculation core.
//!
//! The engine consumes rates through a [`RateProvider`] and reports finished
//! calculations to a [`CalculationSink`]. [`TaxService`] wires both to the
//! orchestrator.

mod rate_provider;
mod sink;
mod tax_service;

pub use rate_provider::{RateProvider, StaticRateProvider};
pub use crate::calculation::CalculationSink;
pub use sink::{ChannelSink, DEFAULT_CHANNEL_CAPACITY, TracingSink};
pub use tax_service::TaxService;
