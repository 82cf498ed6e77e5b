//! Error types for the Salary Tax Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while resolving rates or
//! calculating tax.

use thiserror::Error;

/// The main error type for the Salary Tax Engine.
///
/// All fallible operations in the engine return this error type. The pure
/// calculation functions are total and never fail; errors come from input
/// validation, tax year lookup, and the rate provider collaborators.
///
/// # Example
///
/// ```
/// use tax_engine::error::EngineError;
///
/// let error = EngineError::UnknownLocality {
///     locality: "9999".to_string(),
/// };
/// assert_eq!(error.to_string(), "Unknown locality: 9999");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// An input value was negative, missing or out of range.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The rate provider does not know the requested locality.
    #[error("Unknown locality: {locality}")]
    UnknownLocality {
        /// The locality id or code that was requested.
        locality: String,
    },

    /// No constants table exists for the requested tax year.
    #[error("Unsupported tax year: {year}")]
    UnsupportedTaxYear {
        /// The requested tax year.
        year: i32,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for building an [`EngineError::InvalidInput`].
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
