//! # Error Types
//!
//! Structured error types for soil_core. These errors are designed to be
//! informative for both humans and LLMs, providing enough context to
//! understand and fix issues programmatically.
//!
//! Data-quality problems split three ways (see the module docs in `lib.rs`):
//! hard validation failures are `CalcError` values, "not enough data to
//! compute" is an `Option::None` result, and advisory observations ride along
//! on successful results as [`Warning`] records.
//!
//! ## Example
//!
//! ```rust
//! use soil_core::errors::{CalcError, CalcResult};
//!
//! fn validate_blows(blows: i64) -> CalcResult<()> {
//!     if blows <= 0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "blows".to_string(),
//!             value: blows.to_string(),
//!             reason: "Blow count must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for soil_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
///
/// Each variant provides specific context about what went wrong,
/// enabling programmatic error handling by LLMs and other consumers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, wrong type, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing or blank
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Calculation failed (degenerate fit, inconsistent data, etc.)
    #[error("Calculation failed: {calculation_type} - {reason}")]
    CalculationFailed {
        calculation_type: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a CalculationFailed error
    pub fn calculation_failed(calculation_type: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::CalculationFailed {
            calculation_type: calculation_type.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error is fixable by correcting the input record
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. } | CalcError::MissingField { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::CalculationFailed { .. } => "CALCULATION_FAILED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

// ============================================================================
// Advisory Warnings
// ============================================================================

/// Severity of an advisory warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Human-readable name for display layers that do not localize
    pub fn display_name(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }
}

/// A non-fatal observation attached to an otherwise successful result.
///
/// The `code` is stable and intended for programmatic handling (the display
/// layer maps it to localized text); `message` is a developer-facing default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub code: String,
    pub message: String,
    pub severity: Severity,
}

impl Warning {
    pub fn new(code: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Warning {
            code: code.into(),
            message: message.into(),
            severity,
        }
    }
}

/// Outcome of validating a single input record before it enters a working
/// list. Errors block acceptance; warnings do not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<CalcError>,
    pub warnings: Vec<Warning>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Valid means no errors; warnings alone do not invalidate a record
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: CalcError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    /// Fold another report into this one
    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("blows", "-3", "Blow count must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("sand_density").error_code(), "MISSING_FIELD");
        assert_eq!(
            CalcError::calculation_failed("proctor", "degenerate fit").error_code(),
            "CALCULATION_FAILED"
        );
    }

    #[test]
    fn test_input_errors_are_flagged() {
        assert!(CalcError::invalid_input("load", "abc", "not a number").is_input_error());
        assert!(!CalcError::Internal { message: "bug".to_string() }.is_input_error());
    }

    #[test]
    fn test_validation_report_merge() {
        let mut report = ValidationReport::new();
        assert!(report.is_valid());

        report.add_warning(Warning::new("LOW_BLOWS", "Blow count is very low", Severity::Medium));
        assert!(report.is_valid(), "warnings alone must not invalidate");

        let mut other = ValidationReport::new();
        other.add_error(CalcError::missing_field("water_content"));
        report.merge(other);
        assert!(!report.is_valid());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn test_warning_serialization() {
        let warning = Warning::new("HIGH_WC", "Water content above 120%", Severity::High);
        let json = serde_json::to_string(&warning).unwrap();
        let roundtrip: Warning = serde_json::from_str(&json).unwrap();
        assert_eq!(warning, roundtrip);
    }
}
