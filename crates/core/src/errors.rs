//! Core error types for the subscription domain.
//!
//! Collaborator failures (currency rounding, tax computation, pricelist
//! resolution, sequence allocation) are reported through the string-carrying
//! variants so host adapters can convert their own errors without this crate
//! knowing about them.

use rust_decimal::Decimal;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the subscription core.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Recurrence error: {0}")]
    Recurrence(#[from] RecurrenceError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Currency rounding failed: {0}")]
    Currency(String),

    #[error("Tax computation failed: {0}")]
    Tax(String),

    #[error("Pricelist resolution failed: {0}")]
    Pricelist(String),

    #[error("Sequence allocation failed: {0}")]
    Sequence(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Errors raised by recurrence templates and the monthly normalizer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceError {
    #[error("The recurring interval must be positive, got {0}")]
    InvalidInterval(i32),

    #[error("Unknown recurrence unit '{0}'")]
    UnknownRecurrenceUnit(String),
}

const UNKNOWN_UNIT_PREFIX: &str = "Unknown recurrence unit '";

impl RecurrenceError {
    /// Recovers an `UnknownRecurrenceUnit` from its rendered message, which
    /// serde wraps when a unit fails to deserialize.
    fn from_message(message: &str) -> Option<Self> {
        let rest = message.strip_prefix(UNKNOWN_UNIT_PREFIX)?;
        let (unit, _) = rest.rsplit_once('\'')?;
        Some(RecurrenceError::UnknownRecurrenceUnit(unit.to_string()))
    }
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Discount {0}% is outside the 0-100 range")]
    DiscountOutOfRange(Decimal),

    #[error("Amount out of range while computing {0}")]
    AmountOverflow(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        let message = err.to_string();
        if err.is_data() {
            if let Some(recurrence) = RecurrenceError::from_message(&message) {
                return Error::Recurrence(recurrence);
            }
        }
        Error::Validation(ValidationError::InvalidInput(message))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscriptions::RecurrenceUnit;

    #[test]
    fn test_unknown_unit_survives_json_wrapping() {
        let err: Error = serde_json::from_str::<RecurrenceUnit>("\"hourly\"")
            .unwrap_err()
            .into();
        assert!(matches!(
            err,
            Error::Recurrence(RecurrenceError::UnknownRecurrenceUnit(ref unit)) if unit == "hourly"
        ));
    }

    #[test]
    fn test_other_json_errors_stay_invalid_input() {
        let err: Error = serde_json::from_str::<i32>("\"nope\"").unwrap_err().into();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidInput(_))
        ));

        let err: Error = serde_json::from_str::<i32>("{").unwrap_err().into();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidInput(_))
        ));
    }
}
