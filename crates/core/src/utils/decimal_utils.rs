use rust_decimal::Decimal;

use crate::errors::{Result, ValidationError};

/// `lhs * rhs`, failing instead of panicking when the result leaves the
/// Decimal range. `context` names the computation in the error.
pub fn checked_mul(lhs: Decimal, rhs: Decimal, context: &str) -> Result<Decimal> {
    lhs.checked_mul(rhs)
        .ok_or_else(|| ValidationError::AmountOverflow(context.to_string()).into())
}

/// `lhs / rhs`; division by zero is reported like an overflow.
pub fn checked_div(lhs: Decimal, rhs: Decimal, context: &str) -> Result<Decimal> {
    lhs.checked_div(rhs)
        .ok_or_else(|| ValidationError::AmountOverflow(context.to_string()).into())
}

pub fn checked_add(lhs: Decimal, rhs: Decimal, context: &str) -> Result<Decimal> {
    lhs.checked_add(rhs)
        .ok_or_else(|| ValidationError::AmountOverflow(context.to_string()).into())
}

pub fn checked_sub(lhs: Decimal, rhs: Decimal, context: &str) -> Result<Decimal> {
    lhs.checked_sub(rhs)
        .ok_or_else(|| ValidationError::AmountOverflow(context.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use rust_decimal_macros::dec;

    fn is_overflow(result: Result<Decimal>) -> bool {
        matches!(
            result,
            Err(Error::Validation(ValidationError::AmountOverflow(_)))
        )
    }

    #[test]
    fn test_in_range_values_pass_through() {
        assert_eq!(checked_mul(dec!(2.5), dec!(4), "x").unwrap(), dec!(10));
        assert_eq!(checked_div(dec!(10), dec!(4), "x").unwrap(), dec!(2.5));
        assert_eq!(checked_add(dec!(1.1), dec!(2.2), "x").unwrap(), dec!(3.3));
        assert_eq!(checked_sub(dec!(1), dec!(3), "x").unwrap(), dec!(-2));
    }

    #[test]
    fn test_out_of_range_is_an_error() {
        assert!(is_overflow(checked_mul(Decimal::MAX, dec!(2), "x")));
        assert!(is_overflow(checked_add(Decimal::MAX, Decimal::MAX, "x")));
        assert!(is_overflow(checked_sub(Decimal::MIN, Decimal::MAX, "x")));
        assert!(is_overflow(checked_div(dec!(1), Decimal::ZERO, "x")));
    }

    #[test]
    fn test_error_names_the_computation() {
        let err = checked_mul(Decimal::MAX, dec!(2), "line subtotal").unwrap_err();
        assert!(err.to_string().contains("line subtotal"));
    }
}
