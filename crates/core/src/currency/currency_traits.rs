use rust_decimal::Decimal;

use crate::errors::Result;

/// Rounds amounts to the minor-unit precision of a currency.
///
/// Implementations must be idempotent: rounding an already rounded amount
/// returns it unchanged.
pub trait CurrencyRounder: Send + Sync {
    fn round(&self, amount: Decimal) -> Result<Decimal>;
}

/// Rounds with `rounder` when one is available, otherwise returns `amount` as is.
pub fn round_with(rounder: Option<&dyn CurrencyRounder>, amount: Decimal) -> Result<Decimal> {
    match rounder {
        Some(rounder) => rounder.round(amount),
        None => Ok(amount),
    }
}
