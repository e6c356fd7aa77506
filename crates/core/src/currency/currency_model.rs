use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::currency_traits::CurrencyRounder;
use crate::errors::{Error, Result};
use crate::utils::decimal_utils::{checked_div, checked_mul};

/// A currency with its minor-unit rounding increment.
///
/// `rounding` is the smallest representable step, e.g. `0.01` for EUR,
/// `1` for JPY or `0.05` for cash-rounded CHF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub id: String,
    pub code: String,
    pub rounding: Decimal,
}

impl Currency {
    pub fn new(code: impl Into<String>, rounding: Decimal) -> Result<Self> {
        let code = code.into();
        if rounding <= Decimal::ZERO {
            return Err(Error::Currency(format!(
                "Rounding increment for {} must be positive, got {}",
                code, rounding
            )));
        }
        Ok(Self {
            id: code.clone(),
            code,
            rounding,
        })
    }

    /// Number of decimal places implied by the rounding increment.
    pub fn decimal_places(&self) -> u32 {
        self.rounding.normalize().scale()
    }

    /// Whether `amount` rounds to zero in this currency.
    pub fn is_zero(&self, amount: Decimal) -> Result<bool> {
        Ok(self.round(amount)?.is_zero())
    }
}

impl CurrencyRounder for Currency {
    /// Rounds half away from zero to the nearest multiple of the increment.
    fn round(&self, amount: Decimal) -> Result<Decimal> {
        if self.rounding <= Decimal::ZERO {
            return Err(Error::Currency(format!(
                "Rounding increment for {} must be positive, got {}",
                self.code, self.rounding
            )));
        }
        let steps = checked_div(amount, self.rounding, "rounded amount")?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        Ok(checked_mul(steps, self.rounding, "rounded amount")?.round_dp(self.decimal_places()))
    }
}
