//! Subscription-level totals built from line pricing results.

use num_traits::Zero;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency::{round_with, CurrencyRounder};
use crate::errors::Result;
use crate::pricing::LinePricing;
use crate::utils::decimal_utils::checked_add;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionTotals {
    /// Sum of line subtotals, before tax
    pub recurring_total: Decimal,
    /// Sum of line tax amounts, currency rounded
    pub recurring_tax: Decimal,
    pub recurring_amount_total: Decimal,
}

/// Sums line subtotals and tax amounts.
///
/// Subtotals are already rounded per line; the tax sum is rounded once here.
pub fn aggregate<'a, I>(
    lines: I,
    currency: Option<&dyn CurrencyRounder>,
) -> Result<SubscriptionTotals>
where
    I: IntoIterator<Item = &'a LinePricing>,
{
    let (recurring_total, raw_tax) = lines.into_iter().try_fold(
        (Decimal::zero(), Decimal::zero()),
        |(total, tax), line| -> Result<(Decimal, Decimal)> {
            Ok((
                checked_add(total, line.subtotal, "recurring total")?,
                checked_add(tax, line.tax_amount, "recurring tax")?,
            ))
        },
    )?;
    let recurring_tax = round_with(currency, raw_tax)?;

    Ok(SubscriptionTotals {
        recurring_total,
        recurring_tax,
        recurring_amount_total: checked_add(recurring_tax, recurring_total, "amount total")?,
    })
}
