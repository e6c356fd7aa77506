//! Line pricing: subtotal and tax amount of one subscription line.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Partner, Product};
use crate::constants::PERCENT_BASE;
use crate::currency::{round_with, CurrencyRounder};
use crate::errors::{Result, ValidationError};
use crate::taxes::{FiscalPosition, Tax, TaxEngine};
use crate::utils::decimal_utils::{checked_add, checked_div, checked_mul, checked_sub};

/// What to do with discounts outside `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DiscountPolicy {
    /// Any value is accepted; a 150% discount yields a negative subtotal
    #[default]
    Permissive,
    /// Values outside the range are rejected
    Strict,
}

impl DiscountPolicy {
    pub fn check(self, discount: Decimal) -> Result<()> {
        let in_range = discount >= Decimal::ZERO && discount <= Decimal::from(PERCENT_BASE);
        match self {
            DiscountPolicy::Strict if !in_range => {
                Err(ValidationError::DiscountOutOfRange(discount).into())
            }
            _ => Ok(()),
        }
    }
}

/// Raw inputs of a line.
#[derive(Debug, Clone, Copy)]
pub struct LineInput<'a> {
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub discount: Decimal,
    pub taxes: &'a [Tax],
}

/// Collaborators and references resolved for the owning subscription.
#[derive(Clone, Copy)]
pub struct PricingEnv<'a> {
    pub tax_engine: &'a dyn TaxEngine,
    pub currency: Option<&'a dyn CurrencyRounder>,
    pub fiscal_position: Option<&'a FiscalPosition>,
    pub product: Option<&'a Product>,
    pub partner: Option<&'a Partner>,
    pub discount_policy: DiscountPolicy,
}

impl<'a> PricingEnv<'a> {
    pub fn new(tax_engine: &'a dyn TaxEngine) -> Self {
        Self {
            tax_engine,
            currency: None,
            fiscal_position: None,
            product: None,
            partner: None,
            discount_policy: DiscountPolicy::default(),
        }
    }
}

/// Computed values of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LinePricing {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
}

/// `quantity * effective_price * (100 - discount) / 100`, currency rounded.
///
/// `effective_price` is the unit price with price-included taxes removed.
pub fn compute_subtotal(input: &LineInput<'_>, env: &PricingEnv<'_>) -> Result<Decimal> {
    env.discount_policy.check(input.discount)?;
    let price = env
        .tax_engine
        .fix_tax_included_price(input.unit_price, input.taxes, &[])?;
    let hundred = Decimal::from(PERCENT_BASE);
    let gross = checked_mul(input.quantity, price, "line subtotal")?;
    let kept = checked_sub(hundred, input.discount, "line subtotal")?;
    let discounted = checked_mul(gross, kept, "line subtotal")?;
    let subtotal = checked_div(discounted, hundred, "line subtotal")?;
    round_with(env.currency, subtotal)
}

/// Sum over the line taxes of the first entry the engine returns for each.
///
/// Every tax is remapped through the fiscal position first. Only the first
/// computed entry per tax counts: a group tax splitting into several entries
/// contributes its first child only. The sum is left unrounded, the
/// subscription rounds the total.
pub fn compute_tax_amount(input: &LineInput<'_>, env: &PricingEnv<'_>) -> Result<Decimal> {
    env.discount_policy.check(input.discount)?;
    let discount_rate = checked_div(input.discount, Decimal::from(PERCENT_BASE), "line tax")?;
    let discounted_price = checked_mul(
        input.unit_price,
        checked_sub(Decimal::ONE, discount_rate, "line tax")?,
        "line tax",
    )?;

    let mut total = Decimal::ZERO;
    for tax in input.taxes {
        let applicable = match env.fiscal_position {
            Some(position) => position.map_tax(tax, env.product, env.partner),
            None => vec![tax.clone()],
        };
        let computed = env.tax_engine.compute_all(
            &applicable,
            discounted_price,
            env.currency,
            input.quantity,
            env.product,
            env.partner,
        )?;
        if let Some(first) = computed.taxes.first() {
            total = checked_add(total, first.amount, "line tax")?;
        }
    }
    Ok(total)
}

/// Subtotal and tax amount of one line.
pub fn compute_line(input: &LineInput<'_>, env: &PricingEnv<'_>) -> Result<LinePricing> {
    Ok(LinePricing {
        subtotal: compute_subtotal(input, env)?,
        tax_amount: compute_tax_amount(input, env)?,
    })
}
