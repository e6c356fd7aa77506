//! Default tax engine handling percent, fixed, grouped and price-included taxes.

use log::debug;
use rust_decimal::Decimal;

use super::tax_model::{Tax, TaxAmountType, TaxComputation, TaxLine};
use super::tax_traits::TaxEngine;
use crate::catalog::{Partner, Product};
use crate::constants::PERCENT_BASE;
use crate::currency::{round_with, CurrencyRounder};
use crate::errors::{Error, Result};
use crate::utils::decimal_utils::{checked_add, checked_div, checked_mul, checked_sub};

const CONTEXT: &str = "tax amounts";

/// Stateless [`TaxEngine`] implementation.
///
/// Price-included taxes are first stripped from the base; every leaf tax then
/// produces one [`TaxLine`] in configuration order. Taxes flagged with
/// `include_base_amount` raise the base of the taxes that follow them.
#[derive(Clone, Default)]
pub struct StandardTaxEngine;

impl StandardTaxEngine {
    pub fn new() -> Self {
        Self
    }

    fn leaf_amount(tax: &Tax, base: Decimal, quantity: Decimal) -> Result<Decimal> {
        match tax.amount_type {
            TaxAmountType::Percent => checked_div(
                checked_mul(base, tax.amount, CONTEXT)?,
                Decimal::from(PERCENT_BASE),
                CONTEXT,
            ),
            TaxAmountType::Fixed => checked_mul(quantity, tax.amount, CONTEXT),
            // flattened away before evaluation
            TaxAmountType::Group => Ok(Decimal::ZERO),
        }
    }
}

impl TaxEngine for StandardTaxEngine {
    fn compute_all(
        &self,
        taxes: &[Tax],
        price_unit: Decimal,
        currency: Option<&dyn CurrencyRounder>,
        quantity: Decimal,
        _product: Option<&Product>,
        _partner: Option<&Partner>,
    ) -> Result<TaxComputation> {
        let base = round_with(currency, checked_mul(price_unit, quantity, CONTEXT)?)?;
        let leaves: Vec<&Tax> = taxes.iter().flat_map(Tax::flatten).collect();

        let mut included_percent = Decimal::ZERO;
        let mut included_fixed = Decimal::ZERO;
        for tax in leaves.iter().filter(|t| t.price_include) {
            match tax.amount_type {
                TaxAmountType::Percent => {
                    included_percent = checked_add(included_percent, tax.amount, CONTEXT)?;
                }
                TaxAmountType::Fixed => {
                    let amount = checked_mul(tax.amount, quantity, CONTEXT)?;
                    included_fixed = checked_add(included_fixed, amount, CONTEXT)?;
                }
                TaxAmountType::Group => {}
            }
        }

        let included_rate = checked_div(included_percent, Decimal::from(PERCENT_BASE), CONTEXT)?;
        let divisor = checked_add(Decimal::ONE, included_rate, CONTEXT)?;
        if divisor.is_zero() {
            return Err(Error::Tax(format!(
                "Price-included taxes sum to -{}%, cannot extract the untaxed amount",
                PERCENT_BASE
            )));
        }
        let untaxed = checked_div(checked_sub(base, included_fixed, CONTEXT)?, divisor, CONTEXT)?;
        let total_excluded = round_with(currency, untaxed)?;

        let mut lines = Vec::with_capacity(leaves.len());
        let mut raised_base = Decimal::ZERO;
        let mut total_tax = Decimal::ZERO;
        for tax in leaves {
            let tax_base = checked_add(total_excluded, raised_base, CONTEXT)?;
            let amount = round_with(currency, Self::leaf_amount(tax, tax_base, quantity)?)?;
            if tax.include_base_amount {
                raised_base = checked_add(raised_base, amount, CONTEXT)?;
            }
            total_tax = checked_add(total_tax, amount, CONTEXT)?;
            lines.push(TaxLine {
                tax_id: tax.id.clone(),
                name: tax.name.clone(),
                amount,
                base: tax_base,
            });
        }

        debug!(
            "Computed {} tax entries on base {} (excluded {}, tax {})",
            lines.len(),
            base,
            total_excluded,
            total_tax
        );

        Ok(TaxComputation {
            taxes: lines,
            total_excluded,
            total_included: checked_add(total_excluded, total_tax, CONTEXT)?,
        })
    }

    fn fix_tax_included_price(
        &self,
        price: Decimal,
        product_taxes: &[Tax],
        applied_taxes: &[Tax],
    ) -> Result<Decimal> {
        let included: Vec<Tax> = product_taxes
            .iter()
            .flat_map(Tax::flatten)
            .filter(|tax| tax.price_include)
            .filter(|tax| !applied_taxes.iter().any(|applied| applied.id == tax.id))
            .cloned()
            .collect();

        if included.is_empty() {
            return Ok(price);
        }

        Ok(self
            .compute_all(&included, price, None, Decimal::ONE, None, None)?
            .total_excluded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::Currency;
    use crate::errors::ValidationError;
    use rust_decimal_macros::dec;

    fn eur() -> Currency {
        Currency::new("EUR", dec!(0.01)).unwrap()
    }

    #[test]
    fn test_percent_tax_on_quantity() {
        let engine = StandardTaxEngine::new();
        let eur = eur();
        let result = engine
            .compute_all(
                &[Tax::percent("vat21", "c1", dec!(21))],
                dec!(10),
                Some(&eur),
                dec!(3),
                None,
                None,
            )
            .unwrap();

        assert_eq!(result.total_excluded, dec!(30));
        assert_eq!(result.taxes.len(), 1);
        assert_eq!(result.taxes[0].amount, dec!(6.30));
        assert_eq!(result.total_included, dec!(36.30));
    }

    #[test]
    fn test_fixed_tax_is_per_unit() {
        let engine = StandardTaxEngine::new();
        let result = engine
            .compute_all(
                &[Tax::fixed("eco", "c1", dec!(0.25))],
                dec!(4),
                None,
                dec!(8),
                None,
                None,
            )
            .unwrap();
        assert_eq!(result.taxes[0].amount, dec!(2));
    }

    #[test]
    fn test_price_included_tax_is_extracted() {
        let engine = StandardTaxEngine::new();
        let eur = eur();
        let result = engine
            .compute_all(
                &[Tax::percent("vat21", "c1", dec!(21)).price_included()],
                dec!(121),
                Some(&eur),
                dec!(1),
                None,
                None,
            )
            .unwrap();

        assert_eq!(result.total_excluded, dec!(100));
        assert_eq!(result.taxes[0].amount, dec!(21));
        assert_eq!(result.total_included, dec!(121));
    }

    #[test]
    fn test_group_tax_yields_one_entry_per_child() {
        let engine = StandardTaxEngine::new();
        let group = Tax::group(
            "gst-qst",
            "c1",
            vec![
                Tax::percent("gst", "c1", dec!(5)),
                Tax::percent("qst", "c1", dec!(9.975)),
            ],
        );
        let result = engine
            .compute_all(&[group], dec!(100), None, dec!(1), None, None)
            .unwrap();

        let amounts: Vec<Decimal> = result.taxes.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![dec!(5), dec!(9.975)]);
    }

    #[test]
    fn test_base_affecting_tax_raises_following_base() {
        let engine = StandardTaxEngine::new();
        let taxes = vec![
            Tax::percent("excise", "c1", dec!(10)).affecting_base(),
            Tax::percent("vat", "c1", dec!(20)),
        ];
        let result = engine
            .compute_all(&taxes, dec!(100), None, dec!(1), None, None)
            .unwrap();

        assert_eq!(result.taxes[0].amount, dec!(10));
        assert_eq!(result.taxes[1].base, dec!(110));
        assert_eq!(result.taxes[1].amount, dec!(22));
    }

    #[test]
    fn test_fix_tax_included_price() {
        let engine = StandardTaxEngine::new();
        let included = Tax::percent("vat25", "c1", dec!(25)).price_included();
        let excluded = Tax::percent("vat10", "c1", dec!(10));

        let price = engine
            .fix_tax_included_price(dec!(125), &[included.clone(), excluded], &[])
            .unwrap();
        assert_eq!(price, dec!(100));

        let unchanged = engine
            .fix_tax_included_price(dec!(125), &[included.clone()], &[included])
            .unwrap();
        assert_eq!(unchanged, dec!(125));
    }

    #[test]
    fn test_minus_hundred_percent_included_is_an_error() {
        let engine = StandardTaxEngine::new();
        let odd = Tax::percent("odd", "c1", dec!(-100)).price_included();
        assert!(matches!(
            engine.compute_all(&[odd], dec!(10), None, dec!(1), None, None),
            Err(Error::Tax(_))
        ));
    }

    #[test]
    fn test_oversized_base_reports_overflow() {
        let engine = StandardTaxEngine::new();
        let vat = Tax::percent("vat21", "c1", dec!(21));
        let result = engine.compute_all(&[vat], Decimal::MAX, None, dec!(3), None, None);
        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::AmountOverflow(_)))
        ));
    }
}
