use rust_decimal::Decimal;

use super::fiscal_position::FiscalPosition;
use super::tax_model::{Tax, TaxComputation};
use crate::catalog::{Partner, Product};
use crate::currency::CurrencyRounder;
use crate::errors::Result;

/// Numeric tax combination supplied by the host accounting layer.
pub trait TaxEngine: Send + Sync {
    /// Applies `taxes` to `price_unit * quantity`.
    ///
    /// Amounts are rounded with `currency` when one is given.
    fn compute_all(
        &self,
        taxes: &[Tax],
        price_unit: Decimal,
        currency: Option<&dyn CurrencyRounder>,
        quantity: Decimal,
        product: Option<&Product>,
        partner: Option<&Partner>,
    ) -> Result<TaxComputation>;

    /// Removes from `price` the price-included taxes of `product_taxes` that
    /// are not part of `applied_taxes`.
    fn fix_tax_included_price(
        &self,
        price: Decimal,
        product_taxes: &[Tax],
        applied_taxes: &[Tax],
    ) -> Result<Decimal>;
}

/// Resolves the fiscal position applicable to a partner within a company.
pub trait FiscalPositionResolver: Send + Sync {
    fn fiscal_position_for(
        &self,
        company_id: &str,
        partner: &Partner,
    ) -> Result<Option<FiscalPosition>>;
}

/// Resolver for hosts without fiscal positions.
#[derive(Clone, Default)]
pub struct NoFiscalPositions;

impl FiscalPositionResolver for NoFiscalPositions {
    fn fiscal_position_for(
        &self,
        _company_id: &str,
        _partner: &Partner,
    ) -> Result<Option<FiscalPosition>> {
        Ok(None)
    }
}
