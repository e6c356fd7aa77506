//! Handlers run when a line's product, quantity or unit of measure is edited.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::subscription_model::{Subscription, SubscriptionLine};
use crate::catalog::{Partner, ProductCatalog};
use crate::errors::Result;
use crate::pricing::{PriceQuery, PricelistResolver};

/// Subscription fields the handlers read.
#[derive(Debug, Clone, Copy)]
pub struct LineParent<'a> {
    pub company_id: &'a str,
    pub pricelist_id: &'a str,
    pub partner: &'a Partner,
}

impl<'a> From<&'a Subscription> for LineParent<'a> {
    fn from(subscription: &'a Subscription) -> Self {
        Self {
            company_id: &subscription.company_id,
            pricelist_id: &subscription.pricelist.id,
            partner: &subscription.partner,
        }
    }
}

/// Units of measure a line may pick from. `None` leaves the choice open.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UomDomain {
    pub category_id: Option<String>,
}

/// Fills the description and the company taxes from the line's product.
pub fn on_product_changed(
    catalog: &dyn ProductCatalog,
    parent: LineParent<'_>,
    line: &mut SubscriptionLine,
) -> Result<()> {
    match &line.product {
        Some(product) => {
            line.name = catalog.multiline_description(product, parent.partner.lang.as_deref())?;
            line.taxes = product.taxes_for_company(parent.company_id);
        }
        None => line.taxes.clear(),
    }
    Ok(())
}

/// Reprices the line from the pricelist for its product and quantity.
///
/// The line takes the product's unit when it has none, and the price is
/// converted when the line is expressed in another unit of the same category.
pub fn on_product_quantity_changed(
    pricelists: &dyn PricelistResolver,
    parent: LineParent<'_>,
    line: &mut SubscriptionLine,
) -> Result<UomDomain> {
    let Some(product) = line.product.as_ref() else {
        line.unit_price = Decimal::ZERO;
        return Ok(UomDomain::default());
    };

    let mut price = pricelists.product_price(&PriceQuery {
        pricelist_id: parent.pricelist_id,
        company_id: parent.company_id,
        product,
        quantity: line.quantity,
        partner: parent.partner,
        lang: parent.partner.lang.as_deref(),
    })?;

    if line.uom.is_none() {
        line.uom = product.uom.clone();
    }
    if let (Some(line_uom), Some(product_uom)) = (&line.uom, &product.uom) {
        if line_uom.id != product_uom.id {
            price = product_uom.compute_price(price, line_uom)?;
        }
    }

    let domain = UomDomain {
        category_id: product.uom.as_ref().map(|u| u.category_id.clone()),
    };
    line.unit_price = price;
    Ok(domain)
}

/// Clearing the unit zeroes the price; picking one reprices the line.
pub fn on_uom_changed(
    pricelists: &dyn PricelistResolver,
    parent: LineParent<'_>,
    line: &mut SubscriptionLine,
) -> Result<UomDomain> {
    if line.uom.is_none() {
        line.unit_price = Decimal::ZERO;
        return Ok(UomDomain {
            category_id: line
                .product
                .as_ref()
                .and_then(|p| p.uom.as_ref())
                .map(|u| u.category_id.clone()),
        });
    }
    on_product_quantity_changed(pricelists, parent, line)
}
