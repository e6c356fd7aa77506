use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Partner, Product};
use crate::currency::Currency;

/// A pricelist; the currency of a subscription is the currency of its pricelist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Pricelist {
    pub id: String,
    pub name: String,
    pub currency: Option<Currency>,
}

/// Everything a pricelist needs to price one product.
#[derive(Debug, Clone)]
pub struct PriceQuery<'a> {
    pub pricelist_id: &'a str,
    pub company_id: &'a str,
    pub product: &'a Product,
    pub quantity: Decimal,
    pub partner: &'a Partner,
    pub lang: Option<&'a str>,
}
