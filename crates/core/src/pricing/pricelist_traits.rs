use rust_decimal::Decimal;

use super::pricelist_model::{PriceQuery, Pricelist};
use crate::context::RequestContext;
use crate::errors::Result;

/// Pricelist lookups supplied by the host sales layer.
pub trait PricelistResolver: Send + Sync {
    fn get_pricelist(&self, pricelist_id: &str) -> Result<Pricelist>;

    /// First pricelist in the currency of the context company, if any.
    fn default_pricelist(&self, ctx: &RequestContext) -> Result<Option<Pricelist>>;

    /// Unit price of the queried product, expressed in the product's own unit.
    fn product_price(&self, query: &PriceQuery<'_>) -> Result<Decimal>;
}
