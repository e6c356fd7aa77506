//! Pricing module - pricelists and the line pricing calculator.

mod line_pricing;
mod pricelist_model;
mod pricelist_traits;

pub use line_pricing::{
    compute_line, compute_subtotal, compute_tax_amount, DiscountPolicy, LineInput, LinePricing,
    PricingEnv,
};
pub use pricelist_model::{PriceQuery, Pricelist};
pub use pricelist_traits::PricelistResolver;
