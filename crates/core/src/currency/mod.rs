//! Currency module - currency model and rounding contract.

mod currency_model;
mod currency_traits;

pub use currency_model::Currency;
pub use currency_traits::{round_with, CurrencyRounder};
