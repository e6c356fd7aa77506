//! Catalog module - partner, product and unit of measure references.

mod catalog_model;
mod catalog_traits;

pub use catalog_model::{Partner, Product, UnitOfMeasure};
pub use catalog_traits::ProductCatalog;
