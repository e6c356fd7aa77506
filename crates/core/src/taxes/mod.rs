//! Taxes module - tax descriptors, fiscal positions and the tax engine contract.

mod fiscal_position;
mod tax_engine;
mod tax_model;
mod tax_traits;

pub use fiscal_position::{FiscalPosition, TaxMapping};
pub use tax_engine::StandardTaxEngine;
pub use tax_model::{Tax, TaxAmountType, TaxComputation, TaxLine};
pub use tax_traits::{FiscalPositionResolver, NoFiscalPositions, TaxEngine};
