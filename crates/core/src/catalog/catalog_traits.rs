use super::catalog_model::{Product, UnitOfMeasure};
use crate::errors::Result;

/// Read access to products and units of measure owned by the host platform.
pub trait ProductCatalog: Send + Sync {
    fn get_product(&self, product_id: &str) -> Result<Product>;

    fn get_uom(&self, uom_id: &str) -> Result<UnitOfMeasure>;

    /// Unit used for new lines when nothing else applies (lowest id).
    fn default_uom(&self) -> Result<Option<UnitOfMeasure>>;

    /// Sale description of `product`, translated to `lang` when given.
    fn multiline_description(&self, product: &Product, lang: Option<&str>) -> Result<String> {
        let _ = lang;
        Ok(product.multiline_description_sale())
    }
}
