//! Reference models for partners, products and units of measure.
//!
//! These records are owned by the host platform. The subscription core only
//! keeps snapshots of the fields its rules read.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use crate::taxes::Tax;
use crate::utils::decimal_utils::{checked_div, checked_mul};

/// Customer a subscription is billed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    pub id: String,
    pub display_name: String,
    pub lang: Option<String>,
    pub country_id: Option<String>,
    pub industry_id: Option<String>,
}

impl Partner {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            ..Default::default()
        }
    }
}

/// Sellable product referenced by subscription lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub display_name: String,
    pub description_sale: Option<String>,
    pub uom: Option<UnitOfMeasure>,
    /// Customer taxes configured on the product, across all companies
    pub taxes: Vec<Tax>,
}

impl Product {
    /// Product taxes that belong to `company_id`.
    pub fn taxes_for_company(&self, company_id: &str) -> Vec<Tax> {
        self.taxes
            .iter()
            .filter(|tax| tax.company_id == company_id)
            .cloned()
            .collect()
    }

    /// Display name followed by the sale description, one per line.
    pub fn multiline_description_sale(&self) -> String {
        match self.description_sale.as_deref().map(str::trim) {
            Some(description) if !description.is_empty() => {
                format!("{}\n{}", self.display_name, description)
            }
            _ => self.display_name.clone(),
        }
    }
}

/// Unit of measure. `factor` is how many of this unit make one reference
/// unit of its category (a dozen has factor `1/12` against "Units").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitOfMeasure {
    pub id: String,
    pub name: String,
    pub category_id: String,
    pub factor: Decimal,
}

impl UnitOfMeasure {
    /// Converts a price expressed per `self` into a price per `to_unit`.
    pub fn compute_price(&self, price: Decimal, to_unit: &UnitOfMeasure) -> Result<Decimal> {
        if self.category_id != to_unit.category_id {
            return Err(ValidationError::InvalidInput(format!(
                "Cannot convert price from unit '{}' to unit '{}' of another category",
                self.name, to_unit.name
            ))
            .into());
        }
        if to_unit.factor.is_zero() {
            return Err(ValidationError::InvalidInput(format!(
                "Unit '{}' has a zero conversion factor",
                to_unit.name
            ))
            .into());
        }
        let scaled = checked_mul(price, self.factor, "unit price conversion")?;
        checked_div(scaled, to_unit.factor, "unit price conversion")
    }
}
