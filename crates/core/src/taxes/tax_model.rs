//! Tax descriptors and computation results.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a tax derives its amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaxAmountType {
    /// `amount` is a percentage of the base
    #[default]
    Percent,
    /// `amount` is charged per unit of quantity
    Fixed,
    /// Tax made of `children`, each producing its own entry
    Group,
}

/// A tax rule as configured on a product, after company filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Tax {
    pub id: String,
    pub name: String,
    pub company_id: String,
    pub amount_type: TaxAmountType,
    pub amount: Decimal,
    /// The product price already contains this tax
    pub price_include: bool,
    /// Following taxes use the base increased by this tax amount
    pub include_base_amount: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Tax>,
}

impl Tax {
    pub fn percent(id: impl Into<String>, company_id: impl Into<String>, rate: Decimal) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            company_id: company_id.into(),
            amount_type: TaxAmountType::Percent,
            amount: rate,
            ..Default::default()
        }
    }

    pub fn fixed(id: impl Into<String>, company_id: impl Into<String>, amount: Decimal) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            company_id: company_id.into(),
            amount_type: TaxAmountType::Fixed,
            amount,
            ..Default::default()
        }
    }

    pub fn group(id: impl Into<String>, company_id: impl Into<String>, children: Vec<Tax>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            company_id: company_id.into(),
            amount_type: TaxAmountType::Group,
            children,
            ..Default::default()
        }
    }

    pub fn price_included(mut self) -> Self {
        self.price_include = true;
        self
    }

    pub fn affecting_base(mut self) -> Self {
        self.include_base_amount = true;
        self
    }

    /// Leaf taxes in evaluation order, groups replaced by their children.
    pub fn flatten(&self) -> Vec<&Tax> {
        match self.amount_type {
            TaxAmountType::Group => self.children.iter().flat_map(Tax::flatten).collect(),
            _ => vec![self],
        }
    }
}

/// One computed tax entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxLine {
    pub tax_id: String,
    pub name: String,
    pub amount: Decimal,
    pub base: Decimal,
}

/// Result of applying a set of taxes to a price and quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaxComputation {
    pub taxes: Vec<TaxLine>,
    pub total_excluded: Decimal,
    pub total_included: Decimal,
}
