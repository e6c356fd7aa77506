//! Fiscal positions remap a nominal tax to the one applicable to a customer.

use serde::{Deserialize, Serialize};

use super::tax_model::Tax;
use crate::catalog::{Partner, Product};

/// Replaces `source_tax_id` by `destination`, or drops it when `destination`
/// is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxMapping {
    pub source_tax_id: String,
    pub destination: Option<Tax>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FiscalPosition {
    pub id: String,
    pub name: String,
    pub tax_mappings: Vec<TaxMapping>,
}

impl FiscalPosition {
    /// Taxes that apply in place of `tax`.
    ///
    /// Unmapped taxes are returned unchanged. A tax mapped several times
    /// yields every non-empty destination.
    pub fn map_tax(
        &self,
        tax: &Tax,
        _product: Option<&Product>,
        _partner: Option<&Partner>,
    ) -> Vec<Tax> {
        let mappings: Vec<&TaxMapping> = self
            .tax_mappings
            .iter()
            .filter(|m| m.source_tax_id == tax.id)
            .collect();

        if mappings.is_empty() {
            return vec![tax.clone()];
        }

        mappings
            .into_iter()
            .filter_map(|m| m.destination.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn export_position() -> FiscalPosition {
        FiscalPosition {
            id: "fp-export".to_string(),
            name: "Export".to_string(),
            tax_mappings: vec![
                TaxMapping {
                    source_tax_id: "vat21".to_string(),
                    destination: Some(Tax::percent("vat0", "c1", dec!(0))),
                },
                TaxMapping {
                    source_tax_id: "eco".to_string(),
                    destination: None,
                },
            ],
        }
    }

    #[test]
    fn test_unmapped_tax_is_kept() {
        let tax = Tax::percent("vat6", "c1", dec!(6));
        assert_eq!(export_position().map_tax(&tax, None, None), vec![tax]);
    }

    #[test]
    fn test_mapped_tax_is_replaced() {
        let tax = Tax::percent("vat21", "c1", dec!(21));
        let mapped = export_position().map_tax(&tax, None, None);
        assert_eq!(mapped.len(), 1);
        assert_eq!(mapped[0].id, "vat0");
    }

    #[test]
    fn test_tax_mapped_to_nothing_is_dropped() {
        let tax = Tax::fixed("eco", "c1", dec!(0.5));
        assert!(export_position().map_tax(&tax, None, None).is_empty());
    }
}
