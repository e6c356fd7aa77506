//! Subscription and subscription line domain models.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::aggregator::SubscriptionTotals;
use super::dependencies::DirtySet;
use super::template_model::SubscriptionTemplate;
use crate::catalog::{Partner, Product, UnitOfMeasure};
use crate::currency::Currency;
use crate::pricing::{LineInput, Pricelist};
use crate::taxes::Tax;

/// One billed product of a subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionLine {
    pub id: String,
    pub product: Option<Product>,
    /// Description printed on invoices
    pub name: String,
    pub quantity: Decimal,
    pub uom: Option<UnitOfMeasure>,
    pub unit_price: Decimal,
    /// Discount in percent
    pub discount: Decimal,
    /// Product taxes of the subscription company
    pub taxes: Vec<Tax>,
    pub price_subtotal: Decimal,
    pub tax_amount: Decimal,
}

impl SubscriptionLine {
    pub fn product_id(&self) -> Option<&str> {
        self.product.as_ref().map(|p| p.id.as_str())
    }

    pub fn pricing_input(&self) -> LineInput<'_> {
        LineInput {
            quantity: self.quantity,
            unit_price: self.unit_price,
            discount: self.discount,
            taxes: &self.taxes,
        }
    }
}

/// Input model for adding a line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubscriptionLine {
    pub id: Option<String>,
    pub product_id: Option<String>,
    pub name: Option<String>,
    pub quantity: Decimal,
    pub uom_id: Option<String>,
    /// Explicit price; when absent the pricelist price is used
    pub unit_price: Option<Decimal>,
    pub discount: Decimal,
}

impl Default for NewSubscriptionLine {
    fn default() -> Self {
        Self {
            id: None,
            product_id: None,
            name: None,
            quantity: Decimal::ONE,
            uom_id: None,
            unit_price: None,
            discount: Decimal::ZERO,
        }
    }
}

/// Partial update of a line; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionLineUpdate {
    pub name: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub discount: Option<Decimal>,
    pub taxes: Option<Vec<Tax>>,
}

/// A recurring billing agreement with a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    /// Reference allocated from the subscription sequence
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub company_id: String,
    pub partner: Partner,
    pub pricelist: Pricelist,
    pub template: Option<Arc<SubscriptionTemplate>>,
    pub stage_id: Option<String>,
    /// Salesperson
    pub user_id: Option<String>,
    pub team_id: Option<String>,
    pub analytic_account_id: Option<String>,
    pub tag_ids: Vec<String>,
    pub date_start: NaiveDate,
    pub date_end: Option<NaiveDate>,
    pub recurring_next_date: NaiveDate,
    pub to_renew: bool,
    pub color: i32,
    pub token: Option<String>,
    pub website_url: Option<String>,
    pub lines: Vec<SubscriptionLine>,
    pub recurring_total: Decimal,
    pub recurring_tax: Decimal,
    pub recurring_amount_total: Decimal,
    pub recurring_monthly: Decimal,
    #[serde(skip)]
    pub(crate) dirty: DirtySet,
}

impl Subscription {
    /// `"{code} - {customer}"`, or the customer name when no code is set.
    pub fn display_name(&self) -> String {
        if self.code.is_empty() {
            self.partner.display_name.clone()
        } else {
            format!("{} - {}", self.code, self.partner.display_name)
        }
    }

    pub fn currency(&self) -> Option<&Currency> {
        self.pricelist.currency.as_ref()
    }

    pub fn template_id(&self) -> Option<&str> {
        self.template.as_deref().map(|t| t.id.as_str())
    }

    pub fn country_id(&self) -> Option<&str> {
        self.partner.country_id.as_deref()
    }

    pub fn industry_id(&self) -> Option<&str> {
        self.partner.industry_id.as_deref()
    }

    pub fn line(&self, line_id: &str) -> Option<&SubscriptionLine> {
        self.lines.iter().find(|l| l.id == line_id)
    }

    /// Whether derived amounts are waiting for a recompute pass.
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_clean()
    }

    /// Derived totals as last computed.
    pub fn totals(&self) -> SubscriptionTotals {
        SubscriptionTotals {
            recurring_total: self.recurring_total,
            recurring_tax: self.recurring_tax,
            recurring_amount_total: self.recurring_amount_total,
        }
    }
}

/// Input model for creating a subscription.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubscription {
    pub id: Option<String>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub partner: Partner,
    /// Falls back to the company's default pricelist
    pub pricelist_id: Option<String>,
    pub template: Option<Arc<SubscriptionTemplate>>,
    /// Falls back to the first stage
    pub stage_id: Option<String>,
    /// Falls back to the acting user
    pub user_id: Option<String>,
    pub team_id: Option<String>,
    pub analytic_account_id: Option<String>,
    pub tag_ids: Vec<String>,
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
    pub recurring_next_date: Option<NaiveDate>,
    pub color: i32,
    pub lines: Vec<NewSubscriptionLine>,
}
