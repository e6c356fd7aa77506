//! Subscription service contracts and the sequence collaborator.

use std::sync::Arc;

use rust_decimal::Decimal;

use super::aggregator::SubscriptionTotals;
use super::line_onchange::UomDomain;
use super::subscription_model::{
    NewSubscription, NewSubscriptionLine, Subscription, SubscriptionLine, SubscriptionLineUpdate,
};
use super::template_model::SubscriptionTemplate;
use crate::context::RequestContext;
use crate::errors::Result;
use crate::pricing::Pricelist;
use crate::stages::Stage;

/// Sequential numbering supplied by the host platform.
pub trait CodeGenerator: Send + Sync {
    /// Next value of the sequence `sequence_code` for `company_id`, if the
    /// sequence exists.
    fn next_by_code(&self, sequence_code: &str, company_id: &str) -> Result<Option<String>>;
}

/// Trait defining the contract for subscription service operations.
///
/// Every mutating operation works on one subscription aggregate and leaves
/// it untouched when an error is returned.
pub trait SubscriptionServiceTrait: Send + Sync {
    fn create_subscription(
        &self,
        ctx: &RequestContext,
        new_subscription: NewSubscription,
    ) -> Result<Subscription>;

    fn add_line(
        &self,
        ctx: &RequestContext,
        subscription: &mut Subscription,
        new_line: NewSubscriptionLine,
    ) -> Result<String>;

    fn remove_line(
        &self,
        subscription: &mut Subscription,
        line_id: &str,
    ) -> Result<SubscriptionLine>;

    fn update_line(
        &self,
        subscription: &mut Subscription,
        line_id: &str,
        update: SubscriptionLineUpdate,
    ) -> Result<()>;

    fn change_line_product(
        &self,
        subscription: &mut Subscription,
        line_id: &str,
        product_id: Option<&str>,
    ) -> Result<UomDomain>;

    fn change_line_quantity(
        &self,
        subscription: &mut Subscription,
        line_id: &str,
        quantity: Decimal,
    ) -> Result<UomDomain>;

    fn change_line_uom(
        &self,
        subscription: &mut Subscription,
        line_id: &str,
        uom_id: Option<&str>,
    ) -> Result<UomDomain>;

    fn set_template(
        &self,
        subscription: &mut Subscription,
        template: Option<Arc<SubscriptionTemplate>>,
    ) -> Result<()>;

    fn set_pricelist(&self, subscription: &mut Subscription, pricelist: Pricelist) -> Result<()>;

    fn set_stage(&self, subscription: &mut Subscription, stage: &Stage) -> Result<()>;

    /// Recomputes every dirty derived field.
    fn recompute(&self, subscription: &mut Subscription) -> Result<()>;

    /// Current totals, recomputing first when the subscription is dirty.
    fn totals(&self, subscription: &mut Subscription) -> Result<SubscriptionTotals>;

    /// Current monthly recurring revenue, recomputing first when dirty.
    fn recurring_monthly(&self, subscription: &mut Subscription) -> Result<Decimal>;
}
