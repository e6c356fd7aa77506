//! Subscriptions module - templates, recurrence, lines, totals and the service
//! keeping derived amounts up to date.

mod aggregator;
mod capabilities;
mod dependencies;
mod line_onchange;
mod recurrence;
mod subscription_model;
mod subscription_service;
mod subscription_traits;
mod template_model;


pub use aggregator::{aggregate, SubscriptionTotals};
pub use capabilities::{diff_tracked, Taggable, Trackable};
pub use dependencies::{DerivedField, DirtySet, FieldChange, RecomputePolicy};
pub use line_onchange::{
    on_product_changed, on_product_quantity_changed, on_uom_changed, LineParent, UomDomain,
};
pub use recurrence::{monthly_equivalent, monthly_equivalent_for, RecurrenceUnit};
pub use subscription_model::{
    NewSubscription, NewSubscriptionLine, Subscription, SubscriptionLine, SubscriptionLineUpdate,
};
pub use subscription_service::SubscriptionService;
pub use subscription_traits::{CodeGenerator, SubscriptionServiceTrait};
pub use template_model::{
    NewSubscriptionTemplate, PaymentMode, RecurrenceBoundary, SubscriptionTemplate,
};
