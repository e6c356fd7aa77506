//! Settings module - configuration of the subscription core.

mod settings_model;

pub use settings_model::{SubscriptionSettings, SubscriptionSettingsUpdate};
