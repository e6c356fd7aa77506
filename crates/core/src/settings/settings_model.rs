//! Configuration of the subscription core.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SUBSCRIPTION_NAME, SUBSCRIPTION_SEQUENCE_CODE};
use crate::errors::{Error, Result};
use crate::pricing::DiscountPolicy;
use crate::subscriptions::RecomputePolicy;

/// Settings consumed by [`SubscriptionService`](crate::subscriptions::SubscriptionService).
///
/// Missing keys fall back to their defaults when parsed from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubscriptionSettings {
    /// Sequence asked for new reference codes
    pub sequence_code: String,
    /// Placeholder name replaced by the allocated code
    pub default_name: String,
    pub recompute_policy: RecomputePolicy,
    pub discount_policy: DiscountPolicy,
    /// Emit tracking events for changed tracked fields
    pub track_changes: bool,
}

impl Default for SubscriptionSettings {
    fn default() -> Self {
        Self {
            sequence_code: SUBSCRIPTION_SEQUENCE_CODE.to_string(),
            default_name: DEFAULT_SUBSCRIPTION_NAME.to_string(),
            recompute_policy: RecomputePolicy::Eager,
            discount_policy: DiscountPolicy::Permissive,
            track_changes: true,
        }
    }
}

impl SubscriptionSettings {
    /// Parses and validates settings from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: SubscriptionSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sequence_code.trim().is_empty() {
            return Err(Error::InvalidConfigValue(
                "sequenceCode must not be empty".to_string(),
            ));
        }
        if self.default_name.trim().is_empty() {
            return Err(Error::InvalidConfigValue(
                "defaultName must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Applies the fields present in `update`.
    pub fn apply(&mut self, update: SubscriptionSettingsUpdate) -> Result<()> {
        let mut next = self.clone();
        if let Some(sequence_code) = update.sequence_code {
            next.sequence_code = sequence_code;
        }
        if let Some(default_name) = update.default_name {
            next.default_name = default_name;
        }
        if let Some(policy) = update.recompute_policy {
            next.recompute_policy = policy;
        }
        if let Some(policy) = update.discount_policy {
            next.discount_policy = policy;
        }
        if let Some(track_changes) = update.track_changes {
            next.track_changes = track_changes;
        }
        next.validate()?;
        *self = next;
        Ok(())
    }
}

/// Partial settings update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSettingsUpdate {
    pub sequence_code: Option<String>,
    pub default_name: Option<String>,
    pub recompute_policy: Option<RecomputePolicy>,
    pub discount_policy: Option<DiscountPolicy>,
    pub track_changes: Option<bool>,
}
