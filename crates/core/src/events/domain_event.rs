//! Domain event types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Domain events emitted by core services after successful mutations.
///
/// Host adapters translate them into chatter messages, notifications or
/// reporting refreshes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A subscription was created and numbered.
    SubscriptionCreated { subscription_id: String, code: String },

    /// Tracked fields of a record changed value.
    FieldsTracked {
        /// Record kind, e.g. `basic.subscription`
        model: String,
        record_id: String,
        changes: Vec<TrackedChange>,
    },

    /// Derived amounts of a subscription were recomputed.
    TotalsRecomputed {
        subscription_id: String,
        recurring_total: Decimal,
        recurring_amount_total: Decimal,
        recurring_monthly: Decimal,
    },
}

/// Old and new value of one tracked field, rendered as text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedChange {
    pub field: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

impl DomainEvent {
    /// Creates a SubscriptionCreated event.
    pub fn subscription_created(subscription_id: String, code: String) -> Self {
        Self::SubscriptionCreated {
            subscription_id,
            code,
        }
    }

    /// Creates a FieldsTracked event.
    pub fn fields_tracked(model: String, record_id: String, changes: Vec<TrackedChange>) -> Self {
        Self::FieldsTracked {
            model,
            record_id,
            changes,
        }
    }

    /// Creates a TotalsRecomputed event.
    pub fn totals_recomputed(
        subscription_id: String,
        recurring_total: Decimal,
        recurring_amount_total: Decimal,
        recurring_monthly: Decimal,
    ) -> Self {
        Self::TotalsRecomputed {
            subscription_id,
            recurring_total,
            recurring_amount_total,
            recurring_monthly,
        }
    }
}
