//! Optional capabilities composed onto records.

use super::subscription_model::Subscription;
use super::template_model::SubscriptionTemplate;
use crate::constants::SUBSCRIPTION_SEQUENCE_CODE;
use crate::events::TrackedChange;
use crate::tags::Tag;

/// Record whose field changes are reported as tracking events.
pub trait Trackable {
    /// Record kind reported with tracking events.
    fn model_name(&self) -> &'static str;

    fn record_id(&self) -> &str;

    /// Current values of the tracked fields, rendered as text.
    fn tracked_values(&self) -> Vec<(&'static str, Option<String>)>;
}

/// Field-by-field differences between two snapshots of `tracked_values`.
pub fn diff_tracked(
    before: &[(&'static str, Option<String>)],
    after: &[(&'static str, Option<String>)],
) -> Vec<TrackedChange> {
    after
        .iter()
        .filter_map(|(field, new_value)| {
            let old_value = before
                .iter()
                .find(|(name, _)| name == field)
                .and_then(|(_, value)| value.clone());
            (old_value.as_ref() != new_value.as_ref()).then(|| TrackedChange {
                field: field.to_string(),
                old_value,
                new_value: new_value.clone(),
            })
        })
        .collect()
}

/// Record carrying tag labels.
pub trait Taggable {
    fn tag_ids(&self) -> &[String];

    fn tag_ids_mut(&mut self) -> &mut Vec<String>;

    fn has_tag(&self, tag_id: &str) -> bool {
        self.tag_ids().iter().any(|id| id == tag_id)
    }

    /// Returns false when the tag was already present.
    fn add_tag(&mut self, tag: &Tag) -> bool {
        if self.has_tag(&tag.id) {
            return false;
        }
        self.tag_ids_mut().push(tag.id.clone());
        true
    }

    /// Returns false when the tag was not present.
    fn remove_tag(&mut self, tag_id: &str) -> bool {
        let ids = self.tag_ids_mut();
        let before = ids.len();
        ids.retain(|id| id != tag_id);
        ids.len() != before
    }
}

impl Trackable for Subscription {
    fn model_name(&self) -> &'static str {
        SUBSCRIPTION_SEQUENCE_CODE
    }

    fn record_id(&self) -> &str {
        &self.id
    }

    fn tracked_values(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("name", Some(self.name.clone())),
            ("code", Some(self.code.clone())),
            ("stage_id", self.stage_id.clone()),
            ("date_end", self.date_end.map(|d| d.to_string())),
            ("recurring_total", Some(self.recurring_total.to_string())),
            ("template_id", self.template_id().map(str::to_string)),
            ("user_id", self.user_id.clone()),
        ]
    }
}

impl Taggable for Subscription {
    fn tag_ids(&self) -> &[String] {
        &self.tag_ids
    }

    fn tag_ids_mut(&mut self) -> &mut Vec<String> {
        &mut self.tag_ids
    }
}

impl Trackable for SubscriptionTemplate {
    fn model_name(&self) -> &'static str {
        "basic.subscription.template"
    }

    fn record_id(&self) -> &str {
        &self.id
    }

    fn tracked_values(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("recurrence_unit", Some(self.recurrence_unit.to_string())),
            (
                "recurrence_interval",
                Some(self.recurrence_interval.to_string()),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_reports_changed_fields_only() {
        let before = vec![
            ("name", Some("New".to_string())),
            ("stage_id", None),
            ("user_id", Some("u1".to_string())),
        ];
        let after = vec![
            ("name", Some("SUB001".to_string())),
            ("stage_id", Some("running".to_string())),
            ("user_id", Some("u1".to_string())),
        ];

        let changes = diff_tracked(&before, &after);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].field, "name");
        assert_eq!(changes[0].old_value.as_deref(), Some("New"));
        assert_eq!(changes[1].field, "stage_id");
        assert_eq!(changes[1].old_value, None);
    }

    #[test]
    fn test_diff_of_identical_snapshots_is_empty() {
        let values = vec![("name", Some("A".to_string()))];
        assert!(diff_tracked(&values, &values).is_empty());
    }
}
