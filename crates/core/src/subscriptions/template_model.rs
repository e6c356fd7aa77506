//! Subscription template domain models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::recurrence::RecurrenceUnit;
use crate::errors::{RecurrenceError, Result, ValidationError};

/// Whether a subscription runs until closed or for a fixed number of periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceBoundary {
    #[default]
    Unlimited,
    Limited,
}

/// How invoices are produced at each period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    Manual,
    #[default]
    DraftInvoice,
    ValidateSend,
    ValidateSendPayment,
    SuccessPayment,
}

impl PaymentMode {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMode::Manual => "Manual",
            PaymentMode::DraftInvoice => "Draft invoice",
            PaymentMode::ValidateSend => "Invoice",
            PaymentMode::ValidateSendPayment => "Invoice & try to charge",
            PaymentMode::SuccessPayment => "Invoice only on successful payment",
        }
    }
}

/// Reusable recurrence definition shared by many subscriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionTemplate {
    pub id: String,
    pub name: String,
    pub code: Option<String>,
    /// Terms and conditions
    pub description: Option<String>,
    pub active: bool,
    pub recurrence_unit: RecurrenceUnit,
    pub recurrence_interval: i32,
    pub recurrence_boundary: RecurrenceBoundary,
    /// Number of periods when the boundary is limited
    pub recurrence_count: i32,
    pub payment_mode: PaymentMode,
    pub color: i32,
}

impl SubscriptionTemplate {
    /// Checks the constraints a template must satisfy before it is saved.
    pub fn validate(&self) -> Result<()> {
        validate_template_fields(&self.name, self.recurrence_interval)
    }

    /// `"{code} - {name}"`, or the bare name when there is no code.
    pub fn display_name(&self) -> String {
        match self.code.as_deref().filter(|c| !c.is_empty()) {
            Some(code) => format!("{} - {}", code, self.name),
            None => self.name.clone(),
        }
    }
}

/// Input model for creating a new template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubscriptionTemplate {
    pub id: Option<String>,
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
    pub recurrence_unit: RecurrenceUnit,
    pub recurrence_interval: i32,
    pub recurrence_boundary: RecurrenceBoundary,
    pub recurrence_count: i32,
    pub payment_mode: PaymentMode,
    pub color: i32,
}

impl Default for NewSubscriptionTemplate {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            code: None,
            description: None,
            recurrence_unit: RecurrenceUnit::Monthly,
            recurrence_interval: 1,
            recurrence_boundary: RecurrenceBoundary::Unlimited,
            recurrence_count: 1,
            payment_mode: PaymentMode::DraftInvoice,
            color: 0,
        }
    }
}

impl NewSubscriptionTemplate {
    pub fn validate(&self) -> Result<()> {
        validate_template_fields(&self.name, self.recurrence_interval)
    }

    /// Validates the input and builds an active template.
    pub fn into_template(self) -> Result<SubscriptionTemplate> {
        self.validate()?;
        Ok(SubscriptionTemplate {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: self.name,
            code: self.code,
            description: self.description,
            active: true,
            recurrence_unit: self.recurrence_unit,
            recurrence_interval: self.recurrence_interval,
            recurrence_boundary: self.recurrence_boundary,
            recurrence_count: self.recurrence_count,
            payment_mode: self.payment_mode,
            color: self.color,
        })
    }
}

fn validate_template_fields(name: &str, recurrence_interval: i32) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingField("name".to_string()).into());
    }
    if recurrence_interval <= 0 {
        return Err(RecurrenceError::InvalidInterval(recurrence_interval).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    #[test]
    fn test_defaults() {
        let template = NewSubscriptionTemplate {
            name: "Monthly plan".to_string(),
            ..Default::default()
        }
        .into_template()
        .unwrap();

        assert!(template.active);
        assert_eq!(template.recurrence_unit, RecurrenceUnit::Monthly);
        assert_eq!(template.recurrence_interval, 1);
        assert_eq!(template.recurrence_boundary, RecurrenceBoundary::Unlimited);
        assert_eq!(template.recurrence_count, 1);
        assert_eq!(template.payment_mode, PaymentMode::DraftInvoice);
        assert!(!template.id.is_empty());
    }

    #[test]
    fn test_rejects_non_positive_interval() {
        for interval in [0, -3] {
            let result = NewSubscriptionTemplate {
                name: "Broken".to_string(),
                recurrence_interval: interval,
                ..Default::default()
            }
            .into_template();
            assert!(matches!(
                result,
                Err(Error::Recurrence(RecurrenceError::InvalidInterval(_)))
            ));
        }
    }

    #[test]
    fn test_validate_catches_edited_interval() {
        let mut template = NewSubscriptionTemplate {
            name: "Plan".to_string(),
            ..Default::default()
        }
        .into_template()
        .unwrap();
        assert!(template.validate().is_ok());

        template.recurrence_interval = 0;
        assert!(template.validate().is_err());
    }

    #[test]
    fn test_rejects_blank_name() {
        let result = NewSubscriptionTemplate::default().into_template();
        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::MissingField(_)))
        ));
    }

    #[test]
    fn test_display_name() {
        let mut template = NewSubscriptionTemplate {
            name: "Gold".to_string(),
            ..Default::default()
        }
        .into_template()
        .unwrap();
        assert_eq!(template.display_name(), "Gold");

        template.code = Some("GLD".to_string());
        assert_eq!(template.display_name(), "GLD - Gold");
    }

    #[test]
    fn test_payment_mode_serialization() {
        assert_eq!(
            serde_json::to_string(&PaymentMode::ValidateSendPayment).unwrap(),
            "\"validate_send_payment\""
        );
        assert_eq!(PaymentMode::SuccessPayment.label(), "Invoice only on successful payment");
    }
}
