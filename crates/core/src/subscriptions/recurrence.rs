//! Recurrence units and normalization of a recurring total to a monthly figure.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::template_model::SubscriptionTemplate;
use crate::constants::{DAYS_PER_MONTH, DAYS_PER_WEEK, MONTHS_PER_YEAR};
use crate::errors::{RecurrenceError, Result};
use crate::utils::decimal_utils::{checked_div, checked_mul};

/// Period unit a subscription repeats on.
///
/// Deserialization goes through [`FromStr`], so unknown names fail with
/// [`RecurrenceError::UnknownRecurrenceUnit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum RecurrenceUnit {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl RecurrenceUnit {
    pub const ALL: [RecurrenceUnit; 4] = [
        RecurrenceUnit::Daily,
        RecurrenceUnit::Weekly,
        RecurrenceUnit::Monthly,
        RecurrenceUnit::Yearly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceUnit::Daily => "daily",
            RecurrenceUnit::Weekly => "weekly",
            RecurrenceUnit::Monthly => "monthly",
            RecurrenceUnit::Yearly => "yearly",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecurrenceUnit::Daily => "Day(s)",
            RecurrenceUnit::Weekly => "Week(s)",
            RecurrenceUnit::Monthly => "Month(s)",
            RecurrenceUnit::Yearly => "Year(s)",
        }
    }

    /// How many periods of this unit fit in one month.
    pub fn monthly_factor(&self) -> Decimal {
        match self {
            RecurrenceUnit::Daily => Decimal::from(DAYS_PER_MONTH),
            RecurrenceUnit::Weekly => {
                Decimal::from(DAYS_PER_MONTH) / Decimal::from(DAYS_PER_WEEK)
            }
            RecurrenceUnit::Monthly => Decimal::ONE,
            RecurrenceUnit::Yearly => Decimal::ONE / Decimal::from(MONTHS_PER_YEAR),
        }
    }
}

impl fmt::Display for RecurrenceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurrenceUnit {
    type Err = RecurrenceError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        RecurrenceUnit::ALL
            .into_iter()
            .find(|unit| unit.as_str() == s)
            .ok_or_else(|| RecurrenceError::UnknownRecurrenceUnit(s.to_string()))
    }
}

impl TryFrom<String> for RecurrenceUnit {
    type Error = RecurrenceError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

/// `total * factor(unit) / interval`.
pub fn monthly_equivalent_for(
    total: Decimal,
    unit: RecurrenceUnit,
    interval: i32,
) -> Result<Decimal> {
    if interval <= 0 {
        return Err(RecurrenceError::InvalidInterval(interval).into());
    }
    let scaled = checked_mul(total, unit.monthly_factor(), "monthly equivalent")?;
    checked_div(scaled, Decimal::from(interval), "monthly equivalent")
}

/// Monthly recurring revenue of `total` billed on `template`'s cadence.
///
/// Without a template the result is zero.
pub fn monthly_equivalent(
    total: Decimal,
    template: Option<&SubscriptionTemplate>,
) -> Result<Decimal> {
    match template {
        Some(template) => {
            monthly_equivalent_for(total, template.recurrence_unit, template.recurrence_interval)
        }
        None => Ok(Decimal::ZERO),
    }
}
