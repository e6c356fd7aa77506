//! Explicit request context threaded through factories and services.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifies who is acting and for which company.
///
/// Every value that would otherwise be read from an ambient environment
/// (current company, current user, language, a forced default code) is
/// carried here and passed explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    pub company_id: String,
    pub user_id: String,
    pub lang: Option<String>,
    /// Reference code forced by the caller for the next created subscription
    pub default_code: Option<String>,
    /// Overrides the current date, mostly useful for deterministic tests
    pub today: Option<NaiveDate>,
}

impl RequestContext {
    pub fn new(company_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    pub fn with_default_code(mut self, code: impl Into<String>) -> Self {
        self.default_code = Some(code.into());
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Current date, honouring the override when present.
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }
}
