//! Pipeline stage domain models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::DEFAULT_STAGE_SEQUENCE;
use crate::errors::{Result, ValidationError};

/// Kanban column a subscription sits in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub sequence: i32,
    pub in_progress: bool,
    /// Folded in the kanban view when empty
    pub fold: bool,
    pub rating_template_id: Option<String>,
}

/// Input model for creating a stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStage {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub sequence: i32,
    pub in_progress: bool,
    pub fold: bool,
}

impl Default for NewStage {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            description: None,
            sequence: DEFAULT_STAGE_SEQUENCE,
            in_progress: true,
            fold: false,
        }
    }
}

impl NewStage {
    pub fn into_stage(self) -> Result<Stage> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        Ok(Stage {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: self.name,
            description: self.description,
            sequence: self.sequence,
            in_progress: self.in_progress,
            fold: self.fold,
            rating_template_id: None,
        })
    }
}
