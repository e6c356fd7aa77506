//! Stages module - ordered pipeline stages.

mod stage_registry;
mod stages_model;

pub use stage_registry::StageRegistry;
pub use stages_model::{NewStage, Stage};
