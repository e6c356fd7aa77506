use super::stages_model::Stage;

/// Ordered list of stages, sorted by `(sequence, id)`.
#[derive(Debug, Clone, Default)]
pub struct StageRegistry {
    stages: Vec<Stage>,
}

impl StageRegistry {
    pub fn new(stages: Vec<Stage>) -> Self {
        let mut registry = Self { stages };
        registry.sort();
        registry
    }

    fn sort(&mut self) {
        self.stages
            .sort_by(|a, b| a.sequence.cmp(&b.sequence).then_with(|| a.id.cmp(&b.id)));
    }

    /// Adds or replaces a stage, keeping the order.
    pub fn upsert(&mut self, stage: Stage) {
        self.stages.retain(|s| s.id != stage.id);
        self.stages.push(stage);
        self.sort();
    }

    pub fn remove(&mut self, stage_id: &str) -> Option<Stage> {
        let position = self.stages.iter().position(|s| s.id == stage_id)?;
        Some(self.stages.remove(position))
    }

    pub fn get(&self, stage_id: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.id == stage_id)
    }

    /// Stage assigned to new subscriptions: the first in order.
    pub fn default_stage(&self) -> Option<&Stage> {
        self.stages.first()
    }

    /// Every stage in order, so empty kanban columns are still shown.
    pub fn group_expand(&self) -> &[Stage] {
        &self.stages
    }

    /// Whether subscriptions in `stage_id` count as running.
    pub fn in_progress(&self, stage_id: Option<&str>) -> bool {
        stage_id
            .and_then(|id| self.get(id))
            .map(|s| s.in_progress)
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::NewStage;

    fn stage(id: &str, sequence: i32, in_progress: bool) -> Stage {
        NewStage {
            id: Some(id.to_string()),
            name: id.to_string(),
            sequence,
            in_progress,
            ..Default::default()
        }
        .into_stage()
        .unwrap()
    }

    #[test]
    fn test_orders_by_sequence_then_id() {
        let registry = StageRegistry::new(vec![
            stage("closed", 30, false),
            stage("b-running", 10, true),
            stage("a-draft", 10, true),
        ]);
        let ids: Vec<&str> = registry.group_expand().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a-draft", "b-running", "closed"]);
        assert_eq!(registry.default_stage().unwrap().id, "a-draft");
    }

    #[test]
    fn test_empty_registry_has_no_default() {
        let registry = StageRegistry::default();
        assert!(registry.is_empty());
        assert!(registry.default_stage().is_none());
    }

    #[test]
    fn test_upsert_and_remove_keep_order() {
        let mut registry = StageRegistry::new(vec![stage("draft", 1, true)]);
        registry.upsert(stage("first", 0, true));
        assert_eq!(registry.default_stage().unwrap().id, "first");

        registry.upsert(stage("first", 99, true));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.default_stage().unwrap().id, "draft");

        assert!(registry.remove("draft").is_some());
        assert!(registry.remove("draft").is_none());
    }

    #[test]
    fn test_in_progress_lookup() {
        let registry =
            StageRegistry::new(vec![stage("running", 1, true), stage("closed", 2, false)]);
        assert!(registry.in_progress(Some("running")));
        assert!(!registry.in_progress(Some("closed")));
        assert!(!registry.in_progress(Some("unknown")));
        assert!(!registry.in_progress(None));
    }

    #[test]
    fn test_new_stage_defaults() {
        let stage = NewStage {
            name: "Draft".to_string(),
            ..Default::default()
        }
        .into_stage()
        .unwrap();
        assert_eq!(stage.sequence, 1);
        assert!(stage.in_progress);
        assert!(!stage.fold);
        assert!(NewStage::default().into_stage().is_err());
    }
}
