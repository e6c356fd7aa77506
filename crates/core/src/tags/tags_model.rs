use serde::{Deserialize, Serialize};

/// Coloured label attached to subscriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub color: i32,
}

/// Known tags, in creation order.
#[derive(Debug, Clone, Default)]
pub struct TagRegistry {
    tags: Vec<Tag>,
}

impl TagRegistry {
    pub fn new(tags: Vec<Tag>) -> Self {
        Self { tags }
    }

    pub fn get(&self, tag_id: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.id == tag_id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Adds or replaces a tag.
    pub fn upsert(&mut self, tag: Tag) {
        match self.tags.iter_mut().find(|t| t.id == tag.id) {
            Some(existing) => *existing = tag,
            None => self.tags.push(tag),
        }
    }

    /// Resolves ids to tags, skipping unknown ids.
    pub fn resolve<'a>(&'a self, tag_ids: &'a [String]) -> impl Iterator<Item = &'a Tag> + 'a {
        tag_ids.iter().filter_map(move |id| self.get(id))
    }

    pub fn all(&self) -> &[Tag] {
        &self.tags
    }
}
