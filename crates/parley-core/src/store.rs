use std::collections::HashMap;

use crate::dialogue::{DialogueGroup, DialogueKind};
use crate::error::{CoreError, CoreResult};
use crate::topic::TopicId;

/// Read-only collection of dialogue groups.
///
/// Groups keep their load order; every iteration, including
/// [`DialogueStore::of_kind`], yields them in that order. Lookups by id are
/// case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct DialogueStore {
    groups: Vec<DialogueGroup>,
    by_key: HashMap<TopicId, usize>,
}

impl DialogueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from groups in load order.
    pub fn from_groups(groups: impl IntoIterator<Item = DialogueGroup>) -> CoreResult<Self> {
        let mut store = Self::new();
        for group in groups {
            store.insert(group)?;
        }
        Ok(store)
    }

    /// Append a group. Fails if a group with the same id already exists.
    pub fn insert(&mut self, group: DialogueGroup) -> CoreResult<()> {
        let key = group.key();
        if self.by_key.contains_key(&key) {
            return Err(CoreError::DuplicateDialogue(group.id));
        }
        self.by_key.insert(key, self.groups.len());
        self.groups.push(group);
        Ok(())
    }

    /// Find a group by id (case-insensitive).
    pub fn get(&self, id: &str) -> Option<&DialogueGroup> {
        self.get_key(&TopicId::new(id))
    }

    /// Find a group by its normalized key.
    pub fn get_key(&self, key: &TopicId) -> Option<&DialogueGroup> {
        self.by_key.get(key).map(|&idx| &self.groups[idx])
    }

    /// All groups in load order.
    pub fn iter(&self) -> impl Iterator<Item = &DialogueGroup> {
        self.groups.iter()
    }

    /// Groups of one kind, in load order.
    pub fn of_kind(&self, kind: DialogueKind) -> impl Iterator<Item = &DialogueGroup> {
        self.groups.iter().filter(move |g| g.kind == kind)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the store holds no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
