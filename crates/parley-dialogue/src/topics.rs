//! What the player knows and what the current actor will talk about.

use std::collections::BTreeMap;

use parley_core::{DialogueKind, DialogueStore, TopicId};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::filter::{FilterContext, ResponseMatcher};

/// Topics the player has discovered, persisting across conversations.
///
/// Serializable so a host can keep it in its save data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnownTopics(BTreeMap<TopicId, bool>);

impl KnownTopics {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a topic known. Returns true if it was not known before.
    pub fn insert(&mut self, topic: TopicId) -> bool {
        self.0.insert(topic, true) != Some(true)
    }

    /// Whether the player knows `topic`.
    pub fn contains(&self, topic: &TopicId) -> bool {
        self.0.get(topic).copied().unwrap_or(false)
    }

    /// Known topics in lower-cased order.
    pub fn iter(&self) -> impl Iterator<Item = &TopicId> {
        self.0.iter().filter(|(_, known)| **known).map(|(t, _)| t)
    }

    /// Number of known topics.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether no topic is known.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<TopicId> for KnownTopics {
    fn from_iter<I: IntoIterator<Item = TopicId>>(iter: I) -> Self {
        Self(iter.into_iter().map(|t| (t, true)).collect())
    }
}

/// Global known topics plus the current actor's discoverable topics.
#[derive(Debug, Clone, Default)]
pub struct TopicKnowledgeStore {
    known: KnownTopics,
    actor_topics: Vec<TopicId>,
}

impl TopicKnowledgeStore {
    /// A store where the player knows nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with previously saved knowledge.
    pub fn with_known(known: KnownTopics) -> Self {
        Self {
            known,
            actor_topics: Vec::new(),
        }
    }

    /// The player's known topics.
    pub fn known(&self) -> &KnownTopics {
        &self.known
    }

    /// Replace the player's known topics, e.g. after loading a save.
    pub fn restore(&mut self, known: KnownTopics) {
        self.known = known;
    }

    /// Whether the player knows `topic` (any casing).
    pub fn is_known(&self, topic: &str) -> bool {
        self.known.contains(&TopicId::new(topic))
    }

    /// Mark a topic known to the player. Idempotent.
    pub fn register_topic(&mut self, topic: &str) -> bool {
        self.known.insert(TopicId::new(topic))
    }

    /// Topics the current actor will discuss, in store order.
    pub fn actor_topics(&self) -> &[TopicId] {
        &self.actor_topics
    }

    /// Forget the current actor's topics.
    pub fn clear_actor_topics(&mut self) {
        self.actor_topics.clear();
    }

    /// Teach the player every actor topic mentioned in `text`.
    ///
    /// Returns how many topics became newly known.
    pub fn parse_text(&mut self, text: &str) -> usize {
        let lower = text.to_lowercase();
        let mut learned = 0;
        for topic in &self.actor_topics {
            if !topic.as_str().is_empty() && lower.contains(topic.as_str()) && self.known.insert(topic.clone()) {
                learned += 1;
            }
        }
        learned
    }

    /// Rebuild the actor's topic list from scratch.
    ///
    /// Every topic group that currently resolves under `ctx` joins the actor
    /// list in store order. Returns the display keywords: resolving groups
    /// the player also knows, by display id, sorted ignoring case.
    pub fn refresh(
        &mut self,
        store: &DialogueStore,
        matcher: &dyn ResponseMatcher,
        ctx: &FilterContext<'_>,
    ) -> Vec<String> {
        self.actor_topics.clear();
        let mut keywords = Vec::new();

        for group in store.of_kind(DialogueKind::Topic) {
            let resolves = matcher.search(group, ctx).is_some();
            trace!(topic = %group.id, resolves, "topic filter");
            if !resolves {
                continue;
            }
            let key = group.key();
            if self.known.contains(&key) {
                keywords.push(group.id.clone());
            }
            self.actor_topics.push(key);
        }

        keywords.sort_by_key(|k| k.to_lowercase());
        keywords
    }
}
