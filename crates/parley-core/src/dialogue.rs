use std::fmt;

use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::topic::TopicId;

/// The kind of a dialogue group.
///
/// Only `Topic` and `Greeting` drive conversation flow; the other kinds are
/// carried through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueKind {
    /// A keyword the player can ask about.
    Topic,
    /// A voiced bark (attack, idle, hello).
    Voice,
    /// An opening line chosen when a conversation starts.
    Greeting,
    /// A line spoken in reaction to persuasion.
    Persuasion,
    /// A journal entry.
    Journal,
}

impl fmt::Display for DialogueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Topic => write!(f, "topic"),
            Self::Voice => write!(f, "voice"),
            Self::Greeting => write!(f, "greeting"),
            Self::Persuasion => write!(f, "persuasion"),
            Self::Journal => write!(f, "journal"),
        }
    }
}

/// One conditioned line of dialogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseInfo {
    /// Record id of this info.
    pub id: String,
    /// The response text shown to the player.
    pub text: String,
    /// Effect script run after the text is shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    /// Sound cue played with the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    /// Conditions evaluated by the matcher.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl ResponseInfo {
    /// Create an unconditioned info with the given id and text.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            script: None,
            sound: None,
            conditions: Vec::new(),
        }
    }

    /// Attach an effect script.
    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.script = Some(script.into());
        self
    }

    /// Attach a sound cue.
    pub fn with_sound(mut self, sound: impl Into<String>) -> Self {
        self.sound = Some(sound.into());
        self
    }

    /// Add a condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// The effect script, if it contains anything besides whitespace.
    pub fn effect_script(&self) -> Option<&str> {
        self.script.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// A named bucket of alternative responses for one greeting or topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueGroup {
    /// The id as authored; also the text shown for topics.
    pub id: String,
    /// What kind of dialogue this is.
    pub kind: DialogueKind,
    /// Candidate responses, in priority order.
    #[serde(default)]
    pub infos: Vec<ResponseInfo>,
}

impl DialogueGroup {
    /// Create an empty group.
    pub fn new(id: impl Into<String>, kind: DialogueKind) -> Self {
        Self {
            id: id.into(),
            kind,
            infos: Vec::new(),
        }
    }

    /// Append a response info.
    pub fn with_info(mut self, info: ResponseInfo) -> Self {
        self.infos.push(info);
        self
    }

    /// The case-insensitive key of this group.
    pub fn key(&self) -> TopicId {
        TopicId::new(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_builder() {
        let group = DialogueGroup::new("Latest Rumors", DialogueKind::Topic).with_info(
            ResponseInfo::new("1", "Strange lights in the Ashlands.")
                .with_condition(Condition::Always)
                .with_script("addtopic \"ashlands\""),
        );

        assert_eq!(group.key().as_str(), "latest rumors");
        assert_eq!(group.infos.len(), 1);
        assert_eq!(group.infos[0].effect_script(), Some("addtopic \"ashlands\""));
    }

    #[test]
    fn blank_script_is_no_script() {
        let info = ResponseInfo::new("1", "Hello.").with_script("  \n ");
        assert_eq!(info.effect_script(), None);
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&DialogueKind::Greeting).unwrap();
        assert_eq!(json, "\"greeting\"");
    }
}
