use std::fmt;

use serde::{Deserialize, Serialize};

/// Case-insensitive identifier of a dialogue group or topic.
///
/// The canonical form is lower-case; every constructor normalizes, so two
/// ids that differ only in letter casing compare and hash as equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TopicId(String);

impl TopicId {
    /// Create a topic id, normalizing to lower-case.
    pub fn new(id: &str) -> Self {
        Self(id.to_lowercase())
    }

    /// The lower-cased id.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this id occurs anywhere in `text`, ignoring case.
    pub fn occurs_in(&self, text: &str) -> bool {
        !self.0.is_empty() && text.to_lowercase().contains(&self.0)
    }
}

impl From<&str> for TopicId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TopicId {
    fn from(id: String) -> Self {
        Self::new(&id)
    }
}

impl From<TopicId> for String {
    fn from(id: TopicId) -> Self {
        id.0
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn normalizes_case() {
        assert_eq!(TopicId::new("Mages Guild").as_str(), "mages guild");
        assert_eq!(TopicId::from("RUMORS"), TopicId::from("rumors"));
    }

    #[test]
    fn occurs_in_ignores_case() {
        let id = TopicId::new("mages guild");
        assert!(id.occurs_in("Try visiting the Mages Guild"));
        assert!(!id.occurs_in("Try visiting the Fighters Guild"));
    }

    #[test]
    fn empty_id_never_occurs() {
        assert!(!TopicId::new("").occurs_in("anything"));
    }

    #[test]
    fn serde_lowercases_on_read() {
        let id: TopicId = serde_json::from_str("\"Latest Rumors\"").unwrap();
        assert_eq!(id.as_str(), "latest rumors");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"latest rumors\"");
    }

    proptest! {
        #[test]
        fn casing_never_matters(id in "[a-zA-Z ]{1,24}") {
            let upper = TopicId::new(&id.to_uppercase());
            let lower = TopicId::new(&id.to_lowercase());
            prop_assert_eq!(&upper, &lower);
            prop_assert_eq!(TopicId::new(&id), lower);
        }
    }
}
