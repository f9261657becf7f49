//! The player record the conversation engine reads and writes.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Skills the dialogue engine can award practice for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    /// Persuasion and social influence.
    Speechcraft,
    /// Bartering.
    Mercantile,
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Skill::Speechcraft => write!(f, "speechcraft"),
            Skill::Mercantile => write!(f, "mercantile"),
        }
    }
}

/// The player's conversation-relevant stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Player character name.
    pub name: String,
    /// Speechcraft skill level (0-100).
    #[serde(default)]
    pub speechcraft: i32,
    /// Gold carried.
    #[serde(default)]
    pub gold: i64,
    /// Successful skill uses recorded since the record was created.
    #[serde(default)]
    pub skill_uses: BTreeMap<Skill, u32>,
}

impl Player {
    /// Create a player with the given name and speechcraft.
    pub fn new(name: impl Into<String>, speechcraft: i32) -> Self {
        Self {
            name: name.into(),
            speechcraft,
            gold: 0,
            skill_uses: BTreeMap::new(),
        }
    }

    /// Set the carried gold.
    pub fn with_gold(mut self, gold: i64) -> Self {
        self.gold = gold;
        self
    }

    /// Record a successful use of `skill`.
    pub fn practice(&mut self, skill: Skill) {
        *self.skill_uses.entry(skill).or_default() += 1;
    }

    /// How often `skill` has been practiced.
    pub fn uses(&self, skill: Skill) -> u32 {
        self.skill_uses.get(&skill).copied().unwrap_or(0)
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new("Player", 5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn practice_counts() {
        let mut player = Player::new("Nerevar", 30);
        assert_eq!(player.uses(Skill::Speechcraft), 0);
        player.practice(Skill::Speechcraft);
        player.practice(Skill::Speechcraft);
        assert_eq!(player.uses(Skill::Speechcraft), 2);
        assert_eq!(player.uses(Skill::Mercantile), 0);
    }

    #[test]
    fn skill_map_round_trip() {
        let mut player = Player::default().with_gold(100);
        player.practice(Skill::Mercantile);
        let json = serde_json::to_string(&player).unwrap();
        assert!(json.contains("\"mercantile\":1"));
        let back: Player = serde_json::from_str(&json).unwrap();
        assert_eq!(back, player);
    }
}
