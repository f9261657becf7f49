use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::actor::{Actor, ActorId};
use crate::error::{CoreError, CoreResult};
use crate::player::Player;
use crate::value::Value;

/// Global game state visible to scripts and conditions.
///
/// Global and journal names are case-insensitive; they are stored lower-cased.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    #[serde(default)]
    globals: BTreeMap<String, Value>,
    #[serde(default)]
    journal: BTreeMap<String, i64>,
}

impl GameState {
    /// Create an empty game state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare or overwrite a global variable.
    pub fn set_global(&mut self, name: &str, value: Value) {
        self.globals.insert(name.to_lowercase(), value);
    }

    /// Read a global variable.
    pub fn global(&self, name: &str) -> Option<Value> {
        self.globals.get(&name.to_lowercase()).copied()
    }

    /// Whether a global with this name exists.
    pub fn has_global(&self, name: &str) -> bool {
        self.globals.contains_key(&name.to_lowercase())
    }

    /// All globals, by lower-cased name.
    pub fn globals(&self) -> &BTreeMap<String, Value> {
        &self.globals
    }

    /// Current journal index of a quest (0 if never set).
    pub fn journal_index(&self, id: &str) -> i64 {
        self.journal.get(&id.to_lowercase()).copied().unwrap_or(0)
    }

    /// Set the journal index of a quest.
    pub fn set_journal_index(&mut self, id: &str, index: i64) {
        self.journal.insert(id.to_lowercase(), index);
    }
}

/// Owns every actor plus the player and global state.
#[derive(Debug, Clone, Default)]
pub struct World {
    /// Global variables and journal.
    pub game: GameState,
    /// The player record.
    pub player: Player,
    actors: HashMap<ActorId, Actor>,
    by_name_lower: HashMap<String, ActorId>,
}

impl World {
    /// Create an empty world for `player`.
    pub fn new(player: Player) -> Self {
        Self {
            game: GameState::new(),
            player,
            actors: HashMap::new(),
            by_name_lower: HashMap::new(),
        }
    }

    /// Add an actor. Returns its ID.
    pub fn add_actor(&mut self, actor: Actor) -> CoreResult<ActorId> {
        let name_lower = actor.name.to_lowercase();
        if self.by_name_lower.contains_key(&name_lower) {
            return Err(CoreError::DuplicateActor(actor.name.clone()));
        }
        let id = actor.id;
        self.by_name_lower.insert(name_lower, id);
        self.actors.insert(id, actor);
        Ok(id)
    }

    /// Get an actor by ID.
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    /// Get a mutable reference to an actor by ID.
    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    /// Find an actor by name (case-insensitive).
    pub fn find_actor(&self, name: &str) -> Option<&Actor> {
        self.find_actor_id(name).and_then(|id| self.actors.get(&id))
    }

    /// Find an actor ID by name (case-insensitive).
    pub fn find_actor_id(&self, name: &str) -> Option<ActorId> {
        self.by_name_lower.get(&name.to_lowercase()).copied()
    }

    /// All actors, sorted by name.
    pub fn actors(&self) -> Vec<&Actor> {
        let mut actors: Vec<_> = self.actors.values().collect();
        actors.sort_by_key(|a| a.name.to_lowercase());
        actors
    }

    /// Number of actors.
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorKind;

    #[test]
    fn add_and_find_actor() {
        let mut world = World::new(Player::default());
        let id = world.add_actor(Actor::new("Caius Cosades", ActorKind::Npc)).unwrap();

        assert_eq!(world.find_actor_id("caius cosades"), Some(id));
        assert_eq!(world.actor(id).unwrap().name, "Caius Cosades");
        assert_eq!(world.actor_count(), 1);
    }

    #[test]
    fn duplicate_actor_names_rejected() {
        let mut world = World::new(Player::default());
        world.add_actor(Actor::new("Fargoth", ActorKind::Npc)).unwrap();
        let err = world.add_actor(Actor::new("FARGOTH", ActorKind::Npc)).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateActor(_)));
    }

    #[test]
    fn globals_and_journal_ignore_case() {
        let mut game = GameState::new();
        game.set_global("NPCVoiceDistance", Value::Integer(750));
        assert_eq!(game.global("npcvoicedistance"), Some(Value::Integer(750)));
        assert!(game.has_global("NPCVOICEDISTANCE"));

        assert_eq!(game.journal_index("A1_1_FindSpymaster"), 0);
        game.set_journal_index("A1_1_FindSpymaster", 10);
        assert_eq!(game.journal_index("a1_1_findspymaster"), 10);
    }

    #[test]
    fn actors_sorted_by_name() {
        let mut world = World::new(Player::default());
        world.add_actor(Actor::new("zebra", ActorKind::Creature)).unwrap();
        world.add_actor(Actor::new("Arrille", ActorKind::Npc)).unwrap();
        let names: Vec<_> = world.actors().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Arrille", "zebra"]);
    }
}
