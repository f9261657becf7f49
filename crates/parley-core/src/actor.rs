use std::fmt;
use std::ops::BitOr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value::Locals;

/// Unique identifier for every actor in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub Uuid);

impl ActorId {
    /// Generate a new random actor ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// What record type an actor is instantiated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    /// A humanoid non-player character.
    #[default]
    Npc,
    /// A creature.
    Creature,
}

/// Raw service flags from an actor's AI data.
///
/// Bit values follow the game data format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceFlags(u32);

impl ServiceFlags {
    /// Sells weapons.
    pub const WEAPON: Self = Self(0x00001);
    /// Sells armor.
    pub const ARMOR: Self = Self(0x00002);
    /// Sells clothing.
    pub const CLOTHING: Self = Self(0x00004);
    /// Sells books.
    pub const BOOKS: Self = Self(0x00008);
    /// Sells ingredients.
    pub const INGREDIENTS: Self = Self(0x00010);
    /// Sells lockpicks.
    pub const PICKS: Self = Self(0x00020);
    /// Sells probes.
    pub const PROBES: Self = Self(0x00040);
    /// Sells lights.
    pub const LIGHTS: Self = Self(0x00080);
    /// Sells alchemy apparatus.
    pub const APPARATUS: Self = Self(0x00100);
    /// Sells repair items.
    pub const REPAIR_ITEM: Self = Self(0x00200);
    /// Sells miscellaneous items.
    pub const MISC: Self = Self(0x00400);
    /// Sells spells.
    pub const SPELLS: Self = Self(0x00800);
    /// Sells magic items.
    pub const MAGIC_ITEMS: Self = Self(0x01000);
    /// Sells potions.
    pub const POTIONS: Self = Self(0x02000);
    /// Offers skill training.
    pub const TRAINING: Self = Self(0x04000);
    /// Offers spellmaking.
    pub const SPELLMAKING: Self = Self(0x08000);
    /// Offers enchanting.
    pub const ENCHANTING: Self = Self(0x10000);
    /// Repairs equipment.
    pub const REPAIR: Self = Self(0x20000);

    /// No flags set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Wrap raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// The raw bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether every flag in `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether any flag in `other` is set.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Whether no flag is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ServiceFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

fn default_true() -> bool {
    true
}

fn default_disposition() -> i32 {
    50
}

/// An actor the player can converse with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Runtime identifier.
    #[serde(default)]
    pub id: ActorId,
    /// Display name.
    pub name: String,
    /// Record type.
    #[serde(default)]
    pub kind: ActorKind,
    /// Whether the actor has AI data; actors without it offer no services.
    #[serde(default = "default_true")]
    pub has_ai: bool,
    /// Raw service flags.
    #[serde(default)]
    pub services: ServiceFlags,
    /// Travel destinations offered (NPCs only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transport: Vec<String>,
    /// Persisted base disposition toward the player.
    #[serde(default = "default_disposition")]
    pub base_disposition: i32,
    /// Whether the player has ever talked to this actor.
    #[serde(default)]
    pub talked_to_player: bool,
    /// Locals of the actor's attached script, if it has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locals: Option<Locals>,
}

impl Actor {
    /// Create an actor with default stats.
    pub fn new(name: impl Into<String>, kind: ActorKind) -> Self {
        Self {
            id: ActorId::new(),
            name: name.into(),
            kind,
            has_ai: true,
            services: ServiceFlags::empty(),
            transport: Vec::new(),
            base_disposition: default_disposition(),
            talked_to_player: false,
            locals: None,
        }
    }

    /// Set the raw service flags.
    pub fn with_services(mut self, services: ServiceFlags) -> Self {
        self.services = services;
        self
    }

    /// Add a travel destination.
    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.transport.push(destination.into());
        self
    }

    /// Set the base disposition.
    pub fn with_disposition(mut self, disposition: i32) -> Self {
        self.base_disposition = disposition;
        self
    }

    /// Attach a script's local variables.
    pub fn with_locals(mut self, locals: Locals) -> Self {
        self.locals = Some(locals);
        self
    }

    /// Service flags in effect: actors without AI data offer nothing.
    pub fn active_services(&self) -> ServiceFlags {
        if self.has_ai {
            self.services
        } else {
            ServiceFlags::empty()
        }
    }

    /// Whether the actor offers transport routes.
    pub fn has_transport(&self) -> bool {
        self.kind == ActorKind::Npc && !self.transport.is_empty()
    }

    /// Record that the player has talked to this actor. Returns the previous flag.
    pub fn mark_talked_to(&mut self) -> bool {
        std::mem::replace(&mut self.talked_to_player, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_flag_ops() {
        let flags = ServiceFlags::WEAPON | ServiceFlags::TRAINING;
        assert!(flags.contains(ServiceFlags::WEAPON));
        assert!(!flags.contains(ServiceFlags::WEAPON | ServiceFlags::ARMOR));
        assert!(flags.intersects(ServiceFlags::WEAPON | ServiceFlags::ARMOR));
        assert_eq!(flags.bits(), 0x4001);
        assert!(ServiceFlags::empty().is_empty());
    }

    #[test]
    fn no_ai_means_no_services() {
        let mut actor = Actor::new("Mudcrab", ActorKind::Creature).with_services(ServiceFlags::MISC);
        assert_eq!(actor.active_services(), ServiceFlags::MISC);
        actor.has_ai = false;
        assert!(actor.active_services().is_empty());
    }

    #[test]
    fn creatures_never_offer_transport() {
        let npc = Actor::new("Darvame Hleran", ActorKind::Npc).with_destination("Balmora");
        assert!(npc.has_transport());

        let mut creature = npc.clone();
        creature.kind = ActorKind::Creature;
        assert!(!creature.has_transport());
    }

    #[test]
    fn talked_to_is_one_way() {
        let mut actor = Actor::new("Fargoth", ActorKind::Npc);
        assert!(!actor.mark_talked_to());
        assert!(actor.mark_talked_to());
        assert!(actor.talked_to_player);
    }

    #[test]
    fn deserialize_with_defaults() {
        let actor: Actor = serde_json::from_str(r#"{"name": "Fargoth", "services": 2049}"#).unwrap();
        assert_eq!(actor.kind, ActorKind::Npc);
        assert!(actor.has_ai);
        assert_eq!(actor.base_disposition, 50);
        assert!(actor.services.contains(ServiceFlags::WEAPON | ServiceFlags::SPELLS));
    }
}
