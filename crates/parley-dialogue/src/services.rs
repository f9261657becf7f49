//! Aggregation of raw actor service flags into dialogue-window capabilities.

use std::fmt;

use parley_core::{Actor, ServiceFlags};
use serde::{Deserialize, Serialize};

/// Services offered in the dialogue window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceSet(u8);

impl ServiceSet {
    /// Barter.
    pub const TRADE: Self = Self(1 << 0);
    /// Travel to other towns.
    pub const TRAVEL: Self = Self(1 << 1);
    /// Buy spells.
    pub const BUY_SPELLS: Self = Self(1 << 2);
    /// Spellmaking.
    pub const CREATE_SPELLS: Self = Self(1 << 3);
    /// Skill training.
    pub const TRAINING: Self = Self(1 << 4);
    /// Enchanting.
    pub const ENCHANT: Self = Self(1 << 5);

    const NAMES: [(ServiceSet, &'static str); 6] = [
        (Self::TRADE, "trade"),
        (Self::TRAVEL, "travel"),
        (Self::BUY_SPELLS, "spells"),
        (Self::CREATE_SPELLS, "spellmaking"),
        (Self::TRAINING, "training"),
        (Self::ENCHANT, "enchanting"),
    ];

    /// No services.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Whether every service in `other` is offered.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether nothing is offered.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Add the services in `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Names of the offered services, in a fixed order.
    pub fn names(self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }

    /// Derive the window services for `actor`.
    pub fn for_actor(actor: &Actor) -> Self {
        aggregate(actor.active_services(), actor.has_transport())
    }
}

impl fmt::Display for ServiceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", self.names().join(", "))
        }
    }
}

/// Merchandise categories; any one of them means the actor trades.
const MERCHANDISE: [ServiceFlags; 11] = [
    ServiceFlags::WEAPON,
    ServiceFlags::ARMOR,
    ServiceFlags::CLOTHING,
    ServiceFlags::BOOKS,
    ServiceFlags::INGREDIENTS,
    ServiceFlags::PICKS,
    ServiceFlags::PROBES,
    ServiceFlags::LIGHTS,
    ServiceFlags::APPARATUS,
    ServiceFlags::REPAIR_ITEM,
    ServiceFlags::MISC,
];

/// Map raw service flags plus the transport predicate to window services.
pub fn aggregate(flags: ServiceFlags, has_transport: bool) -> ServiceSet {
    let mut services = ServiceSet::empty();

    if MERCHANDISE.iter().any(|m| flags.intersects(*m)) {
        services.insert(ServiceSet::TRADE);
    }
    if has_transport {
        services.insert(ServiceSet::TRAVEL);
    }
    if flags.contains(ServiceFlags::SPELLS) {
        services.insert(ServiceSet::BUY_SPELLS);
    }
    if flags.contains(ServiceFlags::SPELLMAKING) {
        services.insert(ServiceSet::CREATE_SPELLS);
    }
    if flags.contains(ServiceFlags::TRAINING) {
        services.insert(ServiceSet::TRAINING);
    }
    if flags.contains(ServiceFlags::ENCHANTING) {
        services.insert(ServiceSet::ENCHANT);
    }

    services
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::ActorKind;

    #[test]
    fn every_merchandise_flag_means_trade() {
        for flag in MERCHANDISE {
            assert_eq!(aggregate(flag, false), ServiceSet::TRADE, "flag {:#x}", flag.bits());
        }
    }

    #[test]
    fn non_merchandise_flags_do_not_trade() {
        let flags = ServiceFlags::MAGIC_ITEMS | ServiceFlags::POTIONS | ServiceFlags::REPAIR;
        assert!(aggregate(flags, false).is_empty());
    }

    #[test]
    fn capabilities_map_one_to_one() {
        let flags = ServiceFlags::SPELLS
            | ServiceFlags::SPELLMAKING
            | ServiceFlags::TRAINING
            | ServiceFlags::ENCHANTING;
        let services = aggregate(flags, true);
        assert_eq!(
            services.names(),
            vec!["travel", "spells", "spellmaking", "training", "enchanting"]
        );
        assert!(!services.contains(ServiceSet::TRADE));
    }

    #[test]
    fn actor_without_ai_offers_only_travel() {
        let mut actor = Actor::new("Darvame Hleran", ActorKind::Npc)
            .with_services(ServiceFlags::MISC | ServiceFlags::TRAINING)
            .with_destination("Balmora");
        actor.has_ai = false;
        assert_eq!(ServiceSet::for_actor(&actor), ServiceSet::TRAVEL);
    }

    #[test]
    fn display() {
        assert_eq!(ServiceSet::empty().to_string(), "none");
        assert_eq!(aggregate(ServiceFlags::WEAPON | ServiceFlags::TRAINING, false).to_string(), "trade, training");
    }
}
