//! Response matching.
//!
//! The session never inspects conditions itself: it hands a group and a
//! context snapshot to a [`ResponseMatcher`] and takes whatever comes back.

use parley_core::{Actor, Condition, DialogueGroup, GameState, ResponseInfo, Value};

/// Snapshot of everything a matcher may consult for one resolution attempt.
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    /// The actor being talked to.
    pub actor: &'a Actor,
    /// Globals and journal.
    pub game: &'a GameState,
    /// Pending forced-choice code, if an answer is being resolved.
    pub choice: Option<i32>,
    /// Whether the actor had talked to the player before this conversation.
    pub talked_to: bool,
    /// The actor's displayed disposition (0-100).
    pub disposition: i32,
}

/// Picks the single applicable response of a dialogue group.
///
/// Implementations must be deterministic for a fixed context and return
/// `None` when no response applies.
pub trait ResponseMatcher {
    /// Select the best response in `group` under `ctx`.
    fn search<'a>(&self, group: &'a DialogueGroup, ctx: &FilterContext<'_>) -> Option<&'a ResponseInfo>;
}

/// Reference matcher: the first response, in group order, whose conditions
/// all hold.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionFilter;

impl ConditionFilter {
    /// Create the filter.
    pub fn new() -> Self {
        Self
    }

    /// Evaluate a single condition.
    pub fn evaluate(condition: &Condition, ctx: &FilterContext<'_>) -> bool {
        match condition {
            Condition::Choice { code } => ctx.choice == Some(*code),
            Condition::TalkedTo { value } => ctx.talked_to == *value,
            Condition::Actor { name } => ctx.actor.name.to_lowercase() == name.to_lowercase(),
            Condition::Disposition { cmp, value } => cmp.test(ctx.disposition, *value),
            Condition::Local { name, cmp, value } => ctx
                .actor
                .locals
                .as_ref()
                .and_then(|locals| locals.get_by_name(name))
                .is_some_and(|v| cmp.test(v.as_f64(), value.as_f64())),
            Condition::Global { name, cmp, value } => ctx
                .game
                .global(name)
                .is_some_and(|v: Value| cmp.test(v.as_f64(), value.as_f64())),
            Condition::Journal { id, cmp, index } => cmp.test(ctx.game.journal_index(id), *index),
            Condition::Not { condition } => !Self::evaluate(condition, ctx),
            Condition::And { all } => all.iter().all(|c| Self::evaluate(c, ctx)),
            Condition::Or { any } => any.iter().any(|c| Self::evaluate(c, ctx)),
            Condition::Always => true,
        }
    }
}

impl ResponseMatcher for ConditionFilter {
    fn search<'a>(&self, group: &'a DialogueGroup, ctx: &FilterContext<'_>) -> Option<&'a ResponseInfo> {
        group
            .infos
            .iter()
            .find(|info| info.conditions.iter().all(|c| Self::evaluate(c, ctx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::{ActorKind, Comparison, DialogueKind, Locals, VarKind};

    fn ctx<'a>(actor: &'a Actor, game: &'a GameState) -> FilterContext<'a> {
        FilterContext {
            actor,
            game,
            choice: None,
            talked_to: false,
            disposition: 50,
        }
    }

    #[test]
    fn first_matching_info_wins() {
        let actor = Actor::new("Fargoth", ActorKind::Npc);
        let game = GameState::new();
        let group = DialogueGroup::new("Greeting 5", DialogueKind::Greeting)
            .with_info(ResponseInfo::new("a", "Welcome back.").with_condition(Condition::TalkedTo { value: true }))
            .with_info(ResponseInfo::new("b", "Who are you?"))
            .with_info(ResponseInfo::new("c", "Unreachable."));

        let info = ConditionFilter.search(&group, &ctx(&actor, &game)).unwrap();
        assert_eq!(info.id, "b");
    }

    #[test]
    fn no_match_is_none() {
        let actor = Actor::new("Fargoth", ActorKind::Npc);
        let game = GameState::new();
        let group = DialogueGroup::new("Secret", DialogueKind::Topic)
            .with_info(ResponseInfo::new("a", "...").with_condition(Condition::Actor { name: "Vivec".into() }));
        assert!(ConditionFilter.search(&group, &ctx(&actor, &game)).is_none());
        assert!(ConditionFilter.search(&DialogueGroup::new("Empty", DialogueKind::Topic), &ctx(&actor, &game)).is_none());
    }

    #[test]
    fn choice_condition_needs_pending_code() {
        let actor = Actor::new("Fargoth", ActorKind::Npc);
        let game = GameState::new();
        let cond = Condition::Choice { code: 2 };
        let mut c = ctx(&actor, &game);
        assert!(!ConditionFilter::evaluate(&cond, &c));
        c.choice = Some(2);
        assert!(ConditionFilter::evaluate(&cond, &c));
        c.choice = Some(1);
        assert!(!ConditionFilter::evaluate(&cond, &c));
    }

    #[test]
    fn numeric_conditions() {
        let mut locals = Locals::new().with("paid", VarKind::Short);
        locals.set_by_name("paid", Value::Integer(1));
        let actor = Actor::new("Hlevala", ActorKind::Npc).with_locals(locals);
        let mut game = GameState::new();
        game.set_global("PCRace", Value::Integer(3));
        game.set_journal_index("MG_Join", 10);
        let c = ctx(&actor, &game);

        let holds = |cond: Condition| ConditionFilter::evaluate(&cond, &c);
        assert!(holds(Condition::Local {
            name: "Paid".into(),
            cmp: Comparison::Eq,
            value: Value::Float(1.0),
        }));
        assert!(!holds(Condition::Local {
            name: "missing".into(),
            cmp: Comparison::Ne,
            value: Value::Integer(0),
        }));
        assert!(holds(Condition::Global {
            name: "pcrace".into(),
            cmp: Comparison::Ge,
            value: Value::Integer(3),
        }));
        assert!(holds(Condition::Journal {
            id: "mg_join".into(),
            cmp: Comparison::Lt,
            index: 20,
        }));
        assert!(holds(Condition::Disposition {
            cmp: Comparison::Gt,
            value: 40,
        }));
    }

    #[test]
    fn logical_combinators() {
        let actor = Actor::new("Fargoth", ActorKind::Npc);
        let game = GameState::new();
        let c = ctx(&actor, &game);
        let yes = Condition::Always;
        let no = Condition::Not {
            condition: Box::new(Condition::Always),
        };

        assert!(!ConditionFilter::evaluate(&no, &c));
        assert!(ConditionFilter::evaluate(
            &Condition::Or {
                any: vec![no.clone(), yes.clone()]
            },
            &c
        ));
        assert!(!ConditionFilter::evaluate(&Condition::And { all: vec![yes, no] }, &c));
        assert!(ConditionFilter::evaluate(&Condition::And { all: vec![] }, &c));
    }
}
