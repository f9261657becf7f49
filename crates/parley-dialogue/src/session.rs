//! The conversation state machine.
//!
//! `DialogueManager` drives one conversation at a time:
//!
//! ```text
//! Idle --start_dialogue--> Browsing <--question_answered-- AwaitingChoice
//!                            |   \--------ask_question------------^
//!                            \--goodbye_selected--> Ended --start_dialogue--> Browsing
//! ```
//!
//! Every operation that resolves a response ends with a full topic refresh,
//! so the keyword and service lists shown by the view are never stale.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use parley_core::{ActorId, ActorKind, DialogueKind, DialogueStore, ResponseInfo, TopicId, World};
use tracing::{debug, warn};

use crate::config::DialogueConfig;
use crate::error::{DialogueError, DialogueResult};
use crate::filter::{ConditionFilter, FilterContext, ResponseMatcher};
use crate::persuasion::{
    DispositionState, PersuasionEngine, PersuasionKind, PersuasionOutcome, ReputationModel, RolledReputation,
};
use crate::script::{ScriptBridge, ScriptCommand};
use crate::services::ServiceSet;
use crate::topics::{KnownTopics, TopicKnowledgeStore};
use crate::view::DialogueView;

/// Where the manager is in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No conversation has started yet.
    Idle,
    /// Talking; keywords can be selected.
    Browsing,
    /// A forced question is open; only its answers are accepted.
    AwaitingChoice,
    /// The last conversation ended with goodbye.
    Ended,
}

/// The most recently resolved response, kept for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct LastResponse {
    /// Group the response came from.
    pub topic: TopicId,
    /// The response itself.
    pub info: ResponseInfo,
    /// When it was resolved.
    pub resolved_at: DateTime<Utc>,
}

/// An open forced question: the group to re-resolve and the offered answers.
#[derive(Debug, Clone, Default)]
struct PendingChoice {
    topic: Option<TopicId>,
    answers: BTreeMap<String, i32>,
}

#[derive(Debug, Clone)]
struct Conversation {
    actor: ActorId,
    talked_to: bool,
    choice: Option<i32>,
    pending: Option<PendingChoice>,
    last_topic: Option<TopicId>,
    last: Option<LastResponse>,
    disposition: DispositionState,
}

impl Conversation {
    fn new(actor: ActorId, talked_to: bool) -> Self {
        Self {
            actor,
            talked_to,
            choice: None,
            pending: None,
            last_topic: None,
            last: None,
            disposition: DispositionState::default(),
        }
    }
}

#[derive(Debug)]
enum Phase {
    Idle,
    Active(Conversation),
    Ended,
}

/// Drives conversations between the player and actors.
///
/// The manager owns the dialogue store, the player's topic knowledge and the
/// view; the [`World`] is passed into every call that needs it.
pub struct DialogueManager<V: DialogueView> {
    store: DialogueStore,
    matcher: Box<dyn ResponseMatcher>,
    persuasion: PersuasionEngine,
    bridge: ScriptBridge,
    topics: TopicKnowledgeStore,
    view: V,
    phase: Phase,
}

impl<V: DialogueView> DialogueManager<V> {
    /// Create a manager with the reference matcher and reputation model.
    pub fn new(store: DialogueStore, view: V, config: &DialogueConfig) -> Self {
        Self {
            store,
            matcher: Box::new(ConditionFilter::new()),
            persuasion: PersuasionEngine::new(Box::new(RolledReputation::new(config.persuasion_seed))),
            bridge: ScriptBridge::new(config),
            topics: TopicKnowledgeStore::new(),
            view,
            phase: Phase::Idle,
        }
    }

    /// Replace the response matcher.
    pub fn with_matcher(mut self, matcher: Box<dyn ResponseMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Replace the reputation model used for persuasion.
    pub fn with_reputation(mut self, model: Box<dyn ReputationModel>) -> Self {
        self.persuasion = PersuasionEngine::new(model);
        self
    }

    /// Start with previously saved topic knowledge.
    pub fn with_known_topics(mut self, known: KnownTopics) -> Self {
        self.topics = TopicKnowledgeStore::with_known(known);
        self
    }

    /// The view.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Mutable access to the view.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// The dialogue store.
    pub fn store(&self) -> &DialogueStore {
        &self.store
    }

    /// Topic knowledge, including the current actor's topic list.
    pub fn topics(&self) -> &TopicKnowledgeStore {
        &self.topics
    }

    /// Topics the player knows, for save data.
    pub fn known_topics(&self) -> &KnownTopics {
        self.topics.known()
    }

    /// Replace the player's known topics, e.g. after loading a save.
    pub fn restore_known_topics(&mut self, known: KnownTopics) {
        self.topics.restore(known);
    }

    /// Mark a topic known to the player.
    pub fn register_topic(&mut self, topic: &str) -> bool {
        self.topics.register_topic(topic)
    }

    /// Current state of the state machine.
    pub fn state(&self) -> SessionState {
        match &self.phase {
            Phase::Idle => SessionState::Idle,
            Phase::Active(conv) if conv.pending.is_some() => SessionState::AwaitingChoice,
            Phase::Active(_) => SessionState::Browsing,
            Phase::Ended => SessionState::Ended,
        }
    }

    /// The actor being talked to.
    pub fn actor(&self) -> Option<ActorId> {
        self.active().ok().map(|c| c.actor)
    }

    /// The most recently resolved response of this conversation.
    pub fn last_response(&self) -> Option<&LastResponse> {
        self.active().ok().and_then(|c| c.last.as_ref())
    }

    /// Lower-cased answers of the open forced question with their codes.
    pub fn pending_answers(&self) -> Vec<(&str, i32)> {
        self.active()
            .ok()
            .and_then(|c| c.pending.as_ref())
            .map(|p| p.answers.iter().map(|(a, code)| (a.as_str(), *code)).collect())
            .unwrap_or_default()
    }

    /// Running temporary disposition change (0 outside a conversation).
    pub fn temporary_disposition_change(&self) -> i32 {
        self.active().map_or(0, |c| c.disposition.temporary)
    }

    /// Running permanent disposition change (0 outside a conversation).
    pub fn permanent_disposition_change(&self) -> i32 {
        self.active().map_or(0, |c| c.disposition.permanent)
    }

    /// Add to the temporary disposition change.
    pub fn apply_temporary_disposition_change(&mut self, delta: i32) -> DialogueResult<()> {
        let disposition = &mut self.active_mut()?.disposition;
        disposition.temporary = disposition.temporary.saturating_add(delta);
        Ok(())
    }

    /// The actor's displayed disposition: base plus temporary change, in 0..=100.
    pub fn derived_disposition(&self, world: &World) -> Option<i32> {
        let conv = self.active().ok()?;
        let actor = world.actor(conv.actor)?;
        Some(displayed_disposition(actor.base_disposition, conv.disposition.temporary))
    }

    /// Begin a conversation with `actor_id` and play its greeting.
    pub fn start_dialogue(&mut self, world: &mut World, actor_id: ActorId) -> DialogueResult<()> {
        let actor = world
            .actor_mut(actor_id)
            .ok_or(DialogueError::ActorNotFound(actor_id))?;
        let talked_to = actor.mark_talked_to();
        let name = actor.name.clone();
        debug!(actor = %name, talked_to, "start dialogue");

        self.phase = Phase::Active(Conversation::new(actor_id, talked_to));
        self.topics.clear_actor_topics();
        self.view.start_dialogue(&name);
        self.refresh(world)?;

        let greeting = {
            let ctx = self.filter_context(world, None)?;
            self.store
                .of_kind(DialogueKind::Greeting)
                .find_map(|group| {
                    self.matcher
                        .search(group, &ctx)
                        .map(|info| (group.id.clone(), info.clone()))
                })
        };

        match greeting {
            Some((group, info)) => {
                debug!(actor = %name, greeting = %group, info = %info.id, "greeting");
                self.respond(world, &group, info, None)?;
                self.refresh(world)?;
            }
            None => debug!(actor = %name, "no greeting matched"),
        }
        Ok(())
    }

    /// The player picked a keyword.
    ///
    /// Ignored while a forced question is open; the topic list is refreshed
    /// either way.
    pub fn keyword_selected(&mut self, world: &mut World, keyword: &str) -> DialogueResult<()> {
        let conv = self.active()?;
        let awaiting = conv.pending.is_some();
        let choice = conv.choice;

        if awaiting {
            debug!(topic = keyword, "keyword ignored while awaiting choice");
        } else {
            let key = TopicId::new(keyword);
            match self.resolve(world, &key, &[DialogueKind::Topic], choice)? {
                Some((group, info)) => {
                    debug!(topic = %key, info = %info.id, "topic resolved");
                    self.respond(world, &group, info, Some(&group))?;
                }
                None => debug!(topic = %key, "no response"),
            }
        }

        self.refresh(world)
    }

    /// Offer an answer to a forced question posed by the last response.
    pub fn ask_question(&mut self, question: &str, code: i32) -> DialogueResult<()> {
        let conv = self.active_mut()?;
        let topic = conv.last_topic.clone();
        conv.pending
            .get_or_insert_with(|| PendingChoice {
                topic,
                answers: BTreeMap::new(),
            })
            .answers
            .insert(question.to_lowercase(), code);
        self.view.ask_question(question);
        Ok(())
    }

    /// The player answered the open forced question.
    ///
    /// Answers that were not offered are ignored without any output.
    pub fn question_answered(&mut self, world: &mut World, answer: &str) -> DialogueResult<()> {
        let conv = self.active_mut()?;
        let offered = conv
            .pending
            .as_ref()
            .and_then(|p| p.answers.get(&answer.to_lowercase()).copied());
        let Some(code) = offered else {
            debug!(answer, "answer not offered");
            return Ok(());
        };

        let topic = conv
            .pending
            .take()
            .and_then(|p| p.topic)
            .or_else(|| conv.last_topic.clone());
        conv.choice = Some(code);
        debug!(answer, code, "question answered");

        if let Some(topic) = topic {
            let kinds = [DialogueKind::Topic, DialogueKind::Greeting];
            match self.resolve(world, &topic, &kinds, Some(code))? {
                Some((group, info)) => self.respond(world, &group, info, None)?,
                None => debug!(topic = %topic, code, "no response for choice"),
            }
        }

        self.active_mut()?.choice = None;
        self.refresh(world)
    }

    /// The actor ends the conversation; the view should only offer goodbye.
    pub fn goodbye(&mut self) -> DialogueResult<()> {
        self.active()?;
        self.view.goodbye();
        Ok(())
    }

    /// The player said goodbye: commit the permanent disposition change and
    /// close the view.
    pub fn goodbye_selected(&mut self, world: &mut World) -> DialogueResult<()> {
        let conv = match std::mem::replace(&mut self.phase, Phase::Ended) {
            Phase::Active(conv) => conv,
            other => {
                self.phase = other;
                return Err(DialogueError::NoActiveConversation);
            }
        };

        if let Some(actor) = world.actor_mut(conv.actor) {
            if actor.kind == ActorKind::Npc {
                actor.base_disposition = actor.base_disposition.saturating_add(conv.disposition.permanent);
            }
            debug!(
                actor = %actor.name,
                permanent = conv.disposition.permanent,
                base = actor.base_disposition,
                "goodbye"
            );
        }

        self.topics.clear_actor_topics();
        self.view.close();
        Ok(())
    }

    /// Attempt to persuade the current actor.
    pub fn persuade(&mut self, world: &mut World, kind: PersuasionKind) -> DialogueResult<PersuasionOutcome> {
        let Phase::Active(conv) = &mut self.phase else {
            return Err(DialogueError::NoActiveConversation);
        };
        let actor = world
            .actor(conv.actor)
            .cloned()
            .ok_or(DialogueError::ActorNotFound(conv.actor))?;

        let outcome = self
            .persuasion
            .persuade(&actor, &mut world.player, kind, &mut conv.disposition)?;
        debug!(
            actor = %actor.name,
            %kind,
            success = outcome.success,
            temporary = outcome.temporary,
            permanent = outcome.permanent,
            "persuade"
        );

        self.view.add_title(&outcome.message_key);
        self.refresh(world)?;
        Ok(outcome)
    }

    /// Show a developer error message in the dialogue window.
    pub fn print_error(&mut self, text: &str) {
        warn!("{text}");
        self.view.add_text(text);
    }

    fn active(&self) -> DialogueResult<&Conversation> {
        match &self.phase {
            Phase::Active(conv) => Ok(conv),
            _ => Err(DialogueError::NoActiveConversation),
        }
    }

    fn active_mut(&mut self) -> DialogueResult<&mut Conversation> {
        match &mut self.phase {
            Phase::Active(conv) => Ok(conv),
            _ => Err(DialogueError::NoActiveConversation),
        }
    }

    fn filter_context<'w>(&self, world: &'w World, choice: Option<i32>) -> DialogueResult<FilterContext<'w>> {
        let conv = self.active()?;
        let actor = world
            .actor(conv.actor)
            .ok_or(DialogueError::ActorNotFound(conv.actor))?;
        Ok(FilterContext {
            actor,
            game: &world.game,
            choice,
            talked_to: conv.talked_to,
            disposition: displayed_disposition(actor.base_disposition, conv.disposition.temporary),
        })
    }

    /// Look up `key` and ask the matcher for a response, if the group is of
    /// an accepted kind.
    fn resolve(
        &self,
        world: &World,
        key: &TopicId,
        kinds: &[DialogueKind],
        choice: Option<i32>,
    ) -> DialogueResult<Option<(String, ResponseInfo)>> {
        let Some(group) = self.store.get_key(key) else {
            return Ok(None);
        };
        if !kinds.contains(&group.kind) {
            return Ok(None);
        }
        let ctx = self.filter_context(world, choice)?;
        Ok(self
            .matcher
            .search(group, &ctx)
            .map(|info| (group.id.clone(), info.clone())))
    }

    /// Show a resolved response and apply its effects.
    fn respond(
        &mut self,
        world: &mut World,
        group: &str,
        info: ResponseInfo,
        title: Option<&str>,
    ) -> DialogueResult<()> {
        let actor_id = self.active()?.actor;

        self.topics.parse_text(&info.text);
        if let Some(title) = title {
            self.view.add_title(title);
        }
        self.view.add_text(&info.text);
        if let Some(sound) = info.sound.as_deref() {
            self.view.play_sound(sound);
        }

        let run = self.bridge.run(info.effect_script(), actor_id, world, &info.id);

        let topic = TopicId::new(group);
        let conv = self.active_mut()?;
        conv.last_topic = Some(topic.clone());
        conv.last = Some(LastResponse {
            topic,
            info,
            resolved_at: Utc::now(),
        });

        self.apply_commands(run.commands)
    }

    fn apply_commands(&mut self, commands: Vec<ScriptCommand>) -> DialogueResult<()> {
        for command in commands {
            match command {
                ScriptCommand::AddTopic(topic) => {
                    self.topics.register_topic(&topic);
                }
                ScriptCommand::Choice { text, code } => self.ask_question(&text, code)?,
                ScriptCommand::Goodbye => self.goodbye()?,
                ScriptCommand::ModDisposition(delta) => self.apply_temporary_disposition_change(delta)?,
            }
        }
        Ok(())
    }

    /// Recompute the actor's topics and push keywords and services to the view.
    fn refresh(&mut self, world: &World) -> DialogueResult<()> {
        let ctx = self.filter_context(world, None)?;
        let keywords = self.topics.refresh(&self.store, self.matcher.as_ref(), &ctx);
        let services = ServiceSet::for_actor(ctx.actor);
        debug!(
            actor_topics = self.topics.actor_topics().len(),
            keywords = keywords.len(),
            %services,
            "topics refreshed"
        );

        self.view.set_services(services);
        self.view.set_keywords(&keywords);
        Ok(())
    }
}

/// Base disposition plus a temporary change, kept in 0..=100.
fn displayed_disposition(base: i32, temporary: i32) -> i32 {
    base.saturating_add(temporary).clamp(0, 100)
}
