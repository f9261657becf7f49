//! Integration tests for dialogue conversations.
use parley_core::{ActorId, Database, Value, World};
use parley_dialogue::{
    DialogueConfig, DialogueError, DialogueManager, KnownTopics, PersuasionKind, RecordingView, SessionState,
};

const GUILD: &str = r#"{
    "dialogues": [
        {"id": "Greeting 1", "kind": "greeting", "infos": [
            {"id": "g-return", "text": "Back again? Ask about the latest rumors.",
             "conditions": [{"type": "talked_to", "value": true}]},
            {"id": "g-first", "text": "Welcome to the Mages Guild, traveler.", "sound": "vo/greet.mp3",
             "conditions": [{"type": "talked_to", "value": false}]}
        ]},
        {"id": "Latest Rumors", "kind": "topic", "infos": [
            {"id": "r1", "text": "They say the Fighters Guild is recruiting."}
        ]},
        {"id": "Fighters Guild", "kind": "topic", "infos": [
            {"id": "f1", "text": "Talk to their steward in Balmora."}
        ]},
        {"id": "join", "kind": "topic", "infos": [
            {"id": "j-yes", "text": "Welcome, apprentice.",
             "script": "set joined to 1\njournal \"MG_Join\" 10",
             "conditions": [{"type": "choice", "code": 1}]},
            {"id": "j-no", "text": "Come back when you are ready.",
             "conditions": [{"type": "choice", "code": 2}]},
            {"id": "j-member", "text": "You are already one of us.",
             "conditions": [{"type": "local", "name": "joined", "value": 1}]},
            {"id": "j-ask", "text": "Do you wish to join?", "script": "choice \"Yes\" 1 \"No\" 2"}
        ]}
    ],
    "actors": [
        {"name": "Ajira", "services": 1024, "locals": [{"name": "joined", "kind": "short"}]}
    ],
    "player": {"name": "Nerevar", "speechcraft": 30, "gold": 100},
    "known_topics": ["latest rumors", "join"]
}"#;

fn load() -> (DialogueManager<RecordingView>, World, ActorId) {
    let db = Database::from_json(GUILD).unwrap();
    let known: KnownTopics = db.known_topics.iter().map(|t| t.as_str().into()).collect();
    let (store, world) = db.into_parts().unwrap();
    let ajira = world.find_actor_id("ajira").unwrap();
    let manager =
        DialogueManager::new(store, RecordingView::new(), &DialogueConfig::default()).with_known_topics(known);
    (manager, world, ajira)
}

#[test]
fn joining_the_guild() {
    let (mut manager, mut world, ajira) = load();

    manager.start_dialogue(&mut world, ajira).unwrap();
    manager.keyword_selected(&mut world, "latest rumors").unwrap();
    manager.keyword_selected(&mut world, "join").unwrap();
    assert_eq!(manager.state(), SessionState::AwaitingChoice);
    manager.question_answered(&mut world, "yes").unwrap();
    manager.keyword_selected(&mut world, "Join").unwrap();
    manager.goodbye_selected(&mut world).unwrap();

    insta::assert_snapshot!(manager.view().transcript(), @r"
    == Ajira ==
    [services] trade
    [topics] join, Latest Rumors
    Welcome to the Mages Guild, traveler.
    [sound] vo/greet.mp3
    [services] trade
    [topics] join, Latest Rumors
    # Latest Rumors
    They say the Fighters Guild is recruiting.
    [services] trade
    [topics] Fighters Guild, join, Latest Rumors
    # join
    Do you wish to join?
    ? Yes
    ? No
    [services] trade
    [topics] Fighters Guild, join, Latest Rumors
    Welcome, apprentice.
    [services] trade
    [topics] Fighters Guild, join, Latest Rumors
    # join
    You are already one of us.
    [services] trade
    [topics] Fighters Guild, join, Latest Rumors
    == closed ==
    ");

    let actor = world.actor(ajira).unwrap();
    assert_eq!(
        actor.locals.as_ref().unwrap().get_by_name("joined"),
        Some(Value::Integer(1))
    );
    assert_eq!(world.game.journal_index("MG_Join"), 10);
    assert_eq!(manager.state(), SessionState::Ended);
}

#[test]
fn second_visit_uses_return_greeting() {
    let (mut manager, mut world, ajira) = load();

    manager.start_dialogue(&mut world, ajira).unwrap();
    manager.goodbye_selected(&mut world).unwrap();
    manager.view_mut().take();

    manager.start_dialogue(&mut world, ajira).unwrap();
    assert_eq!(manager.view().texts(), vec!["Back again? Ask about the latest rumors."]);
    assert_eq!(manager.state(), SessionState::Browsing);
}

#[test]
fn declining_leaves_state_untouched() {
    let (mut manager, mut world, ajira) = load();

    manager.start_dialogue(&mut world, ajira).unwrap();
    manager.keyword_selected(&mut world, "join").unwrap();
    manager.question_answered(&mut world, "NO").unwrap();

    assert_eq!(manager.view().texts().last(), Some(&"Come back when you are ready."));
    assert_eq!(world.game.journal_index("MG_Join"), 0);
    assert_eq!(manager.last_response().unwrap().info.id, "j-no");
}

#[test]
fn known_topics_survive_a_save() {
    let (mut manager, mut world, ajira) = load();
    manager.start_dialogue(&mut world, ajira).unwrap();
    manager.keyword_selected(&mut world, "latest rumors").unwrap();

    let saved = serde_json::to_string(manager.known_topics()).unwrap();
    let restored: KnownTopics = serde_json::from_str(&saved).unwrap();

    let (fresh, mut world, ajira) = load();
    let mut fresh = fresh.with_known_topics(restored);
    fresh.start_dialogue(&mut world, ajira).unwrap();
    assert_eq!(
        fresh.view().keywords().unwrap(),
        &["Fighters Guild".to_string(), "join".to_string(), "Latest Rumors".to_string()]
    );
}

#[test]
fn bribes_cost_gold() {
    let (mut manager, mut world, ajira) = load();
    manager.start_dialogue(&mut world, ajira).unwrap();

    let outcome = manager.persuade(&mut world, PersuasionKind::BribeHundred).unwrap();
    assert!(outcome.message_key.starts_with("sBribe"));
    assert_eq!(world.player.gold, 0);

    let err = manager.persuade(&mut world, PersuasionKind::BribeTen).unwrap_err();
    assert!(matches!(
        err,
        DialogueError::InsufficientGold {
            needed: 10,
            available: 0
        }
    ));
}
