//! The presentation side of a conversation.

use crate::services::ServiceSet;

/// Receives everything the session wants to show.
///
/// The session pushes output through this trait and never reads from it;
/// user intents come back in as method calls on the manager.
pub trait DialogueView {
    /// A conversation with `actor_name` has begun.
    fn start_dialogue(&mut self, actor_name: &str);
    /// Show a heading, e.g. the selected topic.
    fn add_title(&mut self, text: &str);
    /// Show response text.
    fn add_text(&mut self, text: &str);
    /// Replace the keyword list. Already sorted for display.
    fn set_keywords(&mut self, keywords: &[String]);
    /// Replace the offered services.
    fn set_services(&mut self, services: ServiceSet);
    /// Offer one answer of a forced question.
    fn ask_question(&mut self, question: &str);
    /// The actor ends the conversation; only goodbye should remain selectable.
    fn goodbye(&mut self);
    /// Play a voice or sound cue.
    fn play_sound(&mut self, _sound: &str) {}
    /// The conversation is over; tear the window down.
    fn close(&mut self);
}

/// One recorded view call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// `start_dialogue`
    Start(String),
    /// `add_title`
    Title(String),
    /// `add_text`
    Text(String),
    /// `set_keywords`
    Keywords(Vec<String>),
    /// `set_services`
    Services(ServiceSet),
    /// `ask_question`
    Question(String),
    /// `goodbye`
    Goodbye,
    /// `play_sound`
    Sound(String),
    /// `close`
    Close,
}

/// A view that records every call, for tests and transcripts.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    events: Vec<ViewEvent>,
}

impl RecordingView {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All events so far.
    pub fn events(&self) -> &[ViewEvent] {
        &self.events
    }

    /// Remove and return all events so far.
    pub fn take(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }

    /// Texts shown so far.
    pub fn texts(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The most recent keyword list.
    pub fn keywords(&self) -> Option<&[String]> {
        self.events.iter().rev().find_map(|e| match e {
            ViewEvent::Keywords(k) => Some(k.as_slice()),
            _ => None,
        })
    }

    /// Render the events as a plain-text transcript, one line per event.
    pub fn transcript(&self) -> String {
        self.events
            .iter()
            .map(|e| match e {
                ViewEvent::Start(name) => format!("== {name} =="),
                ViewEvent::Title(t) => format!("# {t}"),
                ViewEvent::Text(t) => t.clone(),
                ViewEvent::Keywords(k) => format!("[topics] {}", k.join(", ")),
                ViewEvent::Services(s) => format!("[services] {s}"),
                ViewEvent::Question(q) => format!("? {q}"),
                ViewEvent::Goodbye => "[goodbye]".to_string(),
                ViewEvent::Sound(s) => format!("[sound] {s}"),
                ViewEvent::Close => "== closed ==".to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl DialogueView for RecordingView {
    fn start_dialogue(&mut self, actor_name: &str) {
        self.events.push(ViewEvent::Start(actor_name.to_string()));
    }

    fn add_title(&mut self, text: &str) {
        self.events.push(ViewEvent::Title(text.to_string()));
    }

    fn add_text(&mut self, text: &str) {
        self.events.push(ViewEvent::Text(text.to_string()));
    }

    fn set_keywords(&mut self, keywords: &[String]) {
        self.events.push(ViewEvent::Keywords(keywords.to_vec()));
    }

    fn set_services(&mut self, services: ServiceSet) {
        self.events.push(ViewEvent::Services(services));
    }

    fn ask_question(&mut self, question: &str) {
        self.events.push(ViewEvent::Question(question.to_string()));
    }

    fn goodbye(&mut self) {
        self.events.push(ViewEvent::Goodbye);
    }

    fn play_sound(&mut self, sound: &str) {
        self.events.push(ViewEvent::Sound(sound.to_string()));
    }

    fn close(&mut self) {
        self.events.push(ViewEvent::Close);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_and_summarizes() {
        let mut view = RecordingView::new();
        view.start_dialogue("Fargoth");
        view.add_text("Hello.");
        view.set_keywords(&["rumors".to_string()]);
        view.set_keywords(&["background".to_string(), "rumors".to_string()]);

        assert_eq!(view.texts(), vec!["Hello."]);
        assert_eq!(view.keywords().unwrap(), ["background", "rumors"]);

        let taken = view.take();
        assert_eq!(taken.len(), 4);
        assert!(view.events().is_empty());
        assert!(view.keywords().is_none());
    }

    #[test]
    fn transcript_lines() {
        let mut view = RecordingView::new();
        view.start_dialogue("Fargoth");
        view.add_title("rumors");
        view.ask_question("Yes");
        view.close();
        insta::assert_snapshot!(view.transcript(), @r"
        == Fargoth ==
        # rumors
        ? Yes
        == closed ==
        ");
    }
}
