use serde::Serialize;
use termfolio_core::{AppConfig, ContentStore, RichText};
use termfolio_store::PreferenceStore;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::commands::{self, CommandContext, Outcome, Picker};
use crate::completion::{Completion, complete};
use crate::editor::LineEditor;
use crate::history::{HistoryBuffer, RecallDirection};
use crate::theme::ThemeState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Booting,
    Ready,
}

/// Events a renderer feeds into the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    TextChanged(String),
    Submit,
    HistoryOlder,
    HistoryNewer,
    CompletionRequest,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputEntry {
    /// A submitted line echoed after the prompt.
    Command { prompt: String, line: String },
    Result { text: RichText },
}

impl OutputEntry {
    pub fn to_plain_string(&self) -> String {
        match self {
            Self::Command { prompt, line } => format!("{prompt}{line}"),
            Self::Result { text } => text.to_plain_string(),
        }
    }
}

/// Append-only transcript. Only `clear` removes entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OutputLog {
    entries: Vec<OutputEntry>,
}

impl OutputLog {
    pub fn push(&mut self, entry: OutputEntry) {
        self.entries.push(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[OutputEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub history_limit: usize,
    pub prompt_host: String,
    pub default_theme: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for SessionOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            history_limit: config.history_persist_limit,
            prompt_host: config.prompt_host.clone(),
            default_theme: config.default_theme.clone(),
        }
    }
}

/// Owns all interactive state and drives it from [`InputEvent`]s.
pub struct Session {
    content: ContentStore,
    store: Box<dyn PreferenceStore>,
    clock: Box<dyn Clock>,
    picker: Box<dyn Picker>,
    options: SessionOptions,
    state: SessionState,
    editor: LineEditor,
    history: HistoryBuffer,
    theme: ThemeState,
    output: OutputLog,
    exit_requested: bool,
}

impl Session {
    pub fn new(
        content: ContentStore,
        store: Box<dyn PreferenceStore>,
        clock: Box<dyn Clock>,
        picker: Box<dyn Picker>,
        options: SessionOptions,
    ) -> Self {
        let history = HistoryBuffer::load(store.as_ref());
        let theme = ThemeState::load(&content, store.as_ref(), &options.default_theme);
        debug!(
            history = history.len(),
            theme = theme.current(),
            "session restored"
        );
        Self {
            content,
            store,
            clock,
            picker,
            options,
            state: SessionState::Booting,
            editor: LineEditor::new(),
            history,
            theme,
            output: OutputLog::default(),
            exit_requested: false,
        }
    }

    /// Booting -> Ready. Later calls do nothing.
    pub fn boot(&mut self) {
        if self.state == SessionState::Booting {
            self.state = SessionState::Ready;
            info!("session ready");
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn banner(&self) -> RichText {
        RichText::new()
            .accent(&self.content.profile.banner)
            .plain("\n\n")
            .plain(format!(
                "Welcome to {}'s portfolio terminal. Type ",
                self.content.profile.name
            ))
            .highlight("'help'")
            .plain(" to see available commands.")
    }

    pub fn prompt(&self) -> String {
        format!("{}@{}:~$ ", self.content.prompt_user(), self.options.prompt_host)
    }

    /// Applies one input event. Returns false when the event was ignored
    /// because the session is still booting.
    pub fn handle(&mut self, event: InputEvent) -> bool {
        if self.state != SessionState::Ready {
            return false;
        }
        match event {
            InputEvent::TextChanged(text) => self.editor.set_text(text),
            InputEvent::Submit => {
                let line = self.editor.current_text().to_string();
                self.submit_line(&line);
            }
            InputEvent::HistoryOlder => {
                let recalled = self.history.recall(RecallDirection::Older);
                self.editor.set_text(recalled);
            }
            InputEvent::HistoryNewer => {
                let recalled = self.history.recall(RecallDirection::Newer);
                self.editor.set_text(recalled);
            }
            InputEvent::CompletionRequest => self.complete_line(),
            InputEvent::Cancel => {
                self.editor.clear();
                self.push_result(RichText::plain_text("^C"));
            }
        }
        true
    }

    /// Runs a whole line as if typed and submitted. Surrounding whitespace is
    /// dropped before echo, history and dispatch; blank lines are ignored.
    pub fn submit_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        self.output.push(OutputEntry::Command {
            prompt: self.prompt(),
            line: line.to_string(),
        });
        self.history.append(line);
        if let Err(err) = self
            .history
            .persist(self.store.as_mut(), self.options.history_limit)
        {
            warn!(error = %err, "failed to persist history");
        }
        self.editor.clear();

        let mut ctx = CommandContext {
            content: &self.content,
            theme: &mut self.theme,
            clock: self.clock.as_ref(),
            picker: self.picker.as_mut(),
        };
        match commands::dispatch(&mut ctx, line) {
            Ok(Outcome::Print(text)) => self.push_result(text),
            Ok(Outcome::Clear) => self.output.clear(),
            Ok(Outcome::ThemeChanged { theme, message }) => {
                if let Err(err) = self.theme.persist(self.store.as_mut()) {
                    warn!(error = %err, theme = %theme, "failed to persist theme");
                }
                self.push_result(message);
            }
            Ok(Outcome::Exit(farewell)) => {
                self.push_result(farewell);
                self.exit_requested = true;
            }
            Err(err) => {
                debug!(kind = err.kind(), "command failed");
                self.push_result(RichText::error_text(err.to_string()));
            }
        }
    }

    fn complete_line(&mut self) {
        let vocabulary = commands::vocabulary();
        match complete(self.editor.current_text(), &vocabulary) {
            Completion::None => {}
            Completion::Unique(name) => self.editor.set_text(name),
            Completion::Multiple(names) => self.push_result(RichText::plain_text(format!(
                "Available commands: {}",
                names.join(", ")
            ))),
        }
    }

    fn push_result(&mut self, text: RichText) {
        self.output.push(OutputEntry::Result { text });
    }

    pub fn output(&self) -> &OutputLog {
        &self.output
    }

    pub fn input(&self) -> &str {
        self.editor.current_text()
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn theme(&self) -> &str {
        self.theme.current()
    }

    pub fn content(&self) -> &ContentStore {
        &self.content
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Returns whether `exit` ran since the last call, and resets the flag.
    pub fn take_exit_request(&mut self) -> bool {
        std::mem::take(&mut self.exit_requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use anyhow::{Result, bail};
    use chrono::DateTime;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;
    use termfolio_core::{Emphasis, HISTORY_PREF_KEY, Skill, THEME_PREF_KEY};
    use termfolio_store::MemoryPreferences;

    struct Nth(usize);

    impl Picker for Nth {
        fn pick(&mut self, _len: usize) -> usize {
            self.0
        }
    }

    /// Shares its map with the test so writes can be inspected afterwards.
    #[derive(Clone, Default)]
    struct SharedPreferences(Rc<RefCell<HashMap<String, String>>>);

    impl PreferenceStore for SharedPreferences {
        fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.0.borrow().get(key).cloned())
        }

        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            self.0.borrow_mut().insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    struct BrokenPreferences;

    impl PreferenceStore for BrokenPreferences {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            bail!("storage unavailable")
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            bail!("storage unavailable")
        }
    }

    fn clock() -> Box<dyn Clock> {
        Box::new(FixedClock {
            at: DateTime::parse_from_rfc3339("2026-10-18T14:05:09-07:00").expect("timestamp"),
            zone: "PDT".to_string(),
        })
    }

    fn session_with(store: Box<dyn PreferenceStore>) -> Session {
        let mut session = Session::new(
            ContentStore::builtin(),
            store,
            clock(),
            Box::new(Nth(0)),
            SessionOptions::default(),
        );
        session.boot();
        session
    }

    fn session() -> Session {
        session_with(Box::new(MemoryPreferences::new()))
    }

    fn type_and_submit(session: &mut Session, line: &str) {
        session.handle(InputEvent::TextChanged(line.to_string()));
        session.handle(InputEvent::Submit);
    }

    fn last_result(session: &Session) -> &RichText {
        match session.output().entries().last() {
            Some(OutputEntry::Result { text }) => text,
            other => panic!("expected a result entry, got {other:?}"),
        }
    }

    #[test]
    fn booting_session_ignores_input() {
        let mut session = Session::new(
            ContentStore::builtin(),
            Box::new(MemoryPreferences::new()),
            clock(),
            Box::new(Nth(0)),
            SessionOptions::default(),
        );
        assert_eq!(session.state(), SessionState::Booting);
        assert!(!session.handle(InputEvent::TextChanged("help".into())));
        assert!(!session.handle(InputEvent::Submit));
        assert!(session.output().is_empty());
        session.boot();
        session.boot();
        assert_eq!(session.state(), SessionState::Ready);
        assert!(session.handle(InputEvent::TextChanged("help".into())));
        assert_eq!(session.input(), "help");
    }

    #[test]
    fn submit_echoes_dispatches_and_clears_input() {
        let mut session = session();
        type_and_submit(&mut session, "whoami");
        let entries = session.output().entries();
        assert_eq!(
            entries[0],
            OutputEntry::Command {
                prompt: "alex@portfolio:~$ ".to_string(),
                line: "whoami".to_string(),
            }
        );
        assert_eq!(entries[1].to_plain_string(), "alexdeveloper");
        assert_eq!(session.input(), "");
        assert_eq!(session.history().entries(), ["whoami"]);
    }

    #[test]
    fn known_commands_never_report_unknown() {
        let mut session = session();
        for name in commands::vocabulary() {
            let line = match name {
                "theme" => "theme matrix",
                "cat" => "cat contact.info",
                "echo" => "echo ok",
                other => other,
            };
            session.submit_line(line);
            let unknown = session.output().entries().iter().any(|entry| {
                entry.to_plain_string().starts_with("Command not found")
            });
            assert!(!unknown, "{line} reported as unknown");
        }
    }

    #[test]
    fn history_recall_sequence() {
        let mut session = session();
        for line in ["a", "b", "c"] {
            type_and_submit(&mut session, line);
        }
        let mut recalled = Vec::new();
        for _ in 0..4 {
            session.handle(InputEvent::HistoryOlder);
            recalled.push(session.input().to_string());
        }
        assert_eq!(recalled, ["c", "b", "a", "a"]);
        session.handle(InputEvent::HistoryNewer);
        assert_eq!(session.input(), "b");
    }

    #[test]
    fn completion_fills_or_lists() {
        let mut session = session();
        session.handle(InputEvent::TextChanged("ne".into()));
        session.handle(InputEvent::CompletionRequest);
        assert_eq!(session.input(), "neofetch");
        assert!(session.output().is_empty());

        session.handle(InputEvent::TextChanged("c".into()));
        session.handle(InputEvent::CompletionRequest);
        assert_eq!(session.input(), "c");
        assert_eq!(
            last_result(&session).to_plain_string(),
            "Available commands: contact, clear, cat"
        );

        session.handle(InputEvent::TextChanged("zz".into()));
        session.handle(InputEvent::CompletionRequest);
        assert_eq!(session.input(), "zz");
        assert_eq!(session.output().len(), 1);
    }

    #[test]
    fn cancel_discards_line_and_marks_output() {
        let mut session = session();
        session.handle(InputEvent::TextChanged("proj".into()));
        session.handle(InputEvent::Cancel);
        assert_eq!(session.input(), "");
        assert_eq!(last_result(&session).to_plain_string(), "^C");
        assert!(session.history().is_empty());
    }

    #[test]
    fn theme_switch_is_visible_and_persisted() {
        let prefs = SharedPreferences::default();
        let mut session = session_with(Box::new(prefs.clone()));
        session.submit_line("theme blue");
        assert_eq!(session.theme(), "blue");
        assert_eq!(
            prefs.0.borrow().get(THEME_PREF_KEY).map(String::as_str),
            Some("blue")
        );
        session.submit_line("neofetch");
        assert!(last_result(&session).to_plain_string().contains("Theme:    blue"));

        session.submit_line("theme bogus");
        assert_eq!(session.theme(), "blue");
        let err = last_result(&session);
        assert!(err.has_emphasis(&Emphasis::Error));
        assert!(err.to_plain_string().starts_with("Theme 'bogus' not found."));
    }

    #[test]
    fn clear_empties_log_and_is_idempotent() {
        let mut session = session();
        session.submit_line("help");
        session.submit_line("clear");
        assert!(session.output().is_empty());
        session.submit_line("clear");
        assert!(session.output().is_empty());
        assert_eq!(session.history().entries(), ["help", "clear", "clear"]);
    }

    #[test]
    fn cat_skills_json_matches_content() {
        let mut session = session();
        session.submit_line("cat skills.json");
        let raw = last_result(&session).to_plain_string();
        let parsed: Vec<Skill> = serde_json::from_str(&raw).expect("json");
        assert_eq!(parsed, session.content().skills);
    }

    #[test]
    fn blank_submission_touches_nothing() {
        let mut session = session();
        for blank in ["", "   ", "\t"] {
            type_and_submit(&mut session, blank);
        }
        assert!(session.output().is_empty());
        assert!(session.history().is_empty());
    }

    #[test]
    fn padded_submission_is_trimmed_before_recording() {
        let mut session = session();
        type_and_submit(&mut session, "  help  ");
        assert_eq!(session.history().entries(), ["help"]);
        assert_eq!(
            session.output().entries()[0],
            OutputEntry::Command {
                prompt: "alex@portfolio:~$ ".to_string(),
                line: "help".to_string(),
            }
        );
        assert_eq!(
            session.output().entries()[0].to_plain_string(),
            "alex@portfolio:~$ help"
        );

        session.handle(InputEvent::HistoryOlder);
        assert_eq!(session.input(), "help");
        session.handle(InputEvent::CompletionRequest);
        assert_eq!(session.input(), "help");
        assert_eq!(session.output().len(), 2);
    }

    #[test]
    fn exit_prints_picked_farewell_and_flags_request() {
        let mut session = Session::new(
            ContentStore::builtin(),
            Box::new(MemoryPreferences::new()),
            clock(),
            Box::new(Nth(2)),
            SessionOptions::default(),
        );
        session.boot();
        session.submit_line("exit");
        let farewell = last_result(&session);
        assert_eq!(farewell.to_plain_string(), commands::FAREWELLS[2]);
        assert!(farewell.has_emphasis(&Emphasis::Success));
        assert!(session.take_exit_request());
        assert!(!session.exit_requested());
        session.submit_line("whoami");
        assert_eq!(last_result(&session).to_plain_string(), "alexdeveloper");
    }

    #[test]
    fn date_reads_injected_clock() {
        let mut session = session();
        session.submit_line("date");
        assert_eq!(
            last_result(&session).to_plain_string(),
            "Sunday, October 18, 2026 at 02:05:09 PM PDT"
        );
    }

    #[test]
    fn broken_preferences_fall_back_to_defaults() {
        let mut session = session_with(Box::new(BrokenPreferences));
        assert_eq!(session.theme(), "green");
        assert!(session.history().is_empty());
        session.submit_line("theme amber");
        assert_eq!(session.theme(), "amber");
        assert_eq!(session.history().len(), 1);
        assert_eq!(
            last_result(&session).to_plain_string(),
            "Theme changed to: amber"
        );
    }

    #[test]
    fn restores_theme_and_history_from_preferences() {
        let store = MemoryPreferences::new()
            .with_entry(THEME_PREF_KEY, "cyberpunk")
            .with_entry(HISTORY_PREF_KEY, r#"["help","projects"]"#);
        let mut session = session_with(Box::new(store));
        assert_eq!(session.theme(), "cyberpunk");
        session.handle(InputEvent::HistoryOlder);
        assert_eq!(session.input(), "projects");
    }

    #[test]
    fn history_persists_bounded_window() {
        let prefs = SharedPreferences::default();
        let mut session = Session::new(
            ContentStore::builtin(),
            Box::new(prefs.clone()),
            clock(),
            Box::new(Nth(0)),
            SessionOptions {
                history_limit: 2,
                ..SessionOptions::default()
            },
        );
        session.boot();
        for line in ["pwd", "ls", "whoami"] {
            session.submit_line(line);
        }
        let raw = prefs.0.borrow().get(HISTORY_PREF_KEY).cloned().expect("history");
        let saved: Vec<String> = serde_json::from_str(&raw).expect("json");
        assert_eq!(saved, ["ls", "whoami"]);
    }

    #[test]
    fn banner_carries_profile_art() {
        let session = session();
        let banner = session.banner().to_plain_string();
        assert!(banner.starts_with(&session.content().profile.banner));
        assert!(banner.contains("Alex Developer's portfolio terminal"));
    }

    proptest! {
        #[test]
        fn unknown_lines_yield_one_error_entry(line in "[a-zA-Z0-9_-]{1,12}( [a-z]{0,5})?") {
            let name = line.split(' ').next().unwrap_or_default().to_lowercase();
            prop_assume!(commands::lookup(&name).is_none());
            let mut session = session();
            session.submit_line(&line);
            let entries = session.output().entries();
            prop_assert_eq!(entries.len(), 2);
            let expected = format!(
                "Command not found: {name}. Type 'help' for available commands."
            );
            prop_assert_eq!(entries[1].to_plain_string(), expected);
        }
    }
}
