use anyhow::{Result, anyhow};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    pub submit: KeyEvent,
    pub history_prev: KeyEvent,
    pub history_next: KeyEvent,
    pub autocomplete: KeyEvent,
    pub cancel: KeyEvent,
    pub quit: KeyEvent,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct KeyBindingsFile {
    submit: Option<String>,
    history_prev: Option<String>,
    history_next: Option<String>,
    autocomplete: Option<String>,
    cancel: Option<String>,
    quit: Option<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            submit: KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE),
            history_prev: KeyEvent::new(KeyCode::Up, KeyModifiers::NONE),
            history_next: KeyEvent::new(KeyCode::Down, KeyModifiers::NONE),
            autocomplete: KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE),
            cancel: KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            quit: KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL),
        }
    }
}

/// What a bound key asks the renderer to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Submit,
    HistoryPrev,
    HistoryNext,
    Autocomplete,
    Cancel,
    Quit,
}

impl KeyBindings {
    fn apply_overrides(mut self, raw: KeyBindingsFile) -> Result<Self> {
        let slots = [
            (raw.submit, &mut self.submit),
            (raw.history_prev, &mut self.history_prev),
            (raw.history_next, &mut self.history_next),
            (raw.autocomplete, &mut self.autocomplete),
            (raw.cancel, &mut self.cancel),
            (raw.quit, &mut self.quit),
        ];
        for (value, slot) in slots {
            if let Some(value) = value {
                *slot = parse_key_event(&value)?;
            }
        }
        Ok(self)
    }

    /// Quit is checked first so it can never be shadowed by another binding.
    pub fn action_for(&self, key: &KeyEvent) -> Option<KeyAction> {
        [
            (&self.quit, KeyAction::Quit),
            (&self.cancel, KeyAction::Cancel),
            (&self.submit, KeyAction::Submit),
            (&self.history_prev, KeyAction::HistoryPrev),
            (&self.history_next, KeyAction::HistoryNext),
            (&self.autocomplete, KeyAction::Autocomplete),
        ]
        .into_iter()
        .find(|(binding, _)| binding.code == key.code && binding.modifiers == key.modifiers)
        .map(|(_, action)| action)
    }
}

pub fn load_keybindings(path: &Path) -> Result<KeyBindings> {
    let raw = fs::read_to_string(path)?;
    let parsed: KeyBindingsFile = serde_json::from_str(&raw)?;
    KeyBindings::default().apply_overrides(parsed)
}

/// Parses `ctrl+shift+x` style descriptions.
pub fn parse_key_event(value: &str) -> Result<KeyEvent> {
    let mut modifiers = KeyModifiers::NONE;
    let mut key_code: Option<KeyCode> = None;
    for token in value
        .split('+')
        .map(str::trim)
        .filter(|part| !part.is_empty())
    {
        match token.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            "alt" | "option" => modifiers |= KeyModifiers::ALT,
            other => {
                let code = parse_key_code(other)
                    .ok_or_else(|| anyhow!("unsupported keybinding token: {token}"))?;
                if key_code.replace(code).is_some() {
                    return Err(anyhow!("keybinding names more than one key: {value}"));
                }
            }
        }
    }
    let code = key_code.ok_or_else(|| anyhow!("missing key code in keybinding: {value}"))?;
    Ok(KeyEvent::new(code, modifiers))
}

fn parse_key_code(value: &str) -> Option<KeyCode> {
    match value {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "backspace" => Some(KeyCode::Backspace),
        "space" => Some(KeyCode::Char(' ')),
        value if value.chars().count() == 1 => value.chars().next().map(KeyCode::Char),
        _ => None,
    }
}
