use anyhow::Result;
use termfolio_core::HISTORY_PREF_KEY;
use termfolio_store::PreferenceStore;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecallDirection {
    Older,
    Newer,
}

/// Submitted command lines plus a recall cursor in `0..=len`, where `len`
/// means "the line being composed".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryBuffer {
    entries: Vec<String>,
    cursor: usize,
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the contents, dropping blank entries, and parks the cursor
    /// past the newest entry.
    pub fn restore(&mut self, entries: Vec<String>) {
        self.entries = entries
            .into_iter()
            .filter(|entry| !entry.trim().is_empty())
            .collect();
        self.cursor = self.entries.len();
    }

    /// Returns false, leaving the buffer untouched, for blank lines.
    pub fn append(&mut self, line: &str) -> bool {
        if line.trim().is_empty() {
            return false;
        }
        self.entries.push(line.to_string());
        self.cursor = self.entries.len();
        true
    }

    /// Moves the cursor one step and returns the entry it now points at, or
    /// an empty string past the newest entry. Clamped at both ends.
    pub fn recall(&mut self, direction: RecallDirection) -> String {
        match direction {
            RecallDirection::Older if self.cursor > 0 => self.cursor -= 1,
            RecallDirection::Newer if self.cursor < self.entries.len() => self.cursor += 1,
            _ => {}
        }
        self.entries.get(self.cursor).cloned().unwrap_or_default()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The newest `limit` entries, oldest first.
    pub fn recent(&self, limit: usize) -> &[String] {
        let start = self.entries.len().saturating_sub(limit);
        &self.entries[start..]
    }

    /// Restores from the preference store. Missing or unreadable data gives
    /// an empty buffer.
    pub fn load(store: &dyn PreferenceStore) -> Self {
        let mut history = Self::new();
        let raw = match store.get(HISTORY_PREF_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return history,
            Err(err) => {
                warn!(error = %err, "history preference unavailable, starting empty");
                return history;
            }
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(entries) => history.restore(entries),
            Err(err) => warn!(error = %err, "stored history is malformed, starting empty"),
        }
        history
    }

    pub fn persist(&self, store: &mut dyn PreferenceStore, limit: usize) -> Result<()> {
        let raw = serde_json::to_string(self.recent(limit))?;
        store.set(HISTORY_PREF_KEY, &raw)
    }
}
