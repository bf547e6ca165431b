use anyhow::Result;
use termfolio_core::{ContentStore, ShellError, THEME_PREF_KEY};
use termfolio_store::PreferenceStore;
use tracing::warn;

/// The active theme, always one of the palette identifiers it was built with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeState {
    current: String,
    available: Vec<String>,
}

impl ThemeState {
    /// Starts on `preferred` when it names a palette entry, otherwise on the
    /// first palette entry.
    pub fn new(available: Vec<String>, preferred: &str) -> Self {
        let current = if available.iter().any(|name| name == preferred) {
            preferred.to_string()
        } else {
            available.first().cloned().unwrap_or_default()
        };
        Self { current, available }
    }

    /// Picks the stored theme when valid, else `default_theme`.
    pub fn load(content: &ContentStore, store: &dyn PreferenceStore, default_theme: &str) -> Self {
        let mut state = Self::new(content.theme_names(), default_theme);
        match store.get(THEME_PREF_KEY) {
            Ok(Some(saved)) => {
                if state.set(&saved).is_err() {
                    warn!(theme = %saved, "stored theme is not in the palette, using default");
                }
            }
            Ok(None) => {}
            Err(err) => warn!(error = %err, "theme preference unavailable, using default"),
        }
        state
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn available(&self) -> &[String] {
        &self.available
    }

    pub fn set(&mut self, identifier: &str) -> Result<(), ShellError> {
        if !self.available.iter().any(|name| name == identifier) {
            return Err(ShellError::UnknownTheme {
                name: identifier.to_string(),
                available: self.available.clone(),
            });
        }
        self.current = identifier.to_string();
        Ok(())
    }

    pub fn persist(&self, store: &mut dyn PreferenceStore) -> Result<()> {
        store.set(THEME_PREF_KEY, &self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termfolio_store::MemoryPreferences;

    #[test]
    fn set_rejects_unknown_identifiers() {
        let mut theme = ThemeState::new(vec!["green".into(), "blue".into()], "green");
        theme.set("blue").expect("valid theme");
        assert_eq!(theme.current(), "blue");
        let err = theme.set("bogus").expect_err("unknown theme");
        assert!(matches!(err, ShellError::UnknownTheme { ref name, .. } if name == "bogus"));
        assert_eq!(theme.current(), "blue");
    }

    #[test]
    fn load_prefers_stored_then_default() {
        let content = ContentStore::builtin();
        let store = MemoryPreferences::new().with_entry(THEME_PREF_KEY, "matrix");
        assert_eq!(ThemeState::load(&content, &store, "green").current(), "matrix");

        let store = MemoryPreferences::new().with_entry(THEME_PREF_KEY, "neon");
        assert_eq!(ThemeState::load(&content, &store, "amber").current(), "amber");

        let store = MemoryPreferences::new();
        assert_eq!(ThemeState::load(&content, &store, "nope").current(), "green");
    }

    #[test]
    fn persist_writes_current_identifier() {
        let mut store = MemoryPreferences::new();
        let theme = ThemeState::new(vec!["green".into(), "amber".into()], "amber");
        theme.persist(&mut store).expect("persist");
        assert_eq!(
            store.get(THEME_PREF_KEY).expect("get").as_deref(),
            Some("amber")
        );
    }
}
