use std::path::{Path, PathBuf};

mod config;
mod content;
mod error;
mod text;

pub use config::{AppConfig, UiConfig};
pub use content::{
    ContactLink, ContactInfo, ContentStore, Profile, Project, ProjectLink, ProjectStatus, Skill,
    ThemeColors, ThemePalette,
};
pub use error::ShellError;
pub use text::{Emphasis, RichText, Segment};

/// Preference key holding the active theme identifier.
pub const THEME_PREF_KEY: &str = "terminal-theme";
/// Preference key holding the JSON-encoded command history.
pub const HISTORY_PREF_KEY: &str = "terminal-history";

/// Per-workspace directory for settings, preferences and logs.
pub fn runtime_dir(workspace: &Path) -> PathBuf {
    workspace.join(".termfolio")
}
