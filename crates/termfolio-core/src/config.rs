use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::runtime_dir;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// How long the boot screen stays up before the prompt appears.
    pub boot_delay_ms: u64,
    pub skip_boot: bool,
    /// Leave the terminal after `exit` has printed its farewell.
    pub exit_on_exit_command: bool,
    pub keybindings_path: Option<String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            boot_delay_ms: 4500,
            skip_boot: false,
            exit_on_exit_command: true,
            keybindings_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Theme used when no valid theme preference is stored.
    pub default_theme: String,
    /// Number of most recent history entries written to the preference store.
    pub history_persist_limit: usize,
    /// Host part of the echoed prompt (`user@host:~$`).
    pub prompt_host: String,
    /// Optional JSON file replacing the built-in portfolio content.
    pub content_path: Option<String>,
    pub ui: UiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_theme: "green".to_string(),
            history_persist_limit: 50,
            prompt_host: "portfolio".to_string(),
            content_path: None,
            ui: UiConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn user_settings_path() -> Option<PathBuf> {
        let home = std::env::var("HOME")
            .ok()
            .or_else(|| std::env::var("USERPROFILE").ok())?;
        Some(Path::new(&home).join(".termfolio/settings.json"))
    }

    pub fn project_settings_path(workspace: &Path) -> PathBuf {
        runtime_dir(workspace).join("settings.json")
    }

    pub fn project_local_settings_path(workspace: &Path) -> PathBuf {
        runtime_dir(workspace).join("settings.local.json")
    }

    pub fn load(workspace: &Path) -> Result<Self> {
        let mut paths = Vec::new();
        if let Some(user) = Self::user_settings_path() {
            paths.push(user);
        }
        paths.push(Self::project_settings_path(workspace));
        paths.push(Self::project_local_settings_path(workspace));
        Self::load_layers(&paths)
    }

    /// Deep-merges each existing JSON file over the defaults, later files winning.
    pub fn load_layers(paths: &[PathBuf]) -> Result<Self> {
        let mut merged = serde_json::to_value(Self::default())?;
        for path in paths {
            if !path.exists() {
                continue;
            }
            let raw = fs::read_to_string(path)?;
            let layer: Value = serde_json::from_str(&raw)?;
            merge_settings(&mut merged, &layer);
        }
        Ok(serde_json::from_value(merged)?)
    }

    pub fn save(&self, workspace: &Path) -> Result<()> {
        let path = Self::project_settings_path(workspace);
        fs::create_dir_all(
            path.parent()
                .ok_or_else(|| anyhow::anyhow!("invalid config path"))?,
        )?;
        fs::write(path, serde_json::to_vec_pretty(self)?)?;
        Ok(())
    }

    /// Content path resolved against the workspace when relative.
    pub fn resolved_content_path(&self, workspace: &Path) -> Option<PathBuf> {
        let raw = self.content_path.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        let path = Path::new(raw);
        Some(if path.is_absolute() {
            path.to_path_buf()
        } else {
            workspace.join(path)
        })
    }
}

/// Overlays one settings layer. Objects merge key by key so a layer that only
/// names `ui.boot_delay_ms` keeps the other `ui` fields; any other value
/// replaces the slot outright.
fn merge_settings(base: &mut Value, layer: &Value) {
    if let (Some(fields), Some(layer_fields)) = (base.as_object_mut(), layer.as_object()) {
        for (key, value) in layer_fields {
            match fields.get_mut(key) {
                Some(slot) => merge_settings(slot, value),
                None => {
                    fields.insert(key.clone(), value.clone());
                }
            }
        }
        return;
    }
    *base = layer.clone();
}
