use crate::model::{IconSettings, OpenMethod, SidebarSettings};
use crate::transition::TransitionConfig;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub icon_settings: IconSettings,
    #[serde(default)]
    pub open_method: OpenMethod,
    #[serde(default)]
    pub sidebar: SidebarSettings,
    #[serde(default = "default_scroll_switch")]
    pub scroll_switch_enabled: bool,
    #[serde(default = "default_debounce_ms")]
    pub scroll_debounce_ms: u64,
    #[serde(default = "default_animation_ms")]
    pub switch_animation_ms: u64,
    #[serde(default)]
    pub active_category: Option<String>,
    #[serde(default)]
    pub last_size: Option<(f32, f32)>,
}

fn default_scroll_switch() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    100
}

fn default_animation_ms() -> u64 {
    500
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            icon_settings: IconSettings::default(),
            open_method: OpenMethod::default(),
            sidebar: SidebarSettings::default(),
            scroll_switch_enabled: default_scroll_switch(),
            scroll_debounce_ms: default_debounce_ms(),
            switch_animation_ms: default_animation_ms(),
            active_category: None,
            last_size: None,
        }
    }
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "start_deck", "start_deck")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Missing file gives defaults silently; an unreadable one is logged first.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::File::open(path) {
            Ok(file) => match serde_json::from_reader(std::io::BufReader::new(file)) {
                Ok(config) => config,
                Err(err) => {
                    warn!("Failed to parse config {}, using default: {err}", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                warn!("Failed to open config {}: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(dir) = path.parent() {
            if let Err(err) = std::fs::create_dir_all(dir) {
                warn!("Failed to create config dir {}: {err}", dir.display());
                return;
            }
        }
        match std::fs::File::create(path) {
            Ok(file) => {
                if let Err(err) = serde_json::to_writer_pretty(file, self) {
                    warn!("Failed to write config {}: {err}", path.display());
                }
            }
            Err(err) => warn!("Failed to create config {}: {err}", path.display()),
        }
    }

    pub fn transition_config(&self) -> TransitionConfig {
        TransitionConfig {
            enabled: self.scroll_switch_enabled,
            debounce: Duration::from_millis(self.scroll_debounce_ms),
            animation_window: Duration::from_millis(self.switch_animation_ms),
        }
    }
}
