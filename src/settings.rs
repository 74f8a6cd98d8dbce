use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::Screen;
use crate::state::types::CatalogView;

const APP_SETTINGS_FILE: &str = "settings.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_manager_url")]
    pub manager_url: String,
    #[serde(default)]
    pub store_directory: Option<String>,
    #[serde(default)]
    pub default_screen: Screen,
    #[serde(default)]
    pub start_view: CatalogView,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_cache_snapshots")]
    pub cache_snapshots: bool,
}

fn default_manager_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_cache_snapshots() -> bool {
    true
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            manager_url: default_manager_url(),
            store_directory: None,
            default_screen: Screen::Exchange,
            start_view: CatalogView::InstalledApps,
            poll_interval_secs: default_poll_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            cache_snapshots: default_cache_snapshots(),
        }
    }
}

impl AppSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

pub fn load_app_settings() -> AppSettings {
    match app_settings_path() {
        Some(path) => load_app_settings_from(&path),
        None => AppSettings::default(),
    }
}

pub fn save_app_settings(settings: &AppSettings) -> Result<(), String> {
    let Some(path) = app_settings_path() else {
        return Err("Unable to determine settings directory".to_string());
    };
    save_app_settings_to(&path, settings)
}

fn load_app_settings_from(path: &Path) -> AppSettings {
    let Ok(content) = fs::read_to_string(path) else {
        return AppSettings::default();
    };

    serde_json::from_str(&content).unwrap_or_else(|err| {
        log::warn!("Ignoring invalid settings at {}: {}", path.display(), err);
        AppSettings::default()
    })
}

fn save_app_settings_to(path: &Path, settings: &AppSettings) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| format!("Failed to create settings directory: {}", err))?;
    }

    let data = serde_json::to_string_pretty(settings)
        .map_err(|err| format!("Failed to serialize settings: {}", err))?;

    fs::write(path, data).map_err(|err| format!("Failed to write settings: {}", err))
}

fn app_config_dir() -> Option<PathBuf> {
    if let Ok(custom) = env::var("APP_EXCHANGE_CONFIG_DIR") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        let trimmed = config_home.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed).join("app-exchange"));
        }
    }

    if let Ok(home) = env::var("HOME") {
        let trimmed = home.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed).join(".config").join("app-exchange"));
        }
    }

    None
}

pub(crate) fn app_settings_path() -> Option<PathBuf> {
    app_config_dir().map(|dir| dir.join(APP_SETTINGS_FILE))
}
