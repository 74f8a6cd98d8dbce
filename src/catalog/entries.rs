use serde::{Deserialize, Serialize};

use crate::types::AppRecord;

const UPGRADABLE_SUFFIX: &str = "(Upgradable)";

#[derive(Clone, Copy, Debug, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Exchange,
    Store,
}

impl Screen {
    pub(crate) fn title(self) -> &'static str {
        match self {
            Screen::Exchange => "App Exchange",
            Screen::Store => "App Store",
        }
    }

    pub(crate) fn marks_upgrades(self) -> bool {
        matches!(self, Screen::Exchange)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListEntry {
    pub name: String,
    pub display: String,
}

pub(crate) fn installed_entries(records: &[AppRecord], screen: Screen) -> Vec<ListEntry> {
    records
        .iter()
        .map(|app| {
            let display = if screen.marks_upgrades() && app.has_upgrade() {
                format!("{} {}", app.display(), UPGRADABLE_SUFFIX)
            } else {
                app.display().to_string()
            };
            ListEntry {
                name: app.name.clone(),
                display,
            }
        })
        .collect()
}

pub(crate) fn available_entries(records: &[AppRecord]) -> Vec<ListEntry> {
    records
        .iter()
        .map(|app| ListEntry {
            name: app.name.clone(),
            display: app.display().to_string(),
        })
        .collect()
}

pub(crate) fn entry_matches_filter(entry: &ListEntry, filter_lower: &str) -> bool {
    let needle = filter_lower.trim();
    if needle.is_empty() {
        return true;
    }

    entry.name.to_lowercase().contains(needle) || entry.display.to_lowercase().contains(needle)
}
