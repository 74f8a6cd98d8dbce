use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct AppRecord {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub latest_version: String,
    #[serde(default)]
    pub hidden: bool,
}

impl AppRecord {
    pub(crate) fn display(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }

    pub(crate) fn has_upgrade(&self) -> bool {
        self.version != self.latest_version
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub available: Vec<AppRecord>,
    #[serde(default)]
    pub installed: Vec<AppRecord>,
}

impl CatalogSnapshot {
    pub(crate) fn total_len(&self) -> usize {
        self.available.len() + self.installed.len()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OperationOutcome {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
pub(crate) fn record(name: &str, version: &str, latest: &str, hidden: bool) -> AppRecord {
    AppRecord {
        name: name.to_string(),
        display_name: name.to_string(),
        version: version.to_string(),
        latest_version: latest.to_string(),
        hidden,
    }
}
