use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::details::AppDetails;
use crate::types::{CatalogSnapshot, OperationOutcome};

use super::wire::InstallationStateResponse;
use super::{AppInstaller, CatalogSource, DetailFetcher, ManagerError};

#[derive(Deserialize)]
struct SnapshotFile {
    #[serde(flatten)]
    state: InstallationStateResponse,
    #[serde(default)]
    descriptions: HashMap<String, String>,
}

/// Offline source backed by a JSON file in the manager's list format, with an
/// optional `descriptions` map keyed by app name. The file is re-read on every
/// fetch so edits show up as fresh snapshots.
pub(crate) struct SnapshotFileSource {
    path: PathBuf,
}

impl SnapshotFileSource {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<SnapshotFile, ManagerError> {
        let content = fs::read_to_string(&self.path).map_err(|err| {
            ManagerError::Unreachable(format!("{}: {}", self.path.display(), err))
        })?;
        serde_json::from_str(&content)
            .map_err(|err| ManagerError::Malformed(format!("{}: {}", self.path.display(), err)))
    }
}

impl CatalogSource for SnapshotFileSource {
    fn fetch(&self, _force_remote_refresh: bool) -> Result<CatalogSnapshot, ManagerError> {
        self.read().map(|file| CatalogSnapshot::from(file.state))
    }
}

impl DetailFetcher for SnapshotFileSource {
    fn fetch_details(&self, name: &str) -> Result<AppDetails, ManagerError> {
        let file = self.read()?;
        let known = file
            .state
            .installed_apps
            .iter()
            .chain(file.state.available_apps.iter())
            .any(|app| app.name == name);
        if !known {
            return Err(ManagerError::MissingApp(name.to_string()));
        }

        Ok(AppDetails {
            description: file.descriptions.get(name).cloned().unwrap_or_default(),
            icon: None,
        })
    }
}

impl AppInstaller for SnapshotFileSource {
    fn install(&self, _name: &str) -> Result<OperationOutcome, ManagerError> {
        Err(ManagerError::Unsupported("install"))
    }

    fn uninstall(&self, _name: &str) -> Result<OperationOutcome, ManagerError> {
        Err(ManagerError::Unsupported("uninstall"))
    }
}
