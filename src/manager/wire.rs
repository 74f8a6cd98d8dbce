use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;

use crate::details::{AppDetails, AppIcon};
use crate::types::{AppRecord, CatalogSnapshot, OperationOutcome};

use super::ManagerError;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct InstallationStateResponse {
    #[serde(default)]
    pub available_apps: Vec<AppRecord>,
    #[serde(default)]
    pub installed_apps: Vec<AppRecord>,
}

impl From<InstallationStateResponse> for CatalogSnapshot {
    fn from(response: InstallationStateResponse) -> Self {
        CatalogSnapshot {
            available: response.available_apps,
            installed: response.installed_apps,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AppDetailsResponse {
    #[serde(default)]
    pub app: Option<ExchangeAppDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExchangeAppDetail {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<WireIcon>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireIcon {
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub data: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InstallResponse {
    pub installed: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UninstallResponse {
    pub uninstalled: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StoreEntry {
    pub description: Option<serde_json::Value>,
}

pub(crate) fn parse_installation_state(body: &str) -> Result<CatalogSnapshot, ManagerError> {
    serde_json::from_str::<InstallationStateResponse>(body)
        .map(CatalogSnapshot::from)
        .map_err(|err| ManagerError::Malformed(format!("installation state: {}", err)))
}

pub(crate) fn parse_app_details(name: &str, body: &str) -> Result<AppDetails, ManagerError> {
    let response = serde_json::from_str::<AppDetailsResponse>(body)
        .map_err(|err| ManagerError::Malformed(format!("app details: {}", err)))?;

    let Some(app) = response.app else {
        return Err(ManagerError::MissingApp(name.to_string()));
    };

    let icon = match app.icon {
        Some(icon) => Some(decode_icon(icon)?),
        None => None,
    };

    Ok(AppDetails {
        description: app.description,
        icon,
    })
}

fn decode_icon(icon: WireIcon) -> Result<AppIcon, ManagerError> {
    let trimmed = icon.data.trim();
    let data = if trimmed.is_empty() {
        Vec::new()
    } else {
        STANDARD
            .decode(trimmed)
            .map_err(|err| ManagerError::Malformed(format!("icon data: {}", err)))?
    };

    Ok(AppIcon {
        format: icon.format.trim().to_lowercase(),
        data,
    })
}

pub(crate) fn parse_install_outcome(body: &str) -> Result<OperationOutcome, ManagerError> {
    serde_json::from_str::<InstallResponse>(body)
        .map(|response| OperationOutcome {
            success: response.installed,
            message: response.message,
        })
        .map_err(|err| ManagerError::Malformed(format!("install response: {}", err)))
}

pub(crate) fn parse_uninstall_outcome(body: &str) -> Result<OperationOutcome, ManagerError> {
    serde_json::from_str::<UninstallResponse>(body)
        .map(|response| OperationOutcome {
            success: response.uninstalled,
            message: response.message,
        })
        .map_err(|err| ManagerError::Malformed(format!("uninstall response: {}", err)))
}

/// Store pages carry a free-form `description`; anything else is reported as a
/// failed view of the raw page.
pub(crate) fn parse_store_description(page: &str) -> String {
    let description = serde_json::from_str::<StoreEntry>(page)
        .ok()
        .and_then(|entry| entry.description)
        .map(|value| match value {
            serde_json::Value::String(text) => text,
            other => other.to_string(),
        });

    match description {
        Some(text) => text,
        None => format!("Sorry, this view failed for the file: {}", page),
    }
}
