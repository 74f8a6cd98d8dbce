use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::PresentationState;
use crate::details::{AppDetails, DetailView};
use crate::manager::ManagerError;
use crate::types::{CatalogSnapshot, OperationOutcome};

#[derive(Default)]
pub(crate) struct AppState {
    pub(crate) snapshot: CatalogSnapshot,
    pub(crate) snapshot_received_at: Option<DateTime<Utc>>,
    pub(crate) selected: Option<String>,
    pub(crate) last_view: CatalogView,
    pub(crate) presentation: PresentationState,
    pub(crate) detail: Option<DetailView>,
    pub(crate) detail_loading: Option<String>,
    pub(crate) catalog_refresh_in_progress: bool,
    pub(crate) pending_refresh: Option<bool>,
    pub(crate) install_in_progress: bool,
    pub(crate) remove_in_progress: bool,
    pub(crate) last_operation_error: Option<String>,
    pub(crate) list_filter: String,
}

impl AppState {
    pub(crate) fn is_busy(&self) -> bool {
        self.catalog_refresh_in_progress
            || self.detail_loading.is_some()
            || self.install_in_progress
            || self.remove_in_progress
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selected = None;
        self.detail = None;
        self.detail_loading = None;
    }
}

/// The catalog list the screen falls back to when no app is selected.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogView {
    #[default]
    InstalledApps,
    AppExchange,
}

impl CatalogView {
    pub(crate) fn label(self) -> &'static str {
        match self {
            CatalogView::InstalledApps => "Installed Apps",
            CatalogView::AppExchange => "Available Apps",
        }
    }
}

pub(crate) enum AppMessage {
    CatalogFetched {
        result: Result<CatalogSnapshot, ManagerError>,
    },
    CatalogPushed {
        snapshot: CatalogSnapshot,
    },
    DetailsLoaded {
        app: String,
        result: Result<AppDetails, ManagerError>,
    },
    InstallFinished {
        app: String,
        result: Result<OperationOutcome, ManagerError>,
    },
    UninstallFinished {
        app: String,
        result: Result<OperationOutcome, ManagerError>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum OperationKind {
    Install,
    Uninstall,
}

impl OperationKind {
    pub(crate) fn progress_title(self) -> &'static str {
        match self {
            OperationKind::Install => "Installing App",
            OperationKind::Uninstall => "Uninstalling App",
        }
    }

    pub(crate) fn progress_message(self, display: &str) -> String {
        match self {
            OperationKind::Install => format!("Installing {}...", display),
            OperationKind::Uninstall => format!("Uninstalling {}...", display),
        }
    }

    /// Dialog title for a failed operation. The manager refusing an uninstall
    /// and failing to answer one are titled differently.
    pub(crate) fn error_title(self, rejected: bool) -> &'static str {
        match (self, rejected) {
            (OperationKind::Install, _) => "Error on Installation!",
            (OperationKind::Uninstall, true) => "Error on Uninstallation!",
            (OperationKind::Uninstall, false) => "Error on Uninstallation",
        }
    }
}
