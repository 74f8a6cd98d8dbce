use crate::types::{AppRecord, CatalogSnapshot};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub enum AppStatus {
    #[default]
    None,
    Installed,
    InstalledUpgradable,
    Available,
}

impl AppStatus {
    pub(crate) fn suffix(self) -> Option<&'static str> {
        match self {
            AppStatus::None => None,
            AppStatus::Installed => Some("(Installed)"),
            AppStatus::InstalledUpgradable => Some("(Installed, Upgrade Available)"),
            AppStatus::Available => Some("(Not Installed)"),
        }
    }

    pub(crate) fn actions(self) -> ActionVisibility {
        match self {
            AppStatus::None => ActionVisibility::default(),
            AppStatus::Installed => ActionVisibility {
                install: false,
                uninstall: true,
                install_label: INSTALL_LABEL,
            },
            AppStatus::InstalledUpgradable => ActionVisibility {
                install: true,
                uninstall: true,
                install_label: UPGRADE_LABEL,
            },
            AppStatus::Available => ActionVisibility {
                install: true,
                uninstall: false,
                install_label: INSTALL_LABEL,
            },
        }
    }

    pub(crate) fn panel(self) -> Panel {
        match self {
            AppStatus::None => Panel::Catalog,
            _ => Panel::Detail,
        }
    }
}

const INSTALL_LABEL: &str = "Install";
const UPGRADE_LABEL: &str = "Upgrade";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ActionVisibility {
    pub install: bool,
    pub uninstall: bool,
    pub install_label: &'static str,
}

impl Default for ActionVisibility {
    fn default() -> Self {
        Self {
            install: false,
            uninstall: false,
            install_label: INSTALL_LABEL,
        }
    }
}

/// Which half of the screen is showing: the catalog lists or the detail panel.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub enum Panel {
    #[default]
    Catalog,
    Detail,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PresentationState {
    pub visible_installed: Vec<AppRecord>,
    pub visible_available: Vec<AppRecord>,
    pub status: AppStatus,
    pub effective_selection: Option<String>,
    pub label: String,
    pub actions: ActionVisibility,
    pub panel: Panel,
}

pub fn filter_visible(records: &[AppRecord]) -> Vec<AppRecord> {
    records.iter().filter(|app| !app.hidden).cloned().collect()
}

pub(crate) fn find_app<'a>(records: &'a [AppRecord], name: &str) -> Option<&'a AppRecord> {
    records.iter().find(|app| app.name == name)
}

/// Computes what the screen should show for `snapshot` with `selected` as the
/// chosen app.
///
/// Hidden records never reach the visible lists, but the selection lookup runs
/// over the unfiltered lists so a hidden app stays selectable. A selection that
/// resolves in neither list is dropped and the result falls back to the catalog.
pub fn reconcile(snapshot: &CatalogSnapshot, selected: Option<&str>) -> PresentationState {
    let visible_installed = filter_visible(&snapshot.installed);
    let visible_available = filter_visible(&snapshot.available);

    let resolved = selected.and_then(|name| {
        if let Some(app) = find_app(&snapshot.installed, name) {
            let status = if app.has_upgrade() {
                AppStatus::InstalledUpgradable
            } else {
                AppStatus::Installed
            };
            Some((app, status))
        } else {
            find_app(&snapshot.available, name).map(|app| (app, AppStatus::Available))
        }
    });

    let (effective_selection, status, label) = match resolved {
        Some((app, status)) => {
            let label = match status.suffix() {
                Some(suffix) => format!("{} {}", app.display(), suffix),
                None => String::new(),
            };
            (Some(app.name.clone()), status, label)
        }
        None => (None, AppStatus::None, String::new()),
    };

    PresentationState {
        visible_installed,
        visible_available,
        status,
        effective_selection,
        label,
        actions: status.actions(),
        panel: status.panel(),
    }
}
