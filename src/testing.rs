use std::cell::RefCell;
use std::rc::Rc;

use mockall::mock;

use crate::catalog::{AppStatus, Panel};
use crate::details::AppDetails;
use crate::manager::{AppInstaller, CatalogSource, DetailFetcher, ManagerError};
use crate::state::types::CatalogView;
use crate::types::{CatalogSnapshot, OperationOutcome};
use crate::ui::{Renderer, ScreenView};

mock! {
    pub Manager {}

    impl CatalogSource for Manager {
        fn fetch(&self, force_remote_refresh: bool) -> Result<CatalogSnapshot, ManagerError>;
    }

    impl DetailFetcher for Manager {
        fn fetch_details(&self, name: &str) -> Result<AppDetails, ManagerError>;
    }

    impl AppInstaller for Manager {
        fn install(&self, name: &str) -> Result<OperationOutcome, ManagerError>;
        fn uninstall(&self, name: &str) -> Result<OperationOutcome, ManagerError>;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum RenderEvent {
    Frame {
        panel: Panel,
        status: AppStatus,
        label: String,
        catalog_view: CatalogView,
        installed: Vec<String>,
        available: Vec<String>,
        installed_display: Vec<String>,
        shown: Vec<String>,
        detail: Option<String>,
    },
    Progress {
        title: String,
        message: String,
    },
    ProgressDismissed,
    Error {
        title: String,
        message: String,
    },
}

/// Renderer that records every call for later assertions.
#[derive(Default)]
pub(crate) struct RecordingRenderer {
    pub(crate) events: Rc<RefCell<Vec<RenderEvent>>>,
}

impl Renderer for RecordingRenderer {
    fn render(&self, view: &ScreenView<'_>) {
        let shown = match view.presentation.panel {
            Panel::Catalog => view
                .catalog_list()
                .1
                .iter()
                .map(|entry| entry.name.clone())
                .collect(),
            Panel::Detail => Vec::new(),
        };
        self.events.borrow_mut().push(RenderEvent::Frame {
            panel: view.presentation.panel,
            status: view.presentation.status,
            label: view.presentation.label.clone(),
            catalog_view: view.catalog_view,
            installed: view.installed.iter().map(|entry| entry.name.clone()).collect(),
            available: view.available.iter().map(|entry| entry.name.clone()).collect(),
            installed_display: view
                .installed
                .iter()
                .map(|entry| entry.display.clone())
                .collect(),
            shown,
            detail: view.detail.map(|detail| detail.description().to_string()),
        });
    }

    fn show_progress(&self, title: &str, message: &str) {
        self.events.borrow_mut().push(RenderEvent::Progress {
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    fn dismiss_progress(&self) {
        self.events.borrow_mut().push(RenderEvent::ProgressDismissed);
    }

    fn show_error(&self, title: &str, message: &str) {
        self.events.borrow_mut().push(RenderEvent::Error {
            title: title.to_string(),
            message: message.to_string(),
        });
    }
}

pub(crate) fn errors(events: &[RenderEvent]) -> Vec<(String, String)> {
    events
        .iter()
        .filter_map(|event| match event {
            RenderEvent::Error { title, message } => Some((title.clone(), message.clone())),
            _ => None,
        })
        .collect()
}

pub(crate) fn last_frame(events: &[RenderEvent]) -> Option<&RenderEvent> {
    events
        .iter()
        .rev()
        .find(|event| matches!(event, RenderEvent::Frame { .. }))
}
