use std::thread;

use chrono::Utc;

use crate::catalog::{AppStatus, reconcile};
use crate::details::DetailView;
use crate::manager::ManagerError;
use crate::state::controller::AppController;
use crate::state::types::{AppMessage, CatalogView};
use crate::types::CatalogSnapshot;

impl AppController {
    /// Entering the screen: any earlier selection is dropped, the last known
    /// catalog is drawn, and a fetch is started.
    pub(crate) fn start(&self) {
        self.resume();
        self.refresh_catalog(false);
    }

    pub(crate) fn resume(&self) {
        self.state.borrow_mut().clear_selection();
        self.update();
    }

    /// Starts a catalog fetch unless one is already running, in which case the
    /// request is queued and served when the running fetch lands.
    pub(crate) fn refresh_catalog(&self, force_remote_refresh: bool) {
        {
            let mut state = self.state.borrow_mut();
            if state.catalog_refresh_in_progress {
                let queued = state.pending_refresh.unwrap_or(false);
                state.pending_refresh = Some(queued || force_remote_refresh);
                return;
            }
            state.catalog_refresh_in_progress = true;
        }

        let source = self.services.catalog.clone();
        let sender = self.sender.clone();
        thread::spawn(move || {
            let result = source.fetch(force_remote_refresh);
            let _ = sender.send(AppMessage::CatalogFetched { result });
        });
    }

    pub(crate) fn finish_catalog_fetch(&self, result: Result<CatalogSnapshot, ManagerError>) {
        let pending = {
            let mut state = self.state.borrow_mut();
            state.catalog_refresh_in_progress = false;
            state.pending_refresh.take()
        };

        match result {
            Ok(snapshot) => {
                log::info!(
                    "Installation state: {} available, {} installed",
                    snapshot.available.len(),
                    snapshot.installed.len()
                );
                self.apply_snapshot(snapshot);
                self.persist_snapshot();
            }
            Err(err) => {
                log::error!("Catalog fetch failed: {}", err);
                self.renderer
                    .show_error("Error on List Update!", &err.user_message());
            }
        }

        if let Some(force) = pending {
            self.refresh_catalog(force);
        }
    }

    pub(crate) fn apply_snapshot(&self, snapshot: CatalogSnapshot) {
        {
            let mut state = self.state.borrow_mut();
            state.snapshot = snapshot;
            state.snapshot_received_at = Some(Utc::now());
        }
        self.update();
    }

    /// Re-runs reconciliation against the current snapshot and redraws.
    pub(crate) fn update(&self) {
        {
            let mut state = self.state.borrow_mut();
            let presentation = reconcile(&state.snapshot, state.selected.as_deref());
            if presentation.status == AppStatus::None && state.selected.is_some() {
                log::debug!(
                    "Dropping stale selection {}",
                    state.selected.as_deref().unwrap_or_default()
                );
                state.clear_selection();
            }
            state.presentation = presentation;
        }
        self.render();
    }

    pub(crate) fn select_app(&self, name: &str) {
        {
            let mut state = self.state.borrow_mut();
            state.selected = Some(name.to_string());
            state.detail = Some(DetailView::Loading);
        }
        self.update();

        let resolved = self.state.borrow().selected.is_some();
        if resolved {
            self.request_details(name);
        }
    }

    pub(crate) fn close_detail(&self) {
        self.state.borrow_mut().clear_selection();
        self.update();
    }

    pub(crate) fn show_catalog_view(&self, view: CatalogView) {
        {
            let mut state = self.state.borrow_mut();
            state.last_view = view;
            state.clear_selection();
        }
        self.update();
    }
}
