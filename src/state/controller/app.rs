use std::cell::RefCell;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use chrono::Utc;

use crate::catalog::{
    CachedSnapshot, Screen, available_entries, entry_matches_filter, installed_entries,
    save_snapshot_cache_to_disk,
};
use crate::manager::{AppInstaller, CatalogSource, DetailFetcher};
use crate::state::types::{AppMessage, AppState, CatalogView};
use crate::ui::{Renderer, ScreenView};

/// Remote collaborators a screen talks to.
#[derive(Clone)]
pub(crate) struct Services {
    pub(crate) catalog: Arc<dyn CatalogSource>,
    pub(crate) details: Arc<dyn DetailFetcher>,
    pub(crate) installer: Arc<dyn AppInstaller>,
}

pub(crate) struct AppController {
    pub(crate) state: RefCell<AppState>,
    pub(crate) sender: mpsc::Sender<AppMessage>,
    pub(crate) receiver: mpsc::Receiver<AppMessage>,
    pub(crate) services: Services,
    pub(crate) renderer: Box<dyn Renderer>,
    pub(crate) screen: Screen,
    pub(crate) cache_key: Option<String>,
}

impl AppController {
    pub(crate) fn new(
        services: Services,
        renderer: Box<dyn Renderer>,
        screen: Screen,
        start_view: CatalogView,
    ) -> Self {
        let (sender, receiver) = mpsc::channel();
        let state = AppState {
            last_view: start_view,
            ..AppState::default()
        };

        Self {
            state: RefCell::new(state),
            sender,
            receiver,
            services,
            renderer,
            screen,
            cache_key: None,
        }
    }

    /// Persist every good snapshot under `key` so the next start can show it
    /// before the manager answers.
    pub(crate) fn with_snapshot_cache(mut self, key: String, cached: Option<CachedSnapshot>) -> Self {
        if let Some(cached) = cached {
            let mut state = self.state.borrow_mut();
            state.snapshot = cached.snapshot;
            state.snapshot_received_at = cached.fetched_at;
        }
        self.cache_key = Some(key);
        self
    }

    pub(crate) fn sender(&self) -> mpsc::Sender<AppMessage> {
        self.sender.clone()
    }

    pub(crate) fn handle_message(&self, message: AppMessage) {
        match message {
            AppMessage::CatalogFetched { result } => self.finish_catalog_fetch(result),
            AppMessage::CatalogPushed { snapshot } => {
                log::info!("Catalog push: {} apps", snapshot.total_len());
                self.apply_snapshot(snapshot);
            }
            AppMessage::DetailsLoaded { app, result } => self.finish_details(app, result),
            AppMessage::InstallFinished { app, result } => self.finish_install(app, result),
            AppMessage::UninstallFinished { app, result } => self.finish_uninstall(app, result),
        }
    }

    /// Handles messages until nothing is in flight. Returns `false` if the
    /// deadline passed first.
    pub(crate) fn pump_until_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if !self.state.borrow().is_busy() {
                return true;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok(message) => self.handle_message(message),
                Err(RecvTimeoutError::Timeout) => return false,
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
    }

    /// Blocks on the message channel forever, for subscription-driven screens.
    pub(crate) fn run(&self) {
        while let Ok(message) = self.receiver.recv() {
            self.handle_message(message);
        }
    }

    pub(crate) fn set_list_filter(&self, query: &str) {
        self.state.borrow_mut().list_filter = query.trim().to_lowercase();
        self.render();
    }

    pub(crate) fn render(&self) {
        let state = self.state.borrow();
        let filter = state.list_filter.as_str();
        let installed = installed_entries(&state.presentation.visible_installed, self.screen)
            .into_iter()
            .filter(|entry| entry_matches_filter(entry, filter))
            .collect();
        let available = available_entries(&state.presentation.visible_available)
            .into_iter()
            .filter(|entry| entry_matches_filter(entry, filter))
            .collect();

        let view = ScreenView {
            screen: self.screen,
            catalog_view: state.last_view,
            presentation: &state.presentation,
            installed,
            available,
            detail: state.detail.as_ref(),
            refreshed_at: state.snapshot_received_at,
        };
        self.renderer.render(&view);
    }

    pub(crate) fn persist_snapshot(&self) {
        let Some(key) = self.cache_key.as_deref() else {
            return;
        };
        let cached = {
            let state = self.state.borrow();
            CachedSnapshot {
                fetched_at: state.snapshot_received_at.or_else(|| Some(Utc::now())),
                snapshot: state.snapshot.clone(),
            }
        };
        if let Err(err) = save_snapshot_cache_to_disk(key, &cached) {
            log::warn!("Failed to save snapshot cache: {}", err);
        }
    }
}
