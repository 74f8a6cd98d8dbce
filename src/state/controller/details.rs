use std::thread;

use crate::details::{AppDetails, DetailView};
use crate::manager::ManagerError;
use crate::state::controller::AppController;
use crate::state::types::AppMessage;

impl AppController {
    pub(crate) fn request_details(&self, app: &str) {
        {
            let mut state = self.state.borrow_mut();
            if state.detail_loading.as_deref() == Some(app) {
                return;
            }
            state.detail_loading = Some(app.to_string());
        }

        let fetcher = self.services.details.clone();
        let sender = self.sender.clone();
        let app = app.to_string();
        thread::spawn(move || {
            let result = fetcher.fetch_details(&app);
            let _ = sender.send(AppMessage::DetailsLoaded { app, result });
        });
    }

    pub(crate) fn finish_details(&self, app: String, result: Result<AppDetails, ManagerError>) {
        let current = {
            let mut state = self.state.borrow_mut();
            if state.detail_loading.as_deref() == Some(app.as_str()) {
                state.detail_loading = None;
            }
            state.selected.as_deref() == Some(app.as_str())
        };

        if !current {
            log::debug!("Ignoring details for {} (no longer selected)", app);
            return;
        }

        match result {
            Ok(details) => {
                if details.icon.is_some() && details.displayable_icon().is_none() {
                    log::debug!("Icon for {} is not displayable, using default", app);
                }
                self.state.borrow_mut().detail = Some(DetailView::Loaded(details));
                self.update();
            }
            Err(err) => {
                log::error!("Details for {} failed: {}", app, err);
                self.close_detail();
                self.renderer
                    .show_error("Error on Details Update!", &err.user_message());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::catalog::{Panel, Screen};
    use crate::state::controller::app::tests::controller_with;
    use crate::testing::{MockManager, errors};
    use crate::types::{CatalogSnapshot, record};

    fn snapshot() -> CatalogSnapshot {
        CatalogSnapshot {
            installed: vec![record("nav", "1.0", "1.0", false)],
            available: vec![record("map", "-", "-", false)],
        }
    }

    #[test]
    fn null_app_reverts_to_catalog_with_error() {
        let mut manager = MockManager::new();
        manager
            .expect_fetch_details()
            .returning(|name| Err(ManagerError::MissingApp(name.to_string())));
        let (controller, events) = controller_with(manager, Screen::Exchange);
        controller.apply_snapshot(snapshot());

        controller.select_app("nav");
        assert!(controller.pump_until_idle(Duration::from_secs(5)));

        let state = controller.state.borrow();
        assert_eq!(state.selected, None);
        assert_eq!(state.presentation.panel, Panel::Catalog);
        assert_eq!(
            errors(&events.borrow()),
            vec![(
                "Error on Details Update!".to_string(),
                "Failed: cannot contact robot! Null application returned".to_string()
            )]
        );
    }

    #[test]
    fn late_details_for_other_app_are_dropped() {
        let (controller, events) = controller_with(MockManager::new(), Screen::Exchange);
        controller.apply_snapshot(snapshot());
        controller.state.borrow_mut().selected = Some("map".to_string());

        controller.finish_details(
            "nav".to_string(),
            Err(ManagerError::Unreachable("timeout".to_string())),
        );

        assert!(errors(&events.borrow()).is_empty());
        assert_eq!(controller.state.borrow().selected.as_deref(), Some("map"));
    }
}
