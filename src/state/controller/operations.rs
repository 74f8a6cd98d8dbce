use std::thread;

use crate::catalog::AppStatus;
use crate::manager::ManagerError;
use crate::state::controller::AppController;
use crate::state::types::{AppMessage, OperationKind};
use crate::types::OperationOutcome;

impl AppController {
    pub(crate) fn install_selected(&self) -> bool {
        self.start_operation(OperationKind::Install)
    }

    pub(crate) fn uninstall_selected(&self) -> bool {
        self.start_operation(OperationKind::Uninstall)
    }

    /// Kicks off install or uninstall for the current selection when the
    /// reconciled state offers that action. Returns whether a call was made.
    fn start_operation(&self, kind: OperationKind) -> bool {
        let (app, display) = {
            let mut state = self.state.borrow_mut();
            let offered = match kind {
                OperationKind::Install => state.presentation.actions.install,
                OperationKind::Uninstall => state.presentation.actions.uninstall,
            };
            let busy = state.install_in_progress || state.remove_in_progress;
            let Some(app) = state.presentation.effective_selection.clone() else {
                return false;
            };
            if !offered || busy {
                return false;
            }

            let display = state
                .snapshot
                .installed
                .iter()
                .chain(state.snapshot.available.iter())
                .find(|record| record.name == app)
                .map(|record| record.display().to_string())
                .unwrap_or_else(|| app.clone());

            match kind {
                OperationKind::Install => state.install_in_progress = true,
                OperationKind::Uninstall => state.remove_in_progress = true,
            }
            state.last_operation_error = None;
            (app, display)
        };

        self.renderer
            .show_progress(kind.progress_title(), &kind.progress_message(&display));

        let installer = self.services.installer.clone();
        let sender = self.sender.clone();
        thread::spawn(move || {
            let message = match kind {
                OperationKind::Install => {
                    let result = installer.install(&app);
                    AppMessage::InstallFinished { app, result }
                }
                OperationKind::Uninstall => {
                    let result = installer.uninstall(&app);
                    AppMessage::UninstallFinished { app, result }
                }
            };
            let _ = sender.send(message);
        });
        true
    }

    pub(crate) fn finish_install(&self, app: String, result: Result<OperationOutcome, ManagerError>) {
        self.state.borrow_mut().install_in_progress = false;
        self.finish_operation(OperationKind::Install, &app, result);
    }

    pub(crate) fn finish_uninstall(
        &self,
        app: String,
        result: Result<OperationOutcome, ManagerError>,
    ) {
        self.state.borrow_mut().remove_in_progress = false;
        self.finish_operation(OperationKind::Uninstall, &app, result);
    }

    fn finish_operation(
        &self,
        kind: OperationKind,
        app: &str,
        result: Result<OperationOutcome, ManagerError>,
    ) {
        let failure = match result {
            Ok(outcome) if outcome.success => {
                log::info!("{:?} of {} succeeded", kind, app);
                None
            }
            Ok(outcome) => {
                log::warn!("{:?} of {} rejected: {}", kind, app, outcome.message);
                Some((kind.error_title(true), format!("ERROR: {}", outcome.message)))
            }
            Err(err) => {
                log::error!("{:?} of {} failed: {}", kind, app, err);
                Some((kind.error_title(false), err.user_message()))
            }
        };

        if let Some((title, message)) = &failure {
            self.renderer.show_error(title, message);
        }
        self.state.borrow_mut().last_operation_error = failure.map(|(_, message)| message);
        self.renderer.dismiss_progress();
        self.refresh_catalog(false);
    }

    /// Message of the last install or uninstall, if it failed.
    pub(crate) fn last_operation_error(&self) -> Option<String> {
        self.state.borrow().last_operation_error.clone()
    }

    pub(crate) fn selection_status(&self) -> AppStatus {
        self.state.borrow().presentation.status
    }
}
