pub(crate) mod terminal;

use chrono::{DateTime, Utc};

use crate::catalog::{ListEntry, PresentationState, Screen};
use crate::details::DetailView;
use crate::state::types::CatalogView;

pub(crate) use terminal::TerminalRenderer;

/// Everything a front-end needs to draw one frame of a screen.
pub(crate) struct ScreenView<'a> {
    pub(crate) screen: Screen,
    pub(crate) catalog_view: CatalogView,
    pub(crate) presentation: &'a PresentationState,
    pub(crate) installed: Vec<ListEntry>,
    pub(crate) available: Vec<ListEntry>,
    pub(crate) detail: Option<&'a DetailView>,
    pub(crate) refreshed_at: Option<DateTime<Utc>>,
}

impl ScreenView<'_> {
    /// The one list the current catalog view shows, with its heading and the
    /// text for an empty list.
    pub(crate) fn catalog_list(&self) -> (&'static str, &[ListEntry], &'static str) {
        let (entries, empty) = match self.catalog_view {
            CatalogView::InstalledApps => (self.installed.as_slice(), "No apps installed."),
            CatalogView::AppExchange => (self.available.as_slice(), "No apps available."),
        };
        (self.catalog_view.label(), entries, empty)
    }
}

pub(crate) trait Renderer {
    fn render(&self, view: &ScreenView<'_>);
    fn show_progress(&self, title: &str, message: &str);
    fn dismiss_progress(&self);
    fn show_error(&self, title: &str, message: &str);
}
