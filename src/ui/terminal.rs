use std::cell::RefCell;
use std::io::Write;

use crate::catalog::{ListEntry, Panel};
use crate::helpers::format_relative_time;

use super::{Renderer, ScreenView};

/// Plain-text front-end: prints each frame as a list or detail panel.
pub(crate) struct TerminalRenderer<W: Write> {
    out: RefCell<W>,
}

impl<W: Write> TerminalRenderer<W> {
    pub(crate) fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn emit(&self, text: &str) {
        let mut out = self.out.borrow_mut();
        if let Err(err) = writeln!(out, "{}", text).and_then(|_| out.flush()) {
            log::warn!("Failed to write to terminal: {}", err);
        }
    }
}

fn render_list(frame: &mut String, heading: &str, entries: &[ListEntry], empty: &str) {
    frame.push_str(heading);
    frame.push('\n');
    if entries.is_empty() {
        frame.push_str(&format!("  {}\n", empty));
        return;
    }
    for entry in entries {
        frame.push_str(&format!("  {:<24} {}\n", entry.name, entry.display));
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&self, view: &ScreenView<'_>) {
        let mut frame = String::new();
        frame.push_str(&format!("== {} ==\n", view.screen.title()));

        match view.presentation.panel {
            Panel::Catalog => {
                let (heading, entries, empty) = view.catalog_list();
                render_list(&mut frame, heading, entries, empty);
            }
            Panel::Detail => {
                frame.push_str(&view.presentation.label);
                frame.push('\n');
                if let Some(detail) = view.detail {
                    frame.push_str(detail.description());
                    frame.push('\n');
                }
                let actions = view.presentation.actions;
                let mut buttons = Vec::new();
                if actions.install {
                    buttons.push(format!("[{}]", actions.install_label));
                }
                if actions.uninstall {
                    buttons.push("[Uninstall]".to_string());
                }
                if !buttons.is_empty() {
                    frame.push_str(&buttons.join(" "));
                    frame.push('\n');
                }
            }
        }

        let footer = match view.refreshed_at {
            Some(at) => format!("Last refreshed {}", format_relative_time(at)),
            None => "Last refreshed never".to_string(),
        };
        frame.push_str(&footer);

        self.emit(&frame);
    }

    fn show_progress(&self, title: &str, message: &str) {
        self.emit(&format!("{}: {}", title, message));
    }

    fn dismiss_progress(&self) {}

    fn show_error(&self, title: &str, message: &str) {
        self.emit(&format!("{}\n{}", title, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Screen, reconcile};
    use crate::details::DetailView;
    use crate::state::types::CatalogView;
    use crate::types::{CatalogSnapshot, record};

    fn entry(name: &str, display: &str) -> ListEntry {
        ListEntry {
            name: name.to_string(),
            display: display.to_string(),
        }
    }

    fn rendered(
        catalog_view: CatalogView,
        selected: Option<&str>,
        detail: Option<&DetailView>,
    ) -> String {
        let snapshot = CatalogSnapshot {
            installed: vec![record("nav", "1.0", "2.0", false)],
            available: vec![record("map", "-", "-", false)],
        };
        let presentation = reconcile(&snapshot, selected);
        let view = ScreenView {
            screen: Screen::Exchange,
            catalog_view,
            presentation: &presentation,
            installed: vec![entry("nav", "nav (Upgradable)")],
            available: vec![entry("map", "Map")],
            detail,
            refreshed_at: None,
        };
        let renderer = TerminalRenderer::new(Vec::new());
        renderer.render(&view);
        String::from_utf8(renderer.into_inner()).expect("utf8")
    }

    #[test]
    fn installed_view_prints_only_installed_list() {
        let text = rendered(CatalogView::InstalledApps, None, None);
        assert!(text.contains("== App Exchange =="));
        assert!(text.contains("Installed Apps"));
        assert!(text.contains("nav (Upgradable)"));
        assert!(!text.contains("Available Apps"));
        assert!(!text.contains("Map"));
        assert!(text.contains("Last refreshed never"));
    }

    #[test]
    fn exchange_view_prints_only_available_list() {
        let text = rendered(CatalogView::AppExchange, None, None);
        assert!(text.contains("Available Apps"));
        assert!(text.contains("Map"));
        assert!(!text.contains("Installed Apps"));
        assert!(!text.contains("nav (Upgradable)"));
    }

    #[test]
    fn empty_view_says_so() {
        let presentation = reconcile(&CatalogSnapshot::default(), None);
        let view = ScreenView {
            screen: Screen::Store,
            catalog_view: CatalogView::AppExchange,
            presentation: &presentation,
            installed: Vec::new(),
            available: Vec::new(),
            detail: None,
            refreshed_at: None,
        };
        let renderer = TerminalRenderer::new(Vec::new());
        renderer.render(&view);
        let text = String::from_utf8(renderer.into_inner()).expect("utf8");
        assert!(text.contains("== App Store =="));
        assert!(text.contains("No apps available."));
    }

    #[test]
    fn detail_frame_shows_label_and_buttons() {
        let text = rendered(CatalogView::AppExchange, Some("nav"), Some(&DetailView::Loading));
        assert!(text.contains("nav (Installed, Upgrade Available)"));
        assert!(text.contains("Loading..."));
        assert!(text.contains("[Upgrade] [Uninstall]"));
        assert!(!text.contains("Available Apps"));
    }
}
