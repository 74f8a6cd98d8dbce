mod catalog;
mod details;
mod helpers;
mod manager;
mod settings;
mod state;
#[cfg(test)]
mod testing;
mod types;
mod ui;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};

use crate::catalog::{AppStatus, Screen, load_snapshot_cache_from_disk};
use crate::helpers::{normalize_manager_url, normalize_store_directory};
use crate::manager::{DetailFetcher, HttpAppManager, SnapshotFileSource, StoreDirectory, subscribe};
use crate::settings::{AppSettings, app_settings_path, load_app_settings, save_app_settings};
use crate::state::controller::{AppController, Services};
use crate::state::types::CatalogView;
use crate::ui::TerminalRenderer;

#[derive(Parser)]
#[command(name = "app-exchange", version, about = "Browse and manage robot applications")]
struct Cli {
    /// Base URL of the app manager bridge (overrides settings)
    #[arg(long, global = true)]
    manager_url: Option<String>,

    /// Serve the catalog from a JSON file instead of the app manager
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    #[arg(long, global = true, value_enum)]
    screen: Option<ScreenArg>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show installed and available apps
    List {
        /// Ask the manager to refresh its remote listing first
        #[arg(long)]
        refresh: bool,
        #[arg(long)]
        filter: Option<String>,
        #[arg(long, value_enum)]
        view: Option<ViewArg>,
    },
    /// Show the detail panel for one app
    Show { name: String },
    Install { name: String },
    Uninstall { name: String },
    /// Keep the catalog on screen and redraw on every change
    Watch,
    /// Store defaults in the settings file
    Configure {
        #[arg(long)]
        manager_url: Option<String>,
        #[arg(long)]
        store_directory: Option<String>,
        #[arg(long, value_enum)]
        screen: Option<ScreenArg>,
        #[arg(long, value_enum)]
        view: Option<ViewArg>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ScreenArg {
    Exchange,
    Store,
}

impl From<ScreenArg> for Screen {
    fn from(value: ScreenArg) -> Self {
        match value {
            ScreenArg::Exchange => Screen::Exchange,
            ScreenArg::Store => Screen::Store,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ViewArg {
    Installed,
    Available,
}

impl From<ViewArg> for CatalogView {
    fn from(value: ViewArg) -> Self {
        match value {
            ViewArg::Installed => CatalogView::InstalledApps,
            ViewArg::Available => CatalogView::AppExchange,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut settings = load_app_settings();
    if let Some(url) = cli.manager_url.as_deref() {
        settings.manager_url = normalize_manager_url(url);
    }
    if let Some(screen) = cli.screen {
        settings.default_screen = screen.into();
    }

    match cli.command {
        Command::Configure {
            manager_url,
            store_directory,
            screen,
            view,
        } => configure(settings, manager_url, store_directory, screen, view),
        command => run_screen(&settings, cli.snapshot, command),
    }
}

fn configure(
    mut settings: AppSettings,
    manager_url: Option<String>,
    store_directory: Option<String>,
    screen: Option<ScreenArg>,
    view: Option<ViewArg>,
) -> Result<()> {
    if let Some(url) = manager_url {
        settings.manager_url = normalize_manager_url(&url);
    }
    if let Some(directory) = store_directory {
        settings.store_directory = Some(normalize_store_directory(&directory));
    }
    if let Some(screen) = screen {
        settings.default_screen = screen.into();
    }
    if let Some(view) = view {
        settings.start_view = view.into();
    }

    save_app_settings(&settings).map_err(anyhow::Error::msg)?;
    if let Some(path) = app_settings_path() {
        log::info!("Saved settings to {}", path.display());
    }
    Ok(())
}

fn build_controller(settings: &AppSettings, snapshot: Option<PathBuf>) -> Result<AppController> {
    let screen = settings.default_screen;
    let renderer = Box::new(TerminalRenderer::new(io::stdout()));

    if let Some(path) = snapshot {
        let source = Arc::new(SnapshotFileSource::new(path));
        log::info!("Serving catalog from {}", source.path().display());
        let services = Services {
            catalog: source.clone(),
            details: source.clone(),
            installer: source,
        };
        return Ok(AppController::new(services, renderer, screen, settings.start_view));
    }

    let manager = Arc::new(
        HttpAppManager::new(&settings.manager_url, settings.request_timeout())
            .with_context(|| format!("connect to app manager at {}", settings.manager_url))?,
    );

    let details = detail_source(screen, settings, manager.clone())?;

    let services = Services {
        catalog: manager.clone(),
        details,
        installer: manager.clone(),
    };
    let controller = AppController::new(services, renderer, screen, settings.start_view);

    if settings.cache_snapshots {
        let key = manager.base_url().to_string();
        let cached = load_snapshot_cache_from_disk(&key);
        Ok(controller.with_snapshot_cache(key, cached))
    } else {
        Ok(controller)
    }
}

/// The Store screen reads details from its store directory; the Exchange
/// screen asks the manager.
fn detail_source(
    screen: Screen,
    settings: &AppSettings,
    manager: Arc<HttpAppManager>,
) -> Result<Arc<dyn DetailFetcher>> {
    match (screen, settings.store_directory.as_deref()) {
        (Screen::Exchange, _) => Ok(manager as Arc<dyn DetailFetcher>),
        (Screen::Store, Some(directory)) => {
            let store =
                StoreDirectory::new(&normalize_store_directory(directory), settings.request_timeout())
                    .context("build store client")?;
            Ok(Arc::new(store) as Arc<dyn DetailFetcher>)
        }
        (Screen::Store, None) => bail!(
            "the store screen needs a store directory (run `app-exchange configure --store-directory <url>`)"
        ),
    }
}

fn run_screen(settings: &AppSettings, snapshot: Option<PathBuf>, command: Command) -> Result<()> {
    let controller = build_controller(settings, snapshot)?;
    let wait = settings.request_timeout() * 3 + Duration::from_secs(1);

    if matches!(command, Command::List { refresh: true, .. }) {
        controller.resume();
        controller.refresh_catalog(true);
    } else {
        controller.start();
    }
    if !controller.pump_until_idle(wait) {
        bail!("timed out waiting for the app manager");
    }

    match command {
        Command::List { filter, view, .. } => {
            if let Some(view) = view {
                controller.show_catalog_view(view.into());
            }
            if let Some(filter) = filter {
                controller.set_list_filter(&filter);
            }
        }
        Command::Show { name } => {
            select(&controller, &name, wait)?;
        }
        Command::Install { name } => {
            select(&controller, &name, wait)?;
            if !controller.install_selected() {
                bail!("{} cannot be installed (already up to date)", name);
            }
            finish_operation(&controller, "install", &name, wait)?;
        }
        Command::Uninstall { name } => {
            select(&controller, &name, wait)?;
            if !controller.uninstall_selected() {
                bail!("{} is not installed", name);
            }
            finish_operation(&controller, "uninstall", &name, wait)?;
        }
        Command::Watch => {
            let _subscription = subscribe(
                controller.services.catalog.clone(),
                settings.poll_interval(),
                controller.sender(),
            );
            controller.run();
        }
        Command::Configure { .. } => {}
    }

    Ok(())
}

fn finish_operation(
    controller: &AppController,
    action: &str,
    name: &str,
    wait: Duration,
) -> Result<()> {
    if !controller.pump_until_idle(wait) {
        bail!("timed out waiting for {} of {}", action, name);
    }
    if let Some(message) = controller.last_operation_error() {
        bail!("{} of {} failed: {}", action, name, message);
    }
    Ok(())
}

fn select(controller: &AppController, name: &str, wait: Duration) -> Result<()> {
    controller.select_app(name);
    if !controller.pump_until_idle(wait) {
        bail!("timed out loading details for {}", name);
    }
    if controller.selection_status() == AppStatus::None {
        bail!("{} is not in the catalog", name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> Arc<HttpAppManager> {
        Arc::new(
            HttpAppManager::new("http://robot.local:8080", Duration::from_secs(1)).expect("client"),
        )
    }

    #[test]
    fn store_screen_requires_store_directory() {
        let settings = AppSettings::default();
        let err = detail_source(Screen::Store, &settings, manager())
            .err()
            .expect("missing directory is an error");
        assert!(err.to_string().contains("store directory"));
    }

    #[test]
    fn store_screen_with_directory_and_exchange_screen_resolve() {
        let settings = AppSettings {
            store_directory: Some("http://apps.example.org/store".to_string()),
            ..AppSettings::default()
        };
        assert!(detail_source(Screen::Store, &settings, manager()).is_ok());
        assert!(detail_source(Screen::Exchange, &AppSettings::default(), manager()).is_ok());
    }
}
