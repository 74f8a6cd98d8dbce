use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::{StatusCode, Url};

use crate::details::AppDetails;
use crate::types::{CatalogSnapshot, OperationOutcome};

use super::wire::{
    parse_app_details, parse_install_outcome, parse_installation_state, parse_uninstall_outcome,
};
use super::{AppInstaller, CatalogSource, DetailFetcher, ManagerError};

/// Talks to the app manager's HTTP bridge.
pub(crate) struct HttpAppManager {
    base_url: String,
    base: Url,
    client: Client,
}

impl HttpAppManager {
    pub(crate) fn new(base_url: &str, timeout: Duration) -> Result<Self, ManagerError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let base = Url::parse(&base_url)
            .map_err(|err| ManagerError::Malformed(format!("manager url {}: {}", base_url, err)))?;
        if base.cannot_be_a_base() {
            return Err(ManagerError::Malformed(format!(
                "manager url {} cannot carry a path",
                base_url
            )));
        }

        let client = Client::builder()
            .user_agent(concat!("app-exchange/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|err| ManagerError::Unreachable(format!("build http client: {}", err)))?;

        Ok(Self {
            base_url,
            base,
            client,
        })
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Appends `segments` to the base path, each percent-encoded as a single
    /// segment so names like `pkg/app` stay one path component.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn read_body(&self, resp: Response, label: &str) -> Result<String, ManagerError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(ManagerError::Unreachable(format!("{} returned {}", label, status)));
        }
        resp.text()
            .map_err(|err| ManagerError::Unreachable(format!("{} body: {}", label, err)))
    }
}

fn send_error(label: &str, err: reqwest::Error) -> ManagerError {
    ManagerError::Unreachable(format!("{}: {}", label, err))
}

impl CatalogSource for HttpAppManager {
    fn fetch(&self, force_remote_refresh: bool) -> Result<CatalogSnapshot, ManagerError> {
        let resp = self
            .client
            .get(self.endpoint(&["apps"]))
            .query(&[("refresh", force_remote_refresh)])
            .send()
            .map_err(|err| send_error("list apps", err))?;

        let body = self.read_body(resp, "list apps")?;
        parse_installation_state(&body)
    }
}

impl DetailFetcher for HttpAppManager {
    fn fetch_details(&self, name: &str) -> Result<AppDetails, ManagerError> {
        let resp = self
            .client
            .get(self.endpoint(&["apps", name]))
            .send()
            .map_err(|err| send_error("app details", err))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(ManagerError::MissingApp(name.to_string()));
        }

        let body = self.read_body(resp, "app details")?;
        parse_app_details(name, &body)
    }
}

impl AppInstaller for HttpAppManager {
    fn install(&self, name: &str) -> Result<OperationOutcome, ManagerError> {
        let resp = self
            .client
            .post(self.endpoint(&["apps", name, "install"]))
            .send()
            .map_err(|err| send_error("install app", err))?;

        let body = self.read_body(resp, "install app")?;
        parse_install_outcome(&body)
    }

    fn uninstall(&self, name: &str) -> Result<OperationOutcome, ManagerError> {
        let resp = self
            .client
            .post(self.endpoint(&["apps", name, "uninstall"]))
            .send()
            .map_err(|err| send_error("uninstall app", err))?;

        let body = self.read_body(resp, "uninstall app")?;
        parse_uninstall_outcome(&body)
    }
}
