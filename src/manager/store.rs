use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;

use crate::details::AppDetails;

use super::wire::parse_store_description;
use super::{DetailFetcher, ManagerError};

/// Serves store descriptions from `<directory>/<name>.json`. Failures are
/// rendered into the description rather than reported as errors.
pub(crate) struct StoreDirectory {
    directory: Url,
    client: Client,
}

impl StoreDirectory {
    pub(crate) fn new(directory: &str, timeout: Duration) -> Result<Self, ManagerError> {
        let directory = Url::parse(directory)
            .map_err(|err| ManagerError::Malformed(format!("store directory {}: {}", directory, err)))?;
        if directory.cannot_be_a_base() {
            return Err(ManagerError::Malformed(format!(
                "store directory {} cannot carry a path",
                directory
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ManagerError::Unreachable(format!("build http client: {}", err)))?;

        Ok(Self { directory, client })
    }

    /// `<directory><name>.json`, with `name` encoded as one path segment.
    pub(crate) fn page_url(&self, name: &str) -> String {
        let mut url = self.directory.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push(&format!("{}.json", name));
        }
        url.to_string()
    }

    fn get_page(&self, url: &str) -> Option<String> {
        let resp = match self.client.get(url).send() {
            Ok(resp) => resp,
            Err(err) => {
                log::warn!("store page {} unavailable: {}", url, err);
                return None;
            }
        };
        if !resp.status().is_success() {
            log::warn!("store page {} returned {}", url, resp.status());
            return None;
        }
        resp.text().ok()
    }
}

impl DetailFetcher for StoreDirectory {
    fn fetch_details(&self, name: &str) -> Result<AppDetails, ManagerError> {
        let url = self.page_url(name);
        let description = match self.get_page(&url) {
            Some(page) => parse_store_description(&page),
            None => format!("Sorry, could not load application info from \"{}\".", url),
        };

        Ok(AppDetails {
            description,
            icon: None,
        })
    }
}
