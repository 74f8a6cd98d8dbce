mod file;
mod http;
mod store;
mod subscription;
mod wire;

use thiserror::Error;

use crate::details::AppDetails;
use crate::types::{CatalogSnapshot, OperationOutcome};

pub(crate) use file::SnapshotFileSource;
pub(crate) use http::HttpAppManager;
pub(crate) use store::StoreDirectory;
pub(crate) use subscription::subscribe;

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum ManagerError {
    #[error("cannot contact robot: {0}")]
    Unreachable(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("null application returned for {0}")]
    MissingApp(String),
    #[error("{0} is not supported by this source")]
    Unsupported(&'static str),
}

impl ManagerError {
    /// Text shown in the acknowledgement dialog.
    pub(crate) fn user_message(&self) -> String {
        match self {
            ManagerError::Unreachable(detail) => {
                format!("Failed: cannot contact robot: {}", detail)
            }
            ManagerError::MissingApp(_) => {
                "Failed: cannot contact robot! Null application returned".to_string()
            }
            other => format!("Failed: {}", other),
        }
    }
}

pub trait CatalogSource: Send + Sync {
    fn fetch(&self, force_remote_refresh: bool) -> Result<CatalogSnapshot, ManagerError>;
}

pub trait DetailFetcher: Send + Sync {
    fn fetch_details(&self, name: &str) -> Result<AppDetails, ManagerError>;
}

pub trait AppInstaller: Send + Sync {
    fn install(&self, name: &str) -> Result<OperationOutcome, ManagerError>;
    fn uninstall(&self, name: &str) -> Result<OperationOutcome, ManagerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_message_names_the_robot() {
        let err = ManagerError::Unreachable("connection refused".to_string());
        assert_eq!(
            err.user_message(),
            "Failed: cannot contact robot: connection refused"
        );
        assert_eq!(
            ManagerError::Malformed("bad json".to_string()).user_message(),
            "Failed: malformed response: bad json"
        );
    }
}
