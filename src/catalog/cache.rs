use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AppRecord, CatalogSnapshot};

const SNAPSHOT_CACHE_FILE: &str = "snapshot.json";
pub(crate) const SNAPSHOT_CACHE_VERSION: u32 = 1;

#[derive(Clone, Debug)]
pub struct CachedSnapshot {
    pub fetched_at: Option<DateTime<Utc>>,
    pub snapshot: CatalogSnapshot,
}

#[derive(Serialize, Deserialize)]
struct SnapshotCacheFile {
    version: u32,
    manager_url: String,
    fetched_at: Option<String>,
    available: Vec<AppRecord>,
    installed: Vec<AppRecord>,
}

/// Reads the last snapshot stored for `manager_url`. A missing, unreadable,
/// or foreign-version file yields `None`.
pub(crate) fn load_snapshot_cache_from_disk(manager_url: &str) -> Option<CachedSnapshot> {
    load_snapshot_cache(&snapshot_cache_path()?, manager_url)
}

pub(crate) fn save_snapshot_cache_to_disk(
    manager_url: &str,
    cached: &CachedSnapshot,
) -> Result<(), String> {
    let Some(path) = snapshot_cache_path() else {
        return Err("Unable to determine snapshot cache directory".to_string());
    };
    save_snapshot_cache(&path, manager_url, cached)
}

fn load_snapshot_cache(path: &Path, manager_url: &str) -> Option<CachedSnapshot> {
    let content = fs::read_to_string(path).ok()?;
    let file = serde_json::from_str::<SnapshotCacheFile>(&content).ok()?;

    if file.version != SNAPSHOT_CACHE_VERSION || file.manager_url != manager_url {
        return None;
    }

    Some(CachedSnapshot {
        fetched_at: file.fetched_at.as_deref().and_then(parse_cached_datetime),
        snapshot: CatalogSnapshot {
            available: file.available,
            installed: file.installed,
        },
    })
}

fn save_snapshot_cache(
    path: &Path,
    manager_url: &str,
    cached: &CachedSnapshot,
) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            return Err(format!("Failed to create cache directory: {}", err));
        }
    }

    let file = SnapshotCacheFile {
        version: SNAPSHOT_CACHE_VERSION,
        manager_url: manager_url.to_string(),
        fetched_at: cached.fetched_at.as_ref().map(format_cached_datetime),
        available: cached.snapshot.available.clone(),
        installed: cached.snapshot.installed.clone(),
    };

    let data = serde_json::to_string_pretty(&file)
        .map_err(|err| format!("Failed to serialize snapshot cache: {}", err))?;

    fs::write(path, data).map_err(|err| format!("Failed to write snapshot cache: {}", err))
}

pub(crate) fn snapshot_cache_dir() -> Option<PathBuf> {
    if let Ok(custom) = env::var("APP_EXCHANGE_CACHE_DIR") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    if let Ok(cache_home) = env::var("XDG_CACHE_HOME") {
        let trimmed = cache_home.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed).join("app-exchange"));
        }
    }

    if let Ok(home) = env::var("HOME") {
        let trimmed = home.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed).join(".cache").join("app-exchange"));
        }
    }

    None
}

fn snapshot_cache_path() -> Option<PathBuf> {
    snapshot_cache_dir().map(|dir| dir.join(SNAPSHOT_CACHE_FILE))
}

fn parse_cached_datetime(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn format_cached_datetime(value: &DateTime<Utc>) -> String {
    value.to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::record;

    const URL: &str = "http://robot.local:8080";

    fn sample() -> CachedSnapshot {
        CachedSnapshot {
            fetched_at: DateTime::parse_from_rfc3339("2026-10-01T12:00:00Z")
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            snapshot: CatalogSnapshot {
                installed: vec![record("nav", "1.0", "2.0", false)],
                available: vec![record("map", "-", "-", true)],
            },
        }
    }

    #[test]
    fn stored_snapshot_is_read_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join(SNAPSHOT_CACHE_FILE);
        save_snapshot_cache(&path, URL, &sample()).expect("save cache");

        let loaded = load_snapshot_cache(&path, URL).expect("load cache");
        assert_eq!(loaded.snapshot, sample().snapshot);
        assert_eq!(loaded.fetched_at, sample().fetched_at);
    }

    #[test]
    fn snapshot_for_other_manager_is_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(SNAPSHOT_CACHE_FILE);
        save_snapshot_cache(&path, URL, &sample()).expect("save cache");

        assert!(load_snapshot_cache(&path, "http://other:8080").is_none());
    }

    #[test]
    fn unknown_version_or_garbage_is_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(SNAPSHOT_CACHE_FILE);

        fs::write(&path, "not json").expect("write");
        assert!(load_snapshot_cache(&path, URL).is_none());

        let stale = format!(
            r#"{{"version": 99, "manager_url": "{URL}", "fetched_at": null, "available": [], "installed": []}}"#
        );
        fs::write(&path, stale).expect("write");
        assert!(load_snapshot_cache(&path, URL).is_none());
    }
}
