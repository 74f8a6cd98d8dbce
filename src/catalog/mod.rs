mod cache;
mod entries;
mod reconcile;

pub(crate) use cache::{CachedSnapshot, load_snapshot_cache_from_disk, save_snapshot_cache_to_disk};
pub(crate) use entries::{ListEntry, Screen, available_entries, entry_matches_filter, installed_entries};
pub(crate) use reconcile::{AppStatus, Panel, PresentationState, reconcile};
