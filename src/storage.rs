//! File-based persistence for trips.
//!
//! Layout of the data directory:
//!
//! ```text
//! trips.json          registry of trips and the current trip pointer
//! <trip_id>.csv       planned items of one trip
//! <trip_id>.json      configuration of one trip
//! ```
//!
//! Every read records the file's revision (a content hash). A write first
//! checks the file still has the recorded revision and refuses to overwrite
//! changes made by someone else in the meantime.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info, warn};

use crate::config::{TripConfig, TripRegistry};
use crate::error::{Result, TripError};
use crate::git_ops::GitOps;
use crate::trip::TripPlan;

/// Registry file name inside the data directory
pub const REGISTRY_FILE_NAME: &str = "trips.json";

/// Content revision of a file; `None` means the file did not exist
type Revision = Option<blake3::Hash>;

pub struct Storage {
    data_dir: PathBuf,
    git: Option<GitOps>,
    revisions: Mutex<HashMap<PathBuf, Revision>>,
}

impl Storage {
    /// Create storage rooted at `data_dir`
    ///
    /// With `sync_git`, loads pull from origin first and saves commit and
    /// push. A directory outside any git repository silently skips syncing.
    pub fn new(data_dir: impl AsRef<Path>, sync_git: bool) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        let git = if sync_git {
            Some(GitOps::new(&data_dir))
        } else {
            None
        };
        Self {
            data_dir,
            git,
            revisions: Mutex::new(HashMap::new()),
        }
    }

    pub fn registry_path(&self) -> PathBuf {
        self.data_dir.join(REGISTRY_FILE_NAME)
    }

    pub fn items_path(&self, trip_id: &str) -> PathBuf {
        self.data_dir.join(format!("{}.csv", trip_id))
    }

    pub fn config_path(&self, trip_id: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", trip_id))
    }

    /// Pull remote changes when git sync is enabled
    pub fn pull(&self) -> Result<()> {
        match &self.git {
            Some(git) => git.pull().map_err(|e| TripError::Git(format!("{:#}", e))),
            None => Ok(()),
        }
    }

    // === Loading ===

    pub fn load_registry(&self) -> Result<TripRegistry> {
        match self.read_tracked(&self.registry_path())? {
            Some(content) if !content.trim().is_empty() => TripRegistry::from_json(&content),
            _ => Ok(TripRegistry::default()),
        }
    }

    pub fn load_plan(&self, trip_id: &str) -> Result<TripPlan> {
        match self.read_tracked(&self.items_path(trip_id))? {
            Some(content) => TripPlan::from_csv(&content),
            None => Ok(TripPlan::new()),
        }
    }

    /// Load a trip config; a missing file yields `None`
    pub fn load_config(&self, trip_id: &str) -> Result<Option<TripConfig>> {
        match self.read_tracked(&self.config_path(trip_id))? {
            Some(content) if !content.trim().is_empty() => {
                TripConfig::from_json(&content).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Load the registry, substituting the default when the file is unreadable
    pub fn load_registry_or_default(&self) -> TripRegistry {
        self.load_registry().unwrap_or_else(|e| {
            warn!(error = %e, "registry unreadable, using default");
            TripRegistry::default()
        })
    }

    /// Load a plan, substituting an empty one when the file is unreadable
    pub fn load_plan_or_default(&self, trip_id: &str) -> TripPlan {
        self.load_plan(trip_id).unwrap_or_else(|e| {
            warn!(trip = trip_id, error = %e, "item table unreadable, using empty plan");
            TripPlan::new()
        })
    }

    /// Load a config, substituting `fallback` when missing or unreadable
    pub fn load_config_or(&self, trip_id: &str, fallback: impl FnOnce() -> TripConfig) -> TripConfig {
        match self.load_config(trip_id) {
            Ok(Some(config)) => config,
            Ok(None) => fallback(),
            Err(e) => {
                warn!(trip = trip_id, error = %e, "trip config unreadable, using default");
                fallback()
            }
        }
    }

    /// Record the revision of `path` without decoding it
    ///
    /// A later save then overwrites whatever is there now, but still refuses
    /// if the file changes in between.
    pub fn track(&self, path: &Path) -> Result<()> {
        self.read_tracked(path).map(|_| ())
    }

    // === Saving ===

    pub fn save_registry(&self, registry: &TripRegistry, message: &str) -> Result<()> {
        let content = registry.to_json()?;
        self.write_checked(&self.registry_path(), &content, message)
    }

    pub fn save_plan(&self, trip_id: &str, plan: &TripPlan, message: &str) -> Result<()> {
        let content = plan.to_csv()?;
        self.write_checked(&self.items_path(trip_id), &content, message)
    }

    pub fn save_config(&self, trip_id: &str, config: &TripConfig, message: &str) -> Result<()> {
        let content = config.to_json()?;
        self.write_checked(&self.config_path(trip_id), &content, message)
    }

    // === Revision tracking ===

    fn read_raw(path: &Path) -> Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TripError::io(path, e)),
        }
    }

    fn revision_of(content: Option<&str>) -> Revision {
        content.map(|c| blake3::hash(c.as_bytes()))
    }

    fn record_revision(&self, path: &Path, revision: Revision) {
        if let Ok(mut revisions) = self.revisions.lock() {
            revisions.insert(path.to_path_buf(), revision);
        }
    }

    fn known_revision(&self, path: &Path) -> Option<Revision> {
        self.revisions
            .lock()
            .ok()
            .and_then(|revisions| revisions.get(path).copied())
    }

    fn read_tracked(&self, path: &Path) -> Result<Option<String>> {
        let content = Self::read_raw(path)?;
        self.record_revision(path, Self::revision_of(content.as_deref()));
        debug!(path = %path.display(), exists = content.is_some(), "loaded");
        Ok(content)
    }

    fn write_checked(&self, path: &Path, content: &str, message: &str) -> Result<()> {
        if let Some(expected) = self.known_revision(path) {
            let on_disk = Self::read_raw(path)?;
            if Self::revision_of(on_disk.as_deref()) != expected {
                warn!(path = %path.display(), "refusing to overwrite newer file");
                return Err(TripError::StaleRevision {
                    path: path.to_path_buf(),
                });
            }
        }

        fs::create_dir_all(&self.data_dir).map_err(|e| TripError::io(&self.data_dir, e))?;
        fs::write(path, content).map_err(|e| TripError::io(path, e))?;
        self.record_revision(path, Self::revision_of(Some(content)));
        info!(path = %path.display(), commit_message = message, "saved");

        if let Some(git) = &self.git {
            git.commit_and_push(path, message)
                .map_err(|e| TripError::Git(format!("{:#}", e)))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trip::{Category, PlannedItem};
    use tempfile::TempDir;

    #[test]
    fn test_missing_files_give_defaults() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path(), false);
        assert_eq!(storage.load_registry().unwrap(), TripRegistry::default());
        assert!(storage.load_plan("default").unwrap().is_empty());
        assert!(storage.load_config("default").unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_plan() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path(), false);
        let mut plan = storage.load_plan("default").unwrap();
        plan.add(PlannedItem::new("Castle", Category::Attraction, 2.0));
        storage.save_plan("default", &plan, "Add item Castle").unwrap();

        let reloaded = Storage::new(dir.path(), false).load_plan("default").unwrap();
        assert_eq!(reloaded, plan);
    }

    #[test]
    fn test_concurrent_writer_is_detected() {
        let dir = TempDir::new().unwrap();
        let alice = Storage::new(dir.path(), false);
        let bob = Storage::new(dir.path(), false);

        let mut alice_plan = alice.load_plan("default").unwrap();
        let mut bob_plan = bob.load_plan("default").unwrap();

        alice_plan.add(PlannedItem::new("Castle", Category::Attraction, 2.0));
        alice.save_plan("default", &alice_plan, "alice").unwrap();

        bob_plan.add(PlannedItem::new("Beach", Category::Rest, 3.0));
        let result = bob.save_plan("default", &bob_plan, "bob");
        assert!(matches!(result, Err(TripError::StaleRevision { .. })));

        // after reloading bob can write again
        let mut bob_plan = bob.load_plan("default").unwrap();
        bob_plan.add(PlannedItem::new("Beach", Category::Rest, 3.0));
        bob.save_plan("default", &bob_plan, "bob").unwrap();
        assert_eq!(alice.load_plan("default").unwrap().len(), 2);
    }

    #[test]
    fn test_malformed_files_fall_back() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(REGISTRY_FILE_NAME), "{not json").unwrap();
        fs::write(dir.path().join("default.json"), "[]").unwrap();
        let storage = Storage::new(dir.path(), false);

        assert!(storage.load_registry().is_err());
        assert_eq!(storage.load_registry_or_default(), TripRegistry::default());

        let fallback = storage.load_config_or("default", || TripConfig {
            name: "Fallback".to_string(),
            ..TripConfig::default()
        });
        assert_eq!(fallback.name, "Fallback");
    }

    #[test]
    fn test_config_roundtrip_through_files() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("nested"), false);
        let config = TripConfig {
            participants: 5,
            ..TripConfig::default()
        };
        storage.load_config("alps").unwrap();
        storage.save_config("alps", &config, "Configure alps").unwrap();
        assert_eq!(storage.load_config("alps").unwrap(), Some(config));
    }

    #[test]
    fn test_track_allows_overwriting_a_stray_file() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path(), false);
        let path = storage.config_path("alps");
        fs::write(&path, "left over").unwrap();

        storage.track(&path).unwrap();
        storage
            .save_config("alps", &TripConfig::default(), "Configure alps")
            .unwrap();
        assert!(storage.load_config("alps").unwrap().is_some());

        // a change after tracking is still detected
        storage.track(&path).unwrap();
        fs::write(&path, "edited elsewhere").unwrap();
        let result = storage.save_config("alps", &TripConfig::default(), "Configure alps");
        assert!(matches!(result, Err(TripError::StaleRevision { .. })));
    }

    #[test]
    fn test_track_reports_read_errors() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path(), false);
        // a directory where a file is expected
        let path = storage.config_path("alps");
        fs::create_dir(&path).unwrap();
        assert!(matches!(storage.track(&path), Err(TripError::Io { .. })));
    }
}
