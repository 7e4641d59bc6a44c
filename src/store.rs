// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Persisted fleet snapshot (`fleet.json` in the data directory)

use crate::fingerprint::project_hash;
use crate::types::Project;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Snapshot file name inside the data directory
pub const SNAPSHOT_FILE: &str = "fleet.json";

/// A project together with the hash it had when stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedProject {
    /// Stored project
    #[serde(flatten)]
    pub project: Project,
    /// [`project_hash`] at store time
    pub hash: String,
}

/// Every project seen by the last scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetSnapshot {
    /// When the scan ran
    pub scanned_at: DateTime<Utc>,
    /// Directory that was scanned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    /// Stored projects, sorted by path
    #[serde(default)]
    pub entries: Vec<CachedProject>,
}

impl FleetSnapshot {
    /// Snapshot `projects`, hashing each one now
    #[must_use]
    pub fn from_projects(projects: Vec<Project>, root: Option<PathBuf>) -> Self {
        let mut entries: Vec<CachedProject> = projects
            .into_iter()
            .map(|project| CachedProject {
                hash: project_hash(&project),
                project,
            })
            .collect();
        entries.sort_by(|a, b| a.project.path.cmp(&b.project.path));
        Self {
            scanned_at: Utc::now(),
            root,
            entries,
        }
    }

    /// Path of the snapshot file in `dir`
    #[must_use]
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(SNAPSHOT_FILE)
    }

    /// Load the snapshot from `dir`; `None` when nothing has been stored yet
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let path = Self::path_in(dir);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let snapshot = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(snapshot))
    }

    /// Load the snapshot, failing with a hint when there is none
    pub fn require(dir: &Path) -> Result<Self> {
        Self::load(dir)?.with_context(|| {
            format!(
                "No fleet snapshot in {}. Run 'fleetmap scan <path>' first.",
                dir.display()
            )
        })
    }

    /// Write the snapshot into `dir`, creating it if needed
    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        let path = Self::path_in(dir);
        let json = serde_json::to_string_pretty(self).context("Failed to serialize snapshot")?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Stored projects
    #[must_use]
    pub fn projects(&self) -> Vec<Project> {
        self.entries.iter().map(|e| e.project.clone()).collect()
    }

    /// Stored hashes keyed by project id
    #[must_use]
    pub fn hashes(&self) -> HashMap<u64, String> {
        self.entries
            .iter()
            .map(|e| (e.project.id, e.hash.clone()))
            .collect()
    }

    /// Find a stored project by id, path or name
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&CachedProject> {
        let id = key.parse::<u64>().ok();
        self.entries
            .iter()
            .find(|e| Some(e.project.id) == id || e.project.path == key)
            .or_else(|| self.entries.iter().find(|e| e.project.name == key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Library;
    use tempfile::TempDir;

    fn project(id: u64, path: &str) -> Project {
        Project {
            id,
            name: crate::graph::last_segment(path).into(),
            path: path.into(),
            module: Some(format!("org/{path}")),
            go_version: "1.22".into(),
            updated_at: None,
            libraries: vec![Library::new("github.com/pkg/errors", "v0.9.1")],
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let snap = FleetSnapshot::from_projects(
            vec![project(2, "fleet/b"), project(1, "fleet/a")],
            Some(PathBuf::from("/src/fleet")),
        );
        snap.save(dir.path()).unwrap();

        let loaded = FleetSnapshot::load(dir.path()).unwrap().unwrap();
        assert_eq!(loaded, snap);
        assert_eq!(loaded.entries[0].project.path, "fleet/a");
        assert_eq!(loaded.hashes()[&2], project_hash(&project(2, "fleet/b")));
    }

    #[test]
    fn test_load_missing() {
        let dir = TempDir::new().unwrap();
        assert!(FleetSnapshot::load(dir.path()).unwrap().is_none());
        let err = FleetSnapshot::require(dir.path()).unwrap_err();
        assert!(err.to_string().contains("fleetmap scan"));
    }

    #[test]
    fn test_corrupt_snapshot() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(SNAPSHOT_FILE), "{not json").unwrap();
        assert!(FleetSnapshot::load(dir.path()).is_err());
    }

    #[test]
    fn test_find() {
        let snap = FleetSnapshot::from_projects(vec![project(7, "fleet/teamx/svcA")], None);
        assert!(snap.find("7").is_some());
        assert!(snap.find("fleet/teamx/svcA").is_some());
        assert!(snap.find("svcA").is_some());
        assert!(snap.find("svcB").is_none());
    }

    #[test]
    fn test_flattened_entries() {
        let snap = FleetSnapshot::from_projects(vec![project(1, "fleet/a")], None);
        let value: serde_json::Value = serde_json::to_value(&snap).unwrap();
        assert_eq!(value["entries"][0]["path"], "fleet/a");
        assert!(value["entries"][0]["hash"].is_string());
        assert!(value.get("root").is_none());
    }
}
