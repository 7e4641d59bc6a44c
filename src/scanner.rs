// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Local fleet discovery: every directory holding a `go.mod` is a repository

use crate::classify::{derive_label, ClientClassifier};
use crate::fingerprint::path_id;
use crate::graph::should_ignore_project;
use crate::manifest::parse_go_mod;
use crate::types::Project;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Component, Path};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Manifest file name
pub const MANIFEST_FILE: &str = "go.mod";

/// Directories never descended into
const SKIP_DIRS: &[&str] = &["vendor", "node_modules", "testdata"];

/// Scan configuration
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Maximum directory depth below the root (0 = unlimited)
    pub max_depth: usize,
    /// Follow symbolic links
    pub follow_symlinks: bool,
}

/// One discovered repository
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// Repository snapshot
    pub project: Project,
    /// Problems that did not stop the scan
    pub warnings: Vec<String>,
}

/// Walk `root` and snapshot every Go module found below it.
///
/// Paths are `/`-joined and relative to the root's parent, so scanning
/// `~/src/fleet` yields `fleet/teamx/svcA`. Results are sorted by path.
pub fn scan_path(root: &Path, config: &ScanConfig) -> Result<Vec<ScanResult>> {
    let root = root
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", root.display()))?;
    let base = root.parent().unwrap_or(&root).to_path_buf();

    let mut walker = WalkDir::new(&root)
        .follow_links(config.follow_symlinks)
        .sort_by_file_name();
    if config.max_depth > 0 {
        // the manifest sits one level below the deepest directory
        walker = walker.max_depth(config.max_depth + 1);
    }

    let mut results = Vec::new();
    for entry in walker.into_iter().filter_entry(|e| e.depth() == 0 || !is_skipped(e)) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Skipping unreadable entry: {err}");
                continue;
            }
        };
        if !entry.file_type().is_file() || entry.file_name() != MANIFEST_FILE {
            continue;
        }
        let Some(dir) = entry.path().parent() else {
            continue;
        };
        let rel = relative_path(dir, &base);
        debug!("Found manifest in {rel}");
        results.push(snapshot(dir, &rel, entry.path()));
    }

    results.sort_by(|a, b| a.project.path.cmp(&b.project.path));
    Ok(results)
}

/// Build a project from one module directory; manifest problems become warnings
fn snapshot(dir: &Path, rel: &str, manifest_path: &Path) -> ScanResult {
    let name = dir
        .file_name()
        .map_or_else(|| rel.to_string(), |n| n.to_string_lossy().into_owned());
    let mut project = Project {
        id: path_id(rel),
        name,
        path: rel.to_string(),
        module: None,
        go_version: String::new(),
        updated_at: modified_at(manifest_path),
        libraries: Vec::new(),
    };
    let mut warnings = Vec::new();

    match fs::read_to_string(manifest_path) {
        Ok(source) => match parse_go_mod(&source) {
            Ok(manifest) => {
                project.libraries = manifest.effective_requires();
                project.module = manifest.module;
                project.go_version = manifest.go_version.unwrap_or_default();
            }
            Err(err) => {
                warn!("{}: {err}", manifest_path.display());
                warnings.push(err.to_string());
            }
        },
        Err(err) => {
            warn!("Failed to read {}: {err}", manifest_path.display());
            warnings.push(format!("failed to read {MANIFEST_FILE}: {err}"));
        }
    }

    ScanResult { project, warnings }
}

/// One client dependency of one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientUsage {
    /// Repository name
    pub project: String,
    /// Display label of the client
    pub label: String,
    /// Required version
    pub version: String,
    /// Full module path of the client
    pub module: String,
}

/// List every client dependency across `projects`.
///
/// Uses the loose naming check under the classifier's org prefix, whatever
/// mode the classifier was built with. Repositories matching an ignore
/// pattern are skipped. Rows follow project order, then module path.
#[must_use]
pub fn client_usages(
    projects: &[Project],
    classifier: &ClientClassifier,
    ignores: &[String],
) -> Vec<ClientUsage> {
    let mut rows = Vec::new();
    for project in projects {
        if should_ignore_project(&project.path, ignores) {
            debug!("Ignoring {}", project.path);
            continue;
        }
        let mut clients: Vec<_> = project
            .libraries
            .iter()
            .filter(|lib| classifier.matches_loose(&lib.name))
            .collect();
        clients.sort_by(|a, b| a.name.cmp(&b.name));
        rows.extend(clients.into_iter().map(|lib| ClientUsage {
            project: project.name.clone(),
            label: derive_label(&lib.name),
            version: lib.version.clone(),
            module: lib.name.clone(),
        }));
    }
    rows
}

fn is_skipped(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIP_DIRS.iter().any(|d| name == *d)
}

fn relative_path(dir: &Path, base: &Path) -> String {
    let rel = dir.strip_prefix(base).unwrap_or(dir);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Manifest modification time, truncated to whole seconds
fn modified_at(path: &Path) -> Option<DateTime<Utc>> {
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
    let ts = DateTime::<Utc>::from(modified);
    DateTime::from_timestamp(ts.timestamp(), 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn fleet() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("fleet");
        write(
            &root,
            "teamx/svcA/go.mod",
            "module org/teamx/svcA\n\ngo 1.22\n\nrequire org/openapi/clients/go/barclient v1.2.0\n",
        );
        write(&root, "teamy/svcB/go.mod", "module org/teamy/svcB\ngo 1.21\n");
        write(&root, "teamy/broken/go.mod", "module org/teamy/broken\nrequire (\n");
        write(&root, "teamx/svcA/vendor/x/go.mod", "module x\n");
        write(&root, ".cache/hidden/go.mod", "module hidden\n");
        write(&root, "docs/README.md", "# docs\n");
        tmp
    }

    #[test]
    fn test_scan_finds_modules() {
        let tmp = fleet();
        let results = scan_path(&tmp.path().join("fleet"), &ScanConfig::default()).unwrap();
        let paths: Vec<_> = results.iter().map(|r| r.project.path.as_str()).collect();
        assert_eq!(paths, ["fleet/teamx/svcA", "fleet/teamy/broken", "fleet/teamy/svcB"]);

        let svc_a = &results[0].project;
        assert_eq!(svc_a.name, "svcA");
        assert_eq!(svc_a.module.as_deref(), Some("org/teamx/svcA"));
        assert_eq!(svc_a.go_version, "1.22");
        assert_eq!(svc_a.libraries.len(), 1);
        assert_eq!(svc_a.id, path_id("fleet/teamx/svcA"));
        assert!(svc_a.updated_at.is_some());
        assert!(results[0].warnings.is_empty());
    }

    #[test]
    fn test_broken_manifest_is_a_warning() {
        let tmp = fleet();
        let results = scan_path(&tmp.path().join("fleet"), &ScanConfig::default()).unwrap();
        let broken = results.iter().find(|r| r.project.name == "broken").unwrap();
        assert_eq!(broken.warnings.len(), 1);
        assert!(!broken.project.has_module_identity());
    }

    #[test]
    fn test_max_depth() {
        let tmp = fleet();
        let config = ScanConfig {
            max_depth: 1,
            ..Default::default()
        };
        assert!(scan_path(&tmp.path().join("fleet"), &config).unwrap().is_empty());
    }

    #[test]
    fn test_client_usages_use_loose_matching() {
        use crate::classify::ClassificationMode;
        use crate::types::Library;

        fn project(name: &str, path: &str, libs: &[(&str, &str)]) -> Project {
            Project {
                id: path_id(path),
                name: name.into(),
                path: path.into(),
                module: Some(format!("org/{path}")),
                go_version: "1.22".into(),
                updated_at: None,
                libraries: libs.iter().map(|(n, v)| Library::new(*n, *v)).collect(),
            }
        }
        let projects = vec![
            project(
                "svcA",
                "teamx/svcA",
                &[
                    ("org/openapi/clients/go/barclient/v1", "v1.2.0"),
                    ("org/modules/client/v3/users", "v3.0.1"),
                    ("github.com/acme/httpclient", "v0.1.0"),
                ],
            ),
            project("old", "archived/old", &[("org/openapi/clients/go/barclient/v1", "v0.9.0")]),
        ];
        // the strict mode of the classifier does not matter here
        let classifier = ClientClassifier::new("org", ClassificationMode::Strict).unwrap();
        assert!(!classifier.is_client_module("org/modules/client/v3/users"));

        let rows = client_usages(&projects, &classifier, &["ARCHIVED".to_string()]);
        assert_eq!(
            rows,
            [
                ClientUsage {
                    project: "svcA".into(),
                    label: "client/v3/users".into(),
                    version: "v3.0.1".into(),
                    module: "org/modules/client/v3/users".into(),
                },
                ClientUsage {
                    project: "svcA".into(),
                    label: "barclient/v1".into(),
                    version: "v1.2.0".into(),
                    module: "org/openapi/clients/go/barclient/v1".into(),
                },
            ]
        );
    }

    #[test]
    fn test_missing_root() {
        assert!(scan_path(Path::new("/definitely/not/here"), &ScanConfig::default()).is_err());
    }
}
