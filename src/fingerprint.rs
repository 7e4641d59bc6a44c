// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Content hashes for change detection and search-result cache keys

use crate::types::{Library, Project, SearchCriteria};
use chrono::{DateTime, SecondsFormat, Utc};
use md5::{Digest, Md5};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Timestamp rendered for projects with no modification time
const ZERO_TIME: &str = "0001-01-01T00:00:00Z";

/// Hash over id, name, path, runtime version, modification time and the
/// library digest. Equal hashes mean "unchanged".
#[must_use]
pub fn project_hash(project: &Project) -> String {
    let input = format!(
        "{}|{}|{}|{}|{}|{}",
        project.id,
        project.name,
        project.path,
        project.go_version,
        rfc3339(project.updated_at.as_ref()),
        libraries_digest(&project.libraries),
    );
    md5_hex(&input)
}

/// Cache key for a search request
#[must_use]
pub fn search_hash(criteria: &SearchCriteria) -> String {
    let input = [
        criteria.go_version.as_str(),
        criteria.go_version_comparison.as_str(),
        criteria.library.as_str(),
        criteria.version.as_str(),
        criteria.version_comparison.as_str(),
        criteria.group.as_str(),
        criteria.tag.as_str(),
    ]
    .join("|");
    md5_hex(&input)
}

/// `name:version` entries, sorted, `|`-joined. Declaration order never matters.
#[must_use]
pub fn libraries_digest(libraries: &[Library]) -> String {
    let mut entries: Vec<String> = libraries
        .iter()
        .map(|lib| format!("{}:{}", lib.name, lib.version))
        .collect();
    entries.sort();
    entries.join("|")
}

/// Stable 64-bit id derived from a repository path, for sources without ids
#[must_use]
pub fn path_id(path: &str) -> u64 {
    let digest = Md5::digest(path.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

fn md5_hex(input: &str) -> String {
    hex::encode(Md5::digest(input.as_bytes()))
}

fn rfc3339(ts: Option<&DateTime<Utc>>) -> String {
    ts.map_or_else(
        || ZERO_TIME.to_string(),
        |t| t.to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}

// =============================================================================
// Change detection
// =============================================================================

/// Outcome of comparing a fresh snapshot with previously stored hashes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeReport {
    /// Known projects whose hash differs
    pub changed: Vec<u64>,
    /// Projects with no stored hash
    pub added: Vec<u64>,
    /// Stored projects missing from the fresh snapshot
    pub removed: Vec<u64>,
}

impl ChangeReport {
    /// Nothing changed, appeared or disappeared
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.added.is_empty() && self.removed.is_empty()
    }
}

/// Compare current projects against stored hashes, keyed by project id.
///
/// Output lists follow the order of `current`; `removed` is sorted.
#[must_use]
pub fn detect_changes(previous: &HashMap<u64, String>, current: &[Project]) -> ChangeReport {
    let mut report = ChangeReport::default();
    let mut seen = HashSet::new();

    for project in current {
        seen.insert(project.id);
        match previous.get(&project.id) {
            Some(stored) => {
                let hash = project_hash(project);
                if *stored != hash {
                    debug!("Project {} ({}) changed", project.id, project.path);
                    report.changed.push(project.id);
                }
            }
            None => report.added.push(project.id),
        }
    }

    report.removed = previous.keys().filter(|id| !seen.contains(id)).copied().collect();
    report.removed.sort_unstable();
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn project() -> Project {
        Project {
            id: 42,
            name: "drg".into(),
            path: "nghis/services/drg".into(),
            module: Some("git.example.com/nghis/services/drg".into()),
            go_version: "1.22".into(),
            updated_at: Some(Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap()),
            libraries: vec![
                Library::new("github.com/pkg/errors", "v0.9.1"),
                Library::new("git.example.com/org/openapi/clients/go/fooclient/v2", "v2.1.0"),
            ],
        }
    }

    #[test]
    fn test_project_hash_known_value() {
        let input = "42|drg|nghis/services/drg|1.22|2025-03-01T12:30:00Z|\
                     git.example.com/org/openapi/clients/go/fooclient/v2:v2.1.0|github.com/pkg/errors:v0.9.1";
        assert_eq!(project_hash(&project()), md5_hex(input));
        assert_eq!(project_hash(&project()).len(), 32);
    }

    #[test]
    fn test_project_hash_ignores_library_order() {
        let mut reordered = project();
        reordered.libraries.reverse();
        assert_eq!(project_hash(&project()), project_hash(&reordered));
    }

    #[test]
    fn test_project_hash_ignores_module_path() {
        let mut p = project();
        p.module = None;
        assert_eq!(project_hash(&project()), project_hash(&p));
    }

    #[test]
    fn test_project_hash_sensitivity() {
        let base = project_hash(&project());
        let edits: [fn(&mut Project); 6] = [
            |p| p.id += 1,
            |p| p.name.push('x'),
            |p| p.path.push('x'),
            |p| p.go_version = "1.23".into(),
            |p| p.updated_at = Some(Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 1).unwrap()),
            |p| p.libraries[0].version = "v0.9.2".into(),
        ];
        for edit in edits {
            let mut p = project();
            edit(&mut p);
            assert_ne!(project_hash(&p), base);
        }
    }

    #[test]
    fn test_missing_timestamp_uses_zero_time() {
        let mut p = project();
        p.updated_at = None;
        p.libraries.clear();
        assert_eq!(
            project_hash(&p),
            md5_hex("42|drg|nghis/services/drg|1.22|0001-01-01T00:00:00Z|")
        );
    }

    #[test]
    fn test_search_hash() {
        let empty = SearchCriteria::default();
        assert_eq!(search_hash(&empty), md5_hex("||||||"));

        let criteria = SearchCriteria {
            library: "github.com/pkg/errors".into(),
            version: "v0.9.0".into(),
            version_comparison: "gte".into(),
            ..Default::default()
        };
        assert_eq!(search_hash(&criteria), md5_hex("||github.com/pkg/errors|v0.9.0|gte||"));
        assert_eq!(search_hash(&criteria), search_hash(&criteria.clone()));
    }

    #[test]
    fn test_md5_reference_vector() {
        assert_eq!(md5_hex(""), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_detect_changes() {
        let unchanged = project();
        let mut changed = project();
        changed.id = 7;
        let added = Project { id: 9, ..project() };

        let mut previous = HashMap::new();
        previous.insert(unchanged.id, project_hash(&unchanged));
        previous.insert(changed.id, project_hash(&changed));
        previous.insert(100, "stale".to_string());

        changed.go_version = "1.23".into();
        let report = detect_changes(&previous, &[unchanged, changed, added]);

        assert_eq!(report.changed, [7]);
        assert_eq!(report.added, [9]);
        assert_eq!(report.removed, [100]);
        assert!(!report.is_empty());
    }

    #[test]
    fn test_path_id_stable() {
        assert_eq!(path_id("teamx/svcA"), path_id("teamx/svcA"));
        assert_ne!(path_id("teamx/svcA"), path_id("teamx/svcB"));
    }
}
