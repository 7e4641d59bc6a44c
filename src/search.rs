// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Free-text and criteria search over a fleet snapshot

use crate::types::{Project, SearchCriteria};
use std::cmp::Ordering;
use std::collections::BTreeSet;

// =============================================================================
// Suggestions
// =============================================================================

/// Library module paths used anywhere in the fleet
#[must_use]
pub fn search_libraries(projects: &[Project], query: &str, limit: usize) -> Vec<String> {
    suggest(
        projects.iter().flat_map(|p| p.libraries.iter().map(|l| l.name.as_str())),
        query,
        limit,
    )
}

/// Repository paths in the fleet
#[must_use]
pub fn search_modules(projects: &[Project], query: &str, limit: usize) -> Vec<String> {
    suggest(
        projects.iter().map(|p| p.path.as_str()).filter(|p| !p.is_empty()),
        query,
        limit,
    )
}

/// Runtime versions declared across the fleet
#[must_use]
pub fn search_go_versions(projects: &[Project], query: &str, limit: usize) -> Vec<String> {
    suggest(
        projects.iter().map(|p| p.go_version.as_str()).filter(|v| !v.is_empty()),
        query,
        limit,
    )
}

/// Versions in use for one library
#[must_use]
pub fn search_library_versions(
    projects: &[Project],
    library: &str,
    query: &str,
    limit: usize,
) -> Vec<String> {
    suggest(
        projects
            .iter()
            .flat_map(|p| p.libraries.iter())
            .filter(|l| l.name == library)
            .map(|l| l.version.as_str()),
        query,
        limit,
    )
}

/// Unique values containing `query` (case-insensitive), sorted, at most `limit`
fn suggest<'a>(values: impl Iterator<Item = &'a str>, query: &str, limit: usize) -> Vec<String> {
    let needle = query.to_lowercase();
    let unique: BTreeSet<&str> = values
        .filter(|v| needle.is_empty() || v.to_lowercase().contains(&needle))
        .collect();
    unique.into_iter().take(limit).map(str::to_string).collect()
}

// =============================================================================
// Criteria
// =============================================================================

/// Version comparators accepted in search criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Equal
    Exact,
    /// Strictly greater
    Greater,
    /// Greater or equal
    GreaterOrEqual,
    /// Strictly less
    Less,
    /// Less or equal
    LessOrEqual,
}

impl Comparison {
    /// Parse a comparator name; unknown names compare for equality
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "greater" | "gt" => Self::Greater,
            "greater_equal" | "gte" => Self::GreaterOrEqual,
            "less" | "lt" => Self::Less,
            "less_equal" | "lte" => Self::LessOrEqual,
            _ => Self::Exact,
        }
    }

    fn accepts(self, ord: Ordering) -> bool {
        match self {
            Self::Exact => ord == Ordering::Equal,
            Self::Greater => ord == Ordering::Greater,
            Self::GreaterOrEqual => ord != Ordering::Less,
            Self::Less => ord == Ordering::Less,
            Self::LessOrEqual => ord != Ordering::Greater,
        }
    }
}

/// `major.minor[.patch]` with pre-release and build suffixes dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    /// Major component
    pub major: u64,
    /// Minor component
    pub minor: u64,
    /// Patch component, zero when absent
    pub patch: u64,
}

impl Version {
    /// Parse a version, ignoring a leading `v`
    #[must_use]
    pub fn parse(version: &str) -> Option<Self> {
        let v = version.strip_prefix('v').unwrap_or(version);
        let v = v.split('-').next().unwrap_or(v);
        let v = v.split('+').next().unwrap_or(v);
        let parts: Vec<&str> = v.split('.').collect();
        if !(2..=3).contains(&parts.len()) {
            return None;
        }
        let num = |s: &str| -> Option<u64> {
            if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            s.parse().ok()
        };
        Some(Self {
            major: num(parts[0])?,
            minor: num(parts[1])?,
            patch: parts.get(2).map_or(Some(0), |p| num(p))?,
        })
    }
}

/// Compare `actual` against `wanted` with a comparator name.
///
/// Empty or `exact` compares the raw strings. Versions that do not parse
/// fall back to lexicographic comparison of the raw strings.
#[must_use]
pub fn compare_versions(actual: &str, wanted: &str, comparison: &str) -> bool {
    if comparison.is_empty() || comparison == "exact" {
        return actual == wanted;
    }
    let cmp = Comparison::parse(comparison);
    let ord = match (Version::parse(actual), Version::parse(wanted)) {
        (Some(a), Some(w)) => a.cmp(&w),
        _ => actual.cmp(wanted),
    };
    cmp.accepts(ord)
}

/// Whether a project passes the group/tag filters
#[must_use]
pub fn matches_criteria(project: &Project, criteria: &SearchCriteria) -> bool {
    if !criteria.group.is_empty() && !project.path.contains(&criteria.group) {
        return false;
    }
    if !criteria.tag.is_empty()
        && !project.name.to_lowercase().contains(&criteria.tag.to_lowercase())
    {
        return false;
    }
    true
}

/// Whether a project passes the runtime-version and library filters
#[must_use]
pub fn matches_detailed_criteria(project: &Project, criteria: &SearchCriteria) -> bool {
    if !criteria.go_version.is_empty() {
        let ok = if criteria.go_version_comparison.is_empty() {
            project.go_version == criteria.go_version
        } else {
            compare_versions(
                &project.go_version,
                &criteria.go_version,
                &criteria.go_version_comparison,
            )
        };
        if !ok {
            return false;
        }
    }

    if !criteria.library.is_empty() {
        let found = project
            .libraries
            .iter()
            .filter(|lib| lib.name == criteria.library)
            .any(|lib| {
                criteria.version.is_empty()
                    || compare_versions(&lib.version, &criteria.version, &criteria.version_comparison)
            });
        if !found {
            return false;
        }
    }

    true
}

/// Projects matching every criterion, in input order
#[must_use]
pub fn filter_projects<'a>(projects: &'a [Project], criteria: &SearchCriteria) -> Vec<&'a Project> {
    projects
        .iter()
        .filter(|p| matches_criteria(p, criteria) && matches_detailed_criteria(p, criteria))
        .collect()
}
