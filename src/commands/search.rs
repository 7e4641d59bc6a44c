// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Search command - suggests libraries, modules and versions in the fleet

use super::Output;
use crate::config::Config;
use crate::search::{search_go_versions, search_libraries, search_library_versions, search_modules};
use crate::store::FleetSnapshot;
use anyhow::{Context, Result};

/// What to search for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    /// Dependency module paths
    Libraries,
    /// Repository paths
    Modules,
    /// Declared runtime versions
    GoVersions,
    /// Versions of one library
    Versions,
}

impl SearchKind {
    /// Parse a search kind
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "libraries" | "libs" | "library" => Some(Self::Libraries),
            "modules" | "module" | "repos" => Some(Self::Modules),
            "go" | "go-versions" | "go_versions" => Some(Self::GoVersions),
            "versions" | "version" => Some(Self::Versions),
            _ => None,
        }
    }
}

/// Run the search command
pub fn run(
    cfg: &Config,
    out: Output,
    kind: &str,
    query: &str,
    library: Option<&str>,
    limit: usize,
) -> Result<()> {
    let kind = SearchKind::parse(kind).with_context(|| {
        format!("Unknown search kind: {kind}. Supported: libraries, modules, go, versions")
    })?;
    let projects = FleetSnapshot::require(&cfg.data_dir)?.projects();

    let hits = match kind {
        SearchKind::Libraries => search_libraries(&projects, query, limit),
        SearchKind::Modules => search_modules(&projects, query, limit),
        SearchKind::GoVersions => search_go_versions(&projects, query, limit),
        SearchKind::Versions => {
            let library = library.context("--library is required when searching versions")?;
            search_library_versions(&projects, library, query, limit)
        }
    };

    if out.json {
        return out.print_json(&hits);
    }
    if hits.is_empty() {
        println!("{}", out.dim("No matches"));
    }
    for hit in &hits {
        println!("{}", out.ident(hit));
    }
    Ok(())
}
