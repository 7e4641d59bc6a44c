// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Projects command - lists repositories matching search criteria

use super::Output;
use crate::config::Config;
use crate::fingerprint::search_hash;
use crate::search::filter_projects;
use crate::store::FleetSnapshot;
use crate::types::{Project, SearchCriteria};
use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
struct ProjectsReport<'a> {
    criteria: &'a SearchCriteria,
    search_hash: String,
    projects: Vec<&'a Project>,
}

/// Run the projects command
pub fn run(cfg: &Config, out: Output, criteria: &SearchCriteria) -> Result<()> {
    let snapshot = FleetSnapshot::require(&cfg.data_dir)?;
    let projects = snapshot.projects();
    let matches = filter_projects(&projects, criteria);

    if out.json {
        return out.print_json(&ProjectsReport {
            criteria,
            search_hash: search_hash(criteria),
            projects: matches,
        });
    }

    println!(
        "{} {}",
        out.heading(&format!("{} of {} projects", matches.len(), projects.len())),
        out.dim(&format!("(search {})", search_hash(criteria)))
    );
    for project in matches {
        let go = if project.go_version.is_empty() { "-" } else { project.go_version.as_str() };
        println!("  {} {}", out.ident(&project.path), out.dim(&format!("go {go}")));
        if !criteria.library.is_empty() {
            for lib in project.libraries.iter().filter(|l| l.name == criteria.library) {
                println!("    {} {}", lib.name, out.ok(&lib.version));
            }
        }
    }
    Ok(())
}
