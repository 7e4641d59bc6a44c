// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Scan command - discovers Go modules and stores the fleet snapshot

use super::Output;
use crate::config::Config;
use crate::fingerprint::{detect_changes, ChangeReport};
use crate::scanner::{scan_path, ScanConfig};
use crate::store::FleetSnapshot;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Serialize)]
struct ScanSummary<'a> {
    root: &'a Path,
    projects: usize,
    warnings: usize,
    changes: &'a ChangeReport,
}

/// Run the scan command
pub fn run(cfg: &Config, out: Output, path: PathBuf, max_depth: Option<usize>) -> Result<()> {
    info!("Scanning: {}", path.display());

    let scan_config = ScanConfig {
        max_depth: max_depth.unwrap_or(cfg.scan_max_depth),
        follow_symlinks: false,
    };
    let results = scan_path(&path, &scan_config)
        .with_context(|| format!("Failed to scan {}", path.display()))?;

    let mut warnings = 0;
    for result in &results {
        for warning in &result.warnings {
            out.warn(&format!("{}: {warning}", result.project.path));
            warnings += 1;
        }
    }

    let projects: Vec<_> = results.into_iter().map(|r| r.project).collect();
    let previous = FleetSnapshot::load(&cfg.data_dir)?
        .map(|s| s.hashes())
        .unwrap_or_default();
    let changes = detect_changes(&previous, &projects);

    let root = path.canonicalize().unwrap_or_else(|_| path.clone());
    let snapshot = FleetSnapshot::from_projects(projects, Some(root.clone()));
    snapshot.save(&cfg.data_dir)?;

    if out.json {
        return out.print_json(&ScanSummary {
            root: &root,
            projects: snapshot.entries.len(),
            warnings,
            changes: &changes,
        });
    }

    if snapshot.entries.is_empty() {
        println!("No Go modules found in {}", path.display());
    } else {
        println!(
            "{}",
            out.heading(&format!("Found {} modules:", snapshot.entries.len()))
        );
        for entry in &snapshot.entries {
            let p = &entry.project;
            let module = p.module.as_deref().unwrap_or("-");
            let go = if p.go_version.is_empty() { "-" } else { p.go_version.as_str() };
            println!(
                "  {} {} {}",
                out.ident(&p.path),
                out.dim(&format!("[{module}, go {go}]")),
                out.dim(&format!("{} deps", p.libraries.len()))
            );
        }
    }

    println!();
    if !previous.is_empty() {
        println!(
            "Changes since last scan: {} changed, {} added, {} removed",
            changes.changed.len(),
            changes.added.len(),
            changes.removed.len()
        );
    }
    println!(
        "Snapshot saved to {}",
        out.ok(&FleetSnapshot::path_in(&cfg.data_dir).display().to_string())
    );
    Ok(())
}
