// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Changes command - compares a fresh scan with the stored snapshot

use super::Output;
use crate::config::Config;
use crate::fingerprint::detect_changes;
use crate::scanner::{scan_path, ScanConfig};
use crate::store::FleetSnapshot;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;

/// Run the changes command; the stored snapshot is left untouched
pub fn run(cfg: &Config, out: Output, path: Option<PathBuf>) -> Result<()> {
    let snapshot = FleetSnapshot::require(&cfg.data_dir)?;
    let root = path
        .or_else(|| snapshot.root.clone())
        .context("Snapshot has no scan root; pass a path to rescan")?;

    let scan_config = ScanConfig {
        max_depth: cfg.scan_max_depth,
        follow_symlinks: false,
    };
    let current: Vec<_> = scan_path(&root, &scan_config)
        .with_context(|| format!("Failed to scan {}", root.display()))?
        .into_iter()
        .map(|r| r.project)
        .collect();

    let report = detect_changes(&snapshot.hashes(), &current);
    if out.json {
        return out.print_json(&report);
    }

    if report.is_empty() {
        println!("{}", out.ok("No changes since last scan"));
        return Ok(());
    }

    let mut paths: HashMap<u64, &str> = snapshot
        .entries
        .iter()
        .map(|e| (e.project.id, e.project.path.as_str()))
        .collect();
    paths.extend(current.iter().map(|p| (p.id, p.path.as_str())));
    let name = |id: &u64| paths.get(id).copied().unwrap_or("?").to_string();

    for (title, ids) in [
        ("Changed", &report.changed),
        ("Added", &report.added),
        ("Removed", &report.removed),
    ] {
        if ids.is_empty() {
            continue;
        }
        println!("{}", out.heading(&format!("{title} ({}):", ids.len())));
        for id in ids {
            println!("  {} {}", out.ident(&name(id)), out.dim(&format!("#{id}")));
        }
    }
    Ok(())
}
