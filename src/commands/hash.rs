// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Hash command - prints the fingerprint of stored projects

use super::Output;
use crate::config::Config;
use crate::fingerprint::project_hash;
use crate::store::FleetSnapshot;
use anyhow::Result;
use serde_json::json;

/// Run the hash command for one project, or every project when `key` is absent
pub fn run(cfg: &Config, out: Output, key: Option<&str>) -> Result<()> {
    let snapshot = FleetSnapshot::require(&cfg.data_dir)?;

    let entries: Vec<_> = match key {
        Some(key) => vec![snapshot
            .find(key)
            .ok_or_else(|| anyhow::anyhow!("Project not found: {key}"))?],
        None => snapshot.entries.iter().collect(),
    };

    if out.json {
        let rows: Vec<_> = entries
            .iter()
            .map(|e| {
                json!({
                    "id": e.project.id,
                    "path": e.project.path,
                    "hash": project_hash(&e.project),
                    "stored": e.hash,
                })
            })
            .collect();
        return out.print_json(&rows);
    }

    for entry in entries {
        let hash = project_hash(&entry.project);
        let marker = if hash == entry.hash {
            out.ok("ok")
        } else {
            out.dim("stale")
        };
        println!("{}  {} {marker}", hash, out.ident(&entry.project.path));
    }
    Ok(())
}
