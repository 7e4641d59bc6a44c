// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Clients command - lists internal client dependencies per repository

use super::Output;
use crate::config::Config;
use crate::scanner::client_usages;
use crate::store::FleetSnapshot;
use anyhow::Result;

/// Run the clients command
pub fn run(cfg: &Config, out: Output, full_path: bool) -> Result<()> {
    let snapshot = FleetSnapshot::require(&cfg.data_dir)?;
    let rows = client_usages(&snapshot.projects(), &cfg.classifier()?, &cfg.ignore);

    if out.json {
        return out.print_json(&rows);
    }

    for row in &rows {
        let line = format!(
            "{} : {} -> {}",
            out.ident(&row.project),
            row.label,
            out.ok(&row.version)
        );
        if full_path {
            println!("{line} {}", out.dim(&format!("(module: {})", row.module)));
        } else {
            println!("{line}");
        }
    }
    Ok(())
}
