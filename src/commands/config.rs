// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Config command - prints the effective configuration

use super::Output;
use crate::config::Config;
use anyhow::Result;

/// Print one key, or the whole configuration as TOML
pub fn run(cfg: &Config, out: Output, key: Option<&str>) -> Result<()> {
    match key {
        Some(key) => {
            let value = cfg
                .get(key)?
                .ok_or_else(|| anyhow::anyhow!("Unknown configuration key: {key}"))?;
            if out.json {
                return out.print_json(&serde_json::json!({ key: value }));
            }
            println!("{value}");
        }
        None if out.json => out.print_json(cfg)?,
        None => print!("{}", cfg.to_toml()?),
    }
    Ok(())
}
