// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Export command - renders the fleet architecture in various formats

use super::Output;
use crate::archmap::{generate, FocusRequest};
use crate::config::Config;
use crate::neighborhood::FocusPolicy;
use crate::render::{sanitize_file_base, to_dot, to_mermaid};
use crate::store::FleetSnapshot;
use anyhow::{bail, Context, Result};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Architecture report as JSON
    Json,
    /// Mermaid flowchart
    Mermaid,
    /// Graphviz DOT format
    Dot,
}

impl ExportFormat {
    /// Parse format from string
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "mermaid" | "mmd" => Some(Self::Mermaid),
            "dot" | "graphviz" => Some(Self::Dot),
            _ => None,
        }
    }

    /// Get file extension for format
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Mermaid => "mmd",
            Self::Dot => "dot",
        }
    }
}

/// Export options gathered from the command line
#[derive(Debug, Clone, Default)]
pub struct ExportArgs {
    /// Output format name (JSON when absent)
    pub format: Option<String>,
    /// Module or service to focus on
    pub module: Option<String>,
    /// Hop radius (configuration default when absent)
    pub radius: Option<i32>,
    /// Use the plain radius policy instead of the domain policy
    pub radius_only: bool,
    /// Report a clients-only view
    pub clients_only: bool,
    /// Output file (stdout if not specified)
    pub output: Option<PathBuf>,
    /// Write `<base>-arch.json` and `<base>-arch.mmd` into this directory
    pub out_dir: Option<PathBuf>,
}

/// Pick the output format; the global `--json` flag only agrees with `json`
fn resolve_format(name: Option<&str>, json: bool) -> Result<ExportFormat> {
    let Some(name) = name else {
        return Ok(ExportFormat::Json);
    };
    let format = ExportFormat::parse(name)
        .with_context(|| format!("Unknown export format: {name}. Supported: json, mermaid, dot"))?;
    if json && format != ExportFormat::Json {
        bail!("--json cannot be combined with --format {name}");
    }
    Ok(format)
}

/// Run the export command
pub fn run(cfg: &Config, out: Output, args: ExportArgs) -> Result<()> {
    let format = resolve_format(args.format.as_deref(), out.json)?;
    info!("Exporting to {:?}", format);

    let snapshot = FleetSnapshot::require(&cfg.data_dir)?;
    if snapshot.entries.is_empty() {
        out.warn("Fleet snapshot is empty. Run 'fleetmap scan' first.");
    }

    let mut opts = cfg.build_options()?;
    opts.clients_only = args.clients_only;
    let policy = if args.radius_only {
        FocusPolicy::Radius
    } else {
        FocusPolicy::Domain
    };
    let request = FocusRequest {
        module: args.module.clone(),
        radius: args.radius.unwrap_or(cfg.radius),
        policy,
    };
    let arch = generate(&snapshot.projects(), &opts, &request)?;

    if let Some(dir) = args.out_dir {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        let base = sanitize_file_base(&arch.module);
        let json_path = dir.join(format!("{base}-arch.json"));
        let mmd_path = dir.join(format!("{base}-arch.mmd"));
        let json = serde_json::to_string_pretty(&arch).context("Failed to serialize architecture")?;
        fs::write(&json_path, json)
            .with_context(|| format!("Failed to write {}", json_path.display()))?;
        fs::write(&mmd_path, to_mermaid(&arch.graph))
            .with_context(|| format!("Failed to write {}", mmd_path.display()))?;
        if out.json {
            return out.print_json(&[&json_path, &mmd_path]);
        }
        println!("Exported to {}", out.ok(&json_path.display().to_string()));
        println!("Exported to {}", out.ok(&mmd_path.display().to_string()));
        return Ok(());
    }

    let content = match format {
        ExportFormat::Json => {
            serde_json::to_string_pretty(&arch).context("Failed to serialize architecture")?
        }
        ExportFormat::Mermaid => to_mermaid(&arch.graph),
        ExportFormat::Dot => to_dot(&arch.graph),
    };

    match args.output {
        Some(path) => {
            fs::write(&path, &content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
            println!("Exported to {}", out.ok(&path.display().to_string()));
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.trim_end().as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }

    Ok(())
}
