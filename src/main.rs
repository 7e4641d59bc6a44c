// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Fleetmap CLI - service dependency maps for a fleet of Go repositories

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fleetmap::commands::{self, export::ExportArgs, Output};
use fleetmap::types::SearchCriteria;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fleetmap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "FLEETMAP_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Data directory override
    #[arg(long, env = "FLEETMAP_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Organisation prefix of internal client modules
    #[arg(long, global = true)]
    org_prefix: Option<String>,

    /// Ignore repositories and dependencies containing this text (repeatable)
    #[arg(long = "ignore", global = true)]
    ignore: Vec<String>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", global = true, value_parser = clap::builder::FalseyValueParser::new())]
    no_color: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a directory tree for Go modules and store the fleet snapshot
    Scan {
        /// Path to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Maximum directory depth (0 = unlimited)
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Export the architecture graph
    Export {
        /// Output format (json, mermaid, dot); defaults to json
        #[arg(short, long)]
        format: Option<String>,

        /// Module or service to focus on
        #[arg(short, long)]
        module: Option<String>,

        /// Hop radius around the focused module
        #[arg(short, long, allow_negative_numbers = true)]
        radius: Option<i32>,

        /// Plain radius traversal instead of staying within the domain
        #[arg(long)]
        radius_only: bool,

        /// Report a clients-only view
        #[arg(long)]
        clients_only: bool,

        /// Output file (stdout if not specified)
        #[arg(short, long, conflicts_with = "out_dir")]
        output: Option<PathBuf>,

        /// Write <module>-arch.json and <module>-arch.mmd into this directory
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Show which graph node a module or service name resolves to
    Resolve {
        /// Module path, repository path, label or node id
        query: String,
    },

    /// Suggest libraries, modules or versions used in the fleet
    Search {
        /// What to search: libraries, modules, go, versions
        kind: String,

        /// Case-insensitive substring (empty matches everything)
        #[arg(default_value = "")]
        query: String,

        /// Library whose versions to list (for `versions`)
        #[arg(long)]
        library: Option<String>,

        /// Maximum number of results
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// List projects matching search criteria
    Projects {
        /// Runtime version to compare against
        #[arg(long)]
        go_version: Option<String>,

        /// Comparator for --go-version (gt, gte, lt, lte, exact)
        #[arg(long)]
        go_cmp: Option<String>,

        /// Exact library module path
        #[arg(long)]
        library: Option<String>,

        /// Library version to compare against
        #[arg(long = "lib-version")]
        lib_version: Option<String>,

        /// Comparator for --lib-version
        #[arg(long)]
        lib_cmp: Option<String>,

        /// Substring of the repository path
        #[arg(long)]
        group: Option<String>,

        /// Substring of the repository name
        #[arg(long)]
        tag: Option<String>,
    },

    /// List internal client dependencies of every repository
    Clients {
        /// Append the full module path to each row
        #[arg(long)]
        full_path: bool,
    },

    /// Print project fingerprints
    Hash {
        /// Project id, path or name (all projects if omitted)
        project: Option<String>,
    },

    /// Compare a fresh scan with the stored snapshot
    Changes {
        /// Path to rescan (defaults to the stored scan root)
        path: Option<PathBuf>,
    },

    /// Show the effective configuration
    Config {
        /// Configuration key (all keys if omitted)
        key: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut cfg = fleetmap::config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        cfg.data_dir = dir;
    }
    if let Some(prefix) = cli.org_prefix {
        cfg.org_prefix = prefix;
    }
    cfg.ignore.extend(cli.ignore);

    // Initialize logging; RUST_LOG wins over flags and config
    let level = match cli.verbose {
        0 if cli.quiet => "error",
        0 => cfg.log_level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let out = Output {
        json: cli.json,
        color: !cli.no_color && !cli.json,
    };

    match cli.command {
        Commands::Scan { path, max_depth } => commands::scan::run(&cfg, out, path, max_depth),
        Commands::Export {
            format,
            module,
            radius,
            radius_only,
            clients_only,
            output,
            out_dir,
        } => commands::export::run(
            &cfg,
            out,
            ExportArgs {
                format,
                module,
                radius,
                radius_only,
                clients_only,
                output,
                out_dir,
            },
        ),
        Commands::Resolve { query } => commands::resolve::run(&cfg, out, &query),
        Commands::Search {
            kind,
            query,
            library,
            limit,
        } => commands::search::run(&cfg, out, &kind, &query, library.as_deref(), limit),
        Commands::Projects {
            go_version,
            go_cmp,
            library,
            lib_version,
            lib_cmp,
            group,
            tag,
        } => {
            let criteria = SearchCriteria {
                go_version: go_version.unwrap_or_default(),
                go_version_comparison: go_cmp.unwrap_or_default(),
                library: library.unwrap_or_default(),
                version: lib_version.unwrap_or_default(),
                version_comparison: lib_cmp.unwrap_or_default(),
                group: group.unwrap_or_default(),
                tag: tag.unwrap_or_default(),
            };
            commands::projects::run(&cfg, out, &criteria)
        }
        Commands::Clients { full_path } => commands::clients::run(&cfg, out, full_path),
        Commands::Hash { project } => commands::hash::run(&cfg, out, project.as_deref()),
        Commands::Changes { path } => commands::changes::run(&cfg, out, path),
        Commands::Config { key } => commands::config::run(&cfg, out, key.as_deref()),
        Commands::Completions { shell } => commands::completions::run(shell, &mut Cli::command()),
    }
}
