// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Layers, lowest first: built-in defaults, a TOML file, `FLEETMAP_*`
//! environment variables. Command-line flags are applied by the binary.

use crate::classify::{ClassificationMode, ClientClassifier};
use crate::graph::BuildOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "FLEETMAP";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory for persistent data (fleet snapshot, rendered maps)
    pub data_dir: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Organisation prefix of internal client modules
    pub org_prefix: String,
    /// Client classification mode used for graph generation
    pub classification: ClassificationMode,
    /// Case-insensitive substrings excluding repositories and dependencies
    #[serde(default)]
    pub ignore: Vec<String>,
    /// Default neighbourhood radius
    pub radius: i32,
    /// Maximum scan depth (0 = unlimited)
    pub scan_max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: project_dirs()
                .map(|d| d.data_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".fleetmap")),
            log_level: "info".to_string(),
            org_prefix: "git.example.com/org".to_string(),
            classification: ClassificationMode::Strict,
            ignore: Vec::new(),
            radius: 1,
            scan_max_depth: 0,
        }
    }
}

impl Config {
    /// Classifier built from `org_prefix` and `classification`
    pub fn classifier(&self) -> Result<ClientClassifier> {
        ClientClassifier::new(&self.org_prefix, self.classification)
            .context("Invalid org_prefix in configuration")
    }

    /// Graph build options for this configuration
    pub fn build_options(&self) -> Result<BuildOptions> {
        Ok(BuildOptions::new(self.classifier()?).with_ignores(self.ignore.iter().cloned()))
    }

    /// Effective configuration rendered as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// Single key rendered as TOML, `None` for unknown keys
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = toml::Value::try_from(self).context("Failed to serialize configuration")?;
        Ok(value.get(key).map(|v| match v {
            toml::Value::String(s) => s.clone(),
            other => other.to_string(),
        }))
    }
}

/// Default config file location (`<config dir>/config.toml`)
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join("config.toml"))
}

/// Load configuration.
///
/// An explicit `path` must exist; the default location is optional.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let defaults = config::Config::try_from(&Config::default())
        .context("Failed to build default configuration")?;
    let mut builder = config::Config::builder().add_source(defaults);

    match path {
        Some(path) => {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }
        None => {
            if let Some(path) = default_config_path() {
                builder = builder.add_source(
                    config::File::from(path)
                        .format(config::FileFormat::Toml)
                        .required(false),
                );
            }
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("ignore"),
    );

    let label = path.map_or_else(|| "defaults".to_string(), |p| p.display().to_string());
    builder
        .build()
        .with_context(|| format!("Failed to load configuration from {label}"))?
        .try_deserialize()
        .with_context(|| format!("Invalid configuration in {label}"))
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("org", "fleetmap", "fleetmap")
}
