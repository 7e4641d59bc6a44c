// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Manifest dependency classification: internal client vs. ordinary library

use crate::error::FleetError;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Path segment that marks generated OpenAPI Go clients
const OPENAPI_CLIENTS_SEGMENT: &str = "/openapi/clients/go/";

/// How strictly a module path must follow the client naming convention
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationMode {
    /// `<org>/openapi/clients/go/<name>[/v<major>]` only (graph generation)
    #[default]
    Strict,
    /// Any path under `<org>/` containing `client` (client-package scanning)
    Loose,
}

impl ClassificationMode {
    /// Parse a mode name
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Some(Self::Strict),
            "loose" => Some(Self::Loose),
            _ => None,
        }
    }
}

/// Decides whether a dependency is an internal client worth graphing
#[derive(Debug, Clone)]
pub struct ClientClassifier {
    org_prefix: String,
    mode: ClassificationMode,
    strict: Regex,
}

impl ClientClassifier {
    /// Create a classifier for an organisation prefix such as `git.example.com/org`
    pub fn new(org_prefix: &str, mode: ClassificationMode) -> Result<Self, FleetError> {
        let org_prefix = org_prefix.trim().trim_end_matches('/').to_string();
        let pattern = format!(
            r"^{}/openapi/clients/go/[^/]+(?:/v\d+)?$",
            regex::escape(&org_prefix)
        );
        let strict = Regex::new(&pattern).map_err(|source| FleetError::InvalidPattern {
            prefix: org_prefix.clone(),
            source,
        })?;
        Ok(Self {
            org_prefix,
            mode,
            strict,
        })
    }

    /// Organisation prefix this classifier matches
    #[must_use]
    pub fn org_prefix(&self) -> &str {
        &self.org_prefix
    }

    /// Active classification mode
    #[must_use]
    pub fn mode(&self) -> ClassificationMode {
        self.mode
    }

    /// Classify using the configured mode
    #[must_use]
    pub fn is_client_module(&self, module_path: &str) -> bool {
        match self.mode {
            ClassificationMode::Strict => self.matches_strict(module_path),
            ClassificationMode::Loose => self.matches_loose(module_path),
        }
    }

    /// Strict convention check, regardless of mode
    #[must_use]
    pub fn matches_strict(&self, module_path: &str) -> bool {
        self.strict.is_match(module_path)
    }

    /// Loose substring check, regardless of mode
    #[must_use]
    pub fn matches_loose(&self, module_path: &str) -> bool {
        let lower = module_path.trim().to_lowercase();
        if lower.is_empty() {
            return false;
        }
        let prefix = format!("{}/", self.org_prefix.to_lowercase());
        lower.starts_with(&prefix) && lower.contains("client")
    }
}

/// Strict-pattern classification for a one-off check
#[must_use]
pub fn is_client_module_strict(module_path: &str, org_prefix: &str) -> bool {
    ClientClassifier::new(org_prefix, ClassificationMode::Strict)
        .is_ok_and(|c| c.matches_strict(module_path))
}

/// Loose substring classification for a one-off check
#[must_use]
pub fn is_client_module_loose(module_path: &str, org_prefix: &str) -> bool {
    ClientClassifier::new(org_prefix, ClassificationMode::Loose)
        .is_ok_and(|c| c.matches_loose(module_path))
}

// =============================================================================
// Labels
// =============================================================================

type LabelRule = fn(&str) -> Option<String>;

/// Label rules, first match wins. Rendering stability depends on this order.
const LABEL_RULES: &[LabelRule] = &[label_after_openapi_segment, label_from_client_segment];

/// Short display label for a dependency module path
#[must_use]
pub fn derive_label(module_path: &str) -> String {
    LABEL_RULES
        .iter()
        .find_map(|rule| rule(module_path))
        .unwrap_or_else(|| module_path.to_string())
}

/// `.../openapi/clients/go/fooclient/v2` → `fooclient/v2`
fn label_after_openapi_segment(module_path: &str) -> Option<String> {
    let start = module_path.find(OPENAPI_CLIENTS_SEGMENT)? + OPENAPI_CLIENTS_SEGMENT.len();
    let rest = &module_path[start..];
    (!rest.is_empty()).then(|| rest.to_string())
}

/// `.../client/v3/user-service` → `client/v3/user-service`
fn label_from_client_segment(module_path: &str) -> Option<String> {
    let parts: Vec<&str> = module_path.split('/').collect();
    let idx = parts.iter().position(|p| p.eq_ignore_ascii_case("client"))?;
    (idx + 1 < parts.len()).then(|| parts[idx..].join("/"))
}
