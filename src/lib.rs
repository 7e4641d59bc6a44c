// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Fleetmap library - service dependency maps for a fleet of Go repositories
//!
//! This crate inventories repository manifests, classifies internal client
//! libraries, builds a service → client dependency graph and cuts focused
//! neighbourhoods out of it for rendering and search.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod archmap;
pub mod classify;
pub mod commands;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod graph;
pub mod manifest;
pub mod neighborhood;
pub mod render;
pub mod resolve;
pub mod scanner;
pub mod search;
pub mod store;

/// Core data types shared by the builder, filters and renderers
pub mod types {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;

    // =========================================================================
    // Fleet Inventory
    // =========================================================================

    /// A module dependency declared in a repository manifest
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Library {
        /// Module path (e.g. `github.com/pkg/errors`)
        pub name: String,
        /// Effective version after replace directives
        pub version: String,
        /// Replacement path, when a replace directive rewrote it
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub path: Option<String>,
    }

    impl Library {
        /// Create a library entry without a replacement path
        #[must_use]
        pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                version: version.into(),
                path: None,
            }
        }
    }

    /// A scanned repository, optionally enriched with its parsed manifest
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Project {
        /// Stable numeric identifier from the repository listing
        pub id: u64,
        /// Repository name
        pub name: String,
        /// Full namespaced repository path (e.g. `nghis/services/drg`)
        #[serde(alias = "path_with_namespace")]
        pub path: String,
        /// Module path declared by the manifest
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub module: Option<String>,
        /// Runtime version declared by the manifest (`go` directive)
        #[serde(default, skip_serializing_if = "String::is_empty")]
        pub go_version: String,
        /// Last modification time of the repository
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub updated_at: Option<DateTime<Utc>>,
        /// Declared dependencies, in declaration order
        #[serde(default)]
        pub libraries: Vec<Library>,
    }

    impl Project {
        /// Whether the manifest gave this repository a module identity.
        ///
        /// Repositories without one (no manifest, or one that failed to
        /// parse) never become service nodes.
        #[must_use]
        pub fn has_module_identity(&self) -> bool {
            let declared = self.module.as_deref().is_some_and(|m| !m.trim().is_empty());
            declared || !self.go_version.is_empty()
        }

        /// Module path used for the service node, falling back to the repo path
        #[must_use]
        pub fn module_path(&self) -> &str {
            match self.module.as_deref() {
                Some(m) if !m.trim().is_empty() => m,
                _ => &self.path,
            }
        }
    }

    /// Search parameters for fleet queries; also the input of the search hash
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SearchCriteria {
        /// Runtime version to compare against
        #[serde(default, skip_serializing_if = "String::is_empty")]
        pub go_version: String,
        /// Comparator for the runtime version
        #[serde(default, skip_serializing_if = "String::is_empty")]
        pub go_version_comparison: String,
        /// Exact library module path
        #[serde(default, skip_serializing_if = "String::is_empty")]
        pub library: String,
        /// Library version to compare against
        #[serde(default, skip_serializing_if = "String::is_empty")]
        pub version: String,
        /// Comparator for the library version
        #[serde(default, skip_serializing_if = "String::is_empty")]
        pub version_comparison: String,
        /// Substring of the repository path
        #[serde(default, skip_serializing_if = "String::is_empty")]
        pub group: String,
        /// Case-insensitive substring of the repository name
        #[serde(default, skip_serializing_if = "String::is_empty")]
        pub tag: String,
    }

    // =========================================================================
    // Dependency Graph
    // =========================================================================

    /// Node kinds
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum NodeKind {
        /// A scanned repository
        Service,
        /// An internal client library
        Client,
        /// An event-bus topic (reserved)
        Topic,
    }

    impl NodeKind {
        /// Id namespace for this kind
        #[must_use]
        pub fn namespace(&self) -> &'static str {
            match self {
                Self::Service => "svc",
                Self::Client => "dep",
                Self::Topic => "topic",
            }
        }
    }

    /// Relationship types
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Relation {
        /// Service declares a dependency on a client
        Calls,
        /// Service publishes to a topic (reserved)
        Produces,
        /// Service consumes a topic (reserved)
        Consumes,
    }

    impl Relation {
        /// Wire name of the relation
        #[must_use]
        pub fn as_str(&self) -> &'static str {
            match self {
                Self::Calls => "calls",
                Self::Produces => "produces",
                Self::Consumes => "consumes",
            }
        }
    }

    /// Vertex in the dependency graph
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Node {
        /// Unique id: `svc:<short-name>`, `dep:<module-path>` or `topic:<name>`
        pub id: String,
        /// Node kind
        #[serde(rename = "type")]
        pub kind: NodeKind,
        /// Display label (mirrors `meta.label`)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub label: Option<String>,
        /// Metadata: `module`, `label`, and `path` for services
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        pub meta: BTreeMap<String, String>,
    }

    impl Node {
        /// Build a namespaced node id
        #[must_use]
        pub fn make_id(kind: NodeKind, name: &str) -> String {
            format!("{}:{}", kind.namespace(), name)
        }

        /// Create a node, mirroring `meta.label` into `label`
        #[must_use]
        pub fn new(id: impl Into<String>, kind: NodeKind, meta: BTreeMap<String, String>) -> Self {
            let label = meta.get("label").filter(|l| !l.is_empty()).cloned();
            Self {
                id: id.into(),
                kind,
                label,
                meta,
            }
        }

        /// Metadata value, treating empty values as absent
        #[must_use]
        pub fn meta_value(&self, key: &str) -> Option<&str> {
            self.meta.get(key).map(String::as_str).filter(|v| !v.is_empty())
        }

        /// `meta.module`, if set
        #[must_use]
        pub fn module(&self) -> Option<&str> {
            self.meta_value("module")
        }

        /// `meta.label`, if set
        #[must_use]
        pub fn display_label(&self) -> Option<&str> {
            self.meta_value("label")
        }
    }

    /// Directed relation between two node ids
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Edge {
        /// Consuming node id
        pub from: String,
        /// Depended-upon node id
        pub to: String,
        /// Relationship type
        pub rel: Relation,
        /// Declared dependency version, may be empty
        #[serde(default, skip_serializing_if = "String::is_empty")]
        pub version: String,
    }

    /// Node and edge lists; serializes to the renderer's wire shape
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Graph {
        /// All nodes, in insertion order
        #[serde(default)]
        pub nodes: Vec<Node>,
        /// All edges, in insertion order
        #[serde(default)]
        pub edges: Vec<Edge>,
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::types::*;
    pub use anyhow::{Context, Result};
}
