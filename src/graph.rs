// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Dependency graph construction from a fleet snapshot

use crate::classify::{derive_label, ClientClassifier};
use crate::error::FleetError;
use crate::types::{Edge, Graph, Node, NodeKind, Project, Relation};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Options for a single graph build
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Dependency classifier (strict for graph generation)
    pub classifier: ClientClassifier,
    /// Case-insensitive substrings that exclude repositories and dependencies
    pub ignores: Vec<String>,
    /// Caller asked for a clients-only view; carried into reports only
    pub clients_only: bool,
}

impl BuildOptions {
    /// Options with no ignore patterns
    #[must_use]
    pub fn new(classifier: ClientClassifier) -> Self {
        Self {
            classifier,
            ignores: Vec::new(),
            clients_only: false,
        }
    }

    /// Replace the ignore patterns
    #[must_use]
    pub fn with_ignores<I, S>(mut self, ignores: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignores = ignores.into_iter().map(Into::into).collect();
        self
    }
}

/// Accumulates nodes and edges with first-seen node metadata
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: Graph,
    seen: HashSet<String>,
}

impl GraphBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node unless one with the same id already exists
    pub fn add_node(&mut self, id: &str, kind: NodeKind, meta: BTreeMap<String, String>) {
        if self.seen.insert(id.to_string()) {
            self.graph.nodes.push(Node::new(id, kind, meta));
        }
    }

    /// Add an edge; both endpoints must already be present
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), FleetError> {
        if !self.seen.contains(&edge.from) {
            return Err(FleetError::MissingEndpoint(edge.from));
        }
        if !self.seen.contains(&edge.to) {
            return Err(FleetError::MissingEndpoint(edge.to));
        }
        self.graph.edges.push(edge);
        Ok(())
    }

    /// Finish and hand out the graph
    #[must_use]
    pub fn finish(self) -> Graph {
        self.graph
    }
}

/// Build the service → client graph for a fleet snapshot.
///
/// Ordinary libraries never become nodes. Duplicate dependency declarations
/// each yield their own edge.
pub fn build_graph(projects: &[Project], opts: &BuildOptions) -> Result<Graph, FleetError> {
    let mut builder = GraphBuilder::new();

    for project in projects {
        if should_ignore_project(&project.path, &opts.ignores) {
            debug!("Ignoring repository {}", project.path);
            continue;
        }
        if !project.has_module_identity() {
            debug!("Skipping {}: no module identity", project.path);
            continue;
        }

        let short = last_segment(&project.path);
        let svc_id = Node::make_id(NodeKind::Service, short);
        builder.add_node(
            &svc_id,
            NodeKind::Service,
            BTreeMap::from([
                ("module".to_string(), project.module_path().to_string()),
                ("path".to_string(), project.path.clone()),
                ("label".to_string(), short.to_string()),
            ]),
        );

        for lib in &project.libraries {
            if !opts.classifier.is_client_module(&lib.name) {
                continue;
            }
            if should_ignore_library(&lib.name, &opts.ignores) {
                debug!("Ignoring dependency {} of {}", lib.name, project.path);
                continue;
            }

            let dep_id = Node::make_id(NodeKind::Client, &lib.name);
            builder.add_node(
                &dep_id,
                NodeKind::Client,
                BTreeMap::from([
                    ("module".to_string(), lib.name.clone()),
                    ("label".to_string(), derive_label(&lib.name)),
                ]),
            );
            builder.add_edge(Edge {
                from: svc_id.clone(),
                to: dep_id,
                rel: Relation::Calls,
                version: lib.version.clone(),
            })?;
        }
    }

    let graph = builder.finish();
    info!(
        "Built graph from {} repositories: {} nodes, {} edges",
        projects.len(),
        graph.nodes.len(),
        graph.edges.len()
    );
    Ok(graph)
}

/// Whether any ignore pattern is a case-insensitive substring of the repo path
#[must_use]
pub fn should_ignore_project(path: &str, ignores: &[String]) -> bool {
    let lower = path.to_lowercase();
    ignores
        .iter()
        .map(|ig| ig.trim())
        .filter(|ig| !ig.is_empty())
        .any(|ig| lower.contains(&ig.to_lowercase()))
}

/// Whether a dependency path contains, or has a segment equal to, an ignore pattern
#[must_use]
pub fn should_ignore_library(module_path: &str, ignores: &[String]) -> bool {
    let lower = module_path.to_lowercase();
    ignores
        .iter()
        .map(|ig| ig.trim())
        .filter(|ig| !ig.is_empty())
        .any(|ig| {
            lower.contains(&ig.to_lowercase())
                || module_path.split('/').any(|seg| seg.eq_ignore_ascii_case(ig))
        })
}

/// Final `/` segment; the whole string when there is none or it ends in `/`
#[must_use]
pub fn last_segment(s: &str) -> &str {
    match s.rfind('/') {
        Some(i) if i + 1 < s.len() => &s[i + 1..],
        _ => s,
    }
}

/// Id with its `kind:` namespace removed
#[must_use]
pub fn strip_namespace(id: &str) -> &str {
    match id.find(':') {
        Some(i) if i + 1 < id.len() => &id[i + 1..],
        _ => id,
    }
}

// =============================================================================
// Graph queries
// =============================================================================

/// A client library included in an architecture graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureLibrary {
    /// Full module path
    pub module: String,
    /// Short label, when it differs from the module path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Version seen on the edges touching this client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Graph {
    /// Look up a node by id
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Get node count
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get edge count
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Check if the graph is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get edges from a specific node
    #[must_use]
    pub fn edges_from(&self, id: &str) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.from == id).collect()
    }

    /// Get edges to a specific node
    #[must_use]
    pub fn edges_to(&self, id: &str) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.to == id).collect()
    }

    /// Client libraries in this graph, sorted by module path
    #[must_use]
    pub fn libraries(&self) -> Vec<ArchitectureLibrary> {
        let by_id: HashMap<&str, &Node> = self.nodes.iter().map(|n| (n.id.as_str(), n)).collect();
        let mut libs: BTreeMap<String, ArchitectureLibrary> = BTreeMap::new();

        for node in self.nodes.iter().filter(|n| n.kind == NodeKind::Client) {
            let module = library_key(node);
            let entry = libs.entry(module.clone()).or_default();
            entry.module.clone_from(&module);
            if let Some(label) = node.display_label().filter(|l| *l != module) {
                entry.label = Some(label.to_string());
            }
        }

        for edge in self.edges.iter().filter(|e| !e.version.is_empty()) {
            let client = [edge.to.as_str(), edge.from.as_str()]
                .into_iter()
                .filter_map(|id| by_id.get(id))
                .find(|n| n.kind == NodeKind::Client);
            if let Some(node) = client {
                let module = library_key(node);
                let entry = libs.entry(module.clone()).or_default();
                entry.module = module;
                entry.version = Some(edge.version.clone());
            }
        }

        libs.into_values().collect()
    }

    /// Export to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize graph to JSON")
    }

    /// Load a graph previously written with [`Graph::save`]
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Save the graph as JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

fn library_key(node: &Node) -> String {
    node.module()
        .map_or_else(|| node.id.trim_start_matches("dep:").to_string(), str::to_string)
}
