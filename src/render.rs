// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Text renderings of a dependency graph (Mermaid and Graphviz DOT)

use crate::graph::strip_namespace;
use crate::types::{Edge, Graph, Node, NodeKind, Relation};
use std::collections::{HashMap, HashSet};
use std::fmt::Write;

/// Render a Mermaid `flowchart LR` diagram
#[must_use]
pub fn to_mermaid(graph: &Graph) -> String {
    let ids = build_id_map(graph);
    let mut out = String::from("flowchart LR\n");

    for node in &graph.nodes {
        let label = escape_mermaid(&node_label(node));
        let _ = writeln!(out, "  {}[\"{} {}\"]", ids[node.id.as_str()], glyph(node.kind), label);
    }

    for edge in &graph.edges {
        let (Some(from), Some(to)) = (ids.get(edge.from.as_str()), ids.get(edge.to.as_str())) else {
            continue;
        };
        let _ = writeln!(out, "  {from} -->|{}| {to}", escape_mermaid(&edge_label(edge)));
    }

    out
}

/// Render a Graphviz digraph with the same labels as the Mermaid output
#[must_use]
pub fn to_dot(graph: &Graph) -> String {
    let mut dot = String::from("digraph fleet {\n");
    dot.push_str("  rankdir=LR;\n");
    dot.push_str("  node [shape=box, style=rounded];\n\n");

    for node in &graph.nodes {
        let shape = match node.kind {
            NodeKind::Service => "box",
            NodeKind::Client => "component",
            NodeKind::Topic => "ellipse",
        };
        let _ = writeln!(
            dot,
            "  \"{}\" [label=\"{}\", shape={shape}];",
            escape_dot(&node.id),
            escape_dot(&node_label(node))
        );
    }

    dot.push('\n');

    for edge in &graph.edges {
        let label = edge_label(edge);
        let _ = writeln!(
            dot,
            "  \"{}\" -> \"{}\" [label=\"{}\"];",
            escape_dot(&edge.from),
            escape_dot(&edge.to),
            escape_dot(&label)
        );
    }

    dot.push_str("}\n");
    dot
}

/// `meta.label`, else the id without its namespace
#[must_use]
pub fn node_label(node: &Node) -> String {
    node.display_label()
        .unwrap_or_else(|| strip_namespace(&node.id))
        .to_string()
}

/// Mermaid-safe identifier for a node id.
///
/// Characters outside `[A-Za-z0-9_-]` become `_`, a leading digit gets a
/// `_` prefix and an empty result becomes `node`.
#[must_use]
pub fn sanitize_id(id: &str) -> String {
    let mut out: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    if out.is_empty() {
        return "node".to_string();
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Unique Mermaid ids for every node, suffixing `_2`, `_3`… on collision
#[must_use]
pub fn build_id_map(graph: &Graph) -> HashMap<&str, String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut map = HashMap::new();

    for node in &graph.nodes {
        if map.contains_key(node.id.as_str()) {
            continue;
        }
        let base = sanitize_id(&node.id);
        let mut candidate = base.clone();
        let mut n = 2;
        while used.contains(&candidate) {
            candidate = format!("{base}_{n}");
            n += 1;
        }
        used.insert(candidate.clone());
        map.insert(node.id.as_str(), candidate);
    }
    map
}

/// Base name for rendered files: `<base>-arch.json`, `<base>-arch.mmd`.
///
/// An empty module means the full fleet and yields `full`; a module with no
/// usable characters yields `arch`.
#[must_use]
pub fn sanitize_file_base(name: &str) -> String {
    if name.trim().is_empty() {
        return FULL_FLEET_BASE.to_string();
    }
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '-' })
        .collect();
    let cleaned = cleaned.trim_matches(|c| c == '-' || c == '.');
    if cleaned.is_empty() {
        "arch".to_string()
    } else {
        cleaned.to_string()
    }
}

/// File base used when no module was focused
pub const FULL_FLEET_BASE: &str = "full";

fn glyph(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Service => "🧩",
        NodeKind::Client => "📦",
        NodeKind::Topic => "🛰",
    }
}

/// Relation name, with the version for `calls` edges that carry one
fn edge_label(edge: &Edge) -> String {
    match edge.rel {
        Relation::Calls if !edge.version.is_empty() => format!("calls ({})", edge.version),
        rel => rel.as_str().to_string(),
    }
}

fn escape_mermaid(s: &str) -> String {
    s.replace('"', "#quot;").replace('|', "#124;")
}

fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
