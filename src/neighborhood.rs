// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Bounded neighbourhoods around a focus node
//!
//! Both policies treat edges as undirected for reachability and return an
//! induced subgraph as a new [`Graph`]; the input is never modified, so one
//! base graph can be filtered for many requests at once. Every call builds
//! its own adjacency map.

use crate::types::{Graph, Node, NodeKind};
use petgraph::graphmap::UnGraphMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Which traversal to use for a focused view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusPolicy {
    /// Hop radius limited to the centre service's top-level namespace
    #[default]
    Domain,
    /// Plain hop radius
    Radius,
}

/// Apply the chosen policy
#[must_use]
pub fn focus(graph: &Graph, center: &str, radius: i32, policy: FocusPolicy) -> Graph {
    match policy {
        FocusPolicy::Domain => filter_by_domain(graph, center, radius),
        FocusPolicy::Radius => filter_by_radius(graph, center, radius),
    }
}

/// Keep every node within `radius` hops of `center`, whatever its kind.
///
/// A negative radius is treated as zero.
#[must_use]
pub fn filter_by_radius(graph: &Graph, center: &str, radius: i32) -> Graph {
    let adj = adjacency(graph, center);
    let mut keep: HashSet<&str> = HashSet::from([center]);
    let mut frontier = vec![center];

    for _ in 0..radius.max(0) {
        let mut next = Vec::new();
        for &v in &frontier {
            for nb in adj.neighbors(v) {
                if keep.insert(nb) {
                    next.push(nb);
                }
            }
        }
        frontier = next;
        if frontier.is_empty() {
            break;
        }
    }

    induced(graph, &keep)
}

/// Keep the centre, every service in its domain, and whatever a radius
/// search from the centre reaches without leaving the domain.
///
/// The domain is the first `/` segment of the centre's module path. Services
/// and clients outside it are never admitted; other kinds are admitted when
/// reached. Falls back to [`filter_by_radius`] when the centre is not a
/// service with a module path.
#[must_use]
pub fn filter_by_domain(graph: &Graph, center: &str, radius: i32) -> Graph {
    let nodes_by_id: HashMap<&str, &Node> =
        graph.nodes.iter().map(|n| (n.id.as_str(), n)).collect();

    let domain = nodes_by_id
        .get(center)
        .filter(|n| n.kind == NodeKind::Service)
        .and_then(|n| n.module())
        .map(domain_prefix)
        .filter(|d| !d.is_empty());
    let Some(domain) = domain else {
        return filter_by_radius(graph, center, radius);
    };

    let adj = adjacency(graph, center);
    let mut keep: HashSet<&str> = HashSet::from([center]);
    keep.extend(
        graph
            .nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Service && matches_domain(n, domain))
            .map(|n| n.id.as_str()),
    );
    let mut frontier = vec![center];

    for _ in 0..radius.max(0) {
        let mut next = Vec::new();
        for &v in &frontier {
            for nb in adj.neighbors(v) {
                if keep.contains(nb) {
                    continue;
                }
                let admit = match nodes_by_id.get(nb) {
                    Some(n) if matches!(n.kind, NodeKind::Service | NodeKind::Client) => {
                        matches_domain(n, domain)
                    }
                    _ => true,
                };
                if admit {
                    keep.insert(nb);
                    next.push(nb);
                }
            }
        }
        frontier = next;
        if frontier.is_empty() {
            break;
        }
    }

    induced(graph, &keep)
}

/// First `/` segment of a module path, or the whole trimmed path
#[must_use]
pub fn domain_prefix(module: &str) -> &str {
    let module = module.trim();
    module.split_once('/').map_or(module, |(head, _)| head)
}

/// Whether a node's module equals the domain or lives under it
#[must_use]
pub fn matches_domain(node: &Node, domain: &str) -> bool {
    node.module().is_some_and(|m| {
        m == domain || m.strip_prefix(domain).is_some_and(|rest| rest.starts_with('/'))
    })
}

fn adjacency<'a>(graph: &'a Graph, center: &'a str) -> UnGraphMap<&'a str, ()> {
    let mut adj = UnGraphMap::new();
    adj.add_node(center);
    for e in &graph.edges {
        adj.add_edge(e.from.as_str(), e.to.as_str(), ());
    }
    adj
}

/// Kept nodes plus the edges whose endpoints are both among them
fn induced(graph: &Graph, keep: &HashSet<&str>) -> Graph {
    let nodes: Vec<Node> = graph
        .nodes
        .iter()
        .filter(|n| keep.contains(n.id.as_str()))
        .cloned()
        .collect();
    let present: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let edges = graph
        .edges
        .iter()
        .filter(|e| present.contains(e.from.as_str()) && present.contains(e.to.as_str()))
        .cloned()
        .collect();
    Graph { nodes, edges }
}
