// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Map a free-form module or service query to a single graph node

use crate::graph::{last_segment, strip_namespace};
use crate::types::{Graph, Node};

/// Resolve `query` to a node id.
///
/// Tries, in order, stopping at the first hit:
/// 1. exact `meta.module`
/// 2. exact node id
/// 3. final path segment against labels, then modules, then
///    namespace-stripped ids, each a full pass over the node list
///
/// Nodes are scanned in graph order so ties resolve to the earliest node.
#[must_use]
pub fn resolve_node(graph: &Graph, query: &str) -> Option<String> {
    let q = query.trim();
    if q.is_empty() {
        return None;
    }

    let by_module = |n: &&Node| n.module() == Some(q);
    let by_id = |n: &&Node| n.id == q;

    let short = last_segment(q);
    let by_label = |n: &&Node| n.display_label().is_some_and(|l| last_segment(l) == short);
    let by_module_segment = |n: &&Node| n.module().is_some_and(|m| last_segment(m) == short);
    let by_id_segment = |n: &&Node| last_segment(strip_namespace(&n.id)) == short;

    let passes: [&dyn Fn(&&Node) -> bool; 5] =
        [&by_module, &by_id, &by_label, &by_module_segment, &by_id_segment];

    passes
        .iter()
        .find_map(|matches| graph.nodes.iter().find(|n| matches(n)))
        .map(|n| n.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeKind;
    use std::collections::BTreeMap;

    fn node(id: &str, kind: NodeKind, module: &str, label: &str) -> Node {
        let mut meta = BTreeMap::new();
        if !module.is_empty() {
            meta.insert("module".to_string(), module.to_string());
        }
        if !label.is_empty() {
            meta.insert("label".to_string(), label.to_string());
        }
        Node::new(id, kind, meta)
    }

    fn graph(nodes: Vec<Node>) -> Graph {
        Graph {
            nodes,
            edges: Vec::new(),
        }
    }

    #[test]
    fn test_exact_module_first() {
        let g = graph(vec![
            node("svc:drg", NodeKind::Service, "nghis/services/drg", "drg"),
            node("svc:nghis/services/drg", NodeKind::Service, "other", "other"),
        ]);
        assert_eq!(resolve_node(&g, "nghis/services/drg").as_deref(), Some("svc:drg"));
    }

    #[test]
    fn test_exact_id() {
        let g = graph(vec![
            node("svc:billing", NodeKind::Service, "org/billing", "billing"),
            node("dep:org/x", NodeKind::Client, "org/x", "x"),
        ]);
        assert_eq!(resolve_node(&g, "dep:org/x").as_deref(), Some("dep:org/x"));
    }

    #[test]
    fn test_label_pass_beats_earlier_module_match() {
        let g = graph(vec![
            node("dep:a", NodeKind::Client, "org/openapi/clients/go/v2", "something"),
            node("dep:b", NodeKind::Client, "org/b", "fooclient/v2"),
        ]);
        // dep:a matches by module segment and comes first, but dep:b matches by label
        assert_eq!(resolve_node(&g, "v2").as_deref(), Some("dep:b"));
    }

    #[test]
    fn test_module_segment_then_id_segment() {
        let g = graph(vec![
            node("svc:zeta", NodeKind::Service, "", ""),
            node("svc:other", NodeKind::Service, "org/teams/zeta", ""),
        ]);
        assert_eq!(resolve_node(&g, "zeta").as_deref(), Some("svc:other"));

        let g = graph(vec![node("svc:zeta", NodeKind::Service, "", "")]);
        assert_eq!(resolve_node(&g, "team/zeta").as_deref(), Some("svc:zeta"));
    }

    #[test]
    fn test_path_suffix_query() {
        let g = graph(vec![node("svc:svcA", NodeKind::Service, "org/x/svcA", "svcA")]);
        assert_eq!(resolve_node(&g, "  gitlab/teamx/svcA ").as_deref(), Some("svc:svcA"));
    }

    #[test]
    fn test_empty_and_missing() {
        let g = graph(vec![node("svc:a", NodeKind::Service, "org/a", "a")]);
        assert_eq!(resolve_node(&g, "   "), None);
        assert_eq!(resolve_node(&g, "nope"), None);
        assert_eq!(resolve_node(&Graph::default(), "a"), None);
    }

    #[test]
    fn test_first_node_wins_on_ties() {
        let g = graph(vec![
            node("svc:one", NodeKind::Service, "a/api", "api"),
            node("svc:two", NodeKind::Service, "b/api", "api"),
        ]);
        for _ in 0..3 {
            assert_eq!(resolve_node(&g, "api").as_deref(), Some("svc:one"));
        }
    }
}
