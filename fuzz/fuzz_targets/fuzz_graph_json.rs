// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell
#![no_main]

use fleetmap::neighborhood::{filter_by_domain, filter_by_radius};
use fleetmap::render::{to_dot, to_mermaid};
use fleetmap::resolve::resolve_node;
use fleetmap::types::Graph;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(graph) = serde_json::from_slice::<Graph>(data) else {
        return;
    };
    let _ = to_mermaid(&graph);
    let _ = to_dot(&graph);
    if let Some(first) = graph.nodes.first() {
        let center = resolve_node(&graph, &first.id).unwrap_or_default();
        let radius = filter_by_radius(&graph, &center, 2);
        let domain = filter_by_domain(&graph, &center, 2);
        assert!(radius.nodes.len() <= graph.nodes.len());
        assert!(domain.nodes.len() <= graph.nodes.len());
    }
});
