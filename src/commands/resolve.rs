// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Resolve command - shows which graph node a module query maps to

use super::Output;
use crate::config::Config;
use crate::error::FleetError;
use crate::graph::build_graph;
use crate::resolve::resolve_node;
use crate::store::FleetSnapshot;
use anyhow::Result;
use serde_json::json;

/// Run the resolve command
pub fn run(cfg: &Config, out: Output, query: &str) -> Result<()> {
    let snapshot = FleetSnapshot::require(&cfg.data_dir)?;
    let graph = build_graph(&snapshot.projects(), &cfg.build_options()?)?;

    let id = resolve_node(&graph, query)
        .ok_or_else(|| FleetError::ModuleNotFound(query.trim().to_string()))?;
    let node = graph.node(&id);

    if out.json {
        return out.print_json(&json!({ "query": query, "node": node }));
    }

    println!("{}", out.ident(&id));
    if let Some(node) = node {
        for (key, value) in &node.meta {
            println!("  {}: {value}", out.dim(key));
        }
        println!(
            "  {}: {} out, {} in",
            out.dim("edges"),
            graph.edges_from(&id).len(),
            graph.edges_to(&id).len()
        );
    }
    Ok(())
}
