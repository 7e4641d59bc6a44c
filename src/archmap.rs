// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Architecture reports: build, resolve the focus module, cut a neighbourhood

use crate::error::FleetError;
use crate::graph::{build_graph, ArchitectureLibrary, BuildOptions};
use crate::neighborhood::{focus, FocusPolicy};
use crate::resolve::resolve_node;
use crate::types::{Graph, Project};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Which part of the fleet to report on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusRequest {
    /// Module or service query; blank or absent means the whole fleet
    pub module: Option<String>,
    /// Hop radius around the resolved node
    pub radius: i32,
    /// Traversal policy
    pub policy: FocusPolicy,
}

impl FocusRequest {
    /// The whole fleet, unfiltered
    #[must_use]
    pub fn full() -> Self {
        Self::default()
    }

    /// Focus on `module` within `radius` hops
    #[must_use]
    pub fn around(module: impl Into<String>, radius: i32) -> Self {
        Self {
            module: Some(module.into()),
            radius,
            policy: FocusPolicy::default(),
        }
    }

    /// Override the traversal policy
    #[must_use]
    pub fn with_policy(mut self, policy: FocusPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn query(&self) -> Option<&str> {
        self.module.as_deref().map(str::trim).filter(|m| !m.is_empty())
    }
}

/// A generated architecture view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Architecture {
    /// Requested module, empty for the whole fleet
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub module: String,
    /// Radius used for the focused view
    pub radius: i32,
    /// Clients-only view was requested
    pub clients_only: bool,
    /// Generation time
    pub generated_at: DateTime<Utc>,
    /// Resulting graph
    pub graph: Graph,
    /// Client libraries present in `graph`
    pub libraries: Vec<ArchitectureLibrary>,
}

/// Build the fleet graph and narrow it to the requested focus
pub fn generate(
    projects: &[Project],
    opts: &BuildOptions,
    request: &FocusRequest,
) -> Result<Architecture, FleetError> {
    let full = build_graph(projects, opts)?;

    let (module, graph) = match request.query() {
        None => (String::new(), full),
        Some(query) => {
            let center = resolve_node(&full, query)
                .ok_or_else(|| FleetError::ModuleNotFound(query.to_string()))?;
            let graph = focus(&full, &center, request.radius, request.policy);
            info!(
                "Focused on {} (radius {}, {:?}): {} of {} nodes",
                center,
                request.radius,
                request.policy,
                graph.node_count(),
                full.node_count()
            );
            (query.to_string(), graph)
        }
    };

    Ok(Architecture {
        module,
        radius: request.radius,
        clients_only: opts.clients_only,
        generated_at: Utc::now(),
        libraries: graph.libraries(),
        graph,
    })
}
