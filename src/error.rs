// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error types for graph construction and manifest parsing

use thiserror::Error;

/// Errors raised while building or focusing the dependency graph
#[derive(Debug, Error)]
pub enum FleetError {
    /// No node matched the requested module or service
    #[error("could not find node for module {0:?}")]
    ModuleNotFound(String),

    /// An edge referenced a node that was never added
    #[error("edge endpoint not found: {0}")]
    MissingEndpoint(String),

    /// The configured organisation prefix produced an unusable pattern
    #[error("invalid client pattern for prefix {prefix:?}: {source}")]
    InvalidPattern {
        /// Organisation prefix the pattern was built from
        prefix: String,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },
}

/// Errors raised while parsing a `go.mod` manifest
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    /// A directive line could not be understood
    #[error("go.mod:{line}: {message}")]
    Syntax {
        /// 1-based line number
        line: usize,
        /// What was wrong with the line
        message: String,
    },

    /// A `directive (` block was never closed
    #[error("go.mod:{line}: unterminated {directive} block")]
    UnterminatedBlock {
        /// Directive that opened the block
        directive: String,
        /// Line the block opened on
        line: usize,
    },
}
