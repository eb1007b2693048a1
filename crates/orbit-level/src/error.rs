// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error type for level loading and link changes.

use orbit_app_core::config::ConfigError;
use orbit_graph::{Edge, StarId, ValidateError};
use thiserror::Error;

/// Failures surfaced by level loading and the link session.
///
/// Puzzle outcomes (missing or disallowed links) are never errors; they are
/// reported through [`Verdict`](orbit_graph::Verdict).
#[derive(Debug, Error)]
pub enum LevelError {
    /// A link was requested from a star to itself.
    #[error("cannot link star {0} to itself")]
    SelfLink(StarId),
    /// A link referenced a star the level does not declare.
    #[error("unknown star {0}")]
    UnknownStar(StarId),
    /// A rule edge references a star the level does not declare.
    #[error("rule link {edge} references undeclared star {star}")]
    RuleReferencesUnknownStar {
        /// Offending rule edge.
        edge: Edge,
        /// Endpoint missing from the star list.
        star: StarId,
    },
    /// The star list declares the same id twice.
    #[error("star {0} declared more than once")]
    DuplicateStar(StarId),
    /// No level is stored under the requested name.
    #[error("level not found: {0}")]
    LevelNotFound(String),
    /// Config store failure.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Malformed level document.
    #[error("invalid level document: {0}")]
    Parse(#[from] serde_json::Error),
    /// The validator could not evaluate.
    #[error(transparent)]
    Validate(#[from] ValidateError),
}
