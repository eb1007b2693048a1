// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Canonical star-link graph and constellation validation for Orbit.
//!
//! Pure data and pure functions: edges are canonicalized on construction,
//! edge sets iterate deterministically, and validation is a stateless
//! classification of a caller-owned snapshot.
#![forbid(unsafe_code)]

mod edge;
mod validator;

pub use edge::{canonicalize, Edge, EdgeSet, Hash32, ParseEdgeError, StarId};
pub use validator::{
    validate_exact, validate_forbidden_list, ConstellationValidator, MatchMode, Rule,
    ValidateError, Verdict, VerdictState,
};
