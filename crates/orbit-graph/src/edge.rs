// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Canonical undirected star links and ordered edge sets.
//!
//! Every [`Edge`] is stored as `(min, max)` so `(a, b)` and `(b, a)` are the
//! same value. Construction is the only way in, so a non-canonical edge cannot
//! be observed anywhere downstream.

use std::collections::btree_set;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Star identifier assigned by level data. Stable for the lifetime of a level.
pub type StarId = u32;

/// 32-byte blake3 digest of an edge set.
pub type Hash32 = [u8; 32];

const EDGE_SET_DOMAIN: &[u8] = b"orbit.edge-set.v1";

/// Order a star pair as `(min, max)`.
///
/// Equal endpoints are passed through untouched; the result is a degenerate
/// self-paired edge that set semantics treat like any other value.
pub fn canonicalize(x: StarId, y: StarId) -> (StarId, StarId) {
    if x <= y {
        (x, y)
    } else {
        (y, x)
    }
}

/// An undirected link between two stars, always held in canonical order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "[StarId; 2]", into = "[StarId; 2]")]
pub struct Edge {
    lo: StarId,
    hi: StarId,
}

impl Edge {
    /// Build the canonical edge joining `a` and `b`.
    pub fn new(a: StarId, b: StarId) -> Self {
        let (lo, hi) = canonicalize(a, b);
        Self { lo, hi }
    }

    /// Smaller endpoint.
    pub fn lo(self) -> StarId {
        self.lo
    }

    /// Larger endpoint.
    pub fn hi(self) -> StarId {
        self.hi
    }

    /// Both endpoints as `(min, max)`.
    pub fn pair(self) -> (StarId, StarId) {
        (self.lo, self.hi)
    }

    /// True when both endpoints are the same star.
    pub fn is_self_loop(self) -> bool {
        self.lo == self.hi
    }

    /// True when `star` is one of the endpoints.
    pub fn touches(self, star: StarId) -> bool {
        self.lo == star || self.hi == star
    }
}

impl From<(StarId, StarId)> for Edge {
    fn from((a, b): (StarId, StarId)) -> Self {
        Self::new(a, b)
    }
}

impl From<[StarId; 2]> for Edge {
    fn from([a, b]: [StarId; 2]) -> Self {
        Self::new(a, b)
    }
}

impl From<Edge> for [StarId; 2] {
    fn from(edge: Edge) -> Self {
        [edge.lo, edge.hi]
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.lo, self.hi)
    }
}

/// Failure to parse an `a-b` edge literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseEdgeError {
    /// No `-` separator.
    #[error("expected `a-b`, got {0:?}")]
    MissingSeparator(String),
    /// An endpoint is not a star id.
    #[error("invalid star id {0:?}")]
    InvalidStar(String),
}

impl FromStr for Edge {
    type Err = ParseEdgeError;

    /// Parse `a-b` (surrounding whitespace allowed), canonicalizing the pair.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| ParseEdgeError::MissingSeparator(s.to_owned()))?;
        let star = |raw: &str| {
            raw.trim()
                .parse::<StarId>()
                .map_err(|_| ParseEdgeError::InvalidStar(raw.trim().to_owned()))
        };
        Ok(Self::new(star(a)?, star(b)?))
    }
}

/// Set of canonical edges with deterministic (ascending) iteration order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeSet {
    edges: BTreeSet<Edge>,
}

impl EdgeSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from raw star pairs, canonicalizing each one.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (StarId, StarId)>,
    {
        pairs.into_iter().map(Edge::from).collect()
    }

    /// Insert an edge; returns false when it was already present.
    pub fn insert(&mut self, edge: Edge) -> bool {
        self.edges.insert(edge)
    }

    /// Remove an edge; returns false when it was absent.
    pub fn remove(&mut self, edge: Edge) -> bool {
        self.edges.remove(&edge)
    }

    /// Membership test.
    pub fn contains(&self, edge: Edge) -> bool {
        self.edges.contains(&edge)
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// True when the set holds no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Iterate edges in ascending `(min, max)` order.
    pub fn iter(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges.iter().copied()
    }

    /// True when every edge of `self` is also in `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.edges.is_subset(&other.edges)
    }

    /// Edges of `self` that are not in `other`, ascending.
    pub fn difference<'a>(&'a self, other: &'a Self) -> impl Iterator<Item = Edge> + 'a {
        self.edges.difference(&other.edges).copied()
    }

    /// Edges with equal endpoints, ascending.
    pub fn self_loops(&self) -> impl Iterator<Item = Edge> + '_ {
        self.iter().filter(|e| e.is_self_loop())
    }

    /// Domain-separated blake3 digest over the canonical edge order.
    ///
    /// Equal sets hash equally regardless of how they were built.
    pub fn compute_hash(&self) -> Hash32 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(EDGE_SET_DOMAIN);
        hasher.update(&(self.edges.len() as u64).to_le_bytes());
        for edge in &self.edges {
            hasher.update(&edge.lo.to_le_bytes());
            hasher.update(&edge.hi.to_le_bytes());
        }
        hasher.finalize().into()
    }
}

impl FromIterator<Edge> for EdgeSet {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        Self {
            edges: iter.into_iter().collect(),
        }
    }
}

impl Extend<Edge> for EdgeSet {
    fn extend<I: IntoIterator<Item = Edge>>(&mut self, iter: I) {
        self.edges.extend(iter);
    }
}

impl IntoIterator for EdgeSet {
    type Item = Edge;
    type IntoIter = btree_set::IntoIter<Edge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.into_iter()
    }
}

impl<'a> IntoIterator for &'a EdgeSet {
    type Item = Edge;
    type IntoIter = std::iter::Copied<btree_set::Iter<'a, Edge>>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter().copied()
    }
}

impl fmt::Display for EdgeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, edge) in self.edges.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{edge}")?;
        }
        f.write_str("}")
    }
}
