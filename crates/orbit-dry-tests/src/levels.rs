// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Level builders and canned constellations.

use orbit_graph::{Edge, StarId};
use orbit_level::LevelDef;

/// Fluent builder for [`LevelDef`] fixtures.
///
/// Defaults: exact-match mode, no declared stars (any id accepted), empty
/// completion message.
#[derive(Debug, Clone)]
pub struct LevelBuilder {
    level: LevelDef,
}

impl LevelBuilder {
    /// Start a level called `name`.
    pub fn new(name: &str) -> Self {
        Self {
            level: LevelDef {
                name: name.to_owned(),
                stars: Vec::new(),
                required: Vec::new(),
                forbidden: Vec::new(),
                exact_match: true,
                completion_message: String::new(),
                next_level: None,
            },
        }
    }

    /// Declare stars.
    pub fn stars(mut self, stars: impl IntoIterator<Item = StarId>) -> Self {
        self.level.stars.extend(stars);
        self
    }

    /// Add required links.
    pub fn require(mut self, pairs: &[(StarId, StarId)]) -> Self {
        self.level
            .required
            .extend(pairs.iter().copied().map(Edge::from));
        self
    }

    /// Add forbidden links.
    pub fn forbid(mut self, pairs: &[(StarId, StarId)]) -> Self {
        self.level
            .forbidden
            .extend(pairs.iter().copied().map(Edge::from));
        self
    }

    /// Select forbidden-list mode.
    pub fn forbidden_list_mode(mut self) -> Self {
        self.level.exact_match = false;
        self
    }

    /// Completion popup text.
    pub fn completion_message(mut self, message: &str) -> Self {
        self.level.completion_message = message.to_owned();
        self
    }

    /// Level offered after completion.
    pub fn next_level(mut self, name: &str) -> Self {
        self.level.next_level = Some(name.to_owned());
        self
    }

    /// Finish.
    pub fn build(self) -> LevelDef {
        self.level
    }
}

/// Exact-match triangle over stars 1..=4 (star 4 is a decoy).
pub fn triangle_level() -> LevelDef {
    LevelBuilder::new("triangle")
        .stars(1..=4)
        .require(&[(1, 2), (2, 3), (3, 1)])
        .completion_message("Triangulum complete.")
        .next_level("aries")
        .build()
}

/// Forbidden-list level: require 1-2, forbid 1-3, tolerate anything else.
pub fn forbidden_list_level() -> LevelDef {
    LevelBuilder::new("legacy")
        .stars(1..=5)
        .require(&[(1, 2)])
        .forbid(&[(1, 3)])
        .forbidden_list_mode()
        .build()
}
