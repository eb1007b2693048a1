// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Level documents: declared stars, the constellation rule, and what to show
//! once the constellation is complete.

use std::collections::BTreeSet;

use orbit_app_core::config::{level_key, ConfigService, ConfigStore};
use orbit_graph::{Edge, MatchMode, Rule, StarId};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::LevelError;

fn default_exact_match() -> bool {
    true
}

/// Static level data, authored once and read-only during play.
///
/// Edges are written as two-element arrays (`[1, 2]`) and canonicalized on
/// read, so `[2, 1]` names the same link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDef {
    /// Level name, also its storage key suffix.
    pub name: String,
    /// Declared star ids. Empty means "accept any id".
    #[serde(default)]
    pub stars: Vec<StarId>,
    /// Links that form the constellation.
    #[serde(default)]
    pub required: Vec<Edge>,
    /// Links that break the constellation (forbidden-list mode only).
    #[serde(default)]
    pub forbidden: Vec<Edge>,
    /// Exact-match mode when true, forbidden-list mode when false.
    #[serde(default = "default_exact_match")]
    pub exact_match: bool,
    /// Text shown by the completion popup.
    #[serde(default)]
    pub completion_message: String,
    /// Level to offer after completion, if any.
    #[serde(default)]
    pub next_level: Option<String>,
}

impl LevelDef {
    /// Parse a JSON level document.
    pub fn from_json(bytes: &[u8]) -> Result<Self, LevelError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Strategy selected by this level.
    pub fn mode(&self) -> MatchMode {
        MatchMode::from_exact_flag(self.exact_match)
    }

    /// Canonical rule for the validator.
    pub fn rule(&self) -> Rule {
        Rule {
            required: self.required.iter().copied().collect(),
            forbidden: self.forbidden.iter().copied().collect(),
            mode: self.mode(),
        }
    }

    /// True when `star` may take part in links on this level.
    pub fn declares(&self, star: StarId) -> bool {
        self.stars.is_empty() || self.stars.contains(&star)
    }

    /// First endpoint of `edge` this level does not declare, if any.
    pub fn undeclared_star(&self, edge: Edge) -> Option<StarId> {
        [edge.lo(), edge.hi()]
            .into_iter()
            .find(|&star| !self.declares(star))
    }

    /// Refuse player links that touch stars outside this level.
    pub fn check_links<'a, I>(&self, links: I) -> Result<(), LevelError>
    where
        I: IntoIterator<Item = &'a Edge>,
    {
        match links.into_iter().find_map(|&e| self.undeclared_star(e)) {
            Some(star) => Err(LevelError::UnknownStar(star)),
            None => Ok(()),
        }
    }

    /// Check the document for authoring mistakes.
    ///
    /// Self-paired rule edges are accepted (a required one can never be
    /// satisfied) and only logged.
    pub fn check(&self) -> Result<(), LevelError> {
        let mut seen = BTreeSet::new();
        for &star in &self.stars {
            if !seen.insert(star) {
                return Err(LevelError::DuplicateStar(star));
            }
        }

        for &edge in self.required.iter().chain(&self.forbidden) {
            if let Some(star) = self.undeclared_star(edge) {
                return Err(LevelError::RuleReferencesUnknownStar { edge, star });
            }
            if edge.is_self_loop() {
                warn!(level = %self.name, %edge, "rule contains a self-paired link");
            }
        }

        if self.exact_match && !self.forbidden.is_empty() {
            warn!(
                level = %self.name,
                count = self.forbidden.len(),
                "forbidden links are ignored in exact-match mode"
            );
        }
        Ok(())
    }
}

/// Load the level stored under `name`.
pub fn load_level<S: ConfigStore>(
    service: &ConfigService<S>,
    name: &str,
) -> Result<LevelDef, LevelError> {
    service
        .load::<LevelDef>(&level_key(name))?
        .ok_or_else(|| LevelError::LevelNotFound(name.to_owned()))
}

/// Persist `level` under its own name.
pub fn save_level<S: ConfigStore>(
    service: &ConfigService<S>,
    level: &LevelDef,
) -> Result<(), LevelError> {
    service.save(&level_key(&level.name), level)?;
    Ok(())
}
