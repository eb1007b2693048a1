// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Constellation rule evaluation.
//!
//! A [`Rule`] is authored once per level and read-only afterwards. Each call to
//! [`Rule::validate`] classifies a caller-owned snapshot of live links from
//! scratch; nothing is remembered between calls, so concurrent callers can
//! share one rule without synchronization.
//!
//! Both strategies scan `current` before `required`, so a disallowed link
//! always wins over a missing one. Edge sets iterate in ascending order, which
//! makes the named edge the smallest offender.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::edge::{Edge, EdgeSet, StarId};

/// Outcome class of one validation call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerdictState {
    /// At least one required link is missing and nothing disallowed is present.
    Incomplete,
    /// A disallowed link is present.
    HasForbidden,
    /// The live links satisfy the rule.
    CorrectComplete,
}

impl fmt::Display for VerdictState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Incomplete => "incomplete",
            Self::HasForbidden => "has-forbidden",
            Self::CorrectComplete => "correct-complete",
        })
    }
}

/// Classification plus a human-readable diagnostic.
///
/// `message` is informational; callers branch on `state` only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Outcome class.
    pub state: VerdictState,
    /// Diagnostic naming the offending or missing link, or a success note.
    pub message: String,
    /// The link the message refers to (`None` on success).
    pub edge: Option<Edge>,
}

impl Verdict {
    fn extra(edge: Edge) -> Self {
        Self {
            state: VerdictState::HasForbidden,
            message: format!("Extra (forbidden) link {edge}"),
            edge: Some(edge),
        }
    }

    fn forbidden(edge: Edge) -> Self {
        Self {
            state: VerdictState::HasForbidden,
            message: format!("Forbidden link {edge}"),
            edge: Some(edge),
        }
    }

    fn missing(edge: Edge) -> Self {
        Self {
            state: VerdictState::Incomplete,
            message: format!("Missing required link {edge}"),
            edge: Some(edge),
        }
    }

    fn complete(message: &str) -> Self {
        Self {
            state: VerdictState::CorrectComplete,
            message: message.to_owned(),
            edge: None,
        }
    }

    /// Shorthand for `state == CorrectComplete`.
    pub fn is_complete(&self) -> bool {
        self.state == VerdictState::CorrectComplete
    }
}

/// Matching strategy, chosen when the rule is configured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    /// Live links must equal the required set; any other link is disallowed.
    #[default]
    Exact,
    /// Required links must be present and forbidden links absent; other links are ignored.
    ForbiddenList,
}

impl MatchMode {
    /// Map the level-data boolean onto a strategy.
    pub fn from_exact_flag(exact_match: bool) -> Self {
        if exact_match {
            Self::Exact
        } else {
            Self::ForbiddenList
        }
    }
}

/// Required/forbidden links plus the strategy that interprets them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Links that must all be present.
    pub required: EdgeSet,
    /// Links that must be absent. Consulted only by [`MatchMode::ForbiddenList`].
    pub forbidden: EdgeSet,
    /// Strategy.
    pub mode: MatchMode,
}

impl Rule {
    /// Build a rule from raw star pairs; every pair is canonicalized.
    pub fn from_pairs<R, F>(required: R, forbidden: F, mode: MatchMode) -> Self
    where
        R: IntoIterator<Item = (StarId, StarId)>,
        F: IntoIterator<Item = (StarId, StarId)>,
    {
        Self {
            required: EdgeSet::from_pairs(required),
            forbidden: EdgeSet::from_pairs(forbidden),
            mode,
        }
    }

    /// Classify `current` against this rule.
    pub fn validate(&self, current: &EdgeSet) -> Verdict {
        match self.mode {
            MatchMode::Exact => validate_exact(&self.required, current),
            MatchMode::ForbiddenList => {
                validate_forbidden_list(&self.required, &self.forbidden, current)
            }
        }
    }
}

/// Exact strategy: `current` must equal `required`.
pub fn validate_exact(required: &EdgeSet, current: &EdgeSet) -> Verdict {
    if let Some(extra) = current.iter().find(|e| !required.contains(*e)) {
        return Verdict::extra(extra);
    }
    if let Some(missing) = required.iter().find(|e| !current.contains(*e)) {
        return Verdict::missing(missing);
    }
    Verdict::complete("All required links present, no extra links.")
}

/// Forbidden-list strategy: links outside both lists are tolerated.
pub fn validate_forbidden_list(
    required: &EdgeSet,
    forbidden: &EdgeSet,
    current: &EdgeSet,
) -> Verdict {
    if let Some(hit) = current.iter().find(|e| forbidden.contains(*e)) {
        return Verdict::forbidden(hit);
    }
    if let Some(missing) = required.iter().find(|e| !current.contains(*e)) {
        return Verdict::missing(missing);
    }
    Verdict::complete("All required links present.")
}

/// Failure to evaluate at all (as opposed to a puzzle outcome).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidateError {
    /// `validate` was called before any rule was configured.
    #[error("constellation validator has no rule configured")]
    NotConfigured,
}

/// Holder for the level's rule with the configure/validate call surface.
#[derive(Clone, Debug, Default)]
pub struct ConstellationValidator {
    rule: Option<Rule>,
}

impl ConstellationValidator {
    /// Unconfigured validator; [`validate`](Self::validate) fails until
    /// [`configure`](Self::configure) or [`set_rule`](Self::set_rule) runs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validator preloaded with `rule`.
    pub fn with_rule(rule: Rule) -> Self {
        Self { rule: Some(rule) }
    }

    /// Install a rule from raw pairs, replacing any previous rule.
    pub fn configure<R, F>(&mut self, required: R, forbidden: F, exact_match: bool)
    where
        R: IntoIterator<Item = (StarId, StarId)>,
        F: IntoIterator<Item = (StarId, StarId)>,
    {
        self.rule = Some(Rule::from_pairs(
            required,
            forbidden,
            MatchMode::from_exact_flag(exact_match),
        ));
    }

    /// Install a prepared rule, replacing any previous rule.
    pub fn set_rule(&mut self, rule: Rule) {
        self.rule = Some(rule);
    }

    /// Currently configured rule, if any.
    pub fn rule(&self) -> Option<&Rule> {
        self.rule.as_ref()
    }

    /// Classify `current` against the configured rule.
    pub fn validate(&self, current: &EdgeSet) -> Result<Verdict, ValidateError> {
        self.rule
            .as_ref()
            .map(|rule| rule.validate(current))
            .ok_or(ValidateError::NotConfigured)
    }
}
