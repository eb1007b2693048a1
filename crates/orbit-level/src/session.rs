// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Live link ownership for one level.
//!
//! The session is the only owner of the level's links. Every change rebuilds
//! the canonical edge snapshot from scratch, hands it to the validator, and
//! dispatches the verdict to the reaction port.

use std::fmt;

use orbit_app_core::prefs::PlayerPrefs;
use orbit_graph::{
    ConstellationValidator, Edge, EdgeSet, Hash32, StarId, Verdict, VerdictState,
};
use tracing::{debug, info, instrument, warn};

use crate::error::LevelError;
use crate::level::LevelDef;
use crate::reactions::{Completion, ReactionPort};

/// A rope between two stars, remembering which end it was thrown from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    /// Star the rope was thrown from.
    pub from: StarId,
    /// Star the rope landed on.
    pub to: StarId,
}

impl Link {
    /// True when this link joins `x` and `y` in either direction.
    pub fn connects(self, x: StarId, y: StarId) -> bool {
        (self.from == x && self.to == y) || (self.from == y && self.to == x)
    }

    /// True when either end is `star`.
    pub fn touches(self, star: StarId) -> bool {
        self.from == star || self.to == star
    }

    /// Endpoint opposite `star`, if the link touches it.
    pub fn other_end(self, star: StarId) -> Option<StarId> {
        if self.from == star {
            Some(self.to)
        } else if self.to == star {
            Some(self.from)
        } else {
            None
        }
    }

    /// Canonical edge for validation.
    pub fn edge(self) -> Edge {
        Edge::new(self.from, self.to)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

/// Result of one revalidation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Monotonic revalidation counter, starting at 1.
    pub epoch: u64,
    /// Classification of the snapshot.
    pub verdict: Verdict,
    /// Number of distinct edges in the snapshot.
    pub edge_count: usize,
    /// Digest of the snapshot.
    pub state_hash: Hash32,
    /// Whether the completion reaction fired for this report.
    pub celebrated: bool,
}

/// What a link request did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkChange {
    /// A new link was added and the level revalidated.
    Created(ValidationReport),
    /// The pair was already linked; nothing changed and nothing was revalidated.
    AlreadyLinked,
    /// The link was removed and the level revalidated.
    Removed(ValidationReport),
    /// No such link existed; the level was still revalidated.
    NotLinked(ValidationReport),
}

impl LinkChange {
    /// Report attached to this change, if a revalidation happened.
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            Self::Created(r) | Self::Removed(r) | Self::NotLinked(r) => Some(r),
            Self::AlreadyLinked => None,
        }
    }
}

/// Owns a level's live links and routes verdicts to `R`.
pub struct LevelSession<R> {
    level: LevelDef,
    validator: ConstellationValidator,
    links: Vec<Link>,
    reactions: R,
    retrigger_completion: bool,
    epoch: u64,
    /// The previous verdict was `CorrectComplete`.
    solved: bool,
    last_report: Option<ValidationReport>,
}

impl<R: ReactionPort> LevelSession<R> {
    /// Check `level` and open a session with no links.
    pub fn new(level: LevelDef, reactions: R) -> Result<Self, LevelError> {
        level.check()?;
        let validator = ConstellationValidator::with_rule(level.rule());
        info!(
            level = %level.name,
            mode = ?level.mode(),
            required = level.required.len(),
            "level loaded"
        );
        Ok(Self {
            level,
            validator,
            links: Vec::new(),
            reactions,
            retrigger_completion: false,
            epoch: 0,
            solved: false,
            last_report: None,
        })
    }

    /// Apply player prefs that affect dispatch.
    pub fn with_prefs(mut self, prefs: &PlayerPrefs) -> Self {
        self.retrigger_completion = prefs.retrigger_completion;
        self
    }

    /// Level being played.
    pub fn level(&self) -> &LevelDef {
        &self.level
    }

    /// Live links in creation order.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Live links touching `star`.
    pub fn links_at(&self, star: StarId) -> impl Iterator<Item = Link> + '_ {
        self.links.iter().copied().filter(move |l| l.touches(star))
    }

    /// Canonical snapshot of the live links.
    pub fn current_edges(&self) -> EdgeSet {
        self.links.iter().map(|l| l.edge()).collect()
    }

    /// Most recent report, if any change has been validated.
    pub fn last_report(&self) -> Option<&ValidationReport> {
        self.last_report.as_ref()
    }

    /// Borrow the reaction sink.
    pub fn reactions(&self) -> &R {
        &self.reactions
    }

    /// Mutably borrow the reaction sink.
    pub fn reactions_mut(&mut self) -> &mut R {
        &mut self.reactions
    }

    /// Close the session and hand back the reaction sink.
    pub fn into_reactions(self) -> R {
        self.reactions
    }

    /// Throw a rope from `from` to `to`.
    #[instrument(level = "debug", skip(self))]
    pub fn create_link(&mut self, from: StarId, to: StarId) -> Result<LinkChange, LevelError> {
        if from == to {
            return Err(LevelError::SelfLink(from));
        }
        for star in [from, to] {
            if !self.level.declares(star) {
                return Err(LevelError::UnknownStar(star));
            }
        }
        if self.links.iter().any(|l| l.connects(from, to)) {
            debug!("link already present");
            return Ok(LinkChange::AlreadyLinked);
        }
        self.links.push(Link { from, to });
        debug!(links = self.links.len(), "link created");
        Ok(LinkChange::Created(self.revalidate()?))
    }

    /// Remove the rope joining `a` and `b`, in either direction.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_link(&mut self, a: StarId, b: StarId) -> Result<LinkChange, LevelError> {
        let position = self.links.iter().position(|l| l.connects(a, b));
        if let Some(index) = position {
            self.links.remove(index);
            debug!(links = self.links.len(), "link removed");
        }
        let report = self.revalidate()?;
        Ok(match position {
            Some(_) => LinkChange::Removed(report),
            None => LinkChange::NotLinked(report),
        })
    }

    /// Remove every rope touching `star`; revalidates once.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_links_at(
        &mut self,
        star: StarId,
    ) -> Result<(Vec<Link>, ValidationReport), LevelError> {
        let (removed, kept): (Vec<Link>, Vec<Link>) =
            self.links.iter().copied().partition(|l| l.touches(star));
        self.links = kept;
        debug!(removed = removed.len(), "links cleared at star");
        Ok((removed, self.revalidate()?))
    }

    /// Rebuild the snapshot, classify it, and dispatch the verdict.
    pub fn revalidate(&mut self) -> Result<ValidationReport, LevelError> {
        let current = self.current_edges();
        let verdict = self.validator.validate(&current)?;
        let state_hash = current.compute_hash();
        self.epoch += 1;

        let mut celebrated = false;
        match verdict.state {
            VerdictState::CorrectComplete => {
                let entering = !self.solved;
                self.solved = true;
                if self.retrigger_completion || entering {
                    info!(level = %self.level.name, epoch = self.epoch, "constellation complete");
                    celebrated = true;
                    self.reactions.level_complete(&Completion {
                        level: self.level.name.clone(),
                        message: self.level.completion_message.clone(),
                        next_level: self.level.next_level.clone(),
                        state_hash,
                    });
                } else {
                    debug!("constellation still complete");
                }
            }
            VerdictState::HasForbidden => {
                self.solved = false;
                warn!(
                    level = %self.level.name,
                    message = %verdict.message,
                    "extra rope detected"
                );
                self.reactions.constraint_violated(&self.level.name, &verdict);
            }
            VerdictState::Incomplete => {
                self.solved = false;
                debug!(message = %verdict.message, "constellation incomplete");
            }
        }

        let report = ValidationReport {
            epoch: self.epoch,
            verdict,
            edge_count: current.len(),
            state_hash,
            celebrated,
        };
        self.last_report = Some(report.clone());
        Ok(report)
    }
}
