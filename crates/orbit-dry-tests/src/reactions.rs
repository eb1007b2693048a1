// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Reaction recorder for asserting on verdict dispatch.

use orbit_graph::Verdict;
use orbit_level::{Completion, ReactionPort};

/// One dispatched reaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    /// `level_complete` fired.
    Complete(Completion),
    /// `constraint_violated` fired.
    Violated {
        /// Level name passed to the port.
        level: String,
        /// Verdict passed to the port.
        verdict: Verdict,
    },
}

/// [`ReactionPort`] that records every call in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingReactions {
    events: Vec<Reaction>,
}

impl RecordingReactions {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far.
    pub fn events(&self) -> &[Reaction] {
        &self.events
    }

    /// Number of completion reactions.
    pub fn completions(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Reaction::Complete(_)))
            .count()
    }

    /// Number of violation reactions.
    pub fn violations(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Reaction::Violated { .. }))
            .count()
    }

    /// Forget recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl ReactionPort for RecordingReactions {
    fn level_complete(&mut self, completion: &Completion) {
        self.events.push(Reaction::Complete(completion.clone()));
    }

    fn constraint_violated(&mut self, level: &str, verdict: &Verdict) {
        self.events.push(Reaction::Violated {
            level: level.to_owned(),
            verdict: verdict.clone(),
        });
    }
}
