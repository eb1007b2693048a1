// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Reaction port: where verdicts go once the session has classified them.

use std::time::Instant;

use orbit_app_core::notice::{NoticeBoard, NoticeKind};
use orbit_app_core::prefs::PlayerPrefs;
use orbit_graph::{Hash32, Verdict};

/// Payload of the one-shot "level complete" notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Level that was completed.
    pub level: String,
    /// Author-supplied popup text.
    pub message: String,
    /// Level to offer next, if any.
    pub next_level: Option<String>,
    /// Digest of the solved edge set.
    pub state_hash: Hash32,
}

/// Sink for verdict reactions. `Incomplete` has no reaction.
///
/// Implementations are UI adapters (popups, warnings) and should stay cheap.
pub trait ReactionPort {
    /// The live links solve the constellation.
    fn level_complete(&mut self, completion: &Completion);
    /// A disallowed link is present.
    fn constraint_violated(&mut self, level: &str, verdict: &Verdict);
}

impl<R: ReactionPort + ?Sized> ReactionPort for &mut R {
    fn level_complete(&mut self, completion: &Completion) {
        (**self).level_complete(completion);
    }

    fn constraint_violated(&mut self, level: &str, verdict: &Verdict) {
        (**self).constraint_violated(level, verdict);
    }
}

/// Reactions that do nothing (headless checks).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReactions;

impl ReactionPort for NoReactions {
    fn level_complete(&mut self, _completion: &Completion) {}

    fn constraint_violated(&mut self, _level: &str, _verdict: &Verdict) {}
}

/// Routes reactions onto a [`NoticeBoard`].
#[derive(Debug, Clone)]
pub struct NoticeReactions {
    board: NoticeBoard,
}

impl NoticeReactions {
    /// Wrap an existing board.
    pub fn new(board: NoticeBoard) -> Self {
        Self { board }
    }

    /// Board sized and timed from the player's prefs, clock starting at `now`.
    pub fn from_prefs(prefs: &PlayerPrefs, now: Instant) -> Self {
        Self::new(NoticeBoard::from_prefs(prefs, now))
    }

    /// Borrow the board for rendering.
    pub fn board(&self) -> &NoticeBoard {
        &self.board
    }

    /// Mutable board access (clock ticks, dismissals, extra notices).
    pub fn board_mut(&mut self) -> &mut NoticeBoard {
        &mut self.board
    }
}

impl ReactionPort for NoticeReactions {
    fn level_complete(&mut self, completion: &Completion) {
        let mut body = completion.message.clone();
        if let Some(next) = &completion.next_level {
            if !body.is_empty() {
                body.push(' ');
            }
            body.push_str(&format!("(next: {next})"));
        }
        self.board.post(
            NoticeKind::Complete,
            format!("Constellation complete: {}", completion.level),
            (!body.is_empty()).then_some(body),
        );
    }

    fn constraint_violated(&mut self, _level: &str, verdict: &Verdict) {
        self.board.post(
            NoticeKind::Warn,
            "Extra rope detected",
            Some(verdict.message.clone()),
        );
    }
}
