// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! On-screen notices raised by level reactions.
//!
//! The board keeps its own clock, advanced by [`NoticeBoard::tick`] once per
//! frame (or once per scripted step). Repeats of the same headline inside the
//! coalesce window fold into the existing notice and bump its repeat count.
//! Completion notices are sticky: they stay up until dismissed, like the
//! level-complete popup.

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use crate::prefs::PlayerPrefs;

/// What a notice reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Neutral status line.
    Info,
    /// A rule was broken (e.g. a disallowed link).
    Warn,
    /// The constellation was completed. Sticky.
    Complete,
}

impl NoticeKind {
    /// Sticky notices ignore the TTL and wait for [`NoticeBoard::dismiss`].
    pub fn is_sticky(self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Complete => "complete",
        })
    }
}

/// Identifier for a notice; ids increase in posting order.
pub type NoticeId = u64;

/// Notice held by the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Stable identifier.
    pub id: NoticeId,
    /// Kind.
    pub kind: NoticeKind,
    /// Headline; repeats are matched on kind and headline.
    pub title: String,
    /// Detail text from the latest repeat.
    pub body: Option<String>,
    /// How many times this headline was raised while the notice was up.
    pub repeats: u32,
    refreshed: Instant,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.title)?;
        if let Some(body) = &self.body {
            write!(f, " - {body}")?;
        }
        if self.repeats > 1 {
            write!(f, " (x{})", self.repeats)?;
        }
        Ok(())
    }
}

/// Render-ready view of a notice.
#[derive(Debug, Clone, PartialEq)]
pub struct NoticeView {
    /// The notice.
    pub notice: Notice,
    /// Remaining life, 1.0 when fresh down to 0.0. Sticky notices stay at 1.0.
    pub progress: f32,
}

/// Bounded notice queue with its own clock.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    queue: VecDeque<Notice>,
    capacity: usize,
    ttl: Duration,
    coalesce_window: Duration,
    now: Instant,
    next_id: NoticeId,
}

impl NoticeBoard {
    /// Board holding at most `capacity` notices (at least one), each living `ttl`.
    pub fn new(capacity: usize, ttl: Duration, now: Instant) -> Self {
        Self {
            queue: VecDeque::new(),
            capacity: capacity.max(1),
            ttl,
            coalesce_window: Duration::from_millis(500),
            now,
            next_id: 1,
        }
    }

    /// Board sized and timed from the player's prefs.
    pub fn from_prefs(prefs: &PlayerPrefs, now: Instant) -> Self {
        Self::new(prefs.max_notices, prefs.notice_ttl(), now)
    }

    /// Override the coalesce window (default 500 ms).
    pub fn with_dedupe_window(mut self, window: Duration) -> Self {
        self.coalesce_window = window;
        self
    }

    /// Board clock.
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Advance the clock and drop expired notices. The clock never runs backwards.
    pub fn tick(&mut self, now: Instant) {
        self.now = self.now.max(now);
        let (now, ttl) = (self.now, self.ttl);
        self.queue
            .retain(|n| n.kind.is_sticky() || now.duration_since(n.refreshed) < ttl);
    }

    /// Raise a notice at the board clock and return its id.
    ///
    /// A notice with the same kind and headline refreshed within the coalesce
    /// window absorbs the repeat. When the board is full the oldest
    /// non-sticky notice makes room (or the oldest of all if every one is sticky).
    pub fn post<S, B>(&mut self, kind: NoticeKind, title: S, body: B) -> NoticeId
    where
        S: Into<String>,
        B: Into<Option<String>>,
    {
        let title = title.into();
        let body = body.into();
        let now = self.now;
        let window = self.coalesce_window;

        if let Some(existing) = self.queue.iter_mut().find(|n| {
            n.kind == kind && n.title == title && now.duration_since(n.refreshed) <= window
        }) {
            existing.body = body;
            existing.repeats += 1;
            existing.refreshed = now;
            return existing.id;
        }

        if self.queue.len() >= self.capacity {
            let victim = self
                .queue
                .iter()
                .position(|n| !n.kind.is_sticky())
                .unwrap_or(0);
            self.queue.remove(victim);
        }
        let id = self.next_id;
        self.next_id += 1;
        self.queue.push_back(Notice {
            id,
            kind,
            title,
            body,
            repeats: 1,
            refreshed: now,
        });
        id
    }

    /// Take a notice down; false when it is not on the board.
    pub fn dismiss(&mut self, id: NoticeId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|n| n.id != id);
        self.queue.len() != before
    }

    /// Notices first posted after `id`, oldest first. Coalesced repeats keep
    /// their original id and do not show up here again.
    pub fn posted_after(&self, id: NoticeId) -> impl Iterator<Item = &Notice> + '_ {
        self.queue.iter().filter(move |n| n.id > id)
    }

    /// Id of the most recently posted notice (0 before the first post).
    pub fn last_id(&self) -> NoticeId {
        self.next_id - 1
    }

    /// Notices on the board with their remaining life, oldest first.
    pub fn visible(&self) -> Vec<NoticeView> {
        self.queue
            .iter()
            .map(|n| {
                let progress = if n.kind.is_sticky() || self.ttl.is_zero() {
                    1.0
                } else {
                    let age = self.now.duration_since(n.refreshed).as_secs_f32();
                    (1.0 - age / self.ttl.as_secs_f32()).max(0.0)
                };
                NoticeView {
                    notice: n.clone(),
                    progress,
                }
            })
            .collect()
    }

    /// Number of notices on the board.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True when the board is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(2);

    fn board(capacity: usize) -> (NoticeBoard, Instant) {
        let t0 = Instant::now();
        (NoticeBoard::new(capacity, TTL, t0), t0)
    }

    #[test]
    fn repeat_inside_window_coalesces_with_latest_body() {
        let (mut board, t0) = board(4);
        let a = board.post(NoticeKind::Warn, "Extra rope", Some("link 3-4".to_owned()));
        board.tick(t0 + Duration::from_millis(100));
        let b = board.post(NoticeKind::Warn, "Extra rope", Some("link 1-4".to_owned()));
        assert_eq!(a, b);
        assert_eq!(board.len(), 1);
        let shown = &board.visible()[0].notice;
        assert_eq!(shown.repeats, 2);
        assert_eq!(shown.to_string(), "[warn] Extra rope - link 1-4 (x2)");
        assert_eq!(board.posted_after(a).count(), 0);
    }

    #[test]
    fn repeat_outside_window_is_a_new_notice() {
        let (board, t0) = board(4);
        let mut board = board.with_dedupe_window(Duration::from_millis(50));
        let a = board.post(NoticeKind::Warn, "Extra rope", None::<String>);
        board.tick(t0 + Duration::from_millis(100));
        let b = board.post(NoticeKind::Warn, "Extra rope", None::<String>);
        assert_ne!(a, b);
        assert_eq!(board.posted_after(a).map(|n| n.id).collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn full_board_evicts_oldest_non_sticky() {
        let (mut board, _) = board(2);
        let done = board.post(NoticeKind::Complete, "Constellation complete", None::<String>);
        board.post(NoticeKind::Info, "one", None::<String>);
        board.post(NoticeKind::Info, "two", None::<String>);
        let titles: Vec<_> = board.visible().into_iter().map(|v| v.notice.title).collect();
        assert_eq!(titles, vec!["Constellation complete".to_owned(), "two".to_owned()]);
        assert!(board.dismiss(done));
        assert!(!board.dismiss(done));
        assert_eq!(board.last_id(), 3);
    }

    #[test]
    fn ttl_expires_all_but_sticky() {
        let (mut board, t0) = board(4);
        board.post(NoticeKind::Warn, "Extra rope", None::<String>);
        board.post(NoticeKind::Complete, "Constellation complete", Some("Aries".to_owned()));
        board.tick(t0 + Duration::from_secs(1));
        let half = board.visible();
        assert!((half[0].progress - 0.5).abs() < 1e-3);
        assert!((half[1].progress - 1.0).abs() < f32::EPSILON);

        board.tick(t0 + TTL);
        let left: Vec<_> = board.visible().into_iter().map(|v| v.notice.kind).collect();
        assert_eq!(left, vec![NoticeKind::Complete]);

        // An earlier timestamp does not rewind the clock.
        board.tick(t0);
        assert_eq!(board.now(), t0 + TTL);
    }

    #[test]
    fn prefs_size_the_board() {
        let prefs = PlayerPrefs {
            max_notices: 0,
            ..PlayerPrefs::default()
        };
        let mut board = NoticeBoard::from_prefs(&prefs, Instant::now());
        board.post(NoticeKind::Info, "one", None::<String>);
        board.post(NoticeKind::Info, "two", None::<String>);
        assert_eq!(board.len(), 1);
    }
}
