// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Saved player preferences that shape how level reactions surface.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Player-facing preferences persisted under [`PREFS_KEY`](crate::config::PREFS_KEY).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerPrefs {
    /// Fire the completion reaction again for a solved graph already celebrated.
    pub retrigger_completion: bool,
    /// Lifetime of a notice, in milliseconds.
    pub notice_ttl_ms: u64,
    /// Maximum number of queued notices.
    pub max_notices: usize,
}

impl Default for PlayerPrefs {
    fn default() -> Self {
        Self {
            retrigger_completion: false,
            notice_ttl_ms: 4_000,
            max_notices: 8,
        }
    }
}

impl PlayerPrefs {
    /// Notice lifetime as a [`Duration`].
    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms)
    }
}
