// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Orbit levels and the live link session.
//!
//! A [`LevelDef`] describes the stars and the target constellation. A
//! [`LevelSession`] owns the ropes the player has thrown, revalidates on every
//! change, and routes the verdict to a [`ReactionPort`].
#![forbid(unsafe_code)]

mod error;
mod level;
mod reactions;
mod session;

pub use error::LevelError;
pub use level::{load_level, save_level, LevelDef};
pub use reactions::{Completion, NoReactions, NoticeReactions, ReactionPort};
pub use session::{LevelSession, Link, LinkChange, ValidationReport};
