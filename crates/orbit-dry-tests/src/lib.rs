// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for Orbit crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`config`] - In-memory config store fake for testing without filesystem
//! - [`levels`] - Level builder and canned constellations
//! - [`reactions`] - Reaction port that records dispatch order

pub mod config;
pub mod levels;
pub mod reactions;

pub use config::InMemoryConfigStore;
pub use levels::{forbidden_list_level, triangle_level, LevelBuilder};
pub use reactions::{Reaction, RecordingReactions};
