// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for Orbit (config, prefs, notices).
//! Keeps game/runtime adapters thin and framework-agnostic.

pub mod config;
pub mod notice;
pub mod prefs;
