// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Report shapes and renderers for CLI output.

use std::process::ExitCode;

use comfy_table::{presets::UTF8_FULL, Table};
use orbit_graph::{Edge, EdgeSet, MatchMode, Rule, Verdict, VerdictState};
use orbit_level::LevelDef;
use serde::Serialize;

/// Exit status for a puzzle outcome: 0 solved, 2 incomplete, 3 disallowed link.
pub fn exit_code(state: VerdictState) -> ExitCode {
    match state {
        VerdictState::CorrectComplete => ExitCode::SUCCESS,
        VerdictState::Incomplete => ExitCode::from(2),
        VerdictState::HasForbidden => ExitCode::from(3),
    }
}

pub fn mode_name(mode: MatchMode) -> &'static str {
    match mode {
        MatchMode::Exact => "exact",
        MatchMode::ForbiddenList => "forbidden-list",
    }
}

/// JSON body of `orbit check`.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub level: String,
    pub mode: &'static str,
    pub state: VerdictState,
    pub message: String,
    pub edge: Option<Edge>,
    /// Required links absent from the input.
    pub missing: Vec<Edge>,
    /// Input links the rule disallows under its mode.
    pub disallowed: Vec<Edge>,
    pub state_hash: String,
}

impl CheckReport {
    pub fn new(level: &LevelDef, rule: &Rule, current: &EdgeSet, verdict: Verdict) -> Self {
        let disallowed = match rule.mode {
            MatchMode::Exact => current.difference(&rule.required).collect(),
            MatchMode::ForbiddenList => current
                .iter()
                .filter(|e| rule.forbidden.contains(*e))
                .collect(),
        };
        Self {
            level: level.name.clone(),
            mode: mode_name(rule.mode),
            state: verdict.state,
            message: verdict.message,
            edge: verdict.edge,
            missing: rule.required.difference(current).collect(),
            disallowed,
            state_hash: hex::encode(current.compute_hash()),
        }
    }

    pub fn render_text(&self) -> String {
        let mut text = format!("{}: {}", self.state, self.message);
        if !self.missing.is_empty() {
            text.push_str(&format!("\n  missing:    {}", join(&self.missing)));
        }
        if !self.disallowed.is_empty() {
            text.push_str(&format!("\n  disallowed: {}", join(&self.disallowed)));
        }
        text
    }
}

/// One `orbit play --json` record.
#[derive(Debug, Serialize)]
pub struct StepRecord {
    pub step: usize,
    pub action: String,
    pub outcome: &'static str,
    pub state: Option<VerdictState>,
    pub message: Option<String>,
    pub reactions: Vec<String>,
}

fn join(edges: &[Edge]) -> String {
    edges
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Table of a level's rule links.
pub fn rule_table(level: &LevelDef) -> Table {
    let rule = level.rule();
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["link", "role"]);
    for edge in rule.required.iter() {
        table.add_row(vec![edge.to_string(), "required".to_owned()]);
    }
    let forbidden_role = match rule.mode {
        MatchMode::Exact => "forbidden (ignored: exact mode)",
        MatchMode::ForbiddenList => "forbidden",
    };
    for edge in rule.forbidden.iter() {
        table.add_row(vec![edge.to_string(), forbidden_role.to_owned()]);
    }
    table
}
