// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Subcommand implementations.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use orbit_app_core::config::{ConfigService, PREFS_KEY};
use orbit_app_core::notice::NoticeKind;
use orbit_app_core::prefs::PlayerPrefs;
use orbit_config_fs::FsConfigStore;
use orbit_graph::{ConstellationValidator, Edge, EdgeSet, Verdict};
use orbit_level::{load_level, save_level, LevelDef, LevelSession, LinkChange, NoticeReactions};
use tracing::{info, warn};

use crate::output::{self, CheckReport, StepRecord};
use crate::script::{self, Step};

fn open_store(config_dir: Option<&Path>) -> Result<FsConfigStore> {
    let store = match config_dir {
        Some(dir) => FsConfigStore::at(dir),
        None => FsConfigStore::new(),
    };
    store.context("opening config store")
}

/// Read `arg` as a level file if one exists at that path, otherwise load the
/// installed level with that name.
fn resolve_level(arg: &str, config_dir: Option<&Path>) -> Result<LevelDef> {
    let path = Path::new(arg);
    if path.is_file() {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        return LevelDef::from_json(&bytes)
            .with_context(|| format!("parsing {}", path.display()));
    }
    let service = ConfigService::new(open_store(config_dir)?);
    load_level(&service, arg).with_context(|| format!("loading level {arg:?}"))
}

fn load_prefs(config_dir: Option<&Path>) -> PlayerPrefs {
    let loaded = open_store(config_dir).and_then(|store| {
        ConfigService::new(store)
            .load_or_default::<PlayerPrefs>(PREFS_KEY)
            .context("loading prefs")
    });
    match loaded {
        Ok(prefs) => prefs,
        Err(err) => {
            warn!("using default prefs: {err:#}");
            PlayerPrefs::default()
        }
    }
}

pub fn check(
    level: &str,
    edges: &[Edge],
    json: bool,
    config_dir: Option<&Path>,
) -> Result<ExitCode> {
    let level = resolve_level(level, config_dir)?;
    level.check()?;
    level.check_links(edges)?;
    let rule = level.rule();
    let current: EdgeSet = edges.iter().copied().collect();

    let mut validator = ConstellationValidator::new();
    validator.set_rule(rule.clone());
    let verdict = validator.validate(&current)?;
    info!(level = %level.name, state = %verdict.state, "checked {} links", current.len());

    let report = CheckReport::new(&level, &rule, &current, verdict);
    let mut out = std::io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", report.render_text())?;
    }
    Ok(output::exit_code(report.state))
}

/// Settings for `orbit play`.
pub struct PlayOptions {
    /// Emit JSON lines instead of text.
    pub json: bool,
    /// Simulated time between steps.
    pub step: Duration,
}

fn run_step(
    session: &mut LevelSession<NoticeReactions>,
    step: Step,
) -> (&'static str, Option<Verdict>) {
    let result = match step {
        Step::Link(a, b) => session.create_link(a, b),
        Step::Unlink(a, b) => session.remove_link(a, b),
        Step::Clear(s) => session
            .remove_links_at(s)
            .map(|(removed, report)| match removed.len() {
                0 => LinkChange::NotLinked(report),
                _ => LinkChange::Removed(report),
            }),
    };
    match result {
        Ok(change) => {
            let outcome = match change {
                LinkChange::Created(_) => "created",
                LinkChange::AlreadyLinked => "already-linked",
                LinkChange::Removed(_) => "removed",
                LinkChange::NotLinked(_) => "not-linked",
            };
            (outcome, change.report().map(|r| r.verdict.clone()))
        }
        Err(err) => {
            warn!("step rejected: {err}");
            session.reactions_mut().board_mut().post(
                NoticeKind::Info,
                "Step rejected",
                Some(err.to_string()),
            );
            ("rejected", None)
        }
    }
}

pub fn play(
    level: &str,
    script_path: &Path,
    options: &PlayOptions,
    config_dir: Option<&Path>,
) -> Result<ExitCode> {
    let level = resolve_level(level, config_dir)?;
    let text = fs::read_to_string(script_path)
        .with_context(|| format!("reading {}", script_path.display()))?;
    let steps = script::parse(&text)?;
    let prefs = load_prefs(config_dir);
    let mut clock = Instant::now();
    let reactions = NoticeReactions::from_prefs(&prefs, clock);
    let mut session = LevelSession::new(level, reactions)?.with_prefs(&prefs);

    let mut out = std::io::stdout().lock();
    for (index, step) in steps.iter().copied().enumerate() {
        if index > 0 {
            clock = clock
                .checked_add(options.step)
                .context("step interval overflows the clock")?;
        }
        session.reactions_mut().board_mut().tick(clock);
        let seen = session.reactions().board().last_id();
        let (outcome, verdict) = run_step(&mut session, step);
        let reactions: Vec<String> = session
            .reactions()
            .board()
            .posted_after(seen)
            .map(ToString::to_string)
            .collect();
        if options.json {
            let record = StepRecord {
                step: index + 1,
                action: step.to_string(),
                outcome,
                state: verdict.as_ref().map(|v| v.state),
                message: verdict.map(|v| v.message),
                reactions,
            };
            serde_json::to_writer(&mut out, &record)?;
            writeln!(out)?;
        } else {
            match &verdict {
                Some(v) => writeln!(
                    out,
                    "[{}] {step}: {outcome}, {}: {}",
                    index + 1,
                    v.state,
                    v.message
                )?,
                None => writeln!(out, "[{}] {step}: {outcome}", index + 1)?,
            }
            for line in reactions {
                writeln!(out, "    {line}")?;
            }
        }
    }

    let final_state = match session.last_report() {
        Some(report) => report.verdict.state,
        None => session.revalidate()?.verdict.state,
    };
    if !options.json {
        writeln!(out, "final: {final_state} with {} links", session.links().len())?;
        let board = session.reactions().board();
        if !board.is_empty() {
            writeln!(out, "notices:")?;
            for view in board.visible() {
                writeln!(out, "    {}", view.notice)?;
            }
        }
    }
    Ok(output::exit_code(final_state))
}

pub fn show(level: &str, config_dir: Option<&Path>) -> Result<ExitCode> {
    let level = resolve_level(level, config_dir)?;
    let mut out = std::io::stdout().lock();
    writeln!(out, "level: {}", level.name)?;
    writeln!(out, "mode:  {}", output::mode_name(level.mode()))?;
    if !level.stars.is_empty() {
        let stars: Vec<String> = level.stars.iter().map(ToString::to_string).collect();
        writeln!(out, "stars: {}", stars.join(" "))?;
    }
    if let Some(next) = &level.next_level {
        writeln!(out, "next:  {next}")?;
    }
    writeln!(out, "{}", output::rule_table(&level))?;
    Ok(ExitCode::SUCCESS)
}

pub fn install(file: &Path, config_dir: Option<&Path>) -> Result<ExitCode> {
    let bytes = fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let level =
        LevelDef::from_json(&bytes).with_context(|| format!("parsing {}", file.display()))?;
    level.check()?;
    let store = open_store(config_dir)?;
    let base = store.base().to_path_buf();
    save_level(&ConfigService::new(store), &level)?;
    info!(level = %level.name, "installed");
    writeln!(
        std::io::stdout().lock(),
        "installed {} into {}",
        level.name,
        base.display()
    )?;
    Ok(ExitCode::SUCCESS)
}
