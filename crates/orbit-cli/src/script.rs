// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Link scripts: one player action per line.
//!
//! ```text
//! # comments and blank lines are ignored
//! link 1 2      # throw a rope from star 1 to star 2
//! unlink 2 1    # remove the rope joining 1 and 2
//! clear 3       # remove every rope touching star 3
//! ```

use anyhow::{bail, Context, Result};
use orbit_graph::StarId;
use std::fmt;

/// One scripted action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Create a link.
    Link(StarId, StarId),
    /// Remove a link.
    Unlink(StarId, StarId),
    /// Remove all links at a star.
    Clear(StarId),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link(a, b) => write!(f, "link {a} {b}"),
            Self::Unlink(a, b) => write!(f, "unlink {a} {b}"),
            Self::Clear(s) => write!(f, "clear {s}"),
        }
    }
}

/// Parse a whole script; errors carry the 1-based line number.
pub fn parse(text: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let step = parse_line(line).with_context(|| format!("script line {}", index + 1))?;
        steps.push(step);
    }
    Ok(steps)
}

fn parse_line(line: &str) -> Result<Step> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        ["link", a, b] => Ok(Step::Link(star(a)?, star(b)?)),
        ["unlink", a, b] => Ok(Step::Unlink(star(a)?, star(b)?)),
        ["clear", s] => Ok(Step::Clear(star(s)?)),
        _ => bail!("unrecognised step {line:?}"),
    }
}

fn star(word: &str) -> Result<StarId> {
    word.parse()
        .with_context(|| format!("invalid star id {word:?}"))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_steps_and_skips_comments() {
        let steps = parse("# warm up\nlink 1 2\n\n  unlink 2 1 # oops\nclear 3\n").expect("parse");
        assert_eq!(
            steps,
            vec![Step::Link(1, 2), Step::Unlink(2, 1), Step::Clear(3)]
        );
    }

    #[test]
    fn reports_line_number() {
        let err = parse("link 1 2\nlink 1\n").expect_err("bad line");
        assert_eq!(err.to_string(), "script line 2");
        let err = parse("clear x").expect_err("bad star");
        assert!(format!("{err:#}").contains("invalid star id \"x\""));
    }
}
