//! Failure heuristics - deciding whether a finished tool run is a quality failure
//!
//! Tools do not agree on what their exit status means, so each [`ToolSpec`]
//! names the rule that applies to it:
//!
//! - [`Heuristic::ExitCode`]: flake8, ruff, ty, pyright. Non-zero exit means
//!   problems were found.
//! - [`Heuristic::DiffMarker`]: black and isort in `--diff` mode. They exit 0
//!   while printing a diff, and can exit non-zero for unrelated reasons such
//!   as finding no files, so the hunk marker `@@` is the signal instead.
//!   Any `@@` in diagnostic text is also counted; that false positive is
//!   accepted.
//! - [`Heuristic::ErrorCount`]: mypy. Exit-code rule, plus the summary line
//!   `Found N errors` must be present on failure.
//!
//! [`ToolSpec`]: crate::tool::ToolSpec

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{CheckerError, Result};
use crate::invocation::RunResult;

/// Substring that opens a unified-diff hunk
pub const DIFF_HUNK_MARKER: &str = "@@";

const ERROR_COUNT_PATTERN: &str = r"Found (\d+) error";

/// Lines of tool output carried in an [`CheckerError::UnexpectedOutput`]
const UNEXPECTED_OUTPUT_LINES: usize = 20;

static ERROR_COUNT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ERROR_COUNT_PATTERN).expect("Invalid regex"));

/// Rule mapping a finished run to pass/fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heuristic {
    /// Failure iff the exit code is non-zero
    ExitCode,
    /// Failure iff the output contains a diff hunk marker, regardless of exit code
    DiffMarker,
    /// Exit-code rule with a mandatory problem count in failing output
    ErrorCount,
}

impl Heuristic {
    /// Whether this run counts as a quality failure
    pub fn is_failure(&self, result: &RunResult) -> bool {
        match self {
            Self::ExitCode | Self::ErrorCount => result.exit_code != 0,
            Self::DiffMarker => result.text.contains(DIFF_HUNK_MARKER),
        }
    }

    /// Number of problems reported by a failing run.
    ///
    /// Only [`Heuristic::ErrorCount`] extracts a count; the other rules return
    /// `Ok(None)`. A failing run whose output lacks the count line is an
    /// error rather than zero.
    pub fn problem_count(&self, result: &RunResult) -> Result<Option<u32>> {
        if *self != Self::ErrorCount || !self.is_failure(result) {
            return Ok(None);
        }

        let unexpected = || CheckerError::UnexpectedOutput {
            tool: result.tool.name().to_string(),
            pattern: ERROR_COUNT_PATTERN.to_string(),
            output: output_head(&result.text),
        };

        let captures = ERROR_COUNT_REGEX
            .captures(&result.text)
            .ok_or_else(unexpected)?;
        let count = captures[1].parse::<u32>().map_err(|_| unexpected())?;
        Ok(Some(count))
    }
}

/// First lines of `text`, marking what was cut
fn output_head(text: &str) -> String {
    let mut lines = text.lines();
    let mut head: Vec<&str> = lines.by_ref().take(UNEXPECTED_OUTPUT_LINES).collect();
    let rest = lines.count();
    if rest > 0 {
        head.push("...");
    }
    head.join("\n")
}
