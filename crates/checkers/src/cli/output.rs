//! Output formatting utilities

use std::io::{self, Write};

use console::style;

use checkers_core::{Markup, Stats, TerminalWriter};

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    eprintln!("{} {}", style("!").yellow().bold(), message);
}

/// `N failed, M passed`, omitting empty buckets
pub fn outcome_counts(stats: &Stats) -> String {
    if stats.total() == 0 {
        return "no tests ran".to_string();
    }

    let mut parts = Vec::new();
    if !stats.failed.is_empty() {
        parts.push(format!("{} failed", stats.failed.len()));
    }
    if !stats.passed.is_empty() {
        parts.push(format!("{} passed", stats.passed.len()));
    }
    parts.join(", ")
}

/// Print the failed reports and the final counts line
pub fn print_outcome<W: Write>(writer: &mut TerminalWriter<W>, stats: &Stats) -> io::Result<()> {
    if !stats.failed.is_empty() {
        writer.write_sep("=", "short test summary info", None)?;
        for report in &stats.failed {
            let line = match &report.longrepr {
                Some(longrepr) => format!("FAILED {} - {}", report.nodeid, longrepr.title),
                None => format!("FAILED {}", report.nodeid),
            };
            writer.line(&line, Some(Markup::Red))?;
        }
    }

    let markup = if stats.success() {
        Markup::Green
    } else {
        Markup::Red
    };
    writer.write_sep("=", &outcome_counts(stats), Some(markup))
}
