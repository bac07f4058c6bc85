//! CLI definition and option registration
//!
//! The fixed options come from the derived [`Cli`]; one `--<tool>` flag is
//! added at runtime for every tool the presence probe found, so missing tools
//! never show up in `--help` or parse.

pub mod output;

use std::collections::BTreeMap;
use std::ffi::OsString;

use clap::{Arg, ArgAction, CommandFactory, FromArgMatches, Parser};

use checkers_core::Tool;

/// Checkers - run code-quality tools alongside your tests
#[derive(Debug, Parser)]
#[command(name = "checkers")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable all available checks
    #[arg(long)]
    pub checkers: bool,

    /// Test command to run before the checks (after `--`)
    #[arg(last = true, value_name = "TEST_COMMAND")]
    pub test_command: Vec<String>,
}

/// Parsed options plus the per-tool flags
#[derive(Debug)]
pub struct Options {
    pub cli: Cli,
    /// Tools offered as flags this run, in registry order
    pub present: Vec<Tool>,
    pub tool_flags: BTreeMap<Tool, bool>,
}

/// Build the clap command with a flag for each present tool
pub fn command(present: &[Tool]) -> clap::Command {
    present.iter().fold(Cli::command(), |cmd, tool| {
        cmd.arg(
            Arg::new(tool.name())
                .long(tool.name())
                .action(ArgAction::SetTrue)
                .help(tool.spec().help),
        )
    })
}

/// Parse arguments against the options available for `present`
pub fn parse_from<I, T>(present: &[Tool], args: I) -> Result<Options, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command(present).try_get_matches_from(args)?;
    let cli = Cli::from_arg_matches(&matches)?;
    let tool_flags = present
        .iter()
        .map(|tool| (*tool, matches.get_flag(tool.name())))
        .collect();

    Ok(Options {
        cli,
        present: present.to_vec(),
        tool_flags,
    })
}
