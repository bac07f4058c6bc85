//! Host runner - one test session driven from the command line

use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;

use anyhow::Context;
use tracing::info;

use checkers_core::invocation::exit_code;
use checkers_core::session::{Location, LongRepr, CALL_PHASE};
use checkers_core::{
    EnabledSet, Launcher, Orchestrator, Outcome, Session, SystemRunner, TerminalWriter, TestReport,
    ToolInvocation,
};

use crate::cli::{output, Options};
use crate::exit_codes;

const TEST_COMMAND_NODEID: &str = "test command";

/// Run one session rooted at `root` and return the process exit code
pub fn execute(options: Options, root: &Path, launcher: Launcher) -> anyhow::Result<u8> {
    let enabled = EnabledSet::from_flags(&options.present, options.cli.checkers, &options.tool_flags);
    info!(enabled = ?enabled.tools(), root = %root.display(), "starting session");

    if enabled.is_empty() && options.cli.test_command.is_empty() {
        output::warning("No checks enabled and no test command given");
    }

    let mut session = Session::new(root);

    if !options.cli.test_command.is_empty() {
        let report = run_test_command(root, &options.cli.test_command)?;
        session.stats.push(report);
    }

    let mut orchestrator = Orchestrator::new(enabled, ToolInvocation::new(launcher));
    let finished = orchestrator.on_session_finish(&mut session, &SystemRunner);

    // Output of tools that already ran is shown even when the session aborts
    let mut writer = TerminalWriter::stdout();
    orchestrator.on_terminal_summary(&mut writer)?;
    finished?;
    output::print_outcome(&mut writer, &session.stats)?;

    if session.stats.success() {
        Ok(exit_codes::SUCCESS)
    } else {
        Ok(exit_codes::TESTS_FAILED)
    }
}

/// Run the wrapped test command with inherited stdio
fn run_test_command(root: &Path, argv: &[String]) -> anyhow::Result<TestReport> {
    let (program, args) = argv
        .split_first()
        .context("test command is empty")?;

    info!(command = %argv.join(" "), "running test command");
    let status = Command::new(program)
        .args(args)
        .current_dir(root)
        .status()
        .with_context(|| format!("failed to run test command `{}`", program))?;

    Ok(test_command_report(root, argv, exit_code(status)))
}

/// Report for the wrapped test command's result
fn test_command_report(root: &Path, argv: &[String], code: i32) -> TestReport {
    let outcome = if code == 0 {
        Outcome::Passed
    } else {
        Outcome::Failed
    };

    let longrepr = (outcome == Outcome::Failed).then(|| LongRepr {
        title: "Test Command Failure".to_string(),
        line: 0,
        body: format!("`{}` exited with status {}", argv.join(" "), code),
    });

    TestReport {
        nodeid: TEST_COMMAND_NODEID.to_string(),
        location: Location {
            path: root.to_path_buf(),
            line: 0,
            name: TEST_COMMAND_NODEID.to_string(),
        },
        keywords: BTreeMap::from([(TEST_COMMAND_NODEID.to_string(), 1)]),
        when: CALL_PHASE,
        longrepr,
        sections: Vec::new(),
        outcome,
    }
}
