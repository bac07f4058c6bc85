//! Orchestrator - drives every enabled tool through the session lifecycle
//!
//! Two entry points are called by the host, in this order:
//!
//! 1. [`Orchestrator::on_session_finish`] runs each enabled tool once,
//!    sequentially in registry order, and records a failing report for every
//!    tool whose heuristic flags the run.
//! 2. [`Orchestrator::on_terminal_summary`] prints every tool's captured
//!    output, pass or fail.

use std::collections::BTreeMap;
use std::io::{self, Write};

use tracing::{info, warn};

use crate::error::Result;
use crate::invocation::{ProcessRunner, RunResult, ToolInvocation};
use crate::report;
use crate::session::Session;
use crate::summary::{self, TerminalWriter};
use crate::tool::{Tool, ToolSpec};

/// Tools selected for this run, in registry order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnabledSet {
    tools: Vec<Tool>,
}

impl EnabledSet {
    /// Compute the enabled tools from the parsed flags.
    ///
    /// Only tools in `present` can be enabled. The umbrella flag enables all
    /// of them; otherwise a tool is enabled when its own flag is set.
    pub fn from_flags(present: &[Tool], umbrella: bool, individual: &BTreeMap<Tool, bool>) -> Self {
        let tools = Tool::all()
            .iter()
            .copied()
            .filter(|t| present.contains(t))
            .filter(|t| umbrella || individual.get(t).copied().unwrap_or(false))
            .collect();
        Self { tools }
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// A finished tool run and the text to show for it
#[derive(Debug, Clone)]
struct ToolRun {
    spec: &'static ToolSpec,
    result: RunResult,
    failed: bool,
    display: String,
}

/// Runs enabled tools and presents their output
#[derive(Debug)]
pub struct Orchestrator {
    enabled: EnabledSet,
    invocation: ToolInvocation,
    runs: Vec<ToolRun>,
    finished: bool,
}

impl Orchestrator {
    pub fn new(enabled: EnabledSet, invocation: ToolInvocation) -> Self {
        Self {
            enabled,
            invocation,
            runs: Vec::new(),
            finished: false,
        }
    }

    /// Results of the tools that have run so far
    pub fn results(&self) -> impl Iterator<Item = &RunResult> {
        self.runs.iter().map(|r| &r.result)
    }

    /// Tools whose run was flagged as a failure
    pub fn failed_tools(&self) -> Vec<Tool> {
        self.runs
            .iter()
            .filter(|r| r.failed)
            .map(|r| r.spec.tool)
            .collect()
    }

    /// Run every enabled tool and record failures into the session.
    ///
    /// Runs at most once per orchestrator. Spawn failures and unrecognised
    /// output abort the remaining tools and are returned unchanged; a run
    /// with unrecognised output is still kept for the terminal summary.
    pub fn on_session_finish(
        &mut self,
        session: &mut Session,
        runner: &dyn ProcessRunner,
    ) -> Result<()> {
        if self.finished {
            warn!("checkers already ran for this session, skipping");
            return Ok(());
        }
        self.finished = true;

        for &tool in &self.enabled.tools {
            let spec = tool.spec();
            let result = self.invocation.run(runner, spec, session.root())?;

            let failed = spec.heuristic.is_failure(&result);
            let display = if failed {
                let count = match spec.heuristic.problem_count(&result) {
                    Ok(count) => count,
                    Err(e) => {
                        self.runs.push(ToolRun {
                            spec,
                            display: result.text.clone(),
                            result,
                            failed,
                        });
                        return Err(e);
                    }
                };
                report::record_failure(session, tool, &result, count);
                result.text.clone()
            } else {
                info!(tool = %tool, "code quality check passed");
                report::success_output(spec, &result)
            };

            self.runs.push(ToolRun {
                spec,
                result,
                failed,
                display,
            });
        }

        Ok(())
    }

    /// Print a section for every tool that ran
    pub fn on_terminal_summary<W: Write>(&self, writer: &mut TerminalWriter<W>) -> io::Result<()> {
        for run in &self.runs {
            summary::present(writer, run.spec.tool, run.spec.markup, &run.display)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::BTreeSet;

    use crate::error::CheckerError;
    use crate::invocation::{Invocation, ProcessOutput};
    use crate::probe::present_tools;

    /// Returns canned output per tool and records every invocation
    #[derive(Default)]
    struct ScriptedRunner {
        outputs: BTreeMap<Tool, ProcessOutput>,
        calls: RefCell<Vec<Invocation>>,
    }

    impl ScriptedRunner {
        fn with(mut self, tool: Tool, stdout: &str, exit_code: i32) -> Self {
            self.outputs.insert(
                tool,
                ProcessOutput {
                    stdout: stdout.to_string(),
                    stderr: String::new(),
                    exit_code,
                },
            );
            self
        }

        fn called_tools(&self) -> Vec<Tool> {
            self.calls
                .borrow()
                .iter()
                .filter_map(|inv| tool_of(inv))
                .collect()
        }
    }

    fn tool_of(invocation: &Invocation) -> Option<Tool> {
        invocation.args.get(1).and_then(|name| Tool::from_name(name))
    }

    impl ProcessRunner for ScriptedRunner {
        fn run(&self, invocation: &Invocation) -> Result<ProcessOutput> {
            self.calls.borrow_mut().push(invocation.clone());
            let tool = tool_of(invocation).ok_or_else(|| CheckerError::Spawn {
                program: invocation.program.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "unknown tool"),
            })?;
            Ok(self.outputs.get(&tool).cloned().unwrap_or_default())
        }
    }

    fn flags(tools: &[Tool]) -> BTreeMap<Tool, bool> {
        tools.iter().map(|t| (*t, true)).collect()
    }

    fn summary_text(orchestrator: &Orchestrator) -> String {
        let mut writer = TerminalWriter::new(Vec::new(), 60, false);
        orchestrator.on_terminal_summary(&mut writer).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_umbrella_enables_every_present_tool() {
        let present = [Tool::Black, Tool::Ruff, Tool::Mypy];
        let enabled = EnabledSet::from_flags(&present, true, &BTreeMap::new());
        assert_eq!(enabled.tools(), &present);
    }

    #[test]
    fn test_individual_flag_only() {
        let present = [Tool::Black, Tool::Ruff, Tool::Mypy];
        let enabled = EnabledSet::from_flags(&present, false, &flags(&[Tool::Ruff]));
        assert_eq!(enabled.tools(), &[Tool::Ruff]);
    }

    #[test]
    fn test_explicitly_disabled_flag_is_overridden_by_umbrella() {
        let present = [Tool::Black, Tool::Ruff];
        let individual = BTreeMap::from([(Tool::Black, false)]);
        let enabled = EnabledSet::from_flags(&present, true, &individual);
        assert_eq!(enabled.tools(), &[Tool::Black, Tool::Ruff]);
    }

    #[test]
    fn test_absent_tool_never_enabled() {
        let probe = BTreeSet::from([Tool::Black, Tool::Ruff]);
        let present = present_tools(&probe);

        let enabled = EnabledSet::from_flags(&present, true, &flags(&[Tool::Mypy]));
        assert_eq!(enabled.tools(), &[Tool::Black, Tool::Ruff]);
    }

    #[test]
    fn test_scenario_formatter_and_linter_both_fail() {
        let present = [Tool::Black, Tool::Ruff];
        let enabled = EnabledSet::from_flags(&present, true, &BTreeMap::new());
        let runner = ScriptedRunner::default()
            .with(Tool::Black, "--- a.py\n+++ a.py\n@@ -1 +1 @@\n", 1)
            .with(Tool::Ruff, "", 1);

        let mut session = Session::new("/work/project");
        let mut orchestrator = Orchestrator::new(enabled, ToolInvocation::default());
        orchestrator.on_session_finish(&mut session, &runner).unwrap();

        assert_eq!(orchestrator.results().count(), 2);
        assert_eq!(session.stats.failed.len(), 2);
        assert_eq!(session.stats.failed[0].nodeid, "black check");
        assert_eq!(session.stats.failed[1].nodeid, "ruff check");
        assert_eq!(orchestrator.failed_tools(), vec![Tool::Black, Tool::Ruff]);
    }

    #[test]
    fn test_scenario_single_passing_linter_still_printed() {
        let present = [Tool::Black, Tool::Flake8];
        let enabled = EnabledSet::from_flags(&present, false, &flags(&[Tool::Flake8]));
        let runner = ScriptedRunner::default().with(Tool::Flake8, "", 0);

        let mut session = Session::new("/work/project");
        let mut orchestrator = Orchestrator::new(enabled, ToolInvocation::default());
        orchestrator.on_session_finish(&mut session, &runner).unwrap();

        assert_eq!(orchestrator.results().count(), 1);
        assert!(session.stats.failed.is_empty());
        assert_eq!(runner.called_tools(), vec![Tool::Flake8]);

        let out = summary_text(&orchestrator);
        assert!(out.contains(" tests flake8 "));
        assert!(out.ends_with("All done.\n"));
        assert!(!out.contains("tests black"));
    }

    #[test]
    fn test_scenario_error_count_extracted() {
        let enabled = EnabledSet::from_flags(&[Tool::Mypy], true, &BTreeMap::new());
        let runner = ScriptedRunner::default().with(Tool::Mypy, "Found 3 errors in 2 files", 1);

        let mut session = Session::new("/work/project");
        let mut orchestrator = Orchestrator::new(enabled, ToolInvocation::default());
        orchestrator.on_session_finish(&mut session, &runner).unwrap();

        assert_eq!(session.stats.failed.len(), 1);
        let body = &session.stats.failed[0].longrepr.as_ref().unwrap().body;
        assert!(body.contains("reported 3 errors"));
    }

    #[test]
    fn test_scenario_error_count_missing_is_hard_error() {
        let enabled = EnabledSet::from_flags(&[Tool::Mypy], true, &BTreeMap::new());
        let runner = ScriptedRunner::default().with(Tool::Mypy, "All clear", 1);

        let mut session = Session::new("/work/project");
        let mut orchestrator = Orchestrator::new(enabled, ToolInvocation::default());
        let err = orchestrator
            .on_session_finish(&mut session, &runner)
            .unwrap_err();

        assert!(matches!(err, CheckerError::UnexpectedOutput { .. }));
        assert!(session.stats.failed.is_empty());
    }

    #[test]
    fn test_summary_keeps_runs_before_unexpected_output() {
        let enabled = EnabledSet::from_flags(&[Tool::Ruff, Tool::Mypy], true, &BTreeMap::new());
        let runner = ScriptedRunner::default()
            .with(Tool::Ruff, "All checks passed!\n", 0)
            .with(Tool::Mypy, "All clear", 1);

        let mut session = Session::new("/work/project");
        let mut orchestrator = Orchestrator::new(enabled, ToolInvocation::default());
        assert!(orchestrator.on_session_finish(&mut session, &runner).is_err());

        assert_eq!(orchestrator.failed_tools(), vec![Tool::Mypy]);
        let out = summary_text(&orchestrator);
        assert!(out.contains(" tests ruff "));
        assert!(out.contains("All checks passed!"));
        assert!(out.contains(" tests mypy "));
        assert!(out.contains("All clear"));
    }

    #[test]
    fn test_diff_tool_nonzero_exit_without_marker_passes() {
        let enabled = EnabledSet::from_flags(&[Tool::Black], true, &BTreeMap::new());
        let runner = ScriptedRunner::default().with(Tool::Black, "No Python files are present.\n", 1);

        let mut session = Session::new("/work/project");
        let mut orchestrator = Orchestrator::new(enabled, ToolInvocation::default());
        orchestrator.on_session_finish(&mut session, &runner).unwrap();

        assert!(session.stats.failed.is_empty());
        assert!(orchestrator.failed_tools().is_empty());
    }

    #[test]
    fn test_tools_run_in_registry_order_and_only_once() {
        let present = Tool::all();
        let enabled = EnabledSet::from_flags(
            present,
            false,
            &flags(&[Tool::Pyright, Tool::Isort, Tool::Ruff]),
        );
        let runner = ScriptedRunner::default();

        let mut session = Session::new("/work/project");
        let mut orchestrator = Orchestrator::new(enabled, ToolInvocation::default());
        orchestrator.on_session_finish(&mut session, &runner).unwrap();
        orchestrator.on_session_finish(&mut session, &runner).unwrap();

        assert_eq!(
            runner.called_tools(),
            vec![Tool::Isort, Tool::Ruff, Tool::Pyright]
        );
        assert_eq!(orchestrator.results().count(), 3);
    }

    #[test]
    fn test_summary_empty_before_session_finish() {
        let enabled = EnabledSet::from_flags(&[Tool::Ruff], true, &BTreeMap::new());
        let orchestrator = Orchestrator::new(enabled, ToolInvocation::default());
        assert!(summary_text(&orchestrator).is_empty());
    }

    #[test]
    fn test_summary_prints_failing_output_verbatim() {
        let enabled = EnabledSet::from_flags(&[Tool::Isort, Tool::Ruff], true, &BTreeMap::new());
        let runner = ScriptedRunner::default()
            .with(Tool::Isort, "@@ -1,2 +1,2 @@\n", 0)
            .with(Tool::Ruff, "All checks passed!\n", 0);

        let mut session = Session::new("/work/project");
        let mut orchestrator = Orchestrator::new(enabled, ToolInvocation::default());
        orchestrator.on_session_finish(&mut session, &runner).unwrap();

        let out = summary_text(&orchestrator);
        let isort_at = out.find(" tests isort ").unwrap();
        let ruff_at = out.find(" tests ruff ").unwrap();
        assert!(isort_at < ruff_at);
        // failing isort output gets no success note
        assert!(!out.contains("All done."));
        assert!(out.contains("@@ -1,2 +1,2 @@\n"));
    }

    #[test]
    fn test_spawn_failure_propagates() {
        struct FailingRunner;
        impl ProcessRunner for FailingRunner {
            fn run(&self, invocation: &Invocation) -> Result<ProcessOutput> {
                Err(CheckerError::Spawn {
                    program: invocation.program.clone(),
                    source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
                })
            }
        }

        let enabled = EnabledSet::from_flags(&[Tool::Ruff], true, &BTreeMap::new());
        let mut session = Session::new("/work/project");
        let mut orchestrator = Orchestrator::new(enabled, ToolInvocation::default());
        let err = orchestrator
            .on_session_finish(&mut session, &FailingRunner)
            .unwrap_err();

        match err {
            CheckerError::Spawn { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied)
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
