//! Report adapter - turning a failing tool run into a test report

use std::collections::BTreeMap;
use std::path::Path;

use tracing::warn;

use crate::invocation::RunResult;
use crate::session::{Location, LongRepr, Outcome, Section, CALL_PHASE, Session, TestReport};
use crate::tool::{Tool, ToolSpec};

const FAILURE_BODY: &str = "Code quality checks failed. See output above.";

/// Node id used for a tool's synthetic report
pub fn nodeid(tool: Tool) -> String {
    format!("{} check", tool.name())
}

/// Build the synthetic failing report for a tool run
pub fn failure_report(
    tool: Tool,
    project_root: &Path,
    result: &RunResult,
    problem_count: Option<u32>,
) -> TestReport {
    let nodeid = nodeid(tool);
    let title = tool.title();

    let body = match problem_count {
        Some(count) => format!("{} reported {} errors. {}", title, count, FAILURE_BODY),
        None => FAILURE_BODY.to_string(),
    };

    TestReport {
        nodeid: nodeid.clone(),
        location: Location {
            path: project_root.to_path_buf(),
            line: 0,
            name: nodeid.clone(),
        },
        keywords: BTreeMap::from([(nodeid, 1)]),
        when: CALL_PHASE,
        longrepr: Some(LongRepr {
            title: format!("{} Failure", title),
            line: 0,
            body,
        }),
        sections: vec![Section {
            title: format!("{} Output", title),
            text: result.text.clone(),
        }],
        outcome: Outcome::Failed,
    }
}

/// Append a failing report for this run to the session's failed bucket
pub fn record_failure(
    session: &mut Session,
    tool: Tool,
    result: &RunResult,
    problem_count: Option<u32>,
) {
    let report = failure_report(tool, session.root(), result, problem_count);
    warn!(tool = %tool, exit_code = result.exit_code, "code quality check failed");
    session.stats.push(report);
}

/// Output to show for a passing run, with the tool's success note appended
pub fn success_output(spec: &ToolSpec, result: &RunResult) -> String {
    match spec.success_note {
        Some(note) => format!("{}{}", result.text, note),
        None => result.text.clone(),
    }
}
