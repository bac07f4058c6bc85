//! Tool invocation - building and running one subprocess per tool

use std::collections::BTreeMap;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::time::Instant;

use tracing::{debug, info};

use crate::error::{CheckerError, Result};
use crate::tool::{Tool, ToolSpec};

/// Generic colour-forcing variable set for every tool
pub const FORCE_COLOR_ENV: (&str, &str) = ("FORCE_COLOR", "1");

/// Default interpreter for module launches
pub const DEFAULT_INTERPRETER: &str = "python3";

/// How a tool process is started
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launcher {
    /// `<interpreter> -m <tool>`
    Module { interpreter: String },
    /// `<tool>` looked up on PATH
    Executable,
}

impl Default for Launcher {
    fn default() -> Self {
        Self::Module {
            interpreter: DEFAULT_INTERPRETER.to_string(),
        }
    }
}

/// A fully built command line plus environment additions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Added on top of the inherited environment
    pub env: BTreeMap<String, String>,
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Raw captured output of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Executes invocations; the seam between the orchestrator and the OS
pub trait ProcessRunner {
    /// Run to completion, capturing output. A non-zero exit is not an error.
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput>;
}

/// Runs invocations as real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<ProcessOutput> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        cmd.envs(&invocation.env);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output = cmd.output().map_err(|source| CheckerError::Spawn {
            program: invocation.program.clone(),
            source,
        })?;

        Ok(ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: exit_code(output.status),
        })
    }
}

/// Exit code, with signal terminations reported as `-signal`
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    -1
}

/// Result of running one tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub tool: Tool,
    /// stdout followed by stderr
    pub text: String,
    pub exit_code: i32,
}

impl RunResult {
    pub fn new(tool: Tool, stdout: &str, stderr: &str, exit_code: i32) -> Self {
        let mut text = String::with_capacity(stdout.len() + stderr.len());
        text.push_str(stdout);
        text.push_str(stderr);
        Self {
            tool,
            text,
            exit_code,
        }
    }
}

/// Builds and runs tool subprocesses with a fixed launcher
#[derive(Debug, Clone, Default)]
pub struct ToolInvocation {
    launcher: Launcher,
}

impl ToolInvocation {
    pub fn new(launcher: Launcher) -> Self {
        Self { launcher }
    }

    /// Build the command line: launcher, tool flags, then the project root
    pub fn build(&self, spec: &ToolSpec, project_root: &Path) -> Invocation {
        let tool = spec.tool.name();
        let (program, mut args) = match &self.launcher {
            Launcher::Module { interpreter } => (
                interpreter.clone(),
                vec!["-m".to_string(), tool.to_string()],
            ),
            Launcher::Executable => (tool.to_string(), Vec::new()),
        };

        args.extend(spec.flags.iter().map(|f| f.to_string()));
        args.push(project_root.to_string_lossy().into_owned());

        let mut env = BTreeMap::new();
        env.insert(FORCE_COLOR_ENV.0.to_string(), FORCE_COLOR_ENV.1.to_string());
        for (k, v) in spec.color_env {
            env.insert(k.to_string(), v.to_string());
        }

        Invocation { program, args, env }
    }

    /// Run one tool against the project root
    pub fn run(
        &self,
        runner: &dyn ProcessRunner,
        spec: &ToolSpec,
        project_root: &Path,
    ) -> Result<RunResult> {
        let invocation = self.build(spec, project_root);
        debug!(tool = %spec.tool, command = %invocation, "running tool");

        let start = Instant::now();
        let output = runner.run(&invocation)?;

        info!(
            tool = %spec.tool,
            exit_code = output.exit_code,
            duration_ms = start.elapsed().as_millis() as u64,
            "tool finished"
        );

        Ok(RunResult::new(
            spec.tool,
            &output.stdout,
            &output.stderr,
            output.exit_code,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn root() -> PathBuf {
        PathBuf::from("/work/project")
    }

    #[test]
    fn test_build_module_invocation() {
        let inv = ToolInvocation::default().build(Tool::Black.spec(), &root());

        assert_eq!(inv.program, "python3");
        assert_eq!(
            inv.args,
            vec!["-m", "black", "--diff", "--color", "/work/project"]
        );
    }

    #[test]
    fn test_build_executable_invocation() {
        let inv = ToolInvocation::new(Launcher::Executable).build(Tool::Ruff.spec(), &root());

        assert_eq!(inv.program, "ruff");
        assert_eq!(inv.args, vec!["check", "/work/project"]);
    }

    #[test]
    fn test_project_root_is_last_argument() {
        let invocation = ToolInvocation::default();
        for tool in Tool::all() {
            let inv = invocation.build(tool.spec(), &root());
            assert_eq!(inv.args.last().map(String::as_str), Some("/work/project"));
        }
    }

    #[test]
    fn test_color_env() {
        let invocation = ToolInvocation::default();

        let ruff = invocation.build(Tool::Ruff.spec(), &root());
        assert_eq!(ruff.env.get("FORCE_COLOR"), Some(&"1".to_string()));
        assert!(!ruff.env.contains_key("MYPY_FORCE_COLOR"));

        let mypy = invocation.build(Tool::Mypy.spec(), &root());
        assert_eq!(mypy.env.get("FORCE_COLOR"), Some(&"1".to_string()));
        assert_eq!(mypy.env.get("MYPY_FORCE_COLOR"), Some(&"1".to_string()));
    }

    #[test]
    fn test_run_result_concatenates_stdout_then_stderr() {
        let r = RunResult::new(Tool::Ruff, "out\n", "err\n", 1);
        assert_eq!(r.text, "out\nerr\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_captures_output_and_exit_code() {
        let inv = Invocation {
            program: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                "echo out; echo err >&2; echo $FORCE_COLOR; exit 3".to_string(),
            ],
            env: BTreeMap::from([("FORCE_COLOR".to_string(), "1".to_string())]),
        };

        let output = SystemRunner.run(&inv).unwrap();

        assert_eq!(output.exit_code, 3);
        assert_eq!(output.stdout, "out\n1\n");
        assert_eq!(output.stderr, "err\n");
    }

    #[test]
    fn test_system_runner_spawn_failure_propagates() {
        let inv = Invocation {
            program: "definitely-not-a-real-checker-binary".to_string(),
            args: Vec::new(),
            env: BTreeMap::new(),
        };

        let err = SystemRunner.run(&inv).unwrap_err();
        match err {
            CheckerError::Spawn { program, source } => {
                assert_eq!(program, "definitely-not-a-real-checker-binary");
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
