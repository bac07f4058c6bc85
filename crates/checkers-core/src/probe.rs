//! Presence probe - which tools can actually be launched
//!
//! A tool is only offered when the configured [`Launcher`] can start it: in
//! module mode the interpreter must be able to resolve the tool's package
//! metadata, in executable mode the tool must be on `PATH`.

use std::collections::BTreeSet;

use tracing::debug;

use crate::invocation::{Invocation, Launcher, ProcessRunner};
use crate::tool::Tool;

/// Interpreter snippet exiting non-zero when the package in argv[1] is not installed
const MODULE_CHECK_SCRIPT: &str =
    "import importlib.metadata, sys; importlib.metadata.version(sys.argv[1])";

/// Answers whether a tool is available on this system
pub trait PresenceProbe {
    fn is_present(&self, tool: Tool) -> bool;
}

/// Checks presence the same way the launcher will start the tool
pub struct LauncherProbe<'a> {
    launcher: &'a Launcher,
    runner: &'a dyn ProcessRunner,
}

impl<'a> LauncherProbe<'a> {
    pub fn new(launcher: &'a Launcher, runner: &'a dyn ProcessRunner) -> Self {
        Self { launcher, runner }
    }

    fn module_installed(&self, interpreter: &str, tool: Tool) -> bool {
        let invocation = module_check(interpreter, tool);
        match self.runner.run(&invocation) {
            Ok(output) => output.exit_code == 0,
            Err(e) => {
                debug!(tool = %tool, interpreter, error = %e, "interpreter unavailable");
                false
            }
        }
    }
}

impl PresenceProbe for LauncherProbe<'_> {
    fn is_present(&self, tool: Tool) -> bool {
        let present = match self.launcher {
            Launcher::Module { interpreter } => self.module_installed(interpreter, tool),
            Launcher::Executable => which::which(tool.name()).is_ok(),
        };
        debug!(tool = %tool, present, "checked tool presence");
        present
    }
}

/// Invocation asking `interpreter` whether the tool's package is installed
pub fn module_check(interpreter: &str, tool: Tool) -> Invocation {
    Invocation {
        program: interpreter.to_string(),
        args: vec![
            "-c".to_string(),
            MODULE_CHECK_SCRIPT.to_string(),
            tool.name().to_string(),
        ],
        env: Default::default(),
    }
}

/// A probe answering from a fixed set
impl PresenceProbe for BTreeSet<Tool> {
    fn is_present(&self, tool: Tool) -> bool {
        self.contains(&tool)
    }
}

/// Present tools, in registry order
pub fn present_tools(probe: &dyn PresenceProbe) -> Vec<Tool> {
    Tool::all()
        .iter()
        .copied()
        .filter(|t| probe.is_present(*t))
        .collect()
}
