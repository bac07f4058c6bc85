//! Checkers Core - run code-quality tools as part of a test session
//!
//! This crate wraps external formatters, linters and type checkers, decides
//! per tool whether a run is a failure, turns failures into test reports and
//! prints every tool's output in the terminal summary.

pub mod config;
pub mod error;
pub mod heuristic;
pub mod invocation;
pub mod orchestrator;
pub mod probe;
pub mod report;
pub mod session;
pub mod summary;
pub mod tool;

pub use config::{load_config_or_default, Config};
pub use error::{CheckerError, ConfigError, Result};
pub use heuristic::Heuristic;
pub use invocation::{Launcher, ProcessRunner, RunResult, SystemRunner, ToolInvocation};
pub use orchestrator::{EnabledSet, Orchestrator};
pub use probe::{present_tools, LauncherProbe, PresenceProbe};
pub use session::{Outcome, Session, Stats, TestReport};
pub use summary::TerminalWriter;
pub use tool::{Markup, Tool, ToolSpec};
