//! Configuration types

use serde::{Deserialize, Serialize};

use crate::invocation::{Launcher, DEFAULT_INTERPRETER};

/// Main configuration for checkers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How tool processes are started
    pub launcher: LauncherConfig,
}

/// Launch mode for tools
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchMode {
    /// `<interpreter> -m <tool>`
    #[default]
    Module,
    /// `<tool>` from PATH
    Executable,
}

/// Launcher configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    pub mode: LaunchMode,
    /// Interpreter used in module mode
    pub interpreter: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            mode: LaunchMode::Module,
            interpreter: DEFAULT_INTERPRETER.to_string(),
        }
    }
}

impl From<&LauncherConfig> for Launcher {
    fn from(config: &LauncherConfig) -> Self {
        match config.mode {
            LaunchMode::Module => Launcher::Module {
                interpreter: config.interpreter.clone(),
            },
            LaunchMode::Executable => Launcher::Executable,
        }
    }
}
