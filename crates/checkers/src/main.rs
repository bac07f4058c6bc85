//! Checkers - run code-quality tools alongside your tests

mod cli;
mod exit_codes;
mod host;
mod logging;

use std::process::ExitCode;

use anyhow::Context;
use tracing::debug;

use checkers_core::{load_config_or_default, present_tools, Launcher, LauncherProbe, SystemRunner};

fn main() -> ExitCode {
    let _guard = logging::init();

    match run() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!(error = %e, "session aborted");
            cli::output::error(&format!("{:#}", e));
            ExitCode::from(exit_codes::INTERNAL_ERROR)
        }
    }
}

/// Load config, find the launchable tools, parse options, run the session
fn run() -> anyhow::Result<u8> {
    let root = std::env::current_dir().context("failed to read current directory")?;
    let (config, config_path) = load_config_or_default(&root)?;
    if let Some(path) = &config_path {
        debug!(path = %path.display(), "using config");
    }

    // Tools are offered only if the configured launcher can start them
    let launcher = Launcher::from(&config.launcher);
    let present = present_tools(&LauncherProbe::new(&launcher, &SystemRunner));

    let options = match cli::parse_from(&present, std::env::args_os()) {
        Ok(options) => options,
        Err(e) => {
            let _ = e.print();
            return Ok(if e.use_stderr() {
                exit_codes::USAGE_ERROR
            } else {
                exit_codes::SUCCESS
            });
        }
    };

    host::execute(options, &root, launcher)
}
