//! Configuration loading

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ConfigError, Result};

use super::types::{Config, LaunchMode};

/// Config file names searched at each directory level, in priority order
pub const CONFIG_FILE_NAMES: &[&str] = &[
    "checkers.toml",
    ".checkers.toml",
    "checkers.yaml",
    ".checkers.yaml",
];

/// Load configuration from a file
pub fn load_config(path: &Path) -> Result<Config> {
    let format = if path.extension().is_some_and(|e| e == "toml") {
        "TOML"
    } else {
        "YAML"
    };
    info!(path = %path.display(), format, "loading config");

    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

    let config: Config = if format == "TOML" {
        toml::from_str(&content).map_err(ConfigError::TomlError)?
    } else {
        serde_yaml::from_str(&content).map_err(ConfigError::YamlError)?
    };

    validate_config(&config)?;
    debug!(path = %path.display(), "config loaded and validated");
    Ok(config)
}

/// Find a config file in `start_dir` or its parents. The nearest wins.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), "searching for config file");
    let mut current = start_dir.to_path_buf();

    loop {
        for name in CONFIG_FILE_NAMES {
            let config_path = current.join(name);
            if config_path.is_file() {
                info!(path = %config_path.display(), "found config file");
                return Some(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    debug!("no config file found");
    None
}

/// Load the nearest config, or defaults when there is none.
///
/// A config file that exists but fails to parse or validate is an error.
pub fn load_config_or_default(dir: &Path) -> Result<(Config, Option<PathBuf>)> {
    match find_config(dir) {
        Some(path) => {
            let config = load_config(&path)?;
            Ok((config, Some(path)))
        }
        None => {
            debug!(dir = %dir.display(), "using default config");
            Ok((Config::default(), None))
        }
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.launcher.mode == LaunchMode::Module && config.launcher.interpreter.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "launcher.interpreter".to_string(),
            message: "interpreter cannot be empty in module mode".to_string(),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CheckerError;
    use crate::invocation::Launcher;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_toml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("checkers.toml");
        std::fs::write(&config_path, "[launcher]\nmode = \"executable\"\n").unwrap();

        assert_eq!(find_config(temp.path()), Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join(".checkers.yaml");
        std::fs::write(&config_path, "launcher:\n  mode: executable\n").unwrap();
        let nested = temp.path().join("src").join("pkg");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_config(&nested), Some(config_path));
    }

    #[test]
    fn test_find_config_prefers_toml_over_yaml() {
        let temp = TempDir::new().unwrap();
        let toml_path = temp.path().join("checkers.toml");
        std::fs::write(&toml_path, "").unwrap();
        std::fs::write(temp.path().join("checkers.yaml"), "{}").unwrap();

        assert_eq!(find_config(temp.path()), Some(toml_path));
    }

    #[test]
    fn test_load_config_toml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("checkers.toml");
        std::fs::write(
            &config_path,
            "[launcher]\nmode = \"module\"\ninterpreter = \"/opt/venv/bin/python\"\n",
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(
            Launcher::from(&config.launcher),
            Launcher::Module {
                interpreter: "/opt/venv/bin/python".to_string()
            }
        );
    }

    #[test]
    fn test_load_config_yaml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("checkers.yaml");
        std::fs::write(&config_path, "launcher:\n  mode: executable\n").unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.launcher.mode, LaunchMode::Executable);
        assert_eq!(Launcher::from(&config.launcher), Launcher::Executable);
    }

    #[test]
    fn test_empty_interpreter_rejected() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("checkers.toml");
        std::fs::write(&config_path, "[launcher]\ninterpreter = \"\"\n").unwrap();

        let err = load_config(&config_path).unwrap_err();
        assert!(matches!(
            err,
            CheckerError::Config(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_malformed_config_is_error() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("checkers.toml"), "[launcher\n").unwrap();

        assert!(load_config_or_default(temp.path()).is_err());
    }

    #[test]
    fn test_defaults_without_file() {
        let temp = TempDir::new().unwrap();
        let (config, path) = load_config_or_default(temp.path()).unwrap();

        assert!(path.is_none());
        assert_eq!(config, Config::default());
        assert_eq!(Launcher::from(&config.launcher), Launcher::default());
    }
}
