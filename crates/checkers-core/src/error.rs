//! Error types for checkers

use thiserror::Error;

/// Result type alias using CheckerError
pub type Result<T> = std::result::Result<T, CheckerError>;

/// Main error type for checker operations
#[derive(Debug, Error)]
pub enum CheckerError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A tool process could not be started at all
    #[error("Failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// A tool printed output in a shape we no longer recognise
    #[error("Unexpected output from {tool}: expected a match for `{pattern}`, got:\n{output}")]
    UnexpectedOutput {
        tool: String,
        pattern: String,
        /// Head of the tool's combined output
        output: String,
    },
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}
