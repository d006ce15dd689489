use std::path::PathBuf;

use thiserror::Error;

/// Typed errors for SwimCoach operations.
/// We use `anyhow` at the top level for CLI error handling,
/// but these typed errors allow modules to be precise about failures.
#[derive(Debug, Error)]
pub enum CoachError {
    /// File system operation failed
    #[error("I/O error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is invalid
    #[error("Config error in '{}': {message}", path.display())]
    ConfigError { path: PathBuf, message: String },

    /// Unknown configuration key passed to `config set`
    #[error("Unknown config key '{key}'")]
    UnknownConfigKey { key: String },

    /// Config value could not be parsed for its key
    #[error("Invalid value '{value}' for config key '{key}'")]
    InvalidConfigValue { key: String, value: String },

    /// Package manager id not present in the registry
    #[error("Package manager '{id}' is not registered")]
    UnknownManager { id: String },

    /// Home directory could not be resolved
    #[error("Could not determine the home directory")]
    NoHomeDir,

    /// A command could not be launched at all
    #[error(transparent)]
    Command(#[from] crate::runner::CommandError),
}

impl From<std::io::Error> for CoachError {
    fn from(e: std::io::Error) -> Self {
        CoachError::Io {
            path: PathBuf::from("<unknown>"),
            source: e,
        }
    }
}
