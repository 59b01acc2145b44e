//! Configuration errors.

use crate::styling::error_message;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The config file could not be read or written.
    Io(String),
    /// The config file's JSON was malformed.
    Parse(String),
    /// No home directory could be resolved for the default config path.
    NoHomeDirectory,
    /// A group named a repository absent from `repositories`.
    UnknownRepository { group: String, repo: String },
    /// `repositories_for` was asked for a group not present in `groups`.
    UnknownGroup(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "{}", error_message(format!("config I/O error: {msg}"))),
            ConfigError::Parse(msg) => write!(f, "{}", error_message(format!("config parse error: {msg}"))),
            ConfigError::NoHomeDirectory => write!(f, "{}", error_message("could not resolve a home directory")),
            ConfigError::UnknownRepository { group, repo } => write!(
                f,
                "{}",
                error_message(format!("group {group:?} references unknown repository {repo:?}"))
            ),
            ConfigError::UnknownGroup(group) => write!(f, "{}", error_message(format!("unknown group {group:?}"))),
        }
    }
}

impl std::error::Error for ConfigError {}
