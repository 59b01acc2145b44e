//! Dispatch front-end errors: wraps the collaborators it calls plus
//! dispatch-specific failures.

use crate::config::ConfigError;
use crate::engine::EngineError;
use crate::styling::error_message;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Group resolution produced an empty repository set.
    NoRepositoriesForGroups,
    /// A built-in name survived classification but has no handler.
    UnknownBuiltin(String),
    Config(ConfigError),
    Engine(EngineError),
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchError::NoRepositoriesForGroups => {
                write!(f, "{}", error_message("no repositories for groups"))
            }
            DispatchError::UnknownBuiltin(name) => write!(f, "{}", error_message(format!("unknown built-in {name:?}"))),
            DispatchError::Config(err) => write!(f, "{err}"),
            DispatchError::Engine(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for DispatchError {}

impl From<ConfigError> for DispatchError {
    fn from(err: ConfigError) -> Self {
        DispatchError::Config(err)
    }
}

impl From<EngineError> for DispatchError {
    fn from(err: EngineError) -> Self {
        DispatchError::Engine(err)
    }
}
