//! Execution engine errors: raised before any repository is dispatched.

use crate::styling::error_message;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The repository set handed to the engine was empty.
    NoRepositories,
    /// A `BuiltIn`-kind command reached the engine; built-ins are routed by
    /// the dispatch front-end and never reach `ExecuteInParallel`/`ExecuteSequential`.
    UnsupportedBuiltin,
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::NoRepositories => write!(f, "{}", error_message("no repositories to execute against")),
            EngineError::UnsupportedBuiltin => {
                write!(f, "{}", error_message("built-in commands not supported in executor"))
            }
        }
    }
}

impl std::error::Error for EngineError {}
