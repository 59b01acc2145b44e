//! Git adapter faults: raised only when a child process could not be run at
//! all, never for ordinary command failure (that is carried in the
//! `ExecutionResult` instead).

use crate::styling::error_message;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitAdapterError {
    /// The child process could not be spawned.
    Spawn(String),
    /// A status probe (`git branch`/`git status`) exited non-zero.
    CommandFailed(String),
    /// `execute_command` was called with a `BuiltIn`-kind command; built-ins
    /// are handled upstream by the dispatch front-end.
    UnsupportedBuiltin,
}

impl std::fmt::Display for GitAdapterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GitAdapterError::Spawn(msg) => write!(f, "{}", error_message(format!("failed to spawn command: {msg}"))),
            GitAdapterError::CommandFailed(msg) => write!(f, "{}", error_message(format!("git command failed: {msg}"))),
            GitAdapterError::UnsupportedBuiltin => {
                write!(f, "{}", error_message("built-in commands not supported in executor"))
            }
        }
    }
}

impl std::error::Error for GitAdapterError {}
