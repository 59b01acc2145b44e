//! Progress Reporter (C5): a thread-safe execution-state model plus two
//! implementations — an incremental terminal renderer and a no-op used when
//! standard output is not a terminal.

#[cfg(feature = "cli")]
mod render;

#[cfg(feature = "cli")]
pub use render::TerminalProgressReporter;

use crate::result::ExecutionResult;
use indexmap::IndexMap;
use std::sync::Mutex;
use std::time::Instant;

/// Mutex-protected execution state for one run, per §4.5's "model invariants".
pub struct ProgressModel {
    pub repositories: Vec<String>,
    pub command: String,
    pub start_time: Instant,
    pub results: IndexMap<String, ExecutionResult>,
    pub completed: usize,
    pub current_repo: String,
    pub total: usize,
    pub finished: bool,
}

impl ProgressModel {
    fn new(repo_names: Vec<String>, command: String) -> Self {
        let total = repo_names.len();
        Self {
            repositories: repo_names,
            command,
            start_time: Instant::now(),
            results: IndexMap::new(),
            completed: 0,
            current_repo: String::new(),
            total,
            finished: false,
        }
    }
}

/// The reporter contract: every operation is safe to call from any worker
/// thread.
pub trait ProgressReporter: Send + Sync {
    fn start_progress(&self, repo_names: Vec<String>, command_string: String);
    fn mark_repository_as_starting(&self, repo_name: &str);
    fn update_progress(&self, result: ExecutionResult);
    fn finish_progress(&self);
}

/// Used when standard output is not a terminal: produces no output at all.
#[derive(Debug, Default)]
pub struct NoOpProgressReporter;

impl ProgressReporter for NoOpProgressReporter {
    fn start_progress(&self, _repo_names: Vec<String>, _command_string: String) {}
    fn mark_repository_as_starting(&self, _repo_name: &str) {}
    fn update_progress(&self, _result: ExecutionResult) {}
    fn finish_progress(&self) {}
}

/// Shared state backing both reporter implementations; holds the mutex
/// described by §4.5's model invariants.
pub(crate) struct SharedState {
    model: Mutex<Option<ProgressModel>>,
}

impl SharedState {
    fn new() -> Self {
        Self { model: Mutex::new(None) }
    }

    fn start(&self, repo_names: Vec<String>, command: String) {
        let mut guard = self.model.lock().expect("progress mutex poisoned");
        *guard = Some(ProgressModel::new(repo_names, command));
    }

    fn mark_starting(&self, repo_name: &str) {
        let mut guard = self.model.lock().expect("progress mutex poisoned");
        if let Some(model) = guard.as_mut() {
            model.current_repo = repo_name.to_string();
        }
    }

    /// `UpdateProgress`: stores by name, increments `completed` iff the prior
    /// entry was absent or non-terminal and the new one is terminal; also
    /// sets `current_repo` when the incoming status is `Running`.
    fn update(&self, result: ExecutionResult) {
        let mut guard = self.model.lock().expect("progress mutex poisoned");
        let Some(model) = guard.as_mut() else { return };

        let was_terminal = model.results.get(&result.repository).is_some_and(|prev| prev.status.is_terminal());
        let becomes_terminal = result.status.is_terminal();

        if result.status == crate::result::ExecutionStatus::Running {
            model.current_repo = result.repository.clone();
        }

        if !was_terminal && becomes_terminal {
            model.completed += 1;
        }

        model.results.insert(result.repository.clone(), result);
    }

    fn finish(&self) {
        let mut guard = self.model.lock().expect("progress mutex poisoned");
        if let Some(model) = guard.as_mut() {
            model.finished = true;
        }
    }
}
