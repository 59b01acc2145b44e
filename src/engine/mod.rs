//! Execution Engine (C4): fans a [`Command`] out over N repositories with
//! bounded concurrency, with a sequential stop-on-fail fallback.

mod error;
mod semaphore;

pub use error::EngineError;
pub use semaphore::{CancellationToken, Semaphore};

use crate::command::{Command, CommandKind};
use crate::git::{GitAdapter, Repository};
use crate::progress::ProgressReporter;
use crate::result::{ExecutionResult, Summary};
use dashmap::DashMap;
use std::sync::Arc;

/// Process-wide maximum concurrency for the parallel path.
pub const MAX_CONCURRENCY: usize = 10;

/// Fans a command out over repositories, tracking in-flight executions and
/// forwarding terminal results to a [`ProgressReporter`].
pub struct ExecutionEngine {
    adapter: GitAdapter,
    reporter: Arc<dyn ProgressReporter>,
    running: DashMap<String, ExecutionResult>,
    max_concurrency: usize,
}

impl ExecutionEngine {
    pub fn new(reporter: Arc<dyn ProgressReporter>) -> Self {
        Self { adapter: GitAdapter::new(), reporter, running: DashMap::new(), max_concurrency: MAX_CONCURRENCY }
    }

    #[cfg(test)]
    fn with_max_concurrency(reporter: Arc<dyn ProgressReporter>, max_concurrency: usize) -> Self {
        Self { adapter: GitAdapter::new(), reporter, running: DashMap::new(), max_concurrency }
    }

    /// Run `cmd` against every repo in `repos`, capped at `max_concurrency`
    /// concurrent children, funneling results through a single collector.
    pub fn execute_in_parallel(
        &self,
        token: &CancellationToken,
        repos: &[Repository],
        cmd: &Command,
    ) -> Result<Summary, EngineError> {
        if repos.is_empty() {
            return Err(EngineError::NoRepositories);
        }
        if cmd.kind == CommandKind::BuiltIn {
            return Err(EngineError::UnsupportedBuiltin);
        }

        let names: Vec<String> = repos.iter().map(|r| r.name.clone()).collect();
        self.reporter.start_progress(names, cmd.full_command());

        let semaphore = Semaphore::new(self.max_concurrency);
        let (sender, receiver) = crossbeam_channel::bounded::<ExecutionResult>(repos.len());

        log::debug!("dispatching {} repositories with max_concurrency={}", repos.len(), self.max_concurrency);

        std::thread::scope(|scope| {
            for repo in repos {
                let sender = sender.clone();
                let semaphore = &semaphore;
                let token = token.clone();
                scope.spawn(move || {
                    let _guard = semaphore.acquire();

                    if token.is_cancelled() {
                        let mut result = ExecutionResult::pending(&repo.name, cmd.full_command());
                        result.mark_running();
                        result.cancelled();
                        let _ = sender.send(result);
                        return;
                    }

                    let result = self.execute_single(repo, cmd, &token);
                    let _ = sender.send(result);
                });
            }
            drop(sender);

            let mut summary = Summary::new();
            for result in receiver {
                self.reporter.update_progress(result.clone());
                summary.add_result(result);
            }
            summary.finalize();
            self.reporter.finish_progress();
            Ok(summary)
        })
    }

    /// Same contract as [`Self::execute_in_parallel`] but strictly in order;
    /// stops dispatching further repositories as soon as a result is
    /// `Failed` and `cmd.allow_failure` is `false`.
    pub fn execute_sequential(
        &self,
        token: &CancellationToken,
        repos: &[Repository],
        cmd: &Command,
    ) -> Result<Summary, EngineError> {
        if repos.is_empty() {
            return Err(EngineError::NoRepositories);
        }
        if cmd.kind == CommandKind::BuiltIn {
            return Err(EngineError::UnsupportedBuiltin);
        }

        let names: Vec<String> = repos.iter().map(|r| r.name.clone()).collect();
        self.reporter.start_progress(names, cmd.full_command());

        let mut summary = Summary::new();
        for repo in repos {
            if token.is_cancelled() {
                let mut result = ExecutionResult::pending(&repo.name, cmd.full_command());
                result.mark_running();
                result.cancelled();
                self.reporter.update_progress(result.clone());
                summary.add_result(result);
                continue;
            }

            let result = self.execute_single(repo, cmd, token);
            self.reporter.update_progress(result.clone());
            let should_stop = !cmd.allow_failure && result.status == crate::result::ExecutionStatus::Failed;
            summary.add_result(result);
            if should_stop {
                break;
            }
        }

        summary.finalize();
        self.reporter.finish_progress();
        Ok(summary)
    }

    /// Run `cmd` against one repository, registering/deregistering it in the
    /// `running` table around the call. `token` is threaded into the adapter
    /// so a `Cancel()` that fires while this repository's child is already
    /// spawned still kills it and yields a `Cancelled` result instead of the
    /// child's true outcome.
    pub fn execute_single(&self, repo: &Repository, cmd: &Command, token: &CancellationToken) -> ExecutionResult {
        self.reporter.mark_repository_as_starting(&repo.name);

        let mut placeholder = ExecutionResult::pending(&repo.name, cmd.full_command());
        placeholder.mark_running();
        self.running.insert(repo.name.clone(), placeholder);

        let result = match self.adapter.execute_command(repo, cmd, token) {
            Ok(result) => result,
            Err(err) => {
                log::warn!("git adapter fault for {}: {err}", repo.name);
                let mut result = ExecutionResult::pending(&repo.name, cmd.full_command());
                result.mark_running();
                result.failure(String::new(), -1, err.to_string());
                result
            }
        };

        self.running.remove(&repo.name);
        result
    }

    /// Mark every tracked running result `Cancelled` and clear the table.
    pub fn cancel(&self, token: &CancellationToken) {
        log::warn!("cancelling {} in-flight executions", self.running.len());
        token.cancel();
        self.running.clear();
    }

    /// Snapshot the `running` table.
    pub fn get_running_executions(&self) -> Vec<ExecutionResult> {
        self.running.iter().map(|entry| entry.value().clone()).collect()
    }
}
