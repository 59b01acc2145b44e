//! Result Model (C2): per-repository outcomes and the run-level summary.

use std::time::{Duration, Instant};

/// The lifecycle state of a single repository's command execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "PascalCase")]
pub enum ExecutionStatus {
    Pending,
    Running,
    Success,
    Failed,
    Timeout,
    Cancelled,
}

impl ExecutionStatus {
    /// Whether this status represents a finished execution (no further
    /// transitions possible; a result in a terminal state is never reopened).
    pub fn is_terminal(self) -> bool {
        !matches!(self, ExecutionStatus::Pending | ExecutionStatus::Running)
    }
}

/// The outcome of running one [`crate::command::Command`] against one
/// repository.
///
/// `exit_code` is `-1` until the process exits (per the specification's
/// sentinel convention, matching the Git adapter's own "no meaningful exit
/// code" case).
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub repository: String,
    pub command: String,
    pub status: ExecutionStatus,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub start_time: Instant,
    pub end_time: Option<Instant>,
    pub duration: Duration,
    pub error_message: Option<String>,
}

impl ExecutionResult {
    /// A result in the initial `Pending` state: no output, no duration yet.
    pub fn pending(repository: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            command: command.into(),
            status: ExecutionStatus::Pending,
            exit_code: -1,
            stdout: String::new(),
            stderr: String::new(),
            start_time: Instant::now(),
            end_time: None,
            duration: Duration::ZERO,
            error_message: None,
        }
    }

    /// Transition to `Running`.
    pub fn mark_running(&mut self) {
        self.status = ExecutionStatus::Running;
    }

    fn finish_at(&mut self, status: ExecutionStatus) {
        let now = Instant::now();
        self.end_time = Some(now);
        self.duration = now.saturating_duration_since(self.start_time);
        self.status = status;
    }

    /// `Running --success(out,code)--> Success`.
    pub fn success(&mut self, stdout: String, exit_code: i32) {
        self.stdout = stdout;
        self.exit_code = exit_code;
        self.finish_at(ExecutionStatus::Success);
    }

    /// `Running --failure(err,code,msg)--> Failed`.
    pub fn failure(&mut self, stderr: String, exit_code: i32, message: impl Into<String>) {
        self.stderr = stderr;
        self.exit_code = exit_code;
        self.error_message = Some(message.into());
        self.finish_at(ExecutionStatus::Failed);
    }

    /// `Running --timeout--> Timeout`.
    pub fn timeout(&mut self) {
        self.error_message = Some("command timed out".to_string());
        self.finish_at(ExecutionStatus::Timeout);
    }

    /// `Running --cancel--> Cancelled`.
    pub fn cancelled(&mut self) {
        self.error_message = Some("execution cancelled".to_string());
        self.finish_at(ExecutionStatus::Cancelled);
    }
}

/// Aggregate counters and timing for a full fleet run.
///
/// `successful_executions` and `failed_executions` are monotonic; `Timeout`
/// and `Cancelled` results are neither, though they still appear in
/// `results`.
#[derive(Debug, Clone, Default)]
pub struct Summary {
    pub total_repositories: usize,
    pub successful_executions: usize,
    pub failed_executions: usize,
    pub total_duration: Duration,
    pub results: Vec<ExecutionResult>,
    pub start_time: Option<Instant>,
    pub end_time: Option<Instant>,
}

impl Summary {
    /// A fresh summary stamped with `start_time = now`.
    pub fn new() -> Self {
        Self { start_time: Some(Instant::now()), ..Default::default() }
    }

    /// Append `result` and update the monotonic counters. Safe to call under
    /// the engine's collector mutex; this is the single point that mutates
    /// counters.
    pub fn add_result(&mut self, result: ExecutionResult) {
        self.total_repositories += 1;
        self.total_duration += result.duration;
        match result.status {
            ExecutionStatus::Success => self.successful_executions += 1,
            ExecutionStatus::Failed => self.failed_executions += 1,
            _ => {}
        }
        self.results.push(result);
    }

    /// Stamp `end_time`.
    pub fn finalize(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Percentage of results that succeeded, in `[0.0, 100.0]`. Returns `0.0`
    /// when there are no repositories.
    pub fn get_success_rate(&self) -> f64 {
        if self.total_repositories == 0 {
            return 0.0;
        }
        100.0 * self.successful_executions as f64 / self.total_repositories as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_result_defaults() {
        let result = ExecutionResult::pending("repo-a", "git status");
        assert_eq!(result.status, ExecutionStatus::Pending);
        assert_eq!(result.exit_code, -1);
        assert!(result.end_time.is_none());
    }

    #[test]
    fn test_success_transition() {
        let mut result = ExecutionResult::pending("repo-a", "git status");
        result.mark_running();
        result.success("clean".to_string(), 0);
        assert_eq!(result.status, ExecutionStatus::Success);
        assert_eq!(result.exit_code, 0);
        assert!(result.end_time.is_some());
    }

    #[test]
    fn test_failure_transition() {
        let mut result = ExecutionResult::pending("repo-a", "git status");
        result.mark_running();
        result.failure("fatal".to_string(), 1, "git exited with status 1");
        assert_eq!(result.status, ExecutionStatus::Failed);
        assert_eq!(result.exit_code, 1);
        assert!(result.error_message.is_some());
    }

    #[test]
    fn test_timeout_sets_error_message() {
        let mut result = ExecutionResult::pending("repo-a", "sleep 100");
        result.mark_running();
        result.timeout();
        assert_eq!(result.status, ExecutionStatus::Timeout);
        assert!(result.error_message.is_some());
    }

    #[test]
    fn test_cancelled_sets_error_message() {
        let mut result = ExecutionResult::pending("repo-a", "git pull");
        result.mark_running();
        result.cancelled();
        assert_eq!(result.status, ExecutionStatus::Cancelled);
        assert!(result.error_message.is_some());
    }

    #[test]
    fn test_summary_counts_success_and_failed_only() {
        let mut summary = Summary::new();

        let mut success = ExecutionResult::pending("a", "git status");
        success.success(String::new(), 0);
        let mut failed = ExecutionResult::pending("b", "git status");
        failed.failure(String::new(), 1, "boom");
        let mut cancelled = ExecutionResult::pending("c", "git status");
        cancelled.cancelled();

        summary.add_result(success);
        summary.add_result(failed);
        summary.add_result(cancelled);

        assert_eq!(summary.total_repositories, 3);
        assert_eq!(summary.successful_executions, 1);
        assert_eq!(summary.failed_executions, 1);
        assert_eq!(summary.results.len(), 3);
    }

    #[test]
    fn test_success_rate_is_percentage_of_total() {
        let mut summary = Summary::new();
        let mut success = ExecutionResult::pending("a", "git status");
        success.success(String::new(), 0);
        let mut cancelled = ExecutionResult::pending("b", "git status");
        cancelled.cancelled();
        summary.add_result(success);
        summary.add_result(cancelled);

        assert_eq!(summary.get_success_rate(), 50.0);
    }

    #[test]
    fn test_success_rate_empty_is_zero() {
        let summary = Summary::new();
        assert_eq!(summary.get_success_rate(), 0.0);
    }

    #[test]
    fn test_finalize_stamps_end_time() {
        let mut summary = Summary::new();
        assert!(summary.end_time.is_none());
        summary.finalize();
        assert!(summary.end_time.is_some());
    }

    #[test]
    fn test_is_terminal() {
        assert!(!ExecutionStatus::Pending.is_terminal());
        assert!(!ExecutionStatus::Running.is_terminal());
        assert!(ExecutionStatus::Success.is_terminal());
        assert!(ExecutionStatus::Failed.is_terminal());
        assert!(ExecutionStatus::Timeout.is_terminal());
        assert!(ExecutionStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_result_never_reopens_after_terminal() {
        let mut result = ExecutionResult::pending("a", "git status");
        result.success(String::new(), 0);
        let end_time_after_success = result.end_time;
        result.failure(String::new(), 1, "should not happen in practice");
        assert_ne!(end_time_after_success, result.end_time);
        assert_eq!(result.status, ExecutionStatus::Failed);
    }
}
