//! Git Adapter (C3): repository status probes and per-command process execution.

mod error;

pub use error::GitAdapterError;

use crate::command::{Command, CommandKind};
use crate::engine::CancellationToken;
use crate::result::ExecutionResult;
use crate::shell_exec::shell_command;
use std::path::{Path, PathBuf};
use std::process::{Command as ProcessCommand, Stdio};
use std::time::{Duration, Instant};
use wait_timeout::ChildExt;

/// How often a waited-on child is re-checked for timeout expiry and
/// cancellation while it is still running.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Repository status classification: set by [`GitAdapter::get_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "PascalCase")]
pub enum RepoStatus {
    Clean,
    Modified,
    Error,
}

/// A single working tree under fleet management.
///
/// Produced from configuration with `is_valid = true` and no status fields
/// populated; [`GitAdapter::get_status`] returns a fresh, updated copy — the
/// input `Repository` is never mutated in place.
#[derive(Debug, Clone)]
pub struct Repository {
    pub name: String,
    pub absolute_path: PathBuf,
    pub branch: Option<String>,
    pub status: Option<RepoStatus>,
    pub created_files: usize,
    pub modified_files: usize,
    pub deleted_files: usize,
    pub is_valid: bool,
    pub error_message: Option<String>,
    pub last_checked: Option<Instant>,
}

impl Repository {
    /// Build a repository entry from configuration: valid by default, status
    /// unknown until [`GitAdapter::get_status`] runs.
    pub fn new(name: impl Into<String>, absolute_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            absolute_path: absolute_path.into(),
            branch: None,
            status: None,
            created_files: 0,
            modified_files: 0,
            deleted_files: 0,
            is_valid: true,
            error_message: None,
            last_checked: None,
        }
    }

    /// Apply the invalid/modified/clean classification described in §4.3.
    fn update_status(&mut self) {
        self.status = Some(if !self.is_valid {
            RepoStatus::Error
        } else if self.created_files > 0 || self.modified_files > 0 || self.deleted_files > 0 {
            RepoStatus::Modified
        } else {
            RepoStatus::Clean
        });
        self.last_checked = Some(Instant::now());
    }
}

/// Stateless collaborator: queries one repository and runs one child process
/// honoring timeout and shell routing. Shareable across worker threads
/// without synchronization — it holds no state of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitAdapter;

impl GitAdapter {
    pub fn new() -> Self {
        Self
    }

    /// `path` exists and is a directory.
    pub fn is_valid_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    /// `<path>/.git` exists.
    pub fn is_valid_repository(&self, path: &Path) -> bool {
        path.join(".git").exists()
    }

    /// Query branch and porcelain-status counters for `repo`, returning a
    /// fresh, updated copy. Directory/repository validation failures are
    /// carried in the returned `Repository` (`is_valid = false`,
    /// `status = Error`) rather than surfaced as an error — this probe never
    /// fails the caller.
    pub fn get_status(&self, repo: &Repository) -> Repository {
        let mut updated = repo.clone();

        if !self.is_valid_directory(&repo.absolute_path) {
            updated.is_valid = false;
            updated.error_message = Some(format!("{} is not a directory", repo.absolute_path.display()));
            updated.update_status();
            return updated;
        }

        if !self.is_valid_repository(&repo.absolute_path) {
            updated.is_valid = false;
            updated.error_message = Some(format!("{} is not a git repository", repo.absolute_path.display()));
            updated.update_status();
            return updated;
        }

        updated.is_valid = true;
        updated.error_message = None;

        match self.run_git(&repo.absolute_path, &["branch", "--show-current"]) {
            Ok(output) => {
                let branch = output.trim();
                updated.branch = Some(if branch.is_empty() { "detached".to_string() } else { branch.to_string() });
            }
            Err(err) => {
                updated.is_valid = false;
                updated.error_message = Some(err.to_string());
                updated.update_status();
                return updated;
            }
        }

        let (created, modified, deleted) = match self.run_git(&repo.absolute_path, &["status", "--porcelain"]) {
            Ok(output) => count_porcelain_changes(&output),
            Err(err) => {
                updated.is_valid = false;
                updated.error_message = Some(err.to_string());
                updated.update_status();
                return updated;
            }
        };

        updated.created_files = created;
        updated.modified_files = modified;
        updated.deleted_files = deleted;
        updated.update_status();
        updated
    }

    /// Run `git <args>` in `path` and return trimmed stdout, or an adapter
    /// error on spawn failure or non-zero exit.
    fn run_git(&self, path: &Path, args: &[&str]) -> Result<String, GitAdapterError> {
        let output = ProcessCommand::new("git")
            .args(args)
            .current_dir(path)
            .output()
            .map_err(|e| GitAdapterError::Spawn(e.to_string()))?;

        if !output.status.success() {
            return Err(GitAdapterError::CommandFailed(String::from_utf8_lossy(&output.stderr).trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run one [`Command`] against `repo`, honoring its timeout, shell
    /// requirement, and `token`, per the process described in §4.3/§5.
    ///
    /// Waits on the child in [`POLL_INTERVAL`] slices so a mid-run
    /// `token.cancel()` is observed and the child killed instead of run to
    /// completion; a manual cancellation and the per-command timeout compose
    /// through the same polling loop.
    ///
    /// Returns a populated [`ExecutionResult`] with no error even when the
    /// child command itself fails; the adapter only returns `Err` when the
    /// child process could not be spawned at all.
    pub fn execute_command(
        &self,
        repo: &Repository,
        cmd: &Command,
        token: &CancellationToken,
    ) -> Result<ExecutionResult, GitAdapterError> {
        if cmd.kind == CommandKind::BuiltIn {
            return Err(GitAdapterError::UnsupportedBuiltin);
        }

        let mut result = ExecutionResult::pending(&repo.name, cmd.full_command());
        result.mark_running();

        let mut process = self.build_command(repo, cmd);
        let mut child = match process.spawn() {
            Ok(child) => child,
            Err(err) => {
                result.failure(String::new(), -1, format!("failed to spawn command: {err}"));
                return Ok(result);
            }
        };

        let outcome = wait_with_cancellation(&mut child, cmd.timeout, token);

        match outcome {
            ChildOutcome::Finished { exit_code, stdout, stderr } => {
                if exit_code == 0 {
                    result.success(stdout, exit_code);
                } else {
                    result.failure(stderr, exit_code, format!("command exited with status {exit_code}"));
                }
            }
            ChildOutcome::TimedOut => {
                let _ = child.kill();
                let _ = child.wait();
                result.timeout();
            }
            ChildOutcome::Cancelled => {
                let _ = child.kill();
                let _ = child.wait();
                result.cancelled();
            }
            ChildOutcome::Io(err) => {
                result.failure(String::new(), -1, format!("error waiting for command: {err}"));
            }
        }

        Ok(result)
    }

    /// Build the (unspawned) child process per §4.3 step 2: shell-wrapped
    /// when `RequiresShell()`, otherwise `git <args>` with a leading `git`
    /// prepended when absent.
    ///
    /// `cmd.kind` is never `BuiltIn` here (rejected earlier in
    /// `execute_command`), so the non-shell branch only ever runs for a
    /// plain `Git` command; `Shell` always has `requires_shell() == true`
    /// and takes the first branch.
    fn build_command(&self, repo: &Repository, cmd: &Command) -> ProcessCommand {
        debug_assert_ne!(cmd.kind, CommandKind::BuiltIn);

        let mut process = if cmd.requires_shell() {
            shell_command(&cmd.full_command())
        } else {
            let mut process = ProcessCommand::new("git");
            if cmd.args.first().map(String::as_str) == Some("git") {
                process.args(&cmd.args[1..]);
            } else {
                process.args(&cmd.args);
            }
            process
        };

        process
            .current_dir(cmd.working_dir.clone().unwrap_or_else(|| repo.absolute_path.clone()))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        process
    }
}

enum ChildOutcome {
    Finished { exit_code: i32, stdout: String, stderr: String },
    TimedOut,
    Cancelled,
    Io(std::io::Error),
}

/// Wait on `child` in [`POLL_INTERVAL`] slices, checking `token` between
/// slices so cancellation is observed while the child is still running
/// rather than only before it was spawned. `timeout.is_zero()` means wait
/// indefinitely (subject to cancellation only).
fn wait_with_cancellation(child: &mut std::process::Child, timeout: Duration, token: &CancellationToken) -> ChildOutcome {
    let deadline = if timeout.is_zero() { None } else { Some(Instant::now() + timeout) };

    loop {
        let slice = match deadline {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    return ChildOutcome::TimedOut;
                }
                remaining.min(POLL_INTERVAL)
            }
            None => POLL_INTERVAL,
        };

        match child.wait_timeout(slice) {
            Ok(Some(status)) => return collect_output(child, status.code().unwrap_or(-1)),
            Ok(None) => {
                if token.is_cancelled() {
                    return ChildOutcome::Cancelled;
                }
            }
            Err(err) => return ChildOutcome::Io(err),
        }
    }
}

fn collect_output(child: &mut std::process::Child, exit_code: i32) -> ChildOutcome {
    use std::io::Read;
    let mut stdout = String::new();
    let mut stderr = String::new();
    if let Some(mut out) = child.stdout.take() {
        let _ = out.read_to_string(&mut stdout);
    }
    if let Some(mut err) = child.stderr.take() {
        let _ = err.read_to_string(&mut stderr);
    }
    ChildOutcome::Finished { exit_code, stdout, stderr }
}

/// Count porcelain status lines by leading character, per §4.3:
/// `A`/`?` → created, `M` → modified, `D` → deleted.
fn count_porcelain_changes(porcelain: &str) -> (usize, usize, usize) {
    let (mut created, mut modified, mut deleted) = (0, 0, 0);
    for line in porcelain.lines() {
        match line.chars().next() {
            Some('A') | Some('?') => created += 1,
            Some('M') => modified += 1,
            Some('D') => deleted += 1,
            _ => {}
        }
    }
    (created, modified, deleted)
}
