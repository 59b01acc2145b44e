//! Incremental terminal renderer: prints a multi-line frame to standard
//! output and erases the previous frame before printing the next one.

use super::{ProgressReporter, SharedState};
use crate::result::{ExecutionResult, ExecutionStatus};
use crossterm::{cursor, execute, terminal};
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

/// Renders [`super::ProgressModel`] updates in place on standard output.
/// Tracks the line count of the last frame it printed so the next frame can
/// erase exactly that much.
pub struct TerminalProgressReporter {
    state: SharedState,
    last_line_count: Mutex<usize>,
}

impl TerminalProgressReporter {
    pub fn new() -> Self {
        Self { state: SharedState::new(), last_line_count: Mutex::new(0) }
    }

    fn render(&self) {
        let guard = self.state.model.lock().expect("progress mutex poisoned");
        let Some(model) = guard.as_ref() else { return };

        let frame = if model.finished { render_completion_frame(model) } else { render_in_flight_frame(model) };
        drop(guard);

        self.redraw(&frame);
    }

    fn redraw(&self, frame: &str) {
        let mut last_line_count = self.last_line_count.lock().expect("render mutex poisoned");
        let mut out = std::io::stdout();

        for _ in 0..*last_line_count {
            let _ = execute!(out, cursor::MoveUp(1), terminal::Clear(terminal::ClearType::CurrentLine));
        }

        let _ = writeln!(out, "{frame}");
        let _ = out.flush();
        *last_line_count = frame.lines().count();
    }
}

impl Default for TerminalProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for TerminalProgressReporter {
    fn start_progress(&self, repo_names: Vec<String>, command_string: String) {
        self.state.start(repo_names, command_string);
        self.render();
    }

    fn mark_repository_as_starting(&self, repo_name: &str) {
        self.state.mark_starting(repo_name);
        self.render();
    }

    fn update_progress(&self, result: ExecutionResult) {
        self.state.update(result);
        self.render();
    }

    fn finish_progress(&self) {
        self.state.finish();
        self.render();
    }
}

fn progress_bar(completed: usize, total: usize) -> String {
    const WIDTH: usize = 30;
    let ratio = if total == 0 { 0.0 } else { completed as f64 / total as f64 };
    let filled = ((ratio * WIDTH as f64).round() as usize).min(WIDTH);
    format!("[{}{}] {:.0}%", "#".repeat(filled), "-".repeat(WIDTH - filled), ratio * 100.0)
}

fn format_task_duration(duration: Duration) -> String {
    format!("{}ms", duration.as_millis())
}

fn format_session_elapsed(duration: Duration) -> String {
    format!("{}s", duration.as_secs())
}

fn status_line(repo: &str, result: Option<&ExecutionResult>) -> String {
    match result {
        None => format!("  \u{25cb} {repo} (pending)"),
        Some(r) => match r.status {
            ExecutionStatus::Pending => format!("  \u{25cb} {repo} (pending)"),
            ExecutionStatus::Running => {
                format!("  \u{25cf} {repo} (running) ({})", format_task_duration(r.start_time.elapsed()))
            }
            ExecutionStatus::Success => format!("  \u{2713} {repo} ({})", format_task_duration(r.duration)),
            ExecutionStatus::Failed => format!("  \u{2717} {repo} (failed) ({})", format_task_duration(r.duration)),
            ExecutionStatus::Timeout | ExecutionStatus::Cancelled => {
                format!("  \u{25cb} {repo} ({}) ({})", r.status, format_task_duration(r.duration))
            }
        },
    }
}

fn render_in_flight_frame(model: &super::ProgressModel) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Executing: {}", model.command));
    lines.push(format!("Progress: {}/{} repositories", model.completed, model.total));
    lines.push(String::new());
    lines.push(progress_bar(model.completed, model.total));
    lines.push(String::new());

    if !model.finished && !model.current_repo.is_empty() {
        lines.push(format!("Current task: \u{25cf} {}", model.current_repo));
        lines.push(String::new());
    }

    lines.push("Status:".to_string());
    for repo in &model.repositories {
        lines.push(status_line(repo, model.results.get(repo)));
    }
    lines.push(String::new());
    lines.push(format!("Elapsed: {}", format_session_elapsed(model.start_time.elapsed())));

    lines.join("\n")
}

fn render_completion_frame(model: &super::ProgressModel) -> String {
    let mut lines = Vec::new();
    lines.push(progress_bar(model.completed, model.total));
    lines.push(String::new());
    lines.push("\u{2705} Command execution finalized!".to_string());
    lines.push(format!("Command: {}", model.command));
    lines.push(format!("Total repositories: {}", model.total));

    let succeeded = model.results.values().filter(|r| r.status == ExecutionStatus::Success).count();
    let failed = model.results.values().filter(|r| r.status == ExecutionStatus::Failed).count();

    lines.push(format!("\u{2713} Successful: {succeeded}"));
    if failed > 0 {
        lines.push(format!("\u{2717} Failed: {failed}"));
    }
    lines.push(format!("Total duration: {}", format_session_elapsed(model.start_time.elapsed())));
    lines.push(String::new());
    lines.push("Detailed results:".to_string());

    for repo in &model.repositories {
        if let Some(result) = model.results.get(repo) {
            match result.status {
                ExecutionStatus::Success => {
                    lines.push(format!("  \u{2713} {repo} ({})", format_task_duration(result.duration)))
                }
                ExecutionStatus::Failed => lines.push(format!(
                    "  \u{2717} {repo}: {} ({})",
                    result.error_message.as_deref().unwrap_or("command failed"),
                    format_task_duration(result.duration)
                )),
                _ => lines.push(status_line(repo, Some(result))),
            }
        }
    }

    lines.join("\n")
}
