//! Dispatch Front-End (C6): resolve `(groups, args)` to a concrete set of
//! repositories and a [`Command`], invoke the engine or a built-in handler,
//! and return the result.

mod error;

pub use error::DispatchError;

use crate::command::{Command, CommandKind};
use crate::config::FleetConfig;
use crate::engine::{CancellationToken, ExecutionEngine};
use crate::git::GitAdapter;
use crate::result::Summary;
use crate::styling::{info_message, success_message};

/// Shell-operator tokens, duplicated from [`crate::command`] at the
/// string-parsing boundary per §4.6's "parse-string helper".
const SHELL_OPERATORS: &[&str] = &["&&", "||", "|", ";", ">", "<", "$", "`", "\"", "'"];

/// The outcome of one dispatch: either an engine run, or rendered text from
/// a built-in handler that never touched the engine.
pub enum DispatchOutcome {
    Executed(Summary),
    BuiltIn(String),
}

impl DispatchOutcome {
    /// Exit code per SPEC_FULL.md §6: `0` iff there are no `Failed` results
    /// (or, for a built-in, it always succeeds).
    pub fn exit_code(&self) -> i32 {
        match self {
            DispatchOutcome::Executed(summary) => {
                if summary.failed_executions == 0 {
                    0
                } else {
                    1
                }
            }
            DispatchOutcome::BuiltIn(_) => 0,
        }
    }
}

/// Resolve `argv` into a [`Command`], detecting shell operators in the raw
/// string form per §4.6's "parse-string helper".
pub fn parse_command_string(s: &str) -> Command {
    if SHELL_OPERATORS.iter().any(|op| s.contains(op)) {
        return Command::new_shell(vec![s.to_string()]);
    }
    let args: Vec<String> = s.split_whitespace().map(str::to_string).collect();
    Command::classify(args)
}

/// Run one dispatch: resolve repositories, classify `argv`, and route to the
/// engine or a built-in handler.
pub fn dispatch(
    config: &FleetConfig,
    selected_groups: &[String],
    argv: Vec<String>,
    engine: &ExecutionEngine,
    token: &CancellationToken,
) -> Result<DispatchOutcome, DispatchError> {
    let repos = config.repositories_for(selected_groups)?;
    if repos.is_empty() {
        return Err(DispatchError::NoRepositoriesForGroups);
    }

    let cmd = Command::classify(argv);

    if cmd.kind == CommandKind::BuiltIn {
        log::debug!("routing built-in {:?} to handler table", cmd.name);
        let output = run_builtin(config, &repos, &cmd)?;
        return Ok(DispatchOutcome::BuiltIn(output));
    }

    log::debug!(
        "dispatching {:?} against {} repositories via {}",
        cmd.full_command(),
        repos.len(),
        if repos.len() > 1 { "parallel" } else { "sequential" }
    );

    let summary = if repos.len() > 1 {
        engine.execute_in_parallel(token, &repos, &cmd)?
    } else {
        engine.execute_sequential(token, &repos, &cmd)?
    };

    Ok(DispatchOutcome::Executed(summary))
}

fn run_builtin(config: &FleetConfig, repos: &[crate::git::Repository], cmd: &Command) -> Result<String, DispatchError> {
    match cmd.name.as_str() {
        "status" => Ok(render_status(repos)),
        "config" => Ok(render_config(config)),
        "version" => Ok(format!("git-fleet {}", env!("CARGO_PKG_VERSION"))),
        "help" => Ok(render_help()),
        other => Err(DispatchError::UnknownBuiltin(other.to_string())),
    }
}

fn render_status(repos: &[crate::git::Repository]) -> String {
    let adapter = GitAdapter::new();
    let mut lines = Vec::new();
    for repo in repos {
        let status = adapter.get_status(repo);
        let line = if status.is_valid {
            success_message(format!(
                "{} [{}] {} (+{} ~{} -{})",
                status.name,
                status.branch.as_deref().unwrap_or("?"),
                status.status.map(|s| s.to_string()).unwrap_or_default(),
                status.created_files,
                status.modified_files,
                status.deleted_files
            ))
        } else {
            info_message(format!("{}: {}", status.name, status.error_message.as_deref().unwrap_or("invalid")))
        };
        lines.push(line);
    }
    lines.join("\n")
}

fn render_config(config: &FleetConfig) -> String {
    let mut lines = vec![format!("theme: {}", config.theme)];
    for (name, entry) in &config.repositories {
        let exists = entry.path.exists();
        lines.push(format!("  {name}: {} (exists: {exists})", entry.path.display()));
    }
    for (group, members) in &config.groups {
        lines.push(format!("group {group}: {}", members.join(", ")));
    }
    lines.join("\n")
}

fn render_help() -> String {
    "fleet [--groups <name>...] [-v|-vv] [--config <path>] <status|config|version|help|COMMAND...>".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RepoEntry;
    use crate::progress::NoOpProgressReporter;
    use std::sync::Arc;

    fn sample_config() -> FleetConfig {
        let mut config = FleetConfig::default();
        config.repositories.insert("a".to_string(), RepoEntry { path: "/tmp/does-not-exist-a".into() });
        config.repositories.insert("b".to_string(), RepoEntry { path: "/tmp/does-not-exist-b".into() });
        config.groups.insert("all".to_string(), vec!["a".to_string(), "b".to_string()]);
        config
    }

    #[test]
    fn test_dispatch_errors_on_empty_group_resolution() {
        let config = FleetConfig::default();
        let engine = ExecutionEngine::new(Arc::new(NoOpProgressReporter));
        let token = CancellationToken::new();
        let err = dispatch(&config, &[], vec!["status".to_string()], &engine, &token).unwrap_err();
        assert!(matches!(err, DispatchError::NoRepositoriesForGroups));
    }

    #[test]
    fn test_dispatch_routes_builtin_without_engine() {
        let config = sample_config();
        let engine = ExecutionEngine::new(Arc::new(NoOpProgressReporter));
        let token = CancellationToken::new();
        let outcome =
            dispatch(&config, &["all".to_string()], vec!["version".to_string()], &engine, &token).expect("dispatch");
        match outcome {
            DispatchOutcome::BuiltIn(text) => assert!(text.contains("git-fleet")),
            DispatchOutcome::Executed(_) => panic!("expected built-in outcome"),
        }
    }

    #[test]
    fn test_dispatch_chooses_parallel_for_multiple_repos() {
        let config = sample_config();
        let engine = ExecutionEngine::new(Arc::new(NoOpProgressReporter));
        let token = CancellationToken::new();
        let outcome = dispatch(
            &config,
            &["all".to_string()],
            vec!["status".to_string(), "--porcelain".to_string()],
            &engine,
            &token,
        )
        .expect("dispatch");
        match outcome {
            DispatchOutcome::Executed(summary) => assert_eq!(summary.total_repositories, 2),
            DispatchOutcome::BuiltIn(_) => panic!("expected executed outcome"),
        }
    }

    #[test]
    fn test_parse_command_string_detects_operators() {
        let cmd = parse_command_string("echo hi | wc -l");
        assert_eq!(cmd.kind, CommandKind::Shell);
        assert_eq!(cmd.args.len(), 1);
    }

    #[test]
    fn test_exit_code_zero_on_no_failures() {
        let summary = Summary::new();
        let outcome = DispatchOutcome::Executed(summary);
        assert_eq!(outcome.exit_code(), 0);
    }
}
