//! Command Model (C1): classify and describe a command.

mod error;

pub use error::CommandError;

use std::time::Duration;

/// The default per-invocation timeout: 30 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Git subcommands recognized without an explicit `git` prefix.
const GIT_SUBCOMMANDS: &[&str] = &[
    "status", "pull", "push", "fetch", "commit", "checkout", "branch", "merge", "add", "reset",
    "diff", "log",
];

/// Single-token built-in command names.
const BUILTIN_NAMES: &[&str] = &["help", "version", "config", "status"];

/// Characters/sequences whose presence forces shell interpretation.
const SHELL_OPERATORS: &[&str] = &["&&", "||", "|", ";", ">", "<", "$", "`", "\"", "'"];

/// What kind of subprocess invocation a [`Command`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "PascalCase")]
pub enum CommandKind {
    Git,
    Shell,
    BuiltIn,
}

/// An immutable description of what to run.
///
/// Construct via [`Command::new_git`], [`Command::new_shell`],
/// [`Command::new_builtin`], or [`Command::classify`]; all other fields use
/// their documented defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub kind: CommandKind,
    pub args: Vec<String>,
    pub description: Option<String>,
    pub working_dir: Option<std::path::PathBuf>,
    pub timeout: Duration,
    pub allow_failure: bool,
}

impl Command {
    /// Build a Git-kind command: `timeout = 30s`, `allow_failure = false`,
    /// `name = join(args, " ")`.
    pub fn new_git(args: Vec<String>) -> Self {
        Self {
            name: args.join(" "),
            kind: CommandKind::Git,
            args,
            description: None,
            working_dir: None,
            timeout: DEFAULT_TIMEOUT,
            allow_failure: false,
        }
    }

    /// Build a Shell-kind command: `timeout = 30s`, `allow_failure = false`.
    pub fn new_shell(args: Vec<String>) -> Self {
        Self {
            name: args.join(" "),
            kind: CommandKind::Shell,
            args,
            description: None,
            working_dir: None,
            timeout: DEFAULT_TIMEOUT,
            allow_failure: false,
        }
    }

    /// Build a BuiltIn-kind command. Built-ins carry no default timeout (they
    /// never reach the execution engine).
    pub fn new_builtin(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            name: name.clone(),
            kind: CommandKind::BuiltIn,
            args: vec![name],
            description: None,
            working_dir: None,
            timeout: Duration::ZERO,
            allow_failure: false,
        }
    }

    /// Classify a raw argument list into a [`Command`].
    ///
    /// Rules, in order:
    /// 1. Empty args → `Shell` with empty args.
    /// 2. A single arg that is a built-in name → `BuiltIn`.
    /// 3. `args[0]` is in the Git subcommand whitelist → `Git`.
    /// 4. `args[0] == "git"` and `args[1]` is in the whitelist → `Git` (the
    ///    leading `git` is retained).
    /// 5. Otherwise → `Shell`.
    pub fn classify(args: Vec<String>) -> Self {
        if args.is_empty() {
            return Self::new_shell(args);
        }

        if args.len() == 1 && BUILTIN_NAMES.contains(&args[0].as_str()) {
            return Self::new_builtin(args[0].clone());
        }

        if GIT_SUBCOMMANDS.contains(&args[0].as_str()) {
            return Self::new_git(args);
        }

        if args[0] == "git" && args.len() > 1 && GIT_SUBCOMMANDS.contains(&args[1].as_str()) {
            return Self::new_git(args);
        }

        Self::new_shell(args)
    }

    /// Whether this command must be interpreted by a POSIX shell: true for
    /// `Shell`-kind commands, or when the joined argument string contains a
    /// shell operator, or when there is exactly one argument containing a
    /// space.
    pub fn requires_shell(&self) -> bool {
        if self.kind == CommandKind::Shell {
            return true;
        }

        let joined = self.full_command();
        if SHELL_OPERATORS.iter().any(|op| joined.contains(op)) {
            return true;
        }

        self.args.len() == 1 && self.args[0].contains(' ')
    }

    /// Validate invariants: non-empty name, non-empty args, non-negative
    /// timeout (always true for a `Duration`, kept for parity with the
    /// specification's error taxonomy).
    pub fn validate(&self) -> Result<(), CommandError> {
        if self.name.is_empty() {
            return Err(CommandError::EmptyName);
        }
        if self.args.is_empty() {
            return Err(CommandError::EmptyArgs);
        }
        Ok(())
    }

    /// The joined argument string: both `ExecutionResult.command` and the
    /// process command-line for shell-mode execution.
    pub fn full_command(&self) -> String {
        self.args.join(" ")
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_allow_failure(mut self, allow_failure: bool) -> Self {
        self.allow_failure = allow_failure;
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

/// Parse a raw command-line string into a [`Command`].
///
/// If the string contains a shell operator, the whole string becomes a
/// single-argument `Shell` command; otherwise it is split on whitespace and
/// classified normally.
pub fn parse_command_string(s: &str) -> Command {
    if SHELL_OPERATORS.iter().any(|op| s.contains(op)) {
        return Command::new_shell(vec![s.to_string()]);
    }

    let args: Vec<String> = s.split_whitespace().map(str::to_string).collect();
    Command::classify(args)
}
