//! Shell resolution for `Shell`-kind command execution.
//!
//! The `$SHELL` environment variable selects the shell used to interpret a
//! command's full string form; `/bin/sh` is the fallback when `$SHELL` is
//! unset. This is read once per process and cached.

use std::process::Command;
use std::sync::OnceLock;

static SHELL_PATH: OnceLock<String> = OnceLock::new();

/// Resolve the shell to use for `Shell`-kind commands: `$SHELL`, or `/bin/sh`.
pub fn resolve_shell() -> &'static str {
    SHELL_PATH
        .get_or_init(|| std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string()))
        .as_str()
}

/// Build a `Command` that runs `shell_command` through the resolved shell
/// (`$SHELL -c <command>`, falling back to `/bin/sh -c <command>`).
pub fn shell_command(shell_command: &str) -> Command {
    let mut cmd = Command::new(resolve_shell());
    cmd.arg("-c").arg(shell_command);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_shell_nonempty() {
        assert!(!resolve_shell().is_empty());
    }

    #[test]
    fn test_shell_command_runs() {
        let output = shell_command("echo hello")
            .output()
            .expect("shell command should run");
        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).contains("hello"));
    }
}
