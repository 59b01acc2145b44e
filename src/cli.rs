//! CLI surface: `fleet [--groups <name>...] [-v|-vv] [--config <path>] <COMMAND...>`.

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "fleet", version, about = "Fan a command across a fleet of Git repositories")]
pub struct Cli {
    /// Restrict the run to these groups; omit to use every configured group.
    #[arg(long = "groups", value_name = "NAME")]
    pub groups: Vec<String>,

    /// Increase log verbosity (`-v` debug, `-vv` trace).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to the fleet configuration file, overriding the default.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// The command to run: a Git subcommand, a shell command, or one of
    /// `status`/`config`/`version`/`help`.
    #[arg(trailing_var_arg = true)]
    pub command: Vec<String>,
}
