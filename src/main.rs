use anyhow::Context;
use clap::Parser;
use gitfleet::config::FleetConfig;
use gitfleet::dispatch::{self, DispatchOutcome};
use gitfleet::engine::{CancellationToken, ExecutionEngine};
use gitfleet::progress::{NoOpProgressReporter, ProgressReporter, TerminalProgressReporter};
use gitfleet::styling::{self, eprintln, error_message, println};
use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;

mod cli;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    styling::set_verbosity(cli.verbose);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(match cli.verbose {
        0 => "off",
        1 => "debug",
        _ => "trace",
    }))
    .init();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{}", error_message(format!("{err:#}")));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config_path = match cli.config {
        Some(path) => path,
        None => FleetConfig::default_path().context("resolving default config path")?,
    };
    let config = FleetConfig::load(&config_path).with_context(|| format!("loading config from {}", config_path.display()))?;

    let reporter: Arc<dyn ProgressReporter> = if std::io::stdout().is_terminal() {
        Arc::new(TerminalProgressReporter::new())
    } else {
        Arc::new(NoOpProgressReporter)
    };
    let engine = ExecutionEngine::new(reporter);

    let token = CancellationToken::new();
    if let Err(err) = signal_hook::flag::register(signal_hook::consts::SIGINT, token.signal_flag()) {
        log::warn!("failed to install Ctrl-C handler: {err}");
    }

    let outcome =
        dispatch::dispatch(&config, &cli.groups, cli.command, &engine, &token).context("dispatching command")?;

    let exit_code = outcome.exit_code();
    if let DispatchOutcome::BuiltIn(text) = &outcome {
        println!("{text}");
    }

    Ok(if exit_code == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
