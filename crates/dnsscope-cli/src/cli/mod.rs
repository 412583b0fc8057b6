//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Environment variable consulted for the log filter when `RUST_LOG` is unset.
const LOG_ENV: &str = "DNSSCOPE_LOG";

/// Run the CLI application.
pub async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Load configuration
    let config = Config::load()?;

    // Create context for commands
    let ctx = commands::Context {
        output_format: cli.output.or(config.output_format).unwrap_or_default(),
        explain: cli.explain || config.explain_by_default,
        verbose: cli.verbose,
        show_tips: config.show_tips,
        engine: config.engine(cli.dig.as_deref(), cli.deadline),
    };

    // Dispatch to appropriate command
    match cli.command {
        Commands::Analyze(args) => commands::analyze::execute(ctx, args).await,
        Commands::Records(args) => commands::records::execute(ctx, args).await,
        Commands::Security(args) => commands::security::execute(ctx, args).await,
        Commands::Health(args) => commands::health::execute(ctx, args).await,
        Commands::Wildcard(args) => commands::wildcard::execute(ctx, args).await,
        Commands::Trace(args) => commands::trace::execute(ctx, args).await,
        Commands::Config(args) => commands::config::execute(ctx, args),
    }
}

/// Log to stderr; `RUST_LOG` wins over `DNSSCOPE_LOG`, which wins over `--verbose`.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env(LOG_ENV))
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "info" } else { "warn" }));

    // A subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
