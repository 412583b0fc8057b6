//! Command implementations.

pub mod analyze;
pub mod config;
pub mod health;
pub mod records;
pub mod security;
pub mod trace;
pub mod wildcard;

use anyhow::Result;
use colored::Colorize;
use dnsscope::{Analyzer, ApiResponse, DnsScopeError, EngineConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::process::ExitCode;
use std::time::Duration;

use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Output format
    pub output_format: OutputFormat,

    /// Whether to show educational explanations
    pub explain: bool,

    /// Verbose output
    pub verbose: bool,

    /// Show tips after pretty output
    pub show_tips: bool,

    /// Engine configuration assembled from file and flags
    pub engine: EngineConfig,
}

impl Context {
    /// Create the analysis engine with the configured collaborators.
    pub fn analyzer(&self) -> Result<Analyzer> {
        Analyzer::new(self.engine.clone())
            .map_err(|e| anyhow::anyhow!("Failed to set up the analysis engine: {e}"))
    }

    /// Spinner on stderr while a probe runs; `None` for machine-readable output.
    pub fn spinner(&self, message: String) -> Option<ProgressBar> {
        if self.output_format != OutputFormat::Pretty {
            return None;
        }

        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(message);
        bar.enable_steady_tick(Duration::from_millis(100));
        Some(bar)
    }

    /// Print a dimmed tip after pretty output.
    pub fn tip(&self, text: &str) {
        if self.show_tips && self.output_format == OutputFormat::Pretty {
            println!();
            println!("{}", format!("Tip: {text}").dimmed());
        }
    }
}

/// Report a failure in the configured format and pick the failure exit code.
pub fn reject(ctx: &Context, err: &DnsScopeError) -> Result<ExitCode> {
    match ctx.output_format {
        OutputFormat::Pretty => eprintln!("{} {err}", "Error:".red().bold()),
        format => format.emit(&ApiResponse::<()>::err(err.to_string()))?,
    }
    Ok(ExitCode::FAILURE)
}

/// Print a component result: the envelope for JSON/YAML, `pretty` otherwise.
pub fn render<T: serde::Serialize>(ctx: &Context, data: T, pretty: impl FnOnce(&T)) -> Result<ExitCode> {
    match ctx.output_format {
        OutputFormat::Pretty => pretty(&data),
        format => format.emit(&ApiResponse::ok(data))?,
    }
    Ok(ExitCode::SUCCESS)
}
