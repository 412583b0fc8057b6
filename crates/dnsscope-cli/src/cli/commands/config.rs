//! `dnsscope config` - CLI configuration management.

use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;

use super::{render, Context};
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::config::Config;

pub fn execute(ctx: Context, args: ConfigArgs) -> Result<ExitCode> {
    match args.command {
        ConfigCommands::Show => show_config(&ctx),
        ConfigCommands::Set { key, value } => set_config(&key, &value),
        ConfigCommands::Path => show_path(),
    }
}

fn show_config(ctx: &Context) -> Result<ExitCode> {
    let config = Config::load()?;

    render(ctx, config, |config| {
        let unset = || "(not set)".dimmed().to_string();
        let secs = |value: Option<u64>| value.map_or_else(unset, |s| format!("{s}s"));

        println!("{}", "Current Configuration:".bold());
        println!();
        println!(
            "  {} {}",
            "output_format:".bold(),
            config.output_format.unwrap_or_default()
        );
        println!(
            "  {} {}",
            "dig_path:".bold(),
            config.dig_path.clone().unwrap_or_else(unset)
        );
        println!("  {} {}", "deadline:".bold(), secs(config.deadline_secs));
        println!(
            "  {} {}",
            "health_timeout:".bold(),
            secs(config.health_timeout_secs)
        );
        println!(
            "  {} {}",
            "doh_endpoint:".bold(),
            config.doh_endpoint.clone().unwrap_or_else(unset)
        );
        println!(
            "  {} {}",
            "doh_provider:".bold(),
            config.doh_provider.clone().unwrap_or_else(unset)
        );
        println!("  {} {}", "show_tips:".bold(), config.show_tips);
        println!(
            "  {} {}",
            "explain_by_default:".bold(),
            config.explain_by_default
        );
    })
}

fn set_config(key: &str, value: &str) -> Result<ExitCode> {
    let mut config = Config::load()?;

    match key {
        "output_format" | "output" => config.output_format = Some(value.parse()?),
        "dig_path" | "dig" => config.dig_path = Some(value.to_string()),
        "deadline" | "deadline_secs" => config.deadline_secs = Some(parse_secs(value)?),
        "health_timeout" | "health_timeout_secs" => {
            config.health_timeout_secs = Some(parse_secs(value)?);
        }
        "doh_endpoint" => config.doh_endpoint = Some(value.to_string()),
        "doh_provider" => config.doh_provider = Some(value.to_string()),
        "show_tips" => config.show_tips = value.parse()?,
        "explain_by_default" | "explain" => config.explain_by_default = value.parse()?,
        _ => {
            anyhow::bail!(
                "Unknown config key: {}\n\n\
                 Available keys:\n  \
                 output_format      - Default output format (pretty/json/yaml)\n  \
                 dig_path           - Path to the dig executable\n  \
                 deadline           - Overall analysis deadline in seconds\n  \
                 health_timeout     - Per-resolver health check deadline in seconds\n  \
                 doh_endpoint       - DNS-over-HTTPS JSON endpoint\n  \
                 doh_provider       - Provider name shown for the DoH endpoint\n  \
                 show_tips          - Show helpful tips (true/false)\n  \
                 explain_by_default - Always explain commands (true/false)",
                key
            );
        }
    }

    config.save()?;
    println!("{} {} set to {}.", "Success:".green().bold(), key, value.cyan());

    Ok(ExitCode::SUCCESS)
}

fn parse_secs(value: &str) -> Result<u64> {
    let secs: u64 = value
        .parse()
        .map_err(|_| anyhow::anyhow!("Expected a number of seconds, got {value:?}"))?;
    if secs == 0 {
        anyhow::bail!("Timeouts must be at least one second");
    }
    Ok(secs)
}

fn show_path() -> Result<ExitCode> {
    let path = Config::path()?;
    println!("{}", path.display());
    Ok(ExitCode::SUCCESS)
}
