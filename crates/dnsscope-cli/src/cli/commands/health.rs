//! `dnsscope health` - resolver availability and latency.

use anyhow::Result;
use colored::Colorize;
use dnsscope::{DomainTarget, HealthReport, PerformanceRating, ProbeStatus};
use std::process::ExitCode;
use tabled::{settings::Style, Table, Tabled};

use super::{reject, render, Context};
use crate::cli::args::DomainArgs;
use crate::education::Explain;

#[derive(Tabled)]
struct ProbeRow {
    #[tabled(rename = "Resolver")]
    name: String,
    #[tabled(rename = "Address")]
    server: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Time")]
    time: String,
}

pub async fn execute(ctx: Context, args: DomainArgs) -> Result<ExitCode> {
    if ctx.explain {
        Explain::health(&args.domain).print(ctx.output_format);
    }

    let target = match DomainTarget::parse(&args.domain) {
        Ok(target) => target,
        Err(e) => return reject(&ctx, &e),
    };

    let analyzer = ctx.analyzer()?;
    let spinner = ctx.spinner(format!("Querying public resolvers for {target}..."));
    let report = analyzer.health(target.as_str()).await?;
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    render(&ctx, report, |report| print_health(target.as_str(), report))
}

pub(crate) fn print_health(domain: &str, report: &HealthReport) {
    let availability = &report.availability;
    println!(
        "{} {} ({}/{} resolvers answered)",
        "Resolver health for".bold(),
        domain.cyan(),
        availability.successful_count,
        availability.total_servers
    );
    println!();

    let rows: Vec<ProbeRow> = availability
        .per_server_result
        .iter()
        .map(|probe| ProbeRow {
            name: probe.name.clone(),
            server: probe.server.to_string(),
            status: match probe.status {
                ProbeStatus::Success => "ok".green().to_string(),
                ProbeStatus::Failed => probe
                    .error
                    .as_deref()
                    .unwrap_or("failed")
                    .red()
                    .to_string(),
            },
            time: probe
                .response_time
                .map_or_else(|| "-".to_string(), |ms| format!("{ms}ms")),
        })
        .collect();
    println!("{}", Table::new(&rows).with(Style::rounded()));

    match &report.performance {
        Some(perf) => {
            let rating = perf.rating.to_string();
            let rating = match perf.rating {
                PerformanceRating::Excellent | PerformanceRating::Good => rating.green(),
                PerformanceRating::Fair => rating.yellow(),
                PerformanceRating::Poor => rating.red(),
            };
            println!(
                "  {} {rating} (avg {:.1}ms, min {}ms, max {}ms)",
                "Performance:".bold(),
                perf.avg_ms,
                perf.min_ms,
                perf.max_ms
            );
        }
        None => println!("  {} {}", "Performance:".bold(), "no resolver answered".red()),
    }
}
