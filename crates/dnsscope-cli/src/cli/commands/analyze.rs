//! `dnsscope analyze` - the full analysis in one run.

use anyhow::Result;
use colored::Colorize;
use dnsscope::{AnalysisReport, ApiResponse, DomainTarget};
use std::process::ExitCode;

use super::health::print_health;
use super::records::print_records;
use super::security::print_security;
use super::trace::print_response;
use super::wildcard::print_wildcard;
use super::{reject, Context};
use crate::cli::args::DomainArgs;
use crate::education::Explain;
use crate::output::{severity_label, OutputFormat};

pub async fn execute(ctx: Context, args: DomainArgs) -> Result<ExitCode> {
    if ctx.explain {
        Explain::analyze(&args.domain).print(ctx.output_format);
    }

    let target = match DomainTarget::parse(&args.domain) {
        Ok(target) => target,
        Err(e) => return reject(&ctx, &e),
    };

    let analyzer = ctx.analyzer()?;
    let spinner = ctx.spinner(format!("Analyzing {target}..."));
    let report = analyzer.analyze_target(&target).await;
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    let code = if report.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    };

    match ctx.output_format {
        OutputFormat::Pretty => print_report(&report),
        format => format.emit(&ApiResponse::from_report(report))?,
    }

    ctx.tip("Use -o json for the full machine-readable report.");
    Ok(code)
}

fn print_report(report: &AnalysisReport) {
    if let Some(error) = &report.error {
        eprintln!("{} {error}", "Error:".red().bold());
        return;
    }

    println!(
        "{} {}",
        "Analyzed at".dimmed(),
        report.timestamp.to_rfc3339().dimmed()
    );
    println!();
    print_records(&report.domain, &report.records);
    println!();
    print_security(&report.domain, &report.security);
    println!();
    print_health(&report.domain, &report.health);
    println!();
    print_wildcard(&report.domain, &report.analysis.wildcard_detection);
    println!();
    print_response(&report.domain, &report.analysis.response_analysis);
    println!();

    let resolved: Vec<String> = report
        .resolved_types()
        .iter()
        .map(ToString::to_string)
        .collect();
    println!("{}", "Summary".bold().underline());
    println!(
        "  {} {}",
        "Resolved types:".bold(),
        if resolved.is_empty() {
            "none".to_string()
        } else {
            resolved.join(", ")
        }
    );
    println!(
        "  {} {}",
        "Findings:".bold(),
        report.highest_severity().map_or_else(
            || "none".green().to_string(),
            |severity| format!("{} (highest {})", report.vulnerability_count(), severity_label(severity)),
        )
    );
}
