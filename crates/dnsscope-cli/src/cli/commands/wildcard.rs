//! `dnsscope wildcard` - synthetic subdomain probing.

use anyhow::Result;
use colored::Colorize;
use dnsscope::{DomainTarget, WildcardAssessment};
use std::process::ExitCode;

use super::{reject, render, Context};
use crate::cli::args::DomainArgs;
use crate::education::Explain;

pub async fn execute(ctx: Context, args: DomainArgs) -> Result<ExitCode> {
    if ctx.explain {
        Explain::wildcard(&args.domain).print(ctx.output_format);
    }

    let target = match DomainTarget::parse(&args.domain) {
        Ok(target) => target,
        Err(e) => return reject(&ctx, &e),
    };

    let analyzer = ctx.analyzer()?;
    let spinner = ctx.spinner(format!("Probing random subdomains of {target}..."));
    let assessment = analyzer.wildcard(target.as_str()).await?;
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    render(&ctx, assessment, |assessment| {
        print_wildcard(target.as_str(), assessment);
    })
}

pub(crate) fn print_wildcard(domain: &str, assessment: &WildcardAssessment) {
    let verdict = if assessment.detected {
        "wildcard DNS detected".yellow().bold()
    } else {
        "no wildcard".green()
    };
    println!("{} {}: {verdict}", "Wildcard check for".bold(), domain.cyan());
    println!(
        "  {} {}/{} resolved (confidence {:.2})",
        "Probes:".bold(),
        assessment.resolved_count,
        assessment.tested_subdomains.len(),
        assessment.confidence
    );
    for name in &assessment.tested_subdomains {
        println!("    {}", name.dimmed());
    }
    println!("  {}", assessment.recommendation);
    if let Some(error) = &assessment.error {
        println!("  {} {}", "!".yellow(), error.dimmed());
    }
}
