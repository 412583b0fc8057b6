//! `dnsscope trace` - response code, TTL and authority analysis.

use anyhow::Result;
use colored::Colorize;
use dnsscope::{DomainTarget, ResponseAnalysis};
use std::process::ExitCode;

use super::{reject, render, Context};
use crate::cli::args::DomainArgs;
use crate::education::Explain;

pub async fn execute(ctx: Context, args: DomainArgs) -> Result<ExitCode> {
    if ctx.explain {
        Explain::trace(&args.domain).print(ctx.output_format);
    }

    let target = match DomainTarget::parse(&args.domain) {
        Ok(target) => target,
        Err(e) => return reject(&ctx, &e),
    };

    let analyzer = ctx.analyzer()?;
    let spinner = ctx.spinner(format!("Tracing {target} from the root..."));
    let analysis = analyzer.response(target.as_str()).await?;
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    let code = render(&ctx, analysis, |analysis| {
        print_response(target.as_str(), analysis);
    })?;

    ctx.tip("Set a custom dig binary with `dnsscope config set dig_path <path>`.");
    Ok(code)
}

pub(crate) fn print_response(domain: &str, analysis: &ResponseAnalysis) {
    println!("{} {}", "Response analysis for".bold(), domain.cyan());

    let codes = &analysis.response_codes;
    if codes.all.is_empty() {
        println!("  {} {}", "Codes:".bold(), "none reported".dimmed());
    } else {
        println!("  {} {}", "Codes:".bold(), codes.all.join(", "));
    }

    match &analysis.ttl_analysis {
        Some(ttl) => {
            println!(
                "  {} min {}s, max {}s, avg {:.2}s ({:?})",
                "TTL:".bold(),
                ttl.min,
                ttl.max,
                ttl.avg,
                ttl.rating
            );
            println!("       {}", ttl.recommendation.dimmed());
        }
        None => println!("  {} {}", "TTL:".bold(), "no TTLs found".dimmed()),
    }

    let authority = &analysis.authority_analysis;
    if authority.has_authority {
        println!("  {}", "Authority:".bold());
        for record in &authority.records {
            println!("    {record}");
        }
    }

    if let Some(error) = &analysis.error {
        println!("  {} {}", "!".yellow(), error.dimmed());
    }
}
