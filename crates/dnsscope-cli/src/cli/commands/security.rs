//! `dnsscope security` - DNSSEC, DoH, DoT, CAA and misconfiguration checks.

use anyhow::Result;
use colored::Colorize;
use dnsscope::{DomainTarget, SecurityAssessment};
use std::process::ExitCode;
use tabled::{settings::Style, Table, Tabled};

use super::{reject, render, Context};
use crate::cli::args::DomainArgs;
use crate::education::Explain;
use crate::output::{severity_label, yes_no};

#[derive(Tabled)]
struct FindingRow {
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Finding")]
    kind: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Mitigation")]
    mitigation: String,
}

pub async fn execute(ctx: Context, args: DomainArgs) -> Result<ExitCode> {
    if ctx.explain {
        Explain::security(&args.domain).print(ctx.output_format);
    }

    let target = match DomainTarget::parse(&args.domain) {
        Ok(target) => target,
        Err(e) => return reject(&ctx, &e),
    };

    let analyzer = ctx.analyzer()?;
    let spinner = ctx.spinner(format!("Assessing {target}..."));
    let assessment = analyzer.security(target.as_str()).await?;
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    let code = render(&ctx, assessment, |assessment| {
        print_security(target.as_str(), assessment);
    })?;

    ctx.tip("Use `dnsscope analyze <domain>` for records, health and wildcard checks in one run.");
    Ok(code)
}

pub(crate) fn print_security(domain: &str, assessment: &SecurityAssessment) {
    println!("{} {}", "Security assessment for".bold(), domain.cyan());
    println!();

    let dnssec = &assessment.dnssec;
    println!(
        "  {:<8} {}  {}",
        "DNSSEC".bold(),
        yes_no(dnssec.enabled),
        dnssec.details.dimmed()
    );

    let doh = &assessment.doh;
    println!(
        "  {:<8} {}  {}",
        "DoH".bold(),
        yes_no(doh.supported),
        format!("via {}", doh.provider).dimmed()
    );

    let dot = &assessment.dot;
    println!("  {:<8} {}  {}", "DoT".bold(), "n/a".dimmed(), dot.note.dimmed());

    let caa = &assessment.caa;
    println!("  {:<8} {}", "CAA".bold(), yes_no(caa.configured));
    for record in &caa.records {
        println!("           {record}");
    }

    for (label, error) in [
        ("DNSSEC", &dnssec.error),
        ("DoH", &doh.error),
        ("CAA", &caa.error),
    ] {
        if let Some(error) = error {
            println!("  {} {label}: {}", "!".yellow(), error.dimmed());
        }
    }

    println!();
    if assessment.vulnerabilities.is_empty() {
        println!("{}", "No misconfigurations detected.".green());
        return;
    }

    let rows: Vec<FindingRow> = assessment
        .vulnerabilities
        .iter()
        .map(|v| FindingRow {
            severity: severity_label(v.severity),
            kind: v.kind.to_string(),
            description: v.description.clone(),
            mitigation: v.mitigation.clone(),
        })
        .collect();
    println!("{}", Table::new(&rows).with(Style::rounded()));
}
