//! `dnsscope records` - resolve every supported record type.

use anyhow::Result;
use colored::Colorize;
use dnsscope::{DomainTarget, RecordSet, RecordType};
use std::collections::BTreeMap;
use std::process::ExitCode;
use tabled::{settings::Style, Table, Tabled};

use super::{reject, render, Context};
use crate::cli::args::RecordsArgs;
use crate::education::Explain;
use crate::output::entry_text;

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "Type")]
    record_type: String,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "Records")]
    records: String,
}

pub async fn execute(ctx: Context, args: RecordsArgs) -> Result<ExitCode> {
    if ctx.explain {
        Explain::records(&args.domain).print(ctx.output_format);
    }

    let target = match DomainTarget::parse(&args.domain) {
        Ok(target) => target,
        Err(e) => return reject(&ctx, &e),
    };

    let analyzer = ctx.analyzer()?;
    let spinner = ctx.spinner(format!("Resolving records for {target}..."));
    let mut records = analyzer.records(target.as_str()).await?;
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    if !args.types.is_empty() {
        records.retain(|record_type, _| args.types.contains(record_type));
    }

    let code = render(&ctx, records, |records| print_records(target.as_str(), records))?;

    ctx.tip("Use `dnsscope security <domain>` to check DNSSEC, CAA and zone transfers.");
    Ok(code)
}

/// Pretty table of record sets; failed lookups are listed below it.
pub(crate) fn print_records(domain: &str, records: &BTreeMap<RecordType, RecordSet>) {
    println!("{} {}", "Records for".bold(), domain.cyan());
    println!();

    let rows: Vec<RecordRow> = records
        .values()
        .filter(|set| set.error.is_none())
        .map(|set| RecordRow {
            record_type: set.record_type.to_string(),
            count: set.count,
            records: if set.records.is_empty() {
                "-".to_string()
            } else {
                set.records.iter().map(entry_text).collect::<Vec<_>>().join("\n")
            },
        })
        .collect();

    if rows.is_empty() {
        println!("{}", "No record types resolved.".yellow());
    } else {
        println!("{}", Table::new(&rows).with(Style::rounded()));
    }

    if let Some(categories) = records.get(&RecordType::Txt).and_then(|set| set.categories.as_ref()) {
        let buckets = [
            ("SPF", categories.spf.len()),
            ("DMARC", categories.dmarc.len()),
            ("DKIM", categories.dkim.len()),
            ("Verification", categories.verification.len()),
        ];
        let found: Vec<String> = buckets
            .iter()
            .filter(|(_, n)| *n > 0)
            .map(|(label, n)| format!("{label} ({n})"))
            .collect();
        if !found.is_empty() {
            println!("  {} {}", "TXT:".bold(), found.join(", "));
        }
    }

    for set in records.values() {
        if let Some(error) = &set.error {
            println!("  {} {}: {}", "!".yellow(), set.record_type, error.dimmed());
        }
    }
}
