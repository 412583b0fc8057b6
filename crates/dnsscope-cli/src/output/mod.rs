//! Output formatting for different formats.

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use dnsscope::{ApiResponse, RecordEntry, Severity};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed tables with colors
    #[default]
    Pretty,
    /// JSON response envelope
    Json,
    /// YAML response envelope
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "table" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => anyhow::bail!(
                "Unknown output format: {}\n\
                 Valid formats: pretty, json, yaml",
                s
            ),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

impl OutputFormat {
    /// Print a response envelope in a machine-readable format.
    ///
    /// Does nothing for [`OutputFormat::Pretty`]; callers render that themselves.
    pub fn emit<T: Serialize>(self, response: &ApiResponse<T>) -> Result<()> {
        match self {
            Self::Json => println!("{}", serde_json::to_string_pretty(response)?),
            Self::Yaml => print!("{}", serde_yaml::to_string(response)?),
            Self::Pretty => {}
        }
        Ok(())
    }
}

/// One-line presentation of a record entry.
pub fn entry_text(entry: &RecordEntry) -> String {
    match entry {
        RecordEntry::A(a) => match &a.reverse {
            Some(name) => format!("{} ({name})", a.ip),
            None => a.ip.to_string(),
        },
        RecordEntry::Aaaa(aaaa) => aaaa.ip.to_string(),
        RecordEntry::Mx(mx) => format!("{} {}", mx.priority, mx.exchange),
        RecordEntry::Soa(soa) => format!(
            "{} {} serial={} refresh={} retry={} expire={} minttl={}",
            soa.nsname, soa.hostmaster, soa.serial, soa.refresh, soa.retry, soa.expire, soa.minttl
        ),
        RecordEntry::Srv(srv) => format!(
            "{} -> {}:{} (priority {}, weight {})",
            srv.service, srv.name, srv.port, srv.priority, srv.weight
        ),
        RecordEntry::Txt(txt) => txt.value.clone(),
        RecordEntry::Name(name) => name.host.clone(),
    }
}

/// Colored severity label.
pub fn severity_label(severity: Severity) -> String {
    let text = severity.to_string();
    match severity {
        Severity::Critical => text.red().bold().to_string(),
        Severity::High => text.red().to_string(),
        Severity::Medium => text.yellow().to_string(),
        Severity::Low => text.blue().to_string(),
        Severity::Info => text.dimmed().to_string(),
    }
}

/// Check mark or cross for a boolean outcome.
pub fn yes_no(value: bool) -> String {
    if value {
        "yes".green().to_string()
    } else {
        "no".red().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dnsscope::{ARecord, MxRecord};
    use std::net::Ipv4Addr;

    #[test]
    fn parses_format_aliases() {
        assert_eq!("YML".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Pretty);
        assert!("csv".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn renders_entries() {
        let a = RecordEntry::A(ARecord {
            ip: Ipv4Addr::new(93, 184, 216, 34),
            reverse: Some("example.com".into()),
        });
        assert_eq!(entry_text(&a), "93.184.216.34 (example.com)");

        let mx = RecordEntry::Mx(MxRecord {
            priority: 10,
            exchange: "mail.example.com".into(),
        });
        assert_eq!(entry_text(&mx), "10 mail.example.com");
    }
}
