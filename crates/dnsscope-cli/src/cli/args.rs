//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use dnsscope::RecordType;

use crate::output::OutputFormat;

/// DNS reconnaissance and security analysis
///
/// Enumerates a domain's records, checks DNSSEC, CAA, DoH and zone transfer
/// exposure, benchmarks public resolvers and detects wildcard DNS.
/// Use --explain on any command to learn what it does.
#[derive(Parser, Debug)]
#[command(name = "dnsscope")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Explain what this command does (educational mode)
    #[arg(long, global = true)]
    pub explain: bool,

    /// Increase verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Overall analysis deadline in seconds
    #[arg(
        long,
        global = true,
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub deadline: Option<u64>,

    /// Path to the dig executable
    #[arg(long, global = true, env = "DNSSCOPE_DIG", value_name = "PATH")]
    pub dig: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full analysis: records, security, health and heuristics
    Analyze(DomainArgs),

    /// Resolve all supported record types
    Records(RecordsArgs),

    /// Assess DNSSEC, DoH, DoT, CAA and known misconfigurations
    Security(DomainArgs),

    /// Benchmark the domain's resolution across public resolvers
    Health(DomainArgs),

    /// Probe random subdomains for wildcard DNS
    Wildcard(DomainArgs),

    /// Trace resolution and analyze response codes, TTLs and authority
    Trace(DomainArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),
}

// ============================================================================
// Domain commands
// ============================================================================

#[derive(Args, Debug)]
pub struct DomainArgs {
    /// Domain to analyze (e.g., example.com)
    pub domain: String,
}

#[derive(Args, Debug)]
pub struct RecordsArgs {
    /// Domain to resolve
    pub domain: String,

    /// Only show these record types (e.g., -t mx -t txt)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub types: Vec<RecordType>,
}

// ============================================================================
// Config command
// ============================================================================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Key to set (e.g., deadline, dig_path, output_format)
        key: String,

        /// Value to set
        value: String,
    },

    /// Show config file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn record_types_parse_case_insensitively() {
        let cli = Cli::parse_from(["dnsscope", "records", "example.com", "-t", "mx", "--type", "TXT"]);
        let Commands::Records(args) = cli.command else {
            panic!("expected records command");
        };
        assert_eq!(args.types, vec![RecordType::Mx, RecordType::Txt]);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["dnsscope", "analyze", "example.com", "-o", "json", "--deadline", "15"]);
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.deadline, Some(15));
    }

    #[test]
    fn zero_deadline_is_rejected() {
        let err = Cli::try_parse_from(["dnsscope", "analyze", "example.com", "--deadline", "0"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
