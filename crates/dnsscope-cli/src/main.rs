//! dnsscope - DNS reconnaissance and security analysis
//!
//! Enumerates a domain's records, checks its security posture and
//! benchmarks public resolvers from the command line.

use anyhow::Result;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dnsscope_cli::run().await
}
