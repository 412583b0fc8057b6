//! DNS reconnaissance and security analysis engine.
//!
//! Given a domain, dnsscope enumerates its records, assesses its security
//! posture, benchmarks a panel of public resolvers and applies wildcard and
//! TTL heuristics. Every probe is independently fallible; the report is
//! always structurally complete unless the input itself is invalid.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! #[tokio::main]
//! async fn main() -> dnsscope::Result<()> {
//!     let report = dnsscope::analyze_domain("example.com").await?;
//!
//!     for record_type in report.resolved_types() {
//!         println!("{record_type}: {} records", report.records[&record_type].count);
//!     }
//!     println!("DNSSEC: {}", report.security.dnssec.enabled);
//!     println!("Findings: {}", report.vulnerability_count());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Uses rustls for the DoH probe
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS

#![doc(html_root_url = "https://docs.rs/dnsscope/0.3.0")]

// Re-export core types
pub use dnsscope_core::*;

// Re-export the outbound adapters
pub use dnsscope_client::{
    AdvancedQuery, DigTool, DohClient, DohClientBuilder, DohProbe, HickoryGateway, QueryKind,
    RecordResolver, ToolOutput,
};

// Re-export the engine
pub use dnsscope_recon::{
    Analyzer, HealthChecker, RecordCollector, ResponseAnalyzer, SecurityAssessor,
    WildcardDetector,
};

// Re-export runtime for convenience
pub use serde;
pub use serde_json;
pub use tokio;

/// Analyze `domain` with the default configuration.
///
/// Returns `Err` only for an invalid domain. Probe failures are embedded in
/// the report; an engine that cannot be built yields a failed report.
pub async fn analyze_domain(domain: &str) -> Result<AnalysisReport> {
    analyze_domain_with(domain, EngineConfig::default()).await
}

/// Analyze `domain` with an explicit engine configuration.
pub async fn analyze_domain_with(domain: &str, config: EngineConfig) -> Result<AnalysisReport> {
    let target = DomainTarget::parse(domain)?;
    match Analyzer::new(config) {
        Ok(analyzer) => Ok(analyzer.analyze_target(&target).await),
        Err(e) => Ok(AnalysisReport::failed(target.as_str(), e.to_string())),
    }
}
