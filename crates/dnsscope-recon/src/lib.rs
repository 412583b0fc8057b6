//! DNS reconnaissance and security analysis engine.
//!
//! The [`Analyzer`] fans out five independent components for one domain and
//! merges whatever they produce into an [`AnalysisReport`]:
//!
//! - [`RecordCollector`]: the eight record types, TXT categorization, reverse names
//! - [`SecurityAssessor`]: DNSSEC, DoH, CAA, zone transfer and consistency checks
//! - [`HealthChecker`]: availability and latency across the public resolver panel
//! - [`WildcardDetector`]: synthetic subdomain probing
//! - [`ResponseAnalyzer`]: response codes, TTLs and authority from trace output
//!
//! No component failure aborts the run; each one is folded into the `error`
//! field of the sub-result it belongs to.
//!
//! [`AnalysisReport`]: dnsscope_core::AnalysisReport

#![doc(html_root_url = "https://docs.rs/dnsscope-recon/0.3.0")]

mod analyzer;
mod collector;
mod health;
mod response;
mod security;
mod wildcard;

#[cfg(test)]
mod testing;

pub use analyzer::Analyzer;
pub use collector::{classify_txt, RecordCollector};
pub use health::HealthChecker;
pub use response::{parse_trace, ResponseAnalyzer};
pub use security::{caa_records, dnssec_indicated, zone_transfer_exposed, SecurityAssessor};
pub use wildcard::WildcardDetector;
