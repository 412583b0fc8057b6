//! Trace output parsing: response codes, TTLs and authority records.

use dnsscope_client::AdvancedQuery;
use dnsscope_core::{
    AuthorityAnalysis, DomainTarget, ResponseAnalysis, ResponseCodes, TtlAnalysis,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

static STATUS: Lazy<Regex> = Lazy::new(|| Regex::new(r"status:\s*([A-Z]+)").expect("valid regex"));

static TTL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d+)\s+IN\s+").expect("valid regex"));

const AUTHORITY_MARKER: &str = "AUTHORITY SECTION:";

/// Runs a trace query and parses its output
#[derive(Clone)]
pub struct ResponseAnalyzer {
    tool: Arc<dyn AdvancedQuery>,
}

impl ResponseAnalyzer {
    /// Create an analyzer on top of the query tool
    #[must_use]
    pub fn new(tool: Arc<dyn AdvancedQuery>) -> Self {
        Self { tool }
    }

    /// Trace the domain and analyze the output
    #[instrument(skip_all, fields(domain = %domain))]
    pub async fn analyze(&self, domain: &DomainTarget) -> ResponseAnalysis {
        match self.tool.trace(domain.as_str()).await {
            Ok(output) => {
                let analysis = parse_trace(&output.stdout);
                debug!(
                    codes = ?analysis.response_codes.all,
                    ttls = analysis.ttl_analysis.is_some(),
                    authority = analysis.authority_analysis.has_authority,
                    "trace parsed"
                );
                analysis
            }
            Err(e) => {
                warn!(error = %e, "trace query failed");
                ResponseAnalysis::unavailable(&e.to_string())
            }
        }
    }
}

/// Parse trace-style output.
///
/// TTL analysis is `None` when no TTL token is found. Authority records are
/// the lines after each `AUTHORITY SECTION:` marker up to the next blank line
/// or `;;` section header.
#[must_use]
pub fn parse_trace(output: &str) -> ResponseAnalysis {
    let mut all: Vec<String> = Vec::new();
    for caps in STATUS.captures_iter(output) {
        let code = &caps[1];
        if !all.iter().any(|c| c == code) {
            all.push(code.to_string());
        }
    }

    let ttls: Vec<u32> = TTL
        .captures_iter(output)
        .filter_map(|caps| caps[1].parse().ok())
        .collect();

    ResponseAnalysis {
        response_codes: ResponseCodes {
            primary: all.first().cloned(),
            all,
        },
        ttl_analysis: TtlAnalysis::from_values(&ttls),
        authority_analysis: parse_authority(output),
        error: None,
    }
}

fn parse_authority(output: &str) -> AuthorityAnalysis {
    let mut analysis = AuthorityAnalysis::default();
    let mut in_section = false;

    for line in output.lines() {
        if line.contains(AUTHORITY_MARKER) {
            analysis.has_authority = true;
            in_section = true;
            continue;
        }
        if !in_section {
            continue;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(";;") {
            in_section = false;
        } else {
            analysis.records.push(trimmed.to_string());
        }
    }
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTool;
    use dnsscope_client::QueryKind;
    use dnsscope_core::TtlRating;

    const TRACE: &str = "\
; <<>> DiG 9.18.24 <<>> +trace +additional example.com
;; global options: +cmd
.\t\t\t250\tIN\tNS\ta.root-servers.net.
;; Received 239 bytes from 127.0.0.53#53(127.0.0.53) in 3 ms

com.\t\t\t500\tIN\tNS\ta.gtld-servers.net.
;; Received 1170 bytes from 198.41.0.4#53(a.root-servers.net) in 12 ms

example.com.\t\t1000\tIN\tA\t93.184.216.34
;; Received 56 bytes from 199.43.135.53#53(a.iana-servers.net) in 20 ms
";

    #[test]
    fn ttl_distribution_of_trace() {
        let analysis = parse_trace(TRACE);
        let ttl = analysis.ttl_analysis.unwrap();

        assert_eq!(ttl.min, 250);
        assert_eq!(ttl.max, 1000);
        assert!((ttl.avg - 583.33).abs() < f64::EPSILON);
        assert_eq!(ttl.rating, TtlRating::Low);
        assert!(ttl.recommendation.starts_with("Low TTL detected"));
    }

    #[test]
    fn no_ttl_tokens_means_no_ttl_block() {
        let analysis = parse_trace(";; connection timed out; no servers could be reached\n");
        assert!(analysis.ttl_analysis.is_none());

        let json = serde_json::to_value(&analysis).unwrap();
        assert!(json.get("ttlAnalysis").is_none());
    }

    #[test]
    fn digits_inside_names_are_not_ttls() {
        let analysis = parse_trace("ns1 IN A 192.0.2.1\n");
        assert!(analysis.ttl_analysis.is_none());
    }

    #[test]
    fn status_codes_in_first_seen_order() {
        let output = ";; ->>HEADER<<- opcode: QUERY, status: NOERROR, id: 1\n\
;; ->>HEADER<<- opcode: QUERY, status: NXDOMAIN, id: 2\n\
;; ->>HEADER<<- opcode: QUERY, status: NOERROR, id: 3\n";
        let codes = parse_trace(output).response_codes;
        assert_eq!(codes.all, vec!["NOERROR".to_string(), "NXDOMAIN".to_string()]);
        assert_eq!(codes.primary.as_deref(), Some("NOERROR"));

        assert!(parse_trace(TRACE).response_codes.primary.is_none());
    }

    #[test]
    fn authority_section_runs_to_next_marker() {
        let output = "\
;; ANSWER SECTION:
example.com.\t300\tIN\tA\t93.184.216.34

;; AUTHORITY SECTION:
example.com.\t86400\tIN\tNS\ta.iana-servers.net.
example.com.\t86400\tIN\tNS\tb.iana-servers.net.
;; ADDITIONAL SECTION:
a.iana-servers.net.\t1800\tIN\tA\t199.43.135.53
";
        let authority = parse_trace(output).authority_analysis;
        assert!(authority.has_authority);
        assert_eq!(authority.records.len(), 2);
        assert!(authority.records[0].ends_with("a.iana-servers.net."));

        assert!(!parse_trace(TRACE).authority_analysis.has_authority);
    }

    #[tokio::test]
    async fn trace_failure_is_folded_into_error() {
        let analysis = ResponseAnalyzer::new(Arc::new(MockTool::default()))
            .analyze(&DomainTarget::parse("example.com").unwrap())
            .await;
        assert!(analysis.error.unwrap().contains("failed to run dig"));
        assert!(analysis.ttl_analysis.is_none());
    }

    #[tokio::test]
    async fn trace_output_is_parsed() {
        let tool = MockTool::default().with_output(QueryKind::Trace, TRACE);
        let analysis = ResponseAnalyzer::new(Arc::new(tool))
            .analyze(&DomainTarget::parse("example.com").unwrap())
            .await;
        assert!(analysis.error.is_none());
        assert_eq!(analysis.ttl_analysis.unwrap().max, 1000);
    }
}
