//! Security posture checks.

use dnsscope_client::{AdvancedQuery, DohProbe, RecordResolver};
use dnsscope_core::{
    CaaStatus, DnsScopeError, DnssecStatus, DohStatus, DomainTarget, DotStatus, ResolverPanel,
    SecurityAssessment, Vulnerability, DEFAULT_HEALTH_TIMEOUT,
};
use futures_util::future::join_all;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// A CAA answer line: the type, a flag/preference number, then the rest
static CAA_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"CAA\s+\d+\s+\S.*").expect("valid regex"));

/// Header flags line of dig output, e.g. `;; flags: qr rd ra ad;`
static FLAGS_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r";; flags:([^;]*);").expect("valid regex"));

const TRANSFER_FAILED: &str = "Transfer failed";
const TRANSFER_SIZE: &str = "XFR size";

/// Returns true if DNSSEC-aware output shows signatures or an authenticated answer
#[must_use]
pub fn dnssec_indicated(output: &str) -> bool {
    output.contains("RRSIG")
        || FLAGS_LINE
            .captures_iter(output)
            .any(|caps| caps[1].split_whitespace().any(|flag| flag == "ad"))
}

/// Extract CAA lines from query output; no match is zero records, not an error
#[must_use]
pub fn caa_records(output: &str) -> Vec<String> {
    CAA_LINE
        .find_iter(output)
        .map(|m| m.as_str().trim_end().to_string())
        .collect()
}

/// Returns true if AXFR output shows a completed transfer
#[must_use]
pub fn zone_transfer_exposed(output: &str) -> bool {
    !output.contains(TRANSFER_FAILED) && output.contains(TRANSFER_SIZE)
}

/// Derives DNSSEC, DoH, DoT, CAA and vulnerability findings for a domain
#[derive(Clone)]
pub struct SecurityAssessor {
    resolver: Arc<dyn RecordResolver>,
    tool: Arc<dyn AdvancedQuery>,
    doh: Arc<dyn DohProbe>,
    panel: ResolverPanel,
    query_timeout: Duration,
}

impl SecurityAssessor {
    /// Create an assessor
    #[must_use]
    pub fn new(
        resolver: Arc<dyn RecordResolver>,
        tool: Arc<dyn AdvancedQuery>,
        doh: Arc<dyn DohProbe>,
        panel: ResolverPanel,
    ) -> Self {
        Self {
            resolver,
            tool,
            doh,
            panel,
            query_timeout: DEFAULT_HEALTH_TIMEOUT,
        }
    }

    /// Bound each consistency query to `timeout`
    #[must_use]
    pub const fn query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Run every check concurrently
    #[instrument(skip_all, fields(domain = %domain))]
    pub async fn assess(&self, domain: &DomainTarget) -> SecurityAssessment {
        let (dnssec, doh, caa, vulnerabilities) = tokio::join!(
            self.check_dnssec(domain),
            self.check_doh(domain),
            self.check_caa(domain),
            self.check_vulnerabilities(domain),
        );

        info!(
            dnssec = dnssec.enabled,
            doh = doh.supported,
            caa = caa.configured,
            findings = vulnerabilities.len(),
            "security assessment finished"
        );

        SecurityAssessment {
            dnssec,
            doh,
            dot: DotStatus::default(),
            caa,
            vulnerabilities,
        }
    }

    async fn check_dnssec(&self, domain: &DomainTarget) -> DnssecStatus {
        match self.tool.dnssec(domain.as_str()).await {
            Ok(output) => {
                let enabled = dnssec_indicated(&output.stdout);
                DnssecStatus {
                    enabled,
                    details: if enabled {
                        "DNSSEC signatures present in response"
                    } else {
                        "No DNSSEC signatures in response"
                    }
                    .to_string(),
                    error: None,
                }
            }
            Err(e) => {
                warn!(error = %e, "DNSSEC query failed");
                DnssecStatus {
                    enabled: false,
                    details: "DNSSEC query failed".to_string(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    async fn check_doh(&self, domain: &DomainTarget) -> DohStatus {
        let result = self.doh.probe(domain.as_str()).await;
        if let Err(e) = &result {
            debug!(provider = self.doh.provider(), error = %e, "DoH probe failed");
        }
        DohStatus {
            supported: result.is_ok(),
            provider: self.doh.provider().to_string(),
            error: result.err().map(|e| e.to_string()),
        }
    }

    async fn check_caa(&self, domain: &DomainTarget) -> CaaStatus {
        match self.tool.caa(domain.as_str()).await {
            Ok(output) => CaaStatus {
                configured: output.stdout.contains("CAA"),
                records: caa_records(&output.stdout),
                error: None,
            },
            Err(e) => {
                warn!(error = %e, "CAA query failed");
                CaaStatus {
                    configured: false,
                    records: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    async fn check_vulnerabilities(&self, domain: &DomainTarget) -> Vec<Vulnerability> {
        let (transfer, distinct) =
            tokio::join!(self.zone_transfer_open(domain), self.distinct_answers(domain));

        let mut findings = Vec::new();
        if transfer {
            findings.push(Vulnerability::open_zone_transfer(domain.as_str()));
        }
        if distinct > 1 {
            findings.push(Vulnerability::inconsistent_responses(distinct));
        }
        findings
    }

    /// A tool error counts as a restricted transfer
    async fn zone_transfer_open(&self, domain: &DomainTarget) -> bool {
        match self.tool.zone_transfer(domain.as_str()).await {
            Ok(output) => zone_transfer_exposed(&output.stdout),
            Err(e) => {
                debug!(error = %e, "AXFR attempt failed, treating as restricted");
                false
            }
        }
    }

    /// Number of distinct A answer sets across the panel, failed resolvers excluded
    async fn distinct_answers(&self, domain: &DomainTarget) -> usize {
        let answers = join_all(self.panel.iter().map(|resolver| async move {
            let query = self.resolver.ipv4_via(resolver.address, domain.as_str());
            let result = tokio::time::timeout(self.query_timeout, query)
                .await
                .unwrap_or(Err(DnsScopeError::Timeout(self.query_timeout)));
            match result {
                Ok(mut addrs) => {
                    addrs.sort_unstable();
                    Some(
                        addrs
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join(","),
                    )
                }
                Err(e) => {
                    debug!(server = %resolver.address, error = %e, "consistency query failed");
                    None
                }
            }
        }))
        .await;

        answers.into_iter().flatten().collect::<BTreeSet<_>>().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockDoh, MockResolver, MockTool, ServerBehavior};
    use dnsscope_client::QueryKind;
    use dnsscope_core::{Severity, VulnerabilityKind};
    use std::net::{IpAddr, Ipv4Addr};

    const AXFR_OPEN: &str = "example.com. 3600 IN SOA ns1.example.com. admin.example.com. 1 2 3 4 5\n\
;; Query time: 12 msec\n;; XFR size: 42 records (messages 1, bytes 1337)\n";
    const AXFR_REFUSED: &str = "; <<>> DiG 9.18 <<>> AXFR example.com\n; Transfer failed.\n";

    fn domain() -> DomainTarget {
        DomainTarget::parse("example.com").unwrap()
    }

    fn assessor(resolver: MockResolver, tool: MockTool, reachable: bool) -> SecurityAssessor {
        SecurityAssessor::new(
            Arc::new(resolver),
            Arc::new(tool),
            Arc::new(MockDoh { reachable }),
            ResolverPanel::default(),
        )
    }

    fn panel_ips() -> Vec<IpAddr> {
        ResolverPanel::default().iter().map(|r| r.address).collect()
    }

    #[test]
    fn dnssec_indicators() {
        assert!(dnssec_indicated("example.com. 300 IN RRSIG A 13 2 300 ..."));
        assert!(dnssec_indicated(";; flags: qr rd ra ad; QUERY: 1, ANSWER: 2"));
        assert!(!dnssec_indicated(";; flags: qr rd ra; QUERY: 1, ANSWER: 1"));
        assert!(!dnssec_indicated(";; ->>HEADER<<- opcode: QUERY, status: NOERROR"));
    }

    #[test]
    fn caa_lines_are_extracted() {
        let output = "example.com.\t3600\tIN\tCAA\t0 issue \"letsencrypt.org\"\n\
example.com.\t3600\tIN\tCAA\t0 iodef \"mailto:sec@example.com\"\n";
        let records = caa_records(output);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], "CAA\t0 issue \"letsencrypt.org\"");

        assert!(caa_records("; CAA query, unusual format").is_empty());
    }

    #[test]
    fn zone_transfer_needs_size_and_no_failure() {
        assert!(zone_transfer_exposed(AXFR_OPEN));
        assert!(!zone_transfer_exposed(AXFR_REFUSED));
        assert!(!zone_transfer_exposed("; Transfer failed.\n;; XFR size: 0 records"));
        assert!(!zone_transfer_exposed(""));
    }

    #[tokio::test]
    async fn open_zone_transfer_is_high_severity() {
        let tool = MockTool::default().with_output(QueryKind::ZoneTransfer, AXFR_OPEN);
        let assessment = assessor(MockResolver::default(), tool, true)
            .assess(&domain())
            .await;

        assert_eq!(assessment.vulnerabilities.len(), 1);
        let finding = &assessment.vulnerabilities[0];
        assert_eq!(finding.kind, VulnerabilityKind::OpenZoneTransfer);
        assert_eq!(finding.severity, Severity::High);
    }

    #[tokio::test]
    async fn tool_failure_never_flags_zone_transfer() {
        let assessment = assessor(MockResolver::default(), MockTool::default(), false)
            .assess(&domain())
            .await;

        assert!(assessment.vulnerabilities.is_empty());
        assert!(!assessment.dnssec.enabled);
        assert!(assessment.dnssec.error.is_some());
        assert!(!assessment.caa.configured);
        assert!(assessment.caa.error.is_some());
        assert!(!assessment.doh.supported);
        assert_eq!(assessment.doh.provider, "MockDoH");
        assert!(!assessment.dot.implemented);
    }

    #[tokio::test]
    async fn differing_answers_are_inconsistent() {
        let ips = panel_ips();
        let one = vec![Ipv4Addr::new(192, 0, 2, 1)];
        let other = vec![Ipv4Addr::new(192, 0, 2, 2)];
        let resolver = MockResolver::default()
            .with_server(ips[0], ServerBehavior::Answer(one.clone(), Duration::ZERO))
            .with_server(ips[1], ServerBehavior::Answer(one, Duration::ZERO))
            .with_server(ips[2], ServerBehavior::Answer(other, Duration::ZERO))
            .with_server(ips[3], ServerBehavior::Fail);

        let assessment = assessor(resolver, MockTool::default(), true)
            .assess(&domain())
            .await;
        assert_eq!(assessment.vulnerabilities.len(), 1);
        assert_eq!(
            assessment.vulnerabilities[0].kind,
            VulnerabilityKind::InconsistentResponses
        );
        assert_eq!(assessment.highest_severity(), Some(Severity::Medium));
    }

    #[tokio::test]
    async fn answer_order_and_failures_do_not_count() {
        let ips = panel_ips();
        let a = Ipv4Addr::new(192, 0, 2, 1);
        let b = Ipv4Addr::new(192, 0, 2, 2);
        let resolver = MockResolver::default()
            .with_server(ips[0], ServerBehavior::Answer(vec![a, b], Duration::ZERO))
            .with_server(ips[1], ServerBehavior::Answer(vec![b, a], Duration::ZERO))
            .with_server(ips[2], ServerBehavior::Fail);

        let tool = MockTool::default()
            .with_output(QueryKind::ZoneTransfer, AXFR_REFUSED)
            .with_output(QueryKind::Dnssec, "example.com. 300 IN RRSIG A 13 2 300")
            .with_output(QueryKind::Caa, "example.com. 300 IN CAA 0 issue \"pki.goog\"");

        let assessment = assessor(resolver, tool, true).assess(&domain()).await;
        assert!(assessment.vulnerabilities.is_empty());
        assert!(assessment.dnssec.enabled);
        assert!(assessment.caa.configured);
        assert_eq!(assessment.caa.records.len(), 1);
        assert!(assessment.doh.supported);
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_resolvers_are_excluded() {
        let ips = panel_ips();
        let resolver = MockResolver::default()
            .with_server(ips[0], ServerBehavior::Hang)
            .with_server(
                ips[1],
                ServerBehavior::Answer(vec![Ipv4Addr::LOCALHOST], Duration::from_millis(20)),
            );

        let assessor = assessor(resolver, MockTool::default(), true)
            .query_timeout(Duration::from_secs(1));
        assert_eq!(assessor.distinct_answers(&domain()).await, 1);
    }
}
