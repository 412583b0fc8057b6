use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Informational
    Info,
    /// Low severity
    Low,
    /// Medium severity
    Medium,
    /// High severity
    High,
    /// Critical severity
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Info => "Info",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        };
        f.write_str(label)
    }
}

/// Known DNS misconfigurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VulnerabilityKind {
    /// AXFR answered for an unauthenticated requester
    #[serde(rename = "Zone Transfer Enabled")]
    OpenZoneTransfer,
    /// Public resolvers disagree about the domain's answers
    #[serde(rename = "Inconsistent DNS Responses")]
    InconsistentResponses,
}

impl fmt::Display for VulnerabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenZoneTransfer => f.write_str("Zone Transfer Enabled"),
            Self::InconsistentResponses => f.write_str("Inconsistent DNS Responses"),
        }
    }
}

/// A detected misconfiguration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vulnerability {
    /// What was found
    #[serde(rename = "type")]
    pub kind: VulnerabilityKind,
    /// How severe it is
    pub severity: Severity,
    /// Human-readable description
    pub description: String,
    /// Suggested fix
    pub mitigation: String,
}

impl Vulnerability {
    /// Zone transfer open to anyone
    #[must_use]
    pub fn open_zone_transfer(domain: &str) -> Self {
        Self {
            kind: VulnerabilityKind::OpenZoneTransfer,
            severity: Severity::High,
            description: format!(
                "The zone for {domain} can be transferred (AXFR) by an unauthenticated client, exposing every record in the zone."
            ),
            mitigation: "Restrict zone transfers to authorized secondary name servers (allow-transfer / TSIG)."
                .to_string(),
        }
    }

    /// Public resolvers returned differing answer sets
    #[must_use]
    pub fn inconsistent_responses(distinct: usize) -> Self {
        Self {
            kind: VulnerabilityKind::InconsistentResponses,
            severity: Severity::Medium,
            description: format!(
                "Public resolvers returned {distinct} different answer sets for the same query, which may indicate propagation issues, split-horizon DNS or cache poisoning."
            ),
            mitigation: "Verify that all authoritative name servers serve the same zone data and that TTLs have expired after recent changes."
                .to_string(),
        }
    }
}

/// DNSSEC presence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnssecStatus {
    /// Signatures or the authenticated-data flag were observed
    pub enabled: bool,
    /// Short explanation of the verdict
    pub details: String,
    /// Query tool failure, if the check could not run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// DNS-over-HTTPS reachability of the domain through a public endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DohStatus {
    /// The endpoint answered successfully
    pub supported: bool,
    /// Which endpoint was probed
    pub provider: String,
    /// Request failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// DNS-over-TLS status.
///
/// Not probed; `implemented` is always false so consumers can tell this
/// apart from a real negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DotStatus {
    /// Always false
    pub supported: bool,
    /// Always false, the probe does not exist
    pub implemented: bool,
    /// Explanation
    pub note: String,
}

impl Default for DotStatus {
    fn default() -> Self {
        Self {
            supported: false,
            implemented: false,
            note: "DoT check not implemented - requires specialized tooling".to_string(),
        }
    }
}

/// CAA configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaaStatus {
    /// The query output mentions CAA
    pub configured: bool,
    /// Matched CAA lines; may be empty even when `configured`
    pub records: Vec<String>,
    /// Query tool failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Security posture of a domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityAssessment {
    /// DNSSEC presence
    pub dnssec: DnssecStatus,
    /// DNS-over-HTTPS
    pub doh: DohStatus,
    /// DNS-over-TLS (stub)
    pub dot: DotStatus,
    /// CAA records
    pub caa: CaaStatus,
    /// Findings, each detected independently
    pub vulnerabilities: Vec<Vulnerability>,
}

impl SecurityAssessment {
    /// Placeholder used when the whole assessment could not complete
    #[must_use]
    pub fn unavailable(reason: &str) -> Self {
        Self {
            dnssec: DnssecStatus {
                enabled: false,
                details: "DNSSEC check did not complete".to_string(),
                error: Some(reason.to_string()),
            },
            doh: DohStatus {
                supported: false,
                provider: String::new(),
                error: Some(reason.to_string()),
            },
            dot: DotStatus::default(),
            caa: CaaStatus {
                configured: false,
                records: Vec::new(),
                error: Some(reason.to_string()),
            },
            vulnerabilities: Vec::new(),
        }
    }

    /// Highest severity among the findings
    #[must_use]
    pub fn highest_severity(&self) -> Option<Severity> {
        self.vulnerabilities.iter().map(|v| v.severity).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_stub_is_distinguishable_from_negative() {
        let json = serde_json::to_value(DotStatus::default()).unwrap();
        assert_eq!(json["supported"], false);
        assert_eq!(json["implemented"], false);
        assert!(json["note"].as_str().unwrap().contains("not implemented"));
    }

    #[test]
    fn vulnerability_type_uses_display_name() {
        let json = serde_json::to_value(Vulnerability::inconsistent_responses(2)).unwrap();
        assert_eq!(json["type"], "Inconsistent DNS Responses");
        assert_eq!(json["severity"], "Medium");
    }

    #[test]
    fn highest_severity_picks_max() {
        let mut assessment = SecurityAssessment::default();
        assert_eq!(assessment.highest_severity(), None);
        assessment
            .vulnerabilities
            .push(Vulnerability::inconsistent_responses(2));
        assessment
            .vulnerabilities
            .push(Vulnerability::open_zone_transfer("example.com"));
        assert_eq!(assessment.highest_severity(), Some(Severity::High));
    }
}
