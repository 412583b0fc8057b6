use super::{
    HealthReport, RecordSet, RecordType, ResponseAnalysis, SecurityAssessment, Severity,
    WildcardAssessment,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Heuristic analyses grouped under `analysis`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeuristicAnalysis {
    /// Wildcard DNS estimate
    pub wildcard_detection: WildcardAssessment,
    /// Parsed trace output
    pub response_analysis: ResponseAnalysis,
}

/// Complete result of one analysis run.
///
/// Built fresh per run. Sub-probe failures live inside the parts; the
/// top-level `error` is set only when the run as a whole failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Domain as given (normalized when valid)
    pub domain: String,
    /// When the run started
    pub timestamp: DateTime<Utc>,
    /// One entry per supported record type
    pub records: BTreeMap<RecordType, RecordSet>,
    /// Security posture
    pub security: SecurityAssessment,
    /// Resolver health
    pub health: HealthReport,
    /// Heuristics
    pub analysis: HeuristicAnalysis,
    /// Whole-run failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisReport {
    /// An otherwise empty report carrying a whole-run failure
    #[must_use]
    pub fn failed(domain: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            timestamp: Utc::now(),
            records: BTreeMap::new(),
            security: SecurityAssessment::default(),
            health: HealthReport::default(),
            analysis: HeuristicAnalysis::default(),
            error: Some(error.into()),
        }
    }

    /// Returns true if the whole run failed
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    /// Record types that resolved at least one entry
    #[must_use]
    pub fn resolved_types(&self) -> Vec<RecordType> {
        self.records
            .values()
            .filter(|set| set.has_records())
            .map(|set| set.record_type)
            .collect()
    }

    /// Number of security findings
    #[must_use]
    pub fn vulnerability_count(&self) -> usize {
        self.security.vulnerabilities.len()
    }

    /// Highest finding severity, if any
    #[must_use]
    pub fn highest_severity(&self) -> Option<Severity> {
        self.security.highest_severity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RecordEntry, TxtRecord};

    #[test]
    fn failed_report_is_empty_with_error() {
        let report = AnalysisReport::failed("bad domain", "invalid domain: empty label");
        assert!(report.is_failure());
        assert!(report.records.is_empty());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["error"], "invalid domain: empty label");
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn records_map_is_keyed_by_type_name() {
        let mut report = AnalysisReport::failed("example.com", "x");
        report.error = None;
        report.records.insert(
            RecordType::Txt,
            RecordSet::resolved(
                RecordType::Txt,
                vec![RecordEntry::Txt(TxtRecord {
                    value: "hello".into(),
                })],
            ),
        );
        report
            .records
            .insert(RecordType::Mx, RecordSet::failed(RecordType::Mx, "NXDOMAIN"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["records"]["TXT"]["count"], 1);
        assert_eq!(json["records"]["MX"]["error"], "NXDOMAIN");
        assert!(json.get("error").is_none());
        assert_eq!(report.resolved_types(), vec![RecordType::Txt]);
    }
}
