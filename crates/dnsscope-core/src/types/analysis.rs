use serde::{Deserialize, Serialize};

/// Recommendation emitted when at least one synthetic subdomain resolved
pub const WILDCARD_DETECTED_RECOMMENDATION: &str =
    "Wildcard DNS detected. Use additional validation for subdomain enumeration.";

/// Recommendation emitted when no synthetic subdomain resolved
pub const WILDCARD_ABSENT_RECOMMENDATION: &str =
    "No wildcard DNS detected. Standard enumeration should be reliable.";

/// Wildcard DNS estimate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WildcardAssessment {
    /// At least one synthetic subdomain resolved
    pub detected: bool,
    /// `resolved_count / probed`, a coarse ratio rather than a statistic
    pub confidence: f64,
    /// Synthetic names that were probed
    pub tested_subdomains: Vec<String>,
    /// How many of them resolved
    pub resolved_count: usize,
    /// Human-readable guidance
    pub recommendation: String,
    /// Set only when the detector could not run at all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WildcardAssessment {
    /// Build the assessment from probe outcomes
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_probes(tested_subdomains: Vec<String>, resolved_count: usize) -> Self {
        let detected = resolved_count > 0;
        let confidence = if tested_subdomains.is_empty() {
            0.0
        } else {
            resolved_count as f64 / tested_subdomains.len() as f64
        };

        Self {
            detected,
            confidence,
            tested_subdomains,
            resolved_count,
            recommendation: if detected {
                WILDCARD_DETECTED_RECOMMENDATION
            } else {
                WILDCARD_ABSENT_RECOMMENDATION
            }
            .to_string(),
            error: None,
        }
    }

    /// Placeholder used when the detector could not complete
    #[must_use]
    pub fn unavailable(reason: &str) -> Self {
        Self {
            recommendation: "Wildcard detection did not complete.".to_string(),
            error: Some(reason.to_string()),
            ..Self::default()
        }
    }
}

/// Response codes seen in query output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseCodes {
    /// Distinct codes in order of first appearance
    pub all: Vec<String>,
    /// First code seen
    pub primary: Option<String>,
}

/// TTL bucket of the average TTL
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TtlRating {
    /// avg < 300s
    VeryLow,
    /// avg < 3600s
    Low,
    /// avg < 86400s
    Standard,
    /// avg >= 86400s
    High,
}

impl TtlRating {
    /// Bucket an average TTL in seconds
    #[must_use]
    pub fn from_avg(avg_secs: f64) -> Self {
        if avg_secs < 300.0 {
            Self::VeryLow
        } else if avg_secs < 3600.0 {
            Self::Low
        } else if avg_secs < 86400.0 {
            Self::Standard
        } else {
            Self::High
        }
    }

    /// Recommendation text for the bucket
    #[must_use]
    pub const fn recommendation(self) -> &'static str {
        match self {
            Self::VeryLow => {
                "Very low TTL detected - good for rapid changes, increases query volume"
            }
            Self::Low => "Low TTL detected - balanced for moderate change frequency",
            Self::Standard => "Standard TTL - good caching/flexibility balance",
            Self::High => "High TTL - excellent for static records, slow propagation",
        }
    }
}

/// TTL distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TtlAnalysis {
    /// Smallest TTL
    pub min: u32,
    /// Largest TTL
    pub max: u32,
    /// Mean TTL rounded to two decimals
    pub avg: f64,
    /// Bucket of `avg`
    pub rating: TtlRating,
    /// Guidance for the bucket
    pub recommendation: String,
}

impl TtlAnalysis {
    /// Compute the distribution; `None` when there are no values
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_values(ttls: &[u32]) -> Option<Self> {
        let min = *ttls.iter().min()?;
        let max = *ttls.iter().max()?;
        let mean = ttls.iter().map(|&t| u64::from(t)).sum::<u64>() as f64 / ttls.len() as f64;
        let avg = (mean * 100.0).round() / 100.0;
        let rating = TtlRating::from_avg(avg);

        Some(Self {
            min,
            max,
            avg,
            rating,
            recommendation: rating.recommendation().to_string(),
        })
    }
}

/// Authority section contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorityAnalysis {
    /// An authority section was present
    pub has_authority: bool,
    /// Record lines of the section
    pub records: Vec<String>,
}

/// Parsed view of trace-style query output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseAnalysis {
    /// Status codes
    pub response_codes: ResponseCodes,
    /// Absent when no TTL could be parsed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_analysis: Option<TtlAnalysis>,
    /// Authority section
    pub authority_analysis: AuthorityAnalysis,
    /// Query tool failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponseAnalysis {
    /// Placeholder used when the trace query failed
    #[must_use]
    pub fn unavailable(reason: &str) -> Self {
        Self {
            error: Some(reason.to_string()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_is_resolved_over_probed() {
        // Coarse ratio: two of three probes resolving is 2/3, nothing more.
        let probes = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let assessment = WildcardAssessment::from_probes(probes, 2);
        assert!(assessment.detected);
        assert!((assessment.confidence - 2.0 / 3.0).abs() < f64::EPSILON);
        assert!((assessment.confidence - 0.6667).abs() < 1e-4);
        assert_eq!(assessment.recommendation, WILDCARD_DETECTED_RECOMMENDATION);
    }

    #[test]
    fn nothing_resolved_means_not_detected() {
        let probes = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let assessment = WildcardAssessment::from_probes(probes, 0);
        assert!(!assessment.detected);
        assert!(assessment.confidence.abs() < f64::EPSILON);
        assert_eq!(assessment.recommendation, WILDCARD_ABSENT_RECOMMENDATION);
    }

    #[test]
    fn ttl_thresholds_use_inclusive_lower_bounds() {
        assert_eq!(TtlRating::from_avg(299.0), TtlRating::VeryLow);
        assert_eq!(TtlRating::from_avg(300.0), TtlRating::Low);
        assert_eq!(TtlRating::from_avg(3600.0), TtlRating::Standard);
        assert_eq!(TtlRating::from_avg(86400.0), TtlRating::High);
    }

    #[test]
    fn ttl_distribution_of_sample_values() {
        let ttl = TtlAnalysis::from_values(&[250, 500, 1000]).unwrap();
        assert_eq!(ttl.min, 250);
        assert_eq!(ttl.max, 1000);
        assert!((ttl.avg - 583.33).abs() < f64::EPSILON);
        assert_eq!(ttl.rating, TtlRating::Low);
        assert!(ttl.recommendation.starts_with("Low TTL detected"));
    }

    #[test]
    fn no_ttls_means_no_block() {
        assert!(TtlAnalysis::from_values(&[]).is_none());
        let json = serde_json::to_value(ResponseAnalysis::default()).unwrap();
        assert!(json.get("ttlAnalysis").is_none());
    }
}
