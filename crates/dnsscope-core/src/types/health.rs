use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// Outcome of one resolver probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    /// The resolver answered in time
    Success,
    /// The resolver errored or missed the deadline
    Failed,
}

/// Per-resolver health check result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerProbe {
    /// Resolver address
    pub server: IpAddr,
    /// Resolver operator
    pub name: String,
    /// Whether it answered
    pub status: ProbeStatus,
    /// Elapsed milliseconds, `null` on failure
    pub response_time: Option<u64>,
    /// Failure message, `null` on success
    pub error: Option<String>,
}

/// Availability across the resolver panel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    /// Panel size
    pub total_servers: usize,
    /// Resolvers that answered
    pub successful_count: usize,
    /// One entry per resolver, in panel order
    pub per_server_result: Vec<ServerProbe>,
}

/// Latency bucket derived from the average response time
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PerformanceRating {
    /// avg < 50ms
    Excellent,
    /// avg < 100ms
    Good,
    /// avg < 200ms
    Fair,
    /// everything slower
    Poor,
}

impl PerformanceRating {
    /// Bucket an average latency in milliseconds
    #[must_use]
    pub fn from_avg_ms(avg_ms: f64) -> Self {
        if avg_ms < 50.0 {
            Self::Excellent
        } else if avg_ms < 100.0 {
            Self::Good
        } else if avg_ms < 200.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

impl fmt::Display for PerformanceRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        };
        f.write_str(label)
    }
}

/// Latency statistics over successful probes only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    /// Mean response time
    pub avg_ms: f64,
    /// Fastest response
    pub min_ms: u64,
    /// Slowest response
    pub max_ms: u64,
    /// Bucket of `avg_ms`
    pub rating: PerformanceRating,
}

impl Performance {
    /// Compute statistics; `None` when there are no samples
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_samples(samples: &[u64]) -> Option<Self> {
        let min_ms = *samples.iter().min()?;
        let max_ms = *samples.iter().max()?;
        let avg_ms = samples.iter().sum::<u64>() as f64 / samples.len() as f64;

        Some(Self {
            avg_ms,
            min_ms,
            max_ms,
            rating: PerformanceRating::from_avg_ms(avg_ms),
        })
    }
}

/// Resolver health for a domain
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    /// Availability counts and per-resolver results
    pub availability: Availability,
    /// Absent when no resolver answered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<Performance>,
}

impl HealthReport {
    /// Aggregate per-resolver results
    #[must_use]
    pub fn from_probes(probes: Vec<ServerProbe>) -> Self {
        let samples: Vec<u64> = probes
            .iter()
            .filter(|p| p.status == ProbeStatus::Success)
            .filter_map(|p| p.response_time)
            .collect();

        Self {
            availability: Availability {
                total_servers: probes.len(),
                successful_count: probes
                    .iter()
                    .filter(|p| p.status == ProbeStatus::Success)
                    .count(),
                per_server_result: probes,
            },
            performance: Performance::from_samples(&samples),
        }
    }
}
