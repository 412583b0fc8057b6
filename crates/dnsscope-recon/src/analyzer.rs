//! Analysis facade.

use crate::collector::RecordCollector;
use crate::health::HealthChecker;
use crate::response::ResponseAnalyzer;
use crate::security::SecurityAssessor;
use crate::wildcard::WildcardDetector;
use dnsscope_client::{AdvancedQuery, DigTool, DohClient, DohProbe, HickoryGateway, RecordResolver};
use dnsscope_core::{
    AnalysisReport, DnsScopeError, DomainTarget, EngineConfig, HealthReport, HeuristicAnalysis,
    ProbeStatus, RecordSet, RecordType, ResponseAnalysis, Result, SecurityAssessment, ServerProbe,
    WildcardAssessment,
};
use chrono::Utc;
use futures_util::FutureExt;
use std::collections::BTreeMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// Error attached to every branch that missed the overall deadline
const DEADLINE_EXCEEDED: &str = "analysis deadline exceeded";

/// Entry point of the engine.
///
/// Holds the three outbound collaborators and the engine configuration.
/// Cloning is cheap; every collaborator is shared.
///
/// # Example
///
/// ```no_run
/// use dnsscope_core::EngineConfig;
/// use dnsscope_recon::Analyzer;
///
/// # async fn run() -> dnsscope_core::Result<()> {
/// let analyzer = Analyzer::new(EngineConfig::default())?;
/// let report = analyzer.analyze("example.com").await;
/// println!("{} record types resolved", report.resolved_types().len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Analyzer {
    resolver: Arc<dyn RecordResolver>,
    tool: Arc<dyn AdvancedQuery>,
    doh: Arc<dyn DohProbe>,
    config: EngineConfig,
}

impl Analyzer {
    /// Build the default collaborators (system resolver, `dig`, DoH over reqwest)
    pub fn new(config: EngineConfig) -> Result<Self> {
        let resolver = HickoryGateway::system()?.query_timeout(config.health_timeout);
        let tool = DigTool::new()
            .program(config.tool_program.clone())
            .timeout(config.tool_timeout);
        let doh = DohClient::builder()
            .endpoint(config.doh_endpoint.clone())
            .provider(config.doh_provider.clone())
            .timeout(config.doh_timeout)
            .build()?;

        Ok(Self::with_components(
            Arc::new(resolver),
            Arc::new(tool),
            Arc::new(doh),
            config,
        ))
    }

    /// Build from explicit collaborators
    #[must_use]
    pub fn with_components(
        resolver: Arc<dyn RecordResolver>,
        tool: Arc<dyn AdvancedQuery>,
        doh: Arc<dyn DohProbe>,
        config: EngineConfig,
    ) -> Self {
        Self {
            resolver,
            tool,
            doh,
            config,
        }
    }

    /// Engine configuration
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze a domain; input errors become a report with a top-level `error`
    pub async fn analyze(&self, domain: &str) -> AnalysisReport {
        match self.try_analyze(domain).await {
            Ok(report) => report,
            Err(e) => {
                warn!(domain, error = %e, "rejected input");
                AnalysisReport::failed(domain.trim(), e.to_string())
            }
        }
    }

    /// Analyze a domain; only an invalid domain is returned as `Err`
    pub async fn try_analyze(&self, domain: &str) -> Result<AnalysisReport> {
        let target = DomainTarget::parse(domain)?;
        Ok(self.analyze_target(&target).await)
    }

    /// Run all five components concurrently and merge their results.
    ///
    /// Components settle independently. A component that panics is replaced
    /// by its unavailable value carrying the panic message; the others keep
    /// their results.
    #[instrument(skip_all, fields(domain = %domain))]
    pub async fn analyze_target(&self, domain: &DomainTarget) -> AnalysisReport {
        let start = Instant::now();
        let timestamp = Utc::now();
        info!("starting analysis");

        let (records, security, health, wildcard, response) = tokio::join!(
            guarded(
                "record collection",
                self.bounded_records(domain),
                records_unavailable
            ),
            guarded(
                "security assessment",
                self.bounded_security(domain),
                SecurityAssessment::unavailable
            ),
            guarded("health check", self.bounded_health(domain), |reason| {
                self.health_unavailable(reason)
            }),
            guarded(
                "wildcard detection",
                self.bounded_wildcard(domain),
                WildcardAssessment::unavailable
            ),
            guarded(
                "response analysis",
                self.bounded_response(domain),
                ResponseAnalysis::unavailable
            ),
        );

        let report = AnalysisReport {
            domain: domain.to_string(),
            timestamp,
            records,
            security,
            health,
            analysis: HeuristicAnalysis {
                wildcard_detection: wildcard,
                response_analysis: response,
            },
            error: None,
        };

        info!(
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            resolved = report.resolved_types().len(),
            findings = report.vulnerability_count(),
            "analysis finished"
        );
        report
    }

    /// Record collection only
    pub async fn records(&self, domain: &str) -> Result<BTreeMap<RecordType, RecordSet>> {
        Ok(self.bounded_records(&DomainTarget::parse(domain)?).await)
    }

    /// Security assessment only
    pub async fn security(&self, domain: &str) -> Result<SecurityAssessment> {
        Ok(self.bounded_security(&DomainTarget::parse(domain)?).await)
    }

    /// Resolver panel health only
    pub async fn health(&self, domain: &str) -> Result<HealthReport> {
        Ok(self.bounded_health(&DomainTarget::parse(domain)?).await)
    }

    /// Wildcard detection only
    pub async fn wildcard(&self, domain: &str) -> Result<WildcardAssessment> {
        Ok(self.bounded_wildcard(&DomainTarget::parse(domain)?).await)
    }

    /// Trace response analysis only
    pub async fn response(&self, domain: &str) -> Result<ResponseAnalysis> {
        Ok(self.bounded_response(&DomainTarget::parse(domain)?).await)
    }

    async fn bounded_records(&self, domain: &DomainTarget) -> BTreeMap<RecordType, RecordSet> {
        let collector = RecordCollector::new(Arc::clone(&self.resolver));
        within(self.config.deadline, collector.collect(domain), || {
            records_unavailable(DEADLINE_EXCEEDED)
        })
        .await
    }

    async fn bounded_security(&self, domain: &DomainTarget) -> SecurityAssessment {
        let assessor = SecurityAssessor::new(
            Arc::clone(&self.resolver),
            Arc::clone(&self.tool),
            Arc::clone(&self.doh),
            self.config.panel.clone(),
        )
        .query_timeout(self.config.health_timeout);
        within(self.config.deadline, assessor.assess(domain), || {
            SecurityAssessment::unavailable(DEADLINE_EXCEEDED)
        })
        .await
    }

    async fn bounded_health(&self, domain: &DomainTarget) -> HealthReport {
        let checker = HealthChecker::new(Arc::clone(&self.resolver), self.config.panel.clone())
            .timeout(self.config.health_timeout);
        within(self.config.deadline, checker.check(domain), || {
            self.health_unavailable(DEADLINE_EXCEEDED)
        })
        .await
    }

    /// One failed probe per panel member
    fn health_unavailable(&self, reason: &str) -> HealthReport {
        HealthReport::from_probes(
            self.config
                .panel
                .iter()
                .map(|server| ServerProbe {
                    server: server.address,
                    name: server.name.clone(),
                    status: ProbeStatus::Failed,
                    response_time: None,
                    error: Some(reason.to_string()),
                })
                .collect(),
        )
    }

    async fn bounded_wildcard(&self, domain: &DomainTarget) -> WildcardAssessment {
        let detector = WildcardDetector::new(Arc::clone(&self.resolver));
        within(self.config.deadline, detector.detect(domain), || {
            WildcardAssessment::unavailable(DEADLINE_EXCEEDED)
        })
        .await
    }

    async fn bounded_response(&self, domain: &DomainTarget) -> ResponseAnalysis {
        let analyzer = ResponseAnalyzer::new(Arc::clone(&self.tool));
        within(self.config.deadline, analyzer.analyze(domain), || {
            ResponseAnalysis::unavailable(DEADLINE_EXCEEDED)
        })
        .await
    }
}

/// Await `fut`, or drop it and use `fallback` once `deadline` passes
async fn within<T>(
    deadline: Option<Duration>,
    fut: impl Future<Output = T>,
    fallback: impl FnOnce() -> T,
) -> T {
    match deadline {
        Some(limit) => tokio::time::timeout(limit, fut).await.unwrap_or_else(|_| {
            warn!(
                deadline_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                "component missed deadline"
            );
            fallback()
        }),
        None => fut.await,
    }
}

/// Every record type failed with the same reason
fn records_unavailable(reason: &str) -> BTreeMap<RecordType, RecordSet> {
    RecordType::ALL
        .iter()
        .map(|t| (*t, RecordSet::failed(*t, reason)))
        .collect()
}

/// Await `fut`; if it panics, log it and use `fallback` with the panic message
async fn guarded<T>(
    component: &str,
    fut: impl Future<Output = T>,
    fallback: impl FnOnce(&str) -> T,
) -> T {
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(value) => value,
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            let error = DnsScopeError::Internal(format!("{component} panicked: {message}"));
            warn!(component, error = %error, "component panicked");
            fallback(&error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockDoh, MockResolver, MockTool, ServerBehavior};
    use dnsscope_core::{ApiResponse, ResolverPanel};
    use std::net::{IpAddr, Ipv4Addr};

    fn analyzer(resolver: MockResolver, tool: MockTool, config: EngineConfig) -> Analyzer {
        Analyzer::with_components(
            Arc::new(resolver),
            Arc::new(tool),
            Arc::new(MockDoh { reachable: false }),
            config,
        )
    }

    fn panel_ips() -> Vec<IpAddr> {
        ResolverPanel::default().iter().map(|r| r.address).collect()
    }

    #[tokio::test]
    async fn invalid_domain_never_touches_the_network() {
        let resolver = MockResolver {
            panic: true,
            ..MockResolver::default()
        };
        let analyzer = analyzer(resolver, MockTool::default(), EngineConfig::default());

        let err = analyzer.try_analyze("not a domain!").await.unwrap_err();
        assert!(err.is_input_error());

        let report = analyzer.analyze("not a domain!").await;
        assert!(report.is_failure());
        assert!(report.records.is_empty());

        let envelope = serde_json::to_value(ApiResponse::from_report(report)).unwrap();
        assert_eq!(envelope["success"], false);
        assert!(envelope.get("data").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn completes_when_tools_and_half_the_resolvers_fail() {
        let ips = panel_ips();
        let resolver = MockResolver::default()
            .with_ipv4("example.com", &[Ipv4Addr::new(93, 184, 216, 34)])
            .with_server(
                ips[0],
                ServerBehavior::Answer(vec![Ipv4Addr::new(93, 184, 216, 34)], Duration::from_millis(30)),
            )
            .with_server(
                ips[1],
                ServerBehavior::Answer(vec![Ipv4Addr::new(93, 184, 216, 34)], Duration::from_millis(90)),
            )
            .with_server(ips[2], ServerBehavior::Fail)
            .with_server(ips[3], ServerBehavior::Hang);

        let analyzer = analyzer(resolver, MockTool::default(), EngineConfig::default());
        let report = tokio::time::timeout(Duration::from_secs(60), analyzer.analyze("example.com"))
            .await
            .expect("analysis must finish in bounded time");

        assert!(!report.is_failure());
        assert_eq!(report.domain, "example.com");
        assert_eq!(report.records.len(), 8);
        assert_eq!(report.resolved_types(), vec![RecordType::A]);

        assert_eq!(report.health.availability.successful_count, 2);
        assert!(report.health.performance.is_some());

        assert!(report.security.dnssec.error.is_some());
        assert!(report.security.caa.error.is_some());
        assert!(report.security.vulnerabilities.is_empty());
        assert!(!report.analysis.wildcard_detection.detected);
        assert!(report.analysis.response_analysis.error.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_replaces_stalled_components_with_markers() {
        let resolver = MockResolver {
            hang: true,
            ..MockResolver::default()
        }
        .with_server(panel_ips()[0], ServerBehavior::Hang);
        let tool = MockTool {
            hang: true,
            ..MockTool::default()
        };
        let config = EngineConfig::default().deadline(Duration::from_secs(2));

        let report = analyzer(resolver, tool, config).analyze("example.com").await;

        assert!(!report.is_failure());
        assert_eq!(report.records.len(), 8);
        assert!(report
            .records
            .values()
            .all(|set| set.error.as_deref() == Some(DEADLINE_EXCEEDED)));
        assert_eq!(report.security.dnssec.error.as_deref(), Some(DEADLINE_EXCEEDED));
        assert_eq!(report.health.availability.total_servers, 4);
        assert_eq!(report.health.availability.successful_count, 0);
        assert!(report.health.performance.is_none());
        assert_eq!(
            report.analysis.wildcard_detection.error.as_deref(),
            Some(DEADLINE_EXCEEDED)
        );
        assert_eq!(
            report.analysis.response_analysis.error.as_deref(),
            Some(DEADLINE_EXCEEDED)
        );
    }

    #[tokio::test]
    async fn panicking_component_keeps_the_others() {
        let ip = Ipv4Addr::new(93, 184, 216, 34);
        let resolver = MockResolver {
            panic_prefix: Some("nonexistent-".into()),
            ..MockResolver::default()
        }
        .with_ipv4("example.com", &[ip]);
        let analyzer = Analyzer::with_components(
            Arc::new(resolver),
            Arc::new(MockTool::default()),
            Arc::new(MockDoh { reachable: true }),
            EngineConfig::default(),
        );

        let report = analyzer.analyze("example.com").await;

        assert!(!report.is_failure());
        assert_eq!(report.resolved_types(), vec![RecordType::A]);
        assert!(report.security.doh.supported);
        assert_eq!(report.health.availability.total_servers, 4);

        let wildcard = &report.analysis.wildcard_detection;
        assert!(!wildcard.detected);
        let error = wildcard.error.as_deref().unwrap();
        assert!(
            error.starts_with("internal error: wildcard detection panicked: resolver bug"),
            "{error}"
        );
    }

    #[tokio::test]
    async fn timestamp_marks_the_start_of_the_run() {
        let resolver = MockResolver::default().with_server(
            panel_ips()[0],
            ServerBehavior::Answer(vec![Ipv4Addr::new(192, 0, 2, 1)], Duration::from_millis(300)),
        );

        let before = Utc::now();
        let report = analyzer(resolver, MockTool::default(), EngineConfig::default())
            .analyze("example.com")
            .await;
        let after = Utc::now();

        assert!(after - before >= chrono::Duration::milliseconds(300));
        assert!(report.timestamp >= before);
        assert!(report.timestamp - before < chrono::Duration::milliseconds(150));
    }

    #[tokio::test]
    async fn every_record_type_carries_the_panic() {
        let resolver = MockResolver {
            panic: true,
            ..MockResolver::default()
        };
        let report = analyzer(resolver, MockTool::default(), EngineConfig::default())
            .analyze("example.com")
            .await;

        assert!(!report.is_failure());
        assert_eq!(report.records.len(), 8);
        assert!(report.records.values().all(|set| set
            .error
            .as_deref()
            .is_some_and(|e| e.contains("record collection panicked"))));
        assert!(report.analysis.response_analysis.error.is_some());
    }

    #[tokio::test]
    async fn component_entry_points_validate_input() {
        let analyzer = analyzer(MockResolver::default(), MockTool::default(), EngineConfig::default());

        assert!(analyzer.records("-bad-.com").await.unwrap_err().is_input_error());
        assert!(analyzer.wildcard("").await.is_err());

        let records = analyzer.records("Example.COM.").await.unwrap();
        assert_eq!(records.len(), 8);
        assert!(records.values().all(|set| !set.has_records()));
    }
}
