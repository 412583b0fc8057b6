//! Resolver panel health benchmark.

use dnsscope_client::RecordResolver;
use dnsscope_core::{
    DnsScopeError, DomainTarget, HealthReport, ProbeStatus, PublicResolver, ResolverPanel,
    ServerProbe, DEFAULT_HEALTH_TIMEOUT,
};
use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, instrument};

/// Times one resolution of the domain through each panel resolver
#[derive(Clone)]
pub struct HealthChecker {
    resolver: Arc<dyn RecordResolver>,
    panel: ResolverPanel,
    timeout: Duration,
}

impl HealthChecker {
    /// Create a checker with the default 5 second per-resolver deadline
    #[must_use]
    pub fn new(resolver: Arc<dyn RecordResolver>, panel: ResolverPanel) -> Self {
        Self {
            resolver,
            panel,
            timeout: DEFAULT_HEALTH_TIMEOUT,
        }
    }

    /// Set the per-resolver deadline
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Probe the whole panel concurrently
    #[instrument(skip_all, fields(domain = %domain))]
    pub async fn check(&self, domain: &DomainTarget) -> HealthReport {
        let probes = join_all(self.panel.iter().map(|server| self.probe(server, domain))).await;
        let report = HealthReport::from_probes(probes);

        info!(
            successful = report.availability.successful_count,
            total = report.availability.total_servers,
            "health check finished"
        );
        report
    }

    async fn probe(&self, server: &PublicResolver, domain: &DomainTarget) -> ServerProbe {
        let start = Instant::now();
        let result = tokio::time::timeout(
            self.timeout,
            self.resolver.ipv4_via(server.address, domain.as_str()),
        )
        .await
        .unwrap_or(Err(DnsScopeError::Timeout(self.timeout)));

        match result {
            Ok(_) => {
                let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                debug!(server = %server.address, elapsed_ms, "resolver answered");
                ServerProbe {
                    server: server.address,
                    name: server.name.clone(),
                    status: ProbeStatus::Success,
                    response_time: Some(elapsed_ms),
                    error: None,
                }
            }
            Err(e) => {
                debug!(server = %server.address, error = %e, "resolver probe failed");
                ServerProbe {
                    server: server.address,
                    name: server.name.clone(),
                    status: ProbeStatus::Failed,
                    response_time: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
