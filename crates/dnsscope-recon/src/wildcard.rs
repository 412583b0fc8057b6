//! Wildcard DNS detection.

use dnsscope_client::RecordResolver;
use dnsscope_core::{DomainTarget, WildcardAssessment, WILDCARD_PROBE_PREFIXES};
use futures_util::future::join_all;
use rand::distr::Alphanumeric;
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Length of the random part of each synthetic label
const SUFFIX_LEN: usize = 12;

/// Resolves random subdomains that should not exist
#[derive(Clone)]
pub struct WildcardDetector {
    resolver: Arc<dyn RecordResolver>,
}

impl WildcardDetector {
    /// Create a detector on top of a resolver
    #[must_use]
    pub fn new(resolver: Arc<dyn RecordResolver>) -> Self {
        Self { resolver }
    }

    /// Probe three synthetic subdomains concurrently.
    ///
    /// `confidence` is `resolved / 3`: with three probes it can only be
    /// 0, 1/3, 2/3 or 1.
    #[instrument(skip_all, fields(domain = %domain))]
    pub async fn detect(&self, domain: &DomainTarget) -> WildcardAssessment {
        let names = synthetic_names(domain);

        let resolved = join_all(names.iter().map(|name| async move {
            match self.resolver.ipv4(name).await {
                Ok(addrs) => !addrs.is_empty(),
                Err(e) => {
                    debug!(name, error = %e, "synthetic subdomain did not resolve");
                    false
                }
            }
        }))
        .await
        .into_iter()
        .filter(|hit| *hit)
        .count();

        let assessment = WildcardAssessment::from_probes(names, resolved);
        info!(
            detected = assessment.detected,
            resolved = assessment.resolved_count,
            "wildcard detection finished"
        );
        assessment
    }
}

/// One name per probe prefix, each with a fresh lowercase random suffix
fn synthetic_names(domain: &DomainTarget) -> Vec<String> {
    let mut rng = rand::rng();
    WILDCARD_PROBE_PREFIXES
        .iter()
        .map(|prefix| {
            let suffix: String = (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(SUFFIX_LEN)
                .map(|b| char::from(b).to_ascii_lowercase())
                .collect();
            domain.child(&format!("{prefix}{suffix}"))
        })
        .collect()
}
