//! Engine configuration types.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

/// Service prefixes probed for SRV records under the target domain
pub const SRV_SERVICE_PREFIXES: [&str; 3] = ["_sip._tcp", "_xmpp-server._tcp", "_xmpp-client._tcp"];

/// Literal prefixes of the synthetic labels used for wildcard probing
pub const WILDCARD_PROBE_PREFIXES: [&str; 3] = ["random-", "test-", "nonexistent-"];

/// Default per-resolver deadline for the health checker
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Default deadline for one external query tool invocation
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(30);

/// Default deadline for the DNS-over-HTTPS probe
pub const DEFAULT_DOH_TIMEOUT: Duration = Duration::from_secs(10);

/// Default DNS-over-HTTPS JSON endpoint
pub const DEFAULT_DOH_ENDPOINT: &str = "https://cloudflare-dns.com/dns-query";

/// Provider name reported for the default DoH endpoint
pub const DEFAULT_DOH_PROVIDER: &str = "Cloudflare";

/// What kind of public resolver a panel member is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverCategory {
    /// Plain recursive resolver without filtering
    Unfiltered,
    /// Privacy- or security-oriented resolver
    Privacy,
}

/// A public recursive resolver used for health and consistency probes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicResolver {
    /// Operator name, e.g. "Google"
    pub name: String,
    /// Resolver address (queried on port 53)
    pub address: IpAddr,
    /// Resolver category
    pub category: ResolverCategory,
}

impl PublicResolver {
    /// Create a panel member
    #[must_use]
    pub fn new(name: impl Into<String>, address: IpAddr, category: ResolverCategory) -> Self {
        Self {
            name: name.into(),
            address,
            category,
        }
    }
}

/// Immutable list of public resolvers shared by the health checker and the
/// cross-resolver consistency check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolverPanel(Vec<PublicResolver>);

impl ResolverPanel {
    /// Build a panel from an explicit list
    #[must_use]
    pub fn new(resolvers: Vec<PublicResolver>) -> Self {
        Self(resolvers)
    }

    /// Panel members in configured order
    #[must_use]
    pub fn resolvers(&self) -> &[PublicResolver] {
        &self.0
    }

    /// Number of members
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the panel has no members
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over panel members
    pub fn iter(&self) -> std::slice::Iter<'_, PublicResolver> {
        self.0.iter()
    }
}

impl Default for ResolverPanel {
    fn default() -> Self {
        Self(vec![
            PublicResolver::new(
                "Google",
                IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)),
                ResolverCategory::Unfiltered,
            ),
            PublicResolver::new(
                "Cloudflare",
                IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1)),
                ResolverCategory::Unfiltered,
            ),
            PublicResolver::new(
                "Quad9",
                IpAddr::V4(Ipv4Addr::new(9, 9, 9, 9)),
                ResolverCategory::Privacy,
            ),
            PublicResolver::new(
                "OpenDNS",
                IpAddr::V4(Ipv4Addr::new(208, 67, 222, 222)),
                ResolverCategory::Privacy,
            ),
        ])
    }
}

impl<'a> IntoIterator for &'a ResolverPanel {
    type Item = &'a PublicResolver;
    type IntoIter = std::slice::Iter<'a, PublicResolver>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Public resolvers for health and consistency probes
    pub panel: ResolverPanel,

    /// Per-resolver deadline used by the health checker
    pub health_timeout: Duration,

    /// External query tool executable
    pub tool_program: String,

    /// Deadline for one external query tool invocation
    pub tool_timeout: Duration,

    /// DNS-over-HTTPS JSON endpoint
    pub doh_endpoint: String,

    /// Provider name reported for the DoH endpoint
    pub doh_provider: String,

    /// Deadline for the DoH request
    pub doh_timeout: Duration,

    /// Optional overall deadline applied to every component of a run
    pub deadline: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    /// Create a configuration with default settings
    #[must_use]
    pub fn new() -> Self {
        Self {
            panel: ResolverPanel::default(),
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
            tool_program: "dig".to_string(),
            tool_timeout: DEFAULT_TOOL_TIMEOUT,
            doh_endpoint: DEFAULT_DOH_ENDPOINT.to_string(),
            doh_provider: DEFAULT_DOH_PROVIDER.to_string(),
            doh_timeout: DEFAULT_DOH_TIMEOUT,
            deadline: None,
        }
    }

    /// Replace the resolver panel
    #[must_use]
    pub fn panel(mut self, panel: ResolverPanel) -> Self {
        self.panel = panel;
        self
    }

    /// Set the per-resolver health check deadline
    #[must_use]
    pub const fn health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    /// Set the external query tool executable
    #[must_use]
    pub fn tool_program(mut self, program: impl Into<String>) -> Self {
        self.tool_program = program.into();
        self
    }

    /// Set the external query tool deadline
    #[must_use]
    pub const fn tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    /// Set the DoH endpoint and the provider name reported for it
    #[must_use]
    pub fn doh_endpoint(mut self, endpoint: impl Into<String>, provider: impl Into<String>) -> Self {
        self.doh_endpoint = endpoint.into();
        self.doh_provider = provider.into();
        self
    }

    /// Set the DoH request deadline
    #[must_use]
    pub const fn doh_timeout(mut self, timeout: Duration) -> Self {
        self.doh_timeout = timeout;
        self
    }

    /// Bound every component of a run by an overall deadline
    #[must_use]
    pub const fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}
