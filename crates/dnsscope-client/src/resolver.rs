//! Resolver gateway: direct record resolution against the system resolver or
//! a specific public resolver.

use async_trait::async_trait;
use dnsscope_core::{DnsScopeError, MxRecord, Result, SoaRecord, SrvRecord};
use hickory_resolver::config::{NameServerConfig, ResolverConfig, ResolverOpts};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::rr::{Name, RData, RecordType};
use hickory_resolver::proto::xfer::Protocol;
use hickory_resolver::{ResolveError, TokioResolver};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tracing::debug;

/// Default per-query timeout of the gateway's resolvers
const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Record resolution capability.
///
/// Every method is independently fallible; an `Err` means "no records" to
/// the callers, never a reason to abort sibling lookups.
#[async_trait]
pub trait RecordResolver: Send + Sync {
    /// IPv4 addresses of `name`
    async fn ipv4(&self, name: &str) -> Result<Vec<Ipv4Addr>>;

    /// IPv6 addresses of `name`
    async fn ipv6(&self, name: &str) -> Result<Vec<Ipv6Addr>>;

    /// Canonical name targets of `name`
    async fn cname(&self, name: &str) -> Result<Vec<String>>;

    /// Mail exchangers of `name`
    async fn mx(&self, name: &str) -> Result<Vec<MxRecord>>;

    /// TXT records of `name`, each as its list of character-strings
    async fn txt(&self, name: &str) -> Result<Vec<Vec<String>>>;

    /// Name servers of `name`
    async fn ns(&self, name: &str) -> Result<Vec<String>>;

    /// Start of authority of `name`
    async fn soa(&self, name: &str) -> Result<Vec<SoaRecord>>;

    /// Service records published at the owner name `name`
    async fn srv(&self, name: &str) -> Result<Vec<SrvRecord>>;

    /// PTR names of `ip`
    async fn reverse(&self, ip: IpAddr) -> Result<Vec<String>>;

    /// IPv4 addresses of `name` as answered by one specific resolver
    async fn ipv4_via(&self, server: IpAddr, name: &str) -> Result<Vec<Ipv4Addr>>;
}

/// [`RecordResolver`] backed by hickory.
///
/// Direct lookups go through the system-configured resolver. `ipv4_via`
/// builds a one-shot resolver pointed at the requested server over UDP.
pub struct HickoryGateway {
    system: TokioResolver,
    query_timeout: Duration,
}

impl HickoryGateway {
    /// Create a gateway on top of the system resolver configuration
    pub fn system() -> Result<Self> {
        let system = TokioResolver::builder_tokio()
            .map_err(|e| DnsScopeError::Config(format!("failed to create resolver: {e}")))?
            .build();
        Ok(Self {
            system,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        })
    }

    /// Create a gateway from an explicit configuration
    #[must_use]
    pub fn with_config(config: ResolverConfig, opts: ResolverOpts) -> Self {
        let query_timeout = opts.timeout;
        let system = TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
            .with_options(opts)
            .build();
        Self {
            system,
            query_timeout,
        }
    }

    /// Set the per-query timeout used by `ipv4_via` resolvers
    #[must_use]
    pub fn query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    fn resolver_for(&self, server: IpAddr) -> TokioResolver {
        let mut config = ResolverConfig::new();
        config.add_name_server(NameServerConfig::new(
            SocketAddr::new(server, 53),
            Protocol::Udp,
        ));

        let mut opts = ResolverOpts::default();
        opts.timeout = self.query_timeout;
        opts.attempts = 1;
        opts.cache_size = 0;

        TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
            .with_options(opts)
            .build()
    }
}

fn resolve_err(name: &str, err: &ResolveError) -> DnsScopeError {
    debug!(name, error = %err, "lookup failed");
    DnsScopeError::Resolve(err.to_string())
}

/// Presentation form without the trailing root dot
fn host(name: &Name) -> String {
    let text = name.to_string();
    text.strip_suffix('.').map(str::to_string).unwrap_or(text)
}

#[async_trait]
impl RecordResolver for HickoryGateway {
    async fn ipv4(&self, name: &str) -> Result<Vec<Ipv4Addr>> {
        let lookup = self
            .system
            .ipv4_lookup(name)
            .await
            .map_err(|e| resolve_err(name, &e))?;
        Ok(lookup.iter().map(|a| a.0).collect())
    }

    async fn ipv6(&self, name: &str) -> Result<Vec<Ipv6Addr>> {
        let lookup = self
            .system
            .ipv6_lookup(name)
            .await
            .map_err(|e| resolve_err(name, &e))?;
        Ok(lookup.iter().map(|aaaa| aaaa.0).collect())
    }

    async fn cname(&self, name: &str) -> Result<Vec<String>> {
        let lookup = self
            .system
            .lookup(name, RecordType::CNAME)
            .await
            .map_err(|e| resolve_err(name, &e))?;
        Ok(lookup
            .iter()
            .filter_map(|rdata| match rdata {
                RData::CNAME(cname) => Some(host(&cname.0)),
                _ => None,
            })
            .collect())
    }

    async fn mx(&self, name: &str) -> Result<Vec<MxRecord>> {
        let lookup = self
            .system
            .mx_lookup(name)
            .await
            .map_err(|e| resolve_err(name, &e))?;
        Ok(lookup
            .iter()
            .map(|mx| MxRecord {
                priority: mx.preference(),
                exchange: host(mx.exchange()),
            })
            .collect())
    }

    async fn txt(&self, name: &str) -> Result<Vec<Vec<String>>> {
        let lookup = self
            .system
            .txt_lookup(name)
            .await
            .map_err(|e| resolve_err(name, &e))?;
        Ok(lookup
            .iter()
            .map(|txt| {
                txt.iter()
                    .map(|segment| String::from_utf8_lossy(segment).to_string())
                    .collect()
            })
            .collect())
    }

    async fn ns(&self, name: &str) -> Result<Vec<String>> {
        let lookup = self
            .system
            .ns_lookup(name)
            .await
            .map_err(|e| resolve_err(name, &e))?;
        Ok(lookup.iter().map(|ns| host(&ns.0)).collect())
    }

    async fn soa(&self, name: &str) -> Result<Vec<SoaRecord>> {
        let lookup = self
            .system
            .soa_lookup(name)
            .await
            .map_err(|e| resolve_err(name, &e))?;
        Ok(lookup
            .iter()
            .map(|soa| SoaRecord {
                nsname: host(soa.mname()),
                hostmaster: host(soa.rname()),
                serial: soa.serial(),
                refresh: soa.refresh(),
                retry: soa.retry(),
                expire: soa.expire(),
                minttl: soa.minimum(),
            })
            .collect())
    }

    async fn srv(&self, name: &str) -> Result<Vec<SrvRecord>> {
        let lookup = self
            .system
            .srv_lookup(name)
            .await
            .map_err(|e| resolve_err(name, &e))?;
        Ok(lookup
            .iter()
            .map(|srv| SrvRecord {
                service: name.to_string(),
                name: host(srv.target()),
                port: srv.port(),
                priority: srv.priority(),
                weight: srv.weight(),
            })
            .collect())
    }

    async fn reverse(&self, ip: IpAddr) -> Result<Vec<String>> {
        let lookup = self
            .system
            .reverse_lookup(ip)
            .await
            .map_err(|e| resolve_err(&ip.to_string(), &e))?;
        Ok(lookup.iter().map(|ptr| host(&ptr.0)).collect())
    }

    async fn ipv4_via(&self, server: IpAddr, name: &str) -> Result<Vec<Ipv4Addr>> {
        let resolver = self.resolver_for(server);
        let lookup = resolver
            .ipv4_lookup(name)
            .await
            .map_err(|e| resolve_err(name, &e))?;
        Ok(lookup.iter().map(|a| a.0).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn host_strips_root_dot() {
        let name = Name::from_str("mail.example.com.").unwrap();
        assert_eq!(host(&name), "mail.example.com");

        let relative = Name::from_str("mail").unwrap();
        assert_eq!(host(&relative), "mail");
    }

    #[tokio::test]
    async fn with_config_keeps_query_timeout() {
        let mut opts = ResolverOpts::default();
        opts.timeout = Duration::from_secs(2);
        let gateway = HickoryGateway::with_config(ResolverConfig::cloudflare(), opts);
        assert_eq!(gateway.query_timeout, Duration::from_secs(2));

        let gateway = gateway.query_timeout(Duration::from_millis(750));
        assert_eq!(gateway.query_timeout, Duration::from_millis(750));
    }
}
