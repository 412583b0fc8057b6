//! Record collection across the eight supported types.

use dnsscope_client::RecordResolver;
use dnsscope_core::{
    ARecord, AaaaRecord, DomainTarget, NameRecord, RecordEntry, RecordSet, RecordType,
    TxtCategories, TxtRecord, SRV_SERVICE_PREFIXES,
};
use futures_util::future::join_all;
use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Ownership verification token markers
const VERIFICATION_MARKERS: [&str; 3] = [
    "google-site-verification",
    "facebook-domain-verification",
    "MS=",
];

/// Resolves every record type of a domain concurrently
#[derive(Clone)]
pub struct RecordCollector {
    resolver: Arc<dyn RecordResolver>,
}

impl RecordCollector {
    /// Create a collector on top of a resolver
    #[must_use]
    pub fn new(resolver: Arc<dyn RecordResolver>) -> Self {
        Self { resolver }
    }

    /// Resolve all eight types; the map always holds every key.
    #[instrument(skip_all, fields(domain = %domain))]
    pub async fn collect(&self, domain: &DomainTarget) -> BTreeMap<RecordType, RecordSet> {
        let sets = join_all(
            RecordType::ALL
                .iter()
                .map(|record_type| self.collect_type(domain, *record_type)),
        )
        .await;

        sets.into_iter().map(|set| (set.record_type, set)).collect()
    }

    /// Resolve one record type
    pub async fn collect_type(&self, domain: &DomainTarget, record_type: RecordType) -> RecordSet {
        let name = domain.as_str();
        let result = match record_type {
            RecordType::A => match self.resolver.ipv4(name).await {
                Ok(addrs) => Ok(self.with_reverse_names(addrs).await),
                Err(e) => Err(e),
            },
            RecordType::Aaaa => self.resolver.ipv6(name).await.map(|addrs| {
                addrs
                    .into_iter()
                    .map(|ip| RecordEntry::Aaaa(AaaaRecord { ip }))
                    .collect()
            }),
            RecordType::Cname => self.resolver.cname(name).await.map(names),
            RecordType::Ns => self.resolver.ns(name).await.map(names),
            RecordType::Mx => self
                .resolver
                .mx(name)
                .await
                .map(|mx| mx.into_iter().map(RecordEntry::Mx).collect()),
            RecordType::Soa => self
                .resolver
                .soa(name)
                .await
                .map(|soa| soa.into_iter().map(RecordEntry::Soa).collect()),
            RecordType::Txt => {
                return match self.resolver.txt(name).await {
                    Ok(records) => {
                        let values: Vec<String> =
                            records.into_iter().map(|segments| segments.concat()).collect();
                        let categories = classify_txt(&values);
                        let entries = values
                            .into_iter()
                            .map(|value| RecordEntry::Txt(TxtRecord { value }))
                            .collect();
                        RecordSet::resolved(RecordType::Txt, entries).with_categories(categories)
                    }
                    Err(e) => {
                        debug!(error = %e, "TXT lookup failed");
                        RecordSet::failed(RecordType::Txt, e.to_string())
                    }
                };
            }
            RecordType::Srv => return self.collect_srv(domain).await,
        };

        match result {
            Ok(entries) => RecordSet::resolved(record_type, entries),
            Err(e) => {
                debug!(record_type = %record_type, error = %e, "lookup failed");
                RecordSet::failed(record_type, e.to_string())
            }
        }
    }

    /// Pair each address with its first PTR name, best effort
    async fn with_reverse_names(&self, addrs: Vec<Ipv4Addr>) -> Vec<RecordEntry> {
        let reverse = join_all(addrs.iter().map(|ip| async move {
            self.resolver
                .reverse(IpAddr::V4(*ip))
                .await
                .ok()
                .and_then(|names| names.into_iter().next())
        }))
        .await;

        addrs
            .into_iter()
            .zip(reverse)
            .map(|(ip, reverse)| RecordEntry::A(ARecord { ip, reverse }))
            .collect()
    }

    /// SRV lookups under the fixed service prefixes; failed prefixes are skipped
    async fn collect_srv(&self, domain: &DomainTarget) -> RecordSet {
        let lookups = join_all(SRV_SERVICE_PREFIXES.iter().map(|prefix| {
            let owner = domain.child(prefix);
            async move { (self.resolver.srv(&owner).await, owner) }
        }))
        .await;

        let mut entries = Vec::new();
        for (result, owner) in lookups {
            match result {
                Ok(records) => entries.extend(records.into_iter().map(RecordEntry::Srv)),
                Err(e) => debug!(owner, error = %e, "no SRV records"),
            }
        }
        RecordSet::resolved(RecordType::Srv, entries)
    }
}

fn names(values: Vec<String>) -> Vec<RecordEntry> {
    values
        .into_iter()
        .map(|host| RecordEntry::Name(NameRecord { host }))
        .collect()
}

/// Bucket TXT values by well-known markers.
///
/// The first four buckets are independent substring predicates; `other`
/// receives values that matched none of them.
#[must_use]
pub fn classify_txt(values: &[String]) -> TxtCategories {
    let mut categories = TxtCategories::default();
    for value in values {
        let mut matched = false;
        if value.contains("v=spf1") {
            categories.spf.push(value.clone());
            matched = true;
        }
        if value.contains("v=DMARC1") {
            categories.dmarc.push(value.clone());
            matched = true;
        }
        if value.contains("v=DKIM1") {
            categories.dkim.push(value.clone());
            matched = true;
        }
        if VERIFICATION_MARKERS.iter().any(|m| value.contains(m)) {
            categories.verification.push(value.clone());
            matched = true;
        }
        if !matched {
            categories.other.push(value.clone());
        }
    }
    categories
}
