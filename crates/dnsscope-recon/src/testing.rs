//! In-memory collaborators for fault injection.

use async_trait::async_trait;
use dnsscope_client::{AdvancedQuery, DohProbe, QueryKind, RecordResolver, ToolOutput};
use dnsscope_core::{DnsScopeError, MxRecord, Result, SoaRecord, SrvRecord};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;

/// How a panel resolver behaves in `ipv4_via`
#[derive(Debug, Clone)]
pub enum ServerBehavior {
    /// Answer after a simulated delay
    Answer(Vec<Ipv4Addr>, Duration),
    /// Fail immediately
    Fail,
    /// Never answer
    Hang,
}

/// Resolver answering from fixed tables; anything missing is NXDOMAIN.
#[derive(Debug, Default)]
pub struct MockResolver {
    pub ipv4: HashMap<String, Vec<Ipv4Addr>>,
    pub ipv6: HashMap<String, Vec<Ipv6Addr>>,
    pub cname: HashMap<String, Vec<String>>,
    pub mx: HashMap<String, Vec<MxRecord>>,
    pub txt: HashMap<String, Vec<Vec<String>>>,
    pub ns: HashMap<String, Vec<String>>,
    pub soa: HashMap<String, Vec<SoaRecord>>,
    pub srv: HashMap<String, Vec<SrvRecord>>,
    pub reverse: HashMap<IpAddr, Vec<String>>,
    pub servers: HashMap<IpAddr, ServerBehavior>,
    /// `ipv4` answers for any name starting with one of these prefixes
    pub ipv4_prefixes: Vec<(String, Vec<Ipv4Addr>)>,
    /// Every direct lookup hangs forever
    pub hang: bool,
    /// Every direct lookup panics
    pub panic: bool,
    /// `ipv4` panics for names starting with this prefix
    pub panic_prefix: Option<String>,
}

impl MockResolver {
    pub fn with_ipv4(mut self, name: &str, addrs: &[Ipv4Addr]) -> Self {
        self.ipv4.insert(name.to_string(), addrs.to_vec());
        self
    }

    pub fn with_ipv4_prefix(mut self, prefix: &str, addrs: &[Ipv4Addr]) -> Self {
        self.ipv4_prefixes.push((prefix.to_string(), addrs.to_vec()));
        self
    }

    pub fn with_txt(mut self, name: &str, records: &[&[&str]]) -> Self {
        let records = records
            .iter()
            .map(|segments| segments.iter().map(|s| (*s).to_string()).collect())
            .collect();
        self.txt.insert(name.to_string(), records);
        self
    }

    pub fn with_reverse(mut self, ip: IpAddr, names: &[&str]) -> Self {
        self.reverse
            .insert(ip, names.iter().map(|s| (*s).to_string()).collect());
        self
    }

    pub fn with_server(mut self, server: IpAddr, behavior: ServerBehavior) -> Self {
        self.servers.insert(server, behavior);
        self
    }

    async fn answer<T: Clone + Send>(&self, table: &HashMap<String, Vec<T>>, name: &str) -> Result<Vec<T>> {
        assert!(!self.panic, "resolver bug while looking up {name}");
        if self.hang {
            std::future::pending::<()>().await;
        }
        table
            .get(name)
            .cloned()
            .ok_or_else(|| DnsScopeError::Resolve(format!("NXDOMAIN: {name}")))
    }
}

#[async_trait]
impl RecordResolver for MockResolver {
    async fn ipv4(&self, name: &str) -> Result<Vec<Ipv4Addr>> {
        if let Some(prefix) = &self.panic_prefix {
            assert!(!name.starts_with(prefix.as_str()), "resolver bug while looking up {name}");
        }
        if let Some((_, addrs)) = self.ipv4_prefixes.iter().find(|(p, _)| name.starts_with(p)) {
            return Ok(addrs.clone());
        }
        self.answer(&self.ipv4, name).await
    }

    async fn ipv6(&self, name: &str) -> Result<Vec<Ipv6Addr>> {
        self.answer(&self.ipv6, name).await
    }

    async fn cname(&self, name: &str) -> Result<Vec<String>> {
        self.answer(&self.cname, name).await
    }

    async fn mx(&self, name: &str) -> Result<Vec<MxRecord>> {
        self.answer(&self.mx, name).await
    }

    async fn txt(&self, name: &str) -> Result<Vec<Vec<String>>> {
        self.answer(&self.txt, name).await
    }

    async fn ns(&self, name: &str) -> Result<Vec<String>> {
        self.answer(&self.ns, name).await
    }

    async fn soa(&self, name: &str) -> Result<Vec<SoaRecord>> {
        self.answer(&self.soa, name).await
    }

    async fn srv(&self, name: &str) -> Result<Vec<SrvRecord>> {
        self.answer(&self.srv, name).await
    }

    async fn reverse(&self, ip: IpAddr) -> Result<Vec<String>> {
        self.reverse
            .get(&ip)
            .cloned()
            .ok_or_else(|| DnsScopeError::Resolve(format!("no PTR for {ip}")))
    }

    async fn ipv4_via(&self, server: IpAddr, _name: &str) -> Result<Vec<Ipv4Addr>> {
        match self.servers.get(&server) {
            Some(ServerBehavior::Answer(addrs, delay)) => {
                tokio::time::sleep(*delay).await;
                Ok(addrs.clone())
            }
            Some(ServerBehavior::Hang) => std::future::pending().await,
            Some(ServerBehavior::Fail) | None => {
                Err(DnsScopeError::Resolve(format!("SERVFAIL from {server}")))
            }
        }
    }
}

/// Query tool returning canned output per kind; missing kinds fail to spawn.
#[derive(Debug, Default)]
pub struct MockTool {
    pub outputs: HashMap<QueryKind, String>,
    /// Every query hangs forever
    pub hang: bool,
}

impl MockTool {
    pub fn with_output(mut self, kind: QueryKind, stdout: &str) -> Self {
        self.outputs.insert(kind, stdout.to_string());
        self
    }
}

#[async_trait]
impl AdvancedQuery for MockTool {
    async fn query(&self, kind: QueryKind, _domain: &str) -> Result<ToolOutput> {
        if self.hang {
            std::future::pending::<()>().await;
        }
        self.outputs
            .get(&kind)
            .map(|stdout| ToolOutput {
                stdout: stdout.clone(),
                stderr: String::new(),
            })
            .ok_or_else(|| DnsScopeError::ToolSpawn {
                program: "dig".to_string(),
                message: "No such file or directory (os error 2)".to_string(),
            })
    }
}

/// DoH probe with a fixed outcome
#[derive(Debug)]
pub struct MockDoh {
    pub reachable: bool,
}

#[async_trait]
impl DohProbe for MockDoh {
    fn provider(&self) -> &str {
        "MockDoH"
    }

    async fn probe(&self, _domain: &str) -> Result<()> {
        if self.reachable {
            Ok(())
        } else {
            Err(DnsScopeError::HttpStatus { code: 502 })
        }
    }
}
