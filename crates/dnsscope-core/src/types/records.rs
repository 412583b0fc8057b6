use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Record types collected for every domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address
    A,
    /// IPv6 address
    Aaaa,
    /// Canonical name
    Cname,
    /// Mail exchanger
    Mx,
    /// Free-form text
    Txt,
    /// Name server
    Ns,
    /// Start of authority
    Soa,
    /// Service locator
    Srv,
}

impl RecordType {
    /// Every supported record type, in report order
    pub const ALL: [Self; 8] = [
        Self::A,
        Self::Aaaa,
        Self::Cname,
        Self::Mx,
        Self::Txt,
        Self::Ns,
        Self::Soa,
        Self::Srv,
    ];

    /// Presentation name, e.g. "AAAA"
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Txt => "TXT",
            Self::Ns => "NS",
            Self::Soa => "SOA",
            Self::Srv => "SRV",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unsupported record type: {s}"))
    }
}

/// IPv4 address with its best-effort reverse name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ARecord {
    /// Resolved address
    pub ip: Ipv4Addr,
    /// PTR name, `null` when the reverse lookup failed
    pub reverse: Option<String>,
}

/// IPv6 address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AaaaRecord {
    /// Resolved address
    pub ip: Ipv6Addr,
}

/// A record whose data is a single domain name (CNAME, NS)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    /// Target name
    pub host: String,
}

/// Mail exchanger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MxRecord {
    /// Preference, lower is preferred
    pub priority: u16,
    /// Exchange host
    pub exchange: String,
}

/// TXT record with its character-strings joined
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxtRecord {
    /// Flattened text
    pub value: String,
}

/// Start of authority
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoaRecord {
    /// Primary name server
    pub nsname: String,
    /// Responsible mailbox
    pub hostmaster: String,
    /// Zone serial
    pub serial: u32,
    /// Refresh interval (seconds)
    pub refresh: i32,
    /// Retry interval (seconds)
    pub retry: i32,
    /// Expire interval (seconds)
    pub expire: i32,
    /// Negative caching TTL (seconds)
    pub minttl: u32,
}

/// Service locator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SrvRecord {
    /// Owner name that was queried, e.g. `_sip._tcp.example.com`
    pub service: String,
    /// Target host
    pub name: String,
    /// Target port
    pub port: u16,
    /// Priority, lower is preferred
    pub priority: u16,
    /// Relative weight among equal priorities
    pub weight: u16,
}

/// One typed record entry inside a [`RecordSet`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordEntry {
    /// A record
    A(ARecord),
    /// AAAA record
    Aaaa(AaaaRecord),
    /// MX record
    Mx(MxRecord),
    /// SOA record
    Soa(SoaRecord),
    /// SRV record
    Srv(SrvRecord),
    /// TXT record
    Txt(TxtRecord),
    /// CNAME or NS record
    Name(NameRecord),
}

/// TXT records bucketed by well-known markers.
///
/// Buckets are independent predicates: one record can sit in several of them.
/// A record matching no marker lands in `other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxtCategories {
    /// Records containing `v=spf1`
    pub spf: Vec<String>,
    /// Records containing `v=DMARC1`
    pub dmarc: Vec<String>,
    /// Records containing `v=DKIM1`
    pub dkim: Vec<String>,
    /// Site ownership verification tokens
    pub verification: Vec<String>,
    /// Everything else
    pub other: Vec<String>,
}

/// Result of resolving one record type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,

    /// Number of entries in `records`
    pub count: usize,

    /// Entries in resolver order
    pub records: Vec<RecordEntry>,

    /// Resolution failure; may coexist with an empty `records`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// TXT bucket analysis (TXT only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<TxtCategories>,
}

impl RecordSet {
    /// A successfully resolved set
    #[must_use]
    pub fn resolved(record_type: RecordType, records: Vec<RecordEntry>) -> Self {
        Self {
            record_type,
            count: records.len(),
            records,
            error: None,
            categories: None,
        }
    }

    /// A set whose resolution failed
    #[must_use]
    pub fn failed(record_type: RecordType, error: impl Into<String>) -> Self {
        Self {
            record_type,
            count: 0,
            records: Vec::new(),
            error: Some(error.into()),
            categories: None,
        }
    }

    /// Attach TXT categories
    #[must_use]
    pub fn with_categories(mut self, categories: TxtCategories) -> Self {
        self.categories = Some(categories);
        self
    }

    /// Returns true if at least one record was resolved
    #[must_use]
    pub fn has_records(&self) -> bool {
        !self.records.is_empty()
    }
}
