//! Validated domain input.

use crate::error::{DnsScopeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length of a domain name in presentation form (RFC 1035)
const MAX_NAME_LEN: usize = 253;

/// Maximum length of a single label
const MAX_LABEL_LEN: usize = 63;

/// A syntactically valid, normalized domain name.
///
/// Normalization trims whitespace, strips a single trailing root dot and
/// lowercases the name. Underscores are accepted so service owner names such
/// as `_sip._tcp.example.com` validate too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DomainTarget(String);

impl DomainTarget {
    /// Parse and validate a domain name
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let name = trimmed.strip_suffix('.').unwrap_or(trimmed).to_ascii_lowercase();

        if name.is_empty() {
            return Err(DnsScopeError::InvalidDomain("domain is empty".into()));
        }
        if name.len() > MAX_NAME_LEN {
            return Err(DnsScopeError::InvalidDomain(format!(
                "domain is {} characters long, maximum is {MAX_NAME_LEN}",
                name.len()
            )));
        }
        if !name.contains('.') {
            return Err(DnsScopeError::InvalidDomain(format!(
                "'{name}' is not a fully qualified domain name"
            )));
        }

        for label in name.split('.') {
            validate_label(label).map_err(|reason| {
                DnsScopeError::InvalidDomain(format!("'{name}': {reason}"))
            })?;
        }

        Ok(Self(name))
    }

    /// The normalized name
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build a child name, e.g. `_sip._tcp` under `example.com`
    #[must_use]
    pub fn child(&self, prefix: &str) -> String {
        format!("{prefix}.{}", self.0)
    }
}

fn validate_label(label: &str) -> std::result::Result<(), String> {
    if label.is_empty() {
        return Err("empty label".into());
    }
    if label.len() > MAX_LABEL_LEN {
        return Err(format!("label '{label}' exceeds {MAX_LABEL_LEN} characters"));
    }
    if label.starts_with('-') || label.ends_with('-') {
        return Err(format!("label '{label}' starts or ends with a hyphen"));
    }
    if let Some(bad) = label
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(format!("invalid character '{bad}' in label '{label}'"));
    }
    Ok(())
}

impl fmt::Display for DomainTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DomainTarget {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for DomainTarget {
    type Err = DnsScopeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DomainTarget {
    type Error = DnsScopeError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<DomainTarget> for String {
    fn from(target: DomainTarget) -> Self {
        target.0
    }
}
