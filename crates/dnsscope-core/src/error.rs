use std::time::Duration;
use thiserror::Error;

/// Result type alias for dnsscope operations
pub type Result<T> = std::result::Result<T, DnsScopeError>;

/// Errors that can occur while analyzing a domain
///
/// Only [`DnsScopeError::InvalidDomain`] ever reaches the caller of the
/// analysis facade. Every other variant is raised by a single probe and is
/// folded into the `error` field of that probe's sub-result.
#[derive(Error, Debug)]
pub enum DnsScopeError {
    /// The input is not a syntactically valid domain name
    #[error("invalid domain: {0}")]
    InvalidDomain(String),

    /// DNS resolution failed (NXDOMAIN, SERVFAIL, no records, ...)
    #[error("DNS resolution failed: {0}")]
    Resolve(String),

    /// A probe did not finish within its deadline
    #[error("timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The external query tool could not be started
    #[error("failed to run {program}: {message}")]
    ToolSpawn {
        /// Program that was invoked
        program: String,
        /// Underlying I/O error message
        message: String,
    },

    /// The external query tool ran but exited unsuccessfully
    #[error("{program} exited with {}: {stderr}", .code.map_or_else(|| "signal".to_string(), |c| format!("status {c}")))]
    ToolExit {
        /// Program that was invoked
        program: String,
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// HTTP endpoint answered with a non-success status
    #[error("HTTP endpoint returned status {code}")]
    HttpStatus {
        /// HTTP status code
        code: u16,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Generic internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl DnsScopeError {
    /// Returns true if the error is a deadline miss
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Returns true if the error was caused by caller input rather than the network
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidDomain(_))
    }
}
