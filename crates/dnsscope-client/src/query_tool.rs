//! External query tool adapter.
//!
//! Covers introspection the resolver API cannot express: DNSSEC flags, CAA,
//! AXFR attempts and trace output. The default implementation shells out to
//! `dig`; anything that produces the same text can stand in for it.

use async_trait::async_trait;
use dnsscope_core::{DnsScopeError, Result, DEFAULT_TOOL_TIMEOUT};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, warn};

/// Captured output of one successful tool run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

/// The query kinds the engine needs from the external tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// DNSSEC-aware query of the domain
    Dnssec,
    /// CAA record query
    Caa,
    /// Zone transfer attempt
    ZoneTransfer,
    /// Trace with additional records
    Trace,
}

impl QueryKind {
    /// `dig` arguments for this query kind
    #[must_use]
    pub fn dig_args(self, domain: &str) -> Vec<String> {
        let args: &[&str] = match self {
            Self::Dnssec => &["+dnssec", "+multiline"],
            Self::Caa => &["+noall", "+answer", "CAA"],
            Self::ZoneTransfer => &["AXFR"],
            Self::Trace => &["+trace", "+additional"],
        };
        args.iter()
            .map(|a| (*a).to_string())
            .chain(std::iter::once(domain.to_string()))
            .collect()
    }
}

/// Advanced query capability, one method per query kind.
///
/// Implementations must turn every failure into an `Err`; callers decide
/// what a failure means for their check.
#[async_trait]
pub trait AdvancedQuery: Send + Sync {
    /// Run one query kind against `domain`
    async fn query(&self, kind: QueryKind, domain: &str) -> Result<ToolOutput>;

    /// DNSSEC-aware query
    async fn dnssec(&self, domain: &str) -> Result<ToolOutput> {
        self.query(QueryKind::Dnssec, domain).await
    }

    /// CAA query
    async fn caa(&self, domain: &str) -> Result<ToolOutput> {
        self.query(QueryKind::Caa, domain).await
    }

    /// AXFR attempt
    async fn zone_transfer(&self, domain: &str) -> Result<ToolOutput> {
        self.query(QueryKind::ZoneTransfer, domain).await
    }

    /// Trace with additional records
    async fn trace(&self, domain: &str) -> Result<ToolOutput> {
        self.query(QueryKind::Trace, domain).await
    }
}

/// [`AdvancedQuery`] implemented by running `dig`
#[derive(Debug, Clone)]
pub struct DigTool {
    program: String,
    timeout: Duration,
}

impl Default for DigTool {
    fn default() -> Self {
        Self::new()
    }
}

impl DigTool {
    /// Use `dig` from `PATH` with the default timeout
    #[must_use]
    pub fn new() -> Self {
        Self {
            program: "dig".to_string(),
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    /// Use a specific executable
    #[must_use]
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Set the per-invocation timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run the program with `args`, killing it if the deadline passes
    pub async fn run(&self, args: &[String]) -> Result<ToolOutput> {
        let start = Instant::now();
        debug!(program = %self.program, ?args, "running query tool");

        let child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| DnsScopeError::ToolSpawn {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                warn!(program = %self.program, ?args, "query tool timed out");
                DnsScopeError::Timeout(self.timeout)
            })?
            .map_err(|e| DnsScopeError::ToolSpawn {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        debug!(
            program = %self.program,
            status = ?output.status.code(),
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "query tool finished"
        );

        if !output.status.success() {
            return Err(DnsScopeError::ToolExit {
                program: self.program.clone(),
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(ToolOutput { stdout, stderr })
    }
}

#[async_trait]
impl AdvancedQuery for DigTool {
    async fn query(&self, kind: QueryKind, domain: &str) -> Result<ToolOutput> {
        self.run(&kind.dig_args(domain)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn dig_arguments_end_with_domain() {
        assert_eq!(
            QueryKind::Caa.dig_args("example.com"),
            args(&["+noall", "+answer", "CAA", "example.com"])
        );
        assert_eq!(
            QueryKind::ZoneTransfer.dig_args("example.com"),
            args(&["AXFR", "example.com"])
        );
        assert_eq!(
            QueryKind::Trace.dig_args("example.com"),
            args(&["+trace", "+additional", "example.com"])
        );
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let tool = DigTool::new().program("dnsscope-no-such-binary");
        let err = tool.caa("example.com").await.unwrap_err();
        assert!(matches!(err, DnsScopeError::ToolSpawn { .. }), "{err}");
    }

    #[cfg(unix)]
    #[test]
    fn captures_stdout_of_successful_run() {
        let tool = DigTool::new().program("echo");
        let output = tokio_test::block_on(tool.run(&args(&["status:", "NOERROR"]))).unwrap();
        assert_eq!(output.stdout.trim(), "status: NOERROR");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_is_an_error() {
        let tool = DigTool::new().program("false");
        let err = tool.run(&[]).await.unwrap_err();
        assert!(matches!(err, DnsScopeError::ToolExit { code: Some(1), .. }), "{err}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn hanging_program_hits_deadline() {
        let tool = DigTool::new()
            .program("sleep")
            .timeout(Duration::from_millis(100));
        let err = tool.run(&args(&["5"])).await.unwrap_err();
        assert!(err.is_timeout(), "{err}");
    }
}
