//! Configuration management.

use anyhow::Result;
use directories::ProjectDirs;
use dnsscope::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::output::OutputFormat;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "DNSSCOPE_CONFIG";

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Default output format.
    pub output_format: Option<OutputFormat>,

    /// Path to the `dig` executable.
    pub dig_path: Option<String>,

    /// Overall analysis deadline in seconds.
    pub deadline_secs: Option<u64>,

    /// Per-resolver health check deadline in seconds.
    pub health_timeout_secs: Option<u64>,

    /// DNS-over-HTTPS JSON endpoint.
    pub doh_endpoint: Option<String>,

    /// Provider name reported for the DoH endpoint.
    pub doh_provider: Option<String>,

    /// Show helpful tips after commands.
    #[serde(default = "default_true")]
    pub show_tips: bool,

    /// Always show explanations (as if --explain was passed).
    #[serde(default)]
    pub explain_by_default: bool,
}

const fn default_true() -> bool {
    true
}

impl Config {
    /// Get the config file path.
    pub fn path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }

        let dirs = ProjectDirs::from("dev", "dnsscope", "dnsscope")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from file.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;

        if !path.exists() {
            return Ok(Self {
                show_tips: true,
                ..Self::default()
            });
        }

        debug!(path = %path.display(), "loading configuration");
        let content = std::fs::read_to_string(&path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config file {}: {e}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Engine configuration from this file, with command-line overrides applied.
    pub fn engine(&self, dig: Option<&str>, deadline_secs: Option<u64>) -> EngineConfig {
        let mut engine = EngineConfig::default();

        if let Some(program) = dig.or(self.dig_path.as_deref()) {
            engine = engine.tool_program(program);
        }
        if let Some(secs) = deadline_secs.or(self.deadline_secs) {
            engine = engine.deadline(Duration::from_secs(secs));
        }
        if let Some(secs) = self.health_timeout_secs {
            engine = engine.health_timeout(Duration::from_secs(secs));
        }
        if let Some(endpoint) = &self.doh_endpoint {
            let provider = self
                .doh_provider
                .clone()
                .unwrap_or_else(|| endpoint.clone());
            engine = engine.doh_endpoint(endpoint.clone(), provider);
        }

        engine
    }
}
