//! Configuration for the CyberGlove driver
//!
//! Loads configuration from a TOML file. Every field has a default, so a
//! file only needs the values that differ (usually just the host address).

use crate::error::Result;
use crate::protocol::constants::{
    ACCEPT_POLL_INTERVAL_MS, DEFAULT_MAX_RESYNC_ATTEMPTS, DEFAULT_PORT,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GloveConfig {
    pub link: LinkConfig,
    pub sampling: SamplingConfig,
    pub logging: LoggingConfig,
}

/// Connection configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Static IPv4 address of this host, as written to the glove's flash card
    pub local_address: String,

    /// TCP port the glove connects to
    pub port: u16,

    /// How often the accept loop checks for cancellation
    pub accept_poll_interval_ms: u64,

    /// Retransmissions allowed while recovering from corrupted dataset frames
    pub max_resync_attempts: u32,
}

/// Continuous sampling configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Recording file for `record`
    pub output: String,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), overridden by RUST_LOG
    pub level: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            local_address: "192.168.1.2".to_string(),
            port: DEFAULT_PORT,
            accept_poll_interval_ms: ACCEPT_POLL_INTERVAL_MS,
            max_resync_attempts: DEFAULT_MAX_RESYNC_ATTEMPTS,
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            output: "output.txt".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LinkConfig {
    #[inline]
    pub fn accept_poll_interval(&self) -> Duration {
        Duration::from_millis(self.accept_poll_interval_ms.max(1))
    }
}

impl GloveConfig {
    /// Load configuration from TOML file
    ///
    /// # Example
    /// ```no_run
    /// use cyberglove::config::GloveConfig;
    ///
    /// let config = GloveConfig::from_file("cyberglove.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: GloveConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}
