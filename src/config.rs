//! Process-wide configuration
//!
//! A single JSON object loaded once at startup. Every key is required;
//! a missing or out-of-range key fails the load. Embedders that prefer
//! dependency injection construct [`Config`] directly instead (all fields
//! are public) and skip [`Config::install`].

use crate::core::buffer::BufferConfig;
use crate::core::error::{LoggerError, Result};
use serde::Deserialize;
use std::net::Ipv4Addr;
use std::path::Path;
use std::sync::OnceLock;

static GLOBAL: OnceLock<Config> = OnceLock::new();

/// How file-backed sinks flush after each batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "u8")]
pub enum FlushPolicy {
    /// Leave bytes in the user-space write buffer; the OS sees them when the
    /// buffer fills or the sink is dropped.
    #[default]
    OsBuffered,
    /// Flush the user-space buffer after every batch.
    Flush,
    /// Flush, then fsync the backing descriptor.
    FlushSync,
}

impl TryFrom<u8> for FlushPolicy {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(FlushPolicy::OsBuffered),
            1 => Ok(FlushPolicy::Flush),
            2 => Ok(FlushPolicy::FlushSync),
            other => Err(format!("flush_log must be 0, 1 or 2, got {}", other)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Initial capacity of each hand-off buffer, in bytes.
    pub buffer_size: usize,
    /// Capacity below which a growing buffer triples.
    pub threshold: usize,
    /// Additive growth step once capacity reaches the threshold.
    pub linear_growth: usize,
    /// Flush behavior of file-backed sinks.
    pub flush_log: FlushPolicy,
    /// Remote backup endpoint address.
    pub backup_addr: Ipv4Addr,
    /// Remote backup endpoint port.
    pub backup_port: u16,
    /// Worker count of the backup thread pool.
    pub thread_count: usize,
}

impl Config {
    /// Load and validate a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Parse and validate a configuration from a JSON string.
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(LoggerError::config("buffer_size", "must be non-zero"));
        }
        if self.linear_growth == 0 {
            return Err(LoggerError::config("linear_growth", "must be non-zero"));
        }
        if self.thread_count == 0 {
            return Err(LoggerError::config("thread_count", "must be at least 1"));
        }
        Ok(())
    }

    /// Install this configuration process-wide. The first install wins;
    /// later calls return the already-installed value.
    pub fn install(self) -> &'static Config {
        GLOBAL.get_or_init(|| self)
    }

    /// The installed process-wide configuration, if any.
    pub fn global() -> Option<&'static Config> {
        GLOBAL.get()
    }

    /// Buffer sizing knobs for the hand-off worker.
    pub fn buffer_config(&self) -> BufferConfig {
        BufferConfig {
            initial_capacity: self.buffer_size,
            growth_threshold: self.threshold,
            linear_growth: self.linear_growth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD: &str = r#"{
        "buffer_size": 65536,
        "threshold": 8388608,
        "linear_growth": 1048576,
        "flush_log": 1,
        "backup_addr": "127.0.0.1",
        "backup_port": 9099,
        "thread_count": 4
    }"#;

    #[test]
    fn test_load_complete_config() {
        let config = Config::from_json(GOOD).unwrap();
        assert_eq!(config.buffer_size, 65536);
        assert_eq!(config.threshold, 8 * 1024 * 1024);
        assert_eq!(config.flush_log, FlushPolicy::Flush);
        assert_eq!(config.backup_addr, Ipv4Addr::LOCALHOST);
        assert_eq!(config.backup_port, 9099);
        assert_eq!(config.thread_count, 4);
    }

    #[test]
    fn test_missing_key_is_an_error() {
        let err = Config::from_json(r#"{"buffer_size": 1024}"#).unwrap_err();
        assert!(matches!(err, LoggerError::Json(_)));
    }

    #[test]
    fn test_flush_policy_range() {
        assert_eq!(FlushPolicy::try_from(0).unwrap(), FlushPolicy::OsBuffered);
        assert_eq!(FlushPolicy::try_from(2).unwrap(), FlushPolicy::FlushSync);
        assert!(FlushPolicy::try_from(3).is_err());

        let bad = GOOD.replace("\"flush_log\": 1", "\"flush_log\": 7");
        assert!(Config::from_json(&bad).is_err());
    }

    #[test]
    fn test_zero_thread_count_rejected() {
        let bad = GOOD.replace("\"thread_count\": 4", "\"thread_count\": 0");
        let err = Config::from_json(&bad).unwrap_err();
        assert!(matches!(err, LoggerError::Config { .. }));
    }

    #[test]
    fn test_bad_address_rejected() {
        let bad = GOOD.replace("127.0.0.1", "localhost");
        assert!(matches!(
            Config::from_json(&bad).unwrap_err(),
            LoggerError::Json(_)
        ));
    }

    #[test]
    fn test_buffer_config_mapping() {
        let config = Config::from_json(GOOD).unwrap();
        let buffer = config.buffer_config();
        assert_eq!(buffer.initial_capacity, config.buffer_size);
        assert_eq!(buffer.growth_threshold, config.threshold);
        assert_eq!(buffer.linear_growth, config.linear_growth);
    }
}
