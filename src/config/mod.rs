//! Configuration module
//!
//! Settings arrive already parsed from the host crawler; YAML loading is
//! offered for standalone use and tests.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tokio::fs;

/// Default maximum number of cached hostnames
pub const DEFAULT_CACHE_SIZE: usize = 10000;

/// Default resolution timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: f64 = 60.0;

/// DNS cache configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DnsCacheConfig {
    /// Enable the cache (a disabled cache behaves as size 0)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum number of cached hostnames
    pub size: usize,

    /// Resolution timeout in seconds, applied by the threaded resolver
    #[serde(rename = "timeout")]
    pub timeout_secs: f64,
}

impl DnsCacheConfig {
    /// Load configuration from file (synchronous)
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from file (async)
    pub async fn load_async<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        Self::from_str(&content)
    }

    /// Load from string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: DnsCacheConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let valid = matches!(
            Duration::try_from_secs_f64(self.timeout_secs),
            Ok(timeout) if !timeout.is_zero()
        );
        if !valid {
            return Err(Error::config(format!(
                "timeout must be a positive number of seconds, got {}",
                self.timeout_secs
            )));
        }
        Ok(())
    }

    /// Effective cache size: 0 when the cache is disabled
    pub fn cache_size(&self) -> usize {
        if self.enabled {
            self.size
        } else {
            0
        }
    }

    /// Resolution timeout; values `validate` rejects fall back to the default
    pub fn timeout(&self) -> Duration {
        match Duration::try_from_secs_f64(self.timeout_secs) {
            Ok(timeout) if !timeout.is_zero() => timeout,
            _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS as u64),
        }
    }
}

impl Default for DnsCacheConfig {
    fn default() -> Self {
        DnsCacheConfig {
            enabled: true,
            size: DEFAULT_CACHE_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = DnsCacheConfig::default();
        assert!(config.enabled);
        assert_eq!(config.cache_size(), 10000);
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
enabled: true
size: 512
timeout: 2.5
"#;
        let config = DnsCacheConfig::from_str(yaml).unwrap();
        assert_eq!(config.cache_size(), 512);
        assert_eq!(config.timeout(), Duration::from_millis(2500));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = DnsCacheConfig::from_str("size: 3\n").unwrap();
        assert!(config.enabled);
        assert_eq!(config.size, 3);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_disabled_means_zero_size() {
        let config = DnsCacheConfig::from_str("enabled: false\nsize: 100\n").unwrap();
        assert_eq!(config.cache_size(), 0);
    }

    #[test]
    fn test_invalid_timeout() {
        assert!(matches!(
            DnsCacheConfig::from_str("timeout: 0\n"),
            Err(Error::Config(_))
        ));
        assert!(DnsCacheConfig::from_str("timeout: -1.0\n").is_err());
        assert!(matches!(
            DnsCacheConfig::from_str("timeout: 1e20\n"),
            Err(Error::Config(_))
        ));
        assert!(DnsCacheConfig::from_str("timeout: .inf\n").is_err());
    }

    #[test]
    fn test_timeout_falls_back_when_unvalidated() {
        let config = DnsCacheConfig {
            timeout_secs: 1e20,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_huge_size_accepted() {
        let config = DnsCacheConfig::from_str("size: 18446744073709551615\n").unwrap();
        assert_eq!(config.cache_size(), usize::MAX);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "size: 64\ntimeout: 1.5").unwrap();

        let config = DnsCacheConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.cache_size(), 64);
        assert_eq!(config.timeout(), Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_load_async_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "enabled: false\nsize: 64").unwrap();

        let config = DnsCacheConfig::load_async(file.path()).await.unwrap();
        assert_eq!(config.cache_size(), 0);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("dns.yaml");
        assert!(matches!(
            DnsCacheConfig::load(missing.to_str().unwrap()),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(matches!(
            DnsCacheConfig::from_str("size: [1, 2]\n"),
            Err(Error::Config(_))
        ));
    }
}
