//! Service configuration.
//!
//! Service settings come from an optional TOML file. Unknown keys are
//! accepted but logged, since they are usually typos.
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level service configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the HTTP server listens on.
    pub bind_address: SocketAddr,

    /// Outbound feed retrieval settings (`[fetch]` table).
    pub fetch: FetchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 8080)),
            fetch: FetchConfig::default(),
        }
    }
}

/// Settings for the feed fetcher.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Upper bound for one retrieval, connection and body included.
    pub timeout_secs: u64,

    /// Largest accepted response body, in bytes.
    pub max_feed_size: usize,

    pub user_agent: String,

    /// Permit feed URLs on localhost and private networks.
    /// Off by default: the URL comes from the request body.
    pub allow_private_hosts: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_feed_size: 10 * 1024 * 1024, // 10MB
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            allow_private_hosts: false,
        }
    }
}

impl Config {
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 2] = ["bind_address", "fetch"];
    const KNOWN_FETCH_KEYS: [&'static str; 4] = [
        "timeout_secs",
        "max_feed_size",
        "user_agent",
        "allow_private_hosts",
    ];

    /// Reads `path`. A missing or blank file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let size = match std::fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        if size > Self::MAX_FILE_SIZE {
            return Err(ConfigError::TooLarge(format!(
                "{} is {size} bytes (limit {})",
                path.display(),
                Self::MAX_FILE_SIZE
            )));
        }

        Self::from_toml(&std::fs::read_to_string(path)?)
    }

    /// Parse configuration from TOML text. Blank input yields defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!("Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            warn_unknown_keys(&raw, &Self::KNOWN_KEYS, "");
            if let Some(toml::Value::Table(fetch)) = raw.get("fetch") {
                warn_unknown_keys(fetch, &Self::KNOWN_FETCH_KEYS, "fetch.");
            }
        }

        let config: Config = toml::from_str(content)?;
        tracing::info!(
            bind_address = %config.bind_address,
            timeout_secs = config.fetch.timeout_secs,
            "Loaded configuration"
        );
        Ok(config)
    }
}

fn warn_unknown_keys(table: &toml::Table, known: &[&str], prefix: &str) {
    for key in table.keys() {
        if !known.contains(&key.as_str()) {
            tracing::warn!(key = %format!("{prefix}{key}"), "Unknown key in config file, ignoring");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.bind_address.to_string(), "127.0.0.1:8080");
        assert_eq!(config.fetch.timeout_secs, 30);
        assert_eq!(config.fetch.max_feed_size, 10 * 1024 * 1024);
        assert!(config.fetch.user_agent.starts_with("feed-reader/"));
        assert!(!config.fetch.allow_private_hosts);
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/feed_reader_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.fetch.timeout_secs, 30);
    }

    #[test]
    fn test_whitespace_only_returns_default() {
        let config = Config::from_toml("   \n  \n  ").unwrap();
        assert_eq!(config.bind_address, Config::default().bind_address);
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let config = Config::from_toml("[fetch]\ntimeout_secs = 5\n").unwrap();
        assert_eq!(config.fetch.timeout_secs, 5);
        assert_eq!(config.fetch.max_feed_size, 10 * 1024 * 1024); // default
        assert_eq!(config.bind_address.to_string(), "127.0.0.1:8080"); // default
    }

    #[test]
    fn test_full_config() {
        let content = r#"
bind_address = "0.0.0.0:9000"

[fetch]
timeout_secs = 10
max_feed_size = 2048
user_agent = "custom/1.0"
allow_private_hosts = true
"#;
        let config = Config::from_toml(content).unwrap();
        assert_eq!(config.bind_address.to_string(), "0.0.0.0:9000");
        assert_eq!(config.fetch.timeout_secs, 10);
        assert_eq!(config.fetch.max_feed_size, 2048);
        assert_eq!(config.fetch.user_agent, "custom/1.0");
        assert!(config.fetch.allow_private_hosts);
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join("feed_reader_config_test_load");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "bind_address = \"127.0.0.1:3000\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.bind_address.port(), 3000);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let err = Config::from_toml("this is not [valid toml").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let content = r#"
totally_fake_key = "should not fail"

[fetch]
timeout_secs = 3
retries = 5
"#;
        let config = Config::from_toml(content).unwrap();
        assert_eq!(config.fetch.timeout_secs, 3);
    }

    #[test]
    fn test_wrong_type_returns_error() {
        assert!(Config::from_toml("bind_address = 42\n").is_err());
        assert!(Config::from_toml("[fetch]\ntimeout_secs = \"soon\"\n").is_err());
    }

    #[test]
    fn test_too_large_file_rejected() {
        let dir = std::env::temp_dir().join("feed_reader_config_test_too_large");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "a".repeat(1_048_577)).unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
