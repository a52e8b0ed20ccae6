//! # Client Configuration
//!
//! Where the backend lives and the timing knobs of the client.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BOOKIT_API_URL=https://staging.bookit.app/api                      │
//! │     BOOKIT_ENV=production                                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/bookit/client.toml (Linux)                               │
//! │     ~/Library/Application Support/app.bookit.client/client.toml       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     development, localhost:3000, 30 s timeouts                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # client.toml
//! [api]
//! environment = "production"      # development | production
//! base_url = "https://api.bookit.app/api"   # optional override
//! timeout_secs = 30
//!
//! [cache]
//! favorites_staleness_secs = 30
//! unread_poll_secs = 30
//!
//! [storage]
//! db_path = "/data/bookit.db"     # optional
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ApiError, ApiResult};

/// Production backend.
pub const PRODUCTION_BASE_URL: &str = "https://api.bookit.app/api";

/// Development backend as seen from the Android emulator (host loopback).
pub const ANDROID_EMULATOR_BASE_URL: &str = "http://10.0.2.2:3000/api";

/// Development backend everywhere else.
pub const LOCAL_BASE_URL: &str = "http://localhost:3000/api";

// =============================================================================
// Environment & Platform
// =============================================================================

/// Which backend deployment to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ApiError::config(format!(
                "Unknown environment: '{other}'. Valid options: development, production"
            ))),
        }
    }
}

/// Host platform, only relevant for picking the development loopback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Android,
    Ios,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            Platform::Android
        } else if cfg!(target_os = "ios") {
            Platform::Ios
        } else {
            Platform::Other
        }
    }
}

/// Picks the backend base URL.
///
/// An explicit override always wins. Otherwise production uses the public
/// API and development uses the host loopback, which the Android emulator
/// reaches as `10.0.2.2`.
pub fn resolve_base_url(
    override_url: Option<&str>,
    environment: Environment,
    platform: Platform,
) -> String {
    if let Some(url) = override_url.map(str::trim).filter(|u| !u.is_empty()) {
        return url.to_string();
    }

    match (environment, platform) {
        (Environment::Production, _) => PRODUCTION_BASE_URL.to_string(),
        (Environment::Development, Platform::Android) => ANDROID_EMULATOR_BASE_URL.to_string(),
        (Environment::Development, _) => LOCAL_BASE_URL.to_string(),
    }
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default)]
    pub environment: Environment,

    /// Overrides the environment's default URL.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Whole-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            environment: Environment::default(),
            base_url: None,
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Age after which the favorites set is fetched again (seconds).
    #[serde(default = "default_staleness")]
    pub favorites_staleness_secs: u64,

    /// Interval between unread-count polls (seconds).
    #[serde(default = "default_unread_poll")]
    pub unread_poll_secs: u64,
}

fn default_staleness() -> u64 {
    bookit_core::FAVORITES_STALENESS_SECS
}

fn default_unread_poll() -> u64 {
    bookit_core::UNREAD_POLL_INTERVAL_SECS
}

impl Default for CacheSettings {
    fn default() -> Self {
        CacheSettings {
            favorites_staleness_secs: default_staleness(),
            unread_poll_secs: default_unread_poll(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Local database file. Defaults to the platform data directory.
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

// =============================================================================
// Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub storage: StorageSettings,
}

impl ApiConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (client.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ApiResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path).map_err(|e| {
                    ApiError::config(format!("Failed to read {}: {e}", path.display()))
                })?;
                config = toml::from_str(&contents)
                    .map_err(|e| ApiError::config(format!("Invalid config file: {e}")))?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load client config, using defaults");
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ApiResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ApiError::config("No config path available"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ApiError::config(format!("Failed to create config dir: {e}")))?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| ApiError::config(format!("Failed to encode config: {e}")))?;
        std::fs::write(&path, contents)
            .map_err(|e| ApiError::config(format!("Failed to write config: {e}")))?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ApiResult<()> {
        let url = self.base_url()?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApiError::config(format!(
                "Base URL must start with http:// or https://, got: {url}"
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ApiError::config("timeout_secs must be greater than 0"));
        }

        if self.cache.unread_poll_secs == 0 {
            return Err(ApiError::config("unread_poll_secs must be greater than 0"));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `BOOKIT_*` overrides from any lookup; unparsable numbers are
    /// ignored with a warning.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("BOOKIT_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = Some(url);
        }

        if let Some(env) = lookup("BOOKIT_ENV") {
            match env.parse() {
                Ok(parsed) => self.api.environment = parsed,
                Err(_) => warn!(value = %env, "Unknown BOOKIT_ENV"),
            }
        }

        let number = |key: &str| -> Option<u64> {
            let raw = lookup(key)?;
            match raw.trim().parse() {
                Ok(n) => Some(n),
                Err(_) => {
                    warn!(key = %key, value = %raw, "Ignoring non-numeric override");
                    None
                }
            }
        };

        if let Some(secs) = number("BOOKIT_API_TIMEOUT_SECS") {
            self.api.timeout_secs = secs;
        }
        if let Some(secs) = number("BOOKIT_FAVORITES_STALENESS_SECS") {
            self.cache.favorites_staleness_secs = secs;
        }
        if let Some(secs) = number("BOOKIT_UNREAD_POLL_SECS") {
            self.cache.unread_poll_secs = secs;
        }

        if let Some(path) = lookup("BOOKIT_DB_PATH") {
            self.storage.db_path = Some(PathBuf::from(path));
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("app", "bookit", "client")
    }

    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("client.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Parsed base URL for the configured environment and this platform.
    pub fn base_url(&self) -> ApiResult<Url> {
        let raw = resolve_base_url(
            self.api.base_url.as_deref(),
            self.api.environment,
            Platform::current(),
        );
        Url::parse(&raw).map_err(|e| ApiError::config(format!("Invalid base URL '{raw}': {e}")))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn favorites_staleness(&self) -> Duration {
        Duration::from_secs(self.cache.favorites_staleness_secs)
    }

    pub fn unread_poll_interval(&self) -> Duration {
        Duration::from_secs(self.cache.unread_poll_secs)
    }

    /// Local database path: configured, else the platform data directory,
    /// else `bookit.db` in the working directory.
    pub fn db_path(&self) -> PathBuf {
        self.storage
            .db_path
            .clone()
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().join("bookit.db")))
            .unwrap_or_else(|| PathBuf::from("bookit.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_resolve_base_url() {
        assert_eq!(
            resolve_base_url(Some("https://staging.example/api"), Environment::Production, Platform::Android),
            "https://staging.example/api"
        );
        assert_eq!(
            resolve_base_url(Some("  "), Environment::Production, Platform::Other),
            PRODUCTION_BASE_URL
        );
        assert_eq!(
            resolve_base_url(None, Environment::Development, Platform::Android),
            ANDROID_EMULATOR_BASE_URL
        );
        assert_eq!(
            resolve_base_url(None, Environment::Development, Platform::Ios),
            LOCAL_BASE_URL
        );
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!("Development".parse::<Environment>().unwrap(), Environment::Development);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.favorites_staleness(), Duration::from_secs(30));
        assert_eq!(config.unread_poll_interval(), Duration::from_secs(30));
    }

    #[test]
    fn test_config_validation() {
        let mut config = ApiConfig::default();

        config.api.base_url = Some("ftp://files.example".to_string());
        assert!(config.validate().is_err());

        config.api.base_url = Some("not a url".to_string());
        assert!(config.validate().is_err());

        config.api.base_url = Some("https://api.example.com/api".to_string());
        assert!(config.validate().is_ok());

        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("BOOKIT_API_URL", "https://staging.example/api"),
            ("BOOKIT_ENV", "production"),
            ("BOOKIT_API_TIMEOUT_SECS", "5"),
            ("BOOKIT_FAVORITES_STALENESS_SECS", "not-a-number"),
            ("BOOKIT_UNREAD_POLL_SECS", "10"),
            ("BOOKIT_DB_PATH", "/tmp/bookit-test.db"),
        ]
        .into_iter()
        .collect();

        let mut config = ApiConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url.as_deref(), Some("https://staging.example/api"));
        assert_eq!(config.api.environment, Environment::Production);
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.cache.favorites_staleness_secs, 30);
        assert_eq!(config.cache.unread_poll_secs, 10);
        assert_eq!(config.db_path(), PathBuf::from("/tmp/bookit-test.db"));
    }

    #[test]
    fn test_toml_roundtrip_sections() {
        let config = ApiConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[cache]"));

        let parsed: ApiConfig = toml::from_str("[api]\nenvironment = \"production\"\n").unwrap();
        assert_eq!(parsed.api.environment, Environment::Production);
        assert_eq!(parsed.api.timeout_secs, 30);
    }
}
