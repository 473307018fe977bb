//! Process configuration loaded from environment variables.
//!
//! # Responsibility
//! - Resolve the store connection string and logging options once at startup.
//!
//! # Invariants
//! - A missing store connection string is a fatal configuration error.
//! - Lookups go through a caller-supplied function so tests never touch the
//!   real process environment.

use crate::logging::{default_log_level, LogTarget};
use crate::store::{StoreError, StoreUrl};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Primary store connection string variable.
pub const ENV_STORE_URL: &str = "LAZYTASK_STORE_URL";
/// Fallback kept for deployments that already export a Redis URL.
pub const ENV_REDIS_URL: &str = "REDIS_URL";
pub const ENV_LOG_LEVEL: &str = "LAZYTASK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "LAZYTASK_LOG_DIR";

#[derive(Debug)]
pub enum ConfigError {
    MissingStoreUrl,
    InvalidStoreUrl(StoreError),
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingStoreUrl => write!(
                f,
                "store connection string is not set; export {ENV_STORE_URL} or {ENV_REDIS_URL}"
            ),
            Self::InvalidStoreUrl(err) => write!(f, "{err}"),
            Self::RelativeLogDir(path) => write!(
                f,
                "{ENV_LOG_DIR} must be an absolute path, got `{}`",
                path.display()
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidStoreUrl(err) => Some(err),
            Self::MissingStoreUrl | Self::RelativeLogDir(_) => None,
        }
    }
}

/// Resolved startup configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub store_url: StoreUrl,
    pub log_level: String,
    pub log_target: LogTarget,
}

impl AppConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through `lookup`, treating blank values as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let raw_url = read(ENV_STORE_URL)
            .or_else(|| read(ENV_REDIS_URL))
            .ok_or(ConfigError::MissingStoreUrl)?;
        let store_url = StoreUrl::parse(&raw_url).map_err(ConfigError::InvalidStoreUrl)?;

        let log_level = read(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string());

        let log_target = match read(ENV_LOG_DIR) {
            Some(dir) => {
                let path = PathBuf::from(dir.trim());
                if !path.is_absolute() {
                    return Err(ConfigError::RelativeLogDir(path));
                }
                LogTarget::Directory(path)
            }
            None => LogTarget::Stderr,
        };

        Ok(Self {
            store_url,
            log_level,
            log_target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError};
    use crate::logging::LogTarget;
    use crate::store::StoreUrl;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn missing_store_url_is_fatal() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingStoreUrl));

        let blank = AppConfig::from_lookup(lookup_from(&[("LAZYTASK_STORE_URL", "  ")]));
        assert!(matches!(blank, Err(ConfigError::MissingStoreUrl)));
    }

    #[test]
    fn store_url_prefers_primary_variable_over_redis_url() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("LAZYTASK_STORE_URL", "sqlite::memory:"),
            ("REDIS_URL", "redis://localhost:6379"),
        ]))
        .unwrap();
        assert_eq!(config.store_url, StoreUrl::SqliteMemory);

        let fallback =
            AppConfig::from_lookup(lookup_from(&[("REDIS_URL", "redis://localhost:6379")]))
                .unwrap();
        assert!(matches!(fallback.store_url, StoreUrl::Redis(_)));
        assert_eq!(fallback.log_target, LogTarget::Stderr);
    }

    #[test]
    fn unsupported_scheme_and_relative_log_dir_are_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("REDIS_URL", "memcached://x")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidStoreUrl(_)));

        let err = AppConfig::from_lookup(lookup_from(&[
            ("REDIS_URL", "sqlite::memory:"),
            ("LAZYTASK_LOG_DIR", "logs"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::RelativeLogDir(_)));
    }

    #[test]
    fn log_options_are_read_when_present() {
        let dir = std::env::temp_dir().join("lazytask-config-test");
        let config = AppConfig::from_lookup(lookup_from(&[
            ("REDIS_URL", "sqlite::memory:"),
            ("LAZYTASK_LOG_LEVEL", "warn"),
            ("LAZYTASK_LOG_DIR", dir.to_str().unwrap()),
        ]))
        .unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_target, LogTarget::Directory(dir));
    }
}
