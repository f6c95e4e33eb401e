use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::pager::DEFAULT_PAGE_SIZE;

pub const DEFAULT_LOCATIONS_PATH: &str = "locations.json";
pub const DEFAULT_COVERAGE_API_URL: &str = "https://internetbor.uz/api/v1/coverage-check/";
pub const DEFAULT_PROVIDER_PAGE_URL: &str = "https://internetbor.uz/provider/";
pub const DEFAULT_CONTACT_HANDLE: &str = "@internetbor_admin";
pub const DEFAULT_SESSION_TTL_SECS: u64 = 1800;
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 15;

/// Настройки процесса. Читаются один раз при старте.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub locations_path: PathBuf,
    pub coverage_api_url: String,
    /// `None`: не догружать тарифы со страниц провайдеров.
    pub provider_page_url: Option<String>,
    pub contact_handle: String,
    pub page_size: usize,
    pub session_ttl: Duration,
    pub lookup_timeout: Duration,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    InvalidNumber { key: &'static str, value: String },
    ZeroPageSize,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{} must be a non-negative integer, got {:?}", key, value)
            }
            ConfigError::ZeroPageSize => write!(f, "PAGE_SIZE must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let string = |key: &str, default: &str| {
            var(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let number = |key: &'static str, default: u64| -> Result<u64, ConfigError> {
            match var(key).map(|v| v.trim().to_string()) {
                Some(v) if !v.is_empty() => v
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidNumber { key, value: v }),
                _ => Ok(default),
            }
        };

        let page_size = number("PAGE_SIZE", DEFAULT_PAGE_SIZE as u64)? as usize;
        if page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }

        // пустая строка явно отключает разбор страниц провайдеров
        let provider_page_url = match var("PROVIDER_PAGE_URL") {
            Some(v) if v.trim().is_empty() => None,
            Some(v) => Some(v.trim().to_string()),
            None => Some(DEFAULT_PROVIDER_PAGE_URL.to_string()),
        };

        Ok(Config {
            locations_path: PathBuf::from(string("LOCATIONS_PATH", DEFAULT_LOCATIONS_PATH)),
            coverage_api_url: string("COVERAGE_API_URL", DEFAULT_COVERAGE_API_URL),
            provider_page_url,
            contact_handle: string("CONTACT_HANDLE", DEFAULT_CONTACT_HANDLE),
            page_size,
            session_ttl: Duration::from_secs(number("SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?),
            lookup_timeout: Duration::from_secs(number("LOOKUP_TIMEOUT_SECS", DEFAULT_LOOKUP_TIMEOUT_SECS)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = from_map(&[]).unwrap();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.locations_path, PathBuf::from("locations.json"));
        assert_eq!(config.coverage_api_url, DEFAULT_COVERAGE_API_URL);
        assert_eq!(config.provider_page_url.as_deref(), Some(DEFAULT_PROVIDER_PAGE_URL));
        assert_eq!(config.contact_handle, "@internetbor_admin");
        assert_eq!(config.session_ttl, Duration::from_secs(1800));
    }

    #[test]
    fn overrides_are_applied() {
        let config = from_map(&[
            ("PAGE_SIZE", "6"),
            ("COVERAGE_API_URL", "http://localhost:8080/check"),
            ("CONTACT_HANDLE", "@help_desk"),
            ("SESSION_TTL_SECS", "60"),
            ("PROVIDER_PAGE_URL", ""),
        ])
        .unwrap();
        assert_eq!(config.page_size, 6);
        assert_eq!(config.coverage_api_url, "http://localhost:8080/check");
        assert_eq!(config.contact_handle, "@help_desk");
        assert_eq!(config.session_ttl, Duration::from_secs(60));
        assert_eq!(config.provider_page_url, None);
    }

    #[test]
    fn rejects_bad_numbers() {
        assert_eq!(from_map(&[("PAGE_SIZE", "0")]), Err(ConfigError::ZeroPageSize));
        assert_eq!(
            from_map(&[("LOOKUP_TIMEOUT_SECS", "soon")]),
            Err(ConfigError::InvalidNumber {
                key: "LOOKUP_TIMEOUT_SECS",
                value: "soon".to_string()
            })
        );
    }
}
