use std::net::SocketAddr;

use thiserror::Error;

use crate::pipeline::documentation::gemini::DEFAULT_API_BASE;

/// Application-level constants
pub const APP_NAME: &str = "CodeScribe";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";

pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_MODEL: &str = "CODESCRIBE_MODEL";
pub const ENV_API_BASE: &str = "GEMINI_API_BASE";
pub const ENV_BIND: &str = "CODESCRIBE_BIND";
pub const ENV_REQUEST_TIMEOUT: &str = "CODESCRIBE_REQUEST_TIMEOUT_SECS";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "codescribe=info,codescribe_lib=info,tower_http=warn"
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub bind_addr: SocketAddr,
    /// `None` means requests may take as long as the backend needs.
    pub request_timeout_secs: Option<u64>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the config from any variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get(ENV_API_KEY).ok_or(ConfigError::MissingApiKey)?;
        let model = get(ENV_MODEL).unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let api_base = get(ENV_API_BASE)
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let bind = get(ENV_BIND).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind.parse().map_err(|_| ConfigError::InvalidValue {
            var: ENV_BIND,
            value: bind.clone(),
        })?;

        let request_timeout_secs = match get(ENV_REQUEST_TIMEOUT) {
            None => None,
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Some(secs),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: ENV_REQUEST_TIMEOUT,
                        value: raw,
                    })
                }
            },
        };

        Ok(Self {
            api_key,
            model,
            api_base,
            bind_addr,
            request_timeout_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn missing_api_key_is_an_error() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingApiKey);
        assert_eq!(err.to_string(), "GEMINI_API_KEY is not set");
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let err = AppConfig::from_lookup(lookup(&[(ENV_API_KEY, "   ")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingApiKey);
    }

    #[test]
    fn defaults_apply() {
        let config = AppConfig::from_lookup(lookup(&[(ENV_API_KEY, "k")])).unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.request_timeout_secs, None);
    }

    #[test]
    fn overrides_are_read() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "k"),
            (ENV_MODEL, "gemini-2.5-pro"),
            (ENV_API_BASE, "http://localhost:9000/"),
            (ENV_BIND, "0.0.0.0:9999"),
            (ENV_REQUEST_TIMEOUT, "90"),
        ]))
        .unwrap();
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.api_base, "http://localhost:9000");
        assert_eq!(config.bind_addr.port(), 9999);
        assert_eq!(config.request_timeout_secs, Some(90));
    }

    #[test]
    fn bad_bind_address_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[(ENV_API_KEY, "k"), (ENV_BIND, "nowhere")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: ENV_BIND, .. }));
    }

    #[test]
    fn zero_or_garbage_timeout_is_rejected() {
        for raw in ["0", "soon"] {
            let vars = [(ENV_API_KEY, "k"), (ENV_REQUEST_TIMEOUT, raw)];
            let err = AppConfig::from_lookup(lookup(&vars)).unwrap_err();
            assert_eq!(
                err,
                ConfigError::InvalidValue {
                    var: ENV_REQUEST_TIMEOUT,
                    value: raw.to_string()
                }
            );
        }
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
