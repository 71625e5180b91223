use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "Labflag";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "labflag=info,tower_http=info"
}

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_API_BASE: &str = "/api/v1";
const DEFAULT_METRICS_CSV: &str = "files/diagnostic_metrics.csv";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Runtime settings, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Prefix for the diagnostic routes, e.g. `/api/v1`.
    pub api_base: String,
    /// `*` allows any origin.
    pub cors_origin: String,
    pub metrics_csv: PathBuf,
    /// Default for the per-request `assessment` switch.
    pub health_assessment: bool,
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            api_base: DEFAULT_API_BASE.to_string(),
            cors_origin: "*".to_string(),
            metrics_csv: PathBuf::from(DEFAULT_METRICS_CSV),
            health_assessment: true,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source. Unset or blank variables
    /// keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();

        if let Some(value) = get("LABFLAG_HOST") {
            config.host = parse(&value, "LABFLAG_HOST", "expected an IP address")?;
        }
        if let Some(value) = get("PORT") {
            config.port = parse(&value, "PORT", "expected a port number")?;
        }
        if let Some(value) = get("LABFLAG_API_BASE") {
            config.api_base = normalize_base(&value);
        }
        if let Some(value) = get("LABFLAG_CORS_ORIGIN") {
            config.cors_origin = value;
        }
        if let Some(value) = get("LABFLAG_METRICS_CSV") {
            config.metrics_csv = PathBuf::from(value);
        }
        if let Some(value) = get("LABFLAG_HEALTH_ASSESSMENT") {
            config.health_assessment = parse_flag(&value, "LABFLAG_HEALTH_ASSESSMENT")?;
        }
        if let Some(value) = get("LABFLAG_MAX_UPLOAD_BYTES") {
            config.max_upload_bytes =
                parse(&value, "LABFLAG_MAX_UPLOAD_BYTES", "expected a byte count")?;
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse<T: std::str::FromStr>(
    value: &str,
    var: &'static str,
    reason: &'static str,
) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        var,
        value: value.to_string(),
        reason,
    })
}

pub(crate) fn parse_flag(value: &str, var: &'static str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
            reason: "expected true or false",
        }),
    }
}

/// Leading slash, no trailing slash. `/` collapses to the empty prefix.
fn normalize_base(value: &str) -> String {
    let trimmed = value.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
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
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
        assert_eq!(config.api_base, "/api/v1");
        assert!(config.health_assessment);
    }

    #[test]
    fn reads_every_variable() {
        let config = AppConfig::from_lookup(lookup(&[
            ("LABFLAG_HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("LABFLAG_API_BASE", "lab/"),
            ("LABFLAG_CORS_ORIGIN", "https://clinic.example"),
            ("LABFLAG_METRICS_CSV", "/data/metrics.csv"),
            ("LABFLAG_HEALTH_ASSESSMENT", "off"),
            ("LABFLAG_MAX_UPLOAD_BYTES", "1024"),
        ]))
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.api_base, "/lab");
        assert_eq!(config.cors_origin, "https://clinic.example");
        assert_eq!(config.metrics_csv, PathBuf::from("/data/metrics.csv"));
        assert!(!config.health_assessment);
        assert_eq!(config.max_upload_bytes, 1024);
    }

    #[test]
    fn blank_values_keep_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("PORT", "  ")])).unwrap();
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn root_base_collapses_to_empty_prefix() {
        let config = AppConfig::from_lookup(lookup(&[("LABFLAG_API_BASE", "/")])).unwrap();
        assert_eq!(config.api_base, "");
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                var: "PORT",
                value: "eighty".into(),
                reason: "expected a port number",
            }
        );
    }

    #[test]
    fn malformed_flag_is_rejected() {
        assert!(AppConfig::from_lookup(lookup(&[("LABFLAG_HEALTH_ASSESSMENT", "maybe")])).is_err());
    }

    #[test]
    fn app_name_is_labflag() {
        assert_eq!(APP_NAME, "Labflag");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
    }
}
