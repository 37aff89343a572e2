//! The root configuration type.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::schema::{LoggingSection, ServerSection, TlsSection};

/// Complete Blaster configuration.
///
/// ```
/// use blaster_config::BlasterConfig;
///
/// let config = BlasterConfig::default();
/// assert_eq!(config.server.http_addr, "0.0.0.0:8080");
/// assert!(config.tls.is_none());
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct BlasterConfig {
    /// Listener settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Certificate and key; absent for plain HTTP.
    #[serde(default)]
    pub tls: Option<TlsSection>,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingSection,
}

impl BlasterConfig {
    /// Checks values that parse but cannot work.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.http_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::invalid_value(
                "server.http_addr",
                format!("invalid socket address: {}", self.server.http_addr),
            ));
        }
        if self.server.shutdown_timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "server.shutdown_timeout_secs",
                "must be greater than zero",
            ));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "server.request_timeout_secs",
                "must be greater than zero",
            ));
        }

        if let Some(tls) = &self.tls {
            if tls.cert_file.as_os_str().is_empty() {
                return Err(ConfigError::invalid_value("tls.cert_file", "must not be empty"));
            }
            if tls.key_file.as_os_str().is_empty() {
                return Err(ConfigError::invalid_value("tls.key_file", "must not be empty"));
            }
        }

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid_value("logging.level", "must not be empty"));
        }

        Ok(())
    }

    /// A local development preset: loopback address, pretty debug logs.
    #[must_use]
    pub fn development() -> Self {
        Self {
            server: ServerSection {
                http_addr: "127.0.0.1:8080".to_string(),
                ..ServerSection::default()
            },
            tls: None,
            logging: LoggingSection {
                level: "debug".to_string(),
                format: blaster_telemetry::LogFormat::Pretty,
                ..LoggingSection::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn field_of(err: ConfigError) -> String {
        match err {
            ConfigError::InvalidValue { field, .. } => field,
            other => panic!("expected an invalid value error, got {other}"),
        }
    }

    #[test]
    fn test_development_preset_is_valid() {
        let config = BlasterConfig::development();
        assert!(config.validate().is_ok());
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_invalid_address() {
        let mut config = BlasterConfig::default();
        config.server.http_addr = "localhost".to_string();
        assert_eq!(field_of(config.validate().unwrap_err()), "server.http_addr");
    }

    #[test]
    fn test_zero_timeouts() {
        let mut config = BlasterConfig::default();
        config.server.shutdown_timeout_secs = 0;
        assert_eq!(
            field_of(config.validate().unwrap_err()),
            "server.shutdown_timeout_secs"
        );

        let mut config = BlasterConfig::default();
        config.server.request_timeout_secs = 0;
        assert_eq!(
            field_of(config.validate().unwrap_err()),
            "server.request_timeout_secs"
        );
    }

    #[test]
    fn test_empty_tls_paths() {
        let mut config = BlasterConfig::default();
        config.tls = Some(TlsSection {
            cert_file: PathBuf::new(),
            key_file: PathBuf::from("server.key"),
        });
        assert_eq!(field_of(config.validate().unwrap_err()), "tls.cert_file");

        config.tls = Some(TlsSection {
            cert_file: PathBuf::from("server.crt"),
            key_file: PathBuf::new(),
        });
        assert_eq!(field_of(config.validate().unwrap_err()), "tls.key_file");
    }

    #[test]
    fn test_empty_log_level() {
        let mut config = BlasterConfig::default();
        config.logging.level = "  ".to_string();
        assert_eq!(field_of(config.validate().unwrap_err()), "logging.level");
    }

    #[test]
    fn test_unknown_section_rejected() {
        let result: Result<BlasterConfig, _> = toml::from_str("[metrics]\nenabled = true");
        assert!(result.is_err());
    }
}
