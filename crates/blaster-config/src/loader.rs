//! Layered configuration loading.
//!
//! Layers apply in order, later ones winning:
//! 1. built-in defaults
//! 2. TOML or JSON files and strings, each merged onto the result so far
//!    (fields a layer leaves out keep their earlier value)
//! 3. `PREFIX__SECTION__KEY` environment variables

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use blaster_telemetry::LogFormat;
use serde_json::Value as JsonValue;

use crate::config::BlasterConfig;
use crate::error::ConfigError;
use crate::schema::TlsSection;

/// Builds a [`BlasterConfig`] from layered sources.
///
/// # Example
///
/// ```no_run
/// use blaster_config::ConfigLoader;
///
/// # fn main() -> Result<(), blaster_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_optional_file("blaster.toml")?
///     .with_env_prefix("BLASTER")
///     .load()?;
///
/// println!("listening on {}", config.server.http_addr);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config: BlasterConfig,
    env_prefix: Option<String>,
    env_vars: Option<Vec<(String, String)>>,
}

impl ConfigLoader {
    /// Starts from the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from the development preset.
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = BlasterConfig::development();
        self
    }

    /// Loads a `.toml` or `.json` file.
    ///
    /// # Errors
    ///
    /// The file is missing or unreadable, its extension is unknown, or it
    /// does not parse (unknown fields included).
    pub fn with_file(self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_string();
        self.with_string(&content, &format)
    }

    /// Loads a file if it exists.
    ///
    /// # Errors
    ///
    /// As [`ConfigLoader::with_file`], except for a missing file.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Parses `content` as `toml` or `json` and merges it onto the current
    /// configuration.
    ///
    /// ```
    /// use blaster_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_development()
    ///     .with_string("[server]\nhttp_addr = \"127.0.0.1:3000\"", "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.server.http_addr, "127.0.0.1:3000");
    /// assert_eq!(config.server.shutdown_timeout_secs, 30);
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    ///
    /// # Errors
    ///
    /// Unknown format or a parse failure.
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        // Each layer must be a valid configuration on its own
        let layer = match format.to_ascii_lowercase().as_str() {
            "toml" => {
                toml::from_str::<BlasterConfig>(content)?;
                serde_json::to_value(toml::from_str::<toml::Table>(content)?)?
            }
            "json" => {
                serde_json::from_str::<BlasterConfig>(content)?;
                serde_json::from_str::<JsonValue>(content)?
            }
            _ => return Err(ConfigError::UnsupportedFormat(format.to_string())),
        };

        let mut merged = serde_json::to_value(&self.config)?;
        overlay(&mut merged, layer);
        self.config = serde_json::from_value(merged)?;
        Ok(self)
    }

    /// Applies `PREFIX__SECTION__KEY` overrides from the process environment.
    ///
    /// Recognized keys: `SERVER__HTTP_ADDR`, `SERVER__SHUTDOWN_TIMEOUT_SECS`,
    /// `SERVER__REQUEST_TIMEOUT_SECS`, `TLS__CERT_FILE`, `TLS__KEY_FILE`,
    /// `LOGGING__ENABLED`, `LOGGING__LEVEL`, `LOGGING__FORMAT`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_ascii_uppercase());
        self
    }

    /// Reads overrides from `vars` instead of the process environment.
    #[must_use]
    pub fn with_env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_vars = Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    /// Applies overrides and validates.
    ///
    /// # Errors
    ///
    /// A malformed or unknown override, or a failed validation.
    pub fn load(mut self) -> Result<BlasterConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            let vars = self.env_vars.take().unwrap_or_else(|| env::vars().collect());
            let marker = format!("{prefix}__");

            for (key, value) in vars {
                if let Some(setting) = key.strip_prefix(&marker) {
                    apply_override(&mut self.config, &key, setting, &value)?;
                }
            }
        }

        self.config.validate()?;
        Ok(self.config)
    }

    /// Returns the configuration without overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> BlasterConfig {
        self.config
    }
}

fn apply_override(
    config: &mut BlasterConfig,
    var: &str,
    setting: &str,
    value: &str,
) -> Result<(), ConfigError> {
    let parts: Vec<&str> = setting.split("__").collect();

    match parts.as_slice() {
        ["SERVER", "HTTP_ADDR"] => config.server.http_addr = value.to_string(),
        ["SERVER", "SHUTDOWN_TIMEOUT_SECS"] => {
            config.server.shutdown_timeout_secs = parse_u64(var, value)?;
        }
        ["SERVER", "REQUEST_TIMEOUT_SECS"] => {
            config.server.request_timeout_secs = parse_u64(var, value)?;
        }
        ["TLS", "CERT_FILE"] => {
            config.tls.get_or_insert_with(TlsSection::default).cert_file = PathBuf::from(value);
        }
        ["TLS", "KEY_FILE"] => {
            config.tls.get_or_insert_with(TlsSection::default).key_file = PathBuf::from(value);
        }
        ["LOGGING", "ENABLED"] => {
            config.logging.enabled = parse_bool(value)
                .ok_or_else(|| ConfigError::env_parse(var, "expected boolean"))?;
        }
        ["LOGGING", "LEVEL"] => config.logging.level = value.to_string(),
        ["LOGGING", "FORMAT"] => {
            config.logging.format = value
                .parse::<LogFormat>()
                .map_err(|_| ConfigError::env_parse(var, "expected 'json', 'pretty' or 'compact'"))?;
        }
        _ => return Err(ConfigError::UnknownVariable(var.to_string())),
    }

    Ok(())
}

/// Objects merge key by key; anything else in `layer` replaces `base`.
fn overlay(base: &mut JsonValue, layer: JsonValue) {
    match (base, layer) {
        (JsonValue::Object(base), JsonValue::Object(layer)) => {
            for (key, value) in layer {
                match base.get_mut(&key) {
                    Some(slot) => overlay(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

fn parse_u64(var: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::env_parse(var, "expected integer"))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
