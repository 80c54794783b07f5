//! Configuration schema types
//!
//! Every section has defaults so that a run can be configured entirely from
//! the command line; the TOML file only tunes what the CLI does not cover.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound for `aggregation.max_concurrent_requests`
pub const MAX_CONCURRENT_REQUESTS_LIMIT: usize = 1000;

/// Main checker configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// LimsRest connection settings
    #[serde(default)]
    pub limsrest: LimsRestConfig,

    /// Fan-out and manifest selection settings
    #[serde(default)]
    pub aggregation: AggregationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CheckerConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid value
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.limsrest.validate()?;
        self.aggregation.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// LimsRest server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimsRestConfig {
    /// Base host URL, e.g. `https://igolims.example.org:8443`
    #[serde(default)]
    pub base_url: String,

    /// Basic auth username
    #[serde(default)]
    pub username: String,

    /// Basic auth password, zeroized on drop
    #[serde(default)]
    pub password: Option<SecretString>,

    /// TLS certificate verification
    ///
    /// Off by default: the LIMS endpoint is served with a self-signed
    /// certificate. Prefer `tls_ca_cert` where the CA is available.
    #[serde(default)]
    pub tls_verify: bool,

    /// Optional PEM CA certificate to trust in addition to the system roots
    ///
    /// Setting it turns verification on whatever `tls_verify` says.
    #[serde(default)]
    pub tls_ca_cert: Option<String>,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,
}

impl LimsRestConfig {
    /// Whether server certificates are checked, either against the system
    /// roots or against `tls_ca_cert`
    pub fn verifies_certificates(&self) -> bool {
        self.tls_verify || self.tls_ca_cert.is_some()
    }

    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.base_url.is_empty() {
            return Err("limsrest.base_url cannot be empty".to_string());
        }

        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| format!("limsrest.base_url '{}' is not a valid URL: {e}", self.base_url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err("limsrest.base_url must start with http:// or https://".to_string());
        }

        if self.username.is_empty() {
            return Err("limsrest.username cannot be empty".to_string());
        }

        if self
            .password
            .as_ref()
            .map(|p| p.expose_secret().is_empty())
            .unwrap_or(true)
        {
            return Err("limsrest.password cannot be empty".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("limsrest.timeout_seconds must be greater than 0".to_string());
        }

        if self.connect_timeout_seconds == 0 {
            return Err("limsrest.connect_timeout_seconds must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Default for LimsRestConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            username: String::new(),
            password: None,
            tls_verify: false,
            tls_ca_cert: None,
            timeout_seconds: default_timeout_seconds(),
            connect_timeout_seconds: default_connect_timeout_seconds(),
        }
    }
}

/// How to pick a manifest when `getSampleManifest` returns several
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestSelection {
    /// Take the first candidate
    #[default]
    First,
    /// Require exactly one candidate
    Strict,
}

impl FromStr for ManifestSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first" => Ok(Self::First),
            "strict" => Ok(Self::Strict),
            _ => Err(format!(
                "Invalid manifest selection '{s}'. Must be one of: first, strict"
            )),
        }
    }
}

impl fmt::Display for ManifestSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => write!(f, "first"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

/// Aggregation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Maximum enrichment tasks in flight; 0 means one task per request
    /// with no cap
    #[serde(default)]
    pub max_concurrent_requests: usize,

    /// Manifest selection policy
    #[serde(default)]
    pub manifest_selection: ManifestSelection,
}

impl AggregationConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_concurrent_requests > MAX_CONCURRENT_REQUESTS_LIMIT {
            return Err(format!(
                "aggregation.max_concurrent_requests must be between 0 and {}, got {}",
                MAX_CONCURRENT_REQUESTS_LIMIT, self.max_concurrent_requests
            ));
        }
        Ok(())
    }

    /// Concurrency cap, or `None` when unbounded
    pub fn concurrency_limit(&self) -> Option<usize> {
        (self.max_concurrent_requests > 0).then_some(self.max_concurrent_requests)
    }
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 0,
            manifest_selection: ManifestSelection::First,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write JSON logs to rolling files as well as stderr
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation: daily, hourly or never
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled = true".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_seconds() -> u64 {
    120
}

fn default_connect_timeout_seconds() -> u64 {
    30
}

fn default_log_path() -> String {
    "/var/log/metadb-checker".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}
