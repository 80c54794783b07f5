//! Configuration management for the checker.
//!
//! Configuration comes from three layers, later layers winning:
//!
//! 1. An optional TOML file (`--config`), with `${VAR_NAME}` substitution
//! 2. `METADB_<SECTION>_<KEY>` environment overrides
//! 3. Command-line flags
//!
//! The merged result is validated once, before any network activity.
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [limsrest]
//! base_url = "https://igolims.example.org:8443"
//! username = "checker"
//! password = "${METADB_LIMSREST_PASSWORD}"
//! tls_verify = false
//! timeout_seconds = 120
//!
//! [aggregation]
//! max_concurrent_requests = 0   # 0 = one task per request, no cap
//! manifest_selection = "first"  # or "strict"
//!
//! [logging]
//! local_enabled = false
//! local_path = "/var/log/metadb-checker"
//! local_rotation = "daily"
//! ```
//!
//! ```rust,no_run
//! use metadb_checker::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("metadb-checker.toml")?;
//! println!("LimsRest: {}", config.limsrest.base_url);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_from_env};
pub use schema::{
    AggregationConfig, ApplicationConfig, CheckerConfig, LimsRestConfig, LoggingConfig,
    ManifestSelection,
};
pub use secret::{secret_string, SecretString, SecretValue};
