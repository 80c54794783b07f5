//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables hold `ENV_MUTEX` to avoid
//! interference between tests.

use metadb_checker::config::{load_config, load_from_env, ManifestSelection};
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("METADB_APPLICATION_LOG_LEVEL");
    std::env::remove_var("METADB_LIMSREST_BASE_URL");
    std::env::remove_var("METADB_LIMSREST_USERNAME");
    std::env::remove_var("METADB_LIMSREST_PASSWORD");
    std::env::remove_var("METADB_LIMSREST_TLS_VERIFY");
    std::env::remove_var("METADB_AGGREGATION_MAX_CONCURRENT_REQUESTS");
    std::env::remove_var("METADB_AGGREGATION_MANIFEST_SELECTION");
    std::env::remove_var("TEST_LIMSREST_PASSWORD");
}

fn write_config(toml_content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[application]
log_level = "debug"

[limsrest]
base_url = "https://igolims.example.org:8443"
username = "checker"
password = "lims-pass"
tls_verify = true
timeout_seconds = 60
connect_timeout_seconds = 10

[aggregation]
max_concurrent_requests = 16
manifest_selection = "strict"

[logging]
local_enabled = false
local_path = "/tmp/metadb-checker"
local_rotation = "hourly"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.limsrest.base_url, "https://igolims.example.org:8443");
    assert_eq!(config.limsrest.username, "checker");
    assert_eq!(
        config
            .limsrest
            .password
            .as_ref()
            .map(|p| p.expose_secret().as_str().to_string()),
        Some("lims-pass".to_string())
    );
    assert!(config.limsrest.tls_verify);
    assert_eq!(config.limsrest.timeout_seconds, 60);
    assert_eq!(config.limsrest.connect_timeout_seconds, 10);
    assert_eq!(config.aggregation.max_concurrent_requests, 16);
    assert_eq!(config.aggregation.concurrency_limit(), Some(16));
    assert_eq!(config.aggregation.manifest_selection, ManifestSelection::Strict);
    assert_eq!(config.logging.local_path, "/tmp/metadb-checker");
    assert_eq!(config.logging.local_rotation, "hourly");
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_minimal_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[limsrest]
base_url = "https://igolims.example.org:8443"
username = "checker"
password = "lims-pass"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "info");
    assert!(!config.limsrest.tls_verify);
    assert!(config.limsrest.tls_ca_cert.is_none());
    assert_eq!(config.limsrest.timeout_seconds, 120);
    assert_eq!(config.limsrest.connect_timeout_seconds, 30);
    assert_eq!(config.aggregation.concurrency_limit(), None);
    assert_eq!(config.aggregation.manifest_selection, ManifestSelection::First);
    assert!(!config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "daily");
    assert!(config.validate().is_ok());
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_LIMSREST_PASSWORD", "substituted");

    let temp_file = write_config(
        r#"
# password = "${NOT_SUBSTITUTED_IN_COMMENTS}"
[limsrest]
base_url = "https://igolims.example.org:8443"
username = "checker"
password = "${TEST_LIMSREST_PASSWORD}"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");
    assert_eq!(
        config
            .limsrest
            .password
            .as_ref()
            .map(|p| p.expose_secret().as_str().to_string()),
        Some("substituted".to_string())
    );

    cleanup_env_vars();
}

#[test]
fn test_env_var_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("METADB_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("METADB_LIMSREST_USERNAME", "env-user");
    std::env::set_var("METADB_LIMSREST_TLS_VERIFY", "true");
    std::env::set_var("METADB_AGGREGATION_MAX_CONCURRENT_REQUESTS", "4");
    std::env::set_var("METADB_AGGREGATION_MANIFEST_SELECTION", "strict");

    let temp_file = write_config(
        r#"
[application]
log_level = "info"

[limsrest]
base_url = "https://igolims.example.org:8443"
username = "file-user"
password = "lims-pass"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");
    assert_eq!(config.application.log_level, "trace");
    assert_eq!(config.limsrest.username, "env-user");
    assert!(config.limsrest.tls_verify);
    assert_eq!(config.aggregation.max_concurrent_requests, 4);
    assert_eq!(config.aggregation.manifest_selection, ManifestSelection::Strict);

    cleanup_env_vars();
}

#[test]
fn test_load_from_env_without_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("METADB_LIMSREST_BASE_URL", "https://igolims.example.org:8443");
    std::env::set_var("METADB_LIMSREST_USERNAME", "env-user");
    std::env::set_var("METADB_LIMSREST_PASSWORD", "env-pass");

    let config = load_from_env().expect("Failed to load config from env");
    assert_eq!(config.limsrest.base_url, "https://igolims.example.org:8443");
    assert_eq!(config.limsrest.username, "env-user");
    assert!(config.validate().is_ok());

    cleanup_env_vars();
}

#[test]
fn test_malformed_env_override_fails() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("METADB_AGGREGATION_MAX_CONCURRENT_REQUESTS", "many");

    let result = load_from_env();
    assert!(result.is_err());

    cleanup_env_vars();
}

#[test]
fn test_invalid_config_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[limsrest]
base_url = "ftp://igolims.example.org"
username = "checker"
password = "lims-pass"
"#,
    );
    let config = load_config(temp_file.path()).expect("Failed to load config");
    assert!(config.validate().is_err());

    let temp_file = write_config(
        r#"
[limsrest]
base_url = "https://igolims.example.org:8443"
username = "checker"
password = "lims-pass"

[aggregation]
max_concurrent_requests = 5000
"#,
    );
    let config = load_config(temp_file.path()).expect("Failed to load config");
    assert!(config.validate().is_err());

    // Credentials are required once everything is merged
    let config = load_from_env().unwrap();
    assert!(config.validate().is_err());
}
