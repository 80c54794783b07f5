//! Configuration loader with TOML parsing and environment variable overrides
//!
//! Loading does not validate: the command layer merges CLI flags on top of
//! the loaded configuration first and validates the merged result.

use super::schema::{CheckerConfig, ManifestSelection};
use super::secret::secret_string;
use crate::domain::errors::CheckerError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Prefix for environment overrides, e.g. `METADB_LIMSREST_BASE_URL`
pub const ENV_PREFIX: &str = "METADB";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`CheckerConfig`]
/// 4. Applies environment variable overrides (`METADB_*` prefix)
///
/// # Errors
///
/// Returns a configuration error if the file cannot be read, a referenced
/// variable is unset, the TOML does not parse, or an override does not parse.
///
/// # Examples
///
/// ```no_run
/// use metadb_checker::config::loader::load_config;
///
/// let config = load_config("metadb-checker.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<CheckerConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CheckerError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        CheckerError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: CheckerConfig = toml::from_str(&contents)
        .map_err(|e| CheckerError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    tracing::debug!(path = %path.display(), "Loaded configuration file");

    Ok(config)
}

/// Default configuration with environment overrides applied, for runs
/// without a configuration file
pub fn load_from_env() -> Result<CheckerConfig> {
    let mut config = CheckerConfig::default();
    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched. All missing variables are reported in
/// one error.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| CheckerError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(CheckerError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}_{key}")).ok()
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e| {
        CheckerError::Configuration(format!("Invalid value '{value}' for {ENV_PREFIX}_{key}: {e}"))
    })
}

/// Applies environment variable overrides using the `METADB_*` prefix
///
/// Variables follow the pattern `METADB_<SECTION>_<KEY>`, for example
/// `METADB_LIMSREST_BASE_URL` or `METADB_AGGREGATION_MAX_CONCURRENT_REQUESTS`.
fn apply_env_overrides(config: &mut CheckerConfig) -> Result<()> {
    if let Some(val) = env_var("APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // LimsRest overrides
    if let Some(val) = env_var("LIMSREST_BASE_URL") {
        config.limsrest.base_url = val;
    }
    if let Some(val) = env_var("LIMSREST_USERNAME") {
        config.limsrest.username = val;
    }
    if let Some(val) = env_var("LIMSREST_PASSWORD") {
        config.limsrest.password = Some(secret_string(val));
    }
    if let Some(val) = env_var("LIMSREST_TLS_VERIFY") {
        config.limsrest.tls_verify = parse_env("LIMSREST_TLS_VERIFY", &val)?;
    }
    if let Some(val) = env_var("LIMSREST_TLS_CA_CERT") {
        config.limsrest.tls_ca_cert = Some(val);
    }
    if let Some(val) = env_var("LIMSREST_TIMEOUT_SECONDS") {
        config.limsrest.timeout_seconds = parse_env("LIMSREST_TIMEOUT_SECONDS", &val)?;
    }
    if let Some(val) = env_var("LIMSREST_CONNECT_TIMEOUT_SECONDS") {
        config.limsrest.connect_timeout_seconds =
            parse_env("LIMSREST_CONNECT_TIMEOUT_SECONDS", &val)?;
    }

    // Aggregation overrides
    if let Some(val) = env_var("AGGREGATION_MAX_CONCURRENT_REQUESTS") {
        config.aggregation.max_concurrent_requests =
            parse_env("AGGREGATION_MAX_CONCURRENT_REQUESTS", &val)?;
    }
    if let Some(val) = env_var("AGGREGATION_MANIFEST_SELECTION") {
        config.aggregation.manifest_selection =
            parse_env::<ManifestSelection>("AGGREGATION_MANIFEST_SELECTION", &val)?;
    }

    // Logging overrides
    if let Some(val) = env_var("LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_env("LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Some(val) = env_var("LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = env_var("LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("METADB_LOADER_TEST_VAR", "test_value");
        let input = "password = \"${METADB_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "password = \"test_value\"\n");
        std::env::remove_var("METADB_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("METADB_LOADER_MISSING_VAR");
        let input = "password = \"${METADB_LOADER_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("METADB_LOADER_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        let input = "# password = \"${METADB_LOADER_COMMENTED_OUT}\"";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${METADB_LOADER_COMMENTED_OUT}"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-metadb-checker.toml");
        assert!(matches!(result, Err(CheckerError::Configuration(_))));
    }

    #[test]
    fn test_load_config_sections() {
        let toml_content = r#"
[application]
log_level = "debug"

[limsrest]
base_url = "https://igolims.example.org:8443"
username = "checker"
password = "secret"
timeout_seconds = 60

[aggregation]
max_concurrent_requests = 4
manifest_selection = "strict"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.limsrest.base_url, "https://igolims.example.org:8443");
        assert_eq!(config.limsrest.timeout_seconds, 60);
        assert!(!config.limsrest.tls_verify);
        assert_eq!(config.aggregation.concurrency_limit(), Some(4));
        assert_eq!(config.aggregation.manifest_selection, ManifestSelection::Strict);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[limsrest\nbase_url = ").unwrap();
        temp_file.flush().unwrap();

        let err = load_config(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML"));
    }
}
