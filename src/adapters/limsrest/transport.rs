//! Authenticated HTTP transport for LimsRest
//!
//! A [`Transport`] performs one GET and hands back the raw body. It does not
//! retry: any failure here is fatal to the run.

use crate::config::{secret_string, LimsRestConfig, SecretString};
use crate::domain::{CheckerError, LimsRestError, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Certificate, Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use std::time::Duration;
use url::Url;

/// Longest response body excerpt kept in a status error
const BODY_EXCERPT_LIMIT: usize = 512;

/// Raw GET against a LimsRest endpoint
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch the body of `endpoint`
    ///
    /// # Errors
    ///
    /// Returns [`CheckerError::Request`] on connection failures, timeouts,
    /// rejected credentials and non-success statuses.
    async fn fetch(&self, endpoint: &Url) -> Result<Vec<u8>>;
}

/// reqwest-backed transport with Basic authentication
pub struct HttpTransport {
    client: Client,
    auth_header: SecretString,
}

impl HttpTransport {
    /// Build a transport from LimsRest configuration
    ///
    /// Certificates are validated when `tls_verify` is set or a CA bundle is
    /// given; otherwise any server certificate is accepted.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the password is missing, the CA
    /// certificate cannot be read, or the HTTP client cannot be built.
    pub fn from_config(config: &LimsRestConfig) -> Result<Self> {
        let password = config.password.as_ref().ok_or_else(|| {
            CheckerError::Configuration("limsrest.password is required".to_string())
        })?;

        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds));

        if !config.verifies_certificates() {
            tracing::warn!(
                base_url = %config.base_url,
                "TLS certificate verification is disabled for LimsRest"
            );
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        if let Some(ref ca_path) = config.tls_ca_cert {
            let pem = std::fs::read(ca_path).map_err(|e| {
                CheckerError::Configuration(format!(
                    "Failed to read limsrest.tls_ca_cert {ca_path}: {e}"
                ))
            })?;
            let certificate = Certificate::from_pem(&pem).map_err(|e| {
                CheckerError::Configuration(format!("Invalid CA certificate {ca_path}: {e}"))
            })?;
            client_builder = client_builder.add_root_certificate(certificate);
        }

        let client = client_builder.build().map_err(|e| {
            CheckerError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            client,
            auth_header: basic_auth_header(&config.username, password.expose_secret().as_str()),
        })
    }
}

/// `Basic` authorization header value for the credential pair
fn basic_auth_header(username: &str, password: &str) -> SecretString {
    let credentials = format!("{username}:{password}");
    let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
    secret_string(format!("Basic {encoded}"))
}

fn map_send_error(endpoint: &Url, err: reqwest::Error) -> CheckerError {
    let endpoint = endpoint.to_string();
    if err.is_timeout() {
        LimsRestError::Timeout { endpoint }.into()
    } else {
        LimsRestError::Connection {
            endpoint,
            message: err.to_string(),
        }
        .into()
    }
}

fn excerpt(body: &str) -> String {
    if body.len() <= BODY_EXCERPT_LIMIT {
        return body.to_string();
    }
    let mut end = BODY_EXCERPT_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, endpoint: &Url) -> Result<Vec<u8>> {
        tracing::trace!(endpoint = %endpoint, "GET");

        let resp = self
            .client
            .get(endpoint.clone())
            .header(AUTHORIZATION, self.auth_header.expose_secret().as_str())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| map_send_error(endpoint, e))?;

        let status = resp.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(LimsRestError::Authentication {
                    endpoint: endpoint.to_string(),
                    status: status.as_u16(),
                }
                .into());
            }
            s if !s.is_success() => {
                let body = resp.text().await.unwrap_or_default();
                return Err(LimsRestError::Status {
                    endpoint: endpoint.to_string(),
                    status: status.as_u16(),
                    body: excerpt(&body),
                }
                .into());
            }
            _ => {}
        }

        let body = resp.bytes().await.map_err(|e| map_send_error(endpoint, e))?;
        Ok(body.to_vec())
    }
}
