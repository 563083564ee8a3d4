use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::GatedProxyConfig;

/// Body AuthVerify answers with when it accepts a token
pub const VERIFIED: &str = "VERIFIED";

/// Path of the AuthVerify resource relative to the REST API base URL
pub const VERIFY_PATH: &str = "verify-auth";

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Auth verification request failed: {0}")]
    Transport(String),
}

/// Asks the verification service about a bearer token and returns its raw
/// response body. Interpreting the body is up to the caller.
#[async_trait]
pub trait AuthVerifier: Send + Sync {
    async fn verify(&self, authorization: &str) -> Result<String, VerifyError>;
}

/// Calls AuthVerify over HTTP
#[derive(Clone)]
pub struct HttpAuthVerifier {
    client: reqwest::Client,
    verify_url: String,
}

impl HttpAuthVerifier {
    pub fn new(config: &GatedProxyConfig) -> Result<Self, VerifyError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| VerifyError::Client(e.to_string()))?;

        Ok(Self {
            client,
            verify_url: verify_url(&config.verify_base_url),
        })
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, VerifyError> {
        Self::new(&GatedProxyConfig {
            verify_base_url: base_url.to_string(),
            timeout,
        })
    }

    pub fn verify_url(&self) -> &str {
        &self.verify_url
    }
}

#[async_trait]
impl AuthVerifier for HttpAuthVerifier {
    #[tracing::instrument(skip(self, authorization), fields(url = %self.verify_url))]
    async fn verify(&self, authorization: &str) -> Result<String, VerifyError> {
        let response = self
            .client
            .get(&self.verify_url)
            .header(AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|e| {
                warn!("Auth verification request failed: {}", e);
                VerifyError::Transport(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| VerifyError::Transport(e.to_string()))?;

        debug!(status = status.as_u16(), "Auth verification answered");
        Ok(body)
    }
}

/// `<base_url>verify-auth`, inserting the separator when the base lacks one
pub fn verify_url(base_url: &str) -> String {
    if base_url.ends_with('/') {
        format!("{}{}", base_url, VERIFY_PATH)
    } else {
        format!("{}/{}", base_url, VERIFY_PATH)
    }
}

/// Whether an AuthVerify response body means "verified".
///
/// AuthVerify JSON-encodes its answer, so a JSON string literal is unwrapped
/// first; any other text is taken as-is. The comparison is exact and
/// case-sensitive.
///
/// This deliberately differs from a raw-text comparison against `VERIFIED`,
/// which would reject the quoted `"VERIFIED"` that AuthVerify actually sends.
/// Bare `VERIFIED` is still accepted.
pub fn is_verified_body(body: &str) -> bool {
    match serde_json::from_str::<String>(body) {
        Ok(decoded) => decoded == VERIFIED,
        Err(_) => body == VERIFIED,
    }
}
