//! Configuration Types
//!
//! Authority, client and sweep configuration.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::types::TokenTypeHint;

/// Default revocation path appended to the authority address.
pub const DEFAULT_TOKEN_REVOCATION_PATH: &str = "connect/revocat";
/// Default HTTP timeout for a revocation request.
pub const DEFAULT_TIMEOUT_MS: u64 = 30000;
/// Default number of revocation calls in flight during one sweep.
pub const DEFAULT_MAX_CONCURRENT_REVOCATIONS: usize = 4;

/// Token lifecycle configuration.
#[derive(Clone, Debug)]
pub struct TokenLifecycleConfig {
    /// Authority configuration.
    pub provider: ProviderConfig,
    /// Client credentials.
    pub credentials: ClientCredentials,
    /// HTTP timeout for each revocation call.
    pub timeout: Duration,
    /// Upper bound of revocation calls in flight during one sweep.
    pub max_concurrent_revocations: usize,
    /// Optional `token_type_hint` sent with each revocation.
    pub token_type_hint: Option<TokenTypeHint>,
}

impl Default for TokenLifecycleConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            credentials: ClientCredentials::default(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_concurrent_revocations: DEFAULT_MAX_CONCURRENT_REVOCATIONS,
            token_type_hint: None,
        }
    }
}

impl TokenLifecycleConfig {
    /// Full revocation endpoint, or `None` when no authority is configured.
    pub fn revocation_endpoint(&self) -> Option<String> {
        self.provider.revocation_endpoint()
    }

    /// Trimmed client identifier, or `None` when absent or blank.
    pub fn client_id(&self) -> Option<&str> {
        non_blank(self.credentials.client_id.as_deref())
    }

    /// Whether both halves of the revocation configuration are present.
    pub fn is_revocation_configured(&self) -> bool {
        self.revocation_endpoint().is_some() && self.client_id().is_some()
    }
}

/// Authority endpoint configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Authority (issuer) base address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authority: Option<String>,
    /// Path segment appended to the authority to reach the revocation endpoint.
    #[serde(default = "default_token_revocation_path")]
    pub token_revocation_path: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            authority: None,
            token_revocation_path: default_token_revocation_path(),
        }
    }
}

impl ProviderConfig {
    /// Authority with a trailing `/` ensured, followed by the revocation path.
    pub fn revocation_endpoint(&self) -> Option<String> {
        let authority = non_blank(self.authority.as_deref())?;

        let mut endpoint = authority.to_string();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        endpoint.push_str(self.token_revocation_path.trim().trim_start_matches('/'));
        Some(endpoint)
    }
}

fn default_token_revocation_path() -> String {
    DEFAULT_TOKEN_REVOCATION_PATH.to_string()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Client credentials presented to the authority.
#[derive(Clone, Default)]
pub struct ClientCredentials {
    /// Client identifier.
    pub client_id: Option<String>,
    /// Client secret (for confidential clients).
    pub client_secret: Option<SecretString>,
    /// Client authentication method.
    pub auth_method: ClientAuthMethod,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("auth_method", &self.auth_method)
            .finish()
    }
}

/// Client authentication method.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
    /// Public client: only `client_id` in the request body.
    #[default]
    None,
    /// client_id and client_secret in request body.
    ClientSecretPost,
    /// HTTP Basic Authentication header.
    ClientSecretBasic,
}
