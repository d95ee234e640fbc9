//! Token Revocation
//!
//! RFC 7009 - OAuth 2.0 Token Revocation.

use async_trait::async_trait;
use base64::Engine;
use parking_lot::Mutex;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::core::{HttpMethod, HttpRequest, HttpTransport};
use crate::error::{create_error_from_response, describe_error_response, OAuth2Error};
use crate::types::{ClientAuthMethod, RevocationOutcome, RevocationRequest};

/// Token revoker interface.
///
/// Exactly one outbound call per invocation and no internal retries.
#[async_trait]
pub trait TokenRevoker: Send + Sync {
    /// Revoke one token at the authority.
    async fn revoke(&self, request: &RevocationRequest) -> RevocationOutcome;
}

/// Default token revoker implementation.
pub struct DefaultTokenRevoker<T: HttpTransport> {
    transport: Arc<T>,
    client_secret: Option<SecretString>,
    auth_method: ClientAuthMethod,
    timeout: Option<Duration>,
}

impl<T: HttpTransport> DefaultTokenRevoker<T> {
    /// Create a revoker for a public client.
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            client_secret: None,
            auth_method: ClientAuthMethod::None,
            timeout: None,
        }
    }

    /// Authenticate with a client secret.
    pub fn with_client_secret(mut self, secret: SecretString, auth_method: ClientAuthMethod) -> Self {
        self.client_secret = Some(secret);
        self.auth_method = auth_method;
        self
    }

    /// Set per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn uses_basic_auth(&self) -> bool {
        self.auth_method == ClientAuthMethod::ClientSecretBasic && self.client_secret.is_some()
    }

    fn build_request_body(&self, request: &RevocationRequest) -> String {
        let mut form = url::form_urlencoded::Serializer::new(String::new());
        form.append_pair("token", &request.token);

        if let Some(hint) = &request.token_type_hint {
            form.append_pair("token_type_hint", hint.as_str());
        }

        if !self.uses_basic_auth() {
            form.append_pair("client_id", &request.client_id);
        }

        if self.auth_method == ClientAuthMethod::ClientSecretPost {
            if let Some(secret) = &self.client_secret {
                form.append_pair("client_secret", secret.expose_secret());
            }
        }

        form.finish()
    }

    fn build_request_headers(&self, request: &RevocationRequest) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert(
            "content-type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );
        headers.insert("accept".to_string(), "application/json".to_string());

        if self.uses_basic_auth() {
            if let Some(secret) = &self.client_secret {
                let credentials = format!("{}:{}", request.client_id, secret.expose_secret());
                let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
                headers.insert("authorization".to_string(), format!("Basic {}", encoded));
            }
        }

        headers
    }
}

#[async_trait]
impl<T: HttpTransport> TokenRevoker for DefaultTokenRevoker<T> {
    async fn revoke(&self, request: &RevocationRequest) -> RevocationOutcome {
        let http_request = HttpRequest {
            method: HttpMethod::Post,
            url: request.address.clone(),
            headers: self.build_request_headers(request),
            body: Some(self.build_request_body(request)),
            timeout: self.timeout,
        };

        let response = match self.transport.send(http_request).await {
            Ok(response) => response,
            Err(e) if e.is_transport_failure() => {
                return RevocationOutcome::TransportError {
                    reason: e.to_string(),
                }
            }
            Err(e) => {
                return RevocationOutcome::Rejected {
                    status: None,
                    error_code: None,
                    reason: e.to_string(),
                }
            }
        };

        // RFC 7009: 200 for a revoked token and for a token the server
        // already considers invalid.
        if response.is_success() {
            return RevocationOutcome::Revoked;
        }

        let error_code = match create_error_from_response(response.status, &response.body) {
            OAuth2Error::Provider(error) => Some(error.code().to_string()),
            _ => None,
        };

        RevocationOutcome::Rejected {
            status: Some(response.status),
            error_code,
            reason: describe_error_response(response.status, &response.body),
        }
    }
}

/// Mock token revoker for testing.
///
/// Returns `Revoked` unless an outcome was scripted for the token.
#[derive(Default)]
pub struct MockTokenRevoker {
    revoke_history: Mutex<Vec<RevocationRequest>>,
    outcomes: Mutex<HashMap<String, RevocationOutcome>>,
    delay: Mutex<Option<Duration>>,
}

impl MockTokenRevoker {
    /// Create new mock revoker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the outcome for a specific token.
    pub fn set_outcome(&self, token: &str, outcome: RevocationOutcome) -> &Self {
        self.outcomes.lock().insert(token.to_string(), outcome);
        self
    }

    /// Delay every call, to widen race windows in tests.
    pub fn set_delay(&self, delay: Duration) -> &Self {
        *self.delay.lock() = Some(delay);
        self
    }

    /// Get revocation history.
    pub fn get_revoke_history(&self) -> Vec<RevocationRequest> {
        self.revoke_history.lock().clone()
    }

    /// Tokens for which a revocation call was made, in call order.
    pub fn get_attempted_tokens(&self) -> Vec<String> {
        self.revoke_history
            .lock()
            .iter()
            .map(|r| r.token.clone())
            .collect()
    }

    /// Number of calls made for a token.
    pub fn attempts_for(&self, token: &str) -> usize {
        self.revoke_history
            .lock()
            .iter()
            .filter(|r| r.token == token)
            .count()
    }
}

#[async_trait]
impl TokenRevoker for MockTokenRevoker {
    async fn revoke(&self, request: &RevocationRequest) -> RevocationOutcome {
        self.revoke_history.lock().push(request.clone());

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.outcomes
            .lock()
            .get(&request.token)
            .cloned()
            .unwrap_or(RevocationOutcome::Revoked)
    }
}
