//! Configuration Builder
//!
//! Fluent builder for token lifecycle configuration.

use std::time::Duration;

use crate::error::{ConfigurationError, OAuth2Error};
use crate::types::{
    ClientAuthMethod, ClientCredentials, ProviderConfig, TokenLifecycleConfig, TokenTypeHint,
    DEFAULT_MAX_CONCURRENT_REVOCATIONS, DEFAULT_TIMEOUT_MS, DEFAULT_TOKEN_REVOCATION_PATH,
};
use secrecy::SecretString;

/// Token lifecycle configuration builder.
///
/// A missing authority or client id is accepted; it disables revocation.
pub struct TokenLifecycleConfigBuilder {
    authority: Option<String>,
    token_revocation_path: String,
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    auth_method: ClientAuthMethod,
    timeout: Duration,
    max_concurrent_revocations: usize,
    token_type_hint: Option<TokenTypeHint>,
}

impl Default for TokenLifecycleConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenLifecycleConfigBuilder {
    /// Create new configuration builder.
    pub fn new() -> Self {
        Self {
            authority: None,
            token_revocation_path: DEFAULT_TOKEN_REVOCATION_PATH.to_string(),
            client_id: None,
            client_secret: None,
            auth_method: ClientAuthMethod::None,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_concurrent_revocations: DEFAULT_MAX_CONCURRENT_REVOCATIONS,
            token_type_hint: None,
        }
    }

    /// Set authority address.
    pub fn authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = Some(authority.into());
        self
    }

    /// Set revocation path appended to the authority.
    pub fn token_revocation_path(mut self, path: impl Into<String>) -> Self {
        self.token_revocation_path = path.into();
        self
    }

    /// Set client ID.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set client secret.
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(SecretString::new(client_secret.into()));
        self
    }

    /// Set client authentication method.
    pub fn auth_method(mut self, method: ClientAuthMethod) -> Self {
        self.auth_method = method;
        self
    }

    /// Set request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the number of revocation calls in flight during one sweep.
    pub fn max_concurrent_revocations(mut self, max: usize) -> Self {
        self.max_concurrent_revocations = max;
        self
    }

    /// Send a `token_type_hint` with each revocation.
    pub fn token_type_hint(mut self, hint: TokenTypeHint) -> Self {
        self.token_type_hint = Some(hint);
        self
    }

    /// Configure from provider config (e.g. deserialized settings).
    pub fn from_provider_config(mut self, provider: ProviderConfig) -> Self {
        self.authority = provider.authority;
        self.token_revocation_path = provider.token_revocation_path;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<TokenLifecycleConfig, OAuth2Error> {
        if let Some(authority) = self.authority.as_deref().filter(|a| !a.trim().is_empty()) {
            Self::validate_authority(authority.trim())?;
        }

        if self.max_concurrent_revocations == 0 {
            return Err(OAuth2Error::Configuration(ConfigurationError::InvalidConfig {
                message: "max_concurrent_revocations must be at least 1".to_string(),
            }));
        }

        if self.auth_method != ClientAuthMethod::None && self.client_secret.is_none() {
            return Err(OAuth2Error::Configuration(
                ConfigurationError::MissingRequired {
                    field: "client_secret".to_string(),
                },
            ));
        }

        Ok(TokenLifecycleConfig {
            provider: ProviderConfig {
                authority: self.authority,
                token_revocation_path: self.token_revocation_path,
            },
            credentials: ClientCredentials {
                client_id: self.client_id,
                client_secret: self.client_secret,
                auth_method: self.auth_method,
            },
            timeout: self.timeout,
            max_concurrent_revocations: self.max_concurrent_revocations,
            token_type_hint: self.token_type_hint,
        })
    }

    fn validate_authority(authority: &str) -> Result<(), OAuth2Error> {
        let invalid = || {
            OAuth2Error::Configuration(ConfigurationError::InvalidEndpoint {
                url: authority.to_string(),
            })
        };

        let url = url::Url::parse(authority).map_err(|_| invalid())?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            _ => Err(invalid()),
        }
    }
}

/// Create a new configuration builder.
pub fn token_lifecycle_config() -> TokenLifecycleConfigBuilder {
    TokenLifecycleConfigBuilder::new()
}
