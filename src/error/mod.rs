//! Error Types
//!
//! Error hierarchy for token bookkeeping and revocation.

use std::time::Duration;
use thiserror::Error;

/// Root error type for the token lifecycle integration.
#[derive(Error, Debug)]
pub enum OAuth2Error {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl OAuth2Error {
    /// Get error code for telemetry.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "OAUTH2_CONFIG",
            Self::Token(_) => "OAUTH2_TOKEN",
            Self::Network(_) => "OAUTH2_NETWORK",
            Self::Protocol(_) => "OAUTH2_PROTOCOL",
            Self::Provider(_) => "OAUTH2_PROVIDER",
        }
    }

    /// Whether the authority could not be reached or the connection broke.
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Missing required field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid endpoint URL: {url}")]
    InvalidEndpoint { url: String },
}

/// Token-related error.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Access token unavailable: {message}")]
    Unavailable { message: String },

    #[error("Authentication state unavailable: {message}")]
    StateUnavailable { message: String },

    #[error("Application configuration sync failed: {message}")]
    ConfigurationSyncFailed { message: String },
}

/// Network/transport error.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Request timeout after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("HTTP client initialization failed: {message}")]
    ClientInit { message: String },
}

/// Protocol/response handling error.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Unexpected redirect to: {location}")]
    UnexpectedRedirect { location: String },

    #[error("Response too large: {size} bytes")]
    ResponseTooLarge { size: usize },
}

/// Provider (authority) error.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Invalid client credentials")]
    InvalidClient { error_description: Option<String> },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Unauthorized client")]
    UnauthorizedClient { error_description: Option<String> },

    #[error("Unsupported token type")]
    UnsupportedTokenType { error_description: Option<String> },

    #[error("Server error: {message}")]
    ServerError { message: String },

    #[error("Server temporarily unavailable")]
    TemporarilyUnavailable { error_description: Option<String> },
}

impl ProviderError {
    /// RFC 7009 error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidClient { .. } => "invalid_client",
            Self::InvalidRequest { .. } => "invalid_request",
            Self::UnauthorizedClient { .. } => "unauthorized_client",
            Self::UnsupportedTokenType { .. } => "unsupported_token_type",
            Self::ServerError { .. } => "server_error",
            Self::TemporarilyUnavailable { .. } => "temporarily_unavailable",
        }
    }
}

/// Result type for token lifecycle operations.
pub type OAuth2Result<T> = Result<T, OAuth2Error>;

/// OAuth2 error response from the authority.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct OAuth2ErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub error_uri: Option<String>,
}

impl OAuth2ErrorResponse {
    /// Render as `error: description`.
    pub fn describe(&self) -> String {
        match &self.error_description {
            Some(description) if !description.is_empty() => {
                format!("{}: {}", self.error, description)
            }
            _ => self.error.clone(),
        }
    }
}

/// Map a revocation error response (RFC 7009 Section 2.2.1) to an error type.
pub fn map_revocation_error(response: &OAuth2ErrorResponse) -> ProviderError {
    match response.error.as_str() {
        "invalid_client" => ProviderError::InvalidClient {
            error_description: response.error_description.clone(),
        },
        "unauthorized_client" => ProviderError::UnauthorizedClient {
            error_description: response.error_description.clone(),
        },
        "unsupported_token_type" => ProviderError::UnsupportedTokenType {
            error_description: response.error_description.clone(),
        },
        "server_error" => ProviderError::ServerError {
            message: response
                .error_description
                .clone()
                .unwrap_or_else(|| "Server error".to_string()),
        },
        "temporarily_unavailable" => ProviderError::TemporarilyUnavailable {
            error_description: response.error_description.clone(),
        },
        _ => ProviderError::InvalidRequest {
            message: response
                .error_description
                .clone()
                .unwrap_or_else(|| response.error.clone()),
        },
    }
}

/// Parse error response from HTTP body.
pub fn parse_error_response(body: &str) -> Option<OAuth2ErrorResponse> {
    serde_json::from_str(body).ok()
}

/// Create error from HTTP response.
pub fn create_error_from_response(status: u16, body: &str) -> OAuth2Error {
    if let Some(response) = parse_error_response(body) {
        return OAuth2Error::Provider(map_revocation_error(&response));
    }

    let error = match status {
        400 => ProviderError::InvalidRequest {
            message: "Bad request".to_string(),
        },
        401 => ProviderError::InvalidClient {
            error_description: Some("Unauthorized".to_string()),
        },
        403 => ProviderError::UnauthorizedClient {
            error_description: Some("Forbidden".to_string()),
        },
        429 | 503 => ProviderError::TemporarilyUnavailable {
            error_description: None,
        },
        _ => ProviderError::ServerError {
            message: format!("HTTP {}", status),
        },
    };

    OAuth2Error::Provider(error)
}

/// Human-readable reason for a rejected response.
///
/// Prefers the provider's `error`/`error_description`, then the raw body,
/// then the bare status.
pub fn describe_error_response(status: u16, body: &str) -> String {
    if let Some(response) = parse_error_response(body) {
        return response.describe();
    }

    let raw = body.trim();
    if raw.is_empty() {
        format!("HTTP {}", status)
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_failure_classification() {
        assert!(OAuth2Error::Network(NetworkError::Timeout {
            timeout: Duration::from_secs(30)
        })
        .is_transport_failure());
        assert!(!OAuth2Error::Provider(ProviderError::ServerError {
            message: "boom".to_string()
        })
        .is_transport_failure());
        assert!(!OAuth2Error::Protocol(ProtocolError::UnexpectedRedirect {
            location: "/login".to_string()
        })
        .is_transport_failure());
    }

    #[test]
    fn test_parse_error_response() {
        let body = r#"{"error":"unsupported_token_type","error_description":"Only access tokens"}"#;
        let response = parse_error_response(body).unwrap();
        assert_eq!(response.error, "unsupported_token_type");
        assert_eq!(response.describe(), "unsupported_token_type: Only access tokens");

        let error = map_revocation_error(&response);
        assert!(matches!(error, ProviderError::UnsupportedTokenType { .. }));
        assert_eq!(error.code(), "unsupported_token_type");

        let unknown = parse_error_response(r#"{"error":"invalid_token"}"#).unwrap();
        assert_eq!(map_revocation_error(&unknown).code(), "invalid_request");
    }

    #[test]
    fn test_create_error_from_status() {
        let error = create_error_from_response(401, "");
        assert!(matches!(
            error,
            OAuth2Error::Provider(ProviderError::InvalidClient { .. })
        ));
        assert_eq!(error.error_code(), "OAUTH2_PROVIDER");

        let error = create_error_from_response(502, "<html>bad gateway</html>");
        assert!(matches!(
            error,
            OAuth2Error::Provider(ProviderError::ServerError { .. })
        ));

        let error = create_error_from_response(503, "");
        assert!(matches!(
            error,
            OAuth2Error::Provider(ProviderError::TemporarilyUnavailable { .. })
        ));
    }

    #[test]
    fn test_describe_error_response() {
        assert_eq!(
            describe_error_response(400, r#"{"error":"invalid_client"}"#),
            "invalid_client"
        );
        assert_eq!(describe_error_response(500, " upstream down \n"), "upstream down");
        assert_eq!(describe_error_response(503, ""), "HTTP 503");
    }
}
