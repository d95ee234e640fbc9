//! Revocation Types
//!
//! RFC 7009 request and outcome types.

use serde::{Deserialize, Serialize};

/// Token type hint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenTypeHint {
    AccessToken,
    RefreshToken,
}

impl TokenTypeHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessToken => "access_token",
            Self::RefreshToken => "refresh_token",
        }
    }
}

/// One revocation call, built per sweep entry and discarded afterwards.
#[derive(Clone)]
pub struct RevocationRequest {
    /// Full revocation endpoint address.
    pub address: String,
    /// Client identifier.
    pub client_id: String,
    /// Token to revoke.
    pub token: String,
    /// Optional token type hint.
    pub token_type_hint: Option<TokenTypeHint>,
}

impl RevocationRequest {
    /// Create a request without a type hint.
    pub fn new(
        address: impl Into<String>,
        client_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            client_id: client_id.into(),
            token: token.into(),
            token_type_hint: None,
        }
    }

    /// Set token type hint.
    pub fn with_token_type_hint(mut self, hint: TokenTypeHint) -> Self {
        self.token_type_hint = Some(hint);
        self
    }
}

impl std::fmt::Debug for RevocationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevocationRequest")
            .field("address", &self.address)
            .field("client_id", &self.client_id)
            .field("token", &crate::telemetry::redact_token(&self.token))
            .field("token_type_hint", &self.token_type_hint)
            .finish()
    }
}

/// Result of a single revocation call.
///
/// Rejection is an ordinary outcome, not a fault.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RevocationOutcome {
    /// The authority confirmed the revocation.
    Revoked,
    /// The authority answered but refused.
    Rejected {
        /// HTTP status, when a response was received.
        status: Option<u16>,
        /// RFC 7009 error code, from the body or inferred from the status.
        error_code: Option<String>,
        reason: String,
    },
    /// The authority could not be reached.
    TransportError { reason: String },
}

impl RevocationOutcome {
    pub fn is_revoked(&self) -> bool {
        matches!(self, Self::Revoked)
    }

    /// Short label for metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Revoked => "revoked",
            Self::Rejected { .. } => "rejected",
            Self::TransportError { .. } => "transport_error",
        }
    }

    /// Authority error code of a rejection.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Rejected { error_code, .. } => error_code.as_deref(),
            _ => None,
        }
    }

    /// Failure reason, `None` for `Revoked`.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Revoked => None,
            Self::Rejected { reason, .. } | Self::TransportError { reason } => Some(reason),
        }
    }
}

impl std::fmt::Display for RevocationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Revoked => write!(f, "revoked"),
            Self::Rejected {
                status: Some(status),
                reason,
                ..
            } => write!(f, "rejected (HTTP {}): {}", status, reason),
            Self::Rejected {
                status: None,
                reason,
                ..
            } => write!(f, "rejected: {}", reason),
            Self::TransportError { reason } => write!(f, "transport error: {}", reason),
        }
    }
}
