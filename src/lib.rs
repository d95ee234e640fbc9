//! OAuth2 Token Lifecycle Module
//!
//! Bookkeeping for the access tokens issued to one logged-in session, with
//! proactive revocation of every token that has been superseded.
//!
//! # Features
//!
//! - Concurrency-safe set of issued access tokens
//! - Token Revocation (RFC 7009) against a configurable authority endpoint
//! - Observation cycle that records the current token and sweeps stale ones
//! - Hook for the surrounding authentication flow
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use oauth2_token_lifecycle::{
//!     token_lifecycle_config, AuthenticationState, TokenLifecycleManager, TokenSet,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = token_lifecycle_config()
//!         .authority("https://auth.example.com")
//!         .client_id("spa-client")
//!         .build()?;
//!
//!     // One set per process, shared by every observation cycle
//!     let tokens = Arc::new(TokenSet::new());
//!     let manager = TokenLifecycleManager::new(config, tokens, Arc::new(MyTokenSource))?;
//!
//!     manager.observe(&AuthenticationState::authenticated("alice")).await;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `types`: Authentication state, configuration, and revocation types
//! - `error`: Error hierarchy with provider error mapping
//! - `core`: HTTP transport
//! - `token`: Token set, token source, revocation, and lifecycle manager
//! - `observer`: Authentication state observer hook
//! - `session`: Authentication state provider driving the observer
//! - `builders`: Fluent builders for configuration
//! - `telemetry`: Logging sink and metrics

pub mod builders;
pub mod core;
pub mod error;
pub mod observer;
pub mod session;
pub mod telemetry;
pub mod token;
pub mod types;

// Re-export builders
pub use builders::{token_lifecycle_config, TokenLifecycleConfigBuilder};

// Re-export errors
pub use error::{
    create_error_from_response, describe_error_response, map_revocation_error,
    parse_error_response, ConfigurationError, NetworkError, OAuth2Error, OAuth2ErrorResponse,
    OAuth2Result, ProtocolError, ProviderError, TokenError,
};

// Re-export types
pub use types::{
    // Auth
    AuthenticationState,
    // Config
    ClientAuthMethod, ClientCredentials, ProviderConfig, TokenLifecycleConfig,
    DEFAULT_TOKEN_REVOCATION_PATH,
    // Revocation
    RevocationOutcome, RevocationRequest, TokenTypeHint,
};

// Re-export core components
pub use crate::core::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MockHttpTransport, ReqwestHttpTransport,
};

// Re-export token management
pub use token::{
    // Set
    TokenSet,
    // Source
    AccessTokenSource, MockAccessTokenSource,
    // Revocation
    DefaultTokenRevoker, MockTokenRevoker, TokenRevoker,
    // Lifecycle
    CycleOutcome, SweepOutcome, SweepReport, TokenLifecycleManager,
};

// Re-export observer hook
pub use observer::AuthStateObserver;

// Re-export session provider
pub use session::{
    ApplicationConfigurationClient, AuthenticationStateSource, MockApplicationConfigurationClient,
    MockAuthenticationStateSource, SessionAuthenticationStateProvider,
};

// Re-export telemetry
pub use telemetry::{
    redact_token, InMemoryLogger, InMemoryMetrics, LogEntry, LogLevel, Logger, NoOpLogger,
    NoOpMetrics, RevocationMetrics, TokenLogContext, TracingLogger,
};
