//! Session Authentication State Provider
//!
//! Fronts the application's authentication state source. Every state query
//! keeps the cached application configuration in sync with the login state
//! and drives the token observer.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::error::{OAuth2Error, TokenError};
use crate::observer::AuthStateObserver;
use crate::telemetry::{Logger, TokenLogContext, TracingLogger};
use crate::types::AuthenticationState;

/// Source of the raw authentication state.
#[async_trait]
pub trait AuthenticationStateSource: Send + Sync {
    /// Resolve the current authentication state.
    async fn get_authentication_state(&self) -> Result<AuthenticationState, OAuth2Error>;
}

/// Cached application configuration, used as the server's view of the user.
#[async_trait]
pub trait ApplicationConfigurationClient: Send + Sync {
    /// Whether the cached configuration considers the current user authenticated.
    async fn is_current_user_authenticated(&self) -> bool;

    /// Reload the cached configuration.
    async fn initialize(&self) -> Result<(), OAuth2Error>;
}

/// Authentication state provider wired to a token observer.
pub struct SessionAuthenticationStateProvider<A, C, O>
where
    A: AuthenticationStateSource,
    C: ApplicationConfigurationClient,
    O: AuthStateObserver,
{
    state_source: Arc<A>,
    app_config: Arc<C>,
    observer: Arc<O>,
    logger: Arc<dyn Logger>,
}

impl<A, C, O> SessionAuthenticationStateProvider<A, C, O>
where
    A: AuthenticationStateSource,
    C: ApplicationConfigurationClient,
    O: AuthStateObserver,
{
    /// Create new provider.
    pub fn new(state_source: Arc<A>, app_config: Arc<C>, observer: Arc<O>) -> Self {
        Self {
            state_source,
            app_config,
            observer,
            logger: Arc::new(TracingLogger),
        }
    }

    /// Replace the logging sink.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Resolve the authentication state and run one observation cycle.
    ///
    /// Only a failure of the state source itself is returned; token
    /// bookkeeping and configuration sync never fail the query.
    pub async fn get_authentication_state(&self) -> Result<AuthenticationState, OAuth2Error> {
        let state = self.state_source.get_authentication_state().await?;

        if state.is_authenticated && !self.app_config.is_current_user_authenticated().await {
            if let Err(e) = self.app_config.initialize().await {
                let context = TokenLogContext::new()
                    .operation("initialize_application_configuration")
                    .extra("error_code", e.error_code());
                self.logger.warn(
                    &format!("Failed to refresh application configuration: {}", e),
                    &context,
                );
            }
        }

        self.observer.on_authentication_state_requested(&state).await;

        Ok(state)
    }

    /// Forward a state-change notification to the observer.
    pub async fn notify_state_changed(&self, state: &AuthenticationState) {
        self.observer.on_authentication_state_changed(state).await;
    }
}

/// Mock authentication state source for testing.
#[derive(Default)]
pub struct MockAuthenticationStateSource {
    state: Mutex<AuthenticationState>,
    should_fail: Mutex<bool>,
}

impl MockAuthenticationStateSource {
    /// Create new mock source reporting the given state.
    pub fn new(state: AuthenticationState) -> Self {
        Self {
            state: Mutex::new(state),
            should_fail: Mutex::new(false),
        }
    }

    /// Set the reported state.
    pub fn set_state(&self, state: AuthenticationState) -> &Self {
        *self.state.lock() = state;
        self
    }

    /// Set source to fail.
    pub fn set_should_fail(&self, should_fail: bool) -> &Self {
        *self.should_fail.lock() = should_fail;
        self
    }
}

#[async_trait]
impl AuthenticationStateSource for MockAuthenticationStateSource {
    async fn get_authentication_state(&self) -> Result<AuthenticationState, OAuth2Error> {
        if *self.should_fail.lock() {
            return Err(OAuth2Error::Token(TokenError::StateUnavailable {
                message: "Mock state source failure".to_string(),
            }));
        }
        Ok(self.state.lock().clone())
    }
}

/// Mock application configuration client for testing.
#[derive(Default)]
pub struct MockApplicationConfigurationClient {
    authenticated: Mutex<bool>,
    initialize_results: Mutex<VecDeque<Result<(), OAuth2Error>>>,
    initialize_count: Mutex<usize>,
}

impl MockApplicationConfigurationClient {
    /// Create new mock client.
    pub fn new(authenticated: bool) -> Self {
        Self {
            authenticated: Mutex::new(authenticated),
            ..Default::default()
        }
    }

    /// Queue a one-shot result for `initialize`.
    pub fn queue_initialize_result(&self, result: Result<(), OAuth2Error>) -> &Self {
        self.initialize_results.lock().push_back(result);
        self
    }

    /// Number of `initialize` calls.
    pub fn initialize_count(&self) -> usize {
        *self.initialize_count.lock()
    }
}

#[async_trait]
impl ApplicationConfigurationClient for MockApplicationConfigurationClient {
    async fn is_current_user_authenticated(&self) -> bool {
        *self.authenticated.lock()
    }

    async fn initialize(&self) -> Result<(), OAuth2Error> {
        *self.initialize_count.lock() += 1;

        let result = self.initialize_results.lock().pop_front().unwrap_or(Ok(()));
        if result.is_ok() {
            *self.authenticated.lock() = true;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::token_lifecycle_config;
    use crate::telemetry::{InMemoryLogger, LogLevel};
    use crate::token::{MockAccessTokenSource, MockTokenRevoker, TokenLifecycleManager, TokenSet};

    type Manager = TokenLifecycleManager<MockAccessTokenSource, MockTokenRevoker>;
    type Provider = SessionAuthenticationStateProvider<
        MockAuthenticationStateSource,
        MockApplicationConfigurationClient,
        Manager,
    >;

    struct Harness {
        provider: Provider,
        state_source: Arc<MockAuthenticationStateSource>,
        app_config: Arc<MockApplicationConfigurationClient>,
        token_source: Arc<MockAccessTokenSource>,
        tokens: Arc<TokenSet>,
        revoker: Arc<MockTokenRevoker>,
        logger: Arc<InMemoryLogger>,
    }

    fn harness(state: AuthenticationState, app_authenticated: bool) -> Harness {
        let config = token_lifecycle_config()
            .authority("https://auth.example.com")
            .client_id("spa-client")
            .build()
            .unwrap();
        let tokens = Arc::new(TokenSet::new());
        let token_source = Arc::new(MockAccessTokenSource::with_token("tok1"));
        let revoker = Arc::new(MockTokenRevoker::new());
        let manager = Arc::new(TokenLifecycleManager::with_components(
            config,
            tokens.clone(),
            token_source.clone(),
            revoker.clone(),
        ));
        let state_source = Arc::new(MockAuthenticationStateSource::new(state));
        let app_config = Arc::new(MockApplicationConfigurationClient::new(app_authenticated));
        let logger = Arc::new(InMemoryLogger::new());
        let provider =
            SessionAuthenticationStateProvider::new(state_source.clone(), app_config.clone(), manager)
                .with_logger(logger.clone());

        Harness {
            provider,
            state_source,
            app_config,
            token_source,
            tokens,
            revoker,
            logger,
        }
    }

    #[tokio::test]
    async fn test_query_records_token_and_returns_state() {
        let h = harness(AuthenticationState::authenticated("alice"), true);

        let state = h.provider.get_authentication_state().await.unwrap();

        assert_eq!(state, AuthenticationState::authenticated("alice"));
        assert!(h.tokens.contains("tok1"));
        assert_eq!(h.app_config.initialize_count(), 0);
    }

    #[tokio::test]
    async fn test_stale_application_configuration_is_reinitialized() {
        let h = harness(AuthenticationState::authenticated("alice"), false);

        h.provider.get_authentication_state().await.unwrap();
        assert_eq!(h.app_config.initialize_count(), 1);

        h.provider.get_authentication_state().await.unwrap();
        assert_eq!(h.app_config.initialize_count(), 1);
    }

    #[tokio::test]
    async fn test_initialize_failure_is_logged_not_propagated() {
        let h = harness(AuthenticationState::authenticated("alice"), false);
        h.app_config
            .queue_initialize_result(Err(OAuth2Error::Token(TokenError::ConfigurationSyncFailed {
                message: "503".to_string(),
            })));

        let state = h.provider.get_authentication_state().await;

        assert!(state.is_ok());
        assert_eq!(h.logger.get_entries_by_level(LogLevel::Warn).len(), 1);
        assert!(h.tokens.contains("tok1"));
    }

    #[tokio::test]
    async fn test_anonymous_query_skips_sync_and_tokens() {
        let h = harness(AuthenticationState::anonymous(), false);

        let state = h.provider.get_authentication_state().await.unwrap();

        assert!(!state.is_authenticated);
        assert_eq!(h.app_config.initialize_count(), 0);
        assert!(h.tokens.is_empty());
    }

    #[tokio::test]
    async fn test_state_source_failure_is_propagated() {
        let h = harness(AuthenticationState::authenticated("alice"), true);
        h.state_source.set_should_fail(true);

        let result = h.provider.get_authentication_state().await;

        assert!(result.is_err());
        assert!(h.tokens.is_empty());
    }

    #[tokio::test]
    async fn test_state_change_notification_sweeps() {
        let h = harness(AuthenticationState::authenticated("alice"), true);
        h.provider.get_authentication_state().await.unwrap();

        h.token_source.set_token(Some("tok2".to_string()));
        h.provider
            .notify_state_changed(&AuthenticationState::authenticated("alice"))
            .await;

        assert_eq!(h.revoker.get_attempted_tokens(), vec!["tok1"]);
        assert_eq!(h.tokens.snapshot(), vec!["tok2".to_string()]);
    }
}
