//! Authentication State Observer
//!
//! Hook through which the surrounding authentication flow reports state.

use async_trait::async_trait;

use crate::token::{AccessTokenSource, TokenLifecycleManager, TokenRevoker};
use crate::types::AuthenticationState;

/// Receiver of authentication state observations.
///
/// Implementations must never fail or block the authentication flow.
#[async_trait]
pub trait AuthStateObserver: Send + Sync {
    /// The authentication state changed (login, refresh, logout).
    async fn on_authentication_state_changed(&self, state: &AuthenticationState);

    /// The authentication state was explicitly queried.
    async fn on_authentication_state_requested(&self, state: &AuthenticationState);
}

#[async_trait]
impl<S: AccessTokenSource, R: TokenRevoker> AuthStateObserver for TokenLifecycleManager<S, R> {
    async fn on_authentication_state_changed(&self, state: &AuthenticationState) {
        let outcome = self.observe(state).await;
        tracing::trace!(?outcome, "Authentication state change observed");
    }

    async fn on_authentication_state_requested(&self, state: &AuthenticationState) {
        let outcome = self.observe(state).await;
        tracing::trace!(?outcome, "Authentication state query observed");
    }
}
