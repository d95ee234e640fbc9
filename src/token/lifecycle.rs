//! Token Lifecycle Manager
//!
//! Records every access token observed for the session and revokes the
//! stale ones once a fresher token exists.
//!
//! One observation cycle:
//!
//! 1. Skip unless the observed state is authenticated.
//! 2. Ask the token source for the current token; skip if none.
//! 3. Add it to the [`TokenSet`].
//! 4. Skip the sweep when at most one token is known, or when the
//!    authority/client id are not configured.
//! 5. Re-resolve the current token, snapshot the set, and revoke every
//!    other token. Confirmed revocations leave the set; failures stay for
//!    a later cycle and are logged.
//!
//! Cycles are not mutually exclusive. The set is never locked while a
//! revocation call is in flight.

use futures::stream::{self, StreamExt};
use std::sync::Arc;

use crate::core::ReqwestHttpTransport;
use crate::error::OAuth2Error;
use crate::telemetry::{
    redact_token, Logger, NoOpMetrics, RevocationMetrics, TokenLogContext, TracingLogger,
};
use crate::token::{AccessTokenSource, DefaultTokenRevoker, TokenRevoker, TokenSet};
use crate::types::{
    AuthenticationState, RevocationOutcome, RevocationRequest, TokenLifecycleConfig,
};

/// Result of one observation cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The observed user was not authenticated; nothing recorded.
    Unauthenticated,
    /// No current access token could be obtained; nothing recorded.
    NoAccessToken,
    /// The current token was recorded and the sweep step ran.
    Recorded(SweepOutcome),
}

/// Result of the sweep step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepOutcome {
    /// Zero or one token known.
    BelowThreshold,
    /// Authority address or client id absent; tokens are left alone.
    NotConfigured,
    /// The token in active use could not be determined.
    NoCurrentToken,
    /// Every candidate was processed.
    Completed(SweepReport),
}

/// Per-sweep summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Number of tokens a revocation was attempted for.
    pub candidates: usize,
    /// Tokens confirmed revoked and removed from the set.
    pub revoked: Vec<String>,
    /// Tokens that stay in the set, with the failed outcome.
    pub failed: Vec<(String, RevocationOutcome)>,
}

/// Token lifecycle manager.
pub struct TokenLifecycleManager<S: AccessTokenSource, R: TokenRevoker> {
    config: TokenLifecycleConfig,
    tokens: Arc<TokenSet>,
    source: Arc<S>,
    revoker: Arc<R>,
    logger: Arc<dyn Logger>,
    metrics: Arc<dyn RevocationMetrics>,
}

impl<S: AccessTokenSource> TokenLifecycleManager<S, DefaultTokenRevoker<ReqwestHttpTransport>> {
    /// Create a manager revoking over HTTP with reqwest.
    pub fn new(
        config: TokenLifecycleConfig,
        tokens: Arc<TokenSet>,
        source: Arc<S>,
    ) -> Result<Self, OAuth2Error> {
        let transport = Arc::new(ReqwestHttpTransport::with_options(
            config.timeout,
            crate::core::DEFAULT_MAX_RESPONSE_SIZE,
        )?);

        let mut revoker = DefaultTokenRevoker::new(transport).with_timeout(config.timeout);
        if let Some(secret) = &config.credentials.client_secret {
            revoker = revoker.with_client_secret(secret.clone(), config.credentials.auth_method);
        }

        Ok(Self::with_components(config, tokens, source, Arc::new(revoker)))
    }
}

impl<S: AccessTokenSource, R: TokenRevoker> TokenLifecycleManager<S, R> {
    /// Create a manager with custom components.
    pub fn with_components(
        config: TokenLifecycleConfig,
        tokens: Arc<TokenSet>,
        source: Arc<S>,
        revoker: Arc<R>,
    ) -> Self {
        Self {
            config,
            tokens,
            source,
            revoker,
            logger: Arc::new(TracingLogger),
            metrics: Arc::new(NoOpMetrics),
        }
    }

    /// Replace the logging sink.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Replace the metrics sink.
    pub fn with_metrics(mut self, metrics: Arc<dyn RevocationMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &TokenLifecycleConfig {
        &self.config
    }

    /// Get the shared token set.
    pub fn tokens(&self) -> &Arc<TokenSet> {
        &self.tokens
    }

    /// Run one observation cycle. Never fails.
    pub async fn observe(&self, state: &AuthenticationState) -> CycleOutcome {
        if !state.is_authenticated {
            tracing::debug!("Skipping token bookkeeping for unauthenticated state");
            return CycleOutcome::Unauthenticated;
        }

        let Some(observed) = self.find_access_token().await else {
            return CycleOutcome::NoAccessToken;
        };

        if self.tokens.add(&observed) {
            tracing::debug!(token = %redact_token(&observed), "Tracking new access token");
        }
        self.metrics.set_tracked_tokens(self.tokens.len() as u64);

        CycleOutcome::Recorded(self.sweep(Some(&observed)).await)
    }

    /// Revoke every known token except the one currently in use.
    ///
    /// Skips with [`SweepOutcome::NoCurrentToken`] when the source cannot
    /// name the current token.
    pub async fn revoke_stale_tokens(&self) -> SweepOutcome {
        self.sweep(None).await
    }

    async fn sweep(&self, observed: Option<&str>) -> SweepOutcome {
        if self.tokens.len() <= 1 {
            return SweepOutcome::BelowThreshold;
        }

        let (Some(address), Some(client_id)) =
            (self.config.revocation_endpoint(), self.config.client_id())
        else {
            tracing::debug!(
                tracked = self.tokens.len(),
                "Token revocation not configured; leaving tokens in place"
            );
            return SweepOutcome::NotConfigured;
        };

        // A newer token may have been issued since the observation.
        let current = match (self.find_access_token().await, observed) {
            (Some(current), _) => current,
            (None, Some(observed)) => observed.to_string(),
            (None, None) => {
                tracing::debug!("Current access token unknown; skipping sweep");
                return SweepOutcome::NoCurrentToken;
            }
        };

        let candidates: Vec<String> = self
            .tokens
            .snapshot()
            .into_iter()
            .filter(|token| *token != current)
            .collect();
        self.metrics.record_sweep(candidates.len());

        let mut report = SweepReport {
            candidates: candidates.len(),
            ..Default::default()
        };

        let results: Vec<(String, RevocationOutcome)> = stream::iter(candidates)
            .map(|token| {
                let mut request = RevocationRequest::new(address.as_str(), client_id, token.as_str());
                request.token_type_hint = self.config.token_type_hint;
                async move {
                    let outcome = self.revoker.revoke(&request).await;
                    self.record_outcome(&request, &outcome);
                    (token, outcome)
                }
            })
            .buffer_unordered(self.config.max_concurrent_revocations.max(1))
            .collect()
            .await;

        for (token, outcome) in results {
            if outcome.is_revoked() {
                report.revoked.push(token);
            } else {
                report.failed.push((token, outcome));
            }
        }

        self.metrics.set_tracked_tokens(self.tokens.len() as u64);
        SweepOutcome::Completed(report)
    }

    fn record_outcome(&self, request: &RevocationRequest, outcome: &RevocationOutcome) {
        self.metrics.record_token_revocation(outcome.as_str());

        if outcome.is_revoked() {
            self.tokens.remove(&request.token);
            tracing::debug!(token = %redact_token(&request.token), "Revoked stale access token");
            return;
        }

        let mut context = TokenLogContext::new()
            .operation("revoke_token")
            .client_id(request.client_id.as_str())
            .token(&request.token)
            .extra("outcome", outcome.as_str());
        if let Some(code) = outcome.error_code() {
            context = context.extra("error_code", code);
        }
        self.logger
            .error(&format!("Failed to revoke access token: {}", outcome), &context);
    }

    async fn find_access_token(&self) -> Option<String> {
        match self.source.current_access_token().await {
            Ok(Some(token)) if !token.trim().is_empty() => Some(token),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(error = %e, "Access token lookup failed");
                None
            }
        }
    }
}
