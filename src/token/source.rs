//! Access Token Source
//!
//! Boundary to the surrounding authentication flow that issues access tokens.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::error::{OAuth2Error, TokenError};

/// Source of the session's current access token.
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    /// Request the current access token.
    ///
    /// `Ok(None)` means no token is available (e.g. a redirect is required).
    async fn current_access_token(&self) -> Result<Option<String>, OAuth2Error>;
}

/// Mock access token source for testing.
///
/// Queued results are consumed first, then the fixed token is returned.
#[derive(Default)]
pub struct MockAccessTokenSource {
    token: Mutex<Option<String>>,
    queued: Mutex<VecDeque<Result<Option<String>, OAuth2Error>>>,
    should_fail: Mutex<bool>,
    call_count: Mutex<usize>,
}

impl MockAccessTokenSource {
    /// Create new mock source with no token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create mock source returning a fixed token.
    pub fn with_token(token: impl Into<String>) -> Self {
        let source = Self::new();
        source.set_token(Some(token.into()));
        source
    }

    /// Set the fixed token.
    pub fn set_token(&self, token: Option<String>) -> &Self {
        *self.token.lock() = token;
        self
    }

    /// Queue a one-shot token.
    pub fn queue_token(&self, token: Option<&str>) -> &Self {
        self.queued.lock().push_back(Ok(token.map(String::from)));
        self
    }

    /// Queue a one-shot failure.
    pub fn queue_error(&self, error: OAuth2Error) -> &Self {
        self.queued.lock().push_back(Err(error));
        self
    }

    /// Set source to fail all lookups.
    pub fn set_should_fail(&self, should_fail: bool) -> &Self {
        *self.should_fail.lock() = should_fail;
        self
    }

    /// Number of lookups performed.
    pub fn call_count(&self) -> usize {
        *self.call_count.lock()
    }
}

#[async_trait]
impl AccessTokenSource for MockAccessTokenSource {
    async fn current_access_token(&self) -> Result<Option<String>, OAuth2Error> {
        *self.call_count.lock() += 1;

        if *self.should_fail.lock() {
            return Err(OAuth2Error::Token(TokenError::Unavailable {
                message: "Mock token source failure".to_string(),
            }));
        }

        if let Some(result) = self.queued.lock().pop_front() {
            return result;
        }

        Ok(self.token.lock().clone())
    }
}
