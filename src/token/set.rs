//! Token Set
//!
//! Process-wide set of access tokens issued to the current session.

use parking_lot::RwLock;
use std::collections::HashSet;

/// Concurrency-safe set of known access tokens.
///
/// Every operation holds the lock only for the duration of a single
/// insert, remove, or copy. Callers never need external locking.
#[derive(Default)]
pub struct TokenSet {
    tokens: RwLock<HashSet<String>>,
}

impl TokenSet {
    /// Create an empty token set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a token if absent. Returns whether it was newly inserted.
    pub fn add(&self, token: &str) -> bool {
        if self.tokens.read().contains(token) {
            return false;
        }
        self.tokens.write().insert(token.to_string())
    }

    /// Remove a token if present. Returns whether removal occurred.
    pub fn remove(&self, token: &str) -> bool {
        self.tokens.write().remove(token)
    }

    /// Whether the token is currently held.
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.read().contains(token)
    }

    /// Point-in-time copy of all held tokens, in unspecified order.
    pub fn snapshot(&self) -> Vec<String> {
        self.tokens.read().iter().cloned().collect()
    }

    /// Current size. Advisory only; may be stale once returned.
    pub fn len(&self) -> usize {
        self.tokens.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.read().is_empty()
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSet").field("len", &self.len()).finish()
    }
}
