//! Metrics
//!
//! Revocation metrics interfaces and implementations.

use parking_lot::Mutex;
use std::collections::HashMap;

/// Revocation metrics interface.
pub trait RevocationMetrics: Send + Sync {
    /// Record one revocation call by outcome label (`revoked`, `rejected`, `transport_error`).
    fn record_token_revocation(&self, outcome: &str);

    /// Set the number of tracked tokens.
    fn set_tracked_tokens(&self, count: u64);

    /// Record a sweep and the number of candidates it attempted.
    fn record_sweep(&self, candidates: usize);
}

/// No-op metrics implementation.
pub struct NoOpMetrics;

impl RevocationMetrics for NoOpMetrics {
    fn record_token_revocation(&self, _outcome: &str) {}
    fn set_tracked_tokens(&self, _count: u64) {}
    fn record_sweep(&self, _candidates: usize) {}
}

/// In-memory metrics for testing.
#[derive(Default)]
pub struct InMemoryMetrics {
    revocations: Mutex<HashMap<String, u64>>,
    tracked_tokens: Mutex<u64>,
    sweeps: Mutex<Vec<usize>>,
}

impl InMemoryMetrics {
    /// Create new in-memory metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Revocation count for an outcome label.
    pub fn revocations(&self, outcome: &str) -> u64 {
        self.revocations.lock().get(outcome).copied().unwrap_or(0)
    }

    /// Last reported tracked-token gauge.
    pub fn tracked_tokens(&self) -> u64 {
        *self.tracked_tokens.lock()
    }

    /// Candidate counts of every recorded sweep.
    pub fn sweeps(&self) -> Vec<usize> {
        self.sweeps.lock().clone()
    }
}

impl RevocationMetrics for InMemoryMetrics {
    fn record_token_revocation(&self, outcome: &str) {
        *self
            .revocations
            .lock()
            .entry(outcome.to_string())
            .or_insert(0) += 1;
    }

    fn set_tracked_tokens(&self, count: u64) {
        *self.tracked_tokens.lock() = count;
    }

    fn record_sweep(&self, candidates: usize) {
        self.sweeps.lock().push(candidates);
    }
}
