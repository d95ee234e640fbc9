//! Telemetry
//!
//! Observability components for token lifecycle operations.
//!
//! This module provides:
//!
//! - **Logging**: Logging sink with redacted token context
//! - **Metrics**: Revocation counters and tracked-token gauge

pub mod logging;
pub mod metrics;

// Logging
pub use logging::{
    redact_token, InMemoryLogger, LogEntry, LogLevel, Logger, NoOpLogger, TokenLogContext,
    TracingLogger,
};

// Metrics
pub use metrics::{InMemoryMetrics, NoOpMetrics, RevocationMetrics};
