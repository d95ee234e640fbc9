//! Token Management
//!
//! Token bookkeeping and stale token revocation.
//!
//! This module provides:
//!
//! - **Token Set**: Concurrency-safe set of tokens issued to the session
//! - **Token Source**: Boundary to the flow that issues the current token
//! - **Token Revocation**: RFC 7009 token revocation
//! - **Lifecycle Manager**: Observation cycle that records and sweeps tokens

pub mod lifecycle;
pub mod revocation;
pub mod set;
pub mod source;

// Token Set
pub use set::TokenSet;

// Token Source
pub use source::{AccessTokenSource, MockAccessTokenSource};

// Token Revocation
pub use revocation::{DefaultTokenRevoker, MockTokenRevoker, TokenRevoker};

// Lifecycle Manager
pub use lifecycle::{CycleOutcome, SweepOutcome, SweepReport, TokenLifecycleManager};
