//! Token Lifecycle Types
//!
//! Data structures for authentication state, configuration, and revocation.

pub mod auth;
pub mod config;
pub mod revocation;

pub use auth::*;
pub use config::*;
pub use revocation::*;
