//! Core Components
//!
//! Core infrastructure for talking to the authority.

pub mod transport;

pub use transport::*;
