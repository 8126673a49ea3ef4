//! Domain entities and value objects
//!
//! This module contains the core domain entities and value objects
//! that represent chains and the namespaces they belong to.

pub mod network;
pub mod namespace_state;

// Re-export entities
pub use network::*;
pub use namespace_state::*;
