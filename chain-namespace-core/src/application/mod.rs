//! Application layer - ports
//!
//! This module contains the collaborator contracts the coordinator consumes
//! (providers, connector filtering) and notifies (public state, navigation,
//! analytics, send flow).

pub mod ports;

// Re-export application components
pub use ports::*;
