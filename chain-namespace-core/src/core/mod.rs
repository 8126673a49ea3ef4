//! Core coordinator functionality
//!
//! This module contains the namespace registry, wallet approval sync,
//! session namespace translation and the network switch coordinator.

pub mod approval;
pub mod coordinator;
pub mod registry;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use approval::ApprovalSync;
pub use coordinator::{ChainPhase, ChainSnapshot, NetworkSwitchCoordinator, SubscriptionId};
pub use registry::NamespaceRegistry;
pub use session::UniversalNetworkClient;
