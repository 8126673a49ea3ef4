//! Domain layer - entities and repositories
//!
//! This module contains the data model of the coordinator: networks,
//! per-namespace state and the persistence contract.

pub mod entities;
pub mod repositories;

// Re-export domain components
pub use entities::*;
pub use repositories::*;
