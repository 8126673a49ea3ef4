//! Domain repositories
//!
//! This module contains the persistence contract for the last active
//! namespace and network.

pub mod storage_repository;

// Re-export repositories
pub use storage_repository::*;
