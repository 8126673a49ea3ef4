//! Infrastructure layer - storage backends and configuration
//!
//! This module contains the concrete persistence adapters and the loader for
//! coordinator options (defaults, optional config file, environment).

pub mod config;
pub mod platform;

// Re-export infrastructure components
pub use self::config::*;
pub use self::platform::*;
