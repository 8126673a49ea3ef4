//! Error handling for the namespace coordinator
//!
//! This module defines the error types used throughout the coordinator.
//! `CoordinatorError` is what callers see; `ProviderError` is what the
//! wallet/provider collaborators report back to the coordinator.

use thiserror::Error;

/// Coordinator error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Namespace not found: {0}")]
    NamespaceNotFound(String),

    #[error("No networks found for namespace: {0}")]
    NoNetworksForNamespace(String),

    #[error("Network controller client not set: {0}")]
    ClientNotSet(String),

    #[error("Switch already in progress: {0}")]
    SwitchInProgress(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoordinatorError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Create a namespace not found error
    pub fn namespace_not_found(namespace: impl Into<String>) -> Self {
        Self::NamespaceNotFound(namespace.into())
    }

    /// Create a no networks error
    pub fn no_networks(namespace: impl Into<String>) -> Self {
        Self::NoNetworksForNamespace(namespace.into())
    }

    /// Create a client not set error
    pub fn client_not_set(namespace: impl Into<String>) -> Self {
        Self::ClientNotSet(namespace.into())
    }

    /// Create a switch in progress error
    pub fn switch_in_progress(message: impl Into<String>) -> Self {
        Self::SwitchInProgress(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// True when the failure came from the wallet declining a request
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Provider(ProviderError::Rejected(_)))
    }
}

/// Errors reported by a connector/provider collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("request rejected by wallet: {0}")]
    Rejected(String),

    #[error("provider unreachable: {0}")]
    Unreachable(String),

    #[error("no active session")]
    NoSession,

    #[error("request failed: {0}")]
    Request(String),
}

impl ProviderError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable(message.into())
    }

    pub fn request(message: impl Into<String>) -> Self {
        Self::Request(message.into())
    }
}

// Standard library error conversions
impl From<std::io::Error> for CoordinatorError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for CoordinatorError {
    fn from(err: serde_json::Error) -> Self {
        Self::storage(format!("JSON error: {}", err))
    }
}

impl From<config::ConfigError> for CoordinatorError {
    fn from(err: config::ConfigError) -> Self {
        Self::config(err.to_string())
    }
}

impl From<tokio::sync::TryLockError> for CoordinatorError {
    fn from(err: tokio::sync::TryLockError) -> Self {
        Self::switch_in_progress(err.to_string())
    }
}

pub type CoordinatorResult<T> = Result<T, CoordinatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinator_error_creation() {
        let config_error = CoordinatorError::config("Invalid configuration");
        let no_networks = CoordinatorError::no_networks("solana");
        let validation_error = CoordinatorError::validation("Invalid input");

        assert!(matches!(config_error, CoordinatorError::Config(_)));
        assert!(matches!(no_networks, CoordinatorError::NoNetworksForNamespace(_)));
        assert!(matches!(validation_error, CoordinatorError::Validation(_)));
    }

    #[test]
    fn test_error_conversions() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: CoordinatorError = io_error.into();
        assert!(matches!(error, CoordinatorError::Storage(_)));

        let error: CoordinatorError = ProviderError::rejected("user declined").into();
        assert!(error.is_rejection());
        let error: CoordinatorError = ProviderError::NoSession.into();
        assert!(!error.is_rejection());
    }

    #[test]
    fn test_error_display() {
        let error = CoordinatorError::no_networks("bip122");
        let display = format!("{}", error);

        assert!(display.contains("No networks found for namespace"));
        assert!(display.contains("bip122"));
    }
}
