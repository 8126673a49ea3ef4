//! Chain Namespace Core
//!
//! Multi-namespace network state coordinator for wallet connection flows.
//! Tracks, per chain namespace, the networks the application requests and the
//! networks the connected wallet approves, and mediates every namespace and
//! network switch.
//!
//! ## Architecture
//!
//! - **Core**: Namespace registry, approval sync, session namespaces, switch coordinator
//! - **Domain**: Networks, namespace state and the persistence contract
//! - **Application**: Ports to the provider, connectors, UI and analytics
//! - **Infrastructure**: Storage backends and configuration loading
//! - **Shared**: Common types, constants, errors and utilities
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chain_namespace_core::{init_coordinator, MAINNET, SOLANA};
//!
//! # async fn run() -> Result<(), chain_namespace_core::CoordinatorError> {
//! let coordinator = init_coordinator(vec![MAINNET.clone(), SOLANA.clone()])?;
//! coordinator.switch_active_namespace(chain_namespace_core::ChainNamespace::Solana).await?;
//! assert_eq!(coordinator.active_caip_network().map(|n| n.name), Some("Solana".to_string()));
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

pub mod application;
pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use crate::application::ports::{
    ChainProvider, ConnectorController, EventsController, NavigationHooks, NetworkControllerClient,
    NoopPort, Ports, PublicStateProjector, SendController,
};
pub use crate::core::coordinator::{ChainPhase, ChainSnapshot, NetworkSwitchCoordinator, SubscriptionId};
pub use crate::core::registry::NamespaceRegistry;
pub use crate::core::session::{
    apply_namespace_overrides, create_namespaces, get_chains_from_namespaces, NamespaceConfig,
    NamespaceOverrides, UniversalNetworkClient,
};
pub use crate::domain::entities::namespace_state::NamespaceState;
pub use crate::domain::entities::network::{
    known_networks, CaipNetwork, NativeCurrency, BASE, BITCOIN, BITCOIN_TESTNET, MAINNET, POLYGON,
    SEPOLIA, SOLANA, SOLANA_DEVNET,
};
pub use crate::domain::repositories::storage_repository::{ActiveNetworkStore, StorageAdapter};
pub use crate::infrastructure::config::CoordinatorOptions;
pub use crate::infrastructure::platform::{FileStorage, MemoryStorage};
pub use crate::shared::error::{CoordinatorError, CoordinatorResult, ProviderError};
pub use crate::shared::types::{
    ApprovedNetworksData, CaipNetworkId, ChainId, ChainNamespace, ProviderEvent, PublicStatePatch,
    SwitchActiveNetworkOptions,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Initialize logging. Safe to call more than once.
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();
}

/// Build a coordinator from `.env`/environment configuration and seed it
/// with `networks`. Uses file storage when a storage path is configured.
pub fn init_coordinator(networks: Vec<CaipNetwork>) -> CoordinatorResult<NetworkSwitchCoordinator> {
    let options = CoordinatorOptions::load()?;
    init_coordinator_with(options, networks, Ports::default())
}

pub fn init_coordinator_with(
    options: CoordinatorOptions,
    networks: Vec<CaipNetwork>,
    ports: Ports,
) -> CoordinatorResult<NetworkSwitchCoordinator> {
    let storage: Arc<dyn StorageAdapter> = match &options.storage_path {
        Some(path) => Arc::new(FileStorage::new(path.clone())?),
        None => Arc::new(MemoryStorage::new()),
    };
    log::info!(
        "Initializing {} v{} with {} network(s)",
        NAME,
        VERSION,
        networks.len()
    );
    let coordinator = NetworkSwitchCoordinator::new(options, storage, ports);
    coordinator.initialize(networks)?;
    Ok(coordinator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
    }

    #[tokio::test]
    async fn test_file_backed_coordinator_restores_selection() {
        let dir = tempdir().unwrap();
        let options = CoordinatorOptions::default().with_storage_path(dir.path().join("state.json"));
        let networks = vec![MAINNET.clone(), POLYGON.clone(), SOLANA.clone()];

        let first = init_coordinator_with(options.clone(), networks.clone(), Ports::default()).unwrap();
        assert_eq!(first.active_caip_network(), Some(MAINNET.clone()));
        first.switch_active_namespace(ChainNamespace::Solana).await.unwrap();
        drop(first);

        let second = init_coordinator_with(options, networks, Ports::default()).unwrap();
        assert_eq!(second.active_chain(), Some(ChainNamespace::Solana));
        assert_eq!(second.active_caip_network(), Some(SOLANA.clone()));
    }

    #[test]
    fn test_in_memory_coordinator_starts_on_first_namespace() {
        let coordinator =
            init_coordinator_with(CoordinatorOptions::default(), vec![SOLANA.clone(), MAINNET.clone()], Ports::default())
                .unwrap();
        assert_eq!(coordinator.phase(), ChainPhase::Ready);
        assert_eq!(coordinator.active_chain(), Some(ChainNamespace::Solana));
    }
}
