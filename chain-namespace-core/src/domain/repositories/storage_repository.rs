//! Storage repository for the active selection
//!
//! The coordinator persists exactly two values: the last active namespace
//! and the last active caip network id.

use std::sync::Arc;

use crate::shared::constants::{ACTIVE_CAIP_NETWORK_ID_KEY, ACTIVE_NAMESPACE_KEY};
use crate::shared::error::CoordinatorError;
use crate::shared::types::{CaipNetworkId, ChainId, ChainNamespace};

/// Key/value persistence contract
pub trait StorageAdapter: Send + Sync {
    /// Read a stored value
    fn get_item(&self, key: &str) -> Result<Option<String>, CoordinatorError>;

    /// Store a value
    fn set_item(&self, key: &str, value: &str) -> Result<(), CoordinatorError>;

    /// Delete a stored value
    fn remove_item(&self, key: &str) -> Result<(), CoordinatorError>;
}

/// What was persisted for the last session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveNetworkProps {
    pub namespace: Option<ChainNamespace>,
    pub caip_network_id: Option<CaipNetworkId>,
    pub chain_id: Option<ChainId>,
}

/// Typed access to the two persisted keys. Storage failures are logged and
/// swallowed; losing the remembered network never blocks a switch.
#[derive(Clone)]
pub struct ActiveNetworkStore {
    storage: Arc<dyn StorageAdapter>,
}

impl ActiveNetworkStore {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }

    pub fn get_active_namespace(&self) -> Option<ChainNamespace> {
        match self.storage.get_item(ACTIVE_NAMESPACE_KEY) {
            Ok(value) => value.and_then(|ns| ns.parse().ok()),
            Err(e) => {
                log::info!("Unable to get active namespace: {}", e);
                None
            }
        }
    }

    pub fn get_active_caip_network_id(&self) -> Option<CaipNetworkId> {
        match self.storage.get_item(ACTIVE_CAIP_NETWORK_ID_KEY) {
            Ok(value) => value.and_then(|id| CaipNetworkId::parse(&id).ok()),
            Err(e) => {
                log::info!("Unable to get active caip network id: {}", e);
                None
            }
        }
    }

    pub fn get_active_network_props(&self) -> ActiveNetworkProps {
        let caip_network_id = self.get_active_caip_network_id();
        ActiveNetworkProps {
            namespace: self.get_active_namespace(),
            chain_id: caip_network_id.as_ref().and_then(|id| id.chain_id()),
            caip_network_id,
        }
    }

    pub fn set_active_namespace(&self, namespace: ChainNamespace) {
        if let Err(e) = self.storage.set_item(ACTIVE_NAMESPACE_KEY, namespace.as_str()) {
            log::info!("Unable to set active namespace: {}", e);
        }
    }

    /// Writing the network id also records its namespace
    pub fn set_active_caip_network_id(&self, caip_network_id: &CaipNetworkId) {
        if let Err(e) = self
            .storage
            .set_item(ACTIVE_CAIP_NETWORK_ID_KEY, caip_network_id.as_str())
        {
            log::info!("Unable to set active caip network id: {}", e);
            return;
        }
        if let Some(namespace) = caip_network_id.namespace() {
            self.set_active_namespace(namespace);
        }
    }

    pub fn delete_active_caip_network_id(&self) {
        if let Err(e) = self.storage.remove_item(ACTIVE_CAIP_NETWORK_ID_KEY) {
            log::info!("Unable to delete active caip network id: {}", e);
        }
    }
}
