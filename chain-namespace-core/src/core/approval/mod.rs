//! Approval sync
//!
//! Asks a namespace's network client which networks the connected wallet
//! approves and folds the answer into the registry. A failed fetch never
//! touches what was known before.

use futures::future::join_all;
use std::sync::{Arc, RwLock};

use crate::application::ports::NetworkControllerClient;
use crate::core::registry::NamespaceRegistry;
use crate::shared::constants::SINGLE_NAMESPACE_WALLETS;
use crate::shared::error::{CoordinatorError, CoordinatorResult, ProviderError};
use crate::shared::types::{ApprovedNetworksData, ChainNamespace};

pub struct ApprovalSync {
    single_namespace_wallets: Vec<String>,
}

impl Default for ApprovalSync {
    fn default() -> Self {
        Self {
            single_namespace_wallets: SINGLE_NAMESPACE_WALLETS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl ApprovalSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch approval data, forcing `supports_all_networks` for wallets that
    /// report a single chain but accept switching to any
    pub async fn fetch(
        &self,
        client: &dyn NetworkControllerClient,
    ) -> Result<ApprovedNetworksData, ProviderError> {
        let mut data = client.get_approved_caip_networks_data().await?;
        if let Some(name) = client.connected_wallet_name() {
            if self.single_namespace_wallets.iter().any(|w| *w == name) {
                log::debug!("{} reports a single chain, treating all networks as approved", name);
                data.supports_all_networks = true;
            }
        }
        Ok(data)
    }

    /// Fetch and store approval data for `namespace`. Returns `Ok(false)`
    /// when the provider could not be reached; prior data is kept.
    pub async fn set_approved_caip_networks_data(
        &self,
        namespace: ChainNamespace,
        client: &dyn NetworkControllerClient,
        registry: &RwLock<NamespaceRegistry>,
    ) -> CoordinatorResult<bool> {
        match self.fetch(client).await {
            Ok(data) => {
                log::debug!(
                    "Approved networks for {}: {} id(s), supports all: {}",
                    namespace,
                    data.approved_caip_network_ids.len(),
                    data.supports_all_networks
                );
                let mut registry = registry
                    .write()
                    .map_err(|_| CoordinatorError::internal("Namespace registry lock poisoned"))?;
                Ok(registry.apply_approval(namespace, data))
            }
            Err(e) => {
                log::warn!("Unable to fetch approved networks for {}: {}", namespace, e);
                Ok(false)
            }
        }
    }

    /// Sync several namespaces concurrently; returns the namespaces that
    /// were updated
    pub async fn sync_all(
        &self,
        targets: Vec<(ChainNamespace, Arc<dyn NetworkControllerClient>)>,
        registry: &RwLock<NamespaceRegistry>,
    ) -> CoordinatorResult<Vec<ChainNamespace>> {
        let fetches = targets.iter().map(|(namespace, client)| async move {
            (*namespace, self.fetch(client.as_ref()).await)
        });

        let mut updated = Vec::new();
        for (namespace, result) in join_all(fetches).await {
            match result {
                Ok(data) => {
                    let mut registry = registry
                        .write()
                        .map_err(|_| CoordinatorError::internal("Namespace registry lock poisoned"))?;
                    if registry.apply_approval(namespace, data) {
                        updated.push(namespace);
                    }
                }
                Err(e) => log::warn!("Unable to fetch approved networks for {}: {}", namespace, e),
            }
        }
        Ok(updated)
    }
}
