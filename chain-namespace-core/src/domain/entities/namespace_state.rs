//! Per-namespace network record
//!
//! One `NamespaceState` exists for every namespace seen at initialization.
//! It is only mutated through the registry and the switch coordinator.

use serde::{Deserialize, Serialize};

use super::network::CaipNetwork;
use crate::shared::types::{ApprovedNetworksData, CaipNetworkId, ChainId, ChainNamespace};
use crate::shared::utils::sort_requested_networks;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceState {
    pub namespace: ChainNamespace,
    /// Networks the application offers, approved ones first
    pub requested_caip_networks: Vec<CaipNetwork>,
    /// Last wallet-approved ids, empty until approval sync has run
    pub approved_caip_network_ids: Vec<CaipNetworkId>,
    /// Always an element of `requested_caip_networks` when set
    pub active_caip_network: Option<CaipNetwork>,
    pub supports_all_networks: bool,
}

impl NamespaceState {
    /// Seed a namespace with its configured networks, first one active
    pub fn new(namespace: ChainNamespace, networks: Vec<CaipNetwork>) -> Self {
        Self {
            namespace,
            active_caip_network: networks.first().cloned(),
            requested_caip_networks: networks,
            approved_caip_network_ids: Vec::new(),
            supports_all_networks: true,
        }
    }

    pub fn has_networks(&self) -> bool {
        !self.requested_caip_networks.is_empty()
    }

    pub fn find_by_id(&self, id: &ChainId) -> Option<&CaipNetwork> {
        self.requested_caip_networks.iter().find(|network| &network.id == id)
    }

    pub fn find_by_caip_id(&self, caip_network_id: &CaipNetworkId) -> Option<&CaipNetwork> {
        self.requested_caip_networks
            .iter()
            .find(|network| &network.caip_network_id == caip_network_id)
    }

    /// Remembered active network, else the first requested one
    pub fn preferred_network(&self) -> Option<&CaipNetwork> {
        self.active_caip_network
            .as_ref()
            .or_else(|| self.requested_caip_networks.first())
    }

    pub fn is_approved(&self, caip_network_id: &CaipNetworkId) -> bool {
        self.approved_caip_network_ids.contains(caip_network_id)
    }

    /// The wallet accepts the network, either by listing it or by accepting everything
    pub fn provider_allows(&self, network: &CaipNetwork) -> bool {
        self.supports_all_networks || self.is_approved(&network.caip_network_id)
    }

    /// The application itself offers the network
    pub fn app_allows(&self, network: &CaipNetwork) -> bool {
        self.find_by_id(&network.id).is_some()
    }

    pub fn set_requested(&mut self, networks: Vec<CaipNetwork>) {
        self.requested_caip_networks =
            sort_requested_networks(&self.approved_caip_network_ids, networks);
    }

    pub fn apply_approval(&mut self, data: ApprovedNetworksData) {
        let mut approved: Vec<CaipNetworkId> = Vec::with_capacity(data.approved_caip_network_ids.len());
        for id in data.approved_caip_network_ids {
            if !approved.contains(&id) {
                approved.push(id);
            }
        }
        self.approved_caip_network_ids = approved;
        self.supports_all_networks = data.supports_all_networks;
        let requested = std::mem::take(&mut self.requested_caip_networks);
        self.set_requested(requested);
    }

    /// Forget wallet approval, keep the requested networks
    pub fn clear_approval(&mut self) {
        self.approved_caip_network_ids.clear();
        self.supports_all_networks = true;
    }

    pub fn reset(&mut self) {
        self.requested_caip_networks.clear();
        self.approved_caip_network_ids.clear();
        self.active_caip_network = None;
        self.supports_all_networks = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::network::{MAINNET, POLYGON, SEPOLIA};

    fn evm_state() -> NamespaceState {
        NamespaceState::new(
            ChainNamespace::Eip155,
            vec![MAINNET.clone(), SEPOLIA.clone(), POLYGON.clone()],
        )
    }

    #[test]
    fn test_new_state_activates_first_network() {
        let state = evm_state();
        assert_eq!(state.active_caip_network.as_ref(), Some(&*MAINNET));
        assert!(state.approved_caip_network_ids.is_empty());
        assert!(state.supports_all_networks);
    }

    #[test]
    fn test_apply_approval_sorts_approved_first() {
        let mut state = evm_state();
        state.apply_approval(ApprovedNetworksData {
            supports_all_networks: false,
            approved_caip_network_ids: vec![
                POLYGON.caip_network_id.clone(),
                POLYGON.caip_network_id.clone(),
            ],
        });

        let order: Vec<&str> = state
            .requested_caip_networks
            .iter()
            .map(|n| n.caip_network_id.as_str())
            .collect();
        assert_eq!(order, vec!["eip155:137", "eip155:1", "eip155:11155111"]);
        assert_eq!(state.approved_caip_network_ids.len(), 1);
        assert!(!state.provider_allows(&SEPOLIA));
        assert!(state.provider_allows(&POLYGON));
    }

    #[test]
    fn test_reset_clears_collections() {
        let mut state = evm_state();
        state.reset();
        assert!(state.requested_caip_networks.is_empty());
        assert!(state.approved_caip_network_ids.is_empty());
        assert!(state.active_caip_network.is_none());
        assert!(state.preferred_network().is_none());
    }
}
