//! Namespace registry
//!
//! Owns one `NamespaceState` per namespace (kept in the order namespaces were
//! first seen) plus the global active selection. Every method here is a
//! synchronous, in-memory mutation; wallet round trips and notification
//! fan-out belong to the coordinator.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::application::ports::ConnectorController;
use crate::domain::entities::namespace_state::NamespaceState;
use crate::domain::entities::network::CaipNetwork;
use crate::domain::repositories::storage_repository::ActiveNetworkProps;
use crate::shared::constants::AUTH_CONNECTOR_SUPPORTED_CHAINS;
use crate::shared::error::{CoordinatorError, CoordinatorResult};
use crate::shared::types::{ApprovedNetworksData, CaipNetworkId, ChainId, ChainNamespace};

pub struct NamespaceRegistry {
    namespaces: Vec<NamespaceState>,
    active_chain: Option<ChainNamespace>,
    active_caip_network: Option<CaipNetwork>,
    smart_account_enabled_networks: BTreeMap<ChainNamespace, Vec<CaipNetworkId>>,
    last_siwe_network: Option<CaipNetwork>,
    connectors: Arc<dyn ConnectorController>,
}

impl NamespaceRegistry {
    pub fn new(connectors: Arc<dyn ConnectorController>) -> Self {
        Self {
            namespaces: Vec::new(),
            active_chain: None,
            active_caip_network: None,
            smart_account_enabled_networks: BTreeMap::new(),
            last_siwe_network: None,
            connectors,
        }
    }

    /// Seed one state per namespace found in `networks` and restore the
    /// persisted selection when it names a known network.
    pub fn initialize(
        &mut self,
        networks: Vec<CaipNetwork>,
        persisted: &ActiveNetworkProps,
    ) -> CoordinatorResult<()> {
        let mut partitions: Vec<(ChainNamespace, Vec<CaipNetwork>)> = Vec::new();
        for network in networks {
            network.validate()?;
            match partitions.iter_mut().find(|(ns, _)| *ns == network.chain_namespace) {
                Some((_, group)) => {
                    if group.iter().any(|existing| existing.id == network.id) {
                        log::warn!("Duplicate network {} ignored", network.caip_network_id);
                    } else {
                        group.push(network);
                    }
                }
                None => partitions.push((network.chain_namespace, vec![network])),
            }
        }

        self.namespaces = partitions
            .into_iter()
            .map(|(namespace, group)| NamespaceState::new(namespace, group))
            .collect();
        self.active_chain = None;
        self.active_caip_network = None;

        let restored = persisted
            .caip_network_id
            .as_ref()
            .and_then(|id| self.find_network(id).cloned());

        match restored {
            Some(network) => {
                log::info!("Restored active network {}", network.caip_network_id);
                self.set_active_caip_network(network);
            }
            None => {
                let fallback = persisted
                    .namespace
                    .and_then(|ns| self.state(ns))
                    .filter(|state| state.has_networks())
                    .or_else(|| self.namespaces.iter().find(|state| state.has_networks()))
                    .and_then(|state| state.preferred_network().cloned());
                if let Some(network) = fallback {
                    self.set_active_caip_network(network);
                }
            }
        }

        let present: Vec<ChainNamespace> = self.namespaces.iter().map(|s| s.namespace).collect();
        self.connectors.filter_by_namespaces(&present);

        log::info!(
            "Namespace registry initialized with {} namespace(s), active chain {:?}",
            self.namespaces.len(),
            self.active_chain
        );
        Ok(())
    }

    pub fn namespaces(&self) -> &[NamespaceState] {
        &self.namespaces
    }

    pub fn state(&self, namespace: ChainNamespace) -> Option<&NamespaceState> {
        self.namespaces.iter().find(|state| state.namespace == namespace)
    }

    fn state_mut(&mut self, namespace: ChainNamespace) -> Option<&mut NamespaceState> {
        self.namespaces.iter_mut().find(|state| state.namespace == namespace)
    }

    pub fn active_chain(&self) -> Option<ChainNamespace> {
        self.active_chain
    }

    pub fn active_caip_network(&self) -> Option<&CaipNetwork> {
        self.active_caip_network.as_ref()
    }

    /// Append a network unless its namespace already requests the same id
    pub fn add_network(&mut self, network: CaipNetwork) -> CoordinatorResult<()> {
        network.validate()?;
        let namespace = network.chain_namespace;
        match self.state_mut(namespace) {
            Some(state) => {
                if state.find_by_id(&network.id).is_none() {
                    log::debug!("Adding network {}", network.caip_network_id);
                    state.requested_caip_networks.push(network);
                }
            }
            None => {
                log::debug!("Adding network {} under new namespace", network.caip_network_id);
                self.namespaces.push(NamespaceState::new(namespace, vec![network]));
            }
        }
        self.connectors.filter_by_namespace(namespace, true);
        Ok(())
    }

    /// Remove a network by id. Returns `false` when nothing matched.
    pub fn remove_network(&mut self, namespace: ChainNamespace, id: &ChainId) -> bool {
        let is_global_active = self.active_chain == Some(namespace);
        let Some(state) = self.state_mut(namespace) else {
            return false;
        };

        let before = state.requested_caip_networks.len();
        state.requested_caip_networks.retain(|network| &network.id != id);
        if state.requested_caip_networks.len() == before {
            return false;
        }

        let removed_active = state
            .active_caip_network
            .as_ref()
            .is_some_and(|network| &network.id == id);
        if removed_active {
            state.active_caip_network = state.requested_caip_networks.first().cloned();
        }
        let fallback = state.active_caip_network.clone();
        let has_networks = state.has_networks();

        if removed_active && is_global_active {
            log::info!("Active network removed, falling back to {:?}", fallback.as_ref().map(|n| n.caip_network_id.as_str()));
            self.active_caip_network = fallback;
        }
        if !has_networks {
            self.connectors.filter_by_namespace(namespace, false);
        }
        true
    }

    /// Replace a namespace's requested networks, approved ids first
    pub fn set_requested_caip_networks(
        &mut self,
        networks: Vec<CaipNetwork>,
        namespace: ChainNamespace,
    ) -> CoordinatorResult<()> {
        for network in &networks {
            network.validate()?;
            if network.chain_namespace != namespace {
                return Err(CoordinatorError::validation(format!(
                    "Network {} does not belong to namespace {}",
                    network.caip_network_id, namespace
                )));
            }
        }

        let state = self
            .state_mut(namespace)
            .ok_or_else(|| CoordinatorError::namespace_not_found(namespace.as_str()))?;
        state.set_requested(networks);
        let stale_active = state
            .active_caip_network
            .as_ref()
            .is_some_and(|active| state.find_by_id(&active.id).is_none());
        if stale_active {
            state.active_caip_network = state.requested_caip_networks.first().cloned();
            if self.active_chain == Some(namespace) {
                self.active_caip_network = self
                    .state(namespace)
                    .and_then(|s| s.active_caip_network.clone());
            }
        }

        let mut present: Vec<ChainNamespace> = Vec::new();
        for state in self.namespaces.iter().filter(|s| s.has_networks()) {
            if !present.contains(&state.namespace) {
                present.push(state.namespace);
            }
        }
        self.connectors.filter_by_namespaces(&present);
        Ok(())
    }

    /// Requested networks of `namespace`, or of the active namespace
    pub fn get_requested_caip_networks(&self, namespace: Option<ChainNamespace>) -> Vec<CaipNetwork> {
        namespace
            .or(self.active_chain)
            .and_then(|ns| self.state(ns))
            .map(|state| state.requested_caip_networks.clone())
            .unwrap_or_default()
    }

    pub fn get_all_requested_caip_networks(&self) -> Vec<CaipNetwork> {
        self.namespaces
            .iter()
            .flat_map(|state| state.requested_caip_networks.iter().cloned())
            .collect()
    }

    pub fn get_approved_caip_network_ids(&self, namespace: ChainNamespace) -> Vec<CaipNetworkId> {
        self.state(namespace)
            .map(|state| state.approved_caip_network_ids.clone())
            .unwrap_or_default()
    }

    pub fn get_all_approved_caip_network_ids(&self) -> Vec<CaipNetworkId> {
        self.namespaces
            .iter()
            .flat_map(|state| state.approved_caip_network_ids.iter().cloned())
            .collect()
    }

    /// Caip ids of every requested network, or of one namespace
    pub fn get_requested_caip_network_ids(&self, namespace: Option<ChainNamespace>) -> Vec<CaipNetworkId> {
        self.namespaces
            .iter()
            .filter(|state| namespace.map_or(true, |ns| ns == state.namespace))
            .flat_map(|state| state.requested_caip_networks.iter())
            .map(|network| network.caip_network_id.clone())
            .collect()
    }

    /// Clear one namespace back to empty, leaving the entry in place
    pub fn reset_network(&mut self, namespace: ChainNamespace) {
        let Some(state) = self.state_mut(namespace) else {
            return;
        };
        state.reset();
        if self.active_chain == Some(namespace) {
            self.active_caip_network = None;
        }
        log::debug!("Network state reset for {}", namespace);
    }

    /// Drop a namespace entirely. If it was active, the first remaining
    /// namespace with networks becomes active. Returns the new active network
    /// when the selection moved.
    pub fn remove_namespace(&mut self, namespace: ChainNamespace) -> Option<CaipNetwork> {
        let position = self.namespaces.iter().position(|s| s.namespace == namespace)?;
        self.namespaces.remove(position);
        self.smart_account_enabled_networks.remove(&namespace);

        if self.active_chain != Some(namespace) {
            return None;
        }
        self.active_chain = None;
        self.active_caip_network = None;

        let next = self
            .namespaces
            .iter()
            .cycle()
            .skip(position)
            .take(self.namespaces.len())
            .find(|state| state.has_networks())
            .and_then(|state| state.preferred_network().cloned());
        if let Some(network) = next.clone() {
            self.set_active_caip_network(network);
        }
        next
    }

    /// Commit `network` as the global selection. The namespace record only
    /// follows when it requests the network.
    pub fn set_active_caip_network(&mut self, network: CaipNetwork) {
        if let Some(state) = self.state_mut(network.chain_namespace) {
            if state.find_by_id(&network.id).is_some() {
                state.active_caip_network = Some(network.clone());
            }
        }
        self.active_chain = Some(network.chain_namespace);
        self.active_caip_network = Some(network);
    }

    /// Make `namespace` active with its remembered network, or its first one
    pub fn activate_namespace(&mut self, namespace: ChainNamespace) -> CoordinatorResult<CaipNetwork> {
        let state = self
            .state(namespace)
            .ok_or_else(|| CoordinatorError::no_networks(namespace.as_str()))?;
        let network = state
            .preferred_network()
            .cloned()
            .ok_or_else(|| CoordinatorError::no_networks(namespace.as_str()))?;
        self.set_active_caip_network(network.clone());
        Ok(network)
    }

    pub fn apply_approval(&mut self, namespace: ChainNamespace, data: ApprovedNetworksData) -> bool {
        match self.state_mut(namespace) {
            Some(state) => {
                state.apply_approval(data);
                true
            }
            None => false,
        }
    }

    pub fn clear_approval(&mut self, namespace: ChainNamespace) {
        if let Some(state) = self.state_mut(namespace) {
            state.clear_approval();
        }
    }

    pub fn find_network(&self, caip_network_id: &CaipNetworkId) -> Option<&CaipNetwork> {
        let namespace = caip_network_id.namespace()?;
        self.state(namespace)?.find_by_caip_id(caip_network_id)
    }

    /// Network of `namespace` with `chain_id`, else its remembered active
    /// network, else its first requested network
    pub fn get_caip_network_by_namespace(
        &self,
        namespace: ChainNamespace,
        chain_id: Option<&ChainId>,
    ) -> Option<&CaipNetwork> {
        let state = self.state(namespace)?;
        chain_id
            .and_then(|id| state.find_by_id(id))
            .or_else(|| state.preferred_network())
    }

    /// Match either a bare chain id or a full caip network id
    pub fn get_caip_network_by_id(&self, id: &str, namespace: Option<ChainNamespace>) -> Option<&CaipNetwork> {
        self.namespaces
            .iter()
            .filter(|state| namespace.map_or(true, |ns| ns == state.namespace))
            .flat_map(|state| state.requested_caip_networks.iter())
            .find(|network| network.id.as_str() == id || network.caip_network_id.as_str() == id)
    }

    pub fn get_active_caip_network(&self, namespace: Option<ChainNamespace>) -> Option<&CaipNetwork> {
        match namespace {
            Some(ns) => self.state(ns)?.active_caip_network.as_ref(),
            None => self.active_caip_network.as_ref(),
        }
    }

    pub fn get_network_data(&self, namespace: Option<ChainNamespace>) -> Option<&NamespaceState> {
        self.state(namespace.or(self.active_chain)?)
    }

    /// True when `caip_network_id` (or the active network) is requested by
    /// `namespace`, or when the namespace requests nothing at all
    pub fn check_if_supported_network(
        &self,
        namespace: ChainNamespace,
        caip_network_id: Option<&CaipNetworkId>,
    ) -> bool {
        let target = caip_network_id
            .or_else(|| self.active_caip_network.as_ref().map(|n| &n.caip_network_id));
        let requested = self
            .state(namespace)
            .map(|state| state.requested_caip_networks.as_slice())
            .unwrap_or_default();
        if requested.is_empty() {
            return true;
        }
        target.is_some_and(|id| requested.iter().any(|network| &network.caip_network_id == id))
    }

    pub fn check_if_supported_chain_id(&self, chain_id: &ChainId) -> bool {
        let Some(active_chain) = self.active_chain else {
            return true;
        };
        self.state(active_chain)
            .is_some_and(|state| state.find_by_id(chain_id).is_some())
    }

    pub fn set_smart_account_enabled_networks(&mut self, chain_ids: &[ChainId], namespace: ChainNamespace) {
        let ids = chain_ids
            .iter()
            .map(|id| CaipNetworkId::new(namespace, id))
            .collect();
        self.smart_account_enabled_networks.insert(namespace, ids);
    }

    pub fn check_if_smart_account_enabled(&self) -> bool {
        let (Some(active_chain), Some(network)) = (self.active_chain, self.active_caip_network.as_ref()) else {
            return false;
        };
        self.smart_account_enabled_networks
            .get(&active_chain)
            .is_some_and(|ids| ids.contains(&network.caip_network_id))
    }

    /// First requested network of the first namespace with auth connector support
    pub fn get_first_caip_network_supports_auth_connector(&self) -> Option<&CaipNetwork> {
        self.namespaces
            .iter()
            .find(|state| AUTH_CONNECTOR_SUPPORTED_CHAINS.contains(&state.namespace))
            .and_then(|state| state.requested_caip_networks.first())
    }

    pub fn set_last_connected_siwe_caip_network(&mut self, network: Option<CaipNetwork>) {
        self.last_siwe_network = network;
    }

    pub fn get_last_connected_siwe_caip_network(&self) -> Option<&CaipNetwork> {
        self.last_siwe_network.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{network, RecordingConnectors};
    use crate::domain::entities::network::{MAINNET, POLYGON, SEPOLIA, SOLANA};

    fn registry() -> (NamespaceRegistry, Arc<RecordingConnectors>) {
        let connectors = Arc::new(RecordingConnectors::default());
        (NamespaceRegistry::new(connectors.clone()), connectors)
    }

    fn seeded() -> (NamespaceRegistry, Arc<RecordingConnectors>) {
        let (mut registry, connectors) = registry();
        registry
            .initialize(
                vec![MAINNET.clone(), SOLANA.clone(), SEPOLIA.clone()],
                &ActiveNetworkProps::default(),
            )
            .unwrap();
        (registry, connectors)
    }

    fn assert_selection_consistent(registry: &NamespaceRegistry) {
        for state in registry.namespaces() {
            if let Some(active) = &state.active_caip_network {
                assert_eq!(active.chain_namespace, state.namespace);
            }
        }
        if let (Some(chain), Some(network)) = (registry.active_chain(), registry.active_caip_network()) {
            assert_eq!(network.chain_namespace, chain);
        }
    }

    #[test]
    fn test_initialize_partitions_by_namespace() {
        let (registry, connectors) = seeded();
        assert_eq!(registry.namespaces().len(), 2);
        assert_eq!(registry.namespaces()[0].namespace, ChainNamespace::Eip155);
        assert_eq!(
            registry.get_requested_caip_networks(Some(ChainNamespace::Eip155)),
            vec![MAINNET.clone(), SEPOLIA.clone()]
        );
        // nothing persisted: first namespace, first network
        assert_eq!(registry.active_chain(), Some(ChainNamespace::Eip155));
        assert_eq!(registry.active_caip_network(), Some(&*MAINNET));
        assert_eq!(
            connectors.namespaces_calls(),
            vec![vec![ChainNamespace::Eip155, ChainNamespace::Solana]]
        );
        assert_selection_consistent(&registry);
    }

    #[test]
    fn test_initialize_restores_persisted_network() {
        let (mut registry, _) = registry();
        let persisted = ActiveNetworkProps {
            namespace: Some(ChainNamespace::Solana),
            caip_network_id: Some(SOLANA.caip_network_id.clone()),
            chain_id: Some(SOLANA.id.clone()),
        };
        registry
            .initialize(vec![MAINNET.clone(), SOLANA.clone()], &persisted)
            .unwrap();
        assert_eq!(registry.active_chain(), Some(ChainNamespace::Solana));
        assert_eq!(registry.active_caip_network(), Some(&*SOLANA));
        // other namespace keeps its own default
        assert_eq!(
            registry.get_active_caip_network(Some(ChainNamespace::Eip155)),
            Some(&*MAINNET)
        );
    }

    #[test]
    fn test_initialize_ignores_unknown_persisted_id() {
        let (mut registry, _) = registry();
        let persisted = ActiveNetworkProps {
            namespace: Some(ChainNamespace::Eip155),
            caip_network_id: Some(CaipNetworkId::parse("eip155:999").unwrap()),
            chain_id: None,
        };
        registry
            .initialize(vec![SOLANA.clone(), MAINNET.clone()], &persisted)
            .unwrap();
        assert_eq!(registry.active_caip_network(), Some(&*MAINNET));
    }

    #[test]
    fn test_add_network_is_idempotent() {
        let (mut registry, connectors) = seeded();
        registry.add_network(POLYGON.clone()).unwrap();
        let len = registry.get_requested_caip_networks(Some(ChainNamespace::Eip155)).len();
        registry.add_network(POLYGON.clone()).unwrap();
        assert_eq!(
            registry.get_requested_caip_networks(Some(ChainNamespace::Eip155)).len(),
            len
        );
        assert_eq!(
            connectors.namespace_calls(),
            vec![(ChainNamespace::Eip155, true), (ChainNamespace::Eip155, true)]
        );
    }

    #[test]
    fn test_remove_active_network_falls_back_to_first() {
        let (mut registry, connectors) = seeded();
        assert!(registry.remove_network(ChainNamespace::Eip155, &MAINNET.id));
        assert_eq!(registry.active_caip_network(), Some(&*SEPOLIA));
        assert_eq!(
            registry.get_active_caip_network(Some(ChainNamespace::Eip155)),
            Some(&*SEPOLIA)
        );
        assert!(connectors.namespace_calls().is_empty());

        assert!(registry.remove_network(ChainNamespace::Eip155, &SEPOLIA.id));
        assert!(registry.active_caip_network().is_none());
        assert!(registry.get_active_caip_network(Some(ChainNamespace::Eip155)).is_none());
        assert_eq!(connectors.namespace_calls(), vec![(ChainNamespace::Eip155, false)]);
        assert_selection_consistent(&registry);

        assert!(!registry.remove_network(ChainNamespace::Eip155, &SEPOLIA.id));
    }

    #[test]
    fn test_set_requested_puts_approved_first() {
        let (mut registry, connectors) = seeded();
        registry.apply_approval(
            ChainNamespace::Eip155,
            ApprovedNetworksData {
                supports_all_networks: false,
                approved_caip_network_ids: vec![POLYGON.caip_network_id.clone()],
            },
        );
        registry
            .set_requested_caip_networks(
                vec![MAINNET.clone(), SEPOLIA.clone(), POLYGON.clone()],
                ChainNamespace::Eip155,
            )
            .unwrap();
        assert_eq!(
            registry.get_requested_caip_networks(Some(ChainNamespace::Eip155)),
            vec![POLYGON.clone(), MAINNET.clone(), SEPOLIA.clone()]
        );
        assert_eq!(connectors.namespaces_calls().len(), 2);
    }

    #[test]
    fn test_set_requested_rejects_foreign_network() {
        let (mut registry, _) = seeded();
        let result = registry.set_requested_caip_networks(vec![SOLANA.clone()], ChainNamespace::Eip155);
        assert!(matches!(result, Err(CoordinatorError::Validation(_))));
    }

    #[test]
    fn test_reset_network_leaves_other_namespaces() {
        let (mut registry, _) = seeded();
        let solana_before = registry.state(ChainNamespace::Solana).cloned();

        registry.reset_network(ChainNamespace::Eip155);

        let evm = registry.state(ChainNamespace::Eip155).unwrap();
        assert!(evm.requested_caip_networks.is_empty());
        assert!(evm.approved_caip_network_ids.is_empty());
        assert!(evm.active_caip_network.is_none());
        assert_eq!(registry.state(ChainNamespace::Solana).cloned(), solana_before);
        assert_selection_consistent(&registry);
    }

    #[test]
    fn test_remove_active_namespace_moves_selection() {
        let (mut registry, _) = seeded();
        let next = registry.remove_namespace(ChainNamespace::Eip155);
        assert_eq!(next.as_ref(), Some(&*SOLANA));
        assert_eq!(registry.active_chain(), Some(ChainNamespace::Solana));
        assert!(registry.state(ChainNamespace::Eip155).is_none());
        assert!(registry.remove_namespace(ChainNamespace::Eip155).is_none());
    }

    #[test]
    fn test_lookups() {
        let (registry, _) = seeded();
        assert_eq!(
            registry.get_caip_network_by_namespace(ChainNamespace::Eip155, Some(&SEPOLIA.id)),
            Some(&*SEPOLIA)
        );
        assert_eq!(
            registry.get_caip_network_by_namespace(ChainNamespace::Eip155, Some(&ChainId::from(5u64))),
            Some(&*MAINNET)
        );
        assert_eq!(registry.get_caip_network_by_id("11155111", None), Some(&*SEPOLIA));
        assert_eq!(
            registry.get_caip_network_by_id(SOLANA.caip_network_id.as_str(), Some(ChainNamespace::Solana)),
            Some(&*SOLANA)
        );
        assert!(registry.get_caip_network_by_id("1", Some(ChainNamespace::Solana)).is_none());
        assert_eq!(registry.get_requested_caip_network_ids(None).len(), 3);
        assert_eq!(
            registry.get_first_caip_network_supports_auth_connector(),
            Some(&*MAINNET)
        );
    }

    #[test]
    fn test_support_checks() {
        let (mut registry, _) = seeded();
        assert!(registry.check_if_supported_network(ChainNamespace::Eip155, None));
        assert!(!registry.check_if_supported_network(
            ChainNamespace::Eip155,
            Some(&POLYGON.caip_network_id)
        ));
        assert!(registry.check_if_supported_chain_id(&ChainId::from(11155111u64)));
        assert!(!registry.check_if_supported_chain_id(&ChainId::from(137u64)));

        registry.reset_network(ChainNamespace::Solana);
        assert!(registry.check_if_supported_network(
            ChainNamespace::Solana,
            Some(&network(ChainNamespace::Solana, "x").caip_network_id)
        ));
    }

    #[test]
    fn test_smart_account_networks() {
        let (mut registry, _) = seeded();
        assert!(!registry.check_if_smart_account_enabled());
        registry.set_smart_account_enabled_networks(&[ChainId::from(1u64)], ChainNamespace::Eip155);
        assert!(registry.check_if_smart_account_enabled());
        registry.set_active_caip_network(SEPOLIA.clone());
        assert!(!registry.check_if_smart_account_enabled());
    }
}
