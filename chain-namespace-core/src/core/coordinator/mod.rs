//! Network switch coordinator
//!
//! The single entry point for changing the active namespace or network.
//! Guards run before anything is mutated; state is committed only after the
//! wallet round trip (if any) succeeds, then persistence, the public state
//! projector, analytics and subscribers are notified in that call stack.
//!
//! Only one switch or approval refresh runs at a time. A second request made
//! while one is in flight fails with `SwitchInProgress`.

pub mod events;
pub mod observers;
pub mod phase;

pub use observers::{ChainSnapshot, ObserverCallback, SubscriptionId};
pub use phase::ChainPhase;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::application::ports::{NetworkControllerClient, Ports};
use crate::core::approval::ApprovalSync;
use crate::core::registry::NamespaceRegistry;
use crate::domain::entities::namespace_state::NamespaceState;
use crate::domain::entities::network::CaipNetwork;
use crate::domain::repositories::storage_repository::{ActiveNetworkStore, StorageAdapter};
use crate::infrastructure::config::CoordinatorOptions;
use crate::shared::error::{CoordinatorError, CoordinatorResult};
use crate::shared::types::{
    AnalyticsEvent, CaipNetworkId, ChainId, ChainNamespace, PublicStatePatch,
    SwitchActiveNetworkOptions,
};
use observers::ObserverList;

pub struct NetworkSwitchCoordinator {
    options: CoordinatorOptions,
    registry: RwLock<NamespaceRegistry>,
    phase: Mutex<ChainPhase>,
    is_switching_namespace: AtomicBool,
    clients: RwLock<HashMap<ChainNamespace, Arc<dyn NetworkControllerClient>>>,
    store: ActiveNetworkStore,
    ports: Ports,
    approval: ApprovalSync,
    observers: ObserverList,
    switch_guard: tokio::sync::Mutex<()>,
}

impl NetworkSwitchCoordinator {
    pub fn new(options: CoordinatorOptions, storage: Arc<dyn StorageAdapter>, ports: Ports) -> Self {
        Self {
            registry: RwLock::new(NamespaceRegistry::new(ports.connectors.clone())),
            phase: Mutex::new(ChainPhase::Idle),
            is_switching_namespace: AtomicBool::new(false),
            clients: RwLock::new(HashMap::new()),
            store: ActiveNetworkStore::new(storage),
            approval: ApprovalSync::new(),
            observers: ObserverList::default(),
            switch_guard: tokio::sync::Mutex::new(()),
            options,
            ports,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, NamespaceRegistry> {
        self.registry.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, NamespaceRegistry> {
        self.registry.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn options(&self) -> &CoordinatorOptions {
        &self.options
    }

    pub fn phase(&self) -> ChainPhase {
        *self.phase.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn enter(&self, next: ChainPhase) -> CoordinatorResult<()> {
        let mut phase = self.phase.lock().unwrap_or_else(|e| e.into_inner());
        *phase = phase.transition(next)?;
        log::debug!("Coordinator phase -> {}", next);
        Ok(())
    }

    fn settle(&self) {
        let mut phase = self.phase.lock().unwrap_or_else(|e| e.into_inner());
        if phase.is_transient() {
            *phase = ChainPhase::Ready;
        }
    }

    /// Enter a transient phase that is left again when the returned guard
    /// drops, including when the calling future is dropped mid-await
    fn begin(&self, next: ChainPhase) -> CoordinatorResult<TransientPhase<'_>> {
        self.enter(next)?;
        if next == ChainPhase::SwitchingNamespace {
            self.is_switching_namespace.store(true, Ordering::SeqCst);
        }
        Ok(TransientPhase { coordinator: self })
    }

    pub fn is_switching_namespace(&self) -> bool {
        self.is_switching_namespace.load(Ordering::SeqCst)
    }

    // ---- lifecycle -------------------------------------------------------

    /// Seed the registry from the configured networks and restore the
    /// persisted selection
    pub fn initialize(&self, networks: Vec<CaipNetwork>) -> CoordinatorResult<()> {
        self.enter(ChainPhase::Bootstrapping)?;
        let persisted = self.store.get_active_network_props();

        let result = self.write().initialize(networks, &persisted);
        if let Err(e) = result {
            log::error!("Coordinator bootstrap failed: {}", e);
            self.enter(ChainPhase::Error)?;
            return Err(e);
        }
        self.enter(ChainPhase::Ready)?;

        let (patch, touched) = {
            let registry = self.read();
            let touched: Vec<ChainNamespace> = registry.namespaces().iter().map(|s| s.namespace).collect();
            (Self::patch_of(&registry), touched)
        };
        if patch.active_chain.is_some() {
            self.ports.public_state.set(patch);
        }
        self.notify(&touched);
        Ok(())
    }

    pub fn set_network_controller_client(
        &self,
        namespace: ChainNamespace,
        client: Arc<dyn NetworkControllerClient>,
    ) {
        let mut clients = self.clients.write().unwrap_or_else(|e| e.into_inner());
        clients.insert(namespace, client);
    }

    /// Client of `namespace`, or of the active namespace
    pub fn get_network_controller_client(
        &self,
        namespace: Option<ChainNamespace>,
    ) -> CoordinatorResult<Arc<dyn NetworkControllerClient>> {
        let namespace = namespace
            .or_else(|| self.active_chain())
            .ok_or_else(|| CoordinatorError::validation("A namespace is required to pick a network client"))?;
        let clients = self.clients.read().unwrap_or_else(|e| e.into_inner());
        clients
            .get(&namespace)
            .cloned()
            .ok_or_else(|| CoordinatorError::client_not_set(namespace.as_str()))
    }

    // ---- switching -------------------------------------------------------

    /// Activate `target` with its remembered network. A no-op when it is
    /// already active; fails when the namespace requests no networks.
    pub async fn switch_active_namespace(&self, target: ChainNamespace) -> CoordinatorResult<()> {
        let _guard = self.switch_guard.try_lock()?;

        {
            let registry = self.read();
            if registry.active_chain() == Some(target) {
                return Ok(());
            }
            if !registry.state(target).is_some_and(NamespaceState::has_networks) {
                return Err(CoordinatorError::no_networks(target.as_str()));
            }
        }

        let phase = self.begin(ChainPhase::SwitchingNamespace)?;

        let activated = self.write().activate_namespace(target);
        let result = match activated {
            Ok(network) => {
                log::info!("Switched namespace to {} ({})", target, network.caip_network_id);
                self.ports.send.reset_send();
                self.store.set_active_caip_network_id(&network.caip_network_id);
                self.publish_selection();
                Ok(())
            }
            Err(e) => Err(e),
        };

        drop(phase);
        if result.is_ok() {
            self.notify(&[target]);
        }
        result
    }

    pub async fn switch_active_network(&self, network: &CaipNetwork) -> CoordinatorResult<()> {
        self.switch_active_network_with(network, SwitchActiveNetworkOptions::default())
            .await
    }

    /// Guarded network switch through the namespace's network client.
    ///
    /// A network the wallet does not accept opens the unsupported-chain UI
    /// and changes nothing. A wallet rejection navigates back, or is returned
    /// when `throw_on_failure` is set.
    pub async fn switch_active_network_with(
        &self,
        network: &CaipNetwork,
        options: SwitchActiveNetworkOptions,
    ) -> CoordinatorResult<()> {
        let _guard = self.switch_guard.try_lock()?;
        let namespace = network.chain_namespace;

        let (provider_allows, app_allows, leaving_unsupported) = {
            let registry = self.read();
            let state = registry.state(namespace);
            let leaving_unsupported = registry
                .active_caip_network()
                .is_some_and(|active| !registry.check_if_supported_network(active.chain_namespace, Some(&active.caip_network_id)));
            (
                state.is_some_and(|s| s.provider_allows(network)),
                state.is_some_and(|s| s.app_allows(network)),
                leaving_unsupported,
            )
        };

        if !provider_allows {
            log::info!("{} is not approved by the wallet", network.caip_network_id);
            self.ports.navigation.show_unsupported_chain_ui();
            return Ok(());
        }
        if !app_allows && !self.options.permits_unsupported_switch() {
            log::info!("{} is not requested by the app", network.caip_network_id);
            self.ports.navigation.show_unsupported_chain_ui();
            return Ok(());
        }

        let client = self.get_network_controller_client(Some(namespace))?;

        let phase = self.begin(ChainPhase::SwitchingNetwork)?;
        let outcome = client.switch_caip_network(network).await;
        drop(phase);

        match outcome {
            Ok(()) => {
                self.commit_network(network);
                if leaving_unsupported {
                    self.ports.navigation.close_modal();
                }
                self.ports
                    .events
                    .send_event(AnalyticsEvent::switch_network(&network.caip_network_id));
                log::info!("Switched network to {}", network.caip_network_id);
                self.notify(&[namespace]);
                Ok(())
            }
            Err(e) => {
                log::warn!("Wallet declined switch to {}: {}", network.caip_network_id, e);
                if options.throw_on_failure {
                    return Err(e.into());
                }
                self.ports.navigation.go_back();
                Ok(())
            }
        }
    }

    /// Re-read wallet approvals for the active namespace. Returns whether
    /// approval data changed.
    pub async fn refresh_approved_networks(&self) -> CoordinatorResult<bool> {
        match self.active_chain() {
            Some(namespace) => self.refresh_approved_networks_for(namespace).await,
            None => Ok(false),
        }
    }

    pub async fn refresh_approved_networks_for(&self, namespace: ChainNamespace) -> CoordinatorResult<bool> {
        let _guard = self.switch_guard.try_lock()?;
        let client = self.get_network_controller_client(Some(namespace))?;

        let phase = self.begin(ChainPhase::RefreshingApproved)?;
        let result = self
            .approval
            .set_approved_caip_networks_data(namespace, client.as_ref(), &self.registry)
            .await;
        drop(phase);

        if matches!(result, Ok(true)) {
            self.notify(&[namespace]);
        }
        result
    }

    /// Refresh every namespace that has a client, concurrently
    pub async fn refresh_all_approved_networks(&self) -> CoordinatorResult<Vec<ChainNamespace>> {
        let _guard = self.switch_guard.try_lock()?;
        let targets: Vec<(ChainNamespace, Arc<dyn NetworkControllerClient>)> = {
            let registry = self.read();
            let clients = self.clients.read().unwrap_or_else(|e| e.into_inner());
            registry
                .namespaces()
                .iter()
                .filter_map(|s| clients.get(&s.namespace).map(|c| (s.namespace, c.clone())))
                .collect()
        };

        let phase = self.begin(ChainPhase::RefreshingApproved)?;
        let result = self.approval.sync_all(targets, &self.registry).await;
        drop(phase);

        if let Ok(updated) = &result {
            if !updated.is_empty() {
                self.notify(updated);
            }
        }
        result
    }

    /// Commit a network the wallet is already on: persist, select, publish
    fn commit_network(&self, network: &CaipNetwork) {
        self.ports.send.reset_send();
        self.store.set_active_caip_network_id(&network.caip_network_id);
        self.write().set_active_caip_network(network.clone());
        self.publish_selection();
    }

    fn patch_of(registry: &NamespaceRegistry) -> PublicStatePatch {
        PublicStatePatch {
            active_chain: registry.active_chain(),
            selected_network_id: registry.active_caip_network().map(|n| n.caip_network_id.clone()),
        }
    }

    fn publish_selection(&self) {
        let patch = Self::patch_of(&self.read());
        self.ports.public_state.set(patch);
    }

    /// Run a registry mutation; when it moves or clears the global
    /// selection, persist and publish the new one
    fn mutate_registry<R>(&self, mutate: impl FnOnce(&mut NamespaceRegistry) -> R) -> R {
        let (result, before, after) = {
            let mut registry = self.write();
            let before = Self::patch_of(&registry);
            let result = mutate(&mut registry);
            (result, before, Self::patch_of(&registry))
        };
        if before != after {
            match &after.selected_network_id {
                Some(id) => self.store.set_active_caip_network_id(id),
                None => self.store.delete_active_caip_network_id(),
            }
            log::debug!(
                "Selection moved from {:?} to {:?}",
                before.selected_network_id,
                after.selected_network_id
            );
            self.ports.public_state.set(after);
        }
        result
    }

    // ---- registry mutations ----------------------------------------------

    pub fn add_network(&self, network: CaipNetwork) -> CoordinatorResult<()> {
        let namespace = network.chain_namespace;
        self.mutate_registry(|registry| registry.add_network(network))?;
        self.notify(&[namespace]);
        Ok(())
    }

    pub fn remove_network(&self, namespace: ChainNamespace, id: &ChainId) -> bool {
        let removed = self.mutate_registry(|registry| registry.remove_network(namespace, id));
        if removed {
            self.notify(&[namespace]);
        }
        removed
    }

    pub fn set_requested_caip_networks(
        &self,
        networks: Vec<CaipNetwork>,
        namespace: ChainNamespace,
    ) -> CoordinatorResult<()> {
        self.mutate_registry(|registry| registry.set_requested_caip_networks(networks, namespace))?;
        self.notify(&[namespace]);
        Ok(())
    }

    pub fn reset_network(&self, namespace: ChainNamespace) {
        self.mutate_registry(|registry| registry.reset_network(namespace));
        self.notify(&[namespace]);
    }

    /// Drop a namespace; when it was active the next namespace with
    /// networks takes over
    pub fn remove_namespace(&self, namespace: ChainNamespace) {
        let next = self.mutate_registry(|registry| registry.remove_namespace(namespace));
        if let Some(network) = &next {
            log::info!("Namespace {} removed, {} is now active", namespace, network.caip_network_id);
        }
        let mut touched = vec![namespace];
        if let Some(network) = next {
            touched.push(network.chain_namespace);
        }
        self.notify(&touched);
    }

    pub fn set_smart_account_enabled_networks(&self, chain_ids: &[ChainId], namespace: ChainNamespace) {
        self.write().set_smart_account_enabled_networks(chain_ids, namespace);
    }

    pub fn set_last_connected_siwe_caip_network(&self, network: Option<CaipNetwork>) {
        self.write().set_last_connected_siwe_caip_network(network);
    }

    // ---- reads -----------------------------------------------------------

    pub fn active_chain(&self) -> Option<ChainNamespace> {
        self.read().active_chain()
    }

    pub fn active_caip_network(&self) -> Option<CaipNetwork> {
        self.read().active_caip_network().cloned()
    }

    pub fn get_active_caip_network(&self, namespace: Option<ChainNamespace>) -> Option<CaipNetwork> {
        self.read().get_active_caip_network(namespace).cloned()
    }

    pub fn get_requested_caip_networks(&self, namespace: Option<ChainNamespace>) -> Vec<CaipNetwork> {
        self.read().get_requested_caip_networks(namespace)
    }

    pub fn get_all_requested_caip_networks(&self) -> Vec<CaipNetwork> {
        self.read().get_all_requested_caip_networks()
    }

    pub fn get_approved_caip_network_ids(&self, namespace: ChainNamespace) -> Vec<CaipNetworkId> {
        self.read().get_approved_caip_network_ids(namespace)
    }

    pub fn get_all_approved_caip_network_ids(&self) -> Vec<CaipNetworkId> {
        self.read().get_all_approved_caip_network_ids()
    }

    pub fn get_requested_caip_network_ids(&self, namespace: Option<ChainNamespace>) -> Vec<CaipNetworkId> {
        self.read().get_requested_caip_network_ids(namespace)
    }

    pub fn get_network_data(&self, namespace: Option<ChainNamespace>) -> Option<NamespaceState> {
        self.read().get_network_data(namespace).cloned()
    }

    pub fn get_caip_network_by_namespace(
        &self,
        namespace: ChainNamespace,
        chain_id: Option<&ChainId>,
    ) -> Option<CaipNetwork> {
        self.read().get_caip_network_by_namespace(namespace, chain_id).cloned()
    }

    pub fn get_caip_network_by_id(&self, id: &str, namespace: Option<ChainNamespace>) -> Option<CaipNetwork> {
        self.read().get_caip_network_by_id(id, namespace).cloned()
    }

    pub fn check_if_supported_network(
        &self,
        namespace: ChainNamespace,
        caip_network_id: Option<&CaipNetworkId>,
    ) -> bool {
        self.read().check_if_supported_network(namespace, caip_network_id)
    }

    pub fn check_if_supported_chain_id(&self, chain_id: &ChainId) -> bool {
        self.read().check_if_supported_chain_id(chain_id)
    }

    pub fn check_if_smart_account_enabled(&self) -> bool {
        self.read().check_if_smart_account_enabled()
    }

    /// Name resolution is offered on the active namespace
    pub fn check_if_names_supported(&self) -> bool {
        self.read()
            .active_caip_network()
            .is_some_and(|n| self.options.names_supported_namespaces.contains(&n.chain_namespace))
    }

    pub fn get_first_caip_network_supports_auth_connector(&self) -> Option<CaipNetwork> {
        self.read().get_first_caip_network_supports_auth_connector().cloned()
    }

    pub fn get_last_connected_siwe_caip_network(&self) -> Option<CaipNetwork> {
        self.read().get_last_connected_siwe_caip_network().cloned()
    }

    // ---- observers -------------------------------------------------------

    pub fn snapshot(&self) -> ChainSnapshot {
        let registry = self.read();
        ChainSnapshot {
            phase: self.phase(),
            active_chain: registry.active_chain(),
            active_caip_network: registry.active_caip_network().cloned(),
            is_switching_namespace: self.is_switching_namespace(),
            namespaces: registry.namespaces().to_vec(),
        }
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ChainSnapshot) + Send + Sync + 'static,
    {
        self.observers.subscribe(None, Arc::new(callback))
    }

    /// Subscribe to commits that touch one namespace
    pub fn subscribe_namespace<F>(&self, namespace: ChainNamespace, callback: F) -> SubscriptionId
    where
        F: Fn(&ChainSnapshot) + Send + Sync + 'static,
    {
        self.observers.subscribe(Some(namespace), Arc::new(callback))
    }

    pub fn unsubscribe(&self, id: &SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers.count()
    }

    fn notify(&self, touched: &[ChainNamespace]) {
        let snapshot = self.snapshot();
        self.observers.notify(&snapshot, touched);
    }
}

/// Transient phase held for the span of one switch or refresh
struct TransientPhase<'a> {
    coordinator: &'a NetworkSwitchCoordinator,
}

impl Drop for TransientPhase<'_> {
    fn drop(&mut self) {
        self.coordinator.is_switching_namespace.store(false, Ordering::SeqCst);
        self.coordinator.settle();
    }
}
