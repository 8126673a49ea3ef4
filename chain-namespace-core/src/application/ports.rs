//! Collaborator ports
//!
//! Everything outside the coordinator is reached through these traits. The
//! async ones make a round trip to a wallet; the sync ones are notified in
//! the same call stack that committed a state change.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::entities::network::CaipNetwork;
use crate::shared::error::ProviderError;
use crate::shared::types::{
    AnalyticsEvent, ApprovedNetworksData, CaipNetworkId, ChainNamespace, PublicStatePatch,
    SessionNamespaces,
};

/// Low-level session provider (a pairing-protocol client or an injected wallet)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainProvider: Send + Sync {
    async fn connect(&self) -> Result<(), ProviderError>;

    async fn disconnect(&self) -> Result<(), ProviderError>;

    /// Send an RPC request to the wallet, optionally scoped to one chain
    async fn request(
        &self,
        method: &str,
        params: serde_json::Value,
        chain_id: Option<CaipNetworkId>,
    ) -> Result<serde_json::Value, ProviderError>;

    fn set_default_chain(&self, caip_network_id: &CaipNetworkId);

    /// Namespaces of the live session, `None` when not connected
    fn session_namespaces(&self) -> Option<SessionNamespaces>;

    /// Name the connected wallet announces for itself
    fn peer_name(&self) -> Option<String>;
}

/// Per-namespace client the coordinator switches networks through
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NetworkControllerClient: Send + Sync {
    /// Ask the wallet to make `network` its active chain
    async fn switch_caip_network(&self, network: &CaipNetwork) -> Result<(), ProviderError>;

    async fn get_approved_caip_networks_data(&self) -> Result<ApprovedNetworksData, ProviderError>;

    fn connected_wallet_name(&self) -> Option<String>;
}

/// Hides connector UI for namespaces that have no networks
pub trait ConnectorController: Send + Sync {
    fn filter_by_namespace(&self, namespace: ChainNamespace, has_networks: bool);

    fn filter_by_namespaces(&self, namespaces: &[ChainNamespace]);
}

pub trait PublicStateProjector: Send + Sync {
    fn set(&self, patch: PublicStatePatch);
}

pub trait NavigationHooks: Send + Sync {
    fn show_unsupported_chain_ui(&self);

    fn go_back(&self);

    fn close_modal(&self) {}
}

pub trait EventsController: Send + Sync {
    fn send_event(&self, event: AnalyticsEvent);
}

/// Pending send/transaction draft that must not survive a network switch
pub trait SendController: Send + Sync {
    fn reset_send(&self);
}

/// Default collaborator that only logs
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPort;

impl ConnectorController for NoopPort {
    fn filter_by_namespace(&self, namespace: ChainNamespace, has_networks: bool) {
        log::debug!("filter_by_namespace({}, {})", namespace, has_networks);
    }

    fn filter_by_namespaces(&self, namespaces: &[ChainNamespace]) {
        log::debug!("filter_by_namespaces({:?})", namespaces);
    }
}

impl PublicStateProjector for NoopPort {
    fn set(&self, patch: PublicStatePatch) {
        log::debug!("public state: {:?}", patch);
    }
}

impl NavigationHooks for NoopPort {
    fn show_unsupported_chain_ui(&self) {
        log::debug!("unsupported chain UI requested");
    }

    fn go_back(&self) {
        log::debug!("navigate back requested");
    }
}

impl EventsController for NoopPort {
    fn send_event(&self, event: AnalyticsEvent) {
        log::debug!("event {}: {:?}", event.event, event.properties);
    }
}

impl SendController for NoopPort {
    fn reset_send(&self) {}
}

/// The fixed set of notification targets handed to the coordinator
#[derive(Clone)]
pub struct Ports {
    pub connectors: Arc<dyn ConnectorController>,
    pub public_state: Arc<dyn PublicStateProjector>,
    pub navigation: Arc<dyn NavigationHooks>,
    pub events: Arc<dyn EventsController>,
    pub send: Arc<dyn SendController>,
}

impl Default for Ports {
    fn default() -> Self {
        let noop = Arc::new(NoopPort);
        Self {
            connectors: noop.clone(),
            public_state: noop.clone(),
            navigation: noop.clone(),
            events: noop.clone(),
            send: noop,
        }
    }
}

impl Ports {
    pub fn with_connectors(mut self, connectors: Arc<dyn ConnectorController>) -> Self {
        self.connectors = connectors;
        self
    }

    pub fn with_public_state(mut self, public_state: Arc<dyn PublicStateProjector>) -> Self {
        self.public_state = public_state;
        self
    }

    pub fn with_navigation(mut self, navigation: Arc<dyn NavigationHooks>) -> Self {
        self.navigation = navigation;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn EventsController>) -> Self {
        self.events = events;
        self
    }

    pub fn with_send(mut self, send: Arc<dyn SendController>) -> Self {
        self.send = send;
        self
    }
}
