//! Recording collaborators shared by the core test modules

use std::sync::Mutex;

use crate::application::ports::{
    ConnectorController, EventsController, NavigationHooks, PublicStateProjector, SendController,
};
use crate::domain::entities::network::{CaipNetwork, NativeCurrency};
use crate::shared::types::{AnalyticsEvent, ChainId, ChainNamespace, PublicStatePatch};

/// Throwaway network for namespace `namespace` with chain id `id`
pub fn network(namespace: ChainNamespace, id: &str) -> CaipNetwork {
    CaipNetwork::new(
        namespace,
        ChainId::new(id),
        &format!("{} {}", namespace, id),
        "https://rpc.example.org",
        NativeCurrency::new("Test", "TST", 18),
    )
}

#[derive(Default)]
pub struct RecordingConnectors {
    namespace: Mutex<Vec<(ChainNamespace, bool)>>,
    namespaces: Mutex<Vec<Vec<ChainNamespace>>>,
}

impl RecordingConnectors {
    pub fn namespace_calls(&self) -> Vec<(ChainNamespace, bool)> {
        self.namespace.lock().unwrap().clone()
    }

    pub fn namespaces_calls(&self) -> Vec<Vec<ChainNamespace>> {
        self.namespaces.lock().unwrap().clone()
    }
}

impl ConnectorController for RecordingConnectors {
    fn filter_by_namespace(&self, namespace: ChainNamespace, has_networks: bool) {
        self.namespace.lock().unwrap().push((namespace, has_networks));
    }

    fn filter_by_namespaces(&self, namespaces: &[ChainNamespace]) {
        self.namespaces.lock().unwrap().push(namespaces.to_vec());
    }
}

#[derive(Default)]
pub struct RecordingPublicState {
    patches: Mutex<Vec<PublicStatePatch>>,
}

impl RecordingPublicState {
    pub fn patches(&self) -> Vec<PublicStatePatch> {
        self.patches.lock().unwrap().clone()
    }
}

impl PublicStateProjector for RecordingPublicState {
    fn set(&self, patch: PublicStatePatch) {
        self.patches.lock().unwrap().push(patch);
    }
}

#[derive(Default)]
pub struct RecordingNavigation {
    unsupported: Mutex<usize>,
    back: Mutex<usize>,
    closed: Mutex<usize>,
}

impl RecordingNavigation {
    pub fn unsupported_calls(&self) -> usize {
        *self.unsupported.lock().unwrap()
    }

    pub fn back_calls(&self) -> usize {
        *self.back.lock().unwrap()
    }

    pub fn close_calls(&self) -> usize {
        *self.closed.lock().unwrap()
    }
}

impl NavigationHooks for RecordingNavigation {
    fn show_unsupported_chain_ui(&self) {
        *self.unsupported.lock().unwrap() += 1;
    }

    fn go_back(&self) {
        *self.back.lock().unwrap() += 1;
    }

    fn close_modal(&self) {
        *self.closed.lock().unwrap() += 1;
    }
}

#[derive(Default)]
pub struct RecordingEvents {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl RecordingEvents {
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventsController for RecordingEvents {
    fn send_event(&self, event: AnalyticsEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[derive(Default)]
pub struct RecordingSend {
    resets: Mutex<usize>,
}

impl RecordingSend {
    pub fn resets(&self) -> usize {
        *self.resets.lock().unwrap()
    }
}

impl SendController for RecordingSend {
    fn reset_send(&self) {
        *self.resets.lock().unwrap() += 1;
    }
}
