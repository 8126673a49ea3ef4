//! Subscriber list for committed state changes

use serde::Serialize;
use std::fmt;
use std::sync::{Arc, RwLock};

use super::phase::ChainPhase;
use crate::domain::entities::namespace_state::NamespaceState;
use crate::domain::entities::network::CaipNetwork;
use crate::shared::types::ChainNamespace;
use crate::shared::utils::generate_id;

/// Read-only view handed to subscribers after every commit
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChainSnapshot {
    pub phase: ChainPhase,
    pub active_chain: Option<ChainNamespace>,
    pub active_caip_network: Option<CaipNetwork>,
    pub is_switching_namespace: bool,
    pub namespaces: Vec<NamespaceState>,
}

impl ChainSnapshot {
    pub fn namespace(&self, namespace: ChainNamespace) -> Option<&NamespaceState> {
        self.namespaces.iter().find(|state| state.namespace == namespace)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionId(String);

impl SubscriptionId {
    fn generate() -> Self {
        Self(generate_id())
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub type ObserverCallback = Arc<dyn Fn(&ChainSnapshot) + Send + Sync>;

struct Subscription {
    id: SubscriptionId,
    /// `None` receives every commit
    namespace: Option<ChainNamespace>,
    callback: ObserverCallback,
}

#[derive(Default)]
pub(crate) struct ObserverList {
    subscriptions: RwLock<Vec<Subscription>>,
}

impl ObserverList {
    pub fn subscribe(&self, namespace: Option<ChainNamespace>, callback: ObserverCallback) -> SubscriptionId {
        let id = SubscriptionId::generate();
        let mut subscriptions = self.subscriptions.write().unwrap_or_else(|e| e.into_inner());
        subscriptions.push(Subscription {
            id: id.clone(),
            namespace,
            callback,
        });
        id
    }

    pub fn unsubscribe(&self, id: &SubscriptionId) -> bool {
        let mut subscriptions = self.subscriptions.write().unwrap_or_else(|e| e.into_inner());
        let before = subscriptions.len();
        subscriptions.retain(|subscription| &subscription.id != id);
        subscriptions.len() != before
    }

    pub fn count(&self) -> usize {
        self.subscriptions.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Call every global subscriber and every subscriber of a touched
    /// namespace. Callbacks run without the list locked so they may
    /// subscribe or unsubscribe.
    pub fn notify(&self, snapshot: &ChainSnapshot, touched: &[ChainNamespace]) {
        let callbacks: Vec<ObserverCallback> = {
            let subscriptions = self.subscriptions.read().unwrap_or_else(|e| e.into_inner());
            subscriptions
                .iter()
                .filter(|s| s.namespace.map_or(true, |ns| touched.contains(&ns)))
                .map(|s| s.callback.clone())
                .collect()
        };
        for callback in callbacks {
            callback(snapshot);
        }
    }
}
