//! Session namespace translation
//!
//! Turns the requested networks into the namespace configuration a pairing
//! provider proposes to a wallet, and reads approved chains back out of a
//! live session.

pub mod universal_client;

pub use universal_client::UniversalNetworkClient;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::entities::network::CaipNetwork;
use crate::shared::constants::{
    default_methods, DEFAULT_SESSION_EVENTS, SOLANA_DEVNET_CHAIN_ID,
    SOLANA_DEVNET_DEPRECATED_CHAIN_ID, SOLANA_MAINNET_CHAIN_ID, SOLANA_MAINNET_DEPRECATED_CHAIN_ID,
};
use crate::shared::types::{CaipNetworkId, ChainNamespace, SessionNamespaces};

/// Proposed configuration for one namespace
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceConfigEntry {
    pub methods: Vec<String>,
    pub chains: Vec<String>,
    pub events: Vec<String>,
    /// Keyed by bare chain id
    pub rpc_map: BTreeMap<String, String>,
}

/// Keyed by namespace string; overrides may name namespaces this crate does
/// not model
pub type NamespaceConfig = BTreeMap<String, NamespaceConfigEntry>;

/// Per-namespace replacements applied on top of the generated configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceOverrides {
    pub methods: Option<BTreeMap<String, Vec<String>>>,
    pub chains: Option<BTreeMap<String, Vec<String>>>,
    pub events: Option<BTreeMap<String, Vec<String>>>,
    /// Keyed by `namespace:chainId`
    pub rpc_map: Option<BTreeMap<String, String>>,
}

fn default_entry(namespace: &str) -> NamespaceConfigEntry {
    let methods = namespace
        .parse::<ChainNamespace>()
        .map(default_methods)
        .unwrap_or_default();
    NamespaceConfigEntry {
        methods: methods.iter().map(|m| m.to_string()).collect(),
        chains: Vec::new(),
        events: DEFAULT_SESSION_EVENTS.iter().map(|e| e.to_string()).collect(),
        rpc_map: BTreeMap::new(),
    }
}

/// Legacy id some wallets still expect next to the current one
fn legacy_alias(network: &CaipNetwork) -> Option<CaipNetworkId> {
    if let Some(deprecated) = &network.deprecated_caip_network_id {
        return Some(deprecated.clone());
    }
    if network.chain_namespace != ChainNamespace::Solana {
        return None;
    }
    let legacy = match network.id.as_str() {
        SOLANA_MAINNET_CHAIN_ID => SOLANA_MAINNET_DEPRECATED_CHAIN_ID,
        SOLANA_DEVNET_CHAIN_ID => SOLANA_DEVNET_DEPRECATED_CHAIN_ID,
        _ => return None,
    };
    Some(CaipNetworkId::from_raw(format!("{}:{}", ChainNamespace::Solana, legacy)))
}

/// One entry per namespace: chain ids, default methods and events, and an
/// rpc map keyed by bare chain id
pub fn create_namespaces(networks: &[CaipNetwork], overrides: Option<&NamespaceOverrides>) -> NamespaceConfig {
    let mut config = NamespaceConfig::new();
    for network in networks {
        let entry = config
            .entry(network.chain_namespace.as_str().to_string())
            .or_insert_with(|| default_entry(network.chain_namespace.as_str()));

        entry.chains.push(network.caip_network_id.to_string());
        if let Some(alias) = legacy_alias(network) {
            entry.chains.push(alias.to_string());
        }
        if let Some(rpc_url) = network.default_rpc_url() {
            entry.rpc_map.insert(network.id.to_string(), rpc_url.to_string());
        }
    }
    apply_namespace_overrides(config, overrides)
}

/// Merge overrides per namespace. A namespace named only by an override is
/// created with default methods and events; an rpc override replaces that
/// namespace's whole rpc map.
pub fn apply_namespace_overrides(
    mut config: NamespaceConfig,
    overrides: Option<&NamespaceOverrides>,
) -> NamespaceConfig {
    let Some(overrides) = overrides else {
        return config;
    };

    let mut touched: BTreeSet<String> = BTreeSet::new();
    for map in [&overrides.methods, &overrides.chains, &overrides.events].into_iter().flatten() {
        touched.extend(map.keys().cloned());
    }
    if let Some(rpc_map) = &overrides.rpc_map {
        touched.extend(
            rpc_map
                .keys()
                .filter_map(|key| key.split(':').next())
                .filter(|ns| !ns.is_empty())
                .map(str::to_string),
        );
    }
    for namespace in touched {
        config
            .entry(namespace.clone())
            .or_insert_with(|| default_entry(&namespace));
    }

    if let Some(methods) = &overrides.methods {
        for (namespace, methods) in methods {
            if let Some(entry) = config.get_mut(namespace) {
                entry.methods = methods.clone();
            }
        }
    }
    if let Some(chains) = &overrides.chains {
        for (namespace, chains) in chains {
            if let Some(entry) = config.get_mut(namespace) {
                entry.chains = chains.clone();
            }
        }
    }
    if let Some(events) = &overrides.events {
        for (namespace, events) in events {
            if let Some(entry) = config.get_mut(namespace) {
                entry.events = events.clone();
            }
        }
    }
    if let Some(rpc_map) = &overrides.rpc_map {
        let mut replaced: BTreeSet<&str> = BTreeSet::new();
        for (key, rpc_url) in rpc_map {
            let Some((namespace, chain_id)) = key.split_once(':') else {
                continue;
            };
            if chain_id.is_empty() {
                continue;
            }
            let Some(entry) = config.get_mut(namespace) else {
                continue;
            };
            if replaced.insert(namespace) {
                entry.rpc_map.clear();
            }
            entry.rpc_map.insert(chain_id.to_string(), rpc_url.clone());
        }
    }
    config
}

/// Every chain a session approves: declared chains plus the chain of each
/// account, deduplicated per namespace
pub fn get_chains_from_namespaces(namespaces: &SessionNamespaces) -> Vec<CaipNetworkId> {
    let mut chains = Vec::new();
    for namespace in namespaces.values() {
        let mut seen: Vec<String> = Vec::new();
        let declared = namespace.chains.iter().flatten().cloned();
        let from_accounts = namespace.accounts.iter().filter_map(|account| {
            let mut parts = account.split(':');
            match (parts.next(), parts.next()) {
                (Some(ns), Some(id)) if !ns.is_empty() && !id.is_empty() => Some(format!("{}:{}", ns, id)),
                _ => None,
            }
        });
        for chain in declared.chain(from_accounts) {
            if !seen.contains(&chain) {
                seen.push(chain);
            }
        }
        chains.extend(seen.into_iter().map(CaipNetworkId::from_raw));
    }
    chains
}
