use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::shared::error::CoordinatorError;

// Chain namespaces - one family of chains sharing an addressing/method convention
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub enum ChainNamespace {
    Eip155,
    Solana,
    Bip122,
    Polkadot,
    Cosmos,
    Sui,
    Stacks,
}

impl ChainNamespace {
    pub const ALL: [ChainNamespace; 7] = [
        ChainNamespace::Eip155,
        ChainNamespace::Solana,
        ChainNamespace::Bip122,
        ChainNamespace::Polkadot,
        ChainNamespace::Cosmos,
        ChainNamespace::Sui,
        ChainNamespace::Stacks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChainNamespace::Eip155 => "eip155",
            ChainNamespace::Solana => "solana",
            ChainNamespace::Bip122 => "bip122",
            ChainNamespace::Polkadot => "polkadot",
            ChainNamespace::Cosmos => "cosmos",
            ChainNamespace::Sui => "sui",
            ChainNamespace::Stacks => "stacks",
        }
    }
}

impl fmt::Display for ChainNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChainNamespace {
    type Err = CoordinatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChainNamespace::ALL
            .iter()
            .find(|namespace| namespace.as_str() == s)
            .copied()
            .ok_or_else(|| CoordinatorError::validation(format!("Unknown chain namespace: {}", s)))
    }
}

impl TryFrom<String> for ChainNamespace {
    type Error = CoordinatorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ChainNamespace> for String {
    fn from(namespace: ChainNamespace) -> Self {
        namespace.as_str().to_string()
    }
}

/// Chain reference inside a namespace (`1`, `84532`, `5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ChainId(String);

impl ChainId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric form, for chains whose reference is a plain integer
    pub fn as_number(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for ChainId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ChainId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// `<namespace>:<chain id>`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct CaipNetworkId(String);

impl CaipNetworkId {
    pub fn new(namespace: ChainNamespace, chain_id: &ChainId) -> Self {
        Self(format!("{}:{}", namespace, chain_id))
    }

    /// Wrap a raw identifier without validating it. Session payloads may
    /// carry namespaces this crate does not model.
    pub fn from_raw(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn parse(id: &str) -> Result<Self, CoordinatorError> {
        let (namespace, chain_id) = id
            .split_once(':')
            .ok_or_else(|| CoordinatorError::validation(format!("Invalid caip network id: {}", id)))?;
        if chain_id.is_empty() || chain_id.contains(':') {
            return Err(CoordinatorError::validation(format!("Invalid caip network id: {}", id)));
        }
        let namespace: ChainNamespace = namespace.parse()?;
        Ok(Self::new(namespace, &ChainId::new(chain_id)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn namespace(&self) -> Option<ChainNamespace> {
        self.0.split(':').next().and_then(|ns| ns.parse().ok())
    }

    pub fn chain_id(&self) -> Option<ChainId> {
        self.0.split(':').nth(1).map(ChainId::new)
    }
}

impl fmt::Display for CaipNetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CaipNetworkId {
    type Err = CoordinatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Externally visible slice of the selection, pushed to the public state projector
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicStatePatch {
    pub active_chain: Option<ChainNamespace>,
    pub selected_network_id: Option<CaipNetworkId>,
}

/// What the wallet reports it currently approves for a namespace
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedNetworksData {
    pub supports_all_networks: bool,
    pub approved_caip_network_ids: Vec<CaipNetworkId>,
}

impl ApprovedNetworksData {
    /// Answer for connectors that are not session based
    pub fn all_networks() -> Self {
        Self {
            supports_all_networks: true,
            approved_caip_network_ids: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub event: String,
    pub properties: BTreeMap<String, String>,
    pub timestamp: DateTime<Utc>,
}

impl AnalyticsEvent {
    pub fn switch_network(network: &CaipNetworkId) -> Self {
        let mut properties = BTreeMap::new();
        properties.insert("network".to_string(), network.to_string());
        Self {
            event_type: "track".to_string(),
            event: "SWITCH_NETWORK".to_string(),
            properties,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwitchActiveNetworkOptions {
    /// Return the provider error to the caller instead of navigating back
    pub throw_on_failure: bool,
}

/// One namespace entry of a live wallet session
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionNamespace {
    #[serde(default)]
    pub accounts: Vec<String>,
    #[serde(default)]
    pub chains: Option<Vec<String>>,
    #[serde(default)]
    pub methods: Vec<String>,
    #[serde(default)]
    pub events: Vec<String>,
}

pub type SessionNamespaces = BTreeMap<String, SessionNamespace>;

/// Events a connected provider pushes into the coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    Connect { namespace: ChainNamespace },
    Disconnect { namespace: ChainNamespace },
    AccountsChanged { namespace: ChainNamespace, accounts: Vec<String> },
    ChainChanged { namespace: ChainNamespace, chain_id: ChainId },
    DisplayUri { uri: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_round_trip_strings() {
        assert_eq!(ChainNamespace::Eip155.to_string(), "eip155");
        assert_eq!("bip122".parse::<ChainNamespace>().unwrap(), ChainNamespace::Bip122);
        assert!("tron".parse::<ChainNamespace>().is_err());
    }

    #[test]
    fn test_caip_network_id_parts() {
        let id = CaipNetworkId::new(ChainNamespace::Eip155, &ChainId::from(84532u64));
        assert_eq!(id.as_str(), "eip155:84532");
        assert_eq!(id.namespace(), Some(ChainNamespace::Eip155));
        assert_eq!(id.chain_id().and_then(|c| c.as_number()), Some(84532));
    }

    #[test]
    fn test_caip_network_id_rejects_malformed() {
        assert!(CaipNetworkId::parse("eip155").is_err());
        assert!(CaipNetworkId::parse("eip155:").is_err());
        assert!(CaipNetworkId::parse("eip155:1:0xabc").is_err());
        assert!(CaipNetworkId::parse("unknown:1").is_err());
    }

    #[test]
    fn test_switch_network_event_shape() {
        let id = CaipNetworkId::parse("solana:EtWTRABZaYq6iMfeYKouRu166VU2xqa1").unwrap();
        let event = AnalyticsEvent::switch_network(&id);
        assert_eq!(event.event_type, "track");
        assert_eq!(event.event, "SWITCH_NETWORK");
        assert_eq!(event.properties.get("network").map(String::as_str), Some(id.as_str()));
    }

    #[test]
    fn test_public_state_patch_serializes_camel_case() {
        let patch = PublicStatePatch {
            active_chain: Some(ChainNamespace::Solana),
            selected_network_id: None,
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json["activeChain"], "solana");
    }
}
