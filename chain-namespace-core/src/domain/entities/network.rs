//! Network entity for the namespace coordinator

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::shared::constants::*;
use crate::shared::error::CoordinatorError;
use crate::shared::types::{CaipNetworkId, ChainId, ChainNamespace};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl NativeCurrency {
    pub fn new(name: &str, symbol: &str, decimals: u8) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RpcUrls {
    pub http: Vec<String>,
    #[serde(default)]
    pub web_socket: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockExplorer {
    pub name: String,
    pub url: String,
}

/// One concrete chain. Identity is `(chain_namespace, id)`; the value is
/// never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CaipNetwork {
    pub chain_namespace: ChainNamespace,
    pub id: ChainId,
    pub caip_network_id: CaipNetworkId,
    pub name: String,
    /// Keyed by transport group, `default` first
    pub rpc_urls: BTreeMap<String, RpcUrls>,
    pub native_currency: NativeCurrency,
    #[serde(default)]
    pub block_explorers: BTreeMap<String, BlockExplorer>,
    #[serde(default)]
    pub testnet: bool,
    #[serde(default)]
    pub deprecated_caip_network_id: Option<CaipNetworkId>,
}

impl CaipNetwork {
    pub fn new(
        chain_namespace: ChainNamespace,
        id: impl Into<ChainId>,
        name: &str,
        rpc_url: &str,
        native_currency: NativeCurrency,
    ) -> Self {
        let id = id.into();
        let mut rpc_urls = BTreeMap::new();
        rpc_urls.insert(
            "default".to_string(),
            RpcUrls {
                http: vec![rpc_url.to_string()],
                web_socket: Vec::new(),
            },
        );
        Self {
            caip_network_id: CaipNetworkId::new(chain_namespace, &id),
            chain_namespace,
            id,
            name: name.to_string(),
            rpc_urls,
            native_currency,
            block_explorers: BTreeMap::new(),
            testnet: false,
            deprecated_caip_network_id: None,
        }
    }

    pub fn with_block_explorer(mut self, name: &str, url: &str) -> Self {
        self.block_explorers.insert(
            "default".to_string(),
            BlockExplorer {
                name: name.to_string(),
                url: url.to_string(),
            },
        );
        self
    }

    pub fn with_testnet(mut self, testnet: bool) -> Self {
        self.testnet = testnet;
        self
    }

    pub fn with_deprecated_chain_id(mut self, chain_id: &str) -> Self {
        self.deprecated_caip_network_id =
            Some(CaipNetworkId::new(self.chain_namespace, &ChainId::new(chain_id)));
        self
    }

    /// First http endpoint of the default transport group
    pub fn default_rpc_url(&self) -> Option<&str> {
        self.rpc_urls
            .get("default")
            .and_then(|urls| urls.http.first())
            .map(String::as_str)
    }

    pub fn default_block_explorer(&self) -> Option<&BlockExplorer> {
        self.block_explorers.get("default")
    }

    /// Networks arriving over a boundary (config files, JSON) must agree
    /// with their own caip id.
    pub fn validate(&self) -> Result<(), CoordinatorError> {
        if self.name.is_empty() {
            return Err(CoordinatorError::validation("Network name cannot be empty"));
        }
        if self.id.as_str().is_empty() {
            return Err(CoordinatorError::validation("Network id cannot be empty"));
        }
        let expected = CaipNetworkId::new(self.chain_namespace, &self.id);
        if expected != self.caip_network_id {
            return Err(CoordinatorError::validation(format!(
                "caip network id {} does not match {}",
                self.caip_network_id, expected
            )));
        }
        Ok(())
    }
}

lazy_static! {
    pub static ref MAINNET: CaipNetwork = CaipNetwork::new(
        ChainNamespace::Eip155,
        1u64,
        "Ethereum",
        "https://eth.merkle.io",
        NativeCurrency::new("Ether", "ETH", 18),
    )
    .with_block_explorer("Etherscan", "https://etherscan.io");

    pub static ref SEPOLIA: CaipNetwork = CaipNetwork::new(
        ChainNamespace::Eip155,
        11155111u64,
        "Sepolia",
        "https://sepolia.drpc.org",
        NativeCurrency::new("Sepolia Ether", "ETH", 18),
    )
    .with_block_explorer("Etherscan", "https://sepolia.etherscan.io")
    .with_testnet(true);

    pub static ref POLYGON: CaipNetwork = CaipNetwork::new(
        ChainNamespace::Eip155,
        137u64,
        "Polygon",
        "https://polygon-rpc.com",
        NativeCurrency::new("POL", "POL", 18),
    )
    .with_block_explorer("PolygonScan", "https://polygonscan.com");

    pub static ref BASE: CaipNetwork = CaipNetwork::new(
        ChainNamespace::Eip155,
        8453u64,
        "Base",
        "https://mainnet.base.org",
        NativeCurrency::new("Ether", "ETH", 18),
    )
    .with_block_explorer("Basescan", "https://basescan.org");

    pub static ref SOLANA: CaipNetwork = CaipNetwork::new(
        ChainNamespace::Solana,
        SOLANA_MAINNET_CHAIN_ID,
        "Solana",
        "https://rpc.walletconnect.org/v1",
        NativeCurrency::new("Solana", "SOL", 9),
    )
    .with_block_explorer("Solscan", "https://solscan.io")
    .with_deprecated_chain_id(SOLANA_MAINNET_DEPRECATED_CHAIN_ID);

    pub static ref SOLANA_DEVNET: CaipNetwork = CaipNetwork::new(
        ChainNamespace::Solana,
        SOLANA_DEVNET_CHAIN_ID,
        "Solana Devnet",
        "https://rpc.walletconnect.org/v1",
        NativeCurrency::new("Solana", "SOL", 9),
    )
    .with_block_explorer("Solscan", "https://solscan.io")
    .with_testnet(true)
    .with_deprecated_chain_id(SOLANA_DEVNET_DEPRECATED_CHAIN_ID);

    pub static ref BITCOIN: CaipNetwork = CaipNetwork::new(
        ChainNamespace::Bip122,
        BITCOIN_MAINNET_CHAIN_ID,
        "Bitcoin",
        "https://rpc.walletconnect.org/v1",
        NativeCurrency::new("Bitcoin", "BTC", 8),
    )
    .with_block_explorer("Mempool", "https://mempool.space");

    pub static ref BITCOIN_TESTNET: CaipNetwork = CaipNetwork::new(
        ChainNamespace::Bip122,
        BITCOIN_TESTNET_CHAIN_ID,
        "Bitcoin Testnet",
        "https://rpc.walletconnect.org/v1",
        NativeCurrency::new("Bitcoin", "BTC", 8),
    )
    .with_testnet(true);
}

/// Networks known to the crate, in catalogue order
pub fn known_networks() -> Vec<CaipNetwork> {
    vec![
        MAINNET.clone(),
        SEPOLIA.clone(),
        POLYGON.clone(),
        BASE.clone(),
        SOLANA.clone(),
        SOLANA_DEVNET.clone(),
        BITCOIN.clone(),
        BITCOIN_TESTNET.clone(),
    ]
}
