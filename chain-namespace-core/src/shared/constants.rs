//! Constants for the namespace coordinator
//!
//! This module contains all constants used throughout the coordinator.

use crate::shared::types::ChainNamespace;

// Persistence keys
pub const ACTIVE_NAMESPACE_KEY: &str = "@appkit/active_namespace";
pub const ACTIVE_CAIP_NETWORK_ID_KEY: &str = "@appkit/active_caip_network_id";

// Environment
pub const ENV_PREFIX: &str = "CHAIN_CORE";
pub const CONFIG_FILE_ENV: &str = "CHAIN_CORE_CONFIG_FILE";
pub const DEFAULT_STORAGE_FILE: &str = "chain-namespace-state.json";

// Session defaults
pub const DEFAULT_SESSION_EVENTS: &[&str] = &["accountsChanged", "chainChanged"];

pub const EIP155_METHODS: &[&str] = &[
    "eth_accounts",
    "eth_requestAccounts",
    "eth_sendRawTransaction",
    "eth_sign",
    "eth_signTransaction",
    "eth_signTypedData",
    "eth_signTypedData_v3",
    "eth_signTypedData_v4",
    "eth_sendTransaction",
    "personal_sign",
    "wallet_switchEthereumChain",
    "wallet_addEthereumChain",
    "wallet_getPermissions",
    "wallet_requestPermissions",
    "wallet_registerOnboarding",
    "wallet_watchAsset",
    "wallet_scanQRCode",
    "wallet_getCallsStatus",
    "wallet_showCallsStatus",
    "wallet_sendCalls",
    "wallet_getCapabilities",
    "wallet_grantPermissions",
    "wallet_revokePermissions",
    "wallet_getAssets",
];

pub const SOLANA_METHODS: &[&str] = &[
    "solana_signMessage",
    "solana_signTransaction",
    "solana_requestAccounts",
    "solana_getAccounts",
    "solana_signAllTransactions",
    "solana_signAndSendTransaction",
];

pub const BIP122_METHODS: &[&str] = &["sendTransfer", "signMessage", "signPsbt", "getAccountAddresses"];

/// Default session methods for a namespace family
pub fn default_methods(namespace: ChainNamespace) -> &'static [&'static str] {
    match namespace {
        ChainNamespace::Eip155 => EIP155_METHODS,
        ChainNamespace::Solana => SOLANA_METHODS,
        ChainNamespace::Bip122 => BIP122_METHODS,
        _ => &[],
    }
}

// Wallets whose session lists a single chain but accept switching to any chain
pub const SINGLE_NAMESPACE_WALLETS: &[&str] = &["MetaMask Wallet"];

// Feature availability per namespace
pub const NAMES_SUPPORTED_CHAIN_NAMESPACES: &[ChainNamespace] = &[ChainNamespace::Eip155];
pub const AUTH_CONNECTOR_SUPPORTED_CHAINS: &[ChainNamespace] =
    &[ChainNamespace::Eip155, ChainNamespace::Solana];

// Legacy Solana chain references still recognised by older wallets
pub const SOLANA_MAINNET_CHAIN_ID: &str = "5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp";
pub const SOLANA_MAINNET_DEPRECATED_CHAIN_ID: &str = "4sGjMW1sUnHzSxGspuhpqLDx6wiyjNtZ";
pub const SOLANA_DEVNET_CHAIN_ID: &str = "EtWTRABZaYq6iMfeYKouRu166VU2xqa1";
pub const SOLANA_DEVNET_DEPRECATED_CHAIN_ID: &str = "8E9rvCKLFQia2Y35HXjjpWzj8weVo44K";

// Bitcoin genesis-hash chain references
pub const BITCOIN_MAINNET_CHAIN_ID: &str = "000000000019d6689c085ae165831e93";
pub const BITCOIN_TESTNET_CHAIN_ID: &str = "000000000933ea01ad0ee984209779ba";
