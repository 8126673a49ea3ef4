//! Utility functions for the namespace coordinator
//!
//! This module contains common utility functions used throughout the coordinator.

use crate::domain::entities::network::CaipNetwork;
use crate::shared::error::CoordinatorError;
use crate::shared::types::{CaipNetworkId, ChainId, ChainNamespace};

/// Generate a unique ID
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Stable partition: networks whose caip id is approved move ahead of the
/// rest, relative order inside both groups is kept.
pub fn sort_requested_networks(
    approved_ids: &[CaipNetworkId],
    requested: Vec<CaipNetwork>,
) -> Vec<CaipNetwork> {
    if approved_ids.is_empty() {
        return requested;
    }
    let (mut approved, rest): (Vec<_>, Vec<_>) = requested
        .into_iter()
        .partition(|network| approved_ids.contains(&network.caip_network_id));
    approved.extend(rest);
    approved
}

/// Parsed `<namespace>:<chain id>:<address>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaipAddress {
    pub chain_namespace: String,
    pub chain_id: ChainId,
    pub address: String,
}

impl CaipAddress {
    pub fn caip_network_id(&self) -> CaipNetworkId {
        CaipNetworkId::from_raw(format!("{}:{}", self.chain_namespace, self.chain_id))
    }

    pub fn namespace(&self) -> Option<ChainNamespace> {
        self.chain_namespace.parse().ok()
    }
}

/// Parse a caip-10 account string
pub fn parse_caip_address(caip_address: &str) -> Result<CaipAddress, CoordinatorError> {
    let parts: Vec<&str> = caip_address.split(':').collect();
    match parts.as_slice() {
        [namespace, chain_id, address]
            if !namespace.is_empty() && !chain_id.is_empty() && !address.is_empty() =>
        {
            Ok(CaipAddress {
                chain_namespace: namespace.to_string(),
                chain_id: ChainId::new(*chain_id),
                address: address.to_string(),
            })
        }
        _ => Err(CoordinatorError::validation(format!(
            "Invalid caip address: {}",
            caip_address
        ))),
    }
}

/// Address part of a caip-10 account, if it has one
pub fn get_plain_address(caip_address: &str) -> Option<String> {
    parse_caip_address(caip_address).ok().map(|parsed| parsed.address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::network::{BASE, MAINNET, POLYGON, SEPOLIA};
    use proptest::prelude::*;

    fn ids(networks: &[CaipNetwork]) -> Vec<String> {
        networks.iter().map(|n| n.caip_network_id.to_string()).collect()
    }

    #[test]
    fn test_sort_without_approvals_keeps_order() {
        let requested = vec![MAINNET.clone(), SEPOLIA.clone()];
        let sorted = sort_requested_networks(&[], requested.clone());
        assert_eq!(sorted, requested);
    }

    #[test]
    fn test_sort_is_stable_partition() {
        let requested = vec![MAINNET.clone(), SEPOLIA.clone(), POLYGON.clone(), BASE.clone()];
        let approved = vec![BASE.caip_network_id.clone(), SEPOLIA.caip_network_id.clone()];
        let sorted = sort_requested_networks(&approved, requested);
        // approved keep their requested order, not the approval order
        assert_eq!(ids(&sorted), vec!["eip155:11155111", "eip155:8453", "eip155:1", "eip155:137"]);
    }

    #[test]
    fn test_parse_caip_address() {
        let parsed = parse_caip_address("eip155:1:0x742d35Cc6634C0532925a3b8D4C9db96C4b4d8b6")
            .expect("valid caip address");
        assert_eq!(parsed.namespace(), Some(ChainNamespace::Eip155));
        assert_eq!(parsed.caip_network_id().as_str(), "eip155:1");
        assert_eq!(
            get_plain_address("eip155:1:0xabc").as_deref(),
            Some("0xabc")
        );
        assert!(parse_caip_address("eip155:1").is_err());
        assert!(get_plain_address("0xabc").is_none());
    }

    proptest! {
        #[test]
        fn prop_sort_keeps_every_network_and_puts_approved_first(mask in proptest::collection::vec(any::<bool>(), 4)) {
            let requested = vec![MAINNET.clone(), SEPOLIA.clone(), POLYGON.clone(), BASE.clone()];
            let approved: Vec<CaipNetworkId> = requested
                .iter()
                .zip(mask.iter())
                .filter(|(_, keep)| **keep)
                .map(|(n, _)| n.caip_network_id.clone())
                .collect();

            let sorted = sort_requested_networks(&approved, requested.clone());
            prop_assert_eq!(sorted.len(), requested.len());

            let first_unapproved = sorted
                .iter()
                .position(|n| !approved.contains(&n.caip_network_id))
                .unwrap_or(sorted.len());
            prop_assert!(sorted[first_unapproved..]
                .iter()
                .all(|n| !approved.contains(&n.caip_network_id)));

            let positions: Vec<usize> = sorted
                .iter()
                .map(|n| requested.iter().position(|r| r == n).unwrap())
                .collect();
            prop_assert!(positions[..first_unapproved].windows(2).all(|w| w[0] < w[1]));
            prop_assert!(positions[first_unapproved..].windows(2).all(|w| w[0] < w[1]));
        }
    }
}
