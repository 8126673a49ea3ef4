//! Network client backed by a session provider

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use super::get_chains_from_namespaces;
use crate::application::ports::{ChainProvider, NetworkControllerClient};
use crate::domain::entities::network::CaipNetwork;
use crate::shared::error::ProviderError;
use crate::shared::types::{ApprovedNetworksData, ChainNamespace};

const SWITCH_CHAIN_METHOD: &str = "wallet_switchEthereumChain";

/// Adapts a `ChainProvider` to the per-namespace `NetworkControllerClient`
/// seam used by the coordinator
pub struct UniversalNetworkClient<P: ChainProvider> {
    provider: Arc<P>,
    namespace: ChainNamespace,
}

impl<P: ChainProvider> UniversalNetworkClient<P> {
    pub fn new(provider: Arc<P>, namespace: ChainNamespace) -> Self {
        Self { provider, namespace }
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    pub fn namespace(&self) -> ChainNamespace {
        self.namespace
    }
}

#[async_trait]
impl<P: ChainProvider + 'static> NetworkControllerClient for UniversalNetworkClient<P> {
    async fn switch_caip_network(&self, network: &CaipNetwork) -> Result<(), ProviderError> {
        if self.provider.session_namespaces().is_none() {
            return Err(ProviderError::NoSession);
        }

        if network.chain_namespace == ChainNamespace::Eip155 {
            let chain_id = network.id.as_number().ok_or_else(|| {
                ProviderError::request(format!("Non-numeric eip155 chain id {}", network.id))
            })?;
            let params = json!([{ "chainId": format!("0x{:x}", chain_id) }]);
            self.provider
                .request(SWITCH_CHAIN_METHOD, params, Some(network.caip_network_id.clone()))
                .await?;
        }

        self.provider.set_default_chain(&network.caip_network_id);
        log::debug!("Provider default chain set to {}", network.caip_network_id);
        Ok(())
    }

    async fn get_approved_caip_networks_data(&self) -> Result<ApprovedNetworksData, ProviderError> {
        let Some(session) = self.provider.session_namespaces() else {
            return Ok(ApprovedNetworksData::all_networks());
        };
        let approved_caip_network_ids = get_chains_from_namespaces(&session)
            .into_iter()
            .filter(|id| id.namespace() == Some(self.namespace))
            .collect();
        Ok(ApprovedNetworksData {
            supports_all_networks: false,
            approved_caip_network_ids,
        })
    }

    fn connected_wallet_name(&self) -> Option<String> {
        self.provider.peer_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockChainProvider;
    use crate::domain::entities::network::{POLYGON, SOLANA};
    use crate::shared::types::{SessionNamespace, SessionNamespaces};
    use mockall::predicate::eq;

    fn session() -> SessionNamespaces {
        let mut session = SessionNamespaces::new();
        session.insert(
            "eip155".to_string(),
            SessionNamespace {
                accounts: vec!["eip155:137:0xabc".to_string()],
                chains: Some(vec!["eip155:1".to_string()]),
                ..Default::default()
            },
        );
        session.insert(
            "solana".to_string(),
            SessionNamespace {
                accounts: vec!["solana:5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp:Abc".to_string()],
                ..Default::default()
            },
        );
        session
    }

    #[tokio::test]
    async fn test_eip155_switch_requests_wallet_then_sets_default() {
        let mut provider = MockChainProvider::new();
        provider.expect_session_namespaces().returning(|| Some(session()));
        provider
            .expect_request()
            .withf(|method, params, chain| {
                method.to_string() == "wallet_switchEthereumChain"
                    && params[0]["chainId"] == "0x89"
                    && chain.as_ref().map(|c| c.as_str()) == Some("eip155:137")
            })
            .times(1)
            .returning(|_, _, _| Ok(serde_json::Value::Null));
        provider
            .expect_set_default_chain()
            .with(eq(POLYGON.caip_network_id.clone()))
            .times(1)
            .return_const(());

        let client = UniversalNetworkClient::new(Arc::new(provider), ChainNamespace::Eip155);
        client.switch_caip_network(&POLYGON).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_switch_does_not_set_default() {
        let mut provider = MockChainProvider::new();
        provider.expect_session_namespaces().returning(|| Some(session()));
        provider
            .expect_request()
            .returning(|_, _, _| Err(ProviderError::rejected("User rejected the request")));
        provider.expect_set_default_chain().never();

        let client = UniversalNetworkClient::new(Arc::new(provider), ChainNamespace::Eip155);
        let err = client.switch_caip_network(&POLYGON).await.unwrap_err();
        assert!(matches!(err, ProviderError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_non_evm_switch_only_sets_default() {
        let mut provider = MockChainProvider::new();
        provider.expect_session_namespaces().returning(|| Some(session()));
        provider.expect_request().never();
        provider.expect_set_default_chain().times(1).return_const(());

        let client = UniversalNetworkClient::new(Arc::new(provider), ChainNamespace::Solana);
        client.switch_caip_network(&SOLANA).await.unwrap();
    }

    #[tokio::test]
    async fn test_approved_ids_come_from_session() {
        let mut provider = MockChainProvider::new();
        provider.expect_session_namespaces().returning(|| Some(session()));
        provider
            .expect_peer_name()
            .returning(|| Some("MetaMask Wallet".to_string()));

        let client = UniversalNetworkClient::new(Arc::new(provider), ChainNamespace::Eip155);
        let data = client.get_approved_caip_networks_data().await.unwrap();
        assert!(!data.supports_all_networks);
        let ids: Vec<&str> = data.approved_caip_network_ids.iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["eip155:1", "eip155:137"]);
        assert_eq!(client.connected_wallet_name().as_deref(), Some("MetaMask Wallet"));
    }

    #[tokio::test]
    async fn test_without_session() {
        let mut provider = MockChainProvider::new();
        provider.expect_session_namespaces().returning(|| None);
        provider.expect_request().never();

        let client = UniversalNetworkClient::new(Arc::new(provider), ChainNamespace::Eip155);
        assert_eq!(
            client.get_approved_caip_networks_data().await.unwrap(),
            ApprovedNetworksData::all_networks()
        );
        assert_eq!(
            client.switch_caip_network(&POLYGON).await.unwrap_err(),
            ProviderError::NoSession
        );
    }
}
