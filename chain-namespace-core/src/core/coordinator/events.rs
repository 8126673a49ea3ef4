//! Provider event handling

use super::NetworkSwitchCoordinator;
use crate::shared::error::CoordinatorResult;
use crate::shared::types::ProviderEvent;

impl NetworkSwitchCoordinator {
    /// React to an event pushed by a connected provider.
    ///
    /// A chain change reported by the wallet is committed without another
    /// wallet round trip. Unknown chains open the unsupported-chain UI unless
    /// switching is disabled, unsupported chains are allowed, or the session
    /// is a basic WalletConnect one.
    pub async fn handle_provider_event(&self, event: ProviderEvent) -> CoordinatorResult<()> {
        match event {
            ProviderEvent::Connect { namespace } => {
                log::info!("Provider connected on {}", namespace);
                self.refresh_approved_networks_for(namespace).await?;
            }
            ProviderEvent::Disconnect { namespace } => {
                log::info!("Provider disconnected from {}", namespace);
                self.write().clear_approval(namespace);
                self.notify(&[namespace]);
            }
            ProviderEvent::ChainChanged { namespace, chain_id } => {
                let (known, already_active) = {
                    let registry = self.read();
                    let known = registry
                        .state(namespace)
                        .and_then(|state| state.find_by_id(&chain_id))
                        .cloned();
                    let already_active = registry
                        .active_caip_network()
                        .is_some_and(|n| n.chain_namespace == namespace && n.id == chain_id);
                    (known, already_active)
                };

                if already_active {
                    return Ok(());
                }
                match known {
                    Some(network) => {
                        log::info!("Wallet moved to {}", network.caip_network_id);
                        self.commit_network(&network);
                        self.notify(&[namespace]);
                    }
                    None => {
                        log::warn!("Wallet moved to unknown chain {}:{}", namespace, chain_id);
                        let options = self.options();
                        if options.enable_network_switch
                            && !options.allow_unsupported_chain
                            && !options.wc_basic
                        {
                            self.ports.navigation.show_unsupported_chain_ui();
                        }
                    }
                }
            }
            ProviderEvent::AccountsChanged { namespace, accounts } => {
                log::debug!("{} account(s) on {}", accounts.len(), namespace);
            }
            ProviderEvent::DisplayUri { uri } => {
                log::debug!("Pairing uri available ({} chars)", uri.len());
            }
        }
        Ok(())
    }
}
