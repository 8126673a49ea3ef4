use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::error::{CoordinatorError, CoordinatorResult};

/// Lifecycle of the coordinator. Transient phases always return to `Ready`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ChainPhase {
    #[default]
    Idle,
    Bootstrapping,
    Ready,
    SwitchingNamespace,
    SwitchingNetwork,
    RefreshingApproved,
    Error,
}

impl ChainPhase {
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ChainPhase::Bootstrapping
                | ChainPhase::SwitchingNamespace
                | ChainPhase::SwitchingNetwork
                | ChainPhase::RefreshingApproved
        )
    }

    pub fn can_transition_to(&self, next: ChainPhase) -> bool {
        use ChainPhase::*;
        match (self, next) {
            (Idle | Ready | Error, Bootstrapping) => true,
            (Bootstrapping, Ready | Error) => true,
            (Ready, SwitchingNamespace | SwitchingNetwork | RefreshingApproved | Error) => true,
            (SwitchingNamespace | SwitchingNetwork | RefreshingApproved, Ready | Error) => true,
            _ => false,
        }
    }

    /// Checked transition
    pub fn transition(self, next: ChainPhase) -> CoordinatorResult<ChainPhase> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoordinatorError::internal(format!(
                "Invalid phase transition {} -> {}",
                self, next
            )))
        }
    }
}

impl fmt::Display for ChainPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChainPhase::Idle => "idle",
            ChainPhase::Bootstrapping => "bootstrapping",
            ChainPhase::Ready => "ready",
            ChainPhase::SwitchingNamespace => "switchingNamespace",
            ChainPhase::SwitchingNetwork => "switchingNetwork",
            ChainPhase::RefreshingApproved => "refreshingApproved",
            ChainPhase::Error => "error",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_transitions() {
        let phase = ChainPhase::default();
        let phase = phase.transition(ChainPhase::Bootstrapping).unwrap();
        let phase = phase.transition(ChainPhase::Ready).unwrap();
        let phase = phase.transition(ChainPhase::SwitchingNetwork).unwrap();
        assert!(phase.is_transient());
        assert_eq!(phase.transition(ChainPhase::Ready).unwrap(), ChainPhase::Ready);
    }

    #[test]
    fn test_rejects_switch_before_bootstrap() {
        let err = ChainPhase::Idle.transition(ChainPhase::SwitchingNetwork).unwrap_err();
        assert!(err.to_string().contains("idle -> switchingNetwork"));
        assert!(!ChainPhase::SwitchingNetwork.can_transition_to(ChainPhase::SwitchingNamespace));
    }
}
