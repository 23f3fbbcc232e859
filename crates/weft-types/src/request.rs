//! Declarative deployment request descriptors.

use crate::capability::CapabilityDescriptor;
use crate::ids::ChainSelector;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Per-chain feature toggles for optional programs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainFeatures {
    /// Deploy the stablecoin transfer pool on this chain.
    pub stablecoin: bool,
    /// Deploy the batching helper on this chain.
    pub multicall: bool,
}

/// How mutating operations take effect for one run.
///
/// Selected once per request; callers of the change executor never branch on
/// the active mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionMode {
    /// Sign, submit, and block until confirmation.
    Direct,

    /// Accumulate operations into per-chain change batches and bundle them
    /// into a timelocked governance proposal for external approval.
    Batched {
        /// Minimum timelock delay before the proposal may execute.
        #[serde(with = "crate::serde_util::duration_millis")]
        min_delay: Duration,
    },
}

impl Default for ExecutionMode {
    fn default() -> Self {
        ExecutionMode::Direct
    }
}

/// Declarative descriptor for one deployment request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployRequest {
    /// Chain carrying the capability registry.
    pub home_chain: ChainSelector,
    /// Target chains to bring up to the topology. Should include the home
    /// chain when it also needs programs deployed.
    pub chains: Vec<ChainSelector>,
    /// Optional-program flags per chain; absent chains get the defaults.
    pub features: HashMap<ChainSelector, ChainFeatures>,
    /// Capabilities to register on the home registry.
    pub capabilities: Vec<CapabilityDescriptor>,
    /// Operator node identities backing the registered capabilities.
    pub operators: Vec<String>,
    /// Execution strategy for every mutating call in the run.
    pub mode: ExecutionMode,
}

impl DeployRequest {
    /// Create a request with default features, no capabilities, direct mode.
    pub fn new(home_chain: ChainSelector, chains: Vec<ChainSelector>) -> Self {
        Self {
            home_chain,
            chains,
            features: HashMap::new(),
            capabilities: Vec::new(),
            operators: Vec::new(),
            mode: ExecutionMode::Direct,
        }
    }

    /// Feature flags for one chain, defaulting when unspecified.
    pub fn features_for(&self, chain: ChainSelector) -> ChainFeatures {
        self.features.get(&chain).copied().unwrap_or_default()
    }

    /// Set the execution mode.
    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the capabilities to register.
    pub fn with_capabilities(mut self, capabilities: Vec<CapabilityDescriptor>) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Set the operator node identities.
    pub fn with_operators(mut self, operators: Vec<String>) -> Self {
        self.operators = operators;
        self
    }

    /// Set feature flags for one chain.
    pub fn with_features(mut self, chain: ChainSelector, features: ChainFeatures) -> Self {
        self.features.insert(chain, features);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unspecified_chains_get_default_features() {
        let request = DeployRequest::new(ChainSelector(1), vec![ChainSelector(1), ChainSelector(2)])
            .with_features(
                ChainSelector(2),
                ChainFeatures {
                    stablecoin: true,
                    multicall: false,
                },
            );
        assert!(!request.features_for(ChainSelector(1)).stablecoin);
        assert!(request.features_for(ChainSelector(2)).stablecoin);
    }
}
