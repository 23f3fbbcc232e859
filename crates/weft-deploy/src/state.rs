//! On-chain state loader.
//!
//! Rebuilds a typed view of every known deployed program from the address
//! book plus live type-verification reads. The view is never mutated in
//! place across operations: any step that needs a consistency guarantee
//! reloads a fresh one.

use crate::env::Environment;
use crate::error::{DeployError, Result};
use std::collections::HashMap;
use tracing::debug;
use weft_registry::{ReadQuery, ReadValue, RegistryError};
use weft_types::{ChainSelector, ContractKind, ContractRecord};

/// Typed view of one chain's deployed programs.
#[derive(Debug, Clone, Default)]
pub struct ChainState {
    records: HashMap<ContractKind, ContractRecord>,
}

impl ChainState {
    /// Record of the given kind, if deployed.
    pub fn get(&self, kind: ContractKind) -> Option<&ContractRecord> {
        self.records.get(&kind)
    }

    /// Whether a record of the kind exists.
    pub fn contains(&self, kind: ContractKind) -> bool {
        self.records.contains_key(&kind)
    }

    /// Record of the given kind, or `MissingDependency` naming the chain.
    pub fn require(&self, chain: ChainSelector, kind: ContractKind) -> Result<&ContractRecord> {
        self.get(kind)
            .ok_or(DeployError::MissingDependency { chain, kind })
    }

    /// The message router, if deployed.
    pub fn router(&self) -> Option<&ContractRecord> {
        self.get(ContractKind::Router)
    }

    /// The fee-routing program, if deployed.
    pub fn fee_quoter(&self) -> Option<&ContractRecord> {
        self.get(ContractKind::FeeQuoter)
    }

    /// The capability registry, if deployed. Only meaningful on the home chain.
    pub fn capability_registry(&self) -> Option<&ContractRecord> {
        self.get(ContractKind::CapabilityRegistry)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn insert(&mut self, record: ContractRecord) {
        self.records.insert(record.kind(), record);
    }
}

/// Per-chain aggregate of everything the address book knows, verified
/// against the live chains.
#[derive(Debug, Clone, Default)]
pub struct OnchainState {
    chains: HashMap<ChainSelector, ChainState>,
}

impl OnchainState {
    /// View of one chain, if the loader saw it.
    pub fn chain(&self, selector: ChainSelector) -> Option<&ChainState> {
        self.chains.get(&selector)
    }

    /// Record of the given kind on the given chain, or `MissingDependency`.
    pub fn require(&self, chain: ChainSelector, kind: ContractKind) -> Result<&ContractRecord> {
        self.chains
            .get(&chain)
            .ok_or(DeployError::MissingDependency { chain, kind })?
            .require(chain, kind)
    }

    /// The registry program on the home chain.
    pub fn home_capability_registry(&self, home: ChainSelector) -> Result<&ContractRecord> {
        self.require(home, ContractKind::CapabilityRegistry)
    }
}

/// Rebuild the typed view for the given chains.
///
/// Read-only and safe to call repeatedly and concurrently. Every address
/// book record is verified against the live program's self-reported type;
/// a mismatch (including an address with no program behind it) is fatal
/// `StateInconsistent` — deployment must never guess an address.
pub async fn load_onchain_state(
    env: &Environment,
    chains: &[ChainSelector],
) -> Result<OnchainState> {
    let mut state = OnchainState::default();

    for &selector in chains {
        let client = env.chain(selector)?;
        let mut chain_state = ChainState::default();

        for record in env.address_book().records_for(selector).await? {
            let live = match client.read(record.address, ReadQuery::TypeAndVersion).await {
                Ok(ReadValue::TypeAndVersion(tv)) => tv,
                Ok(other) => {
                    return Err(DeployError::Internal(format!(
                        "unexpected read result for type query: {other:?}"
                    )))
                }
                Err(RegistryError::UnknownContract { .. }) => {
                    return Err(DeployError::StateInconsistent {
                        chain: selector,
                        address: record.address,
                        recorded: record.tv.to_string(),
                        live: "no program".into(),
                    })
                }
                Err(err) => return Err(err.into()),
            };

            if live.kind != record.kind() {
                return Err(DeployError::StateInconsistent {
                    chain: selector,
                    address: record.address,
                    recorded: record.tv.to_string(),
                    live: live.to_string(),
                });
            }

            chain_state.insert(record);
        }

        debug!(chain = %selector, records = chain_state.len(), "loaded chain state");
        state.chains.insert(selector, chain_state);
    }

    Ok(state)
}
