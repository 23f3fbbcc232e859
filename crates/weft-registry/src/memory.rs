//! In-memory implementations of the registry seams.
//!
//! These are suitable for development and testing. Production deployments
//! wire in persistent address books, real chain clients, and a real
//! governance proposal service.

use crate::address_book::{AddressBook, AddressDelta};
use crate::chain::{
    ChainClient, DeployArtifact, DeployedContract, ReadQuery, ReadValue, Receipt, TxHandle,
};
use crate::error::{RegistryError, Result};
use crate::proposal::ProposalBuilder;
use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;
use weft_types::{
    Address, CallData, CapabilityHash, ChainSelector, ChangeBatch, ChangeOperation, ContractKind,
    ContractRecord, GovernanceProposal, TypeAndVersion,
};

/// In-memory address book.
///
/// Records are partitioned by chain selector, so concurrent merges from
/// distinct chains touch disjoint entries.
pub struct InMemoryAddressBook {
    chains: DashMap<ChainSelector, Vec<ContractRecord>>,
}

impl InMemoryAddressBook {
    pub fn new() -> Self {
        Self {
            chains: DashMap::new(),
        }
    }
}

impl Default for InMemoryAddressBook {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AddressBook for InMemoryAddressBook {
    async fn get(&self, chain: ChainSelector, kind: ContractKind) -> Result<Option<ContractRecord>> {
        Ok(self.chains.get(&chain).and_then(|records| {
            records.iter().rev().find(|r| r.kind() == kind).cloned()
        }))
    }

    async fn records_for(&self, chain: ChainSelector) -> Result<Vec<ContractRecord>> {
        Ok(self
            .chains
            .get(&chain)
            .map(|records| records.clone())
            .unwrap_or_default())
    }

    async fn contains(&self, chain: ChainSelector, kind: ContractKind) -> Result<bool> {
        Ok(self
            .chains
            .get(&chain)
            .map(|records| records.iter().any(|r| r.kind() == kind))
            .unwrap_or(false))
    }

    async fn merge(&self, delta: AddressDelta) -> Result<()> {
        for (chain, record) in delta.records() {
            let mut records = self.chains.entry(*chain).or_default();
            // Same (kind, version) replaces; a new version sits side by side.
            match records.iter_mut().find(|r| r.tv == record.tv) {
                Some(existing) => *existing = record.clone(),
                None => records.push(record.clone()),
            }
        }
        Ok(())
    }
}

/// Per-address program state held by a [`SimulatedChain`].
#[derive(Debug, Clone)]
struct SimContract {
    tv: TypeAndVersion,
    capabilities: Vec<CapabilityHash>,
    authorized: Vec<Address>,
    groups: Vec<String>,
    operators: Vec<String>,
}

impl SimContract {
    fn new(tv: TypeAndVersion) -> Self {
        Self {
            tv,
            capabilities: Vec::new(),
            authorized: Vec::new(),
            groups: Vec::new(),
            operators: Vec::new(),
        }
    }
}

/// In-memory chain client with per-address program state.
///
/// Mutations apply at submission; confirmation is bookkeeping. The simulated
/// registry program mirrors the real one's abort-on-duplicate-capability
/// behavior, and deployments of a chosen contract kind can be made to fail
/// for failure-isolation tests.
pub struct SimulatedChain {
    selector: ChainSelector,
    contracts: DashMap<Address, SimContract>,
    deploy_nonce: AtomicU64,
    tx_counter: AtomicU64,
    confirmed: DashSet<u64>,
    failing_kinds: DashSet<ContractKind>,
}

impl SimulatedChain {
    pub fn new(selector: ChainSelector) -> Self {
        Self {
            selector,
            contracts: DashMap::new(),
            deploy_nonce: AtomicU64::new(0),
            tx_counter: AtomicU64::new(0),
            confirmed: DashSet::new(),
            failing_kinds: DashSet::new(),
        }
    }

    /// Make every subsequent deployment of `kind` fail.
    pub fn fail_deployments_of(&self, kind: ContractKind) {
        self.failing_kinds.insert(kind);
    }

    /// Clear every injected deployment failure.
    pub fn clear_deploy_failures(&self) {
        self.failing_kinds.clear();
    }

    /// Number of programs deployed on this chain.
    pub fn deployed_count(&self) -> usize {
        self.contracts.len()
    }

    fn next_tx(&self) -> TxHandle {
        let id = self.tx_counter.fetch_add(1, Ordering::SeqCst);
        self.confirmed.insert(id);
        TxHandle(id)
    }

    fn apply(&self, op: &ChangeOperation) -> Result<()> {
        let call = CallData::decode(&op.data)?;
        let mut contract =
            self.contracts
                .get_mut(&op.to)
                .ok_or(RegistryError::UnknownContract {
                    chain: self.selector,
                    address: op.to,
                })?;

        match call {
            CallData::AddCapabilities { capabilities } => {
                // The real registry reverts the whole transaction on a
                // duplicate, so check everything before mutating anything.
                for cap in &capabilities {
                    if contract.capabilities.contains(&cap.hashed_id()) {
                        return Err(RegistryError::Reverted {
                            chain: self.selector,
                            reason: format!("capability already registered: {cap}"),
                        });
                    }
                }
                for cap in &capabilities {
                    contract.capabilities.push(cap.hashed_id());
                }
            }
            CallData::UpdateNodes { operators, .. } => {
                contract.operators = operators;
            }
            CallData::AuthorizeCallers { added, removed } => {
                for caller in added {
                    if !contract.authorized.contains(&caller) {
                        contract.authorized.push(caller);
                    }
                }
                contract.authorized.retain(|c| !removed.contains(c));
            }
            CallData::RegisterGroup { name, .. } => {
                contract.groups.push(name);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ChainClient for SimulatedChain {
    fn selector(&self) -> ChainSelector {
        self.selector
    }

    async fn deploy(&self, artifact: &DeployArtifact) -> Result<DeployedContract> {
        if self.failing_kinds.contains(&artifact.tv.kind) {
            return Err(RegistryError::DeployRejected {
                chain: self.selector,
                reason: format!("injected failure for {}", artifact.tv.kind),
            });
        }

        let nonce = self.deploy_nonce.fetch_add(1, Ordering::SeqCst);
        let address = Address::derive(self.selector, nonce);
        self.contracts
            .insert(address, SimContract::new(artifact.tv.clone()));

        debug!(chain = %self.selector, kind = %artifact.tv.kind, %address, "simulated deploy");

        Ok(DeployedContract {
            address,
            tx: self.next_tx(),
        })
    }

    async fn submit(&self, op: &ChangeOperation) -> Result<TxHandle> {
        self.apply(op)?;
        Ok(self.next_tx())
    }

    async fn confirm(&self, tx: TxHandle) -> Result<Receipt> {
        if !self.confirmed.contains(&tx.0) {
            return Err(RegistryError::UnknownTx(tx.0));
        }
        Ok(Receipt {
            tx,
            confirmed_at: chrono::Utc::now(),
        })
    }

    async fn read(&self, target: Address, query: ReadQuery) -> Result<ReadValue> {
        let contract = self
            .contracts
            .get(&target)
            .ok_or(RegistryError::UnknownContract {
                chain: self.selector,
                address: target,
            })?;

        Ok(match query {
            ReadQuery::TypeAndVersion => ReadValue::TypeAndVersion(contract.tv.clone()),
            ReadQuery::RegisteredCapabilities => {
                ReadValue::CapabilityHashes(contract.capabilities.clone())
            }
            ReadQuery::AuthorizedCallers => ReadValue::Addresses(contract.authorized.clone()),
            ReadQuery::Groups => ReadValue::Groups(contract.groups.clone()),
        })
    }
}

/// In-memory proposal builder that records every created proposal.
pub struct InMemoryProposalBuilder {
    proposals: DashMap<Uuid, GovernanceProposal>,
}

impl InMemoryProposalBuilder {
    pub fn new() -> Self {
        Self {
            proposals: DashMap::new(),
        }
    }

    /// Every proposal created through this builder.
    pub fn proposals(&self) -> Vec<GovernanceProposal> {
        self.proposals.iter().map(|p| p.value().clone()).collect()
    }
}

impl Default for InMemoryProposalBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProposalBuilder for InMemoryProposalBuilder {
    async fn propose(
        &self,
        batches: Vec<ChangeBatch>,
        min_delay: Duration,
    ) -> Result<GovernanceProposal> {
        if batches.iter().all(ChangeBatch::is_empty) {
            return Err(RegistryError::EmptyProposal);
        }

        let proposal = GovernanceProposal {
            id: Uuid::new_v4(),
            created_at: chrono::Utc::now(),
            min_delay,
            batches,
        };
        self.proposals.insert(proposal.id, proposal.clone());

        info!(
            proposal_id = %proposal.id,
            batches = proposal.batches.len(),
            "governance proposal created"
        );

        Ok(proposal)
    }
}
