//! Address book trait: durable (chain, kind, version) -> address mapping.

use crate::error::Result;
use async_trait::async_trait;
use weft_types::{ChainSelector, ContractKind, ContractRecord};

/// Per-chain record additions produced by one deployment run.
///
/// Deltas from concurrent runs touch disjoint chains, so merging them in any
/// order yields the same book; last-writer-wins per (chain, kind, version)
/// key is acceptable.
#[derive(Debug, Clone, Default)]
pub struct AddressDelta {
    records: Vec<(ChainSelector, ContractRecord)>,
}

impl AddressDelta {
    /// Create an empty delta.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one deployed contract.
    pub fn push(&mut self, chain: ChainSelector, record: ContractRecord) {
        self.records.push((chain, record));
    }

    /// The recorded (chain, record) pairs in insertion order.
    pub fn records(&self) -> &[(ChainSelector, ContractRecord)] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Durable mapping from (chain, contract kind, version) to deployed address.
///
/// Implementations must be safe under concurrent merges from distinct chains.
#[async_trait]
pub trait AddressBook: Send + Sync {
    /// Latest record of the given kind on the chain, if any. Absence is not
    /// an error: it is the trigger to deploy.
    async fn get(&self, chain: ChainSelector, kind: ContractKind) -> Result<Option<ContractRecord>>;

    /// All records known for one chain.
    async fn records_for(&self, chain: ChainSelector) -> Result<Vec<ContractRecord>>;

    /// Whether any record of the kind exists on the chain.
    async fn contains(&self, chain: ChainSelector, kind: ContractKind) -> Result<bool>;

    /// Merge a delta into the book.
    async fn merge(&self, delta: AddressDelta) -> Result<()>;
}
