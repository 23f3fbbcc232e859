//! Mutating calls, change batches, and governance proposals.
//!
//! A [`CallData`] is a typed mutating call against one deployed program. In
//! direct mode it is submitted and confirmed immediately; in batched mode it
//! is appended to the owning chain's [`ChangeBatch`] and only takes effect
//! once the enclosing [`GovernanceProposal`] is approved and executed by an
//! external actor.

use crate::capability::{CapabilityDescriptor, CapabilityHash};
use crate::ids::{Address, ChainSelector};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Typed mutating calls routed through the change executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CallData {
    /// Register capabilities on the registry program. The registry aborts the
    /// whole transaction if any capability is already registered.
    AddCapabilities {
        capabilities: Vec<CapabilityDescriptor>,
    },

    /// Update operator node registrations on the registry program.
    UpdateNodes {
        operators: Vec<String>,
        capability_hashes: Vec<CapabilityHash>,
    },

    /// Grant and revoke caller authorization on shared infrastructure.
    AuthorizeCallers {
        added: Vec<Address>,
        removed: Vec<Address>,
    },

    /// Form or extend an operational group tied to one chain.
    RegisterGroup {
        name: String,
        chain: ChainSelector,
        capability_hashes: Vec<CapabilityHash>,
    },
}

impl CallData {
    /// Wire encoding shared by batch operations and the chain clients.
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decode a previously encoded call.
    pub fn decode(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }
}

/// One pending operation inside a change batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeOperation {
    /// Target program address.
    pub to: Address,
    /// Encoded call payload.
    pub data: Vec<u8>,
    /// Native value attached to the call.
    pub value: u128,
}

/// Ordered sequence of pending operations for one chain.
///
/// A batch is never partially executed: it is either fully proposed as part
/// of a [`GovernanceProposal`] or discarded. Operation order is preserved
/// because later calls may depend on state mutated by earlier ones once the
/// batch executes atomically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeBatch {
    /// Owning chain.
    pub chain: ChainSelector,
    /// Pending operations in call order.
    pub ops: Vec<ChangeOperation>,
}

impl ChangeBatch {
    /// Create an empty batch for one chain.
    pub fn new(chain: ChainSelector) -> Self {
        Self {
            chain,
            ops: Vec::new(),
        }
    }

    /// Append an operation, preserving call order.
    pub fn push(&mut self, op: ChangeOperation) {
        self.ops.push(op);
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// One or more change batches bundled for external multi-signature approval.
///
/// Opaque to the orchestration core beyond creation success and per-chain
/// operation counts; approval and execution happen entirely outside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernanceProposal {
    /// Proposal identifier assigned at creation.
    pub id: Uuid,
    /// Creation timestamp.
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Minimum timelock delay before execution.
    #[serde(with = "crate::serde_util::duration_millis")]
    pub min_delay: Duration,
    /// Batches in submission order, at most one per chain per request.
    pub batches: Vec<ChangeBatch>,
}

impl GovernanceProposal {
    /// Number of pending operations destined for one chain.
    pub fn ops_for(&self, chain: ChainSelector) -> usize {
        self.batches
            .iter()
            .filter(|b| b.chain == chain)
            .map(ChangeBatch::len)
            .sum()
    }

    /// Number of batches destined for one chain.
    pub fn batches_for(&self, chain: ChainSelector) -> usize {
        self.batches.iter().filter(|b| b.chain == chain).count()
    }
}
