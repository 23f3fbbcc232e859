//! Governance proposal builder trait.

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use weft_types::{ChangeBatch, GovernanceProposal};

/// Bundles per-chain change batches into a proposal for external
/// multi-signature approval.
///
/// Approval and execution are entirely outside the orchestration core; the
/// builder only reports whether creation succeeded and what the proposal
/// contains.
#[async_trait]
pub trait ProposalBuilder: Send + Sync {
    /// Create one proposal from the ordered per-chain batches.
    ///
    /// Implementations must reject an empty batch list and must preserve both
    /// batch order and the operation order inside each batch.
    async fn propose(
        &self,
        batches: Vec<ChangeBatch>,
        min_delay: Duration,
    ) -> Result<GovernanceProposal>;
}
