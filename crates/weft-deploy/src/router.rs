//! Change router: dual-mode execution behind one interface.
//!
//! Decouples *what* changes to make from *how* they take effect. Callers
//! submit typed calls against the [`ChangeExecutor`] trait and never branch
//! on the active mode; the strategy is selected exactly once per run by
//! [`create_executor`].

use crate::env::Environment;
use crate::error::{DeployError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};
use weft_registry::{ProposalBuilder, TxHandle};
use weft_types::{
    Address, CallData, ChainSelector, ChangeBatch, ChangeOperation, ExecutionMode,
    GovernanceProposal,
};

/// Result of routing one mutating call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Submitted and confirmed on-chain (direct mode).
    Confirmed(TxHandle),
    /// Recorded in the owning chain's pending batch (batched mode); nothing
    /// happens on-chain until the proposal is approved and executed.
    Queued {
        /// Position inside the chain's batch, in call order.
        position: usize,
    },
}

/// Routes every mutating call for one run.
#[async_trait]
pub trait ChangeExecutor: Send + Sync {
    /// Route one mutating call to `target` on `chain`.
    async fn submit(
        &self,
        env: &Environment,
        chain: ChainSelector,
        target: Address,
        call: CallData,
    ) -> Result<SubmitOutcome>;

    /// Complete the run. Direct mode returns `None`; batched mode drains the
    /// accumulated per-chain batches into one governance proposal, or `None`
    /// when nothing was queued.
    async fn finish(&self, env: &Environment) -> Result<Option<GovernanceProposal>>;

    /// Strategy name for logs.
    fn name(&self) -> &str;
}

/// Signs, submits, and blocks until confirmation. Irreversible.
pub struct DirectExecutor;

#[async_trait]
impl ChangeExecutor for DirectExecutor {
    async fn submit(
        &self,
        env: &Environment,
        chain: ChainSelector,
        target: Address,
        call: CallData,
    ) -> Result<SubmitOutcome> {
        let client = env.chain(chain)?;
        let op = ChangeOperation {
            to: target,
            data: call.encode().map_err(weft_registry::RegistryError::from)?,
            value: 0,
        };

        let tx = client
            .submit(&op)
            .await
            .map_err(|source| DeployError::SubmissionFailed { chain, source })?;
        client
            .confirm(tx)
            .await
            .map_err(|source| DeployError::ConfirmationFailed { chain, source })?;

        debug!(%chain, %target, "change confirmed");
        Ok(SubmitOutcome::Confirmed(tx))
    }

    async fn finish(&self, _env: &Environment) -> Result<Option<GovernanceProposal>> {
        Ok(None)
    }

    fn name(&self) -> &str {
        "direct"
    }
}

/// Accumulates operations into per-chain change batches and bundles them into
/// a single timelocked governance proposal at the end of the run.
///
/// All operations destined for the same chain land in the same batch, in
/// call order: later calls may depend on state mutated by earlier ones once
/// the batch executes atomically after approval.
pub struct BatchedExecutor {
    min_delay: Duration,
    proposals: Arc<dyn ProposalBuilder>,
    batches: Mutex<BTreeMap<ChainSelector, ChangeBatch>>,
}

impl BatchedExecutor {
    /// Create a batched executor bundling through the given proposal builder.
    pub fn new(min_delay: Duration, proposals: Arc<dyn ProposalBuilder>) -> Self {
        Self {
            min_delay,
            proposals,
            batches: Mutex::new(BTreeMap::new()),
        }
    }
}

#[async_trait]
impl ChangeExecutor for BatchedExecutor {
    async fn submit(
        &self,
        _env: &Environment,
        chain: ChainSelector,
        target: Address,
        call: CallData,
    ) -> Result<SubmitOutcome> {
        let op = ChangeOperation {
            to: target,
            data: call.encode().map_err(weft_registry::RegistryError::from)?,
            value: 0,
        };

        let mut batches = self.batches.lock().await;
        let batch = batches
            .entry(chain)
            .or_insert_with(|| ChangeBatch::new(chain));
        batch.push(op);
        let position = batch.len() - 1;

        debug!(%chain, %target, position, "change queued for proposal");
        Ok(SubmitOutcome::Queued { position })
    }

    async fn finish(&self, _env: &Environment) -> Result<Option<GovernanceProposal>> {
        let batches: Vec<ChangeBatch> = {
            let mut held = self.batches.lock().await;
            std::mem::take(&mut *held).into_values().collect()
        };
        if batches.is_empty() {
            return Ok(None);
        }

        let proposal = self
            .proposals
            .propose(batches, self.min_delay)
            .await
            .map_err(DeployError::Proposal)?;

        info!(
            proposal_id = %proposal.id,
            batches = proposal.batches.len(),
            "queued changes bundled into proposal"
        );
        Ok(Some(proposal))
    }

    fn name(&self) -> &str {
        "batched"
    }
}

/// Select the execution strategy once per run.
pub fn create_executor(
    mode: &ExecutionMode,
    proposals: Arc<dyn ProposalBuilder>,
) -> Arc<dyn ChangeExecutor> {
    match mode {
        ExecutionMode::Direct => Arc::new(DirectExecutor),
        ExecutionMode::Batched { min_delay } => {
            Arc::new(BatchedExecutor::new(*min_delay, proposals))
        }
    }
}
