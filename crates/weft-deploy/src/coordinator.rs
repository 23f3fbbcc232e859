//! Parallel fan-out coordinator.
//!
//! Runs the per-chain deployer concurrently, one task per target chain, and
//! joins them all before reporting. A failure on one chain never cancels its
//! siblings: every chain keeps whatever durable progress it made, and the
//! caller decides whether a partial run is acceptable.

use crate::deployer::{deploy_chain, ChainDeployOutcome};
use crate::env::Environment;
use crate::error::{DeployError, Result};
use crate::state::load_onchain_state;
use std::collections::HashMap;
use tokio::task::JoinSet;
use tracing::{info, instrument};
use weft_types::{ChainSelector, DeployRequest};

/// Aggregated result of the fan-out across chains.
#[derive(Debug, Default)]
pub struct DeployReport {
    outcomes: HashMap<ChainSelector, ChainDeployOutcome>,
}

impl DeployReport {
    /// Outcome for one chain.
    pub fn outcome(&self, chain: ChainSelector) -> Option<&ChainDeployOutcome> {
        self.outcomes.get(&chain)
    }

    /// All outcomes, keyed by chain.
    pub fn outcomes(&self) -> &HashMap<ChainSelector, ChainDeployOutcome> {
        &self.outcomes
    }

    /// Selectors that failed, in selector order.
    pub fn failed_chains(&self) -> Vec<ChainSelector> {
        let mut failed: Vec<_> = self
            .outcomes
            .iter()
            .filter(|(_, o)| !o.is_ok())
            .map(|(s, _)| *s)
            .collect();
        failed.sort();
        failed
    }

    /// Total records created across all chains in this run.
    pub fn new_records(&self) -> usize {
        self.outcomes.values().map(|o| o.delta.len()).sum()
    }

    /// First error across chains (lowest failing selector), if any,
    /// consuming the report. Successful chains' deltas remain durable in the
    /// address book either way.
    pub fn into_result(mut self) -> Result<Self> {
        if let Some(first) = self.failed_chains().first().copied() {
            if let Some(outcome) = self.outcomes.get_mut(&first) {
                if let Some(err) = outcome.error.take() {
                    return Err(err);
                }
            }
        }
        Ok(self)
    }
}

/// Deploy the target topology onto every chain in the request, concurrently.
///
/// One task per chain, unbounded fan-out, no ordering across chains. All
/// tasks are awaited; the report carries each chain's delta and first error.
#[instrument(skip(env, request), fields(chains = request.chains.len()))]
pub async fn deploy_chain_contracts(
    env: &Environment,
    request: &DeployRequest,
) -> Result<DeployReport> {
    let state = load_onchain_state(env, &request.chains).await?;

    let mut tasks = JoinSet::new();
    for &selector in &request.chains {
        let env = env.clone();
        let chain_state = state.chain(selector).cloned().unwrap_or_default();
        let features = request.features_for(selector);
        let home = request.home_chain;
        tasks.spawn(async move {
            deploy_chain(&env, &chain_state, selector, home, features).await
        });
    }

    let mut report = DeployReport::default();
    while let Some(joined) = tasks.join_next().await {
        let outcome = joined
            .map_err(|e| DeployError::Internal(format!("deploy task panicked: {e}")))?;
        report.outcomes.insert(outcome.chain, outcome);
    }

    info!(
        new_records = report.new_records(),
        failed = report.failed_chains().len(),
        "fan-out complete"
    );

    Ok(report)
}
