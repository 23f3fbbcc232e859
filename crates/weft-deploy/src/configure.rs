//! Post-deployment configuration step.
//!
//! Cross-cutting wiring that runs after every per-chain deployment pass has
//! completed and its deltas are visible in the address book: authorize the
//! new lanes as callers on shared infrastructure, register the home chain's
//! capabilities, and form one operational group per target chain. Every
//! mutating action goes through the change executor; nothing here knows
//! whether it is executing directly or filling a proposal.

use crate::dedup::dedup_capabilities;
use crate::env::Environment;
use crate::error::{DeployError, Result};
use crate::router::ChangeExecutor;
use crate::state::load_onchain_state;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use weft_registry::{ReadQuery, ReadValue};
use weft_types::{CallData, ContractKind, DeployRequest};

/// Required per-chain records the wiring depends on.
const REQUIRED_KINDS: [ContractKind; 4] = [
    ContractKind::FeeQuoter,
    ContractKind::NonceManager,
    ContractKind::Ingress,
    ContractKind::Egress,
];

/// Wire the deployed topology together.
///
/// Reloads a fresh on-chain state and fails fast with `MissingDependency`,
/// naming the absent record and its chain, before routing anything: a
/// partial wiring against a guessed address is never attempted.
#[instrument(skip(env, request, executor), fields(mode = executor.name()))]
pub async fn configure_chains(
    env: &Environment,
    request: &DeployRequest,
    executor: &Arc<dyn ChangeExecutor>,
) -> Result<()> {
    let state = load_onchain_state(env, &request.chains).await?;

    // Gate on every required record before the first routed change.
    let registry = state.home_capability_registry(request.home_chain)?.clone();
    for &chain in &request.chains {
        for kind in REQUIRED_KINDS {
            state.require(chain, kind)?;
        }
    }

    // Authorize the lanes on shared infrastructure, per chain.
    for &chain in &request.chains {
        let fee_quoter = state.require(chain, ContractKind::FeeQuoter)?;
        let nonce_manager = state.require(chain, ContractKind::NonceManager)?;
        let ingress = state.require(chain, ContractKind::Ingress)?;
        let egress = state.require(chain, ContractKind::Egress)?;

        executor
            .submit(
                env,
                chain,
                fee_quoter.address,
                CallData::AuthorizeCallers {
                    added: vec![egress.address],
                    removed: vec![],
                },
            )
            .await?;
        executor
            .submit(
                env,
                chain,
                nonce_manager.address,
                CallData::AuthorizeCallers {
                    added: vec![ingress.address, egress.address],
                    removed: vec![],
                },
            )
            .await?;
    }

    // Register the home capabilities, deduplicated against the registry and
    // the request itself. The node update rides in the same per-chain batch
    // as the registration so they execute atomically once approved.
    let home_client = env.chain(request.home_chain)?;
    let fresh = dedup_capabilities(&home_client, registry.address, &request.capabilities).await?;
    if !fresh.is_empty() {
        let hashes: Vec<_> = fresh.iter().map(|c| c.hashed_id()).collect();
        executor
            .submit(
                env,
                request.home_chain,
                registry.address,
                CallData::AddCapabilities {
                    capabilities: fresh,
                },
            )
            .await?;
        if !request.operators.is_empty() {
            executor
                .submit(
                    env,
                    request.home_chain,
                    registry.address,
                    CallData::UpdateNodes {
                        operators: request.operators.clone(),
                        capability_hashes: hashes,
                    },
                )
                .await?;
        }
    }

    // One operational group per target chain, formed on the home registry.
    // Groups already formed by an earlier run are skipped, so a re-run never
    // duplicates them.
    let existing_groups: HashSet<String> = match home_client
        .read(registry.address, ReadQuery::Groups)
        .await?
    {
        ReadValue::Groups(names) => names.into_iter().collect(),
        other => {
            return Err(DeployError::Internal(format!(
                "unexpected read result for group query: {other:?}"
            )))
        }
    };
    let capability_hashes: Vec<_> = request
        .capabilities
        .iter()
        .map(|c| c.hashed_id())
        .collect();
    for &chain in &request.chains {
        let name = format!("{chain}-lane");
        if existing_groups.contains(&name) {
            debug!(group = %name, "group already formed, skipping");
            continue;
        }
        executor
            .submit(
                env,
                request.home_chain,
                registry.address,
                CallData::RegisterGroup {
                    name,
                    chain,
                    capability_hashes: capability_hashes.clone(),
                },
            )
            .await?;
    }

    info!(chains = request.chains.len(), "configuration complete");
    Ok(())
}
