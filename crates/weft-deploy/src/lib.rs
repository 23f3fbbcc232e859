//! Weft Deployment Engine
//!
//! Orchestrates deployment and configuration of a fixed topology of
//! interdependent on-chain programs across many independent chains, then
//! applies the resulting changes either directly or as a timelocked
//! governance proposal for external multi-party approval.
//!
//! ## Architectural Boundaries
//!
//! - `weft-registry` owns: the address book, chain client, and proposal
//!   builder seams (and their in-memory forms)
//! - `weft-deploy` owns: state loading, the per-chain step plan, parallel
//!   fan-out, change routing, capability deduplication, and wiring
//! - Approval and execution of governance proposals happen entirely outside
//!
//! ## Key Principle
//!
//! Mutating operations MUST go through the [`ChangeExecutor`] seam. The
//! execution strategy — direct confirmed submission or accumulation into a
//! proposal batch — is selected exactly once per run, and no caller branches
//! on which one is active.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use weft_deploy::{deploy_and_configure, Environment};
//! use weft_registry::{InMemoryAddressBook, InMemoryProposalBuilder, SimulatedChain};
//! use weft_types::{ChainSelector, DeployRequest};
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let home = ChainSelector(1);
//! let env = Environment::new(Arc::new(InMemoryAddressBook::new()))
//!     .with_chain(Arc::new(SimulatedChain::new(home)));
//! let request = DeployRequest::new(home, vec![home]);
//! let (report, proposal) =
//!     deploy_and_configure(&env, &request, Arc::new(InMemoryProposalBuilder::new())).await?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod configure;
pub mod coordinator;
pub mod dedup;
pub mod deployer;
pub mod env;
pub mod error;
pub mod router;
pub mod state;

// Re-exports
pub use configure::configure_chains;
pub use coordinator::{deploy_chain_contracts, DeployReport};
pub use dedup::dedup_capabilities;
pub use deployer::{deploy_chain, deploy_plan, ChainDeployOutcome, DeployStep, StepGate};
pub use env::Environment;
pub use error::{DeployError, Result};
pub use router::{
    create_executor, BatchedExecutor, ChangeExecutor, DirectExecutor, SubmitOutcome,
};
pub use state::{load_onchain_state, ChainState, OnchainState};

use std::sync::Arc;
use tracing::instrument;
use weft_registry::ProposalBuilder;
use weft_types::{DeployRequest, GovernanceProposal};

/// End-to-end orchestration: deploy every missing program across the target
/// chains, then perform the cross-cutting wiring through the execution
/// strategy the request selected.
///
/// A deployment failure on any chain aborts before configuration — partial
/// deltas from the other chains remain durable in the address book and a
/// re-run resumes from them. In batched mode the returned proposal carries
/// every queued change; in direct mode the proposal is `None`.
#[instrument(skip(env, request, proposals), fields(home = %request.home_chain))]
pub async fn deploy_and_configure(
    env: &Environment,
    request: &DeployRequest,
    proposals: Arc<dyn ProposalBuilder>,
) -> Result<(DeployReport, Option<GovernanceProposal>)> {
    let executor = create_executor(&request.mode, proposals);

    let report = deploy_chain_contracts(env, request).await?.into_result()?;
    configure_chains(env, request, &executor).await?;
    let proposal = executor.finish(env).await?;

    Ok((report, proposal))
}
