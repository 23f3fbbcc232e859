//! Per-chain deployer.
//!
//! Brings one chain's program set up to the target topology by walking a
//! declared, ordered step plan. Each step either finds its output already
//! deployed (skip and log) or deploys, confirms, and persists the new record
//! to the address book before moving on, so a partially completed run leaves
//! durable progress behind and a re-run picks up exactly where it stopped.

use crate::env::Environment;
use crate::error::{DeployError, Result};
use crate::state::ChainState;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use weft_registry::{AddressDelta, ChainClient, DeployArtifact};
use weft_types::{
    ChainFeatures, ChainSelector, ContractKind, ContractRecord, TypeAndVersion,
};

/// When a declared step applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepGate {
    /// Every chain gets this program.
    Always,
    /// Only the home chain gets this program.
    HomeOnly,
    /// Gated on the chain's stablecoin feature flag.
    Stablecoin,
    /// Gated on the chain's multicall feature flag.
    Multicall,
}

/// One declared step in the per-chain dependency chain.
#[derive(Debug, Clone)]
pub struct DeployStep {
    /// Program shape this step produces.
    pub tv: TypeAndVersion,
    /// Kinds whose addresses feed this step's constructor. All must have
    /// been produced by earlier steps or exist in the loaded state.
    pub requires: Vec<ContractKind>,
    /// Applicability gate.
    pub gate: StepGate,
}

impl DeployStep {
    fn new(kind: ContractKind, version: semver::Version, requires: &[ContractKind], gate: StepGate) -> Self {
        Self {
            tv: TypeAndVersion::new(kind, version),
            requires: requires.to_vec(),
            gate,
        }
    }
}

/// The declared dependency order for one chain.
///
/// The topology is a directed acyclic chain expressed as a list: every step
/// may read addresses produced by earlier steps in the same run. Gated steps
/// that do not apply to this chain are omitted from the returned plan.
pub fn deploy_plan(
    selector: ChainSelector,
    home: ChainSelector,
    features: ChainFeatures,
) -> Vec<DeployStep> {
    use ContractKind::*;

    let v = semver::Version::new;
    let all = vec![
        DeployStep::new(CapabilityRegistry, v(1, 0, 0), &[], StepGate::HomeOnly),
        DeployStep::new(RegistryModule, v(1, 5, 0), &[], StepGate::Always),
        DeployStep::new(TokenRegistry, v(1, 5, 0), &[RegistryModule], StepGate::Always),
        DeployStep::new(Router, v(1, 2, 0), &[TokenRegistry], StepGate::Always),
        DeployStep::new(FeeQuoter, v(1, 6, 0), &[Router], StepGate::Always),
        DeployStep::new(NonceManager, v(1, 6, 0), &[], StepGate::Always),
        DeployStep::new(
            Ingress,
            v(1, 6, 0),
            &[Router, FeeQuoter, NonceManager],
            StepGate::Always,
        ),
        DeployStep::new(
            Egress,
            v(1, 6, 0),
            &[Router, FeeQuoter, NonceManager],
            StepGate::Always,
        ),
        DeployStep::new(StablecoinPool, v(1, 0, 0), &[Router], StepGate::Stablecoin),
        DeployStep::new(Multicall, v(1, 0, 0), &[], StepGate::Multicall),
    ];

    all.into_iter()
        .filter(|step| match step.gate {
            StepGate::Always => true,
            StepGate::HomeOnly => selector == home,
            StepGate::Stablecoin => features.stablecoin,
            StepGate::Multicall => features.multicall,
        })
        .collect()
}

/// Result of one chain's deployment pass: the records created in this run
/// plus the first error, if any. Prior successful steps are durable and are
/// never rolled back.
#[derive(Debug)]
pub struct ChainDeployOutcome {
    /// The chain this outcome belongs to.
    pub chain: ChainSelector,
    /// Records deployed by this run, in step order.
    pub delta: Vec<ContractRecord>,
    /// First step failure, if the pass aborted early.
    pub error: Option<DeployError>,
}

impl ChainDeployOutcome {
    /// Whether the pass completed every applicable step.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Idempotently bring one chain up to the target topology.
///
/// The first step failure aborts the remaining steps for this chain only;
/// sibling chains are unaffected and prior steps stay deployed.
#[instrument(skip(env, state, features), fields(chain = %selector))]
pub async fn deploy_chain(
    env: &Environment,
    state: &ChainState,
    selector: ChainSelector,
    home: ChainSelector,
    features: ChainFeatures,
) -> ChainDeployOutcome {
    let mut working = state.clone();
    let mut delta = Vec::new();

    let client = match env.chain(selector) {
        Ok(client) => client,
        Err(err) => {
            return ChainDeployOutcome {
                chain: selector,
                delta,
                error: Some(err),
            }
        }
    };

    for step in deploy_plan(selector, home, features) {
        if working.contains(step.tv.kind) {
            info!(kind = %step.tv.kind, "already deployed, skipping");
            continue;
        }

        match deploy_step(env, &client, &working, selector, &step).await {
            Ok(record) => {
                info!(kind = %step.tv.kind, address = %record.address, "deployed");
                working.insert(record.clone());
                delta.push(record);
            }
            Err(err) => {
                warn!(kind = %step.tv.kind, error = %err, "step failed, aborting chain");
                return ChainDeployOutcome {
                    chain: selector,
                    delta,
                    error: Some(err),
                };
            }
        }
    }

    ChainDeployOutcome {
        chain: selector,
        delta,
        error: None,
    }
}

/// Deploy one step: resolve constructor references, deploy, confirm, and
/// persist the record immediately so partial runs survive.
async fn deploy_step(
    env: &Environment,
    client: &Arc<dyn ChainClient>,
    working: &ChainState,
    selector: ChainSelector,
    step: &DeployStep,
) -> Result<ContractRecord> {
    let mut constructor = Vec::with_capacity(step.requires.len());
    for &kind in &step.requires {
        let record = working
            .get(kind)
            .ok_or(DeployError::MissingDependency { chain: selector, kind })?;
        constructor.push(record.address);
    }

    let artifact = DeployArtifact {
        tv: step.tv.clone(),
        constructor,
    };
    let deployed = client
        .deploy(&artifact)
        .await
        .map_err(|source| DeployError::SubmissionFailed {
            chain: selector,
            source,
        })?;
    client
        .confirm(deployed.tx)
        .await
        .map_err(|source| DeployError::ConfirmationFailed {
            chain: selector,
            source,
        })?;

    let record = ContractRecord::new(deployed.address, step.tv.clone());
    let mut delta = AddressDelta::new();
    delta.push(selector, record.clone());
    env.address_book().merge(delta).await?;

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::load_onchain_state;
    use std::sync::Arc;
    use weft_registry::{InMemoryAddressBook, SimulatedChain};

    fn test_env(selector: ChainSelector) -> (Environment, Arc<SimulatedChain>) {
        let chain = Arc::new(SimulatedChain::new(selector));
        let env = Environment::new(Arc::new(InMemoryAddressBook::new()))
            .with_chain(chain.clone() as Arc<dyn ChainClient>);
        (env, chain)
    }

    #[test]
    fn plan_orders_dependencies_before_dependents() {
        let plan = deploy_plan(ChainSelector(1), ChainSelector(1), ChainFeatures::default());
        let position = |kind: ContractKind| {
            plan.iter()
                .position(|s| s.tv.kind == kind)
                .unwrap_or_else(|| panic!("{kind} missing from plan"))
        };
        for step in &plan {
            for &dep in &step.requires {
                assert!(
                    position(dep) < position(step.tv.kind),
                    "{dep} must precede {}",
                    step.tv.kind
                );
            }
        }
    }

    #[test]
    fn plan_gates_home_and_feature_steps() {
        let home = ChainSelector(1);
        let remote = ChainSelector(2);

        let home_plan = deploy_plan(home, home, ChainFeatures::default());
        assert!(home_plan
            .iter()
            .any(|s| s.tv.kind == ContractKind::CapabilityRegistry));

        let remote_plan = deploy_plan(remote, home, ChainFeatures::default());
        assert!(!remote_plan
            .iter()
            .any(|s| s.tv.kind == ContractKind::CapabilityRegistry));
        assert!(!remote_plan
            .iter()
            .any(|s| s.tv.kind == ContractKind::StablecoinPool));

        let flagged = deploy_plan(
            remote,
            home,
            ChainFeatures {
                stablecoin: true,
                multicall: true,
            },
        );
        assert!(flagged.iter().any(|s| s.tv.kind == ContractKind::StablecoinPool));
        assert!(flagged.iter().any(|s| s.tv.kind == ContractKind::Multicall));
    }

    #[tokio::test]
    async fn second_run_deploys_nothing() {
        let selector = ChainSelector(1);
        let (env, chain) = test_env(selector);

        let first = deploy_chain(
            &env,
            &ChainState::default(),
            selector,
            selector,
            ChainFeatures::default(),
        )
        .await;
        assert!(first.is_ok());
        assert_eq!(first.delta.len(), 8);
        let deployed_after_first = chain.deployed_count();

        // Reload and run again: everything exists, so the delta is empty.
        let state = load_onchain_state(&env, &[selector]).await.unwrap();
        let second = deploy_chain(
            &env,
            state.chain(selector).unwrap(),
            selector,
            selector,
            ChainFeatures::default(),
        )
        .await;
        assert!(second.is_ok());
        assert!(second.delta.is_empty());
        assert_eq!(chain.deployed_count(), deployed_after_first);
    }

    #[tokio::test]
    async fn failure_keeps_earlier_steps_durable() {
        let selector = ChainSelector(1);
        let (env, chain) = test_env(selector);
        chain.fail_deployments_of(ContractKind::FeeQuoter);

        let outcome = deploy_chain(
            &env,
            &ChainState::default(),
            selector,
            selector,
            ChainFeatures::default(),
        )
        .await;

        assert!(matches!(
            outcome.error,
            Some(DeployError::SubmissionFailed { .. })
        ));
        // Everything before the fee quoter landed and was persisted.
        let kinds: Vec<_> = outcome.delta.iter().map(ContractRecord::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ContractKind::CapabilityRegistry,
                ContractKind::RegistryModule,
                ContractKind::TokenRegistry,
                ContractKind::Router,
            ]
        );
        for record in &outcome.delta {
            assert!(env
                .address_book()
                .contains(selector, record.kind())
                .await
                .unwrap());
        }

        // A re-run after the fault clears resumes from where it stopped.
        chain.clear_deploy_failures();
        let state = load_onchain_state(&env, &[selector]).await.unwrap();
        assert_eq!(state.chain(selector).unwrap().len(), 4);

        let resumed = deploy_chain(
            &env,
            state.chain(selector).unwrap(),
            selector,
            selector,
            ChainFeatures::default(),
        )
        .await;
        assert!(resumed.is_ok());
        let resumed_kinds: Vec<_> = resumed.delta.iter().map(ContractRecord::kind).collect();
        assert_eq!(
            resumed_kinds,
            vec![
                ContractKind::FeeQuoter,
                ContractKind::NonceManager,
                ContractKind::Ingress,
                ContractKind::Egress,
            ]
        );
    }
}
