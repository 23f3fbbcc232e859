//! End-to-end orchestration scenarios against simulated chains.

use std::sync::Arc;
use std::time::Duration;
use weft_deploy::{deploy_and_configure, DeployError, Environment};
use weft_registry::{
    AddressBook, ChainClient, InMemoryAddressBook, InMemoryProposalBuilder, ReadQuery, ReadValue,
    SimulatedChain,
};
use weft_types::{
    CapabilityDescriptor, ChainSelector, ContractKind, DeployRequest, ExecutionMode,
};

fn test_env(selectors: &[u64]) -> (Environment, Vec<Arc<SimulatedChain>>) {
    let mut env = Environment::new(Arc::new(InMemoryAddressBook::new()));
    let mut chains = Vec::new();
    for &s in selectors {
        let chain = Arc::new(SimulatedChain::new(ChainSelector(s)));
        env = env.with_chain(chain.clone() as Arc<dyn ChainClient>);
        chains.push(chain);
    }
    (env, chains)
}

#[tokio::test]
async fn direct_mode_brings_up_two_chains_and_wires_them() {
    let home = ChainSelector(1);
    let remote = ChainSelector(2);
    let (env, chains) = test_env(&[1, 2]);

    let request = DeployRequest::new(home, vec![home, remote])
        .with_capabilities(vec![
            CapabilityDescriptor::new("relay", "1.0.0"),
            CapabilityDescriptor::new("attest", "2.1.0"),
        ])
        .with_operators(vec!["node-a".into(), "node-b".into(), "node-c".into()]);

    let (report, proposal) =
        deploy_and_configure(&env, &request, Arc::new(InMemoryProposalBuilder::new()))
            .await
            .unwrap();

    // Direct mode never produces a proposal.
    assert!(proposal.is_none());

    // Home carries the registry, the remote does not.
    assert_eq!(report.outcome(home).unwrap().delta.len(), 8);
    assert_eq!(report.outcome(remote).unwrap().delta.len(), 7);
    let book = env.address_book();
    assert!(book.contains(home, ContractKind::CapabilityRegistry).await.unwrap());
    assert!(!book.contains(remote, ContractKind::CapabilityRegistry).await.unwrap());

    // Authorized-caller wiring took effect on both chains.
    for (i, &selector) in [home, remote].iter().enumerate() {
        let records = book.records_for(selector).await.unwrap();
        let find = |kind| {
            records
                .iter()
                .find(|r| r.kind() == kind)
                .map(|r| r.address)
                .unwrap()
        };
        let fee_quoter = find(ContractKind::FeeQuoter);
        let nonce_manager = find(ContractKind::NonceManager);
        let ingress = find(ContractKind::Ingress);
        let egress = find(ContractKind::Egress);

        let quoter_callers = chains[i]
            .read(fee_quoter, ReadQuery::AuthorizedCallers)
            .await
            .unwrap();
        assert_eq!(quoter_callers, ReadValue::Addresses(vec![egress]));

        let nonce_callers = chains[i]
            .read(nonce_manager, ReadQuery::AuthorizedCallers)
            .await
            .unwrap();
        assert_eq!(nonce_callers, ReadValue::Addresses(vec![ingress, egress]));
    }

    // Both capabilities registered on the home registry, one group per chain.
    let registry = book
        .get(home, ContractKind::CapabilityRegistry)
        .await
        .unwrap()
        .unwrap()
        .address;
    let registered = chains[0]
        .read(registry, ReadQuery::RegisteredCapabilities)
        .await
        .unwrap();
    assert_eq!(
        registered,
        ReadValue::CapabilityHashes(vec![
            CapabilityDescriptor::new("relay", "1.0.0").hashed_id(),
            CapabilityDescriptor::new("attest", "2.1.0").hashed_id(),
        ])
    );
    let groups = chains[0].read(registry, ReadQuery::Groups).await.unwrap();
    assert_eq!(
        groups,
        ReadValue::Groups(vec!["chain-1-lane".into(), "chain-2-lane".into()])
    );
}

#[tokio::test]
async fn batched_mode_defers_all_configuration_into_one_proposal() {
    let home = ChainSelector(1);
    let remote = ChainSelector(2);
    let (env, chains) = test_env(&[1, 2]);

    let request = DeployRequest::new(home, vec![home, remote])
        .with_capabilities(vec![CapabilityDescriptor::new("relay", "1.0.0")])
        .with_operators(vec!["node-a".into()])
        .with_mode(ExecutionMode::Batched {
            min_delay: Duration::from_secs(3600),
        });

    let builder = Arc::new(InMemoryProposalBuilder::new());
    let (_report, proposal) = deploy_and_configure(&env, &request, builder.clone())
        .await
        .unwrap();

    let proposal = proposal.unwrap();
    assert_eq!(proposal.min_delay, Duration::from_secs(3600));
    assert_eq!(builder.proposals().len(), 1);

    // One batch per chain. The home batch carries the caller wiring (2 ops),
    // the capability registration with its node update right behind it, and
    // one group registration per target chain.
    assert_eq!(proposal.batches.len(), 2);
    assert_eq!(proposal.batches_for(home), 1);
    assert_eq!(proposal.ops_for(home), 6);
    assert_eq!(proposal.ops_for(remote), 2);

    // Deployment happened for real; configuration is pending approval.
    let book = env.address_book();
    let registry = book
        .get(home, ContractKind::CapabilityRegistry)
        .await
        .unwrap()
        .unwrap()
        .address;
    let registered = chains[0]
        .read(registry, ReadQuery::RegisteredCapabilities)
        .await
        .unwrap();
    assert_eq!(registered, ReadValue::CapabilityHashes(vec![]));

    let fee_quoter = book
        .get(remote, ContractKind::FeeQuoter)
        .await
        .unwrap()
        .unwrap()
        .address;
    let callers = chains[1]
        .read(fee_quoter, ReadQuery::AuthorizedCallers)
        .await
        .unwrap();
    assert_eq!(callers, ReadValue::Addresses(vec![]));
}

#[tokio::test]
async fn rerun_is_idempotent_end_to_end() {
    let home = ChainSelector(1);
    let (env, chains) = test_env(&[1]);
    let request = DeployRequest::new(home, vec![home])
        .with_capabilities(vec![CapabilityDescriptor::new("relay", "1.0.0")]);

    let (first, _) =
        deploy_and_configure(&env, &request, Arc::new(InMemoryProposalBuilder::new()))
            .await
            .unwrap();
    assert_eq!(first.new_records(), 8);
    let deployed_after_first = chains[0].deployed_count();

    let (second, _) =
        deploy_and_configure(&env, &request, Arc::new(InMemoryProposalBuilder::new()))
            .await
            .unwrap();
    assert_eq!(second.new_records(), 0);
    assert_eq!(chains[0].deployed_count(), deployed_after_first);

    // Configuration is idempotent too: no duplicate group on the registry.
    let registry = env
        .address_book()
        .get(home, ContractKind::CapabilityRegistry)
        .await
        .unwrap()
        .unwrap()
        .address;
    let groups = chains[0].read(registry, ReadQuery::Groups).await.unwrap();
    assert_eq!(groups, ReadValue::Groups(vec!["chain-1-lane".into()]));
}

#[tokio::test]
async fn deployment_failure_aborts_before_configuration() {
    let home = ChainSelector(1);
    let remote = ChainSelector(2);
    let (env, chains) = test_env(&[1, 2]);
    chains[1].fail_deployments_of(ContractKind::FeeQuoter);

    let request = DeployRequest::new(home, vec![home, remote]);
    let builder = Arc::new(InMemoryProposalBuilder::new());
    let err = deploy_and_configure(&env, &request, builder.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, DeployError::SubmissionFailed { chain, .. } if chain == remote));

    // The healthy chain's delta stayed durable, but no wiring ran anywhere.
    let book = env.address_book();
    assert!(book.contains(home, ContractKind::Egress).await.unwrap());
    let fee_quoter = book
        .get(home, ContractKind::FeeQuoter)
        .await
        .unwrap()
        .unwrap()
        .address;
    let callers = chains[0]
        .read(fee_quoter, ReadQuery::AuthorizedCallers)
        .await
        .unwrap();
    assert_eq!(callers, ReadValue::Addresses(vec![]));
    assert!(builder.proposals().is_empty());

    // Clearing the fault and re-running finishes the remote chain.
    chains[1].clear_deploy_failures();
    let (report, _) = deploy_and_configure(&env, &request, builder)
        .await
        .unwrap();
    assert!(report.failed_chains().is_empty());
    assert!(book.contains(remote, ContractKind::Egress).await.unwrap());
}
