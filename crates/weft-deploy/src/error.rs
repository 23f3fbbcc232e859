//! Deployment engine error types.

use thiserror::Error;
use weft_registry::RegistryError;
use weft_types::{Address, ChainSelector, ContractKind};

/// Errors surfaced by the deployment engine.
///
/// An absent record is deliberately not an error anywhere in this taxonomy:
/// at the lookup seams absence is an `Option::None` that triggers deployment.
/// Likewise a duplicate capability never surfaces — the deduplicator filters
/// it silently before anything reaches a chain.
#[derive(Debug, Error)]
pub enum DeployError {
    /// The address book's recorded type does not match the live program.
    /// Fatal; surfaced immediately, never auto-repaired.
    #[error("state inconsistent on {chain}: address book records {recorded} at {address} but the chain reports {live}")]
    StateInconsistent {
        chain: ChainSelector,
        address: Address,
        recorded: String,
        live: String,
    },

    #[error("submission failed on {chain}: {source}")]
    SubmissionFailed {
        chain: ChainSelector,
        #[source]
        source: RegistryError,
    },

    #[error("confirmation failed on {chain}: {source}")]
    ConfirmationFailed {
        chain: ChainSelector,
        #[source]
        source: RegistryError,
    },

    /// A configuration precondition failed: the named record is absent on the
    /// named chain. Raised before any change is routed.
    #[error("missing required {kind} record on {chain}")]
    MissingDependency {
        chain: ChainSelector,
        kind: ContractKind,
    },

    #[error("chain {0} not present in the environment")]
    UnknownChain(ChainSelector),

    #[error("proposal creation failed: {0}")]
    Proposal(#[source] RegistryError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("{0}")]
    Internal(String),
}

/// Result type for deployment operations.
pub type Result<T> = std::result::Result<T, DeployError>;
