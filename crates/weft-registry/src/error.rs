//! Registry error types.

use thiserror::Error;
use weft_types::{Address, ChainSelector};

/// Errors surfaced by address book, chain client, and proposal builder
/// implementations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("chain not registered with the environment: {0}")]
    ChainNotFound(ChainSelector),

    #[error("no program at {address} on {chain}")]
    UnknownContract {
        chain: ChainSelector,
        address: Address,
    },

    #[error("deployment rejected on {chain}: {reason}")]
    DeployRejected {
        chain: ChainSelector,
        reason: String,
    },

    #[error("transaction reverted on {chain}: {reason}")]
    Reverted {
        chain: ChainSelector,
        reason: String,
    },

    #[error("unknown transaction handle {0}")]
    UnknownTx(u64),

    #[error("program at {address} on {chain} does not answer {query}")]
    UnsupportedRead {
        chain: ChainSelector,
        address: Address,
        query: String,
    },

    #[error("refusing to create an empty proposal")]
    EmptyProposal,

    #[error("call encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
