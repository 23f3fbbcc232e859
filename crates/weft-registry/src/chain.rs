//! Chain client trait: the per-chain submission/confirmation handle.

use crate::error::Result;
use async_trait::async_trait;
use weft_types::{Address, CapabilityHash, ChainSelector, ChangeOperation, TypeAndVersion};

/// Everything a chain needs to instantiate one program: the program shape
/// plus the addresses of already-deployed dependencies fed to its
/// constructor.
#[derive(Debug, Clone)]
pub struct DeployArtifact {
    /// Program shape to instantiate.
    pub tv: TypeAndVersion,
    /// Constructor references, in declaration order.
    pub constructor: Vec<Address>,
}

/// Handle to a submitted transaction awaiting confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxHandle(pub u64);

/// Confirmation receipt for a submitted transaction.
#[derive(Debug, Clone)]
pub struct Receipt {
    /// The confirmed transaction.
    pub tx: TxHandle,
    /// Confirmation timestamp.
    pub confirmed_at: chrono::DateTime<chrono::Utc>,
}

/// A freshly deployed program pending confirmation.
#[derive(Debug, Clone)]
pub struct DeployedContract {
    /// Address the program landed at.
    pub address: Address,
    /// Deployment transaction.
    pub tx: TxHandle,
}

/// Read-only queries against a deployed program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadQuery {
    /// The program's self-reported type and version.
    TypeAndVersion,
    /// Capability hashes registered on a registry program.
    RegisteredCapabilities,
    /// Callers authorized on the program.
    AuthorizedCallers,
    /// Names of operational groups formed on a registry program.
    Groups,
}

impl std::fmt::Display for ReadQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ReadQuery::TypeAndVersion => "TypeAndVersion",
            ReadQuery::RegisteredCapabilities => "RegisteredCapabilities",
            ReadQuery::AuthorizedCallers => "AuthorizedCallers",
            ReadQuery::Groups => "Groups",
        };
        f.write_str(name)
    }
}

/// Typed results for [`ReadQuery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadValue {
    TypeAndVersion(TypeAndVersion),
    CapabilityHashes(Vec<CapabilityHash>),
    Addresses(Vec<Address>),
    Groups(Vec<String>),
}

/// Submission and confirmation handle for one chain.
///
/// Confirmation waits suspend only the calling task; the implementation is
/// responsible for bounding wait time. The core imposes no timeouts and
/// performs no retries.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// The chain this client signs for.
    fn selector(&self) -> ChainSelector;

    /// Deploy a program and return its address and pending transaction.
    async fn deploy(&self, artifact: &DeployArtifact) -> Result<DeployedContract>;

    /// Submit one mutating operation.
    async fn submit(&self, op: &ChangeOperation) -> Result<TxHandle>;

    /// Block until the transaction is confirmed.
    async fn confirm(&self, tx: TxHandle) -> Result<Receipt>;

    /// Issue a read-only call against a deployed program.
    async fn read(&self, target: Address, query: ReadQuery) -> Result<ReadValue>;
}
