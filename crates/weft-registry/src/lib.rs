//! Weft Registry - External interface seams for the deployment engine
//!
//! The orchestration core treats everything on the other side of the network
//! as a collaborator behind a trait: the durable address book, the per-chain
//! submission/confirmation handle, and the governance proposal builder. This
//! crate defines those seams and ships in-memory implementations suitable
//! for development and testing; production deployments wire in real backends.
//!
//! ## Architectural Boundaries
//!
//! - **weft-registry** owns: the trait contracts and their in-memory forms
//! - **weft-deploy** owns: everything that calls through them
//! - Consensus, signing, and the business semantics of deployed programs are
//!   out of scope on both sides of the seam.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod address_book;
pub mod chain;
pub mod error;
pub mod memory;
pub mod proposal;

// Re-exports
pub use address_book::{AddressBook, AddressDelta};
pub use chain::{
    ChainClient, DeployArtifact, DeployedContract, ReadQuery, ReadValue, Receipt, TxHandle,
};
pub use error::{RegistryError, Result};
pub use memory::{InMemoryAddressBook, InMemoryProposalBuilder, SimulatedChain};
pub use proposal::ProposalBuilder;
