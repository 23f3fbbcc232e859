//! Weft Types - Core types for cross-chain deployment orchestration
//!
//! Weft coordinates a fixed topology of interdependent on-chain programs
//! across many independent chains. This crate holds the shared vocabulary:
//! chain and contract identity, capability descriptors, and the deferred
//! change-batch / governance-proposal types.
//!
//! ## Architectural Boundaries
//!
//! - **weft-types** owns: identity, wire shapes, request descriptors
//! - **weft-registry** owns: address book and chain client seams
//! - **weft-deploy** owns: orchestration, routing, configuration
//!
//! ## Key Concepts
//!
//! - **ChainSelector**: one independently addressed deployment target
//! - **ContractRecord**: identity of one deployed program within one chain
//! - **CapabilityDescriptor**: named, versioned unit of off-chain
//!   functionality registered on the home registry program
//! - **ChangeBatch / GovernanceProposal**: deferred-execution grouping of
//!   mutating operations awaiting external multi-party approval

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod calls;
pub mod capability;
pub mod contract;
pub mod ids;
pub mod request;

pub(crate) mod serde_util;

// Re-export main types
pub use calls::{CallData, ChangeBatch, ChangeOperation, GovernanceProposal};
pub use capability::{CapabilityDescriptor, CapabilityHash};
pub use contract::{ContractKind, ContractRecord, TypeAndVersion};
pub use ids::{Address, ChainSelector};
pub use request::{ChainFeatures, DeployRequest, ExecutionMode};
