//! Contract identity: topology tags, versions, and deployed records.

use crate::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type tag for one program in the fixed deployment topology.
///
/// The variants are the complete program set a chain can carry; which of them
/// a given chain actually receives is decided by the deploy plan and its
/// feature flags.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ContractKind {
    /// Home-chain registry of capabilities and operational groups.
    CapabilityRegistry,
    /// Admin module gating token-registry mutations.
    RegistryModule,
    /// Registry of token administrators.
    TokenRegistry,
    /// Message router, the user-facing entry point.
    Router,
    /// Fee calculation program.
    FeeQuoter,
    /// Cross-chain nonce bookkeeping.
    NonceManager,
    /// Outbound message lane.
    Ingress,
    /// Inbound message lane.
    Egress,
    /// Optional stablecoin transfer pool.
    StablecoinPool,
    /// Optional batching helper.
    Multicall,
}

impl ContractKind {
    /// Stable string tag used in logs and the address book.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractKind::CapabilityRegistry => "CapabilityRegistry",
            ContractKind::RegistryModule => "RegistryModule",
            ContractKind::TokenRegistry => "TokenRegistry",
            ContractKind::Router => "Router",
            ContractKind::FeeQuoter => "FeeQuoter",
            ContractKind::NonceManager => "NonceManager",
            ContractKind::Ingress => "Ingress",
            ContractKind::Egress => "Egress",
            ContractKind::StablecoinPool => "StablecoinPool",
            ContractKind::Multicall => "Multicall",
        }
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// (type tag, semantic version) pair identifying one deployable program shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeAndVersion {
    /// Program type tag.
    pub kind: ContractKind,
    /// Semantic version of the program.
    pub version: semver::Version,
}

impl TypeAndVersion {
    /// Create a new type-and-version pair.
    pub fn new(kind: ContractKind, version: semver::Version) -> Self {
        Self { kind, version }
    }

    /// Shorthand for version 1.0.0.
    pub fn v1(kind: ContractKind) -> Self {
        Self::new(kind, semver::Version::new(1, 0, 0))
    }
}

impl fmt::Display for TypeAndVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.version)
    }
}

/// One deployed program inside one chain.
///
/// Unique per (chain, kind) in normal operation; multiple versions of the
/// same kind may coexist transiently during migrations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRecord {
    /// Where the program lives.
    pub address: Address,
    /// What the program is.
    pub tv: TypeAndVersion,
}

impl ContractRecord {
    /// Create a new record.
    pub fn new(address: Address, tv: TypeAndVersion) -> Self {
        Self { address, tv }
    }

    /// The record's type tag.
    pub fn kind(&self) -> ContractKind {
        self.tv.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChainSelector;

    #[test]
    fn type_and_version_renders_kind_and_version() {
        let tv = TypeAndVersion::new(ContractKind::Router, semver::Version::new(1, 2, 0));
        assert_eq!(tv.to_string(), "Router 1.2.0");
    }

    #[test]
    fn record_exposes_its_kind() {
        let record = ContractRecord::new(
            Address::derive(ChainSelector(7), 0),
            TypeAndVersion::v1(ContractKind::FeeQuoter),
        );
        assert_eq!(record.kind(), ContractKind::FeeQuoter);
    }
}
