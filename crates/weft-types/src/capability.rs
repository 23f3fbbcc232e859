//! Capability descriptors registered on the home registry program.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Content hash identifying one capability on the registry.
pub type CapabilityHash = [u8; 32];

/// A named, versioned unit of off-chain functionality.
///
/// Identity is the (name, version) pair: two descriptors with equal name and
/// version are the same capability regardless of how they were constructed.
/// The registry compares capabilities by [`CapabilityDescriptor::hashed_id`],
/// derived from the canonical `name@version` rendering, and this derivation
/// must stay in lockstep with the registry's own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapabilityDescriptor {
    /// Labelled capability name.
    pub name: String,
    /// Capability version string, e.g. `1.0.0`.
    pub version: String,
}

impl CapabilityDescriptor {
    /// Create a new descriptor.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Canonical identity rendering: `name@version`.
    pub fn id(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }

    /// Content hash used by the registry for identity comparison.
    pub fn hashed_id(&self) -> CapabilityHash {
        *blake3::hash(self.id().as_bytes()).as_bytes()
    }
}

impl fmt::Display for CapabilityDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}
