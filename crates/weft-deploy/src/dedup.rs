//! Capability deduplicator.
//!
//! The registry program aborts the entire enclosing transaction when a
//! capability is re-registered. Inside a batched, multi-operation governance
//! proposal that would poison the whole batch, so duplicates are filtered
//! here before anything is routed — a duplicate is never an error.

use crate::error::{DeployError, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;
use weft_registry::{ChainClient, ReadQuery, ReadValue};
use weft_types::{Address, CapabilityDescriptor};

/// Return the subset of `requested` that is genuinely new, in original
/// relative order.
///
/// Drops every descriptor whose canonical hash is already registered on the
/// registry program at `registry`, and every intra-request duplicate after
/// its first occurrence. The hash derivation is shared with the registry, so
/// identity comparison cannot drift.
pub async fn dedup_capabilities(
    client: &Arc<dyn ChainClient>,
    registry: Address,
    requested: &[CapabilityDescriptor],
) -> Result<Vec<CapabilityDescriptor>> {
    let existing: HashSet<_> = match client
        .read(registry, ReadQuery::RegisteredCapabilities)
        .await?
    {
        ReadValue::CapabilityHashes(hashes) => hashes.into_iter().collect(),
        other => {
            return Err(DeployError::Internal(format!(
                "unexpected read result for capability query: {other:?}"
            )))
        }
    };

    let mut seen = HashSet::new();
    let mut fresh = Vec::new();
    for candidate in requested {
        let hash = candidate.hashed_id();
        if !seen.insert(hash) {
            debug!(capability = %candidate, "duplicate within request, dropping");
            continue;
        }
        if existing.contains(&hash) {
            debug!(capability = %candidate, "already registered, dropping");
            continue;
        }
        fresh.push(candidate.clone());
    }

    Ok(fresh)
}
