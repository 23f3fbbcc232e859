//! Execution environment: chain clients plus the shared address book.

use crate::error::{DeployError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use weft_registry::{AddressBook, ChainClient};
use weft_types::ChainSelector;

/// Everything the engine needs to reach the outside world: one client per
/// chain and the durable address book shared across all of them.
///
/// Immutable for the duration of a run. Cloning is cheap; the clients and the
/// book are shared behind `Arc`.
#[derive(Clone)]
pub struct Environment {
    chains: HashMap<ChainSelector, Arc<dyn ChainClient>>,
    address_book: Arc<dyn AddressBook>,
}

impl Environment {
    /// Create an environment over the given address book.
    pub fn new(address_book: Arc<dyn AddressBook>) -> Self {
        Self {
            chains: HashMap::new(),
            address_book,
        }
    }

    /// Register a chain client, keyed by its own selector.
    pub fn with_chain(mut self, client: Arc<dyn ChainClient>) -> Self {
        self.chains.insert(client.selector(), client);
        self
    }

    /// Client for one chain.
    pub fn chain(&self, selector: ChainSelector) -> Result<Arc<dyn ChainClient>> {
        self.chains
            .get(&selector)
            .cloned()
            .ok_or(DeployError::UnknownChain(selector))
    }

    /// The shared address book.
    pub fn address_book(&self) -> &Arc<dyn AddressBook> {
        &self.address_book
    }

    /// Selectors of every registered chain.
    pub fn selectors(&self) -> Vec<ChainSelector> {
        let mut selectors: Vec<_> = self.chains.keys().copied().collect();
        selectors.sort();
        selectors
    }
}
