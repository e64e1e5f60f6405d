//! In-memory `StateContext` adapter.
//!
//! Matches the host runtime's get/set contract closely enough for tests
//! and embeddings: reads return the last committed bytes, writes return
//! the committed address list.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::address::StateAddress;
use crate::ports::state::{ContextError, StateContext};

/// HashMap-backed state context.
#[derive(Debug, Default)]
pub struct InMemoryStateContext {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryStateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of addresses holding state.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .map(|entries| entries.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Overwrites the raw bytes at an address, bypassing `set_state`.
    /// Lets tests plant undecodable blobs.
    pub fn put_raw(&self, address: &StateAddress, data: Vec<u8>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(address.as_str().to_string(), data);
        }
    }
}

impl StateContext for InMemoryStateContext {
    fn get_state(&self, address: &StateAddress) -> Result<Option<Vec<u8>>, ContextError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| ContextError::new("state lock poisoned"))?;
        Ok(entries.get(address.as_str()).cloned())
    }

    fn set_state(
        &self,
        address: &StateAddress,
        data: Vec<u8>,
    ) -> Result<Vec<StateAddress>, ContextError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| ContextError::new("state lock poisoned"))?;
        entries.insert(address.as_str().to_string(), data);
        Ok(vec![address.clone()])
    }
}
