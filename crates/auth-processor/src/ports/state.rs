//! Outbound port to the ledger runtime's key-value context.
//!
//! The runtime guarantees serialized, conflict-free execution of
//! state-touching operations; this port treats `get`/`set` as synchronous
//! calls that may fail but are never waited on indefinitely.

use thiserror::Error;

use crate::domain::address::StateAddress;

/// Failure reported by the runtime context itself.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("context error: {0}")]
pub struct ContextError(pub String);

impl ContextError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Key-value context supplied by the hosting runtime for one transaction.
///
/// `set_state` returns the addresses the runtime actually committed; an
/// empty list signals the write did not take effect and is treated as an
/// internal fault by the caller.
pub trait StateContext: Send + Sync {
    fn get_state(&self, address: &StateAddress) -> Result<Option<Vec<u8>>, ContextError>;

    fn set_state(
        &self,
        address: &StateAddress,
        data: Vec<u8>,
    ) -> Result<Vec<StateAddress>, ContextError>;
}
