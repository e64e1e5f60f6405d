//! Ports: the processor's boundary with the hosting ledger runtime.

pub mod state;

pub use state::*;
