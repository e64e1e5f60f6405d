//! Adapters: wire codecs and `StateContext` implementations.

pub mod codec;
pub mod memory;

pub use codec::*;
pub use memory::*;
