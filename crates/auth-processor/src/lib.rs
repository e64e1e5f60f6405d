//! # auth-processor
//!
//! Deterministic state-transition core of an accumulator-backed
//! authentication service hosted by a distributed ledger.
//!
//! ## Role in System
//!
//! - **Transaction Processor**: invoked once per submitted transaction by
//!   the hosting ledger runtime
//! - **Single Writer per Address**: the runtime serializes conflicting
//!   writes; this core is re-entrant and keeps no shared mutable state
//! - **Namespace Owner**: claims a fixed 6-hex-character address prefix
//!   derived from its family name
//!
//! ## Processing Pipeline
//!
//! ```text
//! raw payload bytes
//!     │ decode (CBOR)
//!     ▼
//! TransactionPayload ──validate──→ AuthTransaction
//!     │ derive address, load state
//!     ▼
//! Verb dispatch ──┬── initialize/update ──→ mutate + persist
//!                 └── authenticate ───────→ membership check (read-only)
//! ```
//!
//! ## Determinism
//!
//! Every step (decode, validate, hash, modular exponentiation, state
//! get/set) is synchronous and bit-for-bit reproducible across replicas.
//! A failed membership proof is a normal boolean outcome, never an error.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
pub use service::*;
