//! Domain layer: entities, errors, and pure business logic.
//!
//! Nothing in this module touches the ledger runtime. All functions are
//! deterministic and side-effect free apart from log emission.

pub mod accumulator;
pub mod address;
pub mod entities;
pub mod errors;
pub mod services;

pub use accumulator::*;
pub use address::*;
pub use entities::*;
pub use errors::*;
pub use services::*;
