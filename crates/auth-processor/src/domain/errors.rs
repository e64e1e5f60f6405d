//! Processor error types.
//!
//! Two classes, kept distinct end-to-end:
//!
//! - [`TransactionRejection`]: client-caused, recoverable per transaction.
//!   The transaction is rejected without any state mutation.
//! - [`InternalFault`]: environment or defect, never caused by payload
//!   contents. Signals a problem the operator must look at.
//!
//! A failed membership proof belongs to neither class: it is a normal
//! boolean outcome carried in [`crate::domain::services::TxOutcome`].

use thiserror::Error;

/// Client-caused rejection. The transaction had no effect.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransactionRejection {
    /// Payload bytes could not be parsed as a CBOR map.
    #[error("invalid payload serialization: {0}")]
    InvalidPayload(String),

    /// A required payload field is absent.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// A required payload field is present but not text or an unsigned
    /// integer.
    #[error("{0} has an unsupported field type")]
    InvalidFieldType(&'static str),

    /// Verb is outside the recognized set.
    #[error("verb must be \"initialize\", \"update\" or \"authenticate\", got {0:?}")]
    UnsupportedVerb(String),

    /// Service identifier exceeds the maximum length.
    #[error("service must be a string of no more than {max} characters, got {len}")]
    InvalidServiceId { len: usize, max: usize },

    /// Accumulator value is not a non-negative decimal integer.
    #[error("accumulator value must be a non-negative integer, got {0:?}")]
    InvalidAccumulatorValue(String),

    /// Witness is not a non-negative decimal integer. Surfaced at use
    /// time on the authenticate path.
    #[error("witness must be a non-negative integer, got {0:?}")]
    InvalidWitness(String),

    /// Authenticate against a service that was never initialized.
    #[error("unknown service {0:?}")]
    UnknownService(String),
}

/// System-caused failure, distinct from client rejections.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InternalFault {
    /// A stored state blob exists but could not be decoded.
    #[error("failed to decode state data at {address}: {detail}")]
    StateDecode { address: String, detail: String },

    /// The runtime's write set came back empty; the write did not commit.
    #[error("state write at {address} did not commit")]
    StateWrite { address: String },

    /// The state context itself failed (get or set errored).
    #[error("state context failure: {0}")]
    Context(String),
}

/// Top-level result of applying a transaction, tagging which error class
/// occurred so callers can report them differently.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplyError {
    #[error("invalid transaction: {0}")]
    Rejected(#[from] TransactionRejection),

    #[error("internal error: {0}")]
    Internal(#[from] InternalFault),
}

impl ApplyError {
    /// True when the failure is the client's fault and retrying the same
    /// payload cannot succeed.
    pub fn is_client_fault(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}
