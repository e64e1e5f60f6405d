//! # Domain Entities
//!
//! Core data structures for the authentication transaction processor.
//!
//! ## Type Decisions
//!
//! - Accumulator values and witnesses use `malachite::Natural` end-to-end:
//!   the RSA accumulator works over a 2048-bit modulus, far beyond any
//!   primitive width. Values are parsed from decimal text exactly once at
//!   the boundary and carried as `Natural` afterwards.
//! - The verb set is an exhaustive enum rather than a string table, so the
//!   "unhandled verb" fallback is unreachable by construction.

use std::collections::BTreeMap;
use std::fmt;

use malachite::Natural;
use serde::{Deserialize, Serialize};

use super::accumulator;
use super::address;

/// Maximum length of a service identifier, in characters.
pub const MAX_SERVICE_LENGTH: usize = 20;

/// Transaction family name registered with the hosting runtime.
pub const FAMILY_NAME: &str = "custom_authentication";

/// The single supported transaction family schema version.
pub const FAMILY_VERSION: &str = "1.0";

/// Operation requested by a transaction.
///
/// Dispatch matches exhaustively on this enum; a verb that survives
/// validation always has a handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verb {
    /// Create or overwrite the accumulator value for a service.
    Initialize,
    /// Overwrite the accumulator value for a service.
    Update,
    /// Check a claimed membership witness against stored state. Read-only.
    Authenticate,
}

impl Verb {
    /// Parses a verb from its wire spelling. Returns `None` for anything
    /// outside the recognized set.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "initialize" => Some(Self::Initialize),
            "update" => Some(Self::Update),
            "authenticate" => Some(Self::Authenticate),
            _ => None,
        }
    }

    /// Wire spelling of this verb.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::Update => "update",
            Self::Authenticate => "authenticate",
        }
    }

    /// True for verbs that persist updated state after dispatch.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Self::Authenticate)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded but not yet validated transaction payload.
///
/// All four fields are required on the wire; `value` and `witness` are
/// decimal-integer text. Serialized as a CBOR map with PascalCase keys.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionPayload {
    /// Requested operation (`initialize`, `update`, or `authenticate`).
    pub verb: String,
    /// Service identifier naming the authenticated entity.
    pub service: String,
    /// Accumulator value (or, for `authenticate`, the claimed member
    /// exponent) as decimal text.
    pub value: String,
    /// Claimed membership witness as decimal text.
    pub witness: String,
}

/// A fully validated transaction, ready for dispatch.
///
/// The accumulator value has been parsed once; the witness stays textual
/// until the authenticate path coerces it. Witness format validation is
/// deliberately deferred: a coercion failure surfaces as a typed rejection
/// at use time, never a panic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthTransaction {
    pub verb: Verb,
    pub service: String,
    pub value: Natural,
    pub witness: String,
}

/// Per-address accumulator state: a mapping from service id to its current
/// accumulator value.
///
/// Because the storage address is a one-way function of the service id,
/// each address in practice holds exactly one entry, but the encoding
/// keeps the map shape.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccumulatorState {
    entries: BTreeMap<String, Natural>,
}

impl AccumulatorState {
    /// Creates the empty, not-yet-initialized state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the accumulator value stored for a service.
    pub fn get(&self, service: &str) -> Option<&Natural> {
        self.entries.get(service)
    }

    /// Sets the accumulator value for a service, overwriting any previous
    /// value unconditionally.
    pub fn set(&mut self, service: &str, value: Natural) {
        self.entries.insert(service.to_string(), value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in deterministic (sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Natural)> {
        self.entries.iter()
    }
}

impl FromIterator<(String, Natural)> for AccumulatorState {
    fn from_iter<T: IntoIterator<Item = (String, Natural)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Immutable processor configuration.
///
/// Constructed once at startup and passed into the handler; never mutated
/// afterwards. Holds the identity metadata the hosting runtime registers
/// handlers by, plus the public accumulator modulus.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// Transaction family name.
    pub family_name: String,
    /// Supported family schema version.
    pub family_version: String,
    /// Maximum service identifier length.
    pub max_service_length: usize,
    /// 6-hex-character address prefix owned by this family.
    pub namespace_prefix: String,
    /// Fixed public accumulator modulus shared by the whole system.
    pub modulus: Natural,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            family_name: FAMILY_NAME.to_string(),
            family_version: FAMILY_VERSION.to_string(),
            max_service_length: MAX_SERVICE_LENGTH,
            namespace_prefix: address::namespace_prefix(FAMILY_NAME),
            modulus: accumulator::public_modulus(),
        }
    }
}

impl AuthConfig {
    /// Builds a configuration with a caller-supplied modulus. Used by
    /// tests that want a small modulus with hand-checkable arithmetic.
    pub fn with_modulus(modulus: Natural) -> Self {
        Self {
            modulus,
            ..Self::default()
        }
    }
}
