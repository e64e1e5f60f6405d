//! # Address Derivation
//!
//! Maps a service identifier to its storage slot in the ledger's
//! key-value store. Addresses are 70 lowercase hex characters:
//!
//! ```text
//! sha512(family_name)[0..6] ++ sha512(service)[-64..]
//! ```
//!
//! The 6-character namespace prefix is identical for every address this
//! processor touches; the hosting runtime uses it to restrict which
//! storage region the processor may read or write. Derivation is a pure
//! function, so a service id is bound to exactly one slot.

use std::fmt;

use sha2::{Digest, Sha512};

/// Length of the namespace prefix, in hex characters.
pub const NAMESPACE_PREFIX_LENGTH: usize = 6;

/// Total address length, in hex characters.
pub const ADDRESS_LENGTH: usize = 70;

/// A derived storage address within the processor's namespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateAddress(String);

impl StateAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The namespace prefix portion of this address.
    pub fn prefix(&self) -> &str {
        &self.0[..NAMESPACE_PREFIX_LENGTH]
    }
}

impl fmt::Display for StateAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes the 6-hex-character namespace prefix for a family name.
pub fn namespace_prefix(family_name: &str) -> String {
    let digest = hex::encode(Sha512::digest(family_name.as_bytes()));
    digest[..NAMESPACE_PREFIX_LENGTH].to_string()
}

/// Derives the storage address for a service id under the given namespace
/// prefix. Deterministic and collision-resistant by construction.
pub fn derive_address(prefix: &str, service: &str) -> StateAddress {
    let digest = hex::encode(Sha512::digest(service.as_bytes()));
    let tail = &digest[digest.len() - (ADDRESS_LENGTH - NAMESPACE_PREFIX_LENGTH)..];
    StateAddress(format!("{prefix}{tail}"))
}
