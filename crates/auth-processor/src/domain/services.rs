//! Verb handlers: the pure business logic behind dispatch.
//!
//! State lives in [`AccumulatorState`]; these functions transform or read
//! it and never touch the ledger runtime. Persistence is the application
//! service's job, and only for the mutating verbs.

use malachite::Natural;
use std::str::FromStr;
use tracing::debug;

use super::accumulator;
use super::address::StateAddress;
use super::entities::AccumulatorState;
use super::errors::TransactionRejection;

/// Result of a successfully processed transaction.
///
/// A `member: false` authentication is a success at this level: the
/// pipeline ran to completion and the proof simply did not check out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TxOutcome {
    /// State was mutated and persisted at the given address.
    Applied { address: StateAddress },
    /// Membership was checked; no state was written.
    Authenticated { member: bool },
}

/// Sets `state[service] = value`, creating the entry or overwriting it
/// unconditionally. Re-initializing an existing service silently
/// overwrites; this mirrors `update` on purpose.
pub fn do_initialize(service: &str, value: &Natural, state: &mut AccumulatorState) {
    debug!(%service, value = %value, "initializing accumulator value");
    state.set(service, value.clone());
}

/// Sets `state[service] = value`, creating the entry or overwriting it
/// unconditionally. No existence check: behaviorally identical to
/// `initialize`.
pub fn do_update(service: &str, value: &Natural, state: &mut AccumulatorState) {
    debug!(%service, value = %value, "updating accumulator value");
    state.set(service, value.clone());
}

/// Checks the claimed membership witness for a service against its stored
/// accumulator value. Read-only with respect to `state`.
///
/// The transaction's `value` plays the role of the member exponent; the
/// accumulator value comes from state. The witness is coerced from text
/// here, at its single point of use, and a coercion failure is a typed
/// rejection rather than a panic.
pub fn do_authenticate(
    service: &str,
    exponent: &Natural,
    witness_text: &str,
    modulus: &Natural,
    state: &AccumulatorState,
) -> Result<bool, TransactionRejection> {
    let acc_value = state
        .get(service)
        .ok_or_else(|| TransactionRejection::UnknownService(service.to_string()))?;

    let witness = Natural::from_str(witness_text)
        .map_err(|_| TransactionRejection::InvalidWitness(witness_text.to_string()))?;

    let member = accumulator::verify_membership(&witness, exponent, modulus, acc_value);
    debug!(%service, member, "membership verification complete");
    Ok(member)
}
