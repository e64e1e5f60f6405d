//! # Authentication Transaction Handler
//!
//! Application service tying the pipeline together: decode → validate →
//! derive address → load state → dispatch → persist (mutating verbs
//! only). The hosting runtime registers the handler by its family name,
//! version, and namespace prefix, then calls [`AuthTransactionHandler::apply`]
//! once per delivered transaction.
//!
//! ## Ordering Guarantees
//!
//! Validation runs before any state access, so an invalid transaction
//! never triggers a state read. `authenticate` never calls `set_state`,
//! regardless of the verification outcome.

use std::str::FromStr;
use std::time::Instant;

use malachite::Natural;
use tracing::{debug, warn};

use crate::adapters::codec;
use crate::domain::address::{derive_address, StateAddress};
use crate::domain::entities::{AccumulatorState, AuthConfig, AuthTransaction, TransactionPayload, Verb};
use crate::domain::errors::{ApplyError, InternalFault, TransactionRejection};
use crate::domain::services::{do_authenticate, do_initialize, do_update, TxOutcome};
use crate::ports::state::StateContext;

/// Transaction handler for the authentication family.
///
/// Holds only immutable configuration; safe to share across concurrent
/// invocations for disjoint addresses.
#[derive(Clone, Debug, Default)]
pub struct AuthTransactionHandler {
    config: AuthConfig,
}

impl AuthTransactionHandler {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Family name the runtime registers this handler under.
    pub fn family_name(&self) -> &str {
        &self.config.family_name
    }

    /// Supported family schema versions.
    pub fn family_versions(&self) -> Vec<String> {
        vec![self.config.family_version.clone()]
    }

    /// Address prefixes this handler claims exclusive ownership of.
    pub fn namespaces(&self) -> Vec<String> {
        vec![self.config.namespace_prefix.clone()]
    }

    /// Processes one submitted transaction against the runtime-supplied
    /// state context.
    ///
    /// Deterministic: the outcome is a pure function of the payload and
    /// the state at the derived address.
    pub fn apply<C: StateContext>(
        &self,
        payload: &[u8],
        context: &C,
    ) -> Result<TxOutcome, ApplyError> {
        let started = Instant::now();

        let raw = codec::decode_payload(payload)?;
        let tx = self.validate(raw)?;

        let address = derive_address(&self.config.namespace_prefix, &tx.service);
        let mut state = self.load_state(&address, context)?;

        let outcome = match tx.verb {
            Verb::Authenticate => {
                let member =
                    do_authenticate(&tx.service, &tx.value, &tx.witness, &self.config.modulus, &state)
                        .map_err(ApplyError::Rejected)?;
                TxOutcome::Authenticated { member }
            }
            Verb::Initialize => {
                do_initialize(&tx.service, &tx.value, &mut state);
                TxOutcome::Applied {
                    address: address.clone(),
                }
            }
            Verb::Update => {
                do_update(&tx.service, &tx.value, &mut state);
                TxOutcome::Applied {
                    address: address.clone(),
                }
            }
        };

        if tx.verb.is_mutating() {
            self.store_state(&address, &state, context)?;
        }

        debug!(
            verb = %tx.verb,
            service = %tx.service,
            %address,
            elapsed = ?started.elapsed(),
            "apply complete"
        );
        Ok(outcome)
    }

    /// Enforces structural and domain constraints on the decoded fields.
    /// The accumulator value is parsed exactly once here; the witness is
    /// left textual for the authenticate path.
    fn validate(&self, raw: TransactionPayload) -> Result<AuthTransaction, TransactionRejection> {
        let verb = Verb::parse(&raw.verb)
            .ok_or_else(|| TransactionRejection::UnsupportedVerb(raw.verb.clone()))?;

        let len = raw.service.chars().count();
        if len > self.config.max_service_length {
            return Err(TransactionRejection::InvalidServiceId {
                len,
                max: self.config.max_service_length,
            });
        }

        let value = Natural::from_str(&raw.value)
            .map_err(|_| TransactionRejection::InvalidAccumulatorValue(raw.value.clone()))?;

        Ok(AuthTransaction {
            verb,
            service: raw.service,
            value,
            witness: raw.witness,
        })
    }

    fn load_state<C: StateContext>(
        &self,
        address: &StateAddress,
        context: &C,
    ) -> Result<AccumulatorState, ApplyError> {
        let entry = context
            .get_state(address)
            .map_err(|e| InternalFault::Context(e.to_string()))
            .map_err(ApplyError::Internal)?;

        match entry {
            // Absent state is the defined "not yet initialized" case.
            None => Ok(AccumulatorState::new()),
            Some(data) => codec::decode_state(&data).map_err(|e| {
                warn!(%address, error = %e, "stored state blob is undecodable");
                ApplyError::Internal(InternalFault::StateDecode {
                    address: address.to_string(),
                    detail: e.to_string(),
                })
            }),
        }
    }

    fn store_state<C: StateContext>(
        &self,
        address: &StateAddress,
        state: &AccumulatorState,
        context: &C,
    ) -> Result<(), ApplyError> {
        let encoded = codec::encode_state(state);
        let written = context
            .set_state(address, encoded)
            .map_err(|e| InternalFault::Context(e.to_string()))
            .map_err(ApplyError::Internal)?;

        if written.is_empty() {
            return Err(ApplyError::Internal(InternalFault::StateWrite {
                address: address.to_string(),
            }));
        }
        Ok(())
    }
}
