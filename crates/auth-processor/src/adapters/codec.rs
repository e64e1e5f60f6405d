//! CBOR codecs for transaction payloads and state blobs.
//!
//! ## Payload
//!
//! A CBOR map with exactly four required text keys: `Verb`, `Service`,
//! `Value`, `Witness`. `Value` and `Witness` carry decimal-integer text;
//! CBOR unsigned integers are also accepted for those two fields and
//! coerced to their decimal spelling (numeric inputs are coerced, not
//! rejected). Decoding is manual over `ciborium::Value` so each absent
//! key yields its own [`TransactionRejection::MissingField`] rather than
//! a generic serde error.
//!
//! ## State blob
//!
//! A CBOR map `service (text) → accumulator value (decimal text)`. The
//! encoding keeps the open map shape, but values are parsed into
//! `Natural` here, once, at the boundary.

use std::collections::BTreeMap;

use malachite::Natural;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::entities::{AccumulatorState, TransactionPayload};
use crate::domain::errors::TransactionRejection;

/// Required payload field names, in wire spelling.
pub const FIELD_VERB: &str = "Verb";
pub const FIELD_SERVICE: &str = "Service";
pub const FIELD_VALUE: &str = "Value";
pub const FIELD_WITNESS: &str = "Witness";

/// State blob decoding failure. Wrapped into an internal fault by the
/// application service, since a stored-but-undecodable blob is an
/// environment problem, not a client one.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct StateCodecError {
    pub message: String,
}

impl StateCodecError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Decodes a raw transaction payload into its four required fields.
///
/// No partial results: any failure rejects the whole payload.
pub fn decode_payload(payload: &[u8]) -> Result<TransactionPayload, TransactionRejection> {
    let value: ciborium::Value = ciborium::from_reader(payload)
        .map_err(|e| TransactionRejection::InvalidPayload(e.to_string()))?;

    let entries = value.as_map().ok_or_else(|| {
        TransactionRejection::InvalidPayload("payload is not a CBOR map".to_string())
    })?;

    Ok(TransactionPayload {
        verb: required_field(entries, FIELD_VERB)?,
        service: required_field(entries, FIELD_SERVICE)?,
        value: required_field(entries, FIELD_VALUE)?,
        witness: required_field(entries, FIELD_WITNESS)?,
    })
}

/// Encodes a payload into its CBOR wire form.
pub fn encode_payload(payload: &TransactionPayload) -> Vec<u8> {
    let mut buf = Vec::new();
    ciborium::into_writer(payload, &mut buf).expect("payload serialization should not fail");
    buf
}

fn required_field(
    entries: &[(ciborium::Value, ciborium::Value)],
    name: &'static str,
) -> Result<String, TransactionRejection> {
    let value = entries
        .iter()
        .find(|(key, _)| key.as_text() == Some(name))
        .map(|(_, value)| value)
        .ok_or(TransactionRejection::MissingField(name))?;

    match value {
        ciborium::Value::Text(text) => Ok(text.clone()),
        // Numeric coercion applies only to the integer-valued fields;
        // `Verb` and `Service` must be text on the wire.
        ciborium::Value::Integer(integer) if name == FIELD_VALUE || name == FIELD_WITNESS => {
            Ok(i128::from(*integer).to_string())
        }
        _ => Err(TransactionRejection::InvalidFieldType(name)),
    }
}

/// Decodes a stored state blob into typed accumulator state.
pub fn decode_state(data: &[u8]) -> Result<AccumulatorState, StateCodecError> {
    let wire: BTreeMap<String, String> =
        ciborium::from_reader(data).map_err(|e| StateCodecError::new(e.to_string()))?;

    wire.into_iter()
        .map(|(service, value)| {
            let parsed = Natural::from_str(&value).map_err(|_| {
                StateCodecError::new(format!(
                    "stored value for {service:?} is not a non-negative integer"
                ))
            })?;
            Ok((service, parsed))
        })
        .collect()
}

/// Encodes accumulator state into its CBOR blob form.
pub fn encode_state(state: &AccumulatorState) -> Vec<u8> {
    let wire: BTreeMap<&String, String> = state
        .iter()
        .map(|(service, value)| (service, value.to_string()))
        .collect();

    let mut buf = Vec::new();
    ciborium::into_writer(&wire, &mut buf).expect("state serialization should not fail");
    buf
}
