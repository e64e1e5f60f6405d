//! # Pipeline Integration Tests
//!
//! Drive the transaction handler exactly the way the hosting runtime
//! does: CBOR payload bytes in, a `StateContext` at the boundary, and
//! nothing else. Covers the full decode → validate → derive → dispatch →
//! persist pipeline, including the ordering guarantee that invalid
//! transactions never touch state.

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use malachite::Natural;
    use rand::distributions::Alphanumeric;
    use rand::{Rng, SeedableRng};

    use auth_processor::adapters::codec::{decode_state, encode_payload};
    use auth_processor::adapters::memory::InMemoryStateContext;
    use auth_processor::domain::address::{derive_address, namespace_prefix, StateAddress};
    use auth_processor::domain::entities::{AuthConfig, TransactionPayload, FAMILY_NAME};
    use auth_processor::domain::errors::{ApplyError, TransactionRejection};
    use auth_processor::domain::services::TxOutcome;
    use auth_processor::ports::state::{ContextError, StateContext};
    use auth_processor::service::AuthTransactionHandler;

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    /// Accumulator fixture for the published 2048-bit modulus, computed
    /// independently: `ACC = WITNESS^EXPONENT mod N`.
    const WITNESS: &str = "1234567891011121314151617181920";
    const EXPONENT: &str = "65537";
    const ACC: &str = concat!(
        "710352790096977467750623100983024289029252049958226650421472701769669576",
        "805996739889083343847326154398366472085564427980332809741791748736139697",
        "935375840286793008521267073990046690248100690239069502016439235828616232",
        "024703916536415359306954582216265372535036590358704756141691916803159178",
        "247992963550120505332234022171081236882497380948265664244489094225168618",
        "247455677127790525170356604303340358227100713388892043276430708773214370",
        "960304055267151827913583862497631210613131055356160974345626965835097913",
        "559402726718404074904523372023075562344772605947343503325298304763731498",
        "1938987091968569194211028880724001173803",
    );

    fn payload(verb: &str, service: &str, value: &str, witness: &str) -> Vec<u8> {
        encode_payload(&TransactionPayload {
            verb: verb.to_string(),
            service: service.to_string(),
            value: value.to_string(),
            witness: witness.to_string(),
        })
    }

    fn address_of(service: &str) -> StateAddress {
        derive_address(&namespace_prefix(FAMILY_NAME), service)
    }

    /// State context that counts every get/set so tests can assert the
    /// handler never touched state.
    #[derive(Default)]
    struct CountingContext {
        inner: InMemoryStateContext,
        gets: AtomicUsize,
        sets: AtomicUsize,
    }

    impl CountingContext {
        fn reads(&self) -> usize {
            self.gets.load(Ordering::SeqCst)
        }

        fn writes(&self) -> usize {
            self.sets.load(Ordering::SeqCst)
        }
    }

    impl StateContext for CountingContext {
        fn get_state(&self, address: &StateAddress) -> Result<Option<Vec<u8>>, ContextError> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            self.inner.get_state(address)
        }

        fn set_state(
            &self,
            address: &StateAddress,
            data: Vec<u8>,
        ) -> Result<Vec<StateAddress>, ContextError> {
            self.sets.fetch_add(1, Ordering::SeqCst);
            self.inner.set_state(address, data)
        }
    }

    // =========================================================================
    // ADDRESS DERIVATION
    // =========================================================================

    #[test]
    fn test_address_derivation_pure_and_collision_free() {
        let prefix = namespace_prefix(FAMILY_NAME);
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);

        let services: Vec<String> = (0..200)
            .map(|_| {
                let len = rng.gen_range(1..=20);
                (&mut rng)
                    .sample_iter(&Alphanumeric)
                    .take(len)
                    .map(char::from)
                    .collect()
            })
            .collect();

        let mut addresses: Vec<_> = services
            .iter()
            .map(|s| derive_address(&prefix, s))
            .collect();

        // Repeated derivation is identical.
        for (service, address) in services.iter().zip(&addresses) {
            assert_eq!(&derive_address(&prefix, service), address);
            assert_eq!(address.prefix(), prefix);
        }

        // No collisions across the (deduplicated) sample.
        let mut unique_services = services.clone();
        unique_services.sort();
        unique_services.dedup();
        addresses.sort();
        addresses.dedup();
        assert_eq!(addresses.len(), unique_services.len());
    }

    // =========================================================================
    // VALIDATION ORDER
    // =========================================================================

    #[test]
    fn test_oversized_service_never_touches_state() {
        let handler = AuthTransactionHandler::default();
        let context = CountingContext::default();
        let long = "z".repeat(21);

        for verb in ["initialize", "update", "authenticate"] {
            let err = handler
                .apply(&payload(verb, &long, "7", "1"), &context)
                .unwrap_err();
            assert!(matches!(
                err,
                ApplyError::Rejected(TransactionRejection::InvalidServiceId { .. })
            ));
        }

        assert_eq!(context.reads(), 0);
        assert_eq!(context.writes(), 0);
    }

    #[test]
    fn test_malformed_payload_never_touches_state() {
        let handler = AuthTransactionHandler::default();
        let context = CountingContext::default();

        let err = handler.apply(&[0xde, 0xad, 0xbe, 0xef], &context).unwrap_err();
        assert!(matches!(
            err,
            ApplyError::Rejected(TransactionRejection::InvalidPayload(_))
        ));
        assert_eq!(context.reads(), 0);
        assert_eq!(context.writes(), 0);
    }

    #[test]
    fn test_missing_witness_key_is_structural_rejection() {
        let handler = AuthTransactionHandler::default();
        let context = CountingContext::default();

        // Hand-built CBOR map without the Witness key.
        let value = ciborium::Value::Map(vec![
            (
                ciborium::Value::Text("Verb".into()),
                ciborium::Value::Text("authenticate".into()),
            ),
            (
                ciborium::Value::Text("Service".into()),
                ciborium::Value::Text("svc1".into()),
            ),
            (
                ciborium::Value::Text("Value".into()),
                ciborium::Value::Text("7".into()),
            ),
        ]);
        let mut buf = Vec::new();
        ciborium::into_writer(&value, &mut buf).unwrap();

        let err = handler.apply(&buf, &context).unwrap_err();
        assert_eq!(
            err,
            ApplyError::Rejected(TransactionRejection::MissingField("Witness"))
        );
        assert_eq!(context.reads(), 0);
    }

    #[test]
    fn test_integer_service_is_type_rejection_not_coerced() {
        let handler = AuthTransactionHandler::default();
        let context = CountingContext::default();

        // Service must be text on the wire; an integer service id would
        // otherwise be coerced to "42" and processed end-to-end.
        let value = ciborium::Value::Map(vec![
            (
                ciborium::Value::Text("Verb".into()),
                ciborium::Value::Text("initialize".into()),
            ),
            (
                ciborium::Value::Text("Service".into()),
                ciborium::Value::Integer(42.into()),
            ),
            (
                ciborium::Value::Text("Value".into()),
                ciborium::Value::Text("7".into()),
            ),
            (
                ciborium::Value::Text("Witness".into()),
                ciborium::Value::Text("0".into()),
            ),
        ]);
        let mut buf = Vec::new();
        ciborium::into_writer(&value, &mut buf).unwrap();

        let err = handler.apply(&buf, &context).unwrap_err();
        assert_eq!(
            err,
            ApplyError::Rejected(TransactionRejection::InvalidFieldType("Service"))
        );
        assert_eq!(context.reads(), 0);
        assert_eq!(context.writes(), 0);
    }

    // =========================================================================
    // STATE LIFECYCLE
    // =========================================================================

    #[test]
    fn test_initialize_then_load_yields_exact_value() {
        let handler = AuthTransactionHandler::default();
        let context = InMemoryStateContext::new();

        handler
            .apply(&payload("initialize", "svc1", "7", "0"), &context)
            .unwrap();

        let stored = context.get_state(&address_of("svc1")).unwrap().unwrap();
        let state = decode_state(&stored).unwrap();
        assert_eq!(state.get("svc1"), Some(&Natural::from(7u32)));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_update_leaves_no_residue_of_old_value() {
        let handler = AuthTransactionHandler::default();
        let context = InMemoryStateContext::new();

        handler
            .apply(&payload("initialize", "svc1", "7", "0"), &context)
            .unwrap();
        handler
            .apply(&payload("update", "svc1", "1000000007", "0"), &context)
            .unwrap();

        let stored = context.get_state(&address_of("svc1")).unwrap().unwrap();
        let state = decode_state(&stored).unwrap();
        assert_eq!(state.get("svc1"), Some(&Natural::from(1000000007u64)));
        assert_eq!(state.len(), 1);
        assert_eq!(context.len(), 1);
    }

    #[test]
    fn test_update_before_initialize_is_allowed() {
        let handler = AuthTransactionHandler::default();
        let context = InMemoryStateContext::new();

        let outcome = handler
            .apply(&payload("update", "fresh", "3", "0"), &context)
            .unwrap();
        assert!(matches!(outcome, TxOutcome::Applied { .. }));
    }

    #[test]
    fn test_distinct_services_live_at_distinct_addresses() {
        let handler = AuthTransactionHandler::default();
        let context = InMemoryStateContext::new();

        handler
            .apply(&payload("initialize", "svc1", "7", "0"), &context)
            .unwrap();
        handler
            .apply(&payload("initialize", "svc2", "9", "0"), &context)
            .unwrap();

        assert_eq!(context.len(), 2);
        let s1 = decode_state(&context.get_state(&address_of("svc1")).unwrap().unwrap()).unwrap();
        let s2 = decode_state(&context.get_state(&address_of("svc2")).unwrap().unwrap()).unwrap();
        assert_eq!(s1.get("svc1"), Some(&Natural::from(7u32)));
        assert_eq!(s1.get("svc2"), None);
        assert_eq!(s2.get("svc2"), Some(&Natural::from(9u32)));
    }

    // =========================================================================
    // AUTHENTICATION SCENARIO (published modulus)
    // =========================================================================

    #[test]
    fn test_full_scenario_against_published_modulus() {
        let handler = AuthTransactionHandler::default();
        let context = CountingContext::default();

        // initialize(svc1, ACC) -> state {svc1: ACC}
        handler
            .apply(&payload("initialize", "svc1", ACC, "0"), &context)
            .unwrap();
        let stored_before = context.inner.get_state(&address_of("svc1")).unwrap().unwrap();
        let state = decode_state(&stored_before).unwrap();
        assert_eq!(state.get("svc1"), Some(&Natural::from_str(ACC).unwrap()));

        // authenticate with the genuine witness -> member, state unchanged
        let outcome = handler
            .apply(&payload("authenticate", "svc1", EXPONENT, WITNESS), &context)
            .unwrap();
        assert_eq!(outcome, TxOutcome::Authenticated { member: true });

        // authenticate with witness+1 -> not a member, state unchanged
        let tampered = (Natural::from_str(WITNESS).unwrap() + Natural::from(1u32)).to_string();
        let outcome = handler
            .apply(&payload("authenticate", "svc1", EXPONENT, &tampered), &context)
            .unwrap();
        assert_eq!(outcome, TxOutcome::Authenticated { member: false });

        // The only write was the initialize.
        assert_eq!(context.writes(), 1);
        let stored_after = context.inner.get_state(&address_of("svc1")).unwrap().unwrap();
        assert_eq!(stored_after, stored_before);
    }

    #[test]
    fn test_authenticate_before_initialize_is_unknown_service() {
        let handler = AuthTransactionHandler::default();
        let context = InMemoryStateContext::new();

        let err = handler
            .apply(&payload("authenticate", "never-seen", "7", "123"), &context)
            .unwrap_err();

        assert_eq!(
            err,
            ApplyError::Rejected(TransactionRejection::UnknownService("never-seen".into()))
        );
    }

    #[test]
    fn test_small_modulus_end_to_end() {
        // 2773 = 47 * 59; 4^13 mod 2773 = 2264.
        let handler = AuthTransactionHandler::new(AuthConfig::with_modulus(Natural::from(2773u32)));
        let context = InMemoryStateContext::new();

        handler
            .apply(&payload("initialize", "svc1", "2264", "0"), &context)
            .unwrap();

        let good = handler
            .apply(&payload("authenticate", "svc1", "13", "4"), &context)
            .unwrap();
        assert_eq!(good, TxOutcome::Authenticated { member: true });

        let bad = handler
            .apply(&payload("authenticate", "svc1", "13", "5"), &context)
            .unwrap();
        assert_eq!(bad, TxOutcome::Authenticated { member: false });
    }
}
