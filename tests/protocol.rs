//! Cross-module property tests for the AlgoChat wire protocol, covering
//! the quantified invariants and literal test vectors in §8.

use algochat_core::{
    discover_from_announcement, discover_from_messages, is_chat_message, is_psk_message,
    psk, ratchet, standard, AlgoChatError, ChainClient, DecryptedPayload, EncryptionKeyStorage,
    IdentityKeyPair, NoteTransaction, PSKEnvelope, PSKReplayState, StandardEnvelope,
};
use algochat_core::{classify_payload, create_psk_uri, parse_psk_uri};

const INITIAL_PSK: [u8; 32] = [0xAA; 32];

#[test]
fn standard_seal_open_round_trip_at_max_payload() {
    let sender = IdentityKeyPair::derive(&[0x01; 32]).unwrap();
    let recipient = IdentityKeyPair::derive(&[0x02; 32]).unwrap();
    let plaintext = vec![b'x'; standard::MAX_PAYLOAD];

    let envelope = standard::seal(&plaintext, &sender.public_key, &recipient.public_key).unwrap();
    let wire = envelope.encode();
    let decoded = StandardEnvelope::decode(&wire).unwrap();

    assert_eq!(
        standard::open(&decoded, &recipient.private_key, &recipient.public_key).unwrap(),
        plaintext
    );
    assert_eq!(
        standard::open(&decoded, &sender.private_key, &sender.public_key).unwrap(),
        plaintext
    );
}

#[test]
fn psk_seal_open_round_trip_at_max_payload() {
    let sender = IdentityKeyPair::derive(&[0x03; 32]).unwrap();
    let recipient = IdentityKeyPair::derive(&[0x04; 32]).unwrap();
    let counter = 12345u32;
    let key = ratchet::derive_psk_at_counter(&INITIAL_PSK, counter);
    let plaintext = vec![b'y'; psk::MAX_PAYLOAD];

    let envelope = psk::seal(&plaintext, &sender.public_key, &recipient.public_key, &key, counter).unwrap();
    let wire = envelope.encode();
    assert!(is_psk_message(&wire));
    assert!(!is_chat_message(&wire));

    let decoded = PSKEnvelope::decode(&wire).unwrap();
    assert_eq!(decoded.ratchet_counter, counter);

    assert_eq!(
        psk::open(&decoded, &recipient.private_key, &recipient.public_key, &key).unwrap(),
        plaintext
    );
    assert_eq!(
        psk::open(&decoded, &sender.private_key, &sender.public_key, &key).unwrap(),
        plaintext
    );
}

#[test]
fn ratchet_vectors_match_specification() {
    fn hex32(bytes: &[u8; 32]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    assert_eq!(
        hex32(&ratchet::derive_session_psk(&INITIAL_PSK, 0)),
        "a031707ea9e9e50bd8ea4eb9a2bd368465ea1aff14caab293d38954b4717e888"
    );
    assert_eq!(
        hex32(&ratchet::derive_session_psk(&INITIAL_PSK, 1)),
        "994cffbb4f84fa5410d44574bb9fa7408a8c2f1ed2b3a00f5168fc74c71f7cea"
    );
    assert_eq!(
        hex32(&ratchet::derive_psk_at_counter(&INITIAL_PSK, 0)),
        "2918fd486b9bd024d712f6234b813c0f4167237d60c2c1fca37326b20497c165"
    );
    assert_eq!(
        hex32(&ratchet::derive_psk_at_counter(&INITIAL_PSK, 99)),
        "5b48a50a25261f6b63fe9c867b46be46de4d747c3477db6290045ba519a4d38b"
    );
    assert_eq!(
        hex32(&ratchet::derive_psk_at_counter(&INITIAL_PSK, 100)),
        "7a15d3add6a28858e6a1f1ea0d22bdb29b7e129a1330c4908d9b46a460992694"
    );
}

#[test]
fn end_to_end_standard_message_both_identities_agree() {
    let a = IdentityKeyPair::derive(&[0x01; 32]).unwrap();
    let b = IdentityKeyPair::derive(&[0x02; 32]).unwrap();

    let envelope = standard::seal(b"Hello, AlgoChat!", &a.public_key, &b.public_key).unwrap();
    let wire = envelope.encode();
    let decoded = StandardEnvelope::decode(&wire).unwrap();

    let by_b = standard::open(&decoded, &b.private_key, &b.public_key).unwrap();
    let by_a = standard::open(&decoded, &a.private_key, &a.public_key).unwrap();
    assert_eq!(by_a, by_b);

    match classify_payload(&by_b) {
        DecryptedPayload::Message { text, .. } => assert_eq!(text, "Hello, AlgoChat!"),
        DecryptedPayload::NoMessage => panic!("expected a message"),
    }
}

#[test]
fn replay_window_rejects_repeat_and_stale_counters() {
    let mut state = PSKReplayState::new();
    state.validate_and_record(1000).unwrap();
    assert!(state.validate_and_record(1000).is_err());
    assert!(!state.validate(1000 - algochat_core::replay::WINDOW - 1));
}

#[test]
fn uri_round_trips_for_any_valid_input() {
    let psk_bytes = [0x5Au8; 32];
    let uri = create_psk_uri("SOME+ADDRESS/WITH=CHARS", &psk_bytes, Some("Alice's phone"));
    let parsed = parse_psk_uri(&uri).unwrap();
    assert_eq!(parsed.addr, "SOME+ADDRESS/WITH=CHARS");
    assert_eq!(parsed.psk, psk_bytes);
    assert_eq!(parsed.label.as_deref(), Some("Alice's phone"));
}

struct StubChain;

impl ChainClient for StubChain {
    fn suggested_params(&self) -> Result<algochat_core::chain::SuggestedParams, AlgoChatError> {
        unimplemented!("external collaborator — not exercised by the core's own tests")
    }
    fn submit(&self, _signed_txn: &algochat_core::chain::SignedTransaction) -> Result<String, AlgoChatError> {
        unimplemented!()
    }
    fn search_transactions(
        &self,
        _address: &str,
        _after_round: Option<u64>,
        _limit: Option<usize>,
    ) -> Result<Vec<NoteTransaction>, AlgoChatError> {
        Ok(vec![])
    }
    fn search_transactions_between(
        &self,
        _a: &str,
        _b: &str,
        _after_round: Option<u64>,
        _limit: Option<usize>,
    ) -> Result<Vec<NoteTransaction>, AlgoChatError> {
        Ok(vec![])
    }
    fn lookup_transaction(&self, _txid: &str) -> Result<NoteTransaction, AlgoChatError> {
        unimplemented!()
    }
}

#[derive(Default)]
struct StubKeyStorage(std::collections::HashMap<String, [u8; 32]>);

impl EncryptionKeyStorage for StubKeyStorage {
    fn store(&mut self, address: &str, private_key: &[u8; 32]) -> Result<(), AlgoChatError> {
        self.0.insert(address.to_string(), *private_key);
        Ok(())
    }
    fn retrieve(&self, address: &str) -> Result<Option<[u8; 32]>, AlgoChatError> {
        Ok(self.0.get(address).copied())
    }
    fn has(&self, address: &str) -> Result<bool, AlgoChatError> {
        Ok(self.0.contains_key(address))
    }
    fn delete(&mut self, address: &str) -> Result<(), AlgoChatError> {
        self.0.remove(address);
        Ok(())
    }
    fn list(&self) -> Result<Vec<String>, AlgoChatError> {
        Ok(self.0.keys().cloned().collect())
    }
}

#[test]
fn chain_and_storage_traits_are_implementable_by_callers() {
    let chain = StubChain;
    assert_eq!(chain.search_transactions("X", None, None).unwrap().len(), 0);

    let mut storage = StubKeyStorage::default();
    storage.store("ADDR", &[1u8; 32]).unwrap();
    assert!(storage.has("ADDR").unwrap());
    assert_eq!(storage.retrieve("ADDR").unwrap(), Some([1u8; 32]));
}

#[test]
fn discovery_prefers_first_match_and_reports_not_found_otherwise() {
    let empty: Vec<NoteTransaction> = vec![];
    let err = discover_from_announcement("ADDR", &empty, None, 100).unwrap_err();
    assert!(matches!(err, AlgoChatError::PublicKeyNotFound { address, search_depth } if address == "ADDR" && search_depth == 100));

    let err = discover_from_messages("ADDR", &empty, 200).unwrap_err();
    assert!(matches!(err, AlgoChatError::PublicKeyNotFound { .. }));
}
