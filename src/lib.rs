//! AlgoChat protocol core: an end-to-end encrypted messaging engine whose
//! ciphertexts live in the note field of ledger payment transactions.
//!
//! This crate is the cryptographic and protocol engine only — identity-key
//! derivation, the two envelope wire formats (v1 Standard and v1.1 PSK),
//! bidirectional authenticated encryption, key announcement/discovery, the
//! PSK ratchet and replay window, and the PSK exchange URI codec. Ledger
//! submission/indexing and private-key/queue persistence are external
//! collaborators, specified as traits in [`chain`] with no implementation
//! shipped here.
//!
//! The core does not hide metadata, does not guarantee delivery or
//! ordering beyond what the ledger provides, does not support group
//! messaging, and does not rotate identity keys.

pub mod announcement;
pub mod chain;
pub mod discovery;
pub mod envelope;
pub mod error;
pub mod identity;
pub mod payload;
pub mod primitives;
pub mod psk;
pub mod psk_uri;
pub mod ratchet;
pub mod replay;
pub mod standard;

pub use announcement::{parse_announcement, DiscoveredKey};
pub use chain::{ChainClient, EncryptionKeyStorage, MessageCache, NoteTransaction, SendQueueStorage};
pub use discovery::{discover_from_announcement, discover_from_messages};
pub use envelope::{is_chat_message, is_psk_message, PSKEnvelope, StandardEnvelope};
pub use error::AlgoChatError;
pub use identity::{EphemeralKeyPair, IdentityKeyPair};
pub use payload::{classify as classify_payload, truncate_reply_preview, DecryptedPayload};
pub use psk_uri::{create as create_psk_uri, parse as parse_psk_uri, PSKExchange};
pub use ratchet::{derive_psk_at_counter, derive_position_psk, derive_session_psk};
pub use replay::{PSKReplayState, PeerReplayTracker};

#[cfg(test)]
mod tests {
    use super::*;

    /// §8 scenario 6: end-to-end seal/open with both identities recovering
    /// the same plaintext.
    #[test]
    fn end_to_end_standard_message() {
        let a = IdentityKeyPair::derive(&[0x01; 32]).unwrap();
        let b = IdentityKeyPair::derive(&[0x02; 32]).unwrap();
        let plaintext = b"Hello, AlgoChat!";

        let envelope = standard::seal(plaintext, &a.public_key, &b.public_key).unwrap();
        let wire = envelope.encode();
        assert!(is_chat_message(&wire));
        assert!(!is_psk_message(&wire));

        let decoded = StandardEnvelope::decode(&wire).unwrap();

        let opened_by_b = standard::open(&decoded, &b.private_key, &b.public_key).unwrap();
        assert_eq!(classify_payload(&opened_by_b), DecryptedPayload::Message {
            text: "Hello, AlgoChat!".to_string(),
            reply_to_id: None,
            reply_to_preview: None,
        });

        let opened_by_a = standard::open(&decoded, &a.private_key, &a.public_key).unwrap();
        assert_eq!(opened_by_a, opened_by_b);
    }

    /// §8 scenario 7: a self-addressed key-publish payload collapses to the
    /// "no message" sentinel, never surfaced as a chat message.
    #[test]
    fn key_publish_self_seal_collapses_to_no_message() {
        let a = IdentityKeyPair::derive(&[0x09; 32]).unwrap();
        let payload = br#"{"type":"key-publish"}"#;

        let envelope = standard::seal(payload, &a.public_key, &a.public_key).unwrap();
        let opened = standard::open(&envelope, &a.private_key, &a.public_key).unwrap();

        assert_eq!(classify_payload(&opened), DecryptedPayload::NoMessage);
    }
}
