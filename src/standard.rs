//! v1 Standard seal/open — bidirectional authenticated encryption without a
//! session handshake.
//!
//! The `encryptedSenderKey` field lets the sender recover her own plaintext
//! later without storing a second ciphertext: she wraps the message key
//! under a key only she (via her identity secret and the envelope's
//! ephemeral public key) can reconstruct.

use crate::envelope::StandardEnvelope;
use crate::error::AlgoChatError;
use crate::identity::EphemeralKeyPair;
use crate::primitives::{aead_open, aead_seal, ct_eq, hkdf_sha256_32, random_nonce, x25519_dh};

/// Maximum UTF-8 plaintext size for the Standard envelope: note cap (1024) −
/// header (126) − AEAD tag (16).
pub const MAX_PAYLOAD: usize = 882;

const INFO_MESSAGE_KEY: &[u8] = b"AlgoChatV1";
const INFO_SENDER_KEY: &[u8] = b"AlgoChatV1-SenderKey";

/// Seal `plaintext` for `recipient_public_key`, attributed to
/// `sender_public_key` (the caller's own identity public key).
pub fn seal(
    plaintext: &[u8],
    sender_public_key: &[u8; 32],
    recipient_public_key: &[u8; 32],
) -> Result<StandardEnvelope, AlgoChatError> {
    if plaintext.len() > MAX_PAYLOAD {
        return Err(AlgoChatError::MessageTooLarge {
            actual: plaintext.len(),
            max: MAX_PAYLOAD,
        });
    }

    let ephemeral = EphemeralKeyPair::generate();

    let recipient_secret = x25519_dh(&ephemeral.private_key, recipient_public_key);
    let mut message_info = Vec::with_capacity(INFO_MESSAGE_KEY.len() + 64);
    message_info.extend_from_slice(INFO_MESSAGE_KEY);
    message_info.extend_from_slice(sender_public_key);
    message_info.extend_from_slice(recipient_public_key);
    let sym_key = hkdf_sha256_32(&ephemeral.public_key, &recipient_secret, &message_info);

    let nonce = random_nonce();
    let ciphertext = aead_seal(&sym_key, &nonce, plaintext);

    let sender_secret = x25519_dh(&ephemeral.private_key, sender_public_key);
    let mut sender_info = Vec::with_capacity(INFO_SENDER_KEY.len() + 32);
    sender_info.extend_from_slice(INFO_SENDER_KEY);
    sender_info.extend_from_slice(sender_public_key);
    let sender_key = hkdf_sha256_32(&ephemeral.public_key, &sender_secret, &sender_info);
    let encrypted_sender_key = aead_seal(&sender_key, &nonce, &sym_key);

    Ok(StandardEnvelope {
        sender_public_key: *sender_public_key,
        ephemeral_public_key: ephemeral.public_key,
        nonce,
        encrypted_sender_key,
        ciphertext,
    })
}

/// Open `envelope` as either the sender or the recipient, dispatching on
/// whether `my_public_key` matches `envelope.sender_public_key`.
pub fn open(
    envelope: &StandardEnvelope,
    my_private_key: &[u8; 32],
    my_public_key: &[u8; 32],
) -> Result<Vec<u8>, AlgoChatError> {
    let secret = x25519_dh(my_private_key, &envelope.ephemeral_public_key);

    let plaintext = if ct_eq(my_public_key, &envelope.sender_public_key) {
        // Sender path: recover the message key via the wrapped sender key.
        let mut sender_info = Vec::with_capacity(INFO_SENDER_KEY.len() + 32);
        sender_info.extend_from_slice(INFO_SENDER_KEY);
        sender_info.extend_from_slice(my_public_key);
        let sender_key = hkdf_sha256_32(&envelope.ephemeral_public_key, &secret, &sender_info);
        let sym_key_bytes = aead_open(&sender_key, &envelope.nonce, &envelope.encrypted_sender_key)?;
        let sym_key: [u8; 32] = sym_key_bytes
            .as_slice()
            .try_into()
            .map_err(|_| AlgoChatError::DecryptionFailed)?;
        aead_open(&sym_key, &envelope.nonce, &envelope.ciphertext)?
    } else {
        // Recipient path: derive the message key directly.
        let mut message_info = Vec::with_capacity(INFO_MESSAGE_KEY.len() + 64);
        message_info.extend_from_slice(INFO_MESSAGE_KEY);
        message_info.extend_from_slice(&envelope.sender_public_key);
        message_info.extend_from_slice(my_public_key);
        let sym_key = hkdf_sha256_32(&envelope.ephemeral_public_key, &secret, &message_info);
        aead_open(&sym_key, &envelope.nonce, &envelope.ciphertext)?
    };

    Ok(plaintext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::IdentityKeyPair;

    #[test]
    fn seal_open_round_trip_both_paths() {
        let sender = IdentityKeyPair::derive(&[0x01; 32]).unwrap();
        let recipient = IdentityKeyPair::derive(&[0x02; 32]).unwrap();
        let msg = b"Hello, AlgoChat!";

        let envelope = seal(msg, &sender.public_key, &recipient.public_key).unwrap();

        let opened_by_recipient = open(&envelope, &recipient.private_key, &recipient.public_key).unwrap();
        assert_eq!(opened_by_recipient, msg);

        let opened_by_sender = open(&envelope, &sender.private_key, &sender.public_key).unwrap();
        assert_eq!(opened_by_sender, msg);
    }

    #[test]
    fn cross_key_rejection() {
        let sender = IdentityKeyPair::derive(&[0x01; 32]).unwrap();
        let recipient = IdentityKeyPair::derive(&[0x02; 32]).unwrap();
        let stranger = IdentityKeyPair::derive(&[0x03; 32]).unwrap();

        let envelope = seal(b"secret", &sender.public_key, &recipient.public_key).unwrap();
        assert!(open(&envelope, &stranger.private_key, &stranger.public_key).is_err());
    }

    #[test]
    fn oversized_plaintext_rejected_before_any_crypto() {
        let sender = IdentityKeyPair::derive(&[0x01; 32]).unwrap();
        let recipient = IdentityKeyPair::derive(&[0x02; 32]).unwrap();
        let too_big = vec![b'a'; MAX_PAYLOAD + 1];
        let err = seal(&too_big, &sender.public_key, &recipient.public_key).unwrap_err();
        matches!(err, AlgoChatError::MessageTooLarge { .. });
    }

    #[test]
    fn ephemeral_and_nonce_differ_across_seals() {
        let sender = IdentityKeyPair::derive(&[0x01; 32]).unwrap();
        let recipient = IdentityKeyPair::derive(&[0x02; 32]).unwrap();

        let a = seal(b"hi", &sender.public_key, &recipient.public_key).unwrap();
        let b = seal(b"hi", &sender.public_key, &recipient.public_key).unwrap();

        assert_ne!(a.ephemeral_public_key, b.ephemeral_public_key);
        assert_ne!(a.nonce, b.nonce);
    }
}
