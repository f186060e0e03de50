//! v1.1 PSK seal/open — the Standard flow hybridized with a ratcheted
//! pre-shared key. The ECDH shared secret and the current PSK are
//! concatenated as HKDF IKM; they are never mixed any other way (no XOR).

use crate::envelope::PSKEnvelope;
use crate::error::AlgoChatError;
use crate::identity::EphemeralKeyPair;
use crate::primitives::{aead_open, aead_seal, ct_eq, hkdf_sha256_32, random_nonce, x25519_dh};

/// Maximum UTF-8 plaintext size for the PSK envelope: note cap (1024) −
/// header (130) − AEAD tag (16).
pub const MAX_PAYLOAD: usize = 878;

const INFO_MESSAGE_KEY: &[u8] = b"AlgoChatV1-PSK";
const INFO_SENDER_KEY: &[u8] = b"AlgoChatV1-PSK-SenderKey";

/// Seal `plaintext` under the hybrid ECDH+PSK scheme. The caller supplies
/// `current_psk` and the `ratchet_counter` that produced it (see
/// [`crate::ratchet::derive_psk_at_counter`]); both are written into the
/// envelope header and re-derived independently on decrypt.
pub fn seal(
    plaintext: &[u8],
    sender_public_key: &[u8; 32],
    recipient_public_key: &[u8; 32],
    current_psk: &[u8; 32],
    ratchet_counter: u32,
) -> Result<PSKEnvelope, AlgoChatError> {
    if plaintext.len() > MAX_PAYLOAD {
        return Err(AlgoChatError::MessageTooLarge {
            actual: plaintext.len(),
            max: MAX_PAYLOAD,
        });
    }

    let ephemeral = EphemeralKeyPair::generate();

    let recipient_secret = x25519_dh(&ephemeral.private_key, recipient_public_key);
    let message_ikm = hybrid_ikm(&recipient_secret, current_psk);
    let mut message_info = Vec::with_capacity(INFO_MESSAGE_KEY.len() + 64);
    message_info.extend_from_slice(INFO_MESSAGE_KEY);
    message_info.extend_from_slice(sender_public_key);
    message_info.extend_from_slice(recipient_public_key);
    let sym_key = hkdf_sha256_32(&ephemeral.public_key, &message_ikm, &message_info);

    let nonce = random_nonce();
    let ciphertext = aead_seal(&sym_key, &nonce, plaintext);

    let sender_secret = x25519_dh(&ephemeral.private_key, sender_public_key);
    let sender_ikm = hybrid_ikm(&sender_secret, current_psk);
    let mut sender_info = Vec::with_capacity(INFO_SENDER_KEY.len() + 32);
    sender_info.extend_from_slice(INFO_SENDER_KEY);
    sender_info.extend_from_slice(sender_public_key);
    let sender_key = hkdf_sha256_32(&ephemeral.public_key, &sender_ikm, &sender_info);
    let encrypted_sender_key = aead_seal(&sender_key, &nonce, &sym_key);

    Ok(PSKEnvelope {
        ratchet_counter,
        sender_public_key: *sender_public_key,
        ephemeral_public_key: ephemeral.public_key,
        nonce,
        encrypted_sender_key,
        ciphertext,
    })
}

/// Open `envelope` given the PSK that matches its `ratchet_counter` (the
/// caller is expected to have already validated the counter against its
/// [`crate::replay::PSKReplayState`]).
pub fn open(
    envelope: &PSKEnvelope,
    my_private_key: &[u8; 32],
    my_public_key: &[u8; 32],
    psk_at_counter: &[u8; 32],
) -> Result<Vec<u8>, AlgoChatError> {
    let secret = x25519_dh(my_private_key, &envelope.ephemeral_public_key);

    let plaintext = if ct_eq(my_public_key, &envelope.sender_public_key) {
        let sender_ikm = hybrid_ikm(&secret, psk_at_counter);
        let mut sender_info = Vec::with_capacity(INFO_SENDER_KEY.len() + 32);
        sender_info.extend_from_slice(INFO_SENDER_KEY);
        sender_info.extend_from_slice(my_public_key);
        let sender_key = hkdf_sha256_32(&envelope.ephemeral_public_key, &sender_ikm, &sender_info);
        let sym_key_bytes = aead_open(&sender_key, &envelope.nonce, &envelope.encrypted_sender_key)?;
        let sym_key: [u8; 32] = sym_key_bytes
            .as_slice()
            .try_into()
            .map_err(|_| AlgoChatError::DecryptionFailed)?;
        aead_open(&sym_key, &envelope.nonce, &envelope.ciphertext)?
    } else {
        let message_ikm = hybrid_ikm(&secret, psk_at_counter);
        let mut message_info = Vec::with_capacity(INFO_MESSAGE_KEY.len() + 64);
        message_info.extend_from_slice(INFO_MESSAGE_KEY);
        message_info.extend_from_slice(&envelope.sender_public_key);
        message_info.extend_from_slice(my_public_key);
        let sym_key = hkdf_sha256_32(&envelope.ephemeral_public_key, &message_ikm, &message_info);
        aead_open(&sym_key, &envelope.nonce, &envelope.ciphertext)?
    };

    Ok(plaintext)
}

/// Concatenate the ECDH shared secret and the current PSK as HKDF IKM.
/// Per §9, this is the *only* way the two secrets are combined — never XOR.
fn hybrid_ikm(ecdh_secret: &[u8; 32], psk: &[u8; 32]) -> [u8; 64] {
    let mut ikm = [0u8; 64];
    ikm[..32].copy_from_slice(ecdh_secret);
    ikm[32..].copy_from_slice(psk);
    ikm
}
