//! HKDF-SHA256, ChaCha20-Poly1305 AEAD, X25519, Ed25519 and CSPRNG helpers
//! shared by every envelope codec in this crate.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};
use hkdf::Hkdf;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use x25519_dalek::{PublicKey as X25519Public, StaticSecret};

use crate::error::AlgoChatError;

/// AEAD nonce length for the wire format in §3 (not the teacher's XChaCha
/// 24-byte nonce — the envelope header fixes this at 12 bytes).
pub const NONCE_LEN: usize = 12;
pub const AEAD_TAG_LEN: usize = 16;
pub const KEY_LEN: usize = 32;

/// HKDF-SHA256 with explicit salt/ikm/info, expanding to exactly `len` bytes.
pub fn hkdf_sha256(salt: &[u8], ikm: &[u8], info: &[u8], len: usize) -> Vec<u8> {
    let hk = Hkdf::<Sha256>::new(Some(salt), ikm);
    let mut out = vec![0u8; len];
    hk.expand(info, &mut out)
        .expect("requested HKDF output length is within RFC 5869 bounds");
    out
}

/// HKDF-SHA256 into a fixed 32-byte buffer — the common case in this crate.
pub fn hkdf_sha256_32(salt: &[u8], ikm: &[u8], info: &[u8]) -> [u8; KEY_LEN] {
    let mut out = [0u8; KEY_LEN];
    out.copy_from_slice(&hkdf_sha256(salt, ikm, info, KEY_LEN));
    out
}

/// X25519 base-point scalar multiplication: `scalar -> public key`.
pub fn x25519_base(scalar: &[u8; 32]) -> [u8; 32] {
    *X25519Public::from(&StaticSecret::from(*scalar)).as_bytes()
}

/// X25519 Diffie-Hellman: `scalar * peer_public -> shared secret`.
pub fn x25519_dh(scalar: &[u8; 32], peer_public: &[u8; 32]) -> [u8; 32] {
    let secret = StaticSecret::from(*scalar);
    let peer = X25519Public::from(*peer_public);
    *secret.diffie_hellman(&peer).as_bytes()
}

/// Seal `plaintext` under `key`/`nonce` with ChaCha20-Poly1305, appending the
/// 16-byte Poly1305 tag.
pub fn aead_seal(key: &[u8; KEY_LEN], nonce: &[u8; NONCE_LEN], plaintext: &[u8]) -> Vec<u8> {
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .expect("ChaCha20-Poly1305 encryption cannot fail for valid key/nonce lengths")
}

/// Open an AEAD ciphertext produced by [`aead_seal`]. Any failure — wrong
/// key, wrong nonce, or a tampered tag — collapses to `DecryptionFailed`.
pub fn aead_open(
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
) -> Result<Vec<u8>, AlgoChatError> {
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| AlgoChatError::DecryptionFailed)
}

/// Fresh CSPRNG nonce, unique per AEAD call.
pub fn random_nonce() -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);
    nonce
}

/// Fresh CSPRNG scalar, used to generate ephemeral X25519 key pairs.
pub fn random_scalar() -> [u8; 32] {
    let mut scalar = [0u8; 32];
    OsRng.fill_bytes(&mut scalar);
    scalar
}

/// Constant-time byte equality, used wherever a public key is compared
/// against a secret-derived value (e.g. dispatching sender vs. recipient
/// decryption paths).
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

/// Verify an Ed25519 signature over `message`, collapsing any malformed
/// input (bad signature length, bad public key encoding) to `false` rather
/// than propagating an error — per §4.I, "any exception collapses to false".
pub fn ed25519_verify(public_key: &[u8; 32], message: &[u8], signature: &[u8; 64]) -> bool {
    use ed25519_dalek::{Signature, VerifyingKey};

    let Ok(vk) = VerifyingKey::from_bytes(public_key) else {
        return false;
    };
    let sig = Signature::from_bytes(signature);
    vk.verify_strict(message, &sig).is_ok()
}

/// Sign `message` with an Ed25519 private key, used by test vectors and by
/// callers constructing key-announcement transactions.
pub fn ed25519_sign(private_key: &[u8; 32], message: &[u8]) -> [u8; 64] {
    use ed25519_dalek::{Signer, SigningKey};

    let sk = SigningKey::from_bytes(private_key);
    sk.sign(message).to_bytes()
}
