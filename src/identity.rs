//! Long-lived identity key pairs and per-message ephemeral key pairs.
//!
//! An identity is derived deterministically from the 32-byte ledger account
//! seed; an ephemeral pair is generated fresh for every sealed envelope and
//! never persisted past the call that produced it.

use std::fmt;

use crate::error::AlgoChatError;
use crate::primitives::{random_scalar, x25519_base};

const IDENTITY_SALT: &[u8] = b"AlgoChat-v1-encryption";
const IDENTITY_INFO: &[u8] = b"x25519-key";

/// A long-lived X25519 identity key pair, one per account for its lifetime.
#[derive(Clone)]
pub struct IdentityKeyPair {
    pub private_key: [u8; 32],
    pub public_key: [u8; 32],
}

impl fmt::Debug for IdentityKeyPair {
    /// Never prints `private_key` — only the hex-encoded public key, safe
    /// to land in logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityKeyPair")
            .field("public_key", &hex::encode(self.public_key))
            .field("private_key", &"<redacted>")
            .finish()
    }
}

impl IdentityKeyPair {
    /// Derive the identity key pair from a 32-byte account seed:
    /// `privateKey = HKDF-SHA256(salt="AlgoChat-v1-encryption",
    /// ikm=seed, info="x25519-key", L=32)`, `publicKey = X25519_base(privateKey)`.
    ///
    /// Deterministic: the same seed always yields the same pair.
    pub fn derive(seed: &[u8]) -> Result<Self, AlgoChatError> {
        if seed.len() != 32 {
            return Err(AlgoChatError::InvalidKey(format!(
                "seed must be 32 bytes, got {}",
                seed.len()
            )));
        }
        let private_key = crate::primitives::hkdf_sha256_32(IDENTITY_SALT, seed, IDENTITY_INFO);
        let public_key = x25519_base(&private_key);
        Ok(IdentityKeyPair {
            private_key,
            public_key,
        })
    }
}

/// A freshly generated, single-use X25519 key pair. The private scalar is
/// meant to be discarded immediately after the envelope it seals is built —
/// callers should not store `EphemeralKeyPair` beyond a single `seal` call.
pub struct EphemeralKeyPair {
    pub private_key: [u8; 32],
    pub public_key: [u8; 32],
}

impl EphemeralKeyPair {
    /// Generate a fresh, independent ephemeral pair. Each call draws new
    /// randomness from the OS CSPRNG; two calls never produce the same
    /// public key (overwhelming probability).
    pub fn generate() -> Self {
        let private_key = random_scalar();
        let public_key = x25519_base(&private_key);
        EphemeralKeyPair {
            private_key,
            public_key,
        }
    }
}
