//! Key-announcement parsing: a self-addressed transaction note publishes
//! an X25519 public key, optionally signed by the account's Ed25519
//! identity.

use crate::primitives::ed25519_verify;

/// Minimum note length for any recognized announcement.
const BARE_KEY_LEN: usize = 32;
/// Key + 64-byte Ed25519 signature.
const SIGNED_ANNOUNCEMENT_LEN: usize = 32 + 64;

/// A discovered X25519 public key and whether it carried a valid signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredKey {
    pub public_key: [u8; 32],
    pub is_verified: bool,
}

/// Parse a key-announcement note.
///
/// - `len < 32` → `None`.
/// - `len >= 96` and `ed25519_public_key` is supplied: verify the trailing
///   64-byte signature over the leading 32-byte key; any malformed input
///   collapses to `is_verified = false` rather than an error.
/// - Otherwise (`32 <= len < 96`, or no verifying key supplied): return the
///   bare key, unverified.
pub fn parse_announcement(note: &[u8], ed25519_public_key: Option<&[u8; 32]>) -> Option<DiscoveredKey> {
    if note.len() < BARE_KEY_LEN {
        return None;
    }

    let mut public_key = [0u8; 32];
    public_key.copy_from_slice(&note[..32]);

    if note.len() >= SIGNED_ANNOUNCEMENT_LEN {
        if let Some(verifier) = ed25519_public_key {
            let mut signature = [0u8; 64];
            signature.copy_from_slice(&note[32..96]);
            let is_verified = ed25519_verify(verifier, &public_key, &signature);
            return Some(DiscoveredKey {
                public_key,
                is_verified,
            });
        }
    }

    Some(DiscoveredKey {
        public_key,
        is_verified: false,
    })
}
