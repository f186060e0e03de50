//! Two-level PSK ratchet: `initialPSK` → session PSK → per-counter PSK.
//!
//! A session spans [`SESSION_SIZE`] consecutive counters and shares one
//! intermediate `sessionPSK`; within a session, `positionPSK` is derived
//! from the position alone. Both stages are plain HKDF-SHA256 — there is no
//! chaining beyond what HKDF already provides.

use crate::primitives::hkdf_sha256_32;

/// Number of consecutive ratchet counters sharing one session PSK.
pub const SESSION_SIZE: u32 = 100;

const SESSION_SALT: &[u8] = b"AlgoChat-PSK-Session";
const POSITION_SALT: &[u8] = b"AlgoChat-PSK-Position";

/// `sessionPSK = HKDF(salt="AlgoChat-PSK-Session", ikm=initialPSK, info=BE32(sessionIndex), L=32)`.
pub fn derive_session_psk(initial_psk: &[u8; 32], session_index: u32) -> [u8; 32] {
    hkdf_sha256_32(SESSION_SALT, initial_psk, &session_index.to_be_bytes())
}

/// `positionPSK = HKDF(salt="AlgoChat-PSK-Position", ikm=sessionPSK, info=BE32(position), L=32)`.
pub fn derive_position_psk(session_psk: &[u8; 32], position: u32) -> [u8; 32] {
    hkdf_sha256_32(POSITION_SALT, session_psk, &position.to_be_bytes())
}

/// Derive the per-message PSK for ratchet counter `n`:
/// `sessionIndex = n / SESSION_SIZE`, `position = n % SESSION_SIZE`.
pub fn derive_psk_at_counter(initial_psk: &[u8; 32], counter: u32) -> [u8; 32] {
    let session_index = counter / SESSION_SIZE;
    let position = counter % SESSION_SIZE;
    let session_psk = derive_session_psk(initial_psk, session_index);
    derive_position_psk(&session_psk, position)
}
