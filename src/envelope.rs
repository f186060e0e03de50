//! Bit-exact wire codecs for the two envelope formats.
//!
//! Standard (protocolId = 1): VERSION[1] | PROTOCOL[1] | SENDER_PK[32] |
//! EPHEMERAL_PK[32] | NONCE[12] | ENCRYPTED_SENDER_KEY[48] | CIPHERTEXT‖TAG.
//!
//! PSK (protocolId = 2): same shape with a 4-byte big-endian ratchet counter
//! inserted after the protocol byte; every following field shifts by 4.

use crate::error::AlgoChatError;
use crate::primitives::{AEAD_TAG_LEN, KEY_LEN, NONCE_LEN};

pub const VERSION: u8 = 0x01;
pub const PROTOCOL_STANDARD: u8 = 0x01;
pub const PROTOCOL_PSK: u8 = 0x02;

const ENCRYPTED_SENDER_KEY_LEN: usize = KEY_LEN + AEAD_TAG_LEN; // 48
pub const STANDARD_HEADER_LEN: usize = 126;
pub const PSK_HEADER_LEN: usize = 130;

/// Decoded v1 Standard envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardEnvelope {
    pub sender_public_key: [u8; 32],
    pub ephemeral_public_key: [u8; 32],
    pub nonce: [u8; NONCE_LEN],
    pub encrypted_sender_key: Vec<u8>,
    pub ciphertext: Vec<u8>,
}

impl StandardEnvelope {
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(STANDARD_HEADER_LEN + self.ciphertext.len());
        out.push(VERSION);
        out.push(PROTOCOL_STANDARD);
        out.extend_from_slice(&self.sender_public_key);
        out.extend_from_slice(&self.ephemeral_public_key);
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.encrypted_sender_key);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    pub fn decode(data: &[u8]) -> Result<Self, AlgoChatError> {
        if data.len() < 2 {
            return Err(AlgoChatError::InvalidEnvelope("envelope shorter than header".into()));
        }
        if data[0] != VERSION {
            return Err(AlgoChatError::InvalidEnvelope(format!(
                "unsupported version {}",
                data[0]
            )));
        }
        if data[1] != PROTOCOL_STANDARD {
            return Err(AlgoChatError::InvalidEnvelope(format!(
                "unexpected protocol id {}",
                data[1]
            )));
        }
        if data.len() < STANDARD_HEADER_LEN + AEAD_TAG_LEN {
            return Err(AlgoChatError::InvalidEnvelope(
                "envelope too short for header and AEAD tag".into(),
            ));
        }

        let mut sender_public_key = [0u8; 32];
        sender_public_key.copy_from_slice(&data[2..34]);
        let mut ephemeral_public_key = [0u8; 32];
        ephemeral_public_key.copy_from_slice(&data[34..66]);
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&data[66..78]);
        let encrypted_sender_key = data[78..78 + ENCRYPTED_SENDER_KEY_LEN].to_vec();
        let ciphertext = data[STANDARD_HEADER_LEN..].to_vec();

        Ok(StandardEnvelope {
            sender_public_key,
            ephemeral_public_key,
            nonce,
            encrypted_sender_key,
            ciphertext,
        })
    }
}

/// Decoded v1.1 PSK envelope. Same shape as [`StandardEnvelope`] plus the
/// ratchet counter that selects the per-message PSK (see [`crate::ratchet`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PSKEnvelope {
    pub ratchet_counter: u32,
    pub sender_public_key: [u8; 32],
    pub ephemeral_public_key: [u8; 32],
    pub nonce: [u8; NONCE_LEN],
    pub encrypted_sender_key: Vec<u8>,
    pub ciphertext: Vec<u8>,
}

impl PSKEnvelope {
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(PSK_HEADER_LEN + self.ciphertext.len());
        out.push(VERSION);
        out.push(PROTOCOL_PSK);
        out.extend_from_slice(&self.ratchet_counter.to_be_bytes());
        out.extend_from_slice(&self.sender_public_key);
        out.extend_from_slice(&self.ephemeral_public_key);
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.encrypted_sender_key);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    pub fn decode(data: &[u8]) -> Result<Self, AlgoChatError> {
        if data.len() < 2 {
            return Err(AlgoChatError::InvalidEnvelope("envelope shorter than header".into()));
        }
        if data[0] != VERSION {
            return Err(AlgoChatError::InvalidEnvelope(format!(
                "unsupported version {}",
                data[0]
            )));
        }
        if data[1] != PROTOCOL_PSK {
            return Err(AlgoChatError::InvalidEnvelope(format!(
                "unexpected protocol id {}",
                data[1]
            )));
        }
        if data.len() < PSK_HEADER_LEN + AEAD_TAG_LEN {
            return Err(AlgoChatError::InvalidEnvelope(
                "envelope too short for header and AEAD tag".into(),
            ));
        }

        let ratchet_counter = u32::from_be_bytes(data[2..6].try_into().unwrap());
        let mut sender_public_key = [0u8; 32];
        sender_public_key.copy_from_slice(&data[6..38]);
        let mut ephemeral_public_key = [0u8; 32];
        ephemeral_public_key.copy_from_slice(&data[38..70]);
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&data[70..82]);
        let encrypted_sender_key = data[82..82 + ENCRYPTED_SENDER_KEY_LEN].to_vec();
        let ciphertext = data[PSK_HEADER_LEN..].to_vec();

        Ok(PSKEnvelope {
            ratchet_counter,
            sender_public_key,
            ephemeral_public_key,
            nonce,
            encrypted_sender_key,
            ciphertext,
        })
    }
}

/// `true` iff `data` looks like a v1 Standard envelope (version/protocol
/// bytes only — use [`StandardEnvelope::decode`] to fully validate).
pub fn is_chat_message(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == VERSION && data[1] == PROTOCOL_STANDARD
}

/// `true` iff `data` looks like a v1.1 PSK envelope.
pub fn is_psk_message(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == VERSION && data[1] == PROTOCOL_PSK
}
