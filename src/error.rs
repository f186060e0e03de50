//! Structured error taxonomy for the AlgoChat protocol engine.
//!
//! Cryptographic and envelope errors are never retryable: they signal a
//! corrupt message, a wrong key, or a protocol mismatch. A subset raised by
//! external collaborators (network, indexer, confirmation-timeout) is
//! retryable; see [`AlgoChatError::is_retryable`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlgoChatError {
    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("invalid envelope: {0}")]
    InvalidEnvelope(String),

    #[error("decryption failed")]
    DecryptionFailed,

    #[error("message too large: {actual} bytes exceeds the {max}-byte limit")]
    MessageTooLarge { actual: usize, max: usize },

    #[error("no public key found for {address} after searching {search_depth} transactions")]
    PublicKeyNotFound { address: String, search_depth: usize },

    #[error("invalid PSK length: expected 32 bytes, got {0}")]
    PSKInvalidLength(usize),

    #[error("invalid PSK ratchet counter: {0}")]
    PSKInvalidCounter(String),

    #[error("invalid PSK exchange URI: {0}")]
    PSKExchangeURIInvalid(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("indexer error: {0}")]
    Indexer(String),

    #[error("timed out waiting for confirmation of {0}")]
    ConfirmationTimeout(String),
}

impl AlgoChatError {
    /// Whether the caller may reasonably retry the operation that produced
    /// this error. Cryptographic and envelope errors are never retryable —
    /// retrying a corrupt ciphertext or a wrong key cannot succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AlgoChatError::Network(_)
                | AlgoChatError::Indexer(_)
                | AlgoChatError::ConfirmationTimeout(_)
        )
    }
}
