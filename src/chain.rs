//! External collaborator interfaces (§6).
//!
//! The core never submits or indexes ledger transactions itself — it only
//! produces/consumes note bytes and receives already-parsed transaction
//! records through these traits. No implementation ships in this crate;
//! a concrete binary links an indexer/wallet SDK against `ChainClient` and
//! a storage backend against the others.

use crate::error::AlgoChatError;

/// Ledger-suggested transaction parameters, as returned ahead of signing.
#[derive(Debug, Clone)]
pub struct SuggestedParams {
    pub fee: u64,
    pub min_fee: u64,
    pub first_valid: u64,
    pub last_valid: u64,
    pub genesis_id: String,
    pub genesis_hash: Vec<u8>,
}

/// A confirmed (or pending) transaction carrying a note, as read back from
/// the ledger.
#[derive(Debug, Clone)]
pub struct NoteTransaction {
    pub txid: String,
    pub sender: String,
    pub receiver: String,
    pub note: Vec<u8>,
    pub confirmed_round: Option<u64>,
    pub round_time: Option<u64>,
}

/// Already-signed transaction bytes ready for submission.
pub type SignedTransaction = Vec<u8>;

/// The ledger submission/indexing collaborator. Out of scope per §1 — the
/// core only calls through this trait, it never implements it.
pub trait ChainClient {
    fn suggested_params(&self) -> Result<SuggestedParams, AlgoChatError>;
    fn submit(&self, signed_txn: &SignedTransaction) -> Result<String, AlgoChatError>;
    fn search_transactions(
        &self,
        address: &str,
        after_round: Option<u64>,
        limit: Option<usize>,
    ) -> Result<Vec<NoteTransaction>, AlgoChatError>;
    fn search_transactions_between(
        &self,
        a: &str,
        b: &str,
        after_round: Option<u64>,
        limit: Option<usize>,
    ) -> Result<Vec<NoteTransaction>, AlgoChatError>;
    fn lookup_transaction(&self, txid: &str) -> Result<NoteTransaction, AlgoChatError>;
}

/// Idempotent per-participant transaction cache, keyed by `txid`.
pub trait MessageCache {
    fn insert(&mut self, participant: &str, txn: &NoteTransaction) -> Result<(), AlgoChatError>;
    fn get_last_sync_round(&self, participant: &str) -> Result<Option<u64>, AlgoChatError>;
    fn set_last_sync_round(&mut self, participant: &str, round: u64) -> Result<(), AlgoChatError>;
    fn clear(&mut self, participant: &str) -> Result<(), AlgoChatError>;
}

/// At-rest storage for private keys, keyed by ledger address.
///
/// A reference implementation should encrypt at rest with a
/// password-derived key: PBKDF2-SHA256 with at least 100,000 iterations, a
/// unique 32-byte salt per file, AES-256-GCM with a 12-byte nonce and
/// 16-byte tag. This crate does not implement that — it has no use for
/// `pbkdf2`/`aes-gcm` until a concrete storage backend needs them.
pub trait EncryptionKeyStorage {
    fn store(&mut self, address: &str, private_key: &[u8; 32]) -> Result<(), AlgoChatError>;
    fn retrieve(&self, address: &str) -> Result<Option<[u8; 32]>, AlgoChatError>;
    fn has(&self, address: &str) -> Result<bool, AlgoChatError>;
    fn delete(&mut self, address: &str) -> Result<(), AlgoChatError>;
    fn list(&self) -> Result<Vec<String>, AlgoChatError>;
}

/// An ordered queue of messages pending submission, persisted across
/// restarts so an offline-retry scheduler (outside this crate) can resume.
pub trait SendQueueStorage {
    fn load(&self) -> Result<Vec<Vec<u8>>, AlgoChatError>;
    fn save(&mut self, queue: &[Vec<u8>]) -> Result<(), AlgoChatError>;
    fn clear(&mut self) -> Result<(), AlgoChatError>;
}
