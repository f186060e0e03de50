//! Key discovery: scan a supplied transaction list for a target address's
//! X25519 public key, either from a signed self-announcement or from the
//! sender key embedded in a Standard envelope.

use log::debug;

use crate::announcement::{parse_announcement, DiscoveredKey};
use crate::chain::NoteTransaction;
use crate::envelope::{is_chat_message, StandardEnvelope};
use crate::error::AlgoChatError;

/// Default search depth for the self-announcement strategy (§9: the source
/// carries two different `DEFAULT_SEARCH_DEPTH` constants; this crate keeps
/// both, scoped to the path each one historically applied to).
pub const DEFAULT_ANNOUNCEMENT_SEARCH_DEPTH: usize = 100;
/// Default search depth for the envelope-embedded strategy.
pub const DEFAULT_ENVELOPE_SEARCH_DEPTH: usize = 200;

/// Find `target_address`'s key via a self-addressed announcement
/// transaction (`sender == receiver == target_address`). Returns the first
/// match; transactions that fail to parse are skipped, not fatal.
pub fn discover_from_announcement(
    target_address: &str,
    transactions: &[NoteTransaction],
    ed25519_public_key: Option<&[u8; 32]>,
    search_depth: usize,
) -> Result<DiscoveredKey, AlgoChatError> {
    let scanned = transactions.iter().take(search_depth);
    for txn in scanned {
        if txn.sender != target_address || txn.receiver != target_address {
            continue;
        }
        if let Some(key) = parse_announcement(&txn.note, ed25519_public_key) {
            return Ok(key);
        }
    }
    debug!(
        "no self-announcement found for {target_address} within {search_depth} transactions"
    );
    Err(AlgoChatError::PublicKeyNotFound {
        address: target_address.to_string(),
        search_depth,
    })
}

/// Find `target_address`'s key by extracting the `senderPublicKey` field
/// from the first Standard envelope it sent. This strategy cannot verify
/// the key — the sender key is asserted by the envelope, not signed — so
/// `is_verified` is always `false`.
pub fn discover_from_messages(
    target_address: &str,
    transactions: &[NoteTransaction],
    search_depth: usize,
) -> Result<DiscoveredKey, AlgoChatError> {
    let scanned = transactions.iter().take(search_depth);
    for txn in scanned {
        if txn.sender != target_address {
            continue;
        }
        if !is_chat_message(&txn.note) {
            continue;
        }
        let Ok(envelope) = StandardEnvelope::decode(&txn.note) else {
            continue;
        };
        return Ok(DiscoveredKey {
            public_key: envelope.sender_public_key,
            is_verified: false,
        });
    }
    debug!(
        "no envelope-embedded key found for {target_address} within {search_depth} transactions"
    );
    Err(AlgoChatError::PublicKeyNotFound {
        address: target_address.to_string(),
        search_depth,
    })
}
