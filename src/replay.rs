//! PSK replay-window state: per-peer counter tracking and a sliding
//! acceptance window.
//!
//! [`PSKReplayState`] is a pure, immutable-style value type — `validate`
//! reads without mutating, `record` returns the next state — so callers can
//! represent history as copy-on-write snapshots if they choose (per §5).
//! [`PeerReplayTracker`] wraps it in a `Mutex` for callers who want a single
//! shared, lock-per-peer handle instead, mirroring the teacher's
//! `Mutex`-guarded shared-state pattern (adapted to `std::sync::Mutex`,
//! since this crate has no async runtime).

use std::collections::BTreeSet;
use std::sync::Mutex;

use crate::error::AlgoChatError;

/// Width of the replay-acceptance window around `peer_last_counter`.
pub const WINDOW: u32 = 200;

/// Per-peer replay-protection and send-counter state.
#[derive(Debug, Clone, Default)]
pub struct PSKReplayState {
    send_counter: u32,
    peer_last_counter: u32,
    seen_counters: BTreeSet<u32>,
}

impl PSKReplayState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send_counter(&self) -> u32 {
        self.send_counter
    }

    pub fn peer_last_counter(&self) -> u32 {
        self.peer_last_counter
    }

    /// `true` iff `counter` has not already been seen and falls within
    /// `[peerLastCounter − WINDOW, peerLastCounter + WINDOW]`.
    pub fn validate(&self, counter: u32) -> bool {
        if self.seen_counters.contains(&counter) {
            return false;
        }
        let lower = self.peer_last_counter.saturating_sub(WINDOW);
        let upper = self.peer_last_counter.saturating_add(WINDOW);
        counter >= lower && counter <= upper
    }

    /// Record `counter` as seen, advance `peerLastCounter` if it is a new
    /// high-water mark, and prune entries that have fallen out of the
    /// window. Does not itself check [`validate`] — callers should validate
    /// before recording.
    pub fn record(&mut self, counter: u32) {
        self.seen_counters.insert(counter);
        self.peer_last_counter = self.peer_last_counter.max(counter);
        let floor = self.peer_last_counter.saturating_sub(WINDOW);
        self.seen_counters = self.seen_counters.split_off(&floor);
    }

    /// Validate then record `counter` in one step, the common call shape
    /// for an inbound PSK message. Returns `PSKInvalidCounter` if `counter`
    /// is outside the window or already seen.
    pub fn validate_and_record(&mut self, counter: u32) -> Result<(), AlgoChatError> {
        if !self.validate(counter) {
            return Err(AlgoChatError::PSKInvalidCounter(format!(
                "counter {counter} is replayed or outside the window around {}",
                self.peer_last_counter
            )));
        }
        self.record(counter);
        Ok(())
    }

    /// Return the current send counter and advance it. Send counters are
    /// independent of the receive-side `peer_last_counter`.
    pub fn advance_send(&mut self) -> u32 {
        let current = self.send_counter;
        self.send_counter += 1;
        current
    }
}

/// Thread-safe, per-peer handle over a [`PSKReplayState`]. Reads that do not
/// mutate may run concurrently elsewhere in the caller's design; this
/// wrapper serializes all access behind one lock per peer, which is
/// sufficient per §5's "single writer model or a per-peer lock" guidance.
#[derive(Debug, Default)]
pub struct PeerReplayTracker {
    state: Mutex<PSKReplayState>,
}

impl PeerReplayTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate_and_record(&self, counter: u32) -> Result<(), AlgoChatError> {
        let mut state = self.state.lock().expect("replay tracker mutex poisoned");
        state.validate_and_record(counter)
    }

    pub fn advance_send(&self) -> u32 {
        let mut state = self.state.lock().expect("replay tracker mutex poisoned");
        state.advance_send()
    }

    pub fn peer_last_counter(&self) -> u32 {
        self.state.lock().expect("replay tracker mutex poisoned").peer_last_counter()
    }
}
