#![forbid(unsafe_code)]

//! Short unique tokens for element ids and radio group names.
//!
//! Tokens are 32 lowercase hex characters mixed from the wall clock, a
//! process-wide counter and a freshly seeded [`ahash::RandomState`]. They are
//! unique enough to keep label/input pairs of concurrent dialogs apart; they
//! are not a security token.

use std::sync::atomic::{AtomicU64, Ordering};

use web_time::{SystemTime, UNIX_EPOCH};

/// Length of every token produced by [`gen_id`].
pub const TOKEN_LEN: usize = 32;

static TOKEN_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a fresh 32-character lowercase hex token.
#[must_use]
pub fn gen_id() -> String {
    let seq = TOKEN_COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let state = ahash::RandomState::new();
    let hi = state.hash_one((nanos, seq));
    let lo = state.hash_one((seq, nanos, hi));
    format!("{hi:016x}{lo:016x}")
}
