//! Random session-id generation.
//!
//! Ids come from the operating system's secure random source. If that
//! source is unavailable (some sandboxes and embedded targets), we fall
//! back to a small non-cryptographic generator seeded from the clock.
//! The fallback is weaker and must never be used for anything secret;
//! it is acceptable here only because a session id is a 24-bit
//! collision-avoidance tag, not a credential.
//!
//! Both paths are safe to call from many threads at once: `OsRng` holds
//! no state, and the fallback builds a fresh generator per call.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::{OsRng, SmallRng};
use rand::{Rng, SeedableRng, TryRngCore};

use crate::SessionId;

/// Generates a fresh random session id.
pub fn random_session_id() -> SessionId {
    match OsRng.try_next_u32() {
        Ok(bits) => SessionId::from(bits),
        Err(e) => {
            tracing::warn!(
                error = %e,
                "secure random source unavailable, using weak fallback for session id"
            );
            fallback_session_id()
        }
    }
}

/// Non-cryptographic fallback. A per-process counter is mixed into the
/// seed so calls landing on the same clock tick still differ.
fn fallback_session_id() -> SessionId {
    static CALLS: AtomicU64 = AtomicU64::new(0);

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    let call = CALLS.fetch_add(1, Ordering::Relaxed);

    let mut rng = SmallRng::seed_from_u64(nanos ^ call.rotate_left(32));
    SessionId::new(rng.random::<u64>())
}
