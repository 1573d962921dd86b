use std::sync::atomic::{AtomicU64, Ordering};

// One process-wide counter covers colors, freezes, and scenes. Ids exist for
// list-diffing and record lookup; they carry no domain meaning.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Returns a fresh process-unique identifier.
pub fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Raises the counter floor so fresh ids never collide with identifiers
/// loaded from a persisted snapshot.
pub fn ensure_above(floor: u64) {
    NEXT_ID.fetch_max(floor.saturating_add(1), Ordering::Relaxed);
}
