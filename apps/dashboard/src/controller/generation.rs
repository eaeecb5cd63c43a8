use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic request counter. A response may only be rendered if the request
/// that produced it is still the latest one issued.
#[derive(Debug, Default)]
pub struct Generation(AtomicU64);

impl Generation {
    pub fn issue(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, issued: u64) -> bool {
        self.0.load(Ordering::SeqCst) == issued
    }
}
