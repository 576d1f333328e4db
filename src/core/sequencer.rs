use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out increasing sequence numbers so only the newest request's answer is used.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        RequestSequencer {
            latest: AtomicU64::new(0),
        }
    }

    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    pub fn is_latest(&self, sequence: u64) -> bool {
        self.latest() == sequence
    }
}
