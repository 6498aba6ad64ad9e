// ABOUTME: Id allocation for toasts, owned by each store instance
// Ids combine a millisecond wall-clock stamp with a strictly increasing counter

use crate::models::ToastId;
use chrono::Utc;

#[derive(Debug, Default)]
pub struct IdAllocator {
    counter: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id, unique for the lifetime of this allocator even within the same millisecond.
    pub fn next_id(&mut self) -> ToastId {
        self.counter += 1;
        ToastId::new(format!("toast-{}-{}", Utc::now().timestamp_millis(), self.counter))
    }

    #[cfg(test)]
    pub fn issued(&self) -> u64 {
        self.counter
    }
}
