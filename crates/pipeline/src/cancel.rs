use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag asking an in-flight frame to stop.
///
/// Clones observe the same flag, so the thread that receives a newer frame
/// can cancel the one still being processed elsewhere.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Clear the flag so the token can be reused for the next frame.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Release);
    }
}
