//! Clock used for the optimizer's wall-clock limit; `web-time` on wasm.

#[cfg(not(target_family = "wasm"))]
pub use std::time::{Duration, Instant};

#[cfg(target_family = "wasm")]
pub use web_time::{Duration, Instant};

/// Deadline check polled once per iteration
#[derive(Debug, Clone, Copy)]
pub(crate) struct Deadline {
    start: Instant,
    limit: Duration,
}

impl Deadline {
    pub(crate) fn new(limit: Duration) -> Self {
        Self {
            start: Instant::now(),
            limit,
        }
    }

    pub(crate) fn expired(&self) -> bool {
        Instant::now().duration_since(self.start) >= self.limit
    }
}
