//! Fixed delays between sequential upstream requests.

use std::time::Duration;

/// Delay policy for one adapter.
///
/// `page_delay` is slept between pages of one fetch sequence and
/// `sequence_delay` between sequences of a fan-out (one per tag or
/// subreddit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub page_delay: Duration,
    pub sequence_delay: Duration,
}

impl Pacing {
    pub const fn new(page_delay: Duration, sequence_delay: Duration) -> Self {
        Self {
            page_delay,
            sequence_delay,
        }
    }

    /// No delays at all.
    pub const fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub async fn between_pages(&self) {
        sleep_if_nonzero(self.page_delay).await;
    }

    pub async fn between_sequences(&self) {
        sleep_if_nonzero(self.sequence_delay).await;
    }
}

async fn sleep_if_nonzero(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
