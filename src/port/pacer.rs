//! Pacing port: the fixed wait between consecutive upstream batch calls.

use std::time::Duration;

use async_trait::async_trait;

/// A single pacing pause.
///
/// The upstream's rate limit is not formally documented, so the production
/// implementation is a conservative fixed delay rather than an adaptive
/// scheme. Injected as a trait so tests run without wall-clock waits.
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Wait out one inter-batch pause.
    async fn pause(&self);
}

/// Production pacer backed by `tokio::time::sleep`.
#[derive(Debug, Clone)]
pub struct IntervalPacer {
    delay: Duration,
}

impl IntervalPacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Pacer for IntervalPacer {
    async fn pause(&self) {
        tokio::time::sleep(self.delay).await;
    }
}
