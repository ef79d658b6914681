//! Deterministic test doubles for the pipeline's ports.
//!
//! - [`ScriptedFetcher`]: pre-loaded per-call results plus recorded call
//!   arguments. Best for batch planning, pacing, and failure-path tests.
//! - [`ManualPacer`]: counts pauses and returns immediately, so paced
//!   tests run without wall-clock waits.
//! - [`HangingPacer`]: a pause that never completes, for cancellation
//!   tests.
//! - [`FixedClock`]: a settable clock for aging cache entries.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::domain::{GameId, GameRecord, PlayerCountSet};
use crate::error::Result;
use crate::port::{Clock, GameFetcher, Pacer};

/// Build a [`GameRecord`] from plain values.
pub fn record(id: u64, best_with: &[u8], recommended_with: &[u8], year: &str) -> GameRecord {
    GameRecord {
        id: GameId::new(id),
        best_with: best_with.iter().copied().collect::<PlayerCountSet>(),
        recommended_with: recommended_with.iter().copied().collect::<PlayerCountSet>(),
        published_year: year.to_string(),
    }
}

/// A fetcher with scripted per-call results and recorded arguments.
///
/// Each `fetch` pops the next scripted result (defaults to `Ok(vec![])`
/// when exhausted) and records the ids it was asked for.
#[derive(Default)]
pub struct ScriptedFetcher {
    results: Mutex<VecDeque<Result<Vec<GameRecord>>>>,
    calls: Mutex<Vec<Vec<GameId>>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful fetch result.
    pub fn push_records(&self, records: Vec<GameRecord>) {
        self.results.lock().push_back(Ok(records));
    }

    /// Queue a failing fetch.
    pub fn push_error(&self, error: crate::error::Error) {
        self.results.lock().push_back(Err(error));
    }

    /// Number of `fetch` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// The exact id groups passed to each `fetch` call, in order.
    pub fn calls(&self) -> Vec<Vec<GameId>> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl GameFetcher for ScriptedFetcher {
    async fn fetch(&self, ids: &[GameId]) -> Result<Vec<GameRecord>> {
        self.calls.lock().push(ids.to_vec());
        self.results.lock().pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    fn upstream_name(&self) -> &'static str {
        "scripted"
    }
}

/// A pacer that never waits but counts how often it was asked to.
#[derive(Default)]
pub struct ManualPacer {
    pauses: AtomicUsize,
}

impl ManualPacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pause_count(&self) -> usize {
        self.pauses.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Pacer for ManualPacer {
    async fn pause(&self) {
        self.pauses.fetch_add(1, Ordering::SeqCst);
    }
}

/// A pacer whose pause never completes.
///
/// A run parked on this pause can only make progress through cooperative
/// cancellation, which is exactly what cancellation tests want to observe.
#[derive(Default)]
pub struct HangingPacer;

#[async_trait]
impl Pacer for HangingPacer {
    async fn pause(&self) {
        std::future::pending::<()>().await;
    }
}

/// A clock whose time only moves when a test advances it.
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}
