//! The paced lookup pipeline: cache consultation, batch planning, and the
//! rate-paced sequential upstream drive.
//!
//! A run partitions the requested ids into cache hits and misses, emits the
//! hits immediately, then fetches the misses batch by batch with a pacing
//! pause between consecutive batches. Results stream to the consumer as
//! they become available; a consumer that stops reading is observed before
//! the next upstream call is issued.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::cache::PlayerCountCache;
use crate::domain::{CacheEntry, GameId, PlayerCounts, TtlPolicy};
use crate::error::Result;
use crate::port::{Clock, GameFetcher, Pacer};

/// Default upstream-imposed cap on ids per call.
pub const DEFAULT_BATCH_SIZE: usize = 20;

const STREAM_BUFFER: usize = 32;

/// Split an ordered sequence of miss-ids into ordered groups of at most
/// `cap` ids. The concatenation of all groups equals the input exactly:
/// no reordering, no drops, no dedup. A zero cap is treated as one.
pub fn plan_batches(ids: &[GameId], cap: usize) -> Vec<Vec<GameId>> {
    ids.chunks(cap.max(1)).map(<[GameId]>::to_vec).collect()
}

/// A finite, pull-based sequence of lookup results.
///
/// Not restartable. Dropping the stream before it is exhausted cancels the
/// producing run cooperatively: no further upstream calls are scheduled and
/// a pending pacing pause is released promptly.
pub struct LookupStream {
    rx: mpsc::Receiver<Result<PlayerCounts>>,
}

impl LookupStream {
    /// Next result, or `None` once the run is complete.
    ///
    /// An `Err` item is terminal: the run has aborted and yields nothing
    /// further. Items received before the error remain delivered.
    pub async fn next(&mut self) -> Option<Result<PlayerCounts>> {
        self.rx.recv().await
    }
}

/// Orchestrates lookups against the cache and the paced upstream fetcher.
///
/// Cheap to share: runs started from clones operate on the same cache.
/// Concurrent runs are independent; the cache is the only shared mutable
/// resource. Two runs that both miss the same id will both fetch it;
/// last write wins, which is correct if wasteful.
#[derive(Clone)]
pub struct LookupPipeline {
    cache: Arc<PlayerCountCache>,
    fetcher: Arc<dyn GameFetcher>,
    pacer: Arc<dyn Pacer>,
    clock: Arc<dyn Clock>,
    ttl: TtlPolicy,
    batch_size: usize,
}

impl LookupPipeline {
    pub fn new(
        cache: Arc<PlayerCountCache>,
        fetcher: Arc<dyn GameFetcher>,
        pacer: Arc<dyn Pacer>,
        clock: Arc<dyn Clock>,
        ttl: TtlPolicy,
        batch_size: usize,
    ) -> Self {
        Self {
            cache,
            fetcher,
            pacer,
            clock,
            ttl,
            batch_size: batch_size.max(1),
        }
    }

    /// Start a run for the given resolved ids and stream its results.
    ///
    /// Cache hits are emitted first, then freshly fetched records batch by
    /// batch in upstream-returned order.
    pub fn stream(&self, ids: Vec<GameId>) -> LookupStream {
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let pipeline = self.clone();
        tokio::spawn(async move {
            pipeline.run(ids, tx).await;
        });
        LookupStream { rx }
    }

    /// Run a lookup to completion and collect the merged result.
    ///
    /// Fails with the first structural upstream error; use
    /// [`stream`](Self::stream) when partially delivered results matter.
    pub async fn lookup(&self, ids: Vec<GameId>) -> Result<Vec<PlayerCounts>> {
        let mut stream = self.stream(ids);
        let mut results = Vec::new();
        while let Some(item) = stream.next().await {
            results.push(item?);
        }
        Ok(results)
    }

    async fn run(self, ids: Vec<GameId>, tx: mpsc::Sender<Result<PlayerCounts>>) {
        // One expiry-aware pass: hits stream out immediately, misses keep
        // their input order (duplicates included) for batch planning.
        let mut misses = Vec::new();
        for id in ids {
            match self.cache.get(id) {
                Some(entry) => {
                    if tx.send(Ok(entry.counts())).await.is_err() {
                        return;
                    }
                }
                None => misses.push(id),
            }
        }

        if misses.is_empty() {
            return;
        }

        let batches = plan_batches(&misses, self.batch_size);
        debug!(
            misses = misses.len(),
            batches = batches.len(),
            upstream = self.fetcher.upstream_name(),
            "fetching cache misses"
        );

        let last = batches.len() - 1;
        for (index, batch) in batches.iter().enumerate() {
            if tx.is_closed() {
                debug!("consumer gone, stopping before next upstream call");
                return;
            }

            let records = match self.fetcher.fetch(batch).await {
                Ok(records) => records,
                Err(error) => {
                    warn!(%error, "upstream batch failed, aborting run");
                    let _ = tx.send(Err(error)).await;
                    return;
                }
            };

            for record in records {
                let entry = CacheEntry::from_record(record, &self.ttl, self.clock.now());
                let counts = entry.counts();
                self.cache.put(entry);
                if tx.send(Ok(counts)).await.is_err() {
                    return;
                }
            }

            // pacing applies between batches only, never after the last
            if index != last {
                tokio::select! {
                    () = self.pacer.pause() => {}
                    () = tx.closed() => {
                        debug!("consumer gone, releasing pacing pause");
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[u64]) -> Vec<GameId> {
        values.iter().copied().map(GameId::new).collect()
    }

    #[test]
    fn batches_concatenate_to_input() {
        let input = ids(&[5, 3, 5, 1, 2, 8, 13]);
        for cap in 1..=8 {
            let batches = plan_batches(&input, cap);
            assert!(batches.iter().all(|batch| batch.len() <= cap));
            let rejoined: Vec<GameId> = batches.into_iter().flatten().collect();
            assert_eq!(rejoined, input);
        }
    }

    #[test]
    fn exact_multiple_splits_evenly() {
        let batches = plan_batches(&ids(&[1, 2, 3, 4]), 2);
        assert_eq!(batches, vec![ids(&[1, 2]), ids(&[3, 4])]);
    }

    #[test]
    fn empty_input_plans_no_batches() {
        assert!(plan_batches(&[], 20).is_empty());
    }

    #[test]
    fn zero_cap_is_treated_as_one() {
        let batches = plan_batches(&ids(&[1, 2]), 0);
        assert_eq!(batches, vec![ids(&[1]), ids(&[2])]);
    }
}
