//! Upstream fetcher port.

use async_trait::async_trait;

use crate::domain::{GameId, GameRecord};
use crate::error::Result;

/// Fetches decoded game records from the upstream data source.
///
/// One call is one upstream round trip. A call may legitimately return
/// fewer records than ids requested: an unknown id or a response the
/// upstream side could not decode yields a smaller result, not an error.
/// An `Err` means the call failed structurally (transport, status) and the
/// caller must treat the whole batch as failed.
///
/// Callers must never pass more ids than the upstream per-call cap; batch
/// planning happens before this port is reached.
#[async_trait]
pub trait GameFetcher: Send + Sync {
    /// Fetch records for the given ordered group of ids.
    async fn fetch(&self, ids: &[GameId]) -> Result<Vec<GameRecord>>;

    /// Short upstream name for logging.
    fn upstream_name(&self) -> &'static str;
}
