//! Application wiring and the serve loop.

use std::sync::Arc;

use tracing::info;

use crate::adapter::{router, BggClient};
use crate::cache::PlayerCountCache;
use crate::config::Config;
use crate::error::Result;
use crate::pipeline::LookupPipeline;
use crate::port::{Clock, GameFetcher, IntervalPacer, Pacer, SystemClock};

pub struct App;

impl App {
    /// Wire the pipeline from configuration and serve until the listener
    /// fails or the process is stopped.
    pub async fn run(config: Config) -> Result<()> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let cache = Arc::new(PlayerCountCache::new(config.cache.capacity, clock.clone()));
        let fetcher: Arc<dyn GameFetcher> = Arc::new(BggClient::new(&config.upstream)?);
        let pacer: Arc<dyn Pacer> = Arc::new(IntervalPacer::new(config.upstream.pacing_delay()));

        let pipeline = Arc::new(LookupPipeline::new(
            cache,
            fetcher,
            pacer,
            clock,
            config.cache.ttl_policy(),
            config.upstream.batch_size,
        ));

        let addr = format!("{}:{}", config.server.host, config.server.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!(%addr, "listening");

        axum::serve(listener, router(pipeline)).await?;
        Ok(())
    }
}
