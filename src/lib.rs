//! Tabletally - cached, rate-paced player-count lookups for board games.
//!
//! Answers bulk lookups of recommended player counts for board games
//! identified by numeric ids, sourced from the BoardGameGeek XML API. The
//! upstream caps how many ids fit one call and penalizes callers who
//! request too frequently, so lookups flow through a TTL cache and a
//! batch-planned, rate-paced fetch pipeline.
//!
//! # Architecture
//!
//! - [`domain`] - ids, the canonical player-count set, cache entries and
//!   the publication-year TTL policy
//! - [`port`] - trait seams: the upstream fetcher, the pacer, the clock
//! - [`cache`] - capacity-bounded concurrent cache with lazy expiry
//! - [`pipeline`] - the paced lookup pipeline and its pull-based result
//!   stream
//! - [`adapter`] - BoardGameGeek XML client and the axum request surface
//! - [`config`] - TOML configuration with validation
//! - [`error`] - error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use tabletally::config::Config;
//! use tabletally::app::App;
//!
//! # async fn run() -> tabletally::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! App::run(config).await
//! # }
//! ```

pub mod adapter;
pub mod app;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod pipeline;
pub mod port;

#[cfg(feature = "testkit")]
pub mod testkit;
