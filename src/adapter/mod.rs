//! Adapters binding the ports to the outside world: the BoardGameGeek
//! XML API client and the HTTP request surface.

mod bgg;
mod http;

pub use bgg::BggClient;
pub use http::{router, INVALID_IDS_MESSAGE};
