//! HTTP request surface.
//!
//! A thin adapter over [`LookupPipeline`]: one route returning the whole
//! merged result as a JSON array, and one streaming newline-delimited JSON
//! in pipeline emission order.

use std::convert::Infallible;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use futures_util::stream::{self, Stream};
use tracing::{error, warn};

use crate::domain::parse_id_list;
use crate::pipeline::{LookupPipeline, LookupStream};

/// Body of the rejection response for a malformed id list.
pub const INVALID_IDS_MESSAGE: &str = "Integers separated by commas expected";

/// Build the application router.
pub fn router(pipeline: Arc<LookupPipeline>) -> Router {
    Router::new()
        .route("/boardgames/{ids}", get(players_counts))
        .route("/boardgames/{ids}/stream", get(players_counts_stream))
        .with_state(pipeline)
}

/// `GET /boardgames/{ids}`: aggregated JSON array of per-game results.
async fn players_counts(
    State(pipeline): State<Arc<LookupPipeline>>,
    Path(ids): Path<String>,
) -> Response {
    let ids = match parse_id_list(&ids) {
        Ok(ids) => ids,
        Err(_) => return invalid_ids_response(),
    };

    match pipeline.lookup(ids).await {
        Ok(results) => Json(results).into_response(),
        Err(error) => {
            error!(%error, "lookup failed");
            (StatusCode::BAD_GATEWAY, "upstream unavailable").into_response()
        }
    }
}

/// `GET /boardgames/{ids}/stream`: newline-delimited JSON, one object per
/// game, emitted as the pipeline produces them.
async fn players_counts_stream(
    State(pipeline): State<Arc<LookupPipeline>>,
    Path(ids): Path<String>,
) -> Response {
    let ids = match parse_id_list(&ids) {
        Ok(ids) => ids,
        Err(_) => return invalid_ids_response(),
    };

    let body = Body::from_stream(ndjson_lines(pipeline.stream(ids)));
    (
        [(header::CONTENT_TYPE, "application/x-ndjson")],
        body,
    )
        .into_response()
}

fn invalid_ids_response() -> Response {
    (StatusCode::BAD_REQUEST, INVALID_IDS_MESSAGE).into_response()
}

/// One JSON line per item. A run abort ends the stream; lines already
/// written stay delivered, the status was sent long ago.
fn ndjson_lines(
    results: LookupStream,
) -> impl Stream<Item = std::result::Result<Bytes, Infallible>> {
    stream::unfold(results, |mut results| async move {
        match results.next().await {
            Some(Ok(item)) => match serde_json::to_vec(&item) {
                Ok(mut line) => {
                    line.push(b'\n');
                    Some((Ok(Bytes::from(line)), results))
                }
                Err(error) => {
                    error!(%error, "cannot serialize result item");
                    None
                }
            },
            Some(Err(error)) => {
                warn!(%error, "lookup aborted mid-stream");
                None
            }
            None => None,
        }
    })
}
