//! BoardGameGeek XML API 2 client.
//!
//! See <https://boardgamegeek.com/wiki/page/BGG_XML_API2> for the upstream
//! contract: the `thing` endpoint accepts up to 20 comma-separated ids per
//! call and rate-limits aggressive callers.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::UpstreamConfig;
use crate::domain::{extract_player_counts, GameId, GameRecord, PlayerCountSet};
use crate::error::{Error, Result};
use crate::port::GameFetcher;

/// `<items>` response of the `thing` endpoint, reduced to the fields the
/// player-count lookup needs.
#[derive(Debug, Deserialize)]
struct ItemsDocument {
    #[serde(rename = "item", default)]
    items: Vec<ItemElement>,
}

#[derive(Debug, Deserialize)]
struct ItemElement {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "poll-summary")]
    poll_summary: Option<PollSummaryElement>,
    #[serde(rename = "yearpublished")]
    year_published: Option<ValueAttribute>,
}

#[derive(Debug, Deserialize)]
struct PollSummaryElement {
    #[serde(rename = "result", default)]
    results: Vec<PollResultElement>,
}

#[derive(Debug, Deserialize)]
struct PollResultElement {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@value")]
    value: String,
}

#[derive(Debug, Deserialize)]
struct ValueAttribute {
    #[serde(rename = "@value")]
    value: String,
}

/// Upstream fetcher backed by the BoardGameGeek XML API.
pub struct BggClient {
    http: Client,
    base_url: String,
}

impl BggClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let http = Client::builder().user_agent(&config.user_agent).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GameFetcher for BggClient {
    async fn fetch(&self, ids: &[GameId]) -> Result<Vec<GameRecord>> {
        let joined = ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let url = format!("{}/xmlapi2/thing?id={}", self.base_url, joined);
        debug!(count = ids.len(), %url, "fetching games");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamStatus(status.as_u16()));
        }
        let body = response.text().await?;

        let document: ItemsDocument = match quick_xml::de::from_str(&body) {
            Ok(document) => document,
            Err(error) => {
                // an undecodable response is zero records, not a failure
                warn!(%error, "cannot decode upstream XML");
                return Ok(Vec::new());
            }
        };

        Ok(document.items.into_iter().filter_map(into_record).collect())
    }

    fn upstream_name(&self) -> &'static str {
        "boardgamegeek"
    }
}

fn into_record(item: ItemElement) -> Option<GameRecord> {
    let Ok(id) = item.id.parse::<u64>() else {
        warn!(id = %item.id, "skipping item with non-numeric id");
        return None;
    };

    let mut best_with = PlayerCountSet::new();
    let mut recommended_with = PlayerCountSet::new();
    let results = item
        .poll_summary
        .map(|summary| summary.results)
        .unwrap_or_default();
    for result in results {
        match result.name.as_str() {
            "bestwith" => best_with.extend(extract_player_counts(&result.value)),
            // upstream XML misspells the attribute
            "recommmendedwith" => recommended_with.extend(extract_player_counts(&result.value)),
            _ => {}
        }
    }

    Some(GameRecord {
        id: GameId::new(id),
        best_with,
        recommended_with,
        published_year: item
            .year_published
            .map(|year| year.value)
            .unwrap_or_default(),
    })
}
