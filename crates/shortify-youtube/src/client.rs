//! YouTube Data API v3 client.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use shortify_models::{parse_iso8601_duration, VideoSource};

use crate::error::{ApiError, ApiResult};

/// Production API base URL.
const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// How many recent uploads to consider.
pub const RECENT_UPLOADS_WINDOW: u32 = 50;

/// YouTube Data API client.
pub struct YouTubeClient {
    http: Client,
    api_key: String,
    base_url: String,
}

// ---- search.list response -------------------------------------------------

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

// ---- videos.list response -------------------------------------------------

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    snippet: VideoSnippet,
    #[serde(rename = "contentDetails")]
    content_details: ContentDetails,
}

#[derive(Debug, Deserialize)]
struct VideoSnippet {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: String,
}

impl YouTubeClient {
    /// Create a client for the production API.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the API base URL (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// List a channel's recent uploads with titles and durations.
    ///
    /// Runs `search.list` (order=date) for the id window, then
    /// `videos.list` for `contentDetails.duration`. Videos whose
    /// duration fails to parse are skipped with a warning rather than
    /// failing the whole lookup.
    pub async fn recent_uploads(&self, channel_id: &str) -> ApiResult<Vec<VideoSource>> {
        let search_url = format!("{}/search", self.base_url);
        let max_results = RECENT_UPLOADS_WINDOW.to_string();
        let response = self
            .http
            .get(&search_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("channelId", channel_id),
                ("part", "snippet,id"),
                ("order", "date"),
                ("type", "video"),
                ("maxResults", max_results.as_str()),
            ])
            .send()
            .await?;
        let search: SearchResponse = Self::read_json(response).await?;

        let ids: Vec<String> = search
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect();

        debug!(channel_id = channel_id, count = ids.len(), "Recent uploads listed");

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let videos_url = format!("{}/videos", self.base_url);
        let response = self
            .http
            .get(&videos_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("id", ids.join(",").as_str()),
                ("part", "snippet,contentDetails"),
            ])
            .send()
            .await?;
        let videos: VideosResponse = Self::read_json(response).await?;

        let sources = videos
            .items
            .into_iter()
            .filter_map(|item| match parse_iso8601_duration(&item.content_details.duration) {
                Ok(duration_secs) => Some(VideoSource {
                    id: item.id,
                    title: item.snippet.title,
                    duration_secs,
                }),
                Err(e) => {
                    warn!(video_id = %item.id, error = %e, "Skipping video with unparseable duration");
                    None
                }
            })
            .collect();

        Ok(sources)
    }

    /// Check the status and decode the body, mapping failures to ApiError.
    async fn read_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| ApiError::invalid_response(format!("JSON decode failed: {e}")))
    }
}
