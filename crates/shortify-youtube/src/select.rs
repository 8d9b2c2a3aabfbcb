//! Source selection policy.
//!
//! Policy: uniform random among the channel's recent uploads (the API
//! window of 50) whose duration is at least the configured minimum.
//! No record of already-processed videos is kept.

use rand::seq::IndexedRandom;
use tracing::info;

use shortify_models::VideoSource;

use crate::client::YouTubeClient;
use crate::error::{ApiError, ApiResult};

/// Pick one eligible source uniformly at random.
///
/// Returns `NoEligibleVideos` when no candidate meets the minimum
/// duration (or the list is empty).
pub fn select_source(
    candidates: &[VideoSource],
    min_duration_secs: f64,
    channel_id: &str,
) -> ApiResult<VideoSource> {
    let eligible: Vec<&VideoSource> = candidates
        .iter()
        .filter(|v| v.duration_secs >= min_duration_secs)
        .collect();

    let chosen = eligible
        .choose(&mut rand::rng())
        .ok_or_else(|| ApiError::NoEligibleVideos {
            channel_id: channel_id.to_string(),
        })?;

    Ok((*chosen).clone())
}

/// Run the full selection: list recent uploads, filter, pick one.
pub async fn select_recent_upload(
    client: &YouTubeClient,
    channel_id: &str,
    min_duration_secs: f64,
) -> ApiResult<VideoSource> {
    let uploads = client.recent_uploads(channel_id).await?;
    let source = select_source(&uploads, min_duration_secs, channel_id)?;

    info!(
        video_id = %source.id,
        title = %source.title,
        duration_secs = source.duration_secs,
        candidates = uploads.len(),
        "Selected source video"
    );

    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(id: &str, duration_secs: f64) -> VideoSource {
        VideoSource {
            id: id.to_string(),
            title: format!("Video {id}"),
            duration_secs,
        }
    }

    #[test]
    fn test_select_empty_is_not_found() {
        let err = select_source(&[], 120.0, "UC123").unwrap_err();
        assert!(matches!(err, ApiError::NoEligibleVideos { channel_id } if channel_id == "UC123"));
    }

    #[test]
    fn test_select_filters_short_videos() {
        let candidates = vec![source("short", 60.0), source("long", 600.0)];
        for _ in 0..20 {
            let chosen = select_source(&candidates, 120.0, "UC123").unwrap();
            assert_eq!(chosen.id, "long");
        }
    }

    #[test]
    fn test_select_all_too_short_is_not_found() {
        let candidates = vec![source("a", 30.0), source("b", 90.0)];
        let err = select_source(&candidates, 120.0, "UC123").unwrap_err();
        assert!(matches!(err, ApiError::NoEligibleVideos { .. }));
    }

    #[test]
    fn test_select_chooses_among_eligible() {
        let candidates = vec![
            source("a", 300.0),
            source("b", 400.0),
            source("c", 10.0),
        ];
        let chosen = select_source(&candidates, 120.0, "UC123").unwrap();
        assert!(chosen.id == "a" || chosen.id == "b");
    }
}
