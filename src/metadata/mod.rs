pub mod fetchers;
pub mod thumbnails;
pub mod types;

pub use fetchers::{HttpMetadataFetcher, MetadataFetcher};
pub use thumbnails::thumbnails;
pub use types::{TagList, TagsResponse, ThumbnailsResponse};

use crate::errors::AppResult;
use crate::video_id::VideoId;
use serde_json::Value;

/// Tags of the given video. A video the provider doesn't know, or one
/// without tags, yields an empty list rather than an error.
pub async fn fetch_tags(fetcher: &dyn MetadataFetcher, video_id: &VideoId) -> AppResult<TagList> {
    let envelope = fetcher.fetch(video_id).await?;
    let tags = tags_from_envelope(&envelope);

    log::debug!(
        "fetcher={} video={video_id} tags={}",
        fetcher.name(),
        tags.len()
    );

    Ok(tags)
}

/// `items[0].snippet.tags`, non-string entries skipped.
pub fn tags_from_envelope(envelope: &Value) -> TagList {
    envelope
        .get("items")
        .and_then(|v| v.as_array())
        .and_then(|items| items.first())
        .and_then(|item| item.get("snippet"))
        .and_then(|snippet| snippet.get("tags"))
        .and_then(|v| v.as_array())
        .map(|tags| {
            tags.iter()
                .filter_map(|tag| tag.as_str())
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}
