use crate::video_id::VideoId;
use serde::{Deserialize, Serialize};

/// Upstream tags, verbatim and in upstream order.
pub type TagList = Vec<String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailDescriptor {
    /// Human readable label, e.g. "High Quality (480x360)"
    pub name: String,
    /// Size class the page styles the preview with
    pub css: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagsResponse {
    pub tags: TagList,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailsResponse {
    pub video_id: VideoId,
    pub thumbnails: Vec<ThumbnailDescriptor>,
}
