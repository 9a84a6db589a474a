pub mod http;

use crate::errors::AppResult;
use crate::video_id::VideoId;
use futures::future::BoxFuture;
use serde_json::Value;

pub use http::HttpMetadataFetcher;

/// Source of the raw video metadata envelope (`{"items": [{"snippet": ...}]}`).
pub trait MetadataFetcher: Send + Sync {
    fn fetch<'a>(&'a self, video_id: &'a VideoId) -> BoxFuture<'a, AppResult<Value>>;

    /// Get the name of this fetcher for logging/debugging
    fn name(&self) -> &'static str;
}
