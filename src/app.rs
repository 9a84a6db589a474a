use crate::{
    config::Config,
    errors::{AppError, AppResult},
    metadata::{self, HttpMetadataFetcher, MetadataFetcher, TagsResponse, ThumbnailsResponse},
    request_log::{self, JsonlRequestLog, RequestLog, RequestLogEntry},
    suggest::{Aggregator, Suggestions},
    video_id,
};
use serde::Serialize;
use std::sync::Arc;

/// Everything a request needs. Immutable once built, shared between
/// handlers behind an `Arc`.
pub struct App {
    metadata: Arc<dyn MetadataFetcher>,
    aggregator: Aggregator,
    request_log: Option<Arc<dyn RequestLog>>,
}

impl App {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().build()?;

        let metadata = Arc::new(HttpMetadataFetcher::new(
            client.clone(),
            config.metadata.clone(),
        ));
        let aggregator = Aggregator::new(client, config.suggest.clone());

        let request_log: Option<Arc<dyn RequestLog>> = if config.request_log {
            Some(Arc::new(JsonlRequestLog::new(config.base_path())?))
        } else {
            None
        };

        Ok(Self::new_with(metadata, aggregator, request_log))
    }

    pub fn new_with(
        metadata: Arc<dyn MetadataFetcher>,
        aggregator: Aggregator,
        request_log: Option<Arc<dyn RequestLog>>,
    ) -> Self {
        Self {
            metadata,
            aggregator,
            request_log,
        }
    }

    pub async fn tags(&self, url: &str) -> AppResult<TagsResponse> {
        let url = required(url, "No URL provided")?;
        let video_id = video_id::extract(url)?;

        let tags = metadata::fetch_tags(self.metadata.as_ref(), &video_id).await?;
        Ok(TagsResponse { tags })
    }

    pub fn thumbnails(&self, url: &str) -> AppResult<ThumbnailsResponse> {
        let url = required(url, "No URL provided")?;
        let video_id = video_id::extract(url)?;

        Ok(ThumbnailsResponse {
            thumbnails: metadata::thumbnails(&video_id).to_vec(),
            video_id,
        })
    }

    pub async fn keywords(&self, seed: &str) -> AppResult<Suggestions> {
        self.aggregator.aggregate(seed).await
    }

    /// Queue a request log entry, if logging is enabled. Never blocks and
    /// never fails the caller.
    pub fn log_request(&self, endpoint: &str, input: &str, output: &impl Serialize) {
        if self.request_log.is_none() {
            return;
        }

        match serde_json::to_value(output) {
            Ok(output) => request_log::record_in_background(
                self.request_log.clone(),
                RequestLogEntry::new(endpoint, input, output),
            ),
            Err(err) => log::warn!("could not serialize {endpoint} response for request log: {err}"),
        }
    }
}

fn required<'a>(value: &'a str, message: &str) -> AppResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(message));
    }
    Ok(value)
}
