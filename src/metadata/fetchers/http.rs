use crate::config::MetadataConfig;
use crate::errors::{AppError, AppResult};
use crate::metadata::fetchers::MetadataFetcher;
use crate::video_id::VideoId;
use anyhow::Context;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;

/// Fetches the metadata envelope over http, either from the proxy or
/// straight from the Data API.
pub struct HttpMetadataFetcher {
    client: reqwest::Client,
    config: MetadataConfig,
}

impl HttpMetadataFetcher {
    pub fn new(client: reqwest::Client, config: MetadataConfig) -> Self {
        Self { client, config }
    }

    pub fn endpoint(&self, video_id: &VideoId) -> anyhow::Result<url::Url> {
        let (base_url, path) = match &self.config {
            MetadataConfig::Proxy { base_url } => (base_url, "videos"),
            MetadataConfig::DataApi { base_url, .. } => (base_url, "youtube/v3/videos"),
        };

        let raw = format!("{}/{path}", base_url.trim_end_matches('/'));
        let mut url =
            url::Url::parse(&raw).with_context(|| format!("invalid metadata endpoint {raw}"))?;

        match &self.config {
            MetadataConfig::Proxy { .. } => {
                url.query_pairs_mut().append_pair("id", video_id);
            }
            MetadataConfig::DataApi { api_key, .. } => {
                url.query_pairs_mut()
                    .append_pair("part", "snippet")
                    .append_pair("id", video_id)
                    .append_pair("key", api_key.as_deref().unwrap_or_default());
            }
        }

        Ok(url)
    }

    async fn fetch_envelope(&self, video_id: &VideoId) -> AppResult<Value> {
        let url = self.endpoint(video_id)?;
        log::debug!("fetching metadata for {video_id} from {}", url.host_str().unwrap_or_default());

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| AppError::upstream(format!("metadata request failed: {err}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::upstream(format!(
                "API returned status {}",
                status.as_u16()
            )));
        }

        Ok(resp.json::<Value>().await?)
    }
}

impl MetadataFetcher for HttpMetadataFetcher {
    fn fetch<'a>(&'a self, video_id: &'a VideoId) -> BoxFuture<'a, AppResult<Value>> {
        self.fetch_envelope(video_id).boxed()
    }

    fn name(&self) -> &'static str {
        match self.config {
            MetadataConfig::Proxy { .. } => "Proxy",
            MetadataConfig::DataApi { .. } => "DataApi",
        }
    }
}
