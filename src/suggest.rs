use crate::config::SuggestConfig;
use crate::errors::{AppError, AppResult};
use anyhow::{bail, Context};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Shorter suggestions are dropped after normalization.
pub const MIN_SUGGESTION_LEN: usize = 3;

/// Number of queries per seed: the seed itself plus one per letter.
pub const VARIANT_COUNT: usize = 27;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Suggestions {
    pub tags: Vec<String>,
    pub count: usize,
}

impl From<BTreeSet<String>> for Suggestions {
    fn from(set: BTreeSet<String>) -> Self {
        let tags: Vec<String> = set.into_iter().collect();
        let count = tags.len();
        Self { tags, count }
    }
}

/// `seed`, `seed a`, `seed b` ... `seed z`.
pub fn variants(seed: &str) -> Vec<String> {
    std::iter::once(seed.to_string())
        .chain(('a'..='z').map(|letter| format!("{seed} {letter}")))
        .collect()
}

/// Lowercased and trimmed, `None` when too short to be useful.
pub fn normalize(suggestion: &str) -> Option<String> {
    let normalized = suggestion.trim().to_lowercase();
    if normalized.chars().count() < MIN_SUGGESTION_LEN {
        return None;
    }
    Some(normalized)
}

/// Suggestion envelope: `["query", ["suggestion", ...], ...]`.
pub fn parse_envelope(body: &str) -> anyhow::Result<Vec<String>> {
    let value: serde_json::Value =
        serde_json::from_str(body).context("suggest response is not json")?;

    let Some(list) = value.get(1).and_then(|v| v.as_array()) else {
        bail!("suggest response has no suggestion list");
    };

    Ok(list
        .iter()
        .filter_map(|v| v.as_str())
        .map(str::to_owned)
        .collect())
}

/// Fans a seed keyword out to the suggest endpoint and merges the answers.
pub struct Aggregator {
    client: reqwest::Client,
    config: SuggestConfig,
}

impl Aggregator {
    pub fn new(client: reqwest::Client, config: SuggestConfig) -> Self {
        Self { client, config }
    }

    async fn fetch_variant(&self, query: &str) -> anyhow::Result<Vec<String>> {
        let resp = self
            .client
            .get(&self.config.url)
            .header(reqwest::header::USER_AGENT, &self.config.user_agent)
            .query(&[
                ("client", self.config.client.as_str()),
                ("ds", "yt"),
                ("q", query),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            bail!("suggest endpoint returned status {}", status.as_u16());
        }

        parse_envelope(&resp.text().await?)
    }

    /// All variants are in flight at once. A variant that fails is skipped;
    /// if every one fails the result is simply empty.
    pub async fn aggregate(&self, seed: &str) -> AppResult<Suggestions> {
        let seed = seed.trim();
        if seed.is_empty() {
            return Err(AppError::validation("No keyword provided"));
        }

        let queries = variants(seed);
        let results = join_all(
            queries
                .iter()
                .map(|query| async move { (query, self.fetch_variant(query).await) }),
        )
        .await;

        let mut merged = BTreeSet::new();
        let mut failed = 0;
        for (query, result) in results {
            match result {
                Ok(list) => merged.extend(list.iter().filter_map(|s| normalize(s))),
                Err(err) => {
                    failed += 1;
                    log::warn!("variant={query:?} outcome=error err={err:#}");
                }
            }
        }

        log::info!(
            "seed={seed:?} ok={} failed={failed} unique={}",
            queries.len() - failed,
            merged.len()
        );

        Ok(merged.into())
    }
}
