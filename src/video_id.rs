use crate::errors::{AppError, AppResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, ops::Deref};

/// Known url shapes, tried in order. First match wins.
static PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"v=([A-Za-z0-9_-]{11})",
        r"/embed/([A-Za-z0-9_-]{11})",
        r"youtu\.be/([A-Za-z0-9_-]{11})",
        r"/v/([A-Za-z0-9_-]{11})",
        r"/shorts/([A-Za-z0-9_-]{11})",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Failed to compile video id regex"))
    .collect()
});

static VIDEO_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("Failed to compile video id regex"));

/// 11 character YouTube video identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoId(String);

impl VideoId {
    /// Accepts exactly one id, nothing around it.
    pub fn parse(s: &str) -> Option<VideoId> {
        if VIDEO_ID_REGEX.is_match(s) {
            Some(VideoId(s.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Deref for VideoId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<VideoId> for String {
    fn from(id: VideoId) -> Self {
        id.0
    }
}

/// Find the video id in whatever the user pasted.
///
/// When no known url shape matched, the input is accepted only if it is a
/// bare id on its own. Any other url is `NotFound`.
pub fn extract(raw: &str) -> AppResult<VideoId> {
    let input = raw.trim();

    for pattern in PATTERNS.iter() {
        if let Some(id) = pattern.captures(input).and_then(|caps| caps.get(1)) {
            return Ok(VideoId(id.as_str().to_string()));
        }
    }

    VideoId::parse(input).ok_or_else(|| AppError::not_found("Invalid YouTube URL format"))
}
