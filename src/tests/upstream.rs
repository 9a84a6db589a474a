//! Local stand-ins for the third-party endpoints.

use crate::config::SuggestConfig;
use crate::errors::{AppError, AppResult};
use crate::metadata::MetadataFetcher;
use crate::suggest::Aggregator;
use crate::video_id::VideoId;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::{json, Value};
use std::{
    collections::{HashMap, HashSet},
    net::SocketAddr,
    sync::{Arc, Mutex},
};

pub const TEST_USER_AGENT: &str = "ytt-tests/1.0";

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

#[derive(Clone, Default)]
pub struct SuggestLog {
    pub queries: Arc<Mutex<Vec<String>>>,
    pub user_agents: Arc<Mutex<Vec<String>>>,
}

#[derive(Clone)]
struct SuggestState {
    log: SuggestLog,
    fail: Arc<HashSet<String>>,
    garbage: bool,
}

/// Every query `q` answers with "Cats Tips", "  cats tips ", "cats", "ab"
/// and "<q> video", so the merged result has 2 shared entries plus one per
/// answered query.
async fn suggest(
    State(state): State<SuggestState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let q = params.get("q").cloned().unwrap_or_default();
    state.log.queries.lock().unwrap().push(q.clone());
    if let Some(ua) = headers.get(header::USER_AGENT).and_then(|v| v.to_str().ok()) {
        state.log.user_agents.lock().unwrap().push(ua.to_string());
    }

    if state.fail.contains(&q) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }

    if state.garbage {
        return (StatusCode::OK, "<html>not json</html>").into_response();
    }

    Json(json!([
        q,
        ["Cats Tips", "  cats tips ", "cats", "ab", format!("{q} video"), 42],
        [],
        {"google:suggesttype": []}
    ]))
    .into_response()
}

pub struct FakeSuggest {
    pub addr: SocketAddr,
    pub log: SuggestLog,
}

impl FakeSuggest {
    pub async fn start(fail: &[String]) -> Self {
        Self::start_with(fail, false).await
    }

    pub async fn start_with(fail: &[String], garbage: bool) -> Self {
        let log = SuggestLog::default();
        let state = SuggestState {
            log: log.clone(),
            fail: Arc::new(fail.iter().cloned().collect()),
            garbage,
        };
        let router = Router::new()
            .route("/complete/search", get(suggest))
            .with_state(state);

        Self {
            addr: serve(router).await,
            log,
        }
    }

    pub fn config(&self) -> SuggestConfig {
        SuggestConfig {
            url: format!("http://{}/complete/search", self.addr),
            client: "firefox".to_string(),
            user_agent: TEST_USER_AGENT.to_string(),
        }
    }

    pub fn aggregator(&self) -> Aggregator {
        Aggregator::new(client(), self.config())
    }

    pub fn queries(&self) -> Vec<String> {
        self.log.queries.lock().unwrap().clone()
    }
}

/// Serves `/videos` (proxy) and `/youtube/v3/videos` (Data API) from a
/// fixed table of id → envelope. Unknown ids get 404, `key=bad` gets 403,
/// a `null` envelope is answered with an html page.
pub async fn fake_metadata(videos: HashMap<String, Value>) -> SocketAddr {
    let videos = Arc::new(videos);

    async fn videos_handler(
        State(videos): State<Arc<HashMap<String, Value>>>,
        Query(params): Query<HashMap<String, String>>,
    ) -> impl IntoResponse {
        if params.get("key").map(String::as_str) == Some("bad") {
            return (StatusCode::FORBIDDEN, "forbidden").into_response();
        }
        let id = params.get("id").cloned().unwrap_or_default();
        match videos.get(&id) {
            Some(Value::Null) => (StatusCode::OK, "<html>not json</html>").into_response(),
            Some(envelope) => Json(envelope.clone()).into_response(),
            None => (StatusCode::NOT_FOUND, "not found").into_response(),
        }
    }

    let router = Router::new()
        .route("/videos", get(videos_handler))
        .route("/youtube/v3/videos", get(videos_handler))
        .with_state(videos);

    serve(router).await
}

pub fn envelope(tags: &[&str]) -> Value {
    json!({
        "kind": "youtube#videoListResponse",
        "items": [{"id": "dQw4w9WgXcQ", "snippet": {"title": "t", "tags": tags}}]
    })
}

/// In-process metadata source, no http involved.
pub enum StubMetadata {
    Envelope(Value),
    Fails(String),
}

impl MetadataFetcher for StubMetadata {
    fn fetch<'a>(&'a self, _video_id: &'a VideoId) -> BoxFuture<'a, AppResult<Value>> {
        async move {
            match self {
                StubMetadata::Envelope(value) => Ok(value.clone()),
                StubMetadata::Fails(message) => Err(AppError::upstream(message.clone())),
            }
        }
        .boxed()
    }

    fn name(&self) -> &'static str {
        "Stub"
    }
}
