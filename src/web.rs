use crate::{
    app::App,
    errors::AppError,
    metadata::{TagsResponse, ThumbnailsResponse},
    suggest::Suggestions,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post, MethodRouter},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tower_http::set_header::SetResponseHeaderLayer;

#[derive(Clone)]
pub struct SharedState {
    app: Arc<App>,
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            log::error!("failed to install Ctrl+C handler: {err}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => log::error!("failed to install signal handler: {err}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    log::warn!("shutting down");
}

/// POST-only endpoint that also answers CORS preflights.
fn post_endpoint<H, T>(handler: H) -> MethodRouter<Arc<SharedState>>
where
    H: axum::handler::Handler<T, Arc<SharedState>>,
    T: 'static,
{
    post(handler)
        .options(preflight)
        .fallback(method_not_allowed)
}

pub fn router(app: Arc<App>, static_dir: Option<&str>) -> Router {
    let shared_state = Arc::new(SharedState { app });

    let mut router = Router::new()
        .route("/get-tags", post_endpoint(get_tags))
        .route("/get-thumbnails", post_endpoint(get_thumbnails))
        .route("/get-keywords", post_endpoint(get_keywords))
        .route("/health", get(health));

    if let Some(static_dir) = static_dir {
        router = router.fallback_service(tower_http::services::ServeDir::new(static_dir));
    }

    router
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(
                    tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO),
                )
                .on_response(
                    tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO),
                ),
        )
        .with_state(shared_state)
}

async fn start_app(app: App, addr: SocketAddr, static_dir: String) -> anyhow::Result<()> {
    let router = router(Arc::new(app), Some(&static_dir));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

pub fn start_daemon(app: App, addr: SocketAddr, static_dir: String) -> anyhow::Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async { start_app(app, addr, static_dir).await })
}

#[derive(Debug)]
pub struct HttpError(AppError);

impl HttpError {
    /// The error and every source below it, joined by `: `.
    fn details(&self) -> String {
        let mut details = self.0.to_string();
        let mut source = std::error::Error::source(&self.0);
        while let Some(err) = source {
            details.push_str(": ");
            details.push_str(&err.to_string());
            source = std::error::Error::source(err);
        }
        details
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> axum::response::Response {
        if self.0.is_client_error() {
            log::debug!("{self:?}");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": self.0.to_string()})),
            )
                .into_response();
        }

        log::error!("{self:?}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": format!("Server Error: {}", self.0),
                "details": self.details(),
            })),
        )
            .into_response()
    }
}

impl<E> From<E> for HttpError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

fn bad_body(rejection: JsonRejection) -> HttpError {
    HttpError(AppError::validation(format!(
        "Invalid request body: {}",
        rejection.body_text()
    )))
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UrlRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct KeywordRequest {
    #[serde(default)]
    pub keyword: Option<String>,
}

async fn get_tags(
    State(state): State<Arc<SharedState>>,
    payload: Result<Json<UrlRequest>, JsonRejection>,
) -> Result<Json<TagsResponse>, HttpError> {
    let Json(payload) = payload.map_err(bad_body)?;
    log::debug!("payload: {payload:?}");

    let url = payload.url.unwrap_or_default();
    let resp = state.app.tags(&url).await?;
    state.app.log_request("get-tags", &url, &resp);

    Ok(Json(resp))
}

async fn get_thumbnails(
    State(state): State<Arc<SharedState>>,
    payload: Result<Json<UrlRequest>, JsonRejection>,
) -> Result<Json<ThumbnailsResponse>, HttpError> {
    let Json(payload) = payload.map_err(bad_body)?;
    log::debug!("payload: {payload:?}");

    let url = payload.url.unwrap_or_default();
    let resp = state.app.thumbnails(&url)?;
    state.app.log_request("get-thumbnails", &url, &resp);

    Ok(Json(resp))
}

async fn get_keywords(
    State(state): State<Arc<SharedState>>,
    payload: Result<Json<KeywordRequest>, JsonRejection>,
) -> Result<Json<Suggestions>, HttpError> {
    let Json(payload) = payload.map_err(bad_body)?;
    log::debug!("payload: {payload:?}");

    let keyword = payload.keyword.unwrap_or_default();
    let resp = state.app.keywords(&keyword).await?;
    state.app.log_request("get-keywords", &keyword, &resp);

    Ok(Json(resp))
}

async fn preflight() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "*"),
        ],
    )
}

async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({"error": "Method not allowed"})),
    )
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}
