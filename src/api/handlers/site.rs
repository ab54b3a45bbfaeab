//! Browser-facing routes: entry document, wipe redirect, static assets.

use axum::Router;
use axum::extract::{Request, State};
use axum::http::{StatusCode, Uri, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{any, get};
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::app_state::AppState;
use crate::config::RelayConfig;
use crate::error::{ErrorResponse, RelayError};

/// `GET <base>` and `GET <base>/` — Returns the entry document.
///
/// # Errors
///
/// Returns [`RelayError::EntryDocument`] if the file cannot be read.
#[utoipa::path(
    get,
    path = "/screeniverse",
    tag = "Site",
    summary = "Entry document",
    description = "Returns the HTML page that hosts the relay client.",
    responses(
        (status = 200, description = "Entry document", content_type = "text/html"),
        (status = 404, description = "Entry document missing", body = ErrorResponse),
    )
)]
pub async fn entry_handler(State(state): State<AppState>) -> Result<Html<String>, RelayError> {
    let path = &state.config.entry_document;
    let html = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| RelayError::EntryDocument {
            path: path.display().to_string(),
            source,
        })?;
    Ok(Html(html))
}

/// `ANY <base>/wipe[/...]` — Clears every stored view and redirects to `<base>`.
///
/// Connected clients are not notified.
#[utoipa::path(
    get,
    path = "/screeniverse/wipe",
    tag = "Site",
    summary = "Clear stored views",
    description = "Drops every stored camera view without notifying connected clients, then redirects to the entry document. Accepts any HTTP method.",
    responses(
        (status = 302, description = "Views cleared; redirect to the entry document"),
    )
)]
pub async fn wipe_handler(State(state): State<AppState>) -> impl IntoResponse {
    state.relay.reset().await;
    (
        StatusCode::FOUND,
        [(header::LOCATION, state.config.base_path.clone())],
    )
}

/// `GET <base>/<asset>` — Serves a file from the static directory.
///
/// The base path is stripped and the remainder resolved by
/// [`ServeDir`], which answers 404 for anything outside the directory.
pub async fn asset_handler(State(state): State<AppState>, mut request: Request) -> Response {
    let Some(asset) = request
        .uri()
        .path()
        .strip_prefix(state.config.base_path.as_str())
    else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let Ok(uri) = Uri::try_from(asset) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    *request.uri_mut() = uri;

    match ServeDir::new(&state.config.static_dir).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

/// Site routes mounted under the configured base path.
///
/// The entry document also answers `<base>/`, and the wipe route matches
/// `<base>/wipe` and everything beneath it.
pub fn routes(config: &RelayConfig) -> Router<AppState> {
    let base = &config.base_path;
    let wipe = config.wipe_path();
    Router::new()
        .route(base, get(entry_handler))
        .route(&format!("{base}/"), get(entry_handler))
        .route(&wipe, any(wipe_handler))
        .route(&format!("{wipe}/"), any(wipe_handler))
        .route(&format!("{wipe}/{{*rest}}"), any(wipe_handler))
        .route(&format!("{base}/{{*asset}}"), get(asset_handler))
}
