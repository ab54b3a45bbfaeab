//! HTTP layer: site routes, system routes and the OpenAPI document.
//!
//! Site routes are mounted under the configured base path; system routes
//! live at the root.

pub mod doc;
pub mod handlers;

use axum::Router;

use crate::app_state::AppState;
use crate::config::RelayConfig;

/// Builds the HTTP router (everything except the WebSocket endpoint).
pub fn build_router(config: &RelayConfig) -> Router<AppState> {
    let router = Router::new()
        .merge(handlers::site::routes(config))
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui").url(doc::OPENAPI_PATH, doc::openapi()),
    );

    router
}
