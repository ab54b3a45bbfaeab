//! OpenAPI description of the HTTP routes.
//!
//! With the `swagger-ui` feature the document is served by Swagger UI at
//! `/swagger-ui`; without it, only the raw JSON is exposed.

use utoipa::OpenApi;

use super::handlers::{site, system};
use crate::error::{ErrorBody, ErrorResponse};

/// Path the OpenAPI JSON is served at.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// OpenAPI root for the relay's HTTP surface.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "screeniverse-relay",
        description = "HTTP routes of the camera view relay. Real-time events travel over the WebSocket endpoint and are not described here."
    ),
    paths(
        site::entry_handler,
        site::wipe_handler,
        system::health_handler,
    ),
    components(schemas(system::HealthResponse, ErrorResponse, ErrorBody)),
    tags(
        (name = "Site", description = "Entry document and view reset"),
        (name = "System", description = "Health"),
    )
)]
pub struct ApiDoc;

/// Builds the OpenAPI document.
#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
