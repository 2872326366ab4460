use axum::{
    http::{StatusCode, Uri},
    Json,
};

use crate::models::GenericResponse;

fn ok(message: &str) -> Json<GenericResponse> {
    Json(GenericResponse {
        success: true,
        message: message.to_owned(),
    })
}

/// Root route, reports that the server is up
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = StatusCode::OK, description = "Server is running", body = GenericResponse)
    ),
    tag = "Debugging API"
)]
pub async fn default_route_handler() -> Json<GenericResponse> {
    ok("Appleverse server is running")
}

/// Ping endpoint
///
/// Ping the server to get a static response
#[utoipa::path(
    get,
    path = "/api/v1/ping",
    responses(
        (status = StatusCode::OK, description = "Get success response from server", body = GenericResponse)
    ),
    tag = "Debugging API"
)]
pub async fn ping_handler() -> Json<GenericResponse> {
    ok("pong")
}

pub async fn global_404_handler(uri: Uri) -> (StatusCode, Json<GenericResponse>) {
    let message = format!("Route `{}` does not exist", uri.path());
    tracing::debug!(message);
    let res = GenericResponse {
        success: false,
        message,
    };
    (StatusCode::NOT_FOUND, Json(res))
}
