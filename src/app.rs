use axum::{
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    handler::Handler,
    http::StatusCode,
    routing::{delete, get, get_service, post, put},
    BoxError, Json, Router,
};
use std::time::Duration;
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    constants::*, handlers::*, models::GenericResponse, state::AppState, stores::LocalImageStore,
    swagger::ApiDoc,
};

/// Assemble every route with the shared middleware stack
pub fn build_app(state: AppState) -> Router {
    tracing::debug!("Initializing the app");
    let images_dir = LocalImageStore::from_env().dir().clone();
    let images = get_service(ServeDir::new(images_dir)).handle_error(|err| async move {
        tracing::error!("Unable to serve image: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, "Unable to serve image")
    });
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(HandleErrorLayer::new(handle_timeout_error))
        .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)));
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(default_route_handler))
        .nest("/api/v1", api_routes())
        .nest_service(IMAGE_URL_PREFIX, images)
        .fallback(global_404_handler)
        .layer(middleware)
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping_handler))
        .nest("/auth", auth_routes())
        .nest("/admin", admin_routes())
        .nest("/settings", settings_routes())
        .nest("/apples", apple_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup_handler))
        .route("/login", post(login_handler))
        .route("/request-otp", post(user_request_otp_handler))
        .route("/verify-otp", post(user_verify_otp_handler))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/signup-request", post(admin_signup_request_handler))
        .route("/login", post(admin_login_handler))
        .route("/request-otp", post(admin_request_otp_handler))
        .route("/verify-otp", post(admin_verify_otp_handler))
        .route("/pending-requests", get(pending_requests_handler))
        .route("/rejected-requests", get(rejected_requests_handler))
        .route("/admins", get(list_admins_handler))
        .route("/approve/:id", post(approve_request_handler))
        .route("/reject/:id", post(reject_request_handler))
        .route("/reinstate/:id", post(reinstate_request_handler))
        .route("/toggle-status/:id", put(toggle_status_handler))
        .route("/activity/:id", get(activity_handler))
        .route("/delete/:id", delete(delete_admin_handler))
}

fn settings_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile_handler).put(update_profile_handler))
        .route("/change-password", put(change_password_handler))
}

fn apple_routes() -> Router<AppState> {
    let uploads = Router::new()
        .route("/single-upload", post(single_upload_handler))
        .route("/bulk-import", post(bulk_import_handler))
        .route("/bulk-import/preview", post(bulk_import_preview_handler))
        .layer(DefaultBodyLimit::max(MULTIPART_BODY_LIMIT));
    Router::new()
        .route("/all", get(get_all_apples_handler))
        .route("/search/:query", get(search_apples_handler))
        .route(
            "/:id",
            get(get_apple_handler)
                .put(update_apple_handler.layer(DefaultBodyLimit::max(MULTIPART_BODY_LIMIT)))
                .delete(delete_apple_handler),
        )
        .merge(uploads)
}

async fn handle_timeout_error(err: BoxError) -> (StatusCode, Json<GenericResponse>) {
    let (status, message) = if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "Request timed out".to_owned())
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Unhandled internal error: {err}"),
        )
    };
    let res = GenericResponse {
        success: false,
        message,
    };
    (status, Json(res))
}
