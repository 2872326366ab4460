use axum::{extract::State, Json};

use crate::{handlers::helper::record_activity, models::*, state::AppState, utils::AppError};

async fn request_code(
    state: &AppState,
    kind: PrincipalKind,
    body: Option<Json<RequestOtpReq>>,
) -> Json<GenericResponse> {
    let email = body.map(|Json(body)| body.email).unwrap_or_default();
    Json(state.otp.request_code(kind, &email).await)
}

async fn verify_code(
    state: &AppState,
    kind: PrincipalKind,
    body: Option<Json<VerifyOtpReq>>,
) -> Result<Json<AuthResponse>, AppError> {
    let body = body.map(|Json(body)| body).unwrap_or_default();
    let login = state.otp.verify_code(kind, &body.email, &body.code).await?;
    let res = AuthResponse {
        success: true,
        token: login.token,
        user: login.user,
    };
    Ok(Json(res))
}

/// Request a login code for a user
///
/// Always responds with the same acknowledgement, whether or not an account
/// exists for the email.
#[utoipa::path(
    post,
    path = "/api/v1/auth/request-otp",
    request_body = RequestOtpReq,
    responses(
        (status = StatusCode::OK, description = "Acknowledged", body = GenericResponse),
    ),
    tag = "Auth API"
)]
pub async fn user_request_otp_handler(
    State(state): State<AppState>,
    body: Option<Json<RequestOtpReq>>,
) -> Json<GenericResponse> {
    request_code(&state, PrincipalKind::User, body).await
}

/// Verify a user login code
#[utoipa::path(
    post,
    path = "/api/v1/auth/verify-otp",
    request_body = VerifyOtpReq,
    responses(
        (status = StatusCode::OK, description = "Logged in", body = AuthResponse),
        (status = StatusCode::BAD_REQUEST, description = "Invalid, expired or exhausted code", body = ErrorResponse),
    ),
    tag = "Auth API"
)]
pub async fn user_verify_otp_handler(
    State(state): State<AppState>,
    body: Option<Json<VerifyOtpReq>>,
) -> Result<Json<AuthResponse>, AppError> {
    verify_code(&state, PrincipalKind::User, body).await
}

/// Request a login code for an admin
#[utoipa::path(
    post,
    path = "/api/v1/admin/request-otp",
    request_body = RequestOtpReq,
    responses(
        (status = StatusCode::OK, description = "Acknowledged", body = GenericResponse),
    ),
    tag = "Admin API"
)]
pub async fn admin_request_otp_handler(
    State(state): State<AppState>,
    body: Option<Json<RequestOtpReq>>,
) -> Json<GenericResponse> {
    request_code(&state, PrincipalKind::Admin, body).await
}

/// Verify an admin login code
#[utoipa::path(
    post,
    path = "/api/v1/admin/verify-otp",
    request_body = VerifyOtpReq,
    responses(
        (status = StatusCode::OK, description = "Logged in", body = AuthResponse),
        (status = StatusCode::BAD_REQUEST, description = "Invalid, expired or exhausted code", body = ErrorResponse),
    ),
    tag = "Admin API"
)]
pub async fn admin_verify_otp_handler(
    State(state): State<AppState>,
    body: Option<Json<VerifyOtpReq>>,
) -> Result<Json<AuthResponse>, AppError> {
    let res = verify_code(&state, PrincipalKind::Admin, body).await?;
    record_activity(&state, res.user.id, "login", "Logged in with a one-time code").await;
    Ok(res)
}
