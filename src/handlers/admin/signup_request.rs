use axum::{extract::State, http::StatusCode, Json};

use crate::{
    handlers::helper::check_uniq_email,
    models::*,
    state::AppState,
    utils::{hash_password, normalize_email, AppError, ValidatedBody},
};

/// Ask to become an admin
///
/// The request waits in the pending list until an existing admin approves
/// or rejects it.
#[utoipa::path(
    post,
    path = "/api/v1/admin/signup-request",
    request_body = AdminSignupReq,
    responses(
        (status = StatusCode::CREATED, description = "Request submitted", body = GenericResponse),
        (status = StatusCode::BAD_REQUEST, description = "Invalid request or email already used", body = GenericResponse),
    ),
    tag = "Admin API"
)]
pub async fn admin_signup_request_handler(
    State(state): State<AppState>,
    ValidatedBody(body): ValidatedBody<AdminSignupReq>,
) -> Result<(StatusCode, Json<GenericResponse>), AppError> {
    let email = normalize_email(&body.email);
    check_uniq_email(&state, PrincipalKind::Admin, &email).await?;
    if state
        .admin_requests
        .find_pending_by_email(&email)
        .await?
        .is_some()
    {
        let err = format!("A request is already pending for email: {email}");
        return Err(AppError::BadRequestErr(err));
    }
    let new_request = NewAdminRequest {
        name: body.name.trim().to_owned(),
        email,
        password_hash: Some(hash_password(&body.password)?),
        dob: body.dob,
        reason: body.reason,
    };
    let request = state.admin_requests.insert_pending(new_request).await?;
    tracing::debug!("Admin signup request {} submitted", request.id);
    let res = GenericResponse {
        success: true,
        message: "Signup request submitted. An admin will review it shortly.".to_owned(),
    };
    Ok((StatusCode::CREATED, Json(res)))
}
