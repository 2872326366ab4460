use axum::{extract::State, http::StatusCode, Json};

use crate::{
    handlers::helper::check_uniq_email,
    jwt::JWT_KEYS,
    models::*,
    state::AppState,
    utils::{hash_password, normalize_email, AppError, ValidatedBody},
};

/// Create a user account
///
/// Creates an active user with a password and logs them in.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = SignupReq,
    responses(
        (status = StatusCode::CREATED, description = "User created", body = AuthResponse),
        (status = StatusCode::BAD_REQUEST, description = "Invalid request or email already registered", body = GenericResponse),
    ),
    tag = "Auth API"
)]
pub async fn signup_handler(
    State(state): State<AppState>,
    ValidatedBody(body): ValidatedBody<SignupReq>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let email = normalize_email(&body.email);
    check_uniq_email(&state, PrincipalKind::User, &email).await?;
    let new_user = NewPrincipal {
        name: body.name.trim().to_owned(),
        email,
        password_hash: Some(hash_password(&body.password)?),
        role: None,
        dob: None,
        approved_by: None,
    };
    let user = state.principals.insert(PrincipalKind::User, new_user).await?;
    tracing::debug!("User {} signed up", user.id);
    let token = JWT_KEYS.generate_token(user.id, PrincipalKind::User)?;
    let res = AuthResponse {
        success: true,
        token,
        user: PrincipalProfile::from(&user),
    };
    Ok((StatusCode::CREATED, Json(res)))
}
