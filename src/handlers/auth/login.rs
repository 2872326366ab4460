use axum::{extract::State, Json};

use crate::{
    handlers::helper::record_activity,
    jwt::JWT_KEYS,
    models::*,
    state::AppState,
    utils::{get_epoch_ts, normalize_email, verify_password, AppError, ValidatedBody},
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

async fn password_login(
    state: &AppState,
    kind: PrincipalKind,
    body: LoginReq,
) -> Result<AuthResponse, AppError> {
    let email = normalize_email(&body.email);
    let mut principal = state
        .principals
        .find_by_email(kind, &email)
        .await?
        .ok_or(AppError::Auth(INVALID_CREDENTIALS.into()))?;
    // accounts created through an approval may have no password
    let hash = principal
        .password_hash
        .as_deref()
        .ok_or(AppError::Auth(INVALID_CREDENTIALS.into()))?;
    if !verify_password(&body.password, hash)? {
        return Err(AppError::Auth(INVALID_CREDENTIALS.into()));
    }
    if !principal.is_active {
        return Err(AppError::Forbidden("Account is deactivated".into()));
    }
    let now = get_epoch_ts();
    state.principals.touch_last_login(kind, principal.id, now).await?;
    principal.last_login_time = Some(now);
    let token = JWT_KEYS.generate_token(principal.id, kind)?;
    Ok(AuthResponse {
        success: true,
        token,
        user: PrincipalProfile::from(&principal),
    })
}

/// Log in a user with email and password
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginReq,
    responses(
        (status = StatusCode::OK, description = "Logged in", body = AuthResponse),
        (status = StatusCode::UNAUTHORIZED, description = "Invalid credentials", body = GenericResponse),
        (status = StatusCode::FORBIDDEN, description = "Account deactivated", body = GenericResponse),
    ),
    tag = "Auth API"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    ValidatedBody(body): ValidatedBody<LoginReq>,
) -> Result<Json<AuthResponse>, AppError> {
    let res = password_login(&state, PrincipalKind::User, body).await?;
    Ok(Json(res))
}

/// Log in an admin with email and password
#[utoipa::path(
    post,
    path = "/api/v1/admin/login",
    request_body = LoginReq,
    responses(
        (status = StatusCode::OK, description = "Logged in", body = AuthResponse),
        (status = StatusCode::UNAUTHORIZED, description = "Invalid credentials", body = GenericResponse),
        (status = StatusCode::FORBIDDEN, description = "Account deactivated", body = GenericResponse),
    ),
    tag = "Admin API"
)]
pub async fn admin_login_handler(
    State(state): State<AppState>,
    ValidatedBody(body): ValidatedBody<LoginReq>,
) -> Result<Json<AuthResponse>, AppError> {
    let res = password_login(&state, PrincipalKind::Admin, body).await?;
    record_activity(&state, res.user.id, "login", "Logged in with password").await;
    Ok(Json(res))
}
