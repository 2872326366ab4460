use axum::{extract::State, Json};

use crate::{
    jwt::JwtClaims,
    models::*,
    state::AppState,
    utils::{hash_password, is_valid_email, normalize_email, verify_password, AppError, ValidatedBody},
};

async fn current_principal(state: &AppState, claims: &JwtClaims) -> Result<Principal, AppError> {
    state
        .principals
        .find_by_id(claims.kind, claims.sub)
        .await?
        .ok_or(AppError::NotFound("Account not found".into()))
}

/// Profile of the logged in user or admin
#[utoipa::path(
    get,
    path = "/api/v1/settings/profile",
    responses(
        (status = StatusCode::OK, description = "Profile", body = ProfileResponse),
        (status = StatusCode::UNAUTHORIZED, description = "Missing or invalid token", body = GenericResponse),
    ),
    tag = "Settings API",
    security(("authorization" = []))
)]
pub async fn profile_handler(
    claims: JwtClaims,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, AppError> {
    let principal = current_principal(&state, &claims).await?;
    let res = ProfileResponse {
        success: true,
        user: PrincipalProfile::from(&principal),
    };
    Ok(Json(res))
}

fn bad_request(msg: &str) -> AppError {
    AppError::BadRequestErr(msg.to_owned())
}

/// Update name, email or date of birth of the logged in user or admin
#[utoipa::path(
    put,
    path = "/api/v1/settings/profile",
    request_body = UpdateProfileReq,
    responses(
        (status = StatusCode::OK, description = "Updated profile", body = ProfileResponse),
        (status = StatusCode::BAD_REQUEST, description = "Empty or invalid value, or email in use", body = GenericResponse),
        (status = StatusCode::NOT_FOUND, description = "Account not found", body = GenericResponse),
    ),
    tag = "Settings API",
    security(("authorization" = []))
)]
pub async fn update_profile_handler(
    claims: JwtClaims,
    State(state): State<AppState>,
    ValidatedBody(body): ValidatedBody<UpdateProfileReq>,
) -> Result<Json<ProfileResponse>, AppError> {
    let mut patch = ProfilePatch {
        dob: body.dob,
        ..Default::default()
    };
    if let Some(name) = body.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(bad_request("Name cannot be empty"));
        }
        patch.name = Some(name.to_owned());
    }
    if let Some(email) = body.email {
        let email = normalize_email(&email);
        if email.is_empty() {
            return Err(bad_request("Email cannot be empty"));
        }
        if !is_valid_email(&email) {
            return Err(bad_request("Invalid email format"));
        }
        let owner = state.principals.find_by_email(claims.kind, &email).await?;
        if owner.map_or(false, |owner| owner.id != claims.sub) {
            return Err(bad_request("Email already exists"));
        }
        patch.email = Some(email);
    }
    if patch.is_empty() {
        return Err(bad_request("No fields to update"));
    }
    let principal = state
        .principals
        .update_profile(claims.kind, claims.sub, patch)
        .await?
        .ok_or(AppError::NotFound("Account not found".into()))?;
    tracing::debug!("Updated profile of {} {}", claims.kind, claims.sub);
    let res = ProfileResponse {
        success: true,
        user: PrincipalProfile::from(&principal),
    };
    Ok(Json(res))
}

/// Change the password of the logged in user or admin
#[utoipa::path(
    put,
    path = "/api/v1/settings/change-password",
    request_body = ChangePasswordReq,
    responses(
        (status = StatusCode::OK, description = "Password changed", body = GenericResponse),
        (status = StatusCode::BAD_REQUEST, description = "Current password is wrong", body = GenericResponse),
    ),
    tag = "Settings API",
    security(("authorization" = []))
)]
pub async fn change_password_handler(
    claims: JwtClaims,
    State(state): State<AppState>,
    ValidatedBody(body): ValidatedBody<ChangePasswordReq>,
) -> Result<Json<GenericResponse>, AppError> {
    let principal = current_principal(&state, &claims).await?;
    let matches = match principal.password_hash.as_deref() {
        Some(hash) => verify_password(&body.current_password, hash)?,
        None => false,
    };
    if !matches {
        return Err(AppError::BadRequestErr(
            "Current password is incorrect".into(),
        ));
    }
    let hash = hash_password(&body.new_password)?;
    let updated = state
        .principals
        .update_password(claims.kind, claims.sub, hash)
        .await?;
    if !updated {
        return Err(AppError::NotFound("Account not found".into()));
    }
    let res = GenericResponse {
        success: true,
        message: "Password changed successfully".to_owned(),
    };
    Ok(Json(res))
}
