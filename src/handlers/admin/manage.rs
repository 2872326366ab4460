use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    handlers::helper::record_activity,
    jwt::AdminClaims,
    models::*,
    state::AppState,
    utils::{AppError, ValidatedBody},
};

fn admin_not_found(id: u32) -> AppError {
    AppError::NotFound(format!("Admin not found with id: {id}"))
}

/// All admins
#[utoipa::path(
    get,
    path = "/api/v1/admin/admins",
    responses(
        (status = StatusCode::OK, description = "Admins", body = AdminListResponse),
    ),
    tag = "Admin API",
    security(("authorization" = []))
)]
pub async fn list_admins_handler(
    _claims: AdminClaims,
    State(state): State<AppState>,
) -> Result<Json<AdminListResponse>, AppError> {
    let admins = state.principals.list(PrincipalKind::Admin).await?;
    let data = admins.iter().map(PrincipalProfile::from).collect();
    Ok(Json(AdminListResponse {
        success: true,
        data,
    }))
}

/// Activate or deactivate another admin
#[utoipa::path(
    put,
    path = "/api/v1/admin/toggle-status/{id}",
    params(("id" = u32, Path, description = "Admin id")),
    request_body = ToggleStatusReq,
    responses(
        (status = StatusCode::OK, description = "Status updated", body = GenericResponse),
        (status = StatusCode::BAD_REQUEST, description = "Admins cannot deactivate themselves", body = GenericResponse),
        (status = StatusCode::NOT_FOUND, description = "Admin not found", body = GenericResponse),
    ),
    tag = "Admin API",
    security(("authorization" = []))
)]
pub async fn toggle_status_handler(
    AdminClaims(claims): AdminClaims,
    State(state): State<AppState>,
    Path(id): Path<u32>,
    ValidatedBody(body): ValidatedBody<ToggleStatusReq>,
) -> Result<Json<GenericResponse>, AppError> {
    if id == claims.sub && !body.is_active {
        let err = "You cannot deactivate your own account".to_owned();
        return Err(AppError::BadRequestErr(err));
    }
    let updated = state
        .principals
        .set_active(PrincipalKind::Admin, id, body.is_active)
        .await?;
    if !updated {
        return Err(admin_not_found(id));
    }
    let action = if body.is_active { "activate_admin" } else { "deactivate_admin" };
    record_activity(&state, claims.sub, action, format!("Changed status of admin {id}")).await;
    let status = if body.is_active { "activated" } else { "deactivated" };
    Ok(Json(GenericResponse {
        success: true,
        message: format!("Admin {status}"),
    }))
}

/// Activity log of an admin, newest first
#[utoipa::path(
    get,
    path = "/api/v1/admin/activity/{id}",
    params(("id" = u32, Path, description = "Admin id")),
    responses(
        (status = StatusCode::OK, description = "Activity log", body = ActivityResponse),
        (status = StatusCode::NOT_FOUND, description = "Admin not found", body = GenericResponse),
    ),
    tag = "Admin API",
    security(("authorization" = []))
)]
pub async fn activity_handler(
    _claims: AdminClaims,
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<ActivityResponse>, AppError> {
    let admin = state
        .principals
        .find_by_id(PrincipalKind::Admin, id)
        .await?
        .ok_or_else(|| admin_not_found(id))?;
    let mut data = admin.activity_log;
    data.reverse();
    Ok(Json(ActivityResponse {
        success: true,
        data,
    }))
}

/// Delete another admin
#[utoipa::path(
    delete,
    path = "/api/v1/admin/delete/{id}",
    params(("id" = u32, Path, description = "Admin id")),
    responses(
        (status = StatusCode::OK, description = "Admin deleted", body = GenericResponse),
        (status = StatusCode::BAD_REQUEST, description = "Admins cannot delete themselves", body = GenericResponse),
        (status = StatusCode::NOT_FOUND, description = "Admin not found", body = GenericResponse),
    ),
    tag = "Admin API",
    security(("authorization" = []))
)]
pub async fn delete_admin_handler(
    AdminClaims(claims): AdminClaims,
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<GenericResponse>, AppError> {
    if id == claims.sub {
        let err = "You cannot delete your own account".to_owned();
        return Err(AppError::BadRequestErr(err));
    }
    if !state.principals.delete(PrincipalKind::Admin, id).await? {
        return Err(admin_not_found(id));
    }
    record_activity(&state, claims.sub, "delete_admin", format!("Deleted admin {id}")).await;
    Ok(Json(GenericResponse {
        success: true,
        message: "Admin deleted".to_owned(),
    }))
}
