use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;

use crate::{
    handlers::helper::record_activity,
    jwt::AdminClaims,
    models::*,
    state::AppState,
    utils::AppError,
};

fn request_not_found(id: u32) -> AppError {
    AppError::NotFound(format!("Request not found with id: {id}"))
}

/// Pending admin signup requests, newest first
#[utoipa::path(
    get,
    path = "/api/v1/admin/pending-requests",
    responses(
        (status = StatusCode::OK, description = "Pending requests", body = AdminRequestsResponse),
    ),
    tag = "Admin API",
    security(("authorization" = []))
)]
pub async fn pending_requests_handler(
    _claims: AdminClaims,
    State(state): State<AppState>,
) -> Result<Json<AdminRequestsResponse>, AppError> {
    let requests = state.admin_requests.list_pending().await?;
    let data = requests.into_iter().map(AdminRequestView::from).collect();
    Ok(Json(AdminRequestsResponse {
        success: true,
        data,
    }))
}

/// Rejected admin signup requests, newest first
#[utoipa::path(
    get,
    path = "/api/v1/admin/rejected-requests",
    responses(
        (status = StatusCode::OK, description = "Rejected requests", body = AdminRequestsResponse),
    ),
    tag = "Admin API",
    security(("authorization" = []))
)]
pub async fn rejected_requests_handler(
    _claims: AdminClaims,
    State(state): State<AppState>,
) -> Result<Json<AdminRequestsResponse>, AppError> {
    let requests = state.admin_requests.list_rejected().await?;
    let data = requests.into_iter().map(AdminRequestView::from).collect();
    Ok(Json(AdminRequestsResponse {
        success: true,
        data,
    }))
}

/// Approve a pending request, creating an active admin
#[utoipa::path(
    post,
    path = "/api/v1/admin/approve/{id}",
    params(("id" = u32, Path, description = "Request id")),
    responses(
        (status = StatusCode::OK, description = "Admin created", body = GenericResponse),
        (status = StatusCode::NOT_FOUND, description = "No pending request with this id", body = GenericResponse),
    ),
    tag = "Admin API",
    security(("authorization" = []))
)]
pub async fn approve_request_handler(
    AdminClaims(claims): AdminClaims,
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<GenericResponse>, AppError> {
    let request = state
        .admin_requests
        .take_pending(id)
        .await?
        .ok_or_else(|| request_not_found(id))?;
    let existing = state
        .principals
        .find_by_email(PrincipalKind::Admin, &request.email)
        .await;
    let new_admin = NewPrincipal {
        name: request.name.clone(),
        email: request.email.clone(),
        password_hash: request.password_hash.clone(),
        role: Some("Admin".to_owned()),
        dob: request.dob.clone(),
        approved_by: Some(claims.sub),
    };
    let created = match existing {
        Ok(Some(_)) => Err(AppError::BadRequestErr(format!(
            "An admin already exists with email: {}",
            request.email
        ))),
        Ok(None) => state
            .principals
            .insert(PrincipalKind::Admin, new_admin)
            .await
            .map_err(AppError::from),
        Err(err) => Err(AppError::from(err)),
    };
    let admin = match created {
        Ok(admin) => admin,
        Err(err) => {
            // put the request back so it can be retried
            if let Err(restore_err) = state.admin_requests.put_pending(request).await {
                tracing::error!("Unable to restore admin request {id}: {:?}", restore_err);
            }
            return Err(err);
        }
    };
    let details = format!("Approved admin request {id} for {}", admin.email);
    record_activity(&state, claims.sub, "approve_admin", details).await;
    Ok(Json(GenericResponse {
        success: true,
        message: format!("Admin {} approved", admin.name),
    }))
}

/// Reject a pending request
#[utoipa::path(
    post,
    path = "/api/v1/admin/reject/{id}",
    params(("id" = u32, Path, description = "Request id")),
    responses(
        (status = StatusCode::OK, description = "Request rejected", body = GenericResponse),
        (status = StatusCode::NOT_FOUND, description = "No pending request with this id", body = GenericResponse),
    ),
    tag = "Admin API",
    security(("authorization" = []))
)]
pub async fn reject_request_handler(
    AdminClaims(claims): AdminClaims,
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<GenericResponse>, AppError> {
    let mut request = state
        .admin_requests
        .take_pending(id)
        .await?
        .ok_or_else(|| request_not_found(id))?;
    request.status = RequestStatus::Rejected;
    request.password_hash = None;
    request.rejected_by = Some(claims.sub);
    request.rejected_at = Some(Utc::now());
    let email = request.email.clone();
    state.admin_requests.put_rejected(request).await?;
    record_activity(
        &state,
        claims.sub,
        "reject_admin",
        format!("Rejected admin request {id} for {email}"),
    )
    .await;
    Ok(Json(GenericResponse {
        success: true,
        message: "Request rejected".to_owned(),
    }))
}

/// Move a rejected request back to the pending list
#[utoipa::path(
    post,
    path = "/api/v1/admin/reinstate/{id}",
    params(("id" = u32, Path, description = "Request id")),
    responses(
        (status = StatusCode::OK, description = "Request reinstated", body = GenericResponse),
        (status = StatusCode::NOT_FOUND, description = "No rejected request with this id", body = GenericResponse),
    ),
    tag = "Admin API",
    security(("authorization" = []))
)]
pub async fn reinstate_request_handler(
    AdminClaims(claims): AdminClaims,
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<GenericResponse>, AppError> {
    let mut request = state
        .admin_requests
        .take_rejected(id)
        .await?
        .ok_or_else(|| request_not_found(id))?;
    request.status = RequestStatus::Pending;
    request.rejected_by = None;
    request.rejected_at = None;
    let email = request.email.clone();
    state.admin_requests.put_pending(request).await?;
    record_activity(
        &state,
        claims.sub,
        "reinstate_admin",
        format!("Reinstated admin request {id} for {email}"),
    )
    .await;
    Ok(Json(GenericResponse {
        success: true,
        message: "Request moved back to pending".to_owned(),
    }))
}
