use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    handlers::helper::record_activity, jwt::AdminClaims, models::*, state::AppState,
    utils::AppError,
};

/// Delete an apple
#[utoipa::path(
    delete,
    path = "/api/v1/apples/{id}",
    params(("id" = u32, Path, description = "Apple id")),
    responses(
        (status = StatusCode::OK, description = "Apple deleted", body = GenericResponse),
        (status = StatusCode::NOT_FOUND, description = "Apple not found", body = GenericResponse),
    ),
    tag = "Apple API",
    security(("authorization" = []))
)]
pub async fn delete_apple_handler(
    AdminClaims(claims): AdminClaims,
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<GenericResponse>, AppError> {
    if !state.apples.delete(id).await? {
        return Err(AppError::NotFound(format!("Apple not found with id: {id}")));
    }
    record_activity(&state, claims.sub, "delete_apple", format!("Deleted apple {id}")).await;
    Ok(Json(GenericResponse {
        success: true,
        message: "Apple deleted".to_owned(),
    }))
}
