use axum::{
    extract::{Path, State},
    Json,
};

use crate::{constants::*, models::*, state::AppState, utils::AppError};

/// All apples, newest first
#[utoipa::path(
    get,
    path = "/api/v1/apples/all",
    responses(
        (status = StatusCode::OK, description = "Apples", body = AppleListResponse),
    ),
    tag = "Apple API"
)]
pub async fn get_all_apples_handler(
    State(state): State<AppState>,
) -> Result<Json<AppleListResponse>, AppError> {
    let data = state.apples.list().await?;
    Ok(Json(AppleListResponse {
        success: true,
        data,
    }))
}

/// One apple by id
#[utoipa::path(
    get,
    path = "/api/v1/apples/{id}",
    params(("id" = u32, Path, description = "Apple id")),
    responses(
        (status = StatusCode::OK, description = "Apple", body = AppleResponse),
        (status = StatusCode::NOT_FOUND, description = "Apple not found", body = GenericResponse),
    ),
    tag = "Apple API"
)]
pub async fn get_apple_handler(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<AppleResponse>, AppError> {
    let apple = state
        .apples
        .get(id)
        .await?
        .ok_or(AppError::NotFound(format!("Apple not found with id: {id}")))?;
    Ok(Json(AppleResponse {
        success: true,
        data: apple,
    }))
}

/// Search apples by name, description, color or taste
#[utoipa::path(
    get,
    path = "/api/v1/apples/search/{query}",
    params(("query" = String, Path, description = "Case-insensitive search text")),
    responses(
        (status = StatusCode::OK, description = "Matching apples", body = AppleListResponse),
        (status = StatusCode::BAD_REQUEST, description = "Empty query", body = GenericResponse),
    ),
    tag = "Apple API"
)]
pub async fn search_apples_handler(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Result<Json<AppleListResponse>, AppError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::BadRequestErr("Search query is required".into()));
    }
    let data = state.apples.search(query, SEARCH_RESULT_LIMIT).await?;
    Ok(Json(AppleListResponse {
        success: true,
        data,
    }))
}
