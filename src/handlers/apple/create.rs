use axum::{
    extract::{multipart::Field, Multipart, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    constants::*,
    handlers::helper::record_activity,
    jwt::AdminClaims,
    models::*,
    state::AppState,
    utils::{base_file_name, has_image_extension, AppError},
};

pub(crate) async fn read_bytes(field: Field<'_>) -> Result<Vec<u8>, AppError> {
    let name = field.name().unwrap_or_default().to_owned();
    let data = field.bytes().await.map_err(|err| {
        tracing::debug!("{:?}", err);
        AppError::BadRequestErr(format!("Unable to read field: {name}"))
    })?;
    Ok(data.to_vec())
}

/// Create one apple with its images
///
/// Multipart form with an `appleData` JSON field and up to ten `images`.
#[utoipa::path(
    post,
    path = "/api/v1/apples/single-upload",
    responses(
        (status = StatusCode::CREATED, description = "Apple created", body = AppleResponse),
        (status = StatusCode::BAD_REQUEST, description = "Invalid form data", body = GenericResponse),
    ),
    tag = "Apple API",
    security(("authorization" = []))
)]
pub async fn single_upload_handler(
    AdminClaims(claims): AdminClaims,
    State(state): State<AppState>,
    mut form: Multipart,
) -> Result<(StatusCode, Json<AppleResponse>), AppError> {
    let mut input: Option<AppleInput> = None;
    let mut files: Vec<(String, Vec<u8>)> = Vec::new();
    while let Some(field) = form
        .next_field()
        .await
        .map_err(|err| AppError::BadRequestErr(err.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "appleData" => {
                let data = read_bytes(field).await?;
                let parsed = serde_json::from_slice::<AppleInput>(&data).map_err(|err| {
                    AppError::BadRequestErr(format!("Invalid appleData: {err}"))
                })?;
                input = Some(parsed);
            }
            "images" => {
                let file_name = base_file_name(field.file_name().unwrap_or_default()).to_owned();
                if !has_image_extension(&file_name) {
                    let err = format!("Only image files are allowed: {file_name}");
                    return Err(AppError::BadRequestErr(err));
                }
                if files.len() == SINGLE_UPLOAD_MAX_IMAGES {
                    let err = format!("At most {SINGLE_UPLOAD_MAX_IMAGES} images are allowed");
                    return Err(AppError::BadRequestErr(err));
                }
                files.push((file_name, read_bytes(field).await?));
            }
            other => tracing::debug!("Ignoring unexpected form field {other}"),
        }
    }
    let input = input.ok_or(AppError::BadRequestErr("appleData is required".into()))?;
    input
        .validate()
        .map_err(|err| AppError::BadRequestErr(err.to_string()))?;
    let cultivar_name = input.cultivar_name.trim().to_owned();
    if cultivar_name.is_empty() {
        return Err(AppError::BadRequestErr("cultivarName is required".into()));
    }

    let mut images = Vec::with_capacity(files.len());
    for (file_name, bytes) in files {
        images.push(state.images.save(&file_name, bytes).await?);
    }
    let new_apple = NewApple {
        cultivar_name,
        details: input.details.with_defaults(),
        images,
        created_by: Some(claims.sub),
    };
    let apple = state.apples.insert(new_apple).await?;
    let details = format!("Created apple {} ({})", apple.id, apple.cultivar_name);
    record_activity(&state, claims.sub, "create_apple", details).await;
    let res = AppleResponse {
        success: true,
        data: apple,
    };
    Ok((StatusCode::CREATED, Json(res)))
}
