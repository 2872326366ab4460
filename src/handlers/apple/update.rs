use axum::{
    async_trait,
    body::Body,
    extract::{FromRequest, Multipart, Path, State},
    http::{header::CONTENT_TYPE, Request},
    Json,
};
use validator::Validate;

use super::create::read_bytes;
use crate::{
    constants::*,
    handlers::helper::record_activity,
    jwt::AdminClaims,
    models::*,
    state::AppState,
    utils::{base_file_name, has_image_extension, AppError, ValidatedBody},
};

/// An update sent either as plain JSON or as a multipart form carrying
/// `appleData` and new `images`
pub enum AppleUpdateForm {
    Json(AppleUpdateInput),
    Multipart(Multipart),
}

#[async_trait]
impl<S> FromRequest<S, Body> for AppleUpdateForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|val| val.to_str().ok())
            .map_or(false, |val| val.starts_with("multipart/form-data"));
        if is_multipart {
            let form = Multipart::from_request(req, state)
                .await
                .map_err(|err| AppError::BadRequestErr(err.to_string()))?;
            return Ok(Self::Multipart(form));
        }
        let ValidatedBody(input) = ValidatedBody::<AppleUpdateInput>::from_request(req, state).await?;
        Ok(Self::Json(input))
    }
}

async fn read_form(mut form: Multipart) -> Result<(AppleUpdateInput, Vec<(String, Vec<u8>)>), AppError> {
    let mut input = AppleUpdateInput::default();
    let mut files = Vec::new();
    while let Some(field) = form
        .next_field()
        .await
        .map_err(|err| AppError::BadRequestErr(err.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "appleData" => {
                let data = read_bytes(field).await?;
                input = serde_json::from_slice::<AppleUpdateInput>(&data).map_err(|err| {
                    AppError::BadRequestErr(format!("Invalid appleData: {err}"))
                })?;
                input
                    .validate()
                    .map_err(|err| AppError::BadRequestErr(err.to_string()))?;
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
    Ok((input, files))
}

/// Update some fields of an apple
///
/// Accepts a JSON patch, or a multipart form with an `appleData` patch and up
/// to ten new `images`. New images replace the stored ones unless
/// `keepExistingImages` is set, in which case they are appended to
/// `existingImages` (or to the stored list when that is absent).
#[utoipa::path(
    put,
    path = "/api/v1/apples/{id}",
    params(("id" = u32, Path, description = "Apple id")),
    request_body = AppleUpdateInput,
    responses(
        (status = StatusCode::OK, description = "Updated apple", body = AppleResponse),
        (status = StatusCode::BAD_REQUEST, description = "Nothing to update", body = GenericResponse),
        (status = StatusCode::NOT_FOUND, description = "Apple not found", body = GenericResponse),
    ),
    tag = "Apple API",
    security(("authorization" = []))
)]
pub async fn update_apple_handler(
    AdminClaims(claims): AdminClaims,
    State(state): State<AppState>,
    Path(id): Path<u32>,
    form: AppleUpdateForm,
) -> Result<Json<AppleResponse>, AppError> {
    let not_found = || AppError::NotFound(format!("Apple not found with id: {id}"));
    let (input, files) = match form {
        AppleUpdateForm::Json(input) => (input, vec![]),
        AppleUpdateForm::Multipart(form) => read_form(form).await?,
    };
    let mut patch = input.patch;
    patch.cultivar_name = patch.cultivar_name.map(|name| name.trim().to_owned());
    if patch.cultivar_name.as_deref() == Some("") {
        return Err(AppError::BadRequestErr("cultivarName cannot be empty".into()));
    }
    let added = files.len();
    if added > 0 {
        let current = state.apples.get(id).await?.ok_or_else(not_found)?;
        let mut images = match (input.keep_existing_images, input.existing_images) {
            (true, Some(existing)) => existing,
            (true, None) => current.images,
            (false, _) => vec![],
        };
        for (file_name, bytes) in files {
            images.push(state.images.save(&file_name, bytes).await?);
        }
        patch.images = Some(images);
    }
    if patch.is_empty() {
        return Err(AppError::BadRequestErr("Nothing to update".into()));
    }
    let apple = state.apples.update(id, patch).await?.ok_or_else(not_found)?;
    let mut details = format!("Updated apple {} ({})", apple.id, apple.cultivar_name);
    if added > 0 {
        details.push_str(&format!(", added {added} image(s)"));
    }
    record_activity(&state, claims.sub, "update_apple", details).await;
    Ok(Json(AppleResponse {
        success: true,
        data: apple,
    }))
}
