use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};

use super::create::read_bytes;
use crate::{
    handlers::helper::record_activity,
    import::{self, ImportError, ManualOverrides, PreparedImport},
    jwt::AdminClaims,
    models::*,
    state::AppState,
    utils::AppError,
};

/// Raw parts of a bulk import form
#[derive(Debug, Default)]
struct ImportForm {
    dataset: Option<Vec<u8>>,
    archive: Option<Vec<u8>>,
    overrides: Vec<OverrideEntry>,
}

impl ImportForm {
    async fn read(mut form: Multipart) -> Result<Self, AppError> {
        let mut res = Self::default();
        while let Some(field) = form
            .next_field()
            .await
            .map_err(|err| AppError::BadRequestErr(err.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_owned();
            match name.as_str() {
                "dataset" => res.dataset = Some(read_bytes(field).await?),
                "images" => res.archive = Some(read_bytes(field).await?),
                "overrides" => {
                    let data = read_bytes(field).await?;
                    res.overrides = serde_json::from_slice(&data).map_err(|err| {
                        AppError::BadRequestErr(format!("Invalid overrides: {err}"))
                    })?;
                }
                other => tracing::debug!("Ignoring unexpected form field {other}"),
            }
        }
        Ok(res)
    }

    fn prepare(&self) -> Result<PreparedImport, AppError> {
        let dataset = self
            .dataset
            .as_deref()
            .ok_or(AppError::BadRequestErr("dataset file is required".into()))?;
        let archive = self
            .archive
            .as_deref()
            .ok_or(AppError::BadRequestErr("images archive is required".into()))?;
        let dataset = std::str::from_utf8(dataset).map_err(|_| {
            AppError::Import(ImportError::InvalidDataset(
                "dataset is not valid UTF-8 text".into(),
            ))
        })?;
        import::prepare(dataset, archive).map_err(AppError::Import)
    }
}

/// Preview a bulk import
///
/// Parses the CSV dataset and the ZIP of images and returns the automatic
/// matches together with what is left for manual resolution. Nothing is
/// written.
#[utoipa::path(
    post,
    path = "/api/v1/apples/bulk-import/preview",
    responses(
        (status = StatusCode::OK, description = "Match report", body = ImportPreviewResponse),
        (status = StatusCode::BAD_REQUEST, description = "Invalid dataset or archive", body = GenericResponse),
    ),
    tag = "Apple API",
    security(("authorization" = []))
)]
pub async fn bulk_import_preview_handler(
    _claims: AdminClaims,
    form: Multipart,
) -> Result<Json<ImportPreviewResponse>, AppError> {
    let form = ImportForm::read(form).await?;
    let prepared = form.prepare()?;
    Ok(Json(ImportPreviewResponse {
        success: true,
        data: prepared.report(),
    }))
}

/// Commit a bulk import
///
/// Creates one apple per row with matched or manually assigned images.
/// Rows fail independently, the report lists each failure.
#[utoipa::path(
    post,
    path = "/api/v1/apples/bulk-import",
    responses(
        (status = StatusCode::CREATED, description = "Import report", body = ImportCommitResponse),
        (status = StatusCode::BAD_REQUEST, description = "Invalid dataset, archive or overrides", body = GenericResponse),
    ),
    tag = "Apple API",
    security(("authorization" = []))
)]
pub async fn bulk_import_handler(
    AdminClaims(claims): AdminClaims,
    State(state): State<AppState>,
    form: Multipart,
) -> Result<(StatusCode, Json<ImportCommitResponse>), AppError> {
    let form = ImportForm::read(form).await?;
    let prepared = form.prepare()?;
    let overrides = ManualOverrides::from_entries(&prepared.result, &form.overrides)
        .map_err(AppError::Import)?;
    let report = import::commit(
        &prepared.rows,
        &prepared.result,
        &overrides,
        &prepared.images,
        state.images.as_ref(),
        state.apples.as_ref(),
        Some(claims.sub),
    )
    .await;
    let details = format!(
        "Bulk import: {} of {} records created",
        report.stats.successful, report.stats.total
    );
    record_activity(&state, claims.sub, "bulk_import", details).await;
    Ok((
        StatusCode::CREATED,
        Json(ImportCommitResponse {
            success: true,
            data: report,
        }),
    ))
}
