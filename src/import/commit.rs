use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ImageSet, ImportError, ImportRow, ManualOverrides, MatchResult};
use crate::{
    models::{Apple, NewApple},
    stores::{AppleStore, ImageStore},
};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ImportStats {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ImportFailure {
    pub index: usize,
    pub error: String,
}

/// Outcome of a committed import, one entry per attempted row
#[derive(Debug, Default, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub stats: ImportStats,
    pub succeeded_records: Vec<Apple>,
    pub failures: Vec<ImportFailure>,
}

/// Create one apple per row that has automatic matches or a manual override.
/// Rows are independent, a failing row is reported and the rest continue.
pub async fn commit(
    rows: &[ImportRow],
    result: &MatchResult,
    overrides: &ManualOverrides,
    images: &ImageSet,
    image_store: &dyn ImageStore,
    apple_store: &dyn AppleStore,
    created_by: Option<u32>,
) -> ImportReport {
    let mut report = ImportReport::default();
    for row in rows {
        let mut keys = result.images_for_row(row.index);
        if let Some(key) = overrides.get(row.index) {
            keys.push(key);
        }
        if keys.is_empty() {
            continue;
        }
        report.stats.total += 1;
        match commit_row(row, &keys, images, image_store, apple_store, created_by).await {
            Ok(apple) => {
                report.stats.successful += 1;
                report.succeeded_records.push(apple);
            }
            Err(err) => {
                tracing::debug!("Import of row {} failed: {}", row.row_number, err);
                report.stats.failed += 1;
                report.failures.push(ImportFailure {
                    index: row.index,
                    error: err.to_string(),
                });
            }
        }
    }
    tracing::debug!(
        "Import committed: {} of {} rows created",
        report.stats.successful,
        report.stats.total
    );
    report
}

async fn commit_row(
    row: &ImportRow,
    keys: &[&str],
    images: &ImageSet,
    image_store: &dyn ImageStore,
    apple_store: &dyn AppleStore,
    created_by: Option<u32>,
) -> Result<Apple, ImportError> {
    let mut paths = Vec::with_capacity(keys.len());
    for key in keys {
        let image = images
            .get(key)
            .ok_or_else(|| ImportError::UnknownImage(key.to_string()))?;
        let path = image_store
            .save(&image.key, image.bytes.clone())
            .await
            .map_err(|err| {
                ImportError::RecordCreationFailed(format!("Unable to store image {key}: {err}"))
            })?;
        paths.push(path);
    }
    let new_apple = NewApple {
        cultivar_name: row.cultivar_name.clone(),
        details: row.details.clone(),
        images: paths,
        created_by,
    };
    apple_store
        .insert(new_apple)
        .await
        .map_err(|err| ImportError::RecordCreationFailed(err.to_string()))
}
