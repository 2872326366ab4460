use serde::Serialize;
use utoipa::ToSchema;

/// A row that shares its identity key with at least one other row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateEntry {
    pub row_number: usize,
    pub name: String,
}

fn describe(duplicates: &[DuplicateEntry]) -> String {
    duplicates
        .iter()
        .map(|dup| format!("row {} ({})", dup.row_number, dup.name))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    #[error("The dataset does not contain any rows")]
    EmptyDataset,

    #[error("The dataset needs a column whose header contains \"cultivar\" or \"name\"")]
    MissingIdentifierColumn,

    #[error("Duplicate rows found: {}", describe(.0))]
    DuplicateRow(Vec<DuplicateEntry>),

    #[error("Unable to read the dataset: {0}")]
    InvalidDataset(String),

    #[error("No images (jpg, jpeg, png, gif, bmp) were found in the archive")]
    NoImagesFound,

    #[error("Unable to read the image archive: {0}")]
    InvalidArchive(String),

    #[error("Image {0} is already matched to a row")]
    ImageAlreadyClaimed(String),

    #[error("Image {0} is not part of the uploaded archive")]
    UnknownImage(String),

    #[error("Row {0} is not waiting for a manual match")]
    RowNotUnmatched(usize),

    #[error("{0}")]
    RecordCreationFailed(String),
}
