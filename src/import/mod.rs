//! Bulk import of apple records from a CSV dataset and a ZIP of images.
//!
//! The flow is parse, extract, match, optionally override, then commit. Both
//! inputs are fully validated before any record is written; once committing,
//! each row succeeds or fails on its own.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod archive;
pub mod commit;
pub mod dataset;
pub mod error;
pub mod matcher;

pub use archive::{extract_images, extract_images_within, ArchiveLimits, ImageSet, ImportImage};
pub use commit::{commit, ImportFailure, ImportReport, ImportStats};
pub use dataset::{parse_dataset, ImportRow};
pub use error::{DuplicateEntry, ImportError};
pub use matcher::{match_rows_to_images, normalize, ManualOverrides, MatchResult, MatchedPair};

/// Parsed and matched inputs of one import request
#[derive(Debug)]
pub struct PreparedImport {
    pub rows: Vec<ImportRow>,
    pub images: ImageSet,
    pub result: MatchResult,
}

/// Validate both inputs and compute the automatic matches
pub fn prepare(dataset: &str, archive: &[u8]) -> Result<PreparedImport, ImportError> {
    let rows = parse_dataset(dataset)?;
    let images = extract_images(archive)?;
    let result = match_rows_to_images(&rows, &images);
    tracing::debug!(
        "Matched {} images, {} rows and {} images left unmatched",
        result.matched.len(),
        result.unmatched_rows.len(),
        result.unmatched_images.len()
    );
    Ok(PreparedImport {
        rows,
        images,
        result,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RowSummary {
    pub row_index: usize,
    pub row_number: usize,
    pub cultivar_name: String,
    pub accession: Option<String>,
}

impl From<&ImportRow> for RowSummary {
    fn from(row: &ImportRow) -> Self {
        Self {
            row_index: row.index,
            row_number: row.row_number,
            cultivar_name: row.cultivar_name.clone(),
            accession: row.accession.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchedRow {
    #[serde(flatten)]
    pub row: RowSummary,
    pub images: Vec<String>,
}

/// What an admin sees before deciding on manual overrides
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub total_rows: usize,
    pub total_images: usize,
    pub matched: Vec<MatchedRow>,
    pub unmatched_rows: Vec<RowSummary>,
    pub unmatched_images: Vec<String>,
    pub skipped_rows: Vec<RowSummary>,
}

impl PreparedImport {
    pub fn report(&self) -> MatchReport {
        let summaries = |indexes: &[usize]| {
            indexes
                .iter()
                .filter_map(|idx| self.rows.get(*idx))
                .map(RowSummary::from)
                .collect::<Vec<_>>()
        };
        let matched = self
            .rows
            .iter()
            .filter_map(|row| {
                let images = self.result.images_for_row(row.index);
                if images.is_empty() {
                    return None;
                }
                Some(MatchedRow {
                    row: RowSummary::from(row),
                    images: images.into_iter().map(str::to_owned).collect(),
                })
            })
            .collect();
        MatchReport {
            total_rows: self.rows.len(),
            total_images: self.images.len(),
            matched,
            unmatched_rows: summaries(&self.result.unmatched_rows),
            unmatched_images: self.result.unmatched_images.clone(),
            skipped_rows: summaries(&self.result.skipped_rows),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::archive::tests::build_zip;

    #[test]
    fn test_prepare_and_report() {
        let csv = "accession,cultivar_name\n12345,Honeycrisp\n,Gala\n,\n";
        let zip = build_zip(&[
            ("12345_Honeycrisp_1.jpg", "1"),
            ("12345_Honeycrisp_2.jpg", "2"),
            ("unknown.png", "3"),
        ]);
        let prepared = prepare(csv, &zip).unwrap();
        let report = prepared.report();
        assert_eq!(report.total_rows, 2);
        assert_eq!(report.total_images, 3);
        assert_eq!(report.matched.len(), 1);
        assert_eq!(report.matched[0].row.cultivar_name, "Honeycrisp");
        assert_eq!(report.matched[0].row.row_number, 2);
        assert_eq!(report.matched[0].images.len(), 2);
        assert_eq!(report.unmatched_rows[0].cultivar_name, "Gala");
        assert_eq!(report.unmatched_images, vec!["unknown.png".to_string()]);
    }

    #[test]
    fn test_dataset_errors_come_first() {
        let zip = build_zip(&[("notes.txt", "x")]);
        let err = prepare("cultivar\nGala\nGala\n", &zip).unwrap_err();
        assert!(matches!(err, ImportError::DuplicateRow(_)));
        let err = prepare("cultivar\nGala\n", &zip).unwrap_err();
        assert_eq!(err, ImportError::NoImagesFound);
    }
}
