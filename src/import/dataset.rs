use std::collections::HashMap;

use super::{DuplicateEntry, ImportError};
use crate::models::AppleDetails;

/// One data row of the uploaded spreadsheet
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    /// 0-based position among the data rows
    pub index: usize,
    /// line in the file, the header being line 1
    pub row_number: usize,
    pub cultivar_name: String,
    pub accession: Option<String>,
    /// raw `(header, value)` pairs in column order
    pub fields: Vec<(String, String)>,
    pub details: AppleDetails,
}

fn find_identifier_column(headers: &[String]) -> Option<usize> {
    headers.iter().position(|header| {
        let header = header.to_lowercase();
        header.contains("cultivar") || header.contains("name")
    })
}

fn find_accession_column(headers: &[String]) -> Option<usize> {
    headers.iter().position(|header| {
        let header = header.to_lowercase();
        header.contains("accession") || header == "acno"
    })
}

fn csv_error(err: csv::Error) -> ImportError {
    ImportError::InvalidDataset(err.to_string())
}

/// Parse CSV text with a header row into rows, in file order.
///
/// Blank lines are skipped and short rows are padded with empty values.
pub fn parse_dataset(text: &str) -> Result<Vec<ImportRow>, ImportError> {
    let text = text.trim_start_matches('\u{feff}');
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let headers = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_owned)
        .collect::<Vec<_>>();

    let mut records = vec![];
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        records.push(record);
    }
    if records.is_empty() {
        return Err(ImportError::EmptyDataset);
    }

    let name_col = find_identifier_column(&headers).ok_or(ImportError::MissingIdentifierColumn)?;
    let accession_col = find_accession_column(&headers);

    let rows = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let fields = headers
                .iter()
                .enumerate()
                .map(|(col, header)| (header.clone(), record.get(col).unwrap_or("").to_owned()))
                .collect::<Vec<_>>();
            let cultivar_name = fields[name_col].1.clone();
            let accession = accession_col
                .map(|col| fields[col].1.clone())
                .filter(|val| !val.is_empty());
            let details = AppleDetails::from_columns(
                fields
                    .iter()
                    .enumerate()
                    .filter(|(col, _)| *col != name_col)
                    .map(|(_, (header, value))| (header.as_str(), value.as_str())),
            );
            let row_number = record
                .position()
                .map(|pos| pos.line() as usize)
                .unwrap_or(index + 2);
            ImportRow {
                index,
                row_number,
                cultivar_name,
                accession,
                fields,
                details,
            }
        })
        .collect::<Vec<_>>();

    check_duplicates(&rows, accession_col.is_some())?;
    Ok(rows)
}

/// Rows sharing `accession|cultivar` (or just `cultivar` without an accession
/// column) are rejected, every occurrence is reported
fn check_duplicates(rows: &[ImportRow], has_accession: bool) -> Result<(), ImportError> {
    let mut seen: HashMap<String, Vec<usize>> = HashMap::new();
    for (pos, row) in rows.iter().enumerate() {
        if row.cultivar_name.is_empty() {
            continue;
        }
        let key = if has_accession {
            let accession = row.accession.as_deref().unwrap_or_default();
            format!("{}|{}", accession, row.cultivar_name)
        } else {
            row.cultivar_name.clone()
        };
        seen.entry(key).or_default().push(pos);
    }
    let mut duplicates = seen
        .into_values()
        .filter(|positions| positions.len() > 1)
        .flatten()
        .collect::<Vec<_>>();
    if duplicates.is_empty() {
        return Ok(());
    }
    duplicates.sort_unstable();
    let duplicates = duplicates
        .into_iter()
        .map(|pos| DuplicateEntry {
            row_number: rows[pos].row_number,
            name: rows[pos].cultivar_name.clone(),
        })
        .collect();
    Err(ImportError::DuplicateRow(duplicates))
}
