use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use utoipa::ToSchema;

use super::{ImageSet, ImportError, ImportRow};
use crate::models::OverrideEntry;

/// Lowercase and keep only `[a-z0-9_]`
pub fn normalize(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(|ch| matches!(ch, 'a'..='z' | '0'..='9' | '_'))
        .collect()
}

/// Expected image name fragment of a row
pub fn row_fragment(row: &ImportRow) -> String {
    match row.accession.as_deref() {
        Some(accession) if !accession.is_empty() => {
            normalize(&format!("{}_{}", accession, row.cultivar_name))
        }
        _ => normalize(&row.cultivar_name),
    }
}

/// Normalized image name without its extension
pub fn image_stem(key: &str) -> String {
    let stem = key.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(key);
    normalize(stem)
}

/// Permissive pairing rule, tolerates suffixes like `_1` or `_crosssection`
fn is_match(stem: &str, fragment: &str) -> bool {
    if stem.is_empty() || fragment.is_empty() {
        return false;
    }
    stem.contains(fragment) || fragment.contains(stem) || stem.starts_with(fragment)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchedPair {
    pub row_index: usize,
    pub image_key: String,
}

/// Automatic pairing of rows and images
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub matched: Vec<MatchedPair>,
    /// rows without any image, by row index
    pub unmatched_rows: Vec<usize>,
    pub unmatched_images: Vec<String>,
    /// rows with a blank cultivar name
    pub skipped_rows: Vec<usize>,
}

impl MatchResult {
    pub fn images_for_row(&self, row_index: usize) -> Vec<&str> {
        self.matched
            .iter()
            .filter(|pair| pair.row_index == row_index)
            .map(|pair| pair.image_key.as_str())
            .collect()
    }

    pub fn is_matched_image(&self, image_key: &str) -> bool {
        self.matched.iter().any(|pair| pair.image_key == image_key)
    }

    pub fn is_unmatched_image(&self, image_key: &str) -> bool {
        self.unmatched_images.iter().any(|key| key == image_key)
    }

    pub fn is_unmatched_row(&self, row_index: usize) -> bool {
        self.unmatched_rows.contains(&row_index)
    }
}

/// Pair rows with images. Rows are visited in file order and images in key
/// order; an image claimed by an earlier row is not offered to later rows.
pub fn match_rows_to_images(rows: &[ImportRow], images: &ImageSet) -> MatchResult {
    let stems = images
        .keys()
        .map(|key| (key, image_stem(key)))
        .collect::<Vec<_>>();
    let mut claimed = BTreeSet::new();
    let mut result = MatchResult::default();
    for row in rows {
        if row.cultivar_name.trim().is_empty() {
            result.skipped_rows.push(row.index);
            continue;
        }
        let fragment = row_fragment(row);
        let mut found = false;
        for (key, stem) in &stems {
            if claimed.contains(key) || !is_match(stem, &fragment) {
                continue;
            }
            claimed.insert(*key);
            result.matched.push(MatchedPair {
                row_index: row.index,
                image_key: key.to_string(),
            });
            found = true;
        }
        if !found {
            result.unmatched_rows.push(row.index);
        }
    }
    result.unmatched_images = stems
        .iter()
        .filter(|(key, _)| !claimed.contains(key))
        .map(|(key, _)| key.to_string())
        .collect();
    result
}

/// Manual pairings of unmatched rows with unmatched images
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ManualOverrides {
    by_row: BTreeMap<usize, String>,
}

impl ManualOverrides {
    /// Bind `image_key` to an unmatched row. Calling again for the same row
    /// replaces its previous choice. `result` is never modified.
    pub fn apply(
        &mut self,
        result: &MatchResult,
        row_index: usize,
        image_key: &str,
    ) -> Result<(), ImportError> {
        if !result.is_unmatched_image(image_key) {
            if result.is_matched_image(image_key) {
                return Err(ImportError::ImageAlreadyClaimed(image_key.to_owned()));
            }
            return Err(ImportError::UnknownImage(image_key.to_owned()));
        }
        let held_elsewhere = self
            .by_row
            .iter()
            .any(|(row, key)| *row != row_index && key == image_key);
        if held_elsewhere {
            return Err(ImportError::ImageAlreadyClaimed(image_key.to_owned()));
        }
        if !result.is_unmatched_row(row_index) {
            return Err(ImportError::RowNotUnmatched(row_index));
        }
        self.by_row.insert(row_index, image_key.to_owned());
        Ok(())
    }

    /// Apply a list of overrides in order
    pub fn from_entries(result: &MatchResult, entries: &[OverrideEntry]) -> Result<Self, ImportError> {
        let mut overrides = Self::default();
        for entry in entries {
            overrides.apply(result, entry.row_index, &entry.image_key)?;
        }
        Ok(overrides)
    }

    pub fn get(&self, row_index: usize) -> Option<&str> {
        self.by_row.get(&row_index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_row.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_row.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{parse_dataset, ImportImage};

    fn images(keys: &[&str]) -> ImageSet {
        let mut set = ImageSet::default();
        for key in keys {
            set.insert(ImportImage {
                key: key.to_string(),
                entry_name: key.to_string(),
                bytes: vec![],
            });
        }
        set
    }

    fn pair(row_index: usize, image_key: &str) -> MatchedPair {
        MatchedPair {
            row_index,
            image_key: image_key.to_owned(),
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("12345_Honeycrisp (1)"), "12345_honeycrisp1");
        assert_eq!(normalize("Cox's Orange-Pippin"), "coxsorangepippin");
        assert_eq!(normalize("ÉPICE"), "pice");
        assert_eq!(normalize("!!"), "");
    }

    #[test]
    fn test_accession_row_binds_multiple_images() {
        let rows = parse_dataset("accession,cultivar\n12345,Honeycrisp\n").unwrap();
        let set = images(&["12345_Honeycrisp_1.jpg", "12345_Honeycrisp_2.jpg"]);
        let result = match_rows_to_images(&rows, &set);
        assert_eq!(
            result.matched,
            vec![
                pair(0, "12345_Honeycrisp_1.jpg"),
                pair(0, "12345_Honeycrisp_2.jpg")
            ]
        );
        assert!(result.unmatched_images.is_empty());
        assert!(result.unmatched_rows.is_empty());
    }

    #[test]
    fn test_unmatched_rows_and_images() {
        let rows = parse_dataset("cultivar\nGala\nFuji\n").unwrap();
        let set = images(&["gala_crosssection.png", "mystery.jpg"]);
        let result = match_rows_to_images(&rows, &set);
        assert_eq!(result.matched, vec![pair(0, "gala_crosssection.png")]);
        assert_eq!(result.unmatched_rows, vec![1]);
        assert_eq!(result.unmatched_images, vec!["mystery.jpg".to_string()]);
    }

    #[test]
    fn test_fragment_containing_image_name_matches() {
        let rows = parse_dataset("cultivar\nGolden Delicious Reinders\n").unwrap();
        let set = images(&["GoldenDelicious.jpg"]);
        let result = match_rows_to_images(&rows, &set);
        assert_eq!(result.matched, vec![pair(0, "GoldenDelicious.jpg")]);
    }

    #[test]
    fn test_first_row_in_file_order_wins() {
        let rows = parse_dataset("cultivar\nHoneycrisp\nHoneycrisp2\n").unwrap();
        let set = images(&["honeycrisp2.jpg"]);
        let result = match_rows_to_images(&rows, &set);
        assert_eq!(result.matched, vec![pair(0, "honeycrisp2.jpg")]);
        assert_eq!(result.unmatched_rows, vec![1]);
    }

    #[test]
    fn test_blank_names_are_skipped() {
        let rows = parse_dataset("cultivar,taste\n,sweet\nGala,mild\n").unwrap();
        let set = images(&["gala.jpg", "other.jpg"]);
        let result = match_rows_to_images(&rows, &set);
        assert_eq!(result.skipped_rows, vec![0]);
        assert_eq!(result.matched, vec![pair(1, "gala.jpg")]);
        assert_eq!(result.unmatched_images, vec!["other.jpg".to_string()]);
    }

    #[test]
    fn test_matching_is_deterministic() {
        let rows = parse_dataset("accession,cultivar\n1,Gala\n2,Fuji\n,Gala Royal\n").unwrap();
        let set = images(&["1_gala.jpg", "2_fuji_a.jpg", "galaroyal.png", "x.gif"]);
        let first = match_rows_to_images(&rows, &set);
        let second = match_rows_to_images(&rows, &set);
        assert_eq!(first, second);
    }

    #[test]
    fn test_override_rejects_claimed_image() {
        let rows = parse_dataset("cultivar\nGala\nFuji\n").unwrap();
        let set = images(&["gala.jpg", "apple.jpg"]);
        let result = match_rows_to_images(&rows, &set);
        let mut overrides = ManualOverrides::default();
        assert_eq!(
            overrides.apply(&result, 1, "gala.jpg"),
            Err(ImportError::ImageAlreadyClaimed("gala.jpg".into()))
        );
        assert_eq!(
            overrides.apply(&result, 1, "nope.jpg"),
            Err(ImportError::UnknownImage("nope.jpg".into()))
        );
        assert_eq!(
            overrides.apply(&result, 0, "apple.jpg"),
            Err(ImportError::RowNotUnmatched(0))
        );
        assert!(overrides.is_empty());
    }

    #[test]
    fn test_override_last_call_wins() {
        let rows = parse_dataset("cultivar\nFuji\nBraeburn\n").unwrap();
        let set = images(&["one.jpg", "two.jpg"]);
        let result = match_rows_to_images(&rows, &set);
        let before = result.clone();
        let mut overrides = ManualOverrides::default();
        overrides.apply(&result, 0, "one.jpg").unwrap();
        overrides.apply(&result, 0, "two.jpg").unwrap();
        assert_eq!(overrides.get(0), Some("two.jpg"));
        // one.jpg is free again after the row moved to two.jpg
        overrides.apply(&result, 1, "one.jpg").unwrap();
        assert_eq!(
            overrides.apply(&result, 1, "two.jpg"),
            Err(ImportError::ImageAlreadyClaimed("two.jpg".into()))
        );
        assert_eq!(overrides.len(), 2);
        assert_eq!(result, before);
    }
}
