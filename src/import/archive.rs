use std::{
    collections::BTreeMap,
    io::{Cursor, Read},
};

use super::ImportError;
use crate::{
    constants::*,
    utils::{base_file_name, has_image_extension},
};

/// An image pulled out of the uploaded archive
#[derive(Debug, Clone, PartialEq)]
pub struct ImportImage {
    /// file name without any directory prefix, used for matching
    pub key: String,
    /// full entry path inside the archive
    pub entry_name: String,
    pub bytes: Vec<u8>,
}

/// Images keyed by base file name, iterated in key order
#[derive(Debug, Default, Clone)]
pub struct ImageSet {
    images: BTreeMap<String, ImportImage>,
}

impl ImageSet {
    /// Adds the image unless an image with the same key is already present
    pub fn insert(&mut self, image: ImportImage) -> bool {
        if self.images.contains_key(&image.key) {
            return false;
        }
        self.images.insert(image.key.clone(), image);
        true
    }

    pub fn get(&self, key: &str) -> Option<&ImportImage> {
        self.images.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.images.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.images.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Caps on how much an archive may inflate to
#[derive(Debug, Clone, Copy)]
pub struct ArchiveLimits {
    pub max_image_bytes: u64,
    pub max_total_bytes: u64,
}

impl Default for ArchiveLimits {
    fn default() -> Self {
        Self {
            max_image_bytes: MAX_IMPORT_IMAGE_BYTES,
            max_total_bytes: MAX_IMPORT_ARCHIVE_BYTES,
        }
    }
}

fn too_large(entry_name: &str, limit: u64) -> ImportError {
    ImportError::InvalidArchive(format!("{entry_name} inflates past the {limit} byte limit"))
}

// macOS archivers add resource forks next to every file
fn is_resource_fork(entry_name: &str, key: &str) -> bool {
    entry_name.starts_with("__MACOSX/") || key.starts_with("._")
}

/// Read every image entry of a ZIP archive. Directories, other file types
/// and later entries with an already seen base name are skipped.
pub fn extract_images(bytes: &[u8]) -> Result<ImageSet, ImportError> {
    extract_images_within(bytes, ArchiveLimits::default())
}

/// Same as [`extract_images`] with explicit size caps. The sizes an entry
/// declares are not trusted, reads stop one byte past the cap.
pub fn extract_images_within(
    bytes: &[u8],
    limits: ArchiveLimits,
) -> Result<ImageSet, ImportError> {
    let archive_err = |err: zip::result::ZipError| ImportError::InvalidArchive(err.to_string());
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(archive_err)?;
    let mut images = ImageSet::default();
    let mut remaining = limits.max_total_bytes;
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).map_err(archive_err)?;
        if file.is_dir() {
            continue;
        }
        let entry_name = file.name().to_owned();
        let key = base_file_name(&entry_name).to_owned();
        if key.is_empty() || !has_image_extension(&key) || is_resource_fork(&entry_name, &key) {
            continue;
        }
        if images.contains(&key) {
            tracing::debug!("Skipping {entry_name}, an image named {key} was already read");
            continue;
        }
        let cap = limits.max_image_bytes.min(remaining);
        if file.size() > cap {
            return Err(too_large(&entry_name, cap));
        }
        let mut data = Vec::new();
        (&mut file)
            .take(cap + 1)
            .read_to_end(&mut data)
            .map_err(|err| ImportError::InvalidArchive(err.to_string()))?;
        let read = data.len() as u64;
        if read > cap {
            return Err(too_large(&entry_name, cap));
        }
        remaining -= read;
        images.insert(ImportImage {
            key,
            entry_name,
            bytes: data,
        });
    }
    if images.is_empty() {
        return Err(ImportError::NoImagesFound);
    }
    tracing::debug!("Extracted {} images from archive", images.len());
    Ok(images)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Write;
    use zip::write::FileOptions;

    use super::*;

    /// Build an in-memory zip, names ending in '/' become directories
    pub(crate) fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default();
        for (name, data) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, options).unwrap();
            } else {
                writer.start_file(*name, options).unwrap();
                writer.write_all(data.as_bytes()).unwrap();
            }
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_extract_filters_and_strips_dirs() {
        let zip = build_zip(&[
            ("photos/", ""),
            ("photos/12345_Honeycrisp_1.JPG", "a"),
            ("photos/nested/Gala.png", "b"),
            ("readme.txt", "c"),
            ("__MACOSX/photos/._Gala.png", "d"),
        ]);
        let images = extract_images(&zip).unwrap();
        assert_eq!(
            images.keys().collect::<Vec<_>>(),
            vec!["12345_Honeycrisp_1.JPG", "Gala.png"]
        );
        let gala = images.get("Gala.png").unwrap();
        assert_eq!(gala.entry_name, "photos/nested/Gala.png");
        assert_eq!(gala.bytes, b"b".to_vec());
    }

    #[test]
    fn test_first_entry_wins_on_name_collision() {
        let zip = build_zip(&[("a/Fuji.jpg", "first"), ("b/Fuji.jpg", "second")]);
        let images = extract_images(&zip).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images.get("Fuji.jpg").unwrap().bytes, b"first".to_vec());
    }

    #[test]
    fn test_no_images_found() {
        let zip = build_zip(&[("notes.txt", "hello")]);
        assert_eq!(extract_images(&zip).unwrap_err(), ImportError::NoImagesFound);
    }

    /// Rewrite the uncompressed size every central directory record claims
    fn forge_declared_size(mut zip: Vec<u8>, size: u32) -> Vec<u8> {
        let mut pos = 0;
        while pos + 28 <= zip.len() {
            if zip[pos..pos + 4] == [0x50, 0x4b, 0x01, 0x02] {
                zip[pos + 24..pos + 28].copy_from_slice(&size.to_le_bytes());
                pos += 46;
            } else {
                pos += 1;
            }
        }
        zip
    }

    #[test]
    fn test_forged_declared_size_is_rejected() {
        let zip = forge_declared_size(build_zip(&[("gala.jpg", "abc")]), 0x7fff_ff00);
        let err = extract_images(&zip).unwrap_err();
        assert!(matches!(err, ImportError::InvalidArchive(_)), "{err:?}");
    }

    #[test]
    fn test_image_over_limit_is_rejected() {
        let limits = ArchiveLimits {
            max_image_bytes: 4,
            max_total_bytes: 100,
        };
        let zip = build_zip(&[("fuji.jpg", "1234"), ("gala.jpg", "12345")]);
        let err = extract_images_within(&zip, limits).unwrap_err();
        assert!(matches!(err, ImportError::InvalidArchive(_)), "{err:?}");
        let zip = build_zip(&[("fuji.jpg", "1234")]);
        assert_eq!(extract_images_within(&zip, limits).unwrap().len(), 1);
    }

    #[test]
    fn test_total_inflated_budget() {
        let limits = ArchiveLimits {
            max_image_bytes: 4,
            max_total_bytes: 6,
        };
        let zip = build_zip(&[("fuji.jpg", "123"), ("gala.jpg", "123"), ("pink.jpg", "1")]);
        let err = extract_images_within(&zip, limits).unwrap_err();
        assert!(matches!(err, ImportError::InvalidArchive(_)), "{err:?}");
    }

    #[test]
    fn test_invalid_archive() {
        let err = extract_images(b"definitely not a zip").unwrap_err();
        assert!(matches!(err, ImportError::InvalidArchive(_)));
    }
}
