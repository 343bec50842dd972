use crate::config::RenameOptions;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DateSource {
    ExifCaptureTag,
    /// Image whose metadata has no usable capture date.
    FileCreationNoMetadata,
    FileCreationNotImage,
}

impl DateSource {
    pub fn is_fallback(self) -> bool {
        !matches!(self, DateSource::ExifCaptureTag)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CaptureDate {
    pub value: NaiveDateTime,
    pub source: DateSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub path: PathBuf,
    pub name: String,
    /// Text after the last dot, case preserved.
    pub extension: Option<String>,
    pub is_image: bool,
}

impl DirectoryEntry {
    /// Returns `None` for paths without a UTF-8 file name.
    pub fn classify(path: &Path, options: &RenameOptions) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_string();
        let extension = extension_of(&name).map(str::to_string);
        let is_image = extension
            .as_deref()
            .map(|ext| options.is_image_extension(ext))
            .unwrap_or(false);

        Some(Self {
            path: path.to_path_buf(),
            name,
            extension,
            is_image,
        })
    }
}

/// Everything after the last dot, even when nothing precedes it (`.jpg`).
pub(crate) fn extension_of(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(_, ext)| ext)
}

pub(crate) fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_keeps_extension_case_and_matches_images_case_insensitively() {
        let options = RenameOptions::default();
        let entry =
            DirectoryEntry::classify(Path::new("/photos/IMG_0001.JPG"), &options).expect("utf-8");
        assert_eq!(entry.name, "IMG_0001.JPG");
        assert_eq!(entry.extension.as_deref(), Some("JPG"));
        assert!(entry.is_image);

        let entry =
            DirectoryEntry::classify(Path::new("/photos/clip.mov"), &options).expect("utf-8");
        assert_eq!(entry.extension.as_deref(), Some("mov"));
        assert!(!entry.is_image);
    }

    #[test]
    fn extension_comes_from_last_dot() {
        assert_eq!(extension_of("archive.tar.gz"), Some("gz"));
        assert_eq!(extension_of("trailing."), Some(""));
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of(".hidden"), Some("hidden"));
    }

    #[test]
    fn bare_dot_jpg_is_an_image() {
        let entry = DirectoryEntry::classify(Path::new("/photos/.jpg"), &RenameOptions::default())
            .expect("utf-8");
        assert_eq!(entry.extension.as_deref(), Some("jpg"));
        assert!(entry.is_image);
    }

    #[test]
    fn name_ending_in_jpg_without_dot_is_not_an_image() {
        let entry = DirectoryEntry::classify(Path::new("notajpg"), &RenameOptions::default())
            .expect("utf-8");
        assert!(!entry.is_image);
        assert_eq!(entry.extension, None);
    }

    #[test]
    fn fallback_sources_are_flagged() {
        assert!(!DateSource::ExifCaptureTag.is_fallback());
        assert!(DateSource::FileCreationNoMetadata.is_fallback());
        assert!(DateSource::FileCreationNotImage.is_fallback());
    }
}
