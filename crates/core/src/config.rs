use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Extensions treated as images when no override is given.
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// Time zone used to turn filesystem timestamps into wall-clock dates.
///
/// EXIF capture dates carry no zone and are used as written; only the
/// creation-time fallback depends on this choice.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClockZone {
    #[default]
    Local,
    Utc,
}

#[derive(Debug, Clone)]
pub struct RenameOptions {
    pub directory: PathBuf,
    pub rename: bool,
    pub adjust_hours: i64,
    pub image_extensions: Vec<String>,
    pub include_hidden: bool,
    pub clock_zone: ClockZone,
}

impl Default for RenameOptions {
    fn default() -> Self {
        Self {
            directory: PathBuf::new(),
            rename: false,
            adjust_hours: 0,
            image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            include_hidden: false,
            clock_zone: ClockZone::Local,
        }
    }
}

impl RenameOptions {
    pub fn new(directory: impl Into<PathBuf>, rename: bool, adjust_hours: i64) -> Self {
        Self {
            directory: directory.into(),
            rename,
            adjust_hours,
            ..Self::default()
        }
    }

    /// Adds extensions to the image set, ignoring a leading dot and duplicates.
    pub fn with_extra_image_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for ext in extensions {
            let ext = ext.as_ref().trim().trim_start_matches('.');
            if ext.is_empty() {
                continue;
            }
            if !self
                .image_extensions
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
            {
                self.image_extensions.push(ext.to_ascii_lowercase());
            }
        }
        self
    }

    pub fn is_image_extension(&self, ext: &str) -> bool {
        self.image_extensions
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
    }
}
