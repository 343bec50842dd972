use chrono::NaiveDateTime;
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("cannot open file: {0}")]
    Open(#[source] io::Error),
    #[error("cannot parse metadata: {0}")]
    Parse(#[source] exif::Error),
}

/// Reads the original capture date (`DateTimeOriginal`) of the primary image.
///
/// `Ok(None)` means the container was readable but carries no usable tag:
/// no EXIF block at all, no `DateTimeOriginal`, or a value that is not a date.
pub fn read_capture_date(path: &Path) -> Result<Option<NaiveDateTime>, MetadataError> {
    let file = File::open(path).map_err(MetadataError::Open)?;
    let mut buf = BufReader::new(file);
    let exif = match Reader::new().read_from_container(&mut buf) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => {
            tracing::debug!("no EXIF block in {}", path.display());
            return Ok(None);
        }
        Err(err) => return Err(MetadataError::Parse(err)),
    };

    let Some(field) = exif.get_field(Tag::DateTimeOriginal, In::PRIMARY) else {
        return Ok(None);
    };
    let raw = match &field.value {
        Value::Ascii(chunks) => chunks
            .first()
            .and_then(|chunk| std::str::from_utf8(chunk).ok()),
        _ => None,
    };

    Ok(raw.and_then(parse_exif_date))
}

fn parse_exif_date(input: &str) -> Option<NaiveDateTime> {
    let normalized = input.trim_matches(|c: char| c == '\0' || c.is_whitespace());

    // Some writers use ISO separators instead of the EXIF colon form.
    let candidates = [
        "%Y:%m:%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
    ];

    candidates
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(normalized, fmt).ok())
}
