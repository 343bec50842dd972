use crate::config::ClockZone;
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Reads the creation time of a file as a wall-clock date in `zone`.
///
/// Filesystems without a birth time report the last modification instead.
pub fn file_creation_time(path: &Path, zone: ClockZone) -> io::Result<NaiveDateTime> {
    let metadata = fs::metadata(path)?;
    let time = match metadata.created() {
        Ok(created) => created,
        Err(err) if err.kind() == io::ErrorKind::Unsupported => {
            tracing::debug!("no birth time for {}, using mtime", path.display());
            metadata.modified()?
        }
        Err(err) => return Err(err),
    };
    Ok(to_wall_clock(time, zone))
}

pub fn to_wall_clock(time: SystemTime, zone: ClockZone) -> NaiveDateTime {
    match zone {
        ClockZone::Local => DateTime::<Local>::from(time).naive_local(),
        ClockZone::Utc => DateTime::<Utc>::from(time).naive_utc(),
    }
}
