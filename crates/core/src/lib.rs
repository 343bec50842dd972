mod apply;
mod config;
mod exif_reader;
mod file_time;
mod metadata;
mod planner;
mod timestamp;

pub use apply::{
    run, run_with_observer, EntryKind, EntryOutcome, EntryReport, RunStats, RunSummary,
    SkipReason,
};
pub use config::{ClockZone, RenameOptions, DEFAULT_IMAGE_EXTENSIONS};
pub use exif_reader::{read_capture_date, MetadataError};
pub use file_time::file_creation_time;
pub use metadata::{CaptureDate, DateSource, DirectoryEntry};
pub use planner::{next_free_name, plan_rename, NameLedger, RenamePlan};
pub use timestamp::{adjust_hours, format_timestamp};
