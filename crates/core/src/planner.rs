use crate::apply::SkipReason;
use crate::metadata::{CaptureDate, DateSource, DirectoryEntry};
use crate::timestamp::{adjust_hours, format_timestamp};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenamePlan {
    pub old_name: String,
    pub new_name: String,
    pub will_execute: bool,
    /// Date after the hour adjustment.
    pub date: NaiveDateTime,
    pub source: DateSource,
}

/// Names claimed and vacated by earlier entries of the same run.
///
/// A real run changes the disk as it goes, so the ledger agrees with it. A dry
/// run leaves the disk alone and relies on the ledger to report the same names
/// a real run would pick.
#[derive(Debug, Default)]
pub struct NameLedger {
    claimed: HashSet<String>,
    vacated: HashSet<String>,
}

impl NameLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// The entry's own current name is taken like any other existing file.
    pub fn is_taken(&self, dir: &Path, name: &str) -> bool {
        if self.claimed.contains(name) {
            return true;
        }
        if self.vacated.contains(name) {
            return false;
        }
        // Dangling symlinks count as taken too.
        fs::symlink_metadata(dir.join(name)).is_ok()
    }

    pub fn record(&mut self, old_name: &str, new_name: &str) {
        self.claimed.remove(old_name);
        self.vacated.insert(old_name.to_string());
        self.vacated.remove(new_name);
        self.claimed.insert(new_name.to_string());
    }
}

pub fn plan_rename(
    dir: &Path,
    entry: &DirectoryEntry,
    capture: CaptureDate,
    hours: i64,
    will_execute: bool,
    ledger: &NameLedger,
) -> Result<RenamePlan, SkipReason> {
    let date =
        adjust_hours(capture.value, hours).ok_or(SkipReason::AdjustmentOutOfRange { hours })?;
    let stamp = format_timestamp(&date);
    let new_name = next_free_name(dir, &stamp, entry.extension.as_deref(), ledger);

    Ok(RenamePlan {
        old_name: entry.name.clone(),
        new_name,
        will_execute,
        date,
        source: capture.source,
    })
}

/// Smallest `<stamp>_N[.ext]` not taken in `dir`, counting from zero.
pub fn next_free_name(
    dir: &Path,
    stamp: &str,
    extension: Option<&str>,
    ledger: &NameLedger,
) -> String {
    let mut n = 0usize;
    loop {
        let candidate = candidate_name(stamp, n, extension);
        if !ledger.is_taken(dir, &candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn candidate_name(stamp: &str, n: usize, extension: Option<&str>) -> String {
    match extension {
        Some(ext) => format!("{stamp}_{n}.{ext}"),
        None => format!("{stamp}_{n}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenameOptions;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn capture(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> CaptureDate {
        CaptureDate {
            value: NaiveDate::from_ymd_opt(y, mo, d)
                .and_then(|date| date.and_hms_opt(h, mi, s))
                .expect("valid date"),
            source: DateSource::ExifCaptureTag,
        }
    }

    fn entry(dir: &Path, name: &str) -> DirectoryEntry {
        DirectoryEntry::classify(&dir.join(name), &RenameOptions::default()).expect("utf-8")
    }

    #[test]
    fn free_name_uses_suffix_zero() {
        let temp = tempdir().expect("tempdir");
        let ledger = NameLedger::new();
        let plan = plan_rename(
            temp.path(),
            &entry(temp.path(), "photo.jpg"),
            capture(2020, 5, 1, 10, 0, 0),
            0,
            true,
            &ledger,
        )
        .expect("plan");
        assert_eq!(plan.old_name, "photo.jpg");
        assert_eq!(plan.new_name, "20200501_100000_0.jpg");
        assert!(plan.will_execute);
    }

    #[test]
    fn existing_file_bumps_suffix_without_overwriting() {
        let temp = tempdir().expect("tempdir");
        fs::write(temp.path().join("20200501_100000_0.jpg"), b"a").expect("write");
        fs::write(temp.path().join("20200501_100000_1.jpg"), b"b").expect("write");

        let name = next_free_name(
            temp.path(),
            "20200501_100000",
            Some("jpg"),
            &NameLedger::new(),
        );
        assert_eq!(name, "20200501_100000_2.jpg");
    }

    #[test]
    fn own_name_is_taken_like_any_existing_file() {
        let temp = tempdir().expect("tempdir");
        fs::write(temp.path().join("20200501_100000_0.JPG"), b"a").expect("write");

        let plan = plan_rename(
            temp.path(),
            &entry(temp.path(), "20200501_100000_0.JPG"),
            capture(2020, 5, 1, 10, 0, 0),
            0,
            true,
            &NameLedger::new(),
        )
        .expect("plan");
        assert_eq!(plan.new_name, "20200501_100000_1.JPG");
    }

    #[test]
    fn extension_case_is_preserved_and_missing_extension_is_omitted() {
        let temp = tempdir().expect("tempdir");
        let ledger = NameLedger::new();
        assert_eq!(
            next_free_name(temp.path(), "20200501_100000", Some("JpG"), &ledger),
            "20200501_100000_0.JpG"
        );
        assert_eq!(
            next_free_name(temp.path(), "20200501_100000", None, &ledger),
            "20200501_100000_0"
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn extensions_differing_only_in_case_do_not_collide() {
        let temp = tempdir().expect("tempdir");
        fs::write(temp.path().join("20200501_100000_0.jpg"), b"a").expect("write");

        let name = next_free_name(
            temp.path(),
            "20200501_100000",
            Some("JPG"),
            &NameLedger::new(),
        );
        assert_eq!(name, "20200501_100000_0.JPG");
    }

    #[test]
    fn ledger_tracks_claims_and_vacated_names() {
        let temp = tempdir().expect("tempdir");
        fs::write(temp.path().join("a.jpg"), b"a").expect("write");
        let mut ledger = NameLedger::new();

        assert!(ledger.is_taken(temp.path(), "a.jpg"));
        ledger.record("a.jpg", "20200501_100000_0.jpg");
        assert!(!ledger.is_taken(temp.path(), "a.jpg"));
        assert!(ledger.is_taken(temp.path(), "20200501_100000_0.jpg"));

        let name = next_free_name(
            temp.path(),
            "20200501_100000",
            Some("jpg"),
            &ledger,
        );
        assert_eq!(name, "20200501_100000_1.jpg");
    }

    #[test]
    fn adjustment_is_applied_before_naming() {
        let temp = tempdir().expect("tempdir");
        let plan = plan_rename(
            temp.path(),
            &entry(temp.path(), "photo.jpg"),
            capture(2024, 1, 1, 0, 30, 0),
            -1,
            false,
            &NameLedger::new(),
        )
        .expect("plan");
        assert_eq!(plan.new_name, "20231231_233000_0.jpg");
        assert!(!plan.will_execute);
    }

    #[test]
    fn out_of_range_adjustment_is_a_skip() {
        let temp = tempdir().expect("tempdir");
        let err = plan_rename(
            temp.path(),
            &entry(temp.path(), "photo.jpg"),
            capture(2020, 5, 1, 10, 0, 0),
            i64::MAX,
            false,
            &NameLedger::new(),
        )
        .expect_err("must fail");
        assert!(matches!(err, SkipReason::AdjustmentOutOfRange { .. }));
    }
}
