use crate::config::RenameOptions;
use crate::exif_reader::read_capture_date;
use crate::file_time::file_creation_time;
use crate::metadata::{is_hidden, CaptureDate, DateSource, DirectoryEntry};
use crate::planner::{plan_rename, NameLedger, RenamePlan};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a single entry was left alone. None of these abort the run.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    #[error("metadata could not be read: {0}")]
    MetadataRead(String),
    #[error("file attributes could not be read: {0}")]
    AttributeRead(String),
    #[error("adjusting by {hours} hours leaves the supported date range")]
    AdjustmentOutOfRange { hours: i64 },
    #[error("file name is not valid UTF-8")]
    NonUtf8Name,
    #[error("rename failed: {0}")]
    RenameFailed(String),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Image,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryOutcome {
    Renamed(RenamePlan),
    /// Dry run: the rename that would have happened.
    Planned(RenamePlan),
    Skipped { reason: SkipReason },
}

impl EntryOutcome {
    pub fn plan(&self) -> Option<&RenamePlan> {
        match self {
            EntryOutcome::Renamed(plan) | EntryOutcome::Planned(plan) => Some(plan),
            EntryOutcome::Skipped { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntryReport {
    pub name: String,
    pub kind: EntryKind,
    pub outcome: EntryOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RunStats {
    pub scanned: usize,
    pub images: usize,
    pub others: usize,
    pub renamed: usize,
    pub planned: usize,
    pub fallbacks: usize,
    pub skipped: usize,
    pub ignored_hidden: usize,
    pub ignored_non_regular: usize,
}

impl RunStats {
    fn record(&mut self, report: &EntryReport) {
        match report.kind {
            EntryKind::Image => self.images += 1,
            EntryKind::Other => self.others += 1,
        }
        match &report.outcome {
            EntryOutcome::Renamed(_) => self.renamed += 1,
            EntryOutcome::Planned(_) => self.planned += 1,
            EntryOutcome::Skipped { .. } => self.skipped += 1,
        }
        if report
            .outcome
            .plan()
            .is_some_and(|plan| plan.source.is_fallback())
        {
            self.fallbacks += 1;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub directory: PathBuf,
    pub dry_run: bool,
    pub adjust_hours: i64,
    pub entries: Vec<EntryReport>,
    pub stats: RunStats,
}

pub fn run(options: &RenameOptions) -> Result<RunSummary> {
    run_with_observer(options, |_| {})
}

/// Renames every regular file of `options.directory`, images first.
///
/// `observer` sees each entry as soon as it is finished. Only a directory that
/// cannot be listed is an error; per-file problems end up in the summary.
pub fn run_with_observer<F>(options: &RenameOptions, mut observer: F) -> Result<RunSummary>
where
    F: FnMut(&EntryReport),
{
    let dir = options.directory.as_path();
    let meta = fs::metadata(dir)
        .with_context(|| format!("cannot access directory: {}", dir.display()))?;
    if !meta.is_dir() {
        bail!("not a directory: {}", dir.display());
    }

    let mut summary = RunSummary {
        directory: dir.to_path_buf(),
        dry_run: !options.rename,
        adjust_hours: options.adjust_hours,
        entries: Vec::new(),
        stats: RunStats::default(),
    };
    let mut ledger = NameLedger::new();

    let listing = list_directory(dir, options)?;
    summary.stats.scanned = listing.scanned;
    summary.stats.ignored_hidden = listing.hidden;
    summary.stats.ignored_non_regular = listing.non_regular;
    for report in listing.unreadable {
        finish(&mut summary, report, &mut observer);
    }

    for entry in &listing.images {
        let outcome = match resolve_image_date(entry, options) {
            Ok(capture) => rename_entry(dir, entry, capture, options, &mut ledger),
            Err(reason) => EntryOutcome::Skipped { reason },
        };
        let report = EntryReport {
            name: entry.name.clone(),
            kind: EntryKind::Image,
            outcome,
        };
        finish(&mut summary, report, &mut observer);
    }

    // Listed again: the image pass may have changed the directory.
    let listing = list_directory(dir, options)?;
    for entry in &listing.others {
        let outcome = match file_creation_time(&entry.path, options.clock_zone) {
            Ok(value) => {
                let capture = CaptureDate {
                    value,
                    source: DateSource::FileCreationNotImage,
                };
                rename_entry(dir, entry, capture, options, &mut ledger)
            }
            Err(err) => EntryOutcome::Skipped {
                reason: SkipReason::AttributeRead(err.to_string()),
            },
        };
        let report = EntryReport {
            name: entry.name.clone(),
            kind: EntryKind::Other,
            outcome,
        };
        finish(&mut summary, report, &mut observer);
    }

    Ok(summary)
}

fn finish<F>(summary: &mut RunSummary, report: EntryReport, observer: &mut F)
where
    F: FnMut(&EntryReport),
{
    if let EntryOutcome::Skipped { reason } = &report.outcome {
        tracing::warn!(name = %report.name, %reason, "skipping entry");
    }
    observer(&report);
    summary.stats.record(&report);
    summary.entries.push(report);
}

fn resolve_image_date(
    entry: &DirectoryEntry,
    options: &RenameOptions,
) -> Result<CaptureDate, SkipReason> {
    match read_capture_date(&entry.path) {
        Ok(Some(value)) => Ok(CaptureDate {
            value,
            source: DateSource::ExifCaptureTag,
        }),
        Ok(None) => {
            tracing::debug!(name = %entry.name, "no capture date, using creation time");
            let value = file_creation_time(&entry.path, options.clock_zone)
                .map_err(|err| SkipReason::AttributeRead(err.to_string()))?;
            Ok(CaptureDate {
                value,
                source: DateSource::FileCreationNoMetadata,
            })
        }
        Err(err) => Err(SkipReason::MetadataRead(err.to_string())),
    }
}

fn rename_entry(
    dir: &Path,
    entry: &DirectoryEntry,
    capture: CaptureDate,
    options: &RenameOptions,
    ledger: &mut NameLedger,
) -> EntryOutcome {
    let plan = match plan_rename(
        dir,
        entry,
        capture,
        options.adjust_hours,
        options.rename,
        ledger,
    ) {
        Ok(plan) => plan,
        Err(reason) => return EntryOutcome::Skipped { reason },
    };

    if !plan.will_execute {
        ledger.record(&plan.old_name, &plan.new_name);
        return EntryOutcome::Planned(plan);
    }

    let target = dir.join(&plan.new_name);
    if let Err(err) = fs::rename(&entry.path, &target) {
        return EntryOutcome::Skipped {
            reason: SkipReason::RenameFailed(err.to_string()),
        };
    }
    tracing::info!(from = %plan.old_name, to = %plan.new_name, "renamed");
    ledger.record(&plan.old_name, &plan.new_name);
    EntryOutcome::Renamed(plan)
}

#[derive(Debug, Default)]
struct Listing {
    images: Vec<DirectoryEntry>,
    others: Vec<DirectoryEntry>,
    unreadable: Vec<EntryReport>,
    scanned: usize,
    hidden: usize,
    non_regular: usize,
}

fn list_directory(dir: &Path, options: &RenameOptions) -> Result<Listing> {
    let mut listing = Listing::default();

    for entry in fs::read_dir(dir)
        .with_context(|| format!("cannot read directory: {}", dir.display()))?
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                listing.unreadable.push(unreadable_report(
                    "<unknown>".to_string(),
                    SkipReason::AttributeRead(err.to_string()),
                ));
                continue;
            }
        };
        listing.scanned += 1;
        let path = entry.path();

        // `DirEntry::file_type` does not follow symlinks.
        match entry.file_type() {
            Ok(file_type) if file_type.is_file() => {}
            Ok(_) => {
                tracing::debug!("ignoring non-regular entry: {}", path.display());
                listing.non_regular += 1;
                continue;
            }
            Err(err) => {
                listing.unreadable.push(unreadable_report(
                    entry.file_name().to_string_lossy().into_owned(),
                    SkipReason::AttributeRead(err.to_string()),
                ));
                continue;
            }
        }

        let Some(classified) = DirectoryEntry::classify(&path, options) else {
            listing.unreadable.push(unreadable_report(
                entry.file_name().to_string_lossy().into_owned(),
                SkipReason::NonUtf8Name,
            ));
            continue;
        };

        if is_hidden(&classified.name) && !options.include_hidden {
            listing.hidden += 1;
            continue;
        }

        if classified.is_image {
            listing.images.push(classified);
        } else {
            listing.others.push(classified);
        }
    }

    listing.images.sort_by(|a, b| a.name.cmp(&b.name));
    listing.others.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(listing)
}

fn unreadable_report(name: String, reason: SkipReason) -> EntryReport {
    EntryReport {
        name,
        kind: EntryKind::Other,
        outcome: EntryOutcome::Skipped { reason },
    }
}
