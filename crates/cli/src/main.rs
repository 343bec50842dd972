use anyhow::Result;
use clap::{Parser, ValueEnum};
use picrename_core::{
    run, run_with_observer, ClockZone, DateSource, EntryKind, EntryOutcome, EntryReport,
    RenameOptions, RunSummary,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "picrename-cli")]
#[command(about = "Renames photos to their capture time as yyyyMMdd_HHmmss_N.ext")]
#[command(override_usage = "picrename-cli <IMAGE_DIR> <true|false> <ADJUST_HOURS> [OPTIONS]\n\n\
Example:\n    \
    picrename-cli /path/to/my/pictures false 12\n    \
    performs a dry run and adds 12 hours to every date")]
struct Cli {
    /// Directory whose direct children are renamed
    image_dir: PathBuf,
    /// `true` renames files, anything else only reports
    #[arg(value_name = "true|false")]
    rename: String,
    /// Hours added to every date, may be negative
    #[arg(allow_negative_numbers = true)]
    adjust_hours: i64,
    /// Also process files whose name starts with a dot
    #[arg(long, default_value_t = false)]
    include_hidden: bool,
    /// Extra extension to read capture dates from (repeatable)
    #[arg(long = "image-ext", value_name = "EXT")]
    image_ext: Vec<String>,
    /// Read filesystem times in UTC instead of the local time zone
    #[arg(long, default_value_t = false)]
    utc: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .init();

    let cli = Cli::parse();
    let options = RenameOptions {
        include_hidden: cli.include_hidden,
        clock_zone: if cli.utc {
            ClockZone::Utc
        } else {
            ClockZone::Local
        },
        ..RenameOptions::new(
            cli.image_dir,
            cli.rename.eq_ignore_ascii_case("true"),
            cli.adjust_hours,
        )
    }
    .with_extra_image_extensions(&cli.image_ext);

    match cli.output {
        OutputFormat::Json => {
            let summary = run(&options)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Table => {
            if !options.rename {
                println!("Performing dry-run, no pictures will be changed");
            }
            if options.adjust_hours != 0 {
                println!("Adjusting time by {} hours", options.adjust_hours);
            }
            let summary = run_with_observer(&options, print_report)?;
            print_stats(&summary);
        }
    }

    Ok(())
}

fn print_report(report: &EntryReport) {
    let name = &report.name;
    match report.outcome.plan().map(|plan| plan.source) {
        Some(DateSource::FileCreationNoMetadata) => {
            println!("No EXIF capture date: {name}");
            eprintln!("Using file creation time for {name}");
        }
        Some(DateSource::FileCreationNotImage) => {
            eprintln!("Using file creation time for {name}");
        }
        Some(DateSource::ExifCaptureTag) | None => {}
    }

    match &report.outcome {
        EntryOutcome::Renamed(plan) => {
            println!("Renaming: {} -> {}", plan.old_name, plan.new_name)
        }
        EntryOutcome::Planned(plan) => {
            println!("Testing: {} -> {}", plan.old_name, plan.new_name)
        }
        EntryOutcome::Skipped { reason } => match report.kind {
            EntryKind::Image => eprintln!("Error with picture: {name}, skipping... ({reason})"),
            EntryKind::Other => eprintln!("Error with file: {name}, skipping... ({reason})"),
        },
    }
}

fn print_stats(summary: &RunSummary) {
    let stats = &summary.stats;
    println!(
        "\nSummary: scanned={} images={} others={} renamed={} planned={} fallbacks={} skipped={} hidden={} non_regular={}",
        stats.scanned,
        stats.images,
        stats.others,
        stats.renamed,
        stats.planned,
        stats.fallbacks,
        stats.skipped,
        stats.ignored_hidden,
        stats.ignored_non_regular
    );
}
