//! Main copy command

use crate::executor::{AtomicCopier, FileCopier};
use crate::filter::ExclusionMatcher;
use crate::types::{Decision, SiftError};
use crate::ui::ProgressReporter;
use crate::walker::{FilteredWalker, WalkFailure, WalkReport};
use crate::Config;
use std::io::ErrorKind;
use std::sync::{Arc, Mutex};

/// Run the copy operation
pub fn run(config: &Config) -> Result<WalkReport, SiftError> {
    run_with_copier(config, &AtomicCopier)
}

/// Run the copy operation with a custom byte copier
///
/// Returns `SiftError::Partial` when `keep_going` skipped failed entries;
/// the report has already been printed at that point.
pub fn run_with_copier(config: &Config, copier: &dyn FileCopier) -> Result<WalkReport, SiftError> {
    config.validate()?;
    let matcher = ExclusionMatcher::new(config.exclusion_spec()?);
    let source = config.source_root()?;
    let destination = config.destination_root()?;

    let spec = matcher.spec();
    tracing::info!(
        source = %source.display(),
        destination = %destination.display(),
        dry_run = config.dry_run,
        "starting copy"
    );
    if spec.is_empty() {
        tracing::info!("no exclusions configured");
    } else {
        tracing::info!(
            dirs = spec.dir_entries().len(),
            files = spec.file_entries().len(),
            names = spec.names().len(),
            stale = spec.stale_entries().len(),
            "exclusions resolved"
        );
    }

    let reporter = Arc::new(Mutex::new(if config.json {
        ProgressReporter::hidden(false)
    } else {
        ProgressReporter::new(config.verbose)
    }));
    let on_decision = {
        let reporter = Arc::clone(&reporter);
        move |decision: &Decision| {
            if let Ok(mut progress) = reporter.lock() {
                progress.record(decision);
            }
        }
    };

    let walker = FilteredWalker::new(&matcher, config.size_bounds(), copier)
        .with_options(config.walk_options())
        .on_decision(&on_decision);
    let report = walker.walk(&source, &destination)?;

    if let Ok(progress) = reporter.lock() {
        progress.finish(&report, config.dry_run);
    }

    if config.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| SiftError::Io(std::io::Error::other(e)))?;
        println!("{}", json);
    } else if report.has_failures() {
        print_failures(&report.failures);
    }

    tracing::info!(
        files = report.files_copied,
        bytes = report.bytes_copied,
        failures = report.failures.len(),
        "copy finished"
    );

    if report.has_failures() {
        return Err(SiftError::Partial {
            failed: report.failures.len(),
            summary: report.failure_summary(),
        });
    }

    Ok(report)
}

fn print_failures(failures: &[WalkFailure]) {
    eprintln!("{} entr(ies) could not be copied:", failures.len());
    for failure in failures {
        eprintln!("  {}", failure.error);
    }
}

/// Hint for the user on how to fix an error, if there is a useful one
pub fn suggestion_for(error: &SiftError) -> Option<&'static str> {
    if error.is_permission_error() {
        return Some("Check file permissions or run with a user that has access.");
    }
    if error.is_config_error() {
        return Some("Run with --help to see accepted options and size formats.");
    }
    match error {
        SiftError::CreateDir { source, .. } if source.kind() == ErrorKind::AlreadyExists => {
            Some("A file exists where a directory is needed; remove or rename it.")
        }
        SiftError::ReadDir { .. } | SiftError::Metadata { .. } => {
            Some("Re-run with --keep-going to skip unreadable entries.")
        }
        SiftError::Partial { .. } => Some("Fix the listed entries and re-run to copy them."),
        _ => None,
    }
}
