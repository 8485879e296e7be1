//! Progress reporting

use crate::types::{Decision, Outcome};
use crate::walker::WalkReport;
use console::style;
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};

/// Progress reporter for copy runs
///
/// Shows a spinner with running totals on stderr and, when verbose, one
/// line per decision on stdout.
pub struct ProgressReporter {
    bar: ProgressBar,
    verbose: bool,
    files: u64,
    bytes: u64,
    skipped: u64,
}

impl ProgressReporter {
    /// Create a reporter drawing to stderr
    pub fn new(verbose: bool) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(std::time::Duration::from_millis(120));
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        Self::with_bar(bar, verbose)
    }

    /// Create a reporter that draws nothing (JSON output, tests)
    pub fn hidden(verbose: bool) -> Self {
        Self::with_bar(ProgressBar::hidden(), verbose)
    }

    fn with_bar(bar: ProgressBar, verbose: bool) -> Self {
        Self {
            bar,
            verbose,
            files: 0,
            bytes: 0,
            skipped: 0,
        }
    }

    /// Fold one decision into the totals.
    pub fn record(&mut self, decision: &Decision) {
        match decision.outcome {
            Outcome::Copied if !decision.is_dir() => {
                self.files += 1;
                self.bytes = self.bytes.saturating_add(decision.bytes);
            }
            Outcome::Copied => {}
            Outcome::Excluded => self.skipped += 1,
        }

        if self.verbose {
            let line = decision_line(decision);
            self.bar.suspend(|| println!("{}", line));
        }
        self.bar.set_message(format!(
            "Copying... {} files | {} | {} skipped",
            self.files,
            HumanBytes(self.bytes),
            self.skipped
        ));
    }

    /// Finalize the spinner with the walk summary.
    pub fn finish(&self, report: &WalkReport, dry_run: bool) {
        let verb = if dry_run { "Would copy" } else { "Copied" };
        self.bar.finish_with_message(format!(
            "{} {} files ({}) in {} dirs | {} excluded | {} failed | {:.2?}",
            verb,
            report.files_copied,
            HumanBytes(report.bytes_copied),
            report.dirs_mirrored,
            report.excluded_dirs + report.excluded_files,
            report.failures.len(),
            report.elapsed
        ));
    }
}

/// One verbose line for a decision
pub fn decision_line(decision: &Decision) -> String {
    let kind = if decision.is_dir() { "dir " } else { "file" };
    match (&decision.outcome, &decision.destination) {
        (Outcome::Copied, Some(dest)) => format!(
            "{} {} '{}' -> '{}'",
            style("copy").green(),
            kind,
            decision.path.display(),
            dest.display()
        ),
        _ => format!(
            "{} {} '{}' ({})",
            style("skip").yellow(),
            kind,
            decision.path.display(),
            decision.reason
        ),
    }
}
