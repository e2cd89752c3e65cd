//! Provisioning targets, step outcomes, and per-run reporting.
//!
//! Every download/extract/rename step records a typed outcome instead of a
//! print statement, so a run ends with an explicit per-version report.

use std::fmt;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::catalog::models::{Browser, ChannelType};

/// One version of one browser scheduled for provisioning. Built per
/// iteration and discarded after use.
#[derive(Debug, Clone)]
pub struct ProvisionTarget {
    pub browser: Browser,
    pub channel: ChannelType,
    /// Version as used in URLs and extracted folder names (already shortened
    /// to `major.minor` for non-stable channels).
    pub version: String,
    pub binary_url: String,
    pub driver_url: Option<String>,
    pub staging_dir: PathBuf,
    pub install_dir: PathBuf,
    pub driver_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    DownloadBinary,
    DownloadDriver,
    ExtractBinary,
    ExtractDriver,
    RenameInstall,
    RenameDriver,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StepKind::DownloadBinary => "download binary",
            StepKind::DownloadDriver => "download driver",
            StepKind::ExtractBinary => "extract binary",
            StepKind::ExtractDriver => "extract driver",
            StepKind::RenameInstall => "rename install folder",
            StepKind::RenameDriver => "rename driver folder",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Ok,
    /// Not attempted because a step it depends on failed.
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct StepReport {
    pub kind: StepKind,
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone)]
pub struct VersionReport {
    pub browser: Browser,
    pub channel: ChannelType,
    pub version: String,
    pub steps: Vec<StepReport>,
}

impl VersionReport {
    pub fn new(target: &ProvisionTarget) -> VersionReport {
        VersionReport {
            browser: target.browser,
            channel: target.channel,
            version: target.version.clone(),
            steps: Vec::new(),
        }
    }

    pub fn record(&mut self, kind: StepKind, outcome: StepOutcome) {
        self.steps.push(StepReport { kind, outcome });
    }

    pub fn succeeded(&self) -> bool {
        self.steps
            .iter()
            .all(|step| !matches!(step.outcome, StepOutcome::Failed(_)))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub versions: Vec<VersionReport>,
}

impl RunReport {
    pub fn push(&mut self, report: VersionReport) {
        self.versions.push(report);
    }

    pub fn succeeded(&self) -> usize {
        self.versions.iter().filter(|v| v.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.versions.len() - self.succeeded()
    }

    pub fn log_summary(&self) {
        for version in &self.versions {
            for step in &version.steps {
                if let StepOutcome::Failed(reason) = &step.outcome {
                    warn!(
                        target: "report",
                        browser = %version.browser,
                        channel = %version.channel,
                        version = %version.version,
                        step = %step.kind,
                        "step failed: {reason}"
                    );
                }
            }
        }
        info!(
            target: "report",
            provisioned = self.succeeded(),
            failed = self.failed(),
            "run complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> ProvisionTarget {
        ProvisionTarget {
            browser: Browser::Chrome,
            channel: ChannelType::Stable,
            version: "120.0".to_string(),
            binary_url: String::new(),
            driver_url: None,
            staging_dir: PathBuf::new(),
            install_dir: PathBuf::new(),
            driver_dir: None,
        }
    }

    #[test]
    fn a_version_succeeds_only_without_failed_steps() {
        let mut report = VersionReport::new(&target());
        report.record(StepKind::DownloadBinary, StepOutcome::Ok);
        report.record(StepKind::ExtractBinary, StepOutcome::Skipped);
        assert!(report.succeeded());

        report.record(
            StepKind::RenameInstall,
            StepOutcome::Failed("folder locked".to_string()),
        );
        assert!(!report.succeeded());
    }

    #[test]
    fn run_report_counts_successes_and_failures() {
        let mut run = RunReport::default();

        let mut ok = VersionReport::new(&target());
        ok.record(StepKind::DownloadBinary, StepOutcome::Ok);
        run.push(ok);

        let mut bad = VersionReport::new(&target());
        bad.record(
            StepKind::DownloadBinary,
            StepOutcome::Failed("404".to_string()),
        );
        run.push(bad);

        assert_eq!(run.succeeded(), 1);
        assert_eq!(run.failed(), 1);
    }
}
