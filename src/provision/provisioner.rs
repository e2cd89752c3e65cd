//! Per-browser provisioning orchestration.
//!
//! For each browser: wipe and recreate the target directories (every run is a
//! full reinstall), resolve the channel buckets, then download/extract/rename
//! each planned version. Individual step failures are recorded in the run
//! report and never abort the outer loop; the staging directory is removed
//! after each browser's loop.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use tracing::{info, warn};

use super::download::download_archive;
use super::extract::extract_archive;
use super::models::{ProvisionTarget, RunReport, StepKind, StepOutcome, VersionReport};
use super::urls;
use crate::base_system::context::{BrowserDirs, Config};
use crate::base_system::file_cleaner;
use crate::base_system::os_release::OsKey;
use crate::branch::Endpoints;
use crate::catalog::client::CatalogClient;
use crate::catalog::future;
use crate::catalog::models::{ALL_BROWSERS, Browser, ChannelBuckets, ChannelType};

pub fn run(config: &Config, endpoints: &Endpoints, os_key: OsKey) -> Result<RunReport> {
    let timeout = Duration::from_secs(config.request_timeout);
    let catalog = CatalogClient::new(timeout)?;
    let cdn = build_cdn_client(timeout)?;

    let mut report = RunReport::default();

    for browser in ALL_BROWSERS {
        let dirs = config.browser_dirs(browser);
        prepare_directories(&dirs)?;

        let mut buckets = catalog.resolve(endpoints, browser, os_key, config.channel_cap)?;
        if config.probe_future_versions {
            buckets.stable = future::merge_probed_stable(
                &cdn,
                endpoints,
                browser,
                buckets.stable,
                config.channel_cap,
            );
        }

        for target in plan_targets(config, endpoints, browser, &dirs, &buckets) {
            report.push(provision(&cdn, &target));
        }

        file_cleaner::remove_dir_tree(&dirs.staging);
    }

    Ok(report)
}

fn build_cdn_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .context("init cdn http client")
}

/// Full reinstall: drop whatever a previous run left in the install/driver
/// directories, then recreate them together with the staging directory.
fn prepare_directories(dirs: &BrowserDirs) -> Result<()> {
    file_cleaner::remove_dir_tree(&dirs.install);
    if let Some(driver) = dirs.driver.as_deref() {
        file_cleaner::remove_dir_tree(driver);
    }

    let mut to_create = vec![dirs.install.as_path(), dirs.staging.as_path()];
    if let Some(driver) = dirs.driver.as_deref() {
        to_create.push(driver);
    }
    file_cleaner::create_directories(&to_create).context("create browser directories")
}

/// All capped stable versions, then the newest beta/dev when enabled.
/// Non-stable versions are shortened to `major.minor` before URL and folder
/// construction.
fn plan_targets(
    config: &Config,
    endpoints: &Endpoints,
    browser: Browser,
    dirs: &BrowserDirs,
    buckets: &ChannelBuckets,
) -> Vec<ProvisionTarget> {
    let mut targets = Vec::new();
    for version in &buckets.stable {
        targets.push(make_target(
            endpoints,
            browser,
            dirs,
            ChannelType::Stable,
            version.clone(),
        ));
    }
    if config.include_beta
        && let Some(newest) = buckets.newest(ChannelType::Beta)
    {
        targets.push(make_target(
            endpoints,
            browser,
            dirs,
            ChannelType::Beta,
            urls::short_version(newest),
        ));
    }
    if config.include_dev
        && let Some(newest) = buckets.newest(ChannelType::Dev)
    {
        targets.push(make_target(
            endpoints,
            browser,
            dirs,
            ChannelType::Dev,
            urls::short_version(newest),
        ));
    }
    targets
}

fn make_target(
    endpoints: &Endpoints,
    browser: Browser,
    dirs: &BrowserDirs,
    channel: ChannelType,
    version: String,
) -> ProvisionTarget {
    ProvisionTarget {
        binary_url: urls::binary_url(endpoints, browser, &version),
        driver_url: urls::driver_url(endpoints, browser, &version),
        staging_dir: dirs.staging.clone(),
        install_dir: dirs.install.clone(),
        driver_dir: dirs.driver.clone(),
        browser,
        channel,
        version,
    }
}

/// Provision one version: download the binary and driver archives, extract
/// them, and alias non-stable builds to their channel folder. Failures land
/// in the report; the caller moves on to the next version either way.
fn provision(cdn: &Client, target: &ProvisionTarget) -> VersionReport {
    info!(
        target: "provision",
        browser = %target.browser,
        channel = %target.channel,
        version = %target.version,
        "provisioning"
    );
    let mut report = VersionReport::new(target);

    let binary_archive = run_download(
        cdn,
        &mut report,
        StepKind::DownloadBinary,
        &target.binary_url,
        &target.staging_dir,
    );
    let driver_archive = target.driver_url.as_deref().and_then(|url| {
        run_download(cdn, &mut report, StepKind::DownloadDriver, url, &target.staging_dir)
    });

    // drivers first, mirroring the deploy order the farm tooling expects
    let driver_ok = match (driver_archive.as_deref(), target.driver_dir.as_deref()) {
        (Some(archive), Some(driver_dir)) => {
            run_extract(&mut report, StepKind::ExtractDriver, archive, driver_dir)
        }
        (None, Some(_)) if target.driver_url.is_some() => {
            report.record(StepKind::ExtractDriver, StepOutcome::Skipped);
            false
        }
        _ => false,
    };

    let binary_ok = match binary_archive.as_deref() {
        Some(archive) => run_extract(
            &mut report,
            StepKind::ExtractBinary,
            archive,
            &target.install_dir,
        ),
        None => {
            report.record(StepKind::ExtractBinary, StepOutcome::Skipped);
            false
        }
    };

    if !target.channel.is_stable() {
        rename_symbolic(&mut report, target, binary_ok, driver_ok);
    }

    report
}

fn run_download(
    cdn: &Client,
    report: &mut VersionReport,
    kind: StepKind,
    url: &str,
    staging_dir: &Path,
) -> Option<std::path::PathBuf> {
    match download_archive(cdn, url, staging_dir) {
        Ok(path) => {
            info!(target: "provision", archive = %path.display(), "downloaded");
            report.record(kind, StepOutcome::Ok);
            Some(path)
        }
        Err(err) => {
            warn!(target: "provision", url, "{kind} failed: {err:#}");
            report.record(kind, StepOutcome::Failed(format!("{err:#}")));
            None
        }
    }
}

fn run_extract(
    report: &mut VersionReport,
    kind: StepKind,
    archive: &Path,
    dest: &Path,
) -> bool {
    match extract_archive(archive, dest) {
        Ok(()) => {
            info!(target: "provision", dest = %dest.display(), "extracted {}", archive.display());
            report.record(kind, StepOutcome::Ok);
            true
        }
        Err(err) => {
            warn!(target: "provision", "{kind} failed: {err:#}");
            report.record(kind, StepOutcome::Failed(format!("{err:#}")));
            false
        }
    }
}

/// Alias the freshly extracted version folder to its channel name, dropping
/// any stale alias from a previous run first.
fn rename_symbolic(
    report: &mut VersionReport,
    target: &ProvisionTarget,
    binary_ok: bool,
    driver_ok: bool,
) {
    let symbolic = target.channel.as_str();

    let install_outcome = if binary_ok {
        rename_version_folder(&target.install_dir, &target.version, symbolic)
    } else {
        StepOutcome::Skipped
    };
    report.record(StepKind::RenameInstall, install_outcome);

    if let Some(driver_dir) = target.driver_dir.as_deref() {
        let driver_outcome = if driver_ok {
            rename_version_folder(driver_dir, &target.version, symbolic)
        } else {
            StepOutcome::Skipped
        };
        report.record(StepKind::RenameDriver, driver_outcome);
    }
}

fn rename_version_folder(dir: &Path, version: &str, symbolic: &str) -> StepOutcome {
    let source = dir.join(version);
    let dest = dir.join(symbolic);

    if !source.exists() {
        return StepOutcome::Failed(format!("extracted folder missing: {}", source.display()));
    }
    if dest.exists()
        && let Err(err) = fs::remove_dir_all(&dest)
    {
        return StepOutcome::Failed(format!("remove stale {}: {err}", dest.display()));
    }
    match fs::rename(&source, &dest) {
        Ok(()) => {
            info!(
                target: "provision",
                "renamed {} -> {}",
                source.display(),
                dest.display()
            );
            StepOutcome::Ok
        }
        Err(err) => StepOutcome::Failed(format!(
            "rename {} -> {}: {err}",
            source.display(),
            dest.display()
        )),
    }
}
