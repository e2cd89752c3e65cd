//! Grid browser provisioner for the Windows Selenium farm.
//!
//! Queries the internal version catalog for Chrome/Firefox/Edge release
//! channels, downloads installer and driver archives from the deploy CDN,
//! extracts them into the farm's browser directories, and aliases non-stable
//! builds to symbolic `beta`/`dev` folders.
//!
//! Code structure (reading entry points):
//! - `base_system`: config/logging/OS detection/cleanup infrastructure
//! - `branch`: prod/stage endpoint selection
//! - `catalog`: version-catalog client and channel bucketing
//! - `provision`: download/extract/rename flow and per-run reporting

use anyhow::{Result, anyhow};
use clap::Parser;

mod base_system;
mod branch;
mod catalog;
mod provision;

use base_system::config::load_or_create_with_base;
use base_system::context::Config;
use base_system::logging::{LogOptions, LogSystem};
use base_system::os_release;
use branch::Branch;
use tracing::{info, warn};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Parser)]
#[command(name = "grid-browser-provisioner")]
#[command(about = "Provision grid browser builds from the version catalog")]
struct Cli {
    /// Deployment branch selecting API/CDN hosts (prod or stage)
    #[arg(long)]
    branch: Option<String>,

    /// Enable debug log output
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// Show version information and exit
    #[arg(long, default_value_t = false)]
    version: bool,

    /// Data directory for config.yml and logs
    #[arg(long)]
    data_dir: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("Grid Browser Provisioner v{VERSION}");
        return Ok(());
    }

    let data_dir = cli.data_dir.as_ref().map(std::path::Path::new);
    let _log = init_logging(cli.debug, data_dir)?;

    let branch_arg = cli
        .branch
        .as_deref()
        .ok_or_else(|| anyhow!("--branch is required (prod or stage)"))?;
    let branch = Branch::resolve(branch_arg);
    let endpoints = branch.endpoints();

    let config: Config =
        load_or_create_with_base(None, data_dir).map_err(|e| anyhow!(e.to_string()))?;

    let Some(os_key) = os_release::os_key(&config) else {
        warn!(target: "startup", "host is not a supported Windows release, nothing to do");
        return Ok(());
    };

    info!(
        target: "startup",
        version = VERSION,
        branch = %branch,
        os = %os_key,
        "starting provisioning run"
    );

    let report = provision::provisioner::run(&config, &endpoints, os_key)?;
    report.log_summary();

    Ok(())
}

fn init_logging(debug: bool, base_dir: Option<&std::path::Path>) -> Result<LogSystem> {
    let opts = LogOptions {
        debug,
        use_color: true,
        archive_on_exit: true,
        console: true,
    };
    LogSystem::init_with_base(opts, base_dir).map_err(|e| anyhow!(e))
}
