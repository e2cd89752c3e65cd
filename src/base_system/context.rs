//! Runtime configuration for a provisioning run.
//!
//! Constructed once at startup from `config.yml` and passed by reference into
//! every component; no process-wide mutable state. Directory defaults are the
//! farm's fixed Windows paths.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::config::{ConfigSpec, FieldMeta};
use crate::catalog::models::Browser;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // network
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    // catalog
    #[serde(default = "default_channel_cap")]
    pub channel_cap: usize,
    #[serde(default = "default_true")]
    pub include_beta: bool,
    #[serde(default = "default_true")]
    pub include_dev: bool,
    #[serde(default = "default_false")]
    pub probe_future_versions: bool,
    #[serde(default = "default_string")]
    pub os_key: String,

    // chrome paths
    #[serde(default = "default_chrome_install_dir")]
    pub chrome_install_dir: String,
    #[serde(default = "default_chrome_staging_dir")]
    pub chrome_staging_dir: String,
    #[serde(default = "default_chrome_driver_dir")]
    pub chrome_driver_dir: String,

    // firefox paths (no driver archive on the CDN)
    #[serde(default = "default_firefox_install_dir")]
    pub firefox_install_dir: String,
    #[serde(default = "default_firefox_staging_dir")]
    pub firefox_staging_dir: String,

    // edge paths
    #[serde(default = "default_edge_install_dir")]
    pub edge_install_dir: String,
    #[serde(default = "default_edge_staging_dir")]
    pub edge_staging_dir: String,
    #[serde(default = "default_edge_driver_dir")]
    pub edge_driver_dir: String,
}

/// Filesystem layout for one browser.
#[derive(Debug, Clone)]
pub struct BrowserDirs {
    pub install: PathBuf,
    pub staging: PathBuf,
    pub driver: Option<PathBuf>,
}

impl Config {
    pub fn browser_dirs(&self, browser: Browser) -> BrowserDirs {
        match browser {
            Browser::Chrome => BrowserDirs {
                install: PathBuf::from(&self.chrome_install_dir),
                staging: PathBuf::from(&self.chrome_staging_dir),
                driver: Some(PathBuf::from(&self.chrome_driver_dir)),
            },
            Browser::Firefox => BrowserDirs {
                install: PathBuf::from(&self.firefox_install_dir),
                staging: PathBuf::from(&self.firefox_staging_dir),
                driver: None,
            },
            Browser::Edge => BrowserDirs {
                install: PathBuf::from(&self.edge_install_dir),
                staging: PathBuf::from(&self.edge_staging_dir),
                driver: Some(PathBuf::from(&self.edge_driver_dir)),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            channel_cap: default_channel_cap(),
            include_beta: default_true(),
            include_dev: default_true(),
            probe_future_versions: default_false(),
            os_key: default_string(),
            chrome_install_dir: default_chrome_install_dir(),
            chrome_staging_dir: default_chrome_staging_dir(),
            chrome_driver_dir: default_chrome_driver_dir(),
            firefox_install_dir: default_firefox_install_dir(),
            firefox_staging_dir: default_firefox_staging_dir(),
            edge_install_dir: default_edge_install_dir(),
            edge_staging_dir: default_edge_staging_dir(),
            edge_driver_dir: default_edge_driver_dir(),
        }
    }
}

impl ConfigSpec for Config {
    const FILE_NAME: &'static str = "config.yml";

    fn fields() -> &'static [FieldMeta] {
        &[
            FieldMeta {
                name: "request_timeout",
                description: "HTTP request timeout in seconds",
            },
            FieldMeta {
                name: "channel_cap",
                description: "Maximum versions kept per release channel",
            },
            FieldMeta {
                name: "include_beta",
                description: "Provision the newest beta build per browser",
            },
            FieldMeta {
                name: "include_dev",
                description: "Provision the newest dev build per browser",
            },
            FieldMeta {
                name: "probe_future_versions",
                description: "Probe the CDN for stable builds newer than the catalog lists",
            },
            FieldMeta {
                name: "os_key",
                description: "Pin the catalog OS key (win10/win11); empty = detect from the host",
            },
            FieldMeta {
                name: "chrome_install_dir",
                description: "Chrome build extraction directory",
            },
            FieldMeta {
                name: "chrome_staging_dir",
                description: "Chrome archive staging directory (removed after the run)",
            },
            FieldMeta {
                name: "chrome_driver_dir",
                description: "Chromedriver extraction directory",
            },
            FieldMeta {
                name: "firefox_install_dir",
                description: "Firefox build extraction directory",
            },
            FieldMeta {
                name: "firefox_staging_dir",
                description: "Firefox archive staging directory (removed after the run)",
            },
            FieldMeta {
                name: "edge_install_dir",
                description: "Edge build extraction directory",
            },
            FieldMeta {
                name: "edge_staging_dir",
                description: "Edge archive staging directory (removed after the run)",
            },
            FieldMeta {
                name: "edge_driver_dir",
                description: "Edgedriver extraction directory",
            },
        ]
    }
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

fn default_string() -> String {
    String::new()
}

fn default_request_timeout() -> u64 {
    15
}

fn default_channel_cap() -> usize {
    5
}

fn default_chrome_install_dir() -> String {
    r"G:\chrome".to_string()
}

fn default_chrome_staging_dir() -> String {
    r"G:\New_chrome_browser".to_string()
}

fn default_chrome_driver_dir() -> String {
    r"G:\drivers\Chrome".to_string()
}

fn default_firefox_install_dir() -> String {
    r"G:\firefox".to_string()
}

fn default_firefox_staging_dir() -> String {
    r"G:\New_browser_firefox".to_string()
}

fn default_edge_install_dir() -> String {
    r"C:\Program Files (x86)\Microsoft\EdgeCore".to_string()
}

fn default_edge_staging_dir() -> String {
    r"G:\New_browser_edge".to_string()
}

fn default_edge_driver_dir() -> String {
    r"G:\drivers\edge".to_string()
}
