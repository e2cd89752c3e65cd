//! Host OS detection for catalog queries.
//!
//! The catalog keys browser builds by Windows release (`win10`/`win11`).
//! Anything else — non-Windows hosts, unrecognized releases — yields `None`,
//! a sentinel meaning "skip the run", not an error.

use std::fmt;

use sysinfo::System;
use tracing::debug;

use super::context::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsKey {
    Win10,
    Win11,
}

impl OsKey {
    pub fn catalog_key(self) -> &'static str {
        match self {
            OsKey::Win10 => "win10",
            OsKey::Win11 => "win11",
        }
    }

    pub fn from_catalog_key(raw: &str) -> Option<OsKey> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "win10" => Some(OsKey::Win10),
            "win11" => Some(OsKey::Win11),
            _ => None,
        }
    }
}

impl fmt::Display for OsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.catalog_key())
    }
}

/// A pinned `os_key` in the config wins (CI hosts, tests); otherwise detect
/// from the running host.
pub fn os_key(config: &Config) -> Option<OsKey> {
    let pinned = config.os_key.trim();
    if !pinned.is_empty() {
        return OsKey::from_catalog_key(pinned);
    }
    detect()
}

pub fn detect() -> Option<OsKey> {
    let long_version = System::long_os_version()?;
    let key = release_from_long_version(&long_version);
    debug!(target: "os_release", host = %long_version, detected = ?key, "detected host release");
    key
}

fn release_from_long_version(long_version: &str) -> Option<OsKey> {
    if long_version.contains("Windows 11") {
        Some(OsKey::Win11)
    } else if long_version.contains("Windows 10") {
        Some(OsKey::Win10)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_keys_round_trip() {
        assert_eq!(OsKey::from_catalog_key("win10"), Some(OsKey::Win10));
        assert_eq!(OsKey::from_catalog_key("WIN11"), Some(OsKey::Win11));
        assert_eq!(OsKey::from_catalog_key("win7"), None);
        assert_eq!(OsKey::Win11.catalog_key(), "win11");
    }

    #[test]
    fn pinned_os_key_bypasses_detection() {
        let mut config = Config::default();
        config.os_key = "win11".to_string();
        assert_eq!(os_key(&config), Some(OsKey::Win11));

        config.os_key = "solaris".to_string();
        assert_eq!(os_key(&config), None);
    }

    #[test]
    fn release_parsing_only_accepts_win10_and_win11() {
        assert_eq!(
            release_from_long_version("Windows 11 Pro"),
            Some(OsKey::Win11)
        );
        assert_eq!(
            release_from_long_version("Windows 10 Enterprise"),
            Some(OsKey::Win10)
        );
        assert_eq!(release_from_long_version("Windows 8.1"), None);
        assert_eq!(release_from_long_version("Ubuntu 24.04"), None);
    }
}
