//! Synthesized future-version probe.
//!
//! The catalog sometimes lags behind what the deploy CDN already serves, so
//! the resolver can speculatively check the next few major versions after the
//! newest stable build. Any synthesized version the CDN answers a `HEAD`
//! request for is merged into the stable bucket.

use reqwest::blocking::Client;
use tracing::{debug, info};

use super::models::{self, Browser};
use crate::branch::Endpoints;
use crate::provision::urls;

const FUTURE_MAJOR_SPAN: u64 = 5;

/// `"120.0"` → `["121.0", ..., "125.0"]`. Input that is not a `major.minor`
/// pair of numbers yields an empty list, never an error.
pub fn generate_future_versions(latest: &str) -> Vec<String> {
    let mut parts = latest.trim().split('.');
    let (Some(major), Some(minor), None) = (parts.next(), parts.next(), parts.next()) else {
        return Vec::new();
    };
    let Ok(major) = major.parse::<u64>() else {
        return Vec::new();
    };
    if minor.parse::<u64>().is_err() {
        return Vec::new();
    }
    (1..=FUTURE_MAJOR_SPAN)
        .map(|step| format!("{}.0", major + step))
        .collect()
}

/// Probe the CDN for future stable builds of `browser` and merge those that
/// exist into `stable`, newest first, truncated to `cap`.
pub fn merge_probed_stable(
    http: &Client,
    endpoints: &Endpoints,
    browser: Browser,
    mut stable: Vec<String>,
    cap: usize,
) -> Vec<String> {
    let Some(latest) = stable.first().cloned() else {
        return stable;
    };

    for candidate in generate_future_versions(&latest) {
        let url = urls::binary_url(endpoints, browser, &candidate);
        match http.head(&url).send() {
            Ok(resp) if resp.status().is_success() => {
                info!(
                    target: "catalog",
                    browser = %browser,
                    version = %candidate,
                    "future build present on CDN"
                );
                stable.push(candidate);
            }
            Ok(_) => {
                debug!(target: "catalog", version = %candidate, "future build not on CDN");
            }
            Err(err) => {
                debug!(target: "catalog", version = %candidate, "future probe failed: {err}");
            }
        }
    }

    models::sort_desc(&mut stable);
    stable.truncate(cap);
    stable
}
