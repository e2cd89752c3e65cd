//! CDN URL templates.

use crate::branch::Endpoints;
use crate::catalog::models::Browser;

pub fn binary_url(endpoints: &Endpoints, browser: Browser, version: &str) -> String {
    format!(
        "{}/windows/{}/{}",
        endpoints.cdn_base,
        browser.catalog_key(),
        browser.archive_basename(version)
    )
}

pub fn driver_url(endpoints: &Endpoints, browser: Browser, version: &str) -> Option<String> {
    browser
        .driver_key()
        .map(|name| format!("{}/windows/drivers/{name}/{version}.zip", endpoints.cdn_base))
}

/// Two-segment `major.minor` form used for non-stable builds; the CDN
/// publishes beta/dev archives under the shortened version.
pub fn short_version(version: &str) -> String {
    let mut parts = version.split('.');
    match (parts.next(), parts.next()) {
        (Some(major), Some(minor)) => format!("{major}.{minor}"),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cdn() -> Endpoints {
        Endpoints {
            api_base: String::new(),
            cdn_base: "https://ltbrowserdeploy.lambdatest.com".to_string(),
        }
    }

    #[test]
    fn chrome_archive_names_embed_plus_for_spaces() {
        assert_eq!(
            binary_url(&cdn(), Browser::Chrome, "120.0"),
            "https://ltbrowserdeploy.lambdatest.com/windows/chrome/Google+Chrome+120.0.zip"
        );
        assert_eq!(
            binary_url(&cdn(), Browser::Edge, "131.0"),
            "https://ltbrowserdeploy.lambdatest.com/windows/edge/Edge+131.0.zip"
        );
    }

    #[test]
    fn firefox_archives_are_bare_version_numbers() {
        assert_eq!(
            binary_url(&cdn(), Browser::Firefox, "121.0"),
            "https://ltbrowserdeploy.lambdatest.com/windows/firefox/121.0.zip"
        );
    }

    #[test]
    fn driver_urls_exist_for_chrome_and_edge_only() {
        assert_eq!(
            driver_url(&cdn(), Browser::Chrome, "120.0").as_deref(),
            Some("https://ltbrowserdeploy.lambdatest.com/windows/drivers/Chrome/120.0.zip")
        );
        assert_eq!(
            driver_url(&cdn(), Browser::Edge, "131.0").as_deref(),
            Some("https://ltbrowserdeploy.lambdatest.com/windows/drivers/Edge/131.0.zip")
        );
        assert_eq!(driver_url(&cdn(), Browser::Firefox, "121.0"), None);
    }

    #[test]
    fn short_version_keeps_the_first_two_segments() {
        assert_eq!(short_version("121.0.6167.8"), "121.0");
        assert_eq!(short_version("131.0"), "131.0");
        assert_eq!(short_version("131"), "131");
    }
}
