//! Capability-endpoint client.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use tracing::info;

use super::models::{Browser, CatalogResponse, ChannelBuckets};
use crate::base_system::os_release::OsKey;
use crate::branch::Endpoints;

const CLIENT_USER_AGENT: &str = concat!("grid-browser-provisioner/", env!("CARGO_PKG_VERSION"));

pub struct CatalogClient {
    http: Client,
}

impl CatalogClient {
    pub fn new(timeout: Duration) -> Result<CatalogClient> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("init http client")?;
        Ok(CatalogClient { http })
    }

    /// Fetch and bucket the catalog for one browser. Any HTTP or decode
    /// failure here is fatal for the whole run.
    pub fn resolve(
        &self,
        endpoints: &Endpoints,
        browser: Browser,
        os_key: OsKey,
        cap: usize,
    ) -> Result<ChannelBuckets> {
        let url = capability_url(endpoints, browser, os_key);
        let resp = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .send()
            .with_context(|| format!("request capability catalog: {url}"))?
            .error_for_status()
            .context("capability catalog status")?;

        let catalog = resp
            .json::<CatalogResponse>()
            .context("parse capability catalog json")?;

        let buckets = ChannelBuckets::from_entries(catalog.versions, cap);
        info!(
            target: "catalog",
            browser = %browser,
            stable = buckets.stable.len(),
            beta = buckets.beta.len(),
            dev = buckets.dev.len(),
            "resolved channel buckets"
        );
        Ok(buckets)
    }
}

fn capability_url(endpoints: &Endpoints, browser: Browser, os_key: OsKey) -> String {
    format!(
        "{}/api/v2/capability?grid=selenium&browser={}&os={}",
        endpoints.api_base,
        browser.catalog_key(),
        os_key.catalog_key()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn endpoints_for(server: &MockServer) -> Endpoints {
        Endpoints {
            api_base: server.uri(),
            cdn_base: server.uri(),
        }
    }

    #[test]
    fn capability_url_carries_grid_browser_and_os() {
        let endpoints = Endpoints {
            api_base: "https://stage-api.lambdatestinternal.com".to_string(),
            cdn_base: String::new(),
        };
        assert_eq!(
            capability_url(&endpoints, Browser::Chrome, OsKey::Win10),
            "https://stage-api.lambdatestinternal.com/api/v2/capability?grid=selenium&browser=chrome&os=win10"
        );
    }

    #[test]
    fn resolve_buckets_a_catalog_response() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let server = rt.block_on(MockServer::start());
        rt.block_on(
            Mock::given(method("GET"))
                .and(path("/api/v2/capability"))
                .and(query_param("browser", "edge"))
                .and(query_param("os", "win11"))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "versions": [
                        {"version": "130.0", "channel_type": "stable"},
                        {"version": "131.0", "channel_type": "beta"},
                        {"version": "132.0", "channel_type": "dev"},
                        {"version": "129.0", "channel_type": "stable"},
                    ]
                })))
                .mount(&server),
        );

        let client = CatalogClient::new(Duration::from_secs(5)).unwrap();
        let buckets = client
            .resolve(&endpoints_for(&server), Browser::Edge, OsKey::Win11, 5)
            .unwrap();
        assert_eq!(buckets.stable, ["130.0", "129.0"]);
        assert_eq!(buckets.beta, ["131.0"]);
        assert_eq!(buckets.dev, ["132.0"]);
    }

    #[test]
    fn non_2xx_catalog_response_is_an_error() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let server = rt.block_on(MockServer::start());
        rt.block_on(
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(503))
                .mount(&server),
        );

        let client = CatalogClient::new(Duration::from_secs(5)).unwrap();
        let result = client.resolve(&endpoints_for(&server), Browser::Chrome, OsKey::Win10, 5);
        assert!(result.is_err());
    }

    #[test]
    fn malformed_catalog_json_is_an_error() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let server = rt.block_on(MockServer::start());
        rt.block_on(
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
                .mount(&server),
        );

        let client = CatalogClient::new(Duration::from_secs(5)).unwrap();
        let result = client.resolve(&endpoints_for(&server), Browser::Chrome, OsKey::Win10, 5);
        assert!(result.is_err());
    }
}
