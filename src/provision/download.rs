//! Streaming archive download into the staging directory.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_LENGTH;

/// Download `url` into `staging_dir`, named after the URL basename. Shows a
/// progress bar when the content length is known.
pub fn download_archive(http: &Client, url: &str, staging_dir: &Path) -> Result<PathBuf> {
    let resp = http
        .get(url)
        .send()
        .with_context(|| format!("download archive: {url}"))?
        .error_for_status()
        .context("download status")?;

    let total = resp
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0);

    let fname = url
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow!("archive url has no basename: {url}"))?;
    fs::create_dir_all(staging_dir)
        .with_context(|| format!("create staging dir {}", staging_dir.display()))?;
    let out_path = staging_dir.join(fname);

    let pb = (total > 0).then(|| {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                .unwrap()
                .progress_chars("##-"),
        );
        pb.set_message(format!("Downloading {fname}"));
        pb
    });

    let mut file =
        fs::File::create(&out_path).with_context(|| format!("create {}", out_path.display()))?;
    let mut reader = resp;
    let mut buf = [0u8; 8192];
    loop {
        let n = reader.read(&mut buf).context("read download stream")?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n]).context("write staged archive")?;
        if let Some(pb) = pb.as_ref() {
            pb.inc(n as u64);
        }
    }
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    Ok(out_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn archives_land_in_staging_named_after_the_url_basename() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let server = rt.block_on(MockServer::start());
        rt.block_on(
            Mock::given(method("GET"))
                .and(path("/windows/chrome/Google+Chrome+120.0.zip"))
                .respond_with(ResponseTemplate::new(200).set_body_bytes(b"archive-bytes".to_vec()))
                .mount(&server),
        );

        let staging = tempfile::tempdir().unwrap();
        let http = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        let url = format!("{}/windows/chrome/Google+Chrome+120.0.zip", server.uri());

        let saved = download_archive(&http, &url, staging.path()).unwrap();
        assert_eq!(
            saved.file_name().unwrap().to_str().unwrap(),
            "Google+Chrome+120.0.zip"
        );
        assert_eq!(fs::read(&saved).unwrap(), b"archive-bytes");
    }

    #[test]
    fn a_404_download_is_an_error() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let server = rt.block_on(MockServer::start());
        rt.block_on(
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(404))
                .mount(&server),
        );

        let staging = tempfile::tempdir().unwrap();
        let http = Client::new();
        let url = format!("{}/windows/firefox/121.0.zip", server.uri());
        assert!(download_archive(&http, &url, staging.path()).is_err());
    }
}
