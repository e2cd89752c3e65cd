//! Browser/channel data model and version ordering.

use std::cmp::Ordering;
use std::fmt;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Browser {
    Chrome,
    Firefox,
    Edge,
}

pub const ALL_BROWSERS: [Browser; 3] = [Browser::Chrome, Browser::Firefox, Browser::Edge];

impl Browser {
    /// Identifier used in capability queries and CDN binary paths.
    pub fn catalog_key(self) -> &'static str {
        match self {
            Browser::Chrome => "chrome",
            Browser::Firefox => "firefox",
            Browser::Edge => "edge",
        }
    }

    /// Directory name for driver archives on the CDN; Firefox ships none.
    pub fn driver_key(self) -> Option<&'static str> {
        match self {
            Browser::Chrome => Some("Chrome"),
            Browser::Edge => Some("Edge"),
            Browser::Firefox => None,
        }
    }

    /// Basename of the binary archive on the CDN. Product-name spaces are
    /// published as literal `+`.
    pub fn archive_basename(self, version: &str) -> String {
        match self {
            Browser::Chrome => format!("Google+Chrome+{version}.zip"),
            Browser::Firefox => format!("{version}.zip"),
            Browser::Edge => format!("Edge+{version}.zip"),
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.catalog_key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelType {
    Stable,
    Beta,
    Dev,
}

pub const ALL_CHANNELS: [ChannelType; 3] =
    [ChannelType::Stable, ChannelType::Beta, ChannelType::Dev];

impl ChannelType {
    pub fn parse(raw: &str) -> Option<ChannelType> {
        match raw.trim() {
            "stable" => Some(ChannelType::Stable),
            "beta" => Some(ChannelType::Beta),
            "dev" => Some(ChannelType::Dev),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChannelType::Stable => "stable",
            ChannelType::Beta => "beta",
            ChannelType::Dev => "dev",
        }
    }

    pub fn is_stable(self) -> bool {
        self == ChannelType::Stable
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw entry as returned by the capability endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub version: String,
    pub channel_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogResponse {
    pub versions: Vec<CatalogEntry>,
}

/// Numeric ordering key for dotted version strings. Versions with any
/// non-numeric segment have no key and sort after every parsed version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct VersionKey(Vec<u64>);

impl VersionKey {
    pub fn parse(version: &str) -> Option<VersionKey> {
        version
            .trim()
            .split('.')
            .map(|segment| segment.parse::<u64>().ok())
            .collect::<Option<Vec<u64>>>()
            .map(VersionKey)
    }
}

/// Sort version strings newest first; unparseable strings keep their relative
/// order at the end.
pub fn sort_desc(versions: &mut [String]) {
    versions.sort_by(|a, b| match (VersionKey::parse(a), VersionKey::parse(b)) {
        (Some(ka), Some(kb)) => kb.cmp(&ka),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Version lists per release channel, newest first, each truncated to the
/// configured cap.
#[derive(Debug, Clone, Default)]
pub struct ChannelBuckets {
    pub stable: Vec<String>,
    pub beta: Vec<String>,
    pub dev: Vec<String>,
}

impl ChannelBuckets {
    /// Bucket catalog entries by channel. Entries with an unrecognized
    /// channel string are dropped.
    pub fn from_entries(entries: Vec<CatalogEntry>, cap: usize) -> ChannelBuckets {
        let mut buckets = ChannelBuckets::default();
        for entry in entries {
            let Some(channel) = ChannelType::parse(&entry.channel_type) else {
                continue;
            };
            buckets.bucket_mut(channel).push(entry.version);
        }
        for channel in ALL_CHANNELS {
            let bucket = buckets.bucket_mut(channel);
            sort_desc(bucket);
            bucket.truncate(cap);
        }
        buckets
    }

    pub fn bucket(&self, channel: ChannelType) -> &[String] {
        match channel {
            ChannelType::Stable => &self.stable,
            ChannelType::Beta => &self.beta,
            ChannelType::Dev => &self.dev,
        }
    }

    fn bucket_mut(&mut self, channel: ChannelType) -> &mut Vec<String> {
        match channel {
            ChannelType::Stable => &mut self.stable,
            ChannelType::Beta => &mut self.beta,
            ChannelType::Dev => &mut self.dev,
        }
    }

    pub fn newest(&self, channel: ChannelType) -> Option<&str> {
        self.bucket(channel).first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(version: &str, channel: &str) -> CatalogEntry {
        CatalogEntry {
            version: version.to_string(),
            channel_type: channel.to_string(),
        }
    }

    #[test]
    fn version_keys_order_numerically_not_lexically() {
        let mut versions = vec![
            "99.0".to_string(),
            "100.0".to_string(),
            "100.2".to_string(),
        ];
        sort_desc(&mut versions);
        assert_eq!(versions, ["100.2", "100.0", "99.0"]);
    }

    #[test]
    fn unparseable_versions_sort_last() {
        let mut versions = vec![
            "nightly".to_string(),
            "120.0".to_string(),
            "121.0".to_string(),
        ];
        sort_desc(&mut versions);
        assert_eq!(versions, ["121.0", "120.0", "nightly"]);
    }

    #[test]
    fn entries_bucket_by_channel_sorted_newest_first() {
        let buckets = ChannelBuckets::from_entries(
            vec![
                entry("1.0", "stable"),
                entry("2.0", "beta"),
                entry("3.0", "dev"),
                entry("4.0", "stable"),
            ],
            5,
        );
        assert_eq!(buckets.stable, ["4.0", "1.0"]);
        assert_eq!(buckets.beta, ["2.0"]);
        assert_eq!(buckets.dev, ["3.0"]);
    }

    #[test]
    fn buckets_never_exceed_the_cap() {
        let entries = (1..=20).map(|n| entry(&format!("{n}.0"), "stable")).collect();
        let buckets = ChannelBuckets::from_entries(entries, 5);
        assert_eq!(buckets.stable.len(), 5);
        assert_eq!(buckets.stable[0], "20.0");
    }

    #[test]
    fn unrecognized_channels_are_dropped() {
        let buckets = ChannelBuckets::from_entries(
            vec![entry("1.0", "stable"), entry("2.0", "weekly")],
            5,
        );
        assert_eq!(buckets.stable, ["1.0"]);
        assert!(buckets.beta.is_empty());
        assert!(buckets.dev.is_empty());
    }

    #[test]
    fn newest_returns_the_head_of_a_bucket() {
        let buckets = ChannelBuckets::from_entries(
            vec![entry("130.0", "beta"), entry("131.0", "beta")],
            5,
        );
        assert_eq!(buckets.newest(ChannelType::Beta), Some("131.0"));
        assert_eq!(buckets.newest(ChannelType::Dev), None);
    }
}
