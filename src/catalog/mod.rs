//! Version-catalog access and channel bucketing.
//!
//! Submodules:
//! - `models` — browser/channel data model and version ordering
//! - `client` — capability-endpoint client
//! - `future` — synthesized future-version probe against the CDN

pub mod client;
pub mod future;
pub mod models;
