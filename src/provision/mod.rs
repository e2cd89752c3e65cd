//! Provisioning flow.
//!
//! Submodules:
//! - `models`      — targets, step outcomes, per-run reporting
//! - `urls`        — CDN URL templates
//! - `download`    — staged archive download
//! - `extract`     — zip extraction
//! - `provisioner` — per-browser orchestration and cleanup

pub mod download;
pub mod extract;
pub mod models;
pub mod provisioner;
pub mod urls;
