//! Filesystem maintenance around provisioning runs.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{info, warn};

/// Create every directory that does not exist yet.
pub fn create_directories(dirs: &[&Path]) -> io::Result<()> {
    for dir in dirs {
        if dir.exists() {
            info!(target: "cleanup", dir = %dir.display(), "directory already exists");
        } else {
            fs::create_dir_all(dir)?;
            info!(target: "cleanup", dir = %dir.display(), "created directory");
        }
    }
    Ok(())
}

/// Delete a directory tree. A missing directory is logged and ignored; other
/// failures are logged but never abort the run.
pub fn remove_dir_tree(dir: &Path) {
    match fs::remove_dir_all(dir) {
        Ok(()) => info!(target: "cleanup", dir = %dir.display(), "deleted directory"),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            info!(target: "cleanup", dir = %dir.display(), "directory not found");
        }
        Err(err) => {
            warn!(target: "cleanup", dir = %dir.display(), "failed to delete directory: {err}");
        }
    }
}
