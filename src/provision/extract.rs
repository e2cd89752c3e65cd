//! Zip extraction into install/driver directories.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use zip::ZipArchive;

/// Unzip a staged archive into `dest`, creating directories as needed.
/// Entries whose names escape `dest` are skipped.
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<()> {
    let file =
        fs::File::open(archive).with_context(|| format!("open {}", archive.display()))?;
    let mut zip =
        ZipArchive::new(file).with_context(|| format!("read zip {}", archive.display()))?;
    fs::create_dir_all(dest).with_context(|| format!("create {}", dest.display()))?;

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index).context("read zip entry")?;
        let Some(relative) = entry.enclosed_name().map(Path::to_path_buf) else {
            continue;
        };
        let out_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)
                .with_context(|| format!("create {}", out_path.display()))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        let mut out = fs::File::create(&out_path)
            .with_context(|| format!("create {}", out_path.display()))?;
        io::copy(&mut entry, &mut out).context("write extracted file")?;
    }

    Ok(())
}

/// Test fixture: a zip holding `{folder}/payload.bin`, the shape of a CDN
/// browser archive.
#[cfg(test)]
pub(crate) fn build_zip(folder: &str) -> Vec<u8> {
    use std::io::Write as _;

    let mut cursor = io::Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut cursor);
        let options =
            zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        writer.add_directory(format!("{folder}/"), options).unwrap();
        writer
            .start_file(format!("{folder}/payload.bin"), options)
            .unwrap();
        writer.write_all(b"browser build payload").unwrap();
        writer.finish().unwrap();
    }
    cursor.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archives_extract_into_a_version_folder() {
        let root = tempfile::tempdir().unwrap();
        let archive = root.path().join("Edge+131.0.zip");
        fs::write(&archive, build_zip("131.0")).unwrap();

        let dest = root.path().join("edge");
        extract_archive(&archive, &dest).unwrap();

        let payload = dest.join("131.0").join("payload.bin");
        assert_eq!(fs::read(payload).unwrap(), b"browser build payload");
    }

    #[test]
    fn a_malformed_archive_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        let archive = root.path().join("broken.zip");
        fs::write(&archive, b"definitely not a zip").unwrap();

        let dest = root.path().join("out");
        assert!(extract_archive(&archive, &dest).is_err());
    }
}
