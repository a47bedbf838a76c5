//! Write profile documents without overwriting existing files.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(PathBuf),
    /// The target already existed and was left untouched.
    Skipped(PathBuf),
}

/// Write `contents` to `path` unless something already exists there.
///
/// The existence check is repeated at open time (`create_new`), so a file
/// appearing between check and write is skipped as well.
pub fn write_if_absent(path: &Path, contents: &str) -> Result<WriteOutcome> {
    if path.exists() {
        warn!(
            "File {} already exists. Delete file or change file name to serialize CGMES classes.",
            path.display()
        );
        return Ok(WriteOutcome::Skipped(path.to_path_buf()));
    }

    let file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
            warn!("File {} appeared before it could be written.", path.display());
            return Ok(WriteOutcome::Skipped(path.to_path_buf()));
        }
        Err(err) => {
            return Err(err).with_context(|| format!("creating CGMES file: {}", path.display()))
        }
    };

    info!("Write file \"{}\"", path.display());
    let mut writer = BufWriter::new(file);
    writer
        .write_all(contents.as_bytes())
        .with_context(|| format!("writing CGMES file: {}", path.display()))?;
    writer.flush()?;
    Ok(WriteOutcome::Written(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn writes_new_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grid_Equipment.xml");
        let outcome = write_if_absent(&path, "<rdf:RDF/>").unwrap();
        assert_eq!(outcome, WriteOutcome::Written(path.clone()));
        assert_eq!(fs::read_to_string(&path).unwrap(), "<rdf:RDF/>");
    }

    #[test]
    fn never_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grid_Equipment.xml");
        fs::write(&path, "original").unwrap();
        let outcome = write_if_absent(&path, "replacement").unwrap();
        assert_eq!(outcome, WriteOutcome::Skipped(path.clone()));
        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("grid_Equipment.xml");
        let err = write_if_absent(&path, "x").unwrap_err();
        assert!(err.to_string().contains("creating CGMES file"));
    }
}
