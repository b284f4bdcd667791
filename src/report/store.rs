//! Flat-file storage for generated reports.

use crate::error::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Directory reports are written to unless the caller picks another.
pub const DEFAULT_REPORT_DIR: &str = "reports";

/// Write a report under `directory`, creating the directory if absent.
/// Returns the full path of the written file.
pub fn save_report<P: AsRef<Path>>(directory: P, filename: &str, content: &str) -> Result<PathBuf> {
    let directory = directory.as_ref();
    fs::create_dir_all(directory)?;
    let path = directory.join(filename);
    fs::write(&path, content)?;
    tracing::info!(path = %path.display(), bytes = content.len(), "saved report");
    Ok(path)
}

/// Read a previously saved report. A missing file is an absence, not an
/// error: returns `Ok(None)`.
pub fn load_report<P: AsRef<Path>>(directory: P, filename: &str) -> Result<Option<String>> {
    let path = directory.as_ref().join(filename);
    match fs::read_to_string(&path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_byte_identically() {
        let dir = tempfile::tempdir().unwrap();
        let content = "## Report\n\n- line one\n- line two\n";

        let path = save_report(dir.path(), "customer_T1_report.md", content).unwrap();
        assert!(path.ends_with("customer_T1_report.md"));

        let loaded = load_report(dir.path(), "customer_T1_report.md").unwrap();
        assert_eq!(loaded.as_deref(), Some(content));
    }

    #[test]
    fn missing_report_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_report(dir.path(), "nope.md").unwrap();
        assert_eq!(loaded, None);
    }

    #[test]
    fn creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        save_report(&nested, "r.md", "x").unwrap();
        assert_eq!(load_report(&nested, "r.md").unwrap().as_deref(), Some("x"));
    }
}
