//! Writers for the exported nozzle index list.
//!
//! The export format is plain text with one nozzle index per line, ascending
//! and without duplicates.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during write operations.
#[derive(Error, Debug)]
pub enum WriteError {
    /// Failed to create parent directories.
    #[error("failed to create parent directories for '{path}': {source}")]
    CreateDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or open file for writing.
    #[error("failed to create file '{path}': {source}")]
    CreateFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write data to file.
    #[error("failed to write to file '{path}': {source}")]
    WriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for write operations.
pub type Result<T> = std::result::Result<T, WriteError>;

/// Creates parent directories for a file path if they don't exist.
fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| WriteError::CreateDirectory {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
    }
    Ok(())
}

/// Creates a buffered writer for the given path.
fn create_buffered_writer(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|e| WriteError::CreateFile {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(BufWriter::new(file))
}

/// Write nozzle indices as plain text, one per line.
///
/// `offset` is added to every index, e.g. 1 for one-based nozzle numbering.
/// Indices are written in the order given; callers pass the combined list,
/// which is already sorted and unique.
///
/// # Errors
///
/// Returns an error if parent directories or the file cannot be created, or
/// if writing fails.
///
/// # Example
///
/// ```no_run
/// use nozzle_finder::core::writers::write_index_list;
/// use std::path::Path;
///
/// write_index_list(Path::new("flaw_nozzle.txt"), &[3, 17, 250], 0).unwrap();
/// ```
pub fn write_index_list(path: &Path, indices: &[usize], offset: usize) -> Result<()> {
    ensure_parent_dirs(path)?;
    let mut writer = create_buffered_writer(path)?;
    let path_str = path.display().to_string();

    for &idx in indices {
        writeln!(writer, "{}", idx + offset).map_err(|e| WriteError::WriteFile {
            path: path_str.clone(),
            source: e,
        })?;
    }

    writer.flush().map_err(|e| WriteError::WriteFile {
        path: path_str,
        source: e,
    })?;

    Ok(())
}

/// Build the export filename, `{prefix}_{YYYYMMDD}_{model_tag}_{machine}.txt`.
pub fn output_file_name(prefix: &str, date: NaiveDate, model_tag: &str, machine: &str) -> String {
    format!(
        "{}_{}_{}_{}.txt",
        prefix,
        date.format("%Y%m%d"),
        model_tag,
        machine
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_index_list() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nozzles.txt");

        write_index_list(&path, &[1, 5, 42], 0).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "1\n5\n42\n");
    }

    #[test]
    fn test_write_index_list_with_offset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nozzles.txt");

        write_index_list(&path, &[0, 634], 1).unwrap();

        let lines: Vec<String> = fs::read_to_string(&path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect();
        assert_eq!(lines, vec!["1", "635"]);
    }

    #[test]
    fn test_write_empty_list() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.txt");

        write_index_list(&path, &[], 0).unwrap();

        assert!(path.exists());
        assert!(fs::read_to_string(&path).unwrap().is_empty());
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("nested").join("nozzles.txt");

        write_index_list(&path, &[7], 0).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_output_file_name() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        assert_eq!(
            output_file_name("flaw_nozzle", date, "680k", "04"),
            "flaw_nozzle_20260309_680k_04.txt"
        );
    }
}
