// ABOUTME: Output path resolution and atomic dump file creation
// ABOUTME: Dumps are written to a temp file beside the target and persisted without clobbering

use crate::error::{DumpError, Result};
use chrono::{DateTime, Local};
use std::fmt::Write as _;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Resolve the dump file path for `dir` and a strftime name pattern
///
/// The pattern is formatted with `now`, so `"backup-%Y%m%d.sql"` becomes
/// `"backup-20240115.sql"`. A pattern without `%` tokens is used verbatim.
///
/// # Errors
///
/// - `DirectoryInvalid` if `dir` is not an existing directory
/// - `InvalidNamePattern` if the pattern contains an unknown token or is empty
///
/// # Examples
///
/// ```
/// # use sql_dumper::output::resolve_output_path;
/// let dir = std::env::temp_dir();
/// let now = chrono::Local::now();
/// let path = resolve_output_path(&dir, "dump.sql", now).unwrap();
/// assert_eq!(path, dir.join("dump.sql"));
/// ```
pub fn resolve_output_path(dir: &Path, pattern: &str, now: DateTime<Local>) -> Result<PathBuf> {
    if !dir.is_dir() {
        return Err(DumpError::DirectoryInvalid(dir.to_path_buf()));
    }

    let mut name = String::new();
    write!(name, "{}", now.format(pattern))
        .map_err(|_| DumpError::InvalidNamePattern(pattern.to_string()))?;

    if name.is_empty() || name.contains(std::path::MAIN_SEPARATOR) {
        return Err(DumpError::InvalidNamePattern(pattern.to_string()));
    }

    Ok(dir.join(name))
}

/// A dump being written. Nothing appears at the final path until `commit`;
/// dropping an uncommitted file removes the temp file.
pub struct OutputFile {
    path: PathBuf,
    writer: BufWriter<NamedTempFile>,
}

impl OutputFile {
    /// Create the temp file next to `path`
    ///
    /// # Errors
    ///
    /// `PathAlreadyExists` if `path` is already taken.
    pub fn create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Err(DumpError::PathAlreadyExists(path.to_path_buf()));
        }

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let temp = tempfile::Builder::new()
            .prefix(".sql-dumper-")
            .suffix(".partial")
            .tempfile_in(dir)?;

        tracing::debug!("Writing dump to temp file {}", temp.path().display());

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(temp),
        })
    }

    pub fn writer(&mut self) -> &mut dyn Write {
        &mut self.writer
    }

    /// Flush and move the temp file to its final path without overwriting.
    pub fn commit(self) -> Result<PathBuf> {
        let temp = self
            .writer
            .into_inner()
            .map_err(|e| DumpError::TemplateRenderFailed(e.into_error()))?;

        temp.as_file()
            .sync_all()
            .map_err(DumpError::TemplateRenderFailed)?;

        temp.persist_noclobber(&self.path).map_err(|e| {
            if self.path.exists() {
                DumpError::PathAlreadyExists(self.path.clone())
            } else {
                DumpError::Io(e.error)
            }
        })?;

        Ok(self.path)
    }
}
