// jsonl.rs — Shared append-only JSON Lines plumbing.
//
// Every durable trail in this crate (audit, fail-open, drift) is one JSON
// object per line, opened in append mode so prior lines are never rewritten.
// Reads always go back to the file, so a query sees every record written by
// this or any earlier process.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::AuditError;

/// An append-only writer for records of type `T`.
///
/// Each append is flushed immediately.
pub struct JsonlWriter<T> {
    writer: BufWriter<File>,
    path: PathBuf,
    _record: PhantomData<fn(&T)>,
}

impl<T: Serialize> JsonlWriter<T> {
    /// Open (or create) the file in append mode, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| AuditError::OpenFailed {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| AuditError::OpenFailed {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            writer: BufWriter::new(file),
            path,
            _record: PhantomData,
        })
    }

    /// Serialize one record as a single line and flush.
    pub fn append(&mut self, record: &T) -> Result<(), AuditError> {
        let json = serde_json::to_string(record)?;
        writeln!(self.writer, "{}", json)?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Read every record from a JSONL file, oldest first.
///
/// A missing file is an empty log. Blank lines are skipped; lines that fail
/// to parse are skipped with a warning so one corrupt line cannot hide the
/// rest of the trail.
pub fn read_records<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>, AuditError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = File::open(path).map_err(|source| AuditError::OpenFailed {
        path: path.to_path_buf(),
        source,
    })?;

    let mut records = Vec::new();
    for (line_num, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(&line) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!(
                path = %path.display(),
                line = line_num + 1,
                "skipping malformed log line: {}",
                e
            ),
        }
    }
    Ok(records)
}
