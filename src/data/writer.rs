//! Extract Writer Module
//! Serializes the extract to CSV through a temporary file that is renamed
//! into place, so a failed run never leaves a truncated file behind.

use polars::prelude::*;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum WriterError {
    #[error("Failed to write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to encode CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Failed to encode summary: {0}")]
    Json(#[from] serde_json::Error),
}

/// A fully written temporary file waiting to be renamed over its destination.
#[derive(Debug)]
pub struct StagedFile {
    tmp: NamedTempFile,
    path: PathBuf,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rename the staged file into place.
    pub fn commit(self) -> Result<(), WriterError> {
        let path = self.path;
        self.tmp.persist(&path).map_err(|e| WriterError::Io {
            path: path.clone(),
            source: e.error,
        })?;
        debug!(path = %path.display(), "committed output");
        Ok(())
    }
}

/// Writes files atomically next to their destination.
pub struct ExtractWriter;

impl ExtractWriter {
    /// Write `df` as CSV with a header row and no index column.
    pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<(), WriterError> {
        Self::stage_csv(df, path)?.commit()
    }

    /// Write any serializable value as pretty JSON.
    pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), WriterError> {
        Self::stage_json(value, path)?.commit()
    }

    /// Encode `df` as CSV into a temporary file beside `path`.
    pub fn stage_csv(df: &mut DataFrame, path: &Path) -> Result<StagedFile, WriterError> {
        let staged = Self::stage(path, |file| {
            CsvWriter::new(file).include_header(true).finish(df)?;
            Ok(())
        })?;
        debug!(path = %path.display(), rows = df.height(), "staged extract");
        Ok(staged)
    }

    /// Encode `value` as pretty JSON into a temporary file beside `path`.
    pub fn stage_json<T: Serialize>(value: &T, path: &Path) -> Result<StagedFile, WriterError> {
        Self::stage(path, |file| {
            serde_json::to_writer_pretty(&mut *file, value)?;
            Ok(())
        })
    }

    fn stage<F>(path: &Path, write: F) -> Result<StagedFile, WriterError>
    where
        F: FnOnce(&mut std::fs::File) -> Result<(), WriterError>,
    {
        let io_err = |source: std::io::Error| WriterError::Io {
            path: path.to_path_buf(),
            source,
        };

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        // Dropping the temp file on any error removes it
        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        write(tmp.as_file_mut())?;
        tmp.as_file_mut().flush().map_err(io_err)?;
        Ok(StagedFile {
            tmp,
            path: path.to_path_buf(),
        })
    }
}
