//! Append-only file sink

use super::{apply_flush_policy, Sink};
use crate::config::FlushPolicy;
use crate::core::error::{LoggerError, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct FileSink {
    path: PathBuf,
    writer: BufWriter<File>,
    policy: FlushPolicy,
}

impl FileSink {
    /// Open `path` for appending, creating missing parent directories.
    pub fn new(path: impl Into<PathBuf>, policy: FlushPolicy) -> Result<Self> {
        let path = path.into();
        create_parent_dirs(&path)?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::sink(path.display().to_string(), format!("failed to open: {}", e))
            })?;

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            policy,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn flush(&mut self, batch: &[u8]) -> Result<()> {
        self.writer.write_all(batch).map_err(|e| {
            LoggerError::sink(
                self.path.display().to_string(),
                format!("failed to write batch: {}", e),
            )
        })?;
        apply_flush_policy(&mut self.writer, self.policy).map_err(|e| {
            LoggerError::sink(self.path.display().to_string(), format!("failed to flush: {}", e))
        })?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Hand buffered bytes to the OS even under FlushPolicy::OsBuffered.
        let _ = self.writer.flush();
    }
}

/// `mkdir -p` for the directory holding `path`.
pub(crate) fn create_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::sink(
                    parent.display().to_string(),
                    format!("failed to create log directory: {}", e),
                )
            })?;
        }
    }
    Ok(())
}
