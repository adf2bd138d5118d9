//! Size-rolled file sink
//!
//! Writes to `<basename><YYYYMMDDHHMMSS>-<seq>.log`, opening the next file
//! whenever the current one has reached `max_size` at the start of a write.
//! The batch that overshoots the bound stays in the current file; the roll
//! happens on the following call.

use super::{apply_flush_policy, file::create_parent_dirs, Sink};
use crate::config::FlushPolicy;
use crate::core::error::{LoggerError, Result};
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

pub struct RollingFileSink {
    basename: PathBuf,
    max_size: u64,
    policy: FlushPolicy,
    /// Increments once per roll over the sink's lifetime.
    seq: u64,
    current_size: u64,
    writer: Option<BufWriter<File>>,
}

impl RollingFileSink {
    /// `basename` is a filename prefix; a trailing separator makes it a
    /// directory prefix. Missing directories are created up front.
    pub fn new(basename: impl Into<PathBuf>, max_size: u64, policy: FlushPolicy) -> Result<Self> {
        let basename = basename.into();
        if basename.to_string_lossy().ends_with(['/', '\\']) {
            std::fs::create_dir_all(&basename).map_err(|e| {
                LoggerError::sink(
                    basename.display().to_string(),
                    format!("failed to create log directory: {}", e),
                )
            })?;
        } else {
            create_parent_dirs(&basename)?;
        }

        Ok(Self {
            basename,
            max_size,
            policy,
            seq: 1,
            current_size: 0,
            writer: None,
        })
    }

    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    /// Open the next file in the sequence. Called lazily before the first
    /// write and after every size overshoot.
    fn roll(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }

        let filename = format!(
            "{}{}-{}.log",
            self.basename.display(),
            Local::now().format("%Y%m%d%H%M%S"),
            self.seq
        );
        self.seq += 1;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&filename)
            .map_err(|e| LoggerError::sink(filename.clone(), format!("failed to open: {}", e)))?;

        self.writer = Some(BufWriter::new(file));
        self.current_size = 0;
        Ok(())
    }
}

impl Sink for RollingFileSink {
    fn flush(&mut self, batch: &[u8]) -> Result<()> {
        if self.writer.is_none() || self.current_size >= self.max_size {
            self.roll()?;
        }

        let writer = match self.writer.as_mut() {
            Some(writer) => writer,
            None => {
                return Err(LoggerError::sink(
                    self.basename.display().to_string(),
                    "no open roll file",
                ))
            }
        };

        writer.write_all(batch).map_err(|e| {
            LoggerError::sink(
                self.basename.display().to_string(),
                format!("failed to write batch: {}", e),
            )
        })?;
        self.current_size += batch.len() as u64;

        apply_flush_policy(writer, self.policy).map_err(|e| {
            LoggerError::sink(
                self.basename.display().to_string(),
                format!("failed to flush: {}", e),
            )
        })?;
        Ok(())
    }

    fn name(&self) -> &str {
        "rolling_file"
    }
}

impl Drop for RollingFileSink {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}
