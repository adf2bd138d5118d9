//! Sink implementations
//!
//! A sink is a terminal consumer of rendered record batches. The worker's
//! single consumer thread is the only caller, so sinks need no internal
//! locking; they just need to be `Send` to move onto that thread.

pub mod file;
pub mod rolling;
pub mod stdout;

pub use file::FileSink;
pub use rolling::RollingFileSink;
pub use stdout::StdoutSink;

use crate::config::FlushPolicy;
use crate::core::error::Result;
use std::fs::File;
use std::io::{self, BufWriter, Write};

pub trait Sink: Send {
    /// Deliver one drained batch. Each configured sink of a logger sees the
    /// same batch slice, in sink-list order.
    fn flush(&mut self, batch: &[u8]) -> Result<()>;

    fn name(&self) -> &str;
}

/// Apply the configured flush behavior to a file-backed writer after a
/// batch write.
pub(crate) fn apply_flush_policy(
    writer: &mut BufWriter<File>,
    policy: FlushPolicy,
) -> io::Result<()> {
    match policy {
        FlushPolicy::OsBuffered => Ok(()),
        FlushPolicy::Flush => writer.flush(),
        FlushPolicy::FlushSync => {
            writer.flush()?;
            writer.get_ref().sync_all()
        }
    }
}
