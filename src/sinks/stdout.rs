//! Standard output sink

use super::Sink;
use crate::core::error::Result;
use std::io::Write;

#[derive(Debug, Default)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for StdoutSink {
    fn flush(&mut self, batch: &[u8]) -> Result<()> {
        let mut out = std::io::stdout().lock();
        out.write_all(batch)?;
        out.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "stdout"
    }
}
