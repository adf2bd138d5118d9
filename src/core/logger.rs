//! Logger facade
//!
//! A logger renders records and pushes them into its hand-off worker. The
//! sink list is moved into the worker's fan-out callback, so the consumer
//! thread is the only code that ever touches a sink and the sinks outlive
//! every batch by construction. For severe records the logger additionally
//! submits a remote-ship task to the backup pool and waits for it, so an
//! `error`/`fatal` call does not return before the remote copy is at least
//! in flight.

use super::buffer::BufferConfig;
use super::level::Level;
use super::pool::ThreadPool;
use super::record::Record;
use super::worker::{FlushFn, OverflowPolicy, SwapWorker};
use crate::backup::{BackupClient, BackupConfig};
use crate::config::Config;
use crate::sinks::{Sink, StdoutSink};
use std::fmt;
use std::sync::Arc;

struct Shipper {
    pool: Arc<ThreadPool>,
    client: BackupClient,
}

pub struct Logger {
    name: String,
    worker: SwapWorker,
    shipper: Option<Shipper>,
}

impl Logger {
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render and queue one record; for severe levels also ship it to the
    /// remote backup endpoint and wait for the attempt to finish.
    pub fn log(&self, level: Level, file: &str, line: u32, args: fmt::Arguments<'_>) {
        let record = Record::new(level, file, line, &self.name, args.to_string());
        let wire = record.to_wire();
        self.worker.push(wire.as_bytes());
        if level.is_severe() {
            self.ship_backup(wire);
        }
    }

    fn ship_backup(&self, wire: String) {
        let Some(shipper) = &self.shipper else {
            return;
        };
        let client = shipper.client.clone();
        match shipper.pool.submit(move || client.ship(wire.as_bytes())) {
            Ok(handle) => {
                if handle.join().is_err() {
                    eprintln!(
                        "[fanlog] remote backup task for logger '{}' failed",
                        self.name
                    );
                }
            }
            Err(_) => {
                // The local record is already queued; only the remote copy
                // is lost.
                eprintln!(
                    "[fanlog] backup pool closed, logger '{}' record kept locally only",
                    self.name
                );
            }
        }
    }

    #[inline]
    pub fn debug(&self, file: &str, line: u32, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, file, line, args);
    }

    #[inline]
    pub fn info(&self, file: &str, line: u32, args: fmt::Arguments<'_>) {
        self.log(Level::Info, file, line, args);
    }

    #[inline]
    pub fn warn(&self, file: &str, line: u32, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, file, line, args);
    }

    #[inline]
    pub fn error(&self, file: &str, line: u32, args: fmt::Arguments<'_>) {
        self.log(Level::Error, file, line, args);
    }

    #[inline]
    pub fn fatal(&self, file: &str, line: u32, args: fmt::Arguments<'_>) {
        self.log(Level::Fatal, file, line, args);
    }

    /// Stop the hand-off worker after it drains everything queued. Dropping
    /// the logger does the same; this is for callers that want the drain at
    /// a chosen point.
    pub fn shutdown(&mut self) {
        self.worker.stop();
    }
}

/// Builder for constructing a [`Logger`] with a fluent API
///
/// # Example
/// ```
/// use fanlog::prelude::*;
///
/// let logger = Logger::builder()
///     .name("app")
///     .overflow(OverflowPolicy::Block)
///     .sink(StdoutSink::new())
///     .build();
/// ```
pub struct LoggerBuilder {
    name: String,
    policy: OverflowPolicy,
    buffer: BufferConfig,
    sinks: Vec<Box<dyn Sink>>,
    shipper: Option<(Arc<ThreadPool>, BackupConfig)>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            name: "default".to_string(),
            policy: OverflowPolicy::Block,
            buffer: BufferConfig::default(),
            sinks: Vec::new(),
            shipper: None,
        }
    }

    /// Pull buffer sizing and the backup endpoint from a [`Config`]; the
    /// pool carrying the remote-ship tasks is supplied by the caller.
    pub fn from_config(config: &Config, pool: Arc<ThreadPool>) -> Self {
        let mut builder = Self::new();
        builder.buffer = config.buffer_config();
        builder.shipper = Some((
            pool,
            BackupConfig {
                addr: config.backup_addr,
                port: config.backup_port,
            },
        ));
        builder
    }

    #[must_use = "builder methods return a new value"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn overflow(mut self, policy: OverflowPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn buffer(mut self, buffer: BufferConfig) -> Self {
        self.buffer = buffer;
        self
    }

    /// Add a sink; fan-out order is insertion order.
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn boxed_sink(mut self, sink: Box<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Ship severe records to `backup` via `pool`.
    #[must_use = "builder methods return a new value"]
    pub fn remote(mut self, pool: Arc<ThreadPool>, backup: BackupConfig) -> Self {
        self.shipper = Some((pool, backup));
        self
    }

    /// Build the logger and start its consumer thread. A builder with no
    /// sinks gets a [`StdoutSink`].
    pub fn build(self) -> Logger {
        let mut sinks = self.sinks;
        if sinks.is_empty() {
            sinks.push(Box::new(StdoutSink::new()));
        }

        let callback: FlushFn = Box::new(move |batch: &[u8]| {
            for sink in sinks.iter_mut() {
                if let Err(e) = sink.flush(batch) {
                    eprintln!("[fanlog] sink '{}' failed: {}", sink.name(), e);
                }
            }
        });

        Logger {
            worker: SwapWorker::spawn(&self.buffer, self.policy, callback),
            name: self.name,
            shipper: self
                .shipper
                .map(|(pool, backup)| Shipper {
                    pool,
                    client: BackupClient::new(backup),
                }),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
