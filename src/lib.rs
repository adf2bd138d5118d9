//! # fanlog
//!
//! An asynchronous, multi-sink, leveled logging library for server-class
//! processes.
//!
//! ## Features
//!
//! - **Double-buffered hand-off**: producers append under one short lock;
//!   a single consumer thread swaps buffers in O(1) and fans batches out to
//!   sinks, so sink latency never holds a lock producers need
//! - **Bounded or elastic memory**: blocking backpressure or unbounded
//!   growth, chosen per logger
//! - **Multiple sinks**: stdout, append-only file, size-rolled file
//! - **Remote backup**: ERROR and FATAL records are shipped to a TCP
//!   endpoint through a thread pool, synchronously awaited by the caller
//!
//! ## Quick start
//!
//! ```
//! use fanlog::prelude::*;
//! use fanlog::info;
//!
//! let logger = Logger::builder().name("app").sink(StdoutSink::new()).build();
//! info!(logger, "listening on {}", "0.0.0.0:8080");
//! ```

pub mod backup;
pub mod config;
pub mod core;
pub mod macros;
pub mod registry;
pub mod sinks;

pub mod prelude {
    pub use crate::config::{Config, FlushPolicy};
    pub use crate::core::{
        BufferConfig, Level, Logger, LoggerBuilder, LoggerError, OverflowPolicy, Result,
        ThreadPool,
    };
    pub use crate::sinks::{FileSink, RollingFileSink, Sink, StdoutSink};
}

pub use crate::backup::{BackupClient, BackupConfig};
pub use crate::config::{Config, FlushPolicy};
pub use crate::core::{
    BufferConfig, Level, Logger, LoggerBuilder, LoggerError, OverflowPolicy, Record, Result,
    SwapBuffer, TaskHandle, ThreadPool,
};
pub use crate::registry::{add_logger, get_default_logger, get_logger};
pub use crate::sinks::{FileSink, RollingFileSink, Sink, StdoutSink};
