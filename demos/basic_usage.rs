//! Basic usage: a named logger fanning out to stdout.

use fanlog::prelude::*;
use fanlog::{debug, error, info, warn};

fn main() {
    let logger = Logger::builder()
        .name("demo")
        .overflow(OverflowPolicy::Block)
        .sink(StdoutSink::new())
        .build();

    debug!(logger, "starting up");
    info!(logger, "listening on {}:{}", "0.0.0.0", 8080);
    warn!(logger, "config file missing, using defaults");
    error!(logger, "upstream {} unreachable", "db-1");

    // Dropping the logger drains everything queued before returning.
}
