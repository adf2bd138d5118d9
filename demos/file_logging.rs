//! File sinks: append-only and size-rolled, sharing one logger.

use fanlog::info;
use fanlog::prelude::*;

fn main() -> fanlog::Result<()> {
    let file = FileSink::new("logs/app.log", FlushPolicy::Flush)?;
    let rolled = RollingFileSink::new("logs/rolled-", 16 * 1024, FlushPolicy::Flush)?;

    let logger = Logger::builder()
        .name("files")
        .sink(file)
        .sink(rolled)
        .build();

    for i in 0..1000 {
        info!(logger, "work item {} done", i);
    }

    Ok(())
}
