//! Log record composition
//!
//! A record captures everything known at the call site (level, origin,
//! payload) plus wall-clock time and the calling thread, and renders the
//! canonical wire line:
//!
//! ```text
//! [HH:MM:SS][<thread-id>][<LEVEL>][<logger>][<file>:<line>]\t<payload>\n
//! ```
//!
//! Once rendered, a record is opaque bytes; nothing downstream reparses it.

use super::level::Level;
use chrono::{DateTime, Local};
use std::cell::RefCell;

// Thread-local cache of the thread-id rendering to avoid re-formatting it
// on every record from the same thread.
thread_local! {
    static THREAD_TAG: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Get the cached thread tag, computing it on first access.
fn thread_tag() -> String {
    THREAD_TAG.with(|cache| {
        let mut cache = cache.borrow_mut();
        if cache.is_none() {
            *cache = Some(format!("{:?}", std::thread::current().id()));
        }
        cache.as_ref().expect("thread tag cached in previous line").clone()
    })
}

#[derive(Debug, Clone)]
pub struct Record {
    pub level: Level,
    pub timestamp: DateTime<Local>,
    pub thread_tag: String,
    pub logger: String,
    pub file: String,
    pub line: u32,
    pub payload: String,
}

impl Record {
    pub fn new(
        level: Level,
        file: &str,
        line: u32,
        logger: &str,
        payload: String,
    ) -> Self {
        Self {
            level,
            timestamp: Local::now(),
            thread_tag: thread_tag(),
            logger: logger.to_string(),
            file: file.to_string(),
            line,
            payload,
        }
    }

    /// Render the canonical wire line. Time is local wall-clock at seconds
    /// resolution; the payload is emitted verbatim.
    pub fn to_wire(&self) -> String {
        format!(
            "[{}][{}][{}][{}][{}:{}]\t{}\n",
            self.timestamp.format("%H:%M:%S"),
            self.thread_tag,
            self.level.as_str(),
            self.logger,
            self.file,
            self.line,
            self.payload
        )
    }
}
