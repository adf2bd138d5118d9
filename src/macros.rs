//! Logging macros
//!
//! These capture the call site (`file!()`, `line!()`) and format the payload
//! lazily, so a call reads like `println!` with a leading logger expression:
//!
//! ```
//! use fanlog::prelude::*;
//! use fanlog::info;
//!
//! let logger = Logger::builder().name("app").build();
//!
//! info!(logger, "server listening on port {}", 8080);
//! ```

/// Log at an explicit level with automatic call-site capture.
///
/// ```
/// # use fanlog::prelude::*;
/// # let logger = Logger::builder().build();
/// use fanlog::log;
/// log!(logger, Level::Warn, "disk at {}%", 93);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, file!(), line!(), format_args!($($arg)+))
    };
}

/// Log a debug-level record.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

/// Log an info-level record.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

/// Log a warn-level record.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warn, $($arg)+)
    };
}

/// Log an error-level record. Blocks until the remote backup attempt has
/// finished when the logger has a shipper configured.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

/// Log a fatal-level record. Blocks like [`error!`].
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Fatal, $($arg)+)
    };
}

/// Log to the process-wide default logger.
///
/// ```no_run
/// use fanlog::info_default;
/// info_default!("cache warmed in {} ms", 41);
/// ```
#[macro_export]
macro_rules! info_default {
    ($($arg:tt)+) => {
        $crate::info!($crate::registry::get_default_logger(), $($arg)+)
    };
}

/// Log a debug record to the default logger.
#[macro_export]
macro_rules! debug_default {
    ($($arg:tt)+) => {
        $crate::debug!($crate::registry::get_default_logger(), $($arg)+)
    };
}

/// Log a warn record to the default logger.
#[macro_export]
macro_rules! warn_default {
    ($($arg:tt)+) => {
        $crate::warn!($crate::registry::get_default_logger(), $($arg)+)
    };
}

/// Log an error record to the default logger.
#[macro_export]
macro_rules! error_default {
    ($($arg:tt)+) => {
        $crate::error!($crate::registry::get_default_logger(), $($arg)+)
    };
}

/// Log a fatal record to the default logger.
#[macro_export]
macro_rules! fatal_default {
    ($($arg:tt)+) => {
        $crate::fatal!($crate::registry::get_default_logger(), $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::error::Result;
    use crate::core::logger::Logger;
    use crate::sinks::Sink;
    use std::sync::{Arc, Mutex};

    struct CollectingSink(Arc<Mutex<Vec<u8>>>);

    impl Sink for CollectingSink {
        fn flush(&mut self, batch: &[u8]) -> Result<()> {
            self.0.lock().unwrap().extend_from_slice(batch);
            Ok(())
        }

        fn name(&self) -> &str {
            "collecting"
        }
    }

    #[test]
    fn test_macros_capture_this_file() {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let mut logger = Logger::builder()
            .name("macro-test")
            .sink(CollectingSink(Arc::clone(&buf)))
            .build();

        info!(logger, "value is {}", 42);
        warn!(logger, "plain message");
        logger.shutdown();

        let bytes = buf.lock().unwrap();
        let text = std::str::from_utf8(&bytes).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("src/macros.rs"), "got {:?}", text);
        assert!(text.contains("\tvalue is 42\n"));
        assert!(text.contains("][WARN ][macro-test]["));
    }

    #[test]
    fn test_explicit_level_macro() {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let mut logger = Logger::builder()
            .name("macro-level")
            .sink(CollectingSink(Arc::clone(&buf)))
            .build();

        log!(logger, crate::Level::Debug, "counter {}", 5);
        logger.shutdown();

        let bytes = buf.lock().unwrap();
        assert!(std::str::from_utf8(&bytes).unwrap().contains("[DEBUG]"));
    }
}
