//! Process-wide logger registry
//!
//! A lazily initialized name-to-logger map with one distinguished default
//! entry. First access builds the default logger (stdout sink, blocking
//! overflow) and the shared backup pool; when a [`Config`] has been
//! installed, both pick up its settings.

use crate::config::Config;
use crate::core::logger::Logger;
use crate::core::pool::ThreadPool;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

pub const DEFAULT_LOGGER_NAME: &str = "default";

/// Pool size when no configuration is installed.
const DEFAULT_THREAD_COUNT: usize = 4;

static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub struct Registry {
    pool: Arc<ThreadPool>,
    default_logger: Arc<Logger>,
    loggers: Mutex<HashMap<String, Arc<Logger>>>,
}

impl Registry {
    pub fn instance() -> &'static Registry {
        REGISTRY.get_or_init(Registry::bootstrap)
    }

    fn bootstrap() -> Registry {
        let config = Config::global();
        let pool = Arc::new(ThreadPool::new(
            config.map_or(DEFAULT_THREAD_COUNT, |c| c.thread_count),
        ));

        let builder = match config {
            Some(config) => Logger::builder()
                .buffer(config.buffer_config())
                .remote(Arc::clone(&pool), crate::backup::BackupConfig {
                    addr: config.backup_addr,
                    port: config.backup_port,
                }),
            None => Logger::builder(),
        };
        let default_logger = Arc::new(builder.name(DEFAULT_LOGGER_NAME).build());

        let mut loggers = HashMap::new();
        loggers.insert(DEFAULT_LOGGER_NAME.to_string(), Arc::clone(&default_logger));

        Registry {
            pool,
            default_logger,
            loggers: Mutex::new(loggers),
        }
    }

    /// Register `logger` under its name. A no-op when the name is taken.
    pub fn add(&self, logger: Arc<Logger>) {
        let mut loggers = self.loggers.lock();
        loggers.entry(logger.name().to_string()).or_insert(logger);
    }

    pub fn get(&self, name: &str) -> Option<Arc<Logger>> {
        self.loggers.lock().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.loggers.lock().contains_key(name)
    }

    pub fn default_logger(&self) -> Arc<Logger> {
        Arc::clone(&self.default_logger)
    }

    /// The shared pool carrying remote-ship tasks; hand this to
    /// [`LoggerBuilder::remote`](crate::core::logger::LoggerBuilder::remote)
    /// when building additional loggers.
    pub fn pool(&self) -> Arc<ThreadPool> {
        Arc::clone(&self.pool)
    }
}

/// Look up a registered logger by name.
pub fn get_logger(name: &str) -> Option<Arc<Logger>> {
    Registry::instance().get(name)
}

/// The process-wide default logger.
pub fn get_default_logger() -> Arc<Logger> {
    Registry::instance().default_logger()
}

/// Register a logger process-wide. A no-op when the name is taken.
pub fn add_logger(logger: Arc<Logger>) {
    Registry::instance().add(logger);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_logger_is_registered() {
        assert!(Registry::instance().contains(DEFAULT_LOGGER_NAME));
        let default = get_default_logger();
        assert_eq!(default.name(), DEFAULT_LOGGER_NAME);

        let looked_up = get_logger(DEFAULT_LOGGER_NAME).unwrap();
        assert!(Arc::ptr_eq(&default, &looked_up));
    }

    #[test]
    fn test_add_and_get() {
        let logger = Arc::new(Logger::builder().name("registry-add-test").build());
        add_logger(Arc::clone(&logger));

        let found = get_logger("registry-add-test").unwrap();
        assert!(Arc::ptr_eq(&logger, &found));
    }

    #[test]
    fn test_duplicate_add_keeps_first() {
        let first = Arc::new(Logger::builder().name("registry-dup-test").build());
        let second = Arc::new(Logger::builder().name("registry-dup-test").build());

        add_logger(Arc::clone(&first));
        add_logger(second);

        let found = get_logger("registry-dup-test").unwrap();
        assert!(Arc::ptr_eq(&first, &found));
    }

    #[test]
    fn test_unknown_name_is_none() {
        assert!(get_logger("registry-no-such-logger").is_none());
    }
}
