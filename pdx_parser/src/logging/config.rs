//! Logging preferences
//!
//! Buffer caps come from the build profile. Everything else is the user's
//! [`LoggingPreferences`], installed once at startup by the binary.

use crate::config::compile_time::logging as limits;
use crate::config::runtime::LoggingPreferences;
use crate::logging::events::LogLevel;
use std::sync::OnceLock;

/// Events a `MemoryLogger` keeps before dropping the oldest
pub const MEMORY_BUFFER_SIZE: usize = limits::LOG_BUFFER_SIZE;

/// Events the collector keeps for a single file
pub const MAX_EVENTS_PER_FILE: usize = limits::MAX_LOG_EVENTS_PER_FILE;

/// Events the collector keeps across all files
pub const MAX_COLLECTED_EVENTS: usize = limits::MAX_ERROR_COLLECTION;

const _: () = assert!(MAX_EVENTS_PER_FILE <= MEMORY_BUFFER_SIZE);
const _: () = assert!(MEMORY_BUFFER_SIZE >= 100 && MEMORY_BUFFER_SIZE <= 100_000);

static PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Install the preferences. Fails if they were already installed or read.
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    PREFERENCES
        .set(preferences)
        .map_err(|_| "logging preferences are already in effect".to_string())
}

/// Installed preferences, or the environment defaults if none were installed
pub fn preferences() -> &'static LoggingPreferences {
    PREFERENCES.get_or_init(LoggingPreferences::default)
}

pub fn min_log_level() -> LogLevel {
    preferences().min_log_level
}

pub fn debug_enabled() -> bool {
    min_log_level() >= LogLevel::Debug
}
