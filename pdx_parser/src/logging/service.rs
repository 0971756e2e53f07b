//! Log sinks and the level-filtering service in front of them

use super::codes::Code;
use super::config;
use super::events::{LogEvent, LogLevel};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// How a sink renders one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `[LEVEL] CODE - message at line:column`
    Text,
    /// One JSON object per line
    Json,
}

impl LogFormat {
    fn render(self, event: &LogEvent) -> String {
        match self {
            LogFormat::Text => event.format(),
            LogFormat::Json => event.format_json().unwrap_or_else(|_| event.format()),
        }
    }

    fn from_preferences() -> Self {
        if config::preferences().use_structured_logging {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// Level filter in front of a single logger
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    /// Build the console service described by the installed preferences.
    /// With console logging off only errors reach the terminal.
    pub fn with_config() -> Self {
        let prefs = config::preferences();
        let min_level = prefs.min_log_level;
        let console_level = if prefs.enable_console_logging || prefs.use_structured_logging {
            min_level
        } else {
            LogLevel::Error
        };

        let logger = Arc::new(ConsoleLogger::with_format(
            console_level,
            LogFormat::from_preferences(),
        ));
        Self::new(logger, min_level)
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }

    pub fn log_error(&self, code: Code, message: &str) {
        self.log_event(LogEvent::error(code, message));
    }

    pub fn log_success(&self, code: Code, message: &str) {
        self.log_event(LogEvent::success(code, message));
    }

    pub fn log_info(&self, message: &str) {
        self.log_event(LogEvent::info(message));
    }

    pub fn log_warning(&self, message: &str) {
        self.log_event(LogEvent::warning(message));
    }

    pub fn log_debug(&self, message: &str) {
        self.log_event(LogEvent::debug(message));
    }
}

/// Terminal output: errors to stderr, everything else to stdout
pub struct ConsoleLogger {
    min_level: LogLevel,
    format: LogFormat,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self::with_format(min_level, LogFormat::Text)
    }

    pub fn with_format(min_level: LogLevel, format: LogFormat) -> Self {
        Self { min_level, format }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        if event.level > self.min_level {
            return;
        }

        let line = self.format.render(event);
        if event.is_error() {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }
}

/// Console logger that writes JSON lines
pub struct StructuredLogger(ConsoleLogger);

impl StructuredLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self(ConsoleLogger::with_format(min_level, LogFormat::Json))
    }
}

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        self.0.log(event);
    }
}

/// Keeps the most recent events in memory; used by tests
#[derive(Default)]
pub struct MemoryLogger {
    events: Mutex<Vec<LogEvent>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    fn events(&self) -> MutexGuard<'_, Vec<LogEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get_events(&self) -> Vec<LogEvent> {
        self.events().clone()
    }

    pub fn event_count(&self) -> usize {
        self.events().len()
    }

    pub fn clear(&self) {
        self.events().clear();
    }

    pub fn get_events_with_code(&self, code: Code) -> Vec<LogEvent> {
        self.events()
            .iter()
            .filter(|e| e.code == code)
            .cloned()
            .collect()
    }

    pub fn has_error_with_code(&self, code: Code) -> bool {
        self.events().iter().any(|e| e.is_error() && e.code == code)
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        let capacity = config::MEMORY_BUFFER_SIZE;
        let mut events = self.events();
        if events.len() >= capacity {
            let excess = events.len() + 1 - capacity;
            events.drain(..excess);
        }
        events.push(event.clone());
    }
}

/// Appends to a log file. The file is opened once and shared by all threads.
pub struct FileLogger {
    file: Mutex<File>,
    min_level: LogLevel,
    format: LogFormat,
}

impl FileLogger {
    pub fn new(
        file_path: impl AsRef<Path>,
        min_level: LogLevel,
        format: LogFormat,
    ) -> Result<Self, std::io::Error> {
        let path = file_path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
            min_level,
            format,
        })
    }
}

impl Logger for FileLogger {
    fn log(&self, event: &LogEvent) {
        if event.level > self.min_level {
            return;
        }

        let line = self.format.render(event);
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        // Nowhere left to report a failed log write
        let _ = writeln!(file, "{line}");
    }
}

/// Sends each event to every child logger
pub struct MultiLogger {
    loggers: Vec<Arc<dyn Logger>>,
}

impl MultiLogger {
    pub fn new() -> Self {
        Self {
            loggers: Vec::new(),
        }
    }

    pub fn with(mut self, logger: Arc<dyn Logger>) -> Self {
        self.loggers.push(logger);
        self
    }

    pub fn len(&self) -> usize {
        self.loggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.is_empty()
    }
}

impl Default for MultiLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for MultiLogger {
    fn log(&self, event: &LogEvent) {
        for logger in &self.loggers {
            logger.log(event);
        }
    }
}

/// Console service from the installed preferences
pub fn create_configured_service() -> LoggingService {
    LoggingService::with_config()
}

/// Console service plus a log file that records every admitted event
pub fn create_service_with_log_file(log_file: &Path) -> Result<LoggingService, std::io::Error> {
    let min_level = config::min_log_level();
    let format = LogFormat::from_preferences();
    let console = LoggingService::with_config();

    let multi = MultiLogger::new()
        .with(console.logger.clone())
        .with(Arc::new(FileLogger::new(log_file, min_level, format)?));

    Ok(LoggingService::new(Arc::new(multi), min_level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_memory_logger() {
        let logger = MemoryLogger::new();

        logger.log(&LogEvent::info("Scanning game folder"));
        logger.log(&LogEvent::error(
            codes::lexical::UNEXPECTED_CHARACTER,
            "unexpected token '%'",
        ));

        assert_eq!(logger.event_count(), 2);
        assert!(logger.has_error_with_code(codes::lexical::UNEXPECTED_CHARACTER));
        assert_eq!(
            logger
                .get_events_with_code(codes::lexical::UNEXPECTED_CHARACTER)
                .len(),
            1
        );

        logger.clear();
        assert_eq!(logger.event_count(), 0);
    }

    #[test]
    fn test_multi_logger_fans_out() {
        let first = Arc::new(MemoryLogger::new());
        let second = Arc::new(MemoryLogger::new());
        let multi = MultiLogger::new().with(first.clone()).with(second.clone());

        multi.log(&LogEvent::info("Project scan completed"));

        assert_eq!(multi.len(), 2);
        assert_eq!(first.event_count(), 1);
        assert_eq!(second.event_count(), 1);
    }

    #[test]
    fn test_log_level_filtering() {
        let logger = Arc::new(MemoryLogger::new());
        let service = LoggingService::new(logger.clone(), LogLevel::Warning);

        service.log_debug("cursor at END");
        service.log_info("File parsed");
        service.log_warning("Skipped invalid syntax");
        service.log_error(codes::syntax::RECOVERY_FAILED, "Failed to recover");
        service.log_success(codes::success::AST_CONSTRUCTION_COMPLETE, "done");

        assert_eq!(logger.event_count(), 2);
        assert!(logger.has_error_with_code(codes::syntax::RECOVERY_FAILED));
    }

    #[test]
    fn test_file_logger_writes_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("pdx.log");

        let logger = FileLogger::new(&path, LogLevel::Info, LogFormat::Json).unwrap();
        logger.log(&LogEvent::error(codes::syntax::RECOVERY_FAILED, "gave up"));
        logger.log(&LogEvent::debug("filtered out"));
        drop(logger);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);

        let json: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(json["code"], "E051");
    }

    #[test]
    fn test_service_with_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");

        let service = create_service_with_log_file(&path).unwrap();
        service.log_error(codes::batch::DISCOVERY_FAILED, "Directory not found");
        drop(service);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("E060"));
    }
}
