//! Global logging for the PDX parser
//!
//! Thread-safe operational logging with a per-thread file context, a
//! per-file event collector for batch runs, and a macro front end.
//! Every entry point is a no-op until `init_global_logging` has run.

#[macro_use]
pub mod macros;
pub mod codes;
pub mod collector;
pub mod config;
pub mod events;
pub mod service;

use crate::files::{Loc, PathId};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use collector::{ErrorCollector, FileProcessingContext, ProcessingSummary};
pub use events::{LogEvent, LogLevel};
pub use service::{
    ConsoleLogger, FileLogger, LogFormat, Logger, LoggingService, MemoryLogger, MultiLogger,
    StructuredLogger,
};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();
static GLOBAL_ERROR_COLLECTOR: OnceLock<Arc<ErrorCollector>> = OnceLock::new();

thread_local! {
    static FILE_CONTEXT: RefCell<Option<FileProcessingContext>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging from the installed preferences
pub fn init_global_logging() -> Result<(), String> {
    init_global_logging_with_service(Arc::new(service::create_configured_service()))
}

/// Initialize global logging, also appending every admitted event to `log_file`
pub fn init_global_logging_with_file(log_file: &Path) -> Result<(), String> {
    let service = service::create_service_with_log_file(log_file)
        .map_err(|e| format!("Failed to open log file {}: {}", log_file.display(), e))?;
    init_global_logging_with_service(Arc::new(service))
}

/// Initialize with a caller-built service (log files, tests)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service.clone())
        .map_err(|_| "Global logger already initialized")?;

    GLOBAL_ERROR_COLLECTOR
        .set(Arc::new(ErrorCollector::new()))
        .map_err(|_| "Global error collector already initialized")?;

    service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some() && GLOBAL_ERROR_COLLECTOR.get().is_some()
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

pub fn try_get_global_error_collector() -> Option<&'static ErrorCollector> {
    GLOBAL_ERROR_COLLECTOR
        .get()
        .map(|collector| collector.as_ref())
}

// ============================================================================
// FILE CONTEXT MANAGEMENT
// ============================================================================

/// Set file context for current thread
pub fn set_file_context(file_path: PathBuf, file_id: PathId) {
    let context = FileProcessingContext::new(file_path, file_id);

    if let Some(collector) = try_get_global_error_collector() {
        collector.record_file_context(&context);
    }

    FILE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(context);
    });
}

/// Clear file context for current thread, recording the time spent
pub fn clear_file_context() {
    let previous = FILE_CONTEXT.with(|ctx| ctx.borrow_mut().take());

    if let (Some(context), Some(collector)) = (previous, try_get_global_error_collector()) {
        collector.record_file_time(&context.file_path, context.elapsed());
    }
}

/// Run `f` with the current thread attributed to `file_path`
pub fn with_file_context<F, R>(file_path: PathBuf, file_id: PathId, f: F) -> R
where
    F: FnOnce() -> R,
{
    set_file_context(file_path, file_id);
    let result = f();
    clear_file_context();
    result
}

pub fn get_current_file_context() -> Option<FileProcessingContext> {
    FILE_CONTEXT.with(|ctx| ctx.borrow().clone())
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

/// Borrowed view of the pairs built by the logging macros
pub fn borrow_context<'a>(pairs: &'a [(&'a str, String)]) -> Vec<(&'a str, &'a str)> {
    pairs.iter().map(|(key, value)| (*key, value.as_str())).collect()
}

fn build_event(mut event: LogEvent, loc: Option<Loc>, context: Vec<(&str, &str)>) -> LogEvent {
    if let Some(loc) = loc {
        event = event.with_loc(loc);
    }

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    event
}

/// Attach the thread's file context, send to the logger, and optionally
/// record the event in the collector
pub fn dispatch_event(mut event: LogEvent, collect: bool) {
    let file_ctx = get_current_file_context();

    if let Some(ctx) = &file_ctx {
        if config::preferences().include_file_context {
            event = event.with_file_path(&ctx.file_path.display().to_string());
            event = event.with_context("file_id", &ctx.file_id.to_string());
        }
    }

    if collect {
        if let (Some(ctx), Some(collector)) = (&file_ctx, try_get_global_error_collector()) {
            collector.record_event(&ctx.file_path, event.clone());
        }
    }

    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

/// Used by `log_error!`
pub fn log_error_with_context(
    code: Code,
    message: &str,
    loc: Option<Loc>,
    context: Vec<(&str, &str)>,
) {
    dispatch_event(build_event(LogEvent::error(code, message), loc, context), true);
}

/// Used by `log_warning!`
pub fn log_warning_with_context(
    code: Option<Code>,
    message: &str,
    loc: Option<Loc>,
    context: Vec<(&str, &str)>,
) {
    let event = match code {
        Some(code) => LogEvent::warning_with_code(code, message),
        None => LogEvent::warning(message),
    };
    dispatch_event(build_event(event, loc, context), true);
}

/// Used by `log_success!`
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    dispatch_event(build_event(LogEvent::success(code, message), None, context), false);
}

/// Used by `log_info!`
pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    dispatch_event(build_event(LogEvent::info(message), None, context), false);
}

// ============================================================================
// BATCH REPORTING
// ============================================================================

/// Print the collector grouped by file, when cargo-style output is enabled
pub fn print_cargo_style_summary() {
    if !config::preferences().enable_cargo_style_output {
        return;
    }

    if let Some(collector) = try_get_global_error_collector() {
        print!("{}", collector::format_cargo_style_errors(collector));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_context_management() {
        let file_path = PathBuf::from("common/on_actions/00_on_actions.txt");

        assert!(get_current_file_context().is_none());

        set_file_context(file_path.clone(), PathId::new(1));
        let context = get_current_file_context();
        assert_eq!(context.map(|c| c.file_path), Some(file_path));

        clear_file_context();
        assert!(get_current_file_context().is_none());
    }

    #[test]
    fn test_with_file_context() {
        let file_path = PathBuf::from("events/test.txt");

        let result = with_file_context(file_path.clone(), PathId::new(2), || {
            let context = get_current_file_context();
            assert_eq!(context.map(|c| c.file_id), Some(PathId::new(2)));
            42
        });

        assert_eq!(result, 42);
        assert!(get_current_file_context().is_none());
    }

    #[test]
    fn test_context_functions_do_not_panic() {
        log_error_with_context(
            codes::syntax::UNEXPECTED_TOKEN,
            "Unexpected token",
            Some(Loc::new(PathId::new(0), 1, 1)),
            vec![("token", "}")],
        );
        log_warning_with_context(None, "warning", None, vec![]);
    }
}
