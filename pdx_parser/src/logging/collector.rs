//! Per-file event collection and cargo-style reporting for batch runs

use super::config;
use super::events::LogEvent;
use crate::files::PathId;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// The file a thread is currently working on
#[derive(Debug, Clone)]
pub struct FileProcessingContext {
    pub file_path: PathBuf,
    pub file_id: PathId,
    pub start_time: Instant,
}

impl FileProcessingContext {
    pub fn new(file_path: PathBuf, file_id: PathId) -> Self {
        Self {
            file_path,
            file_id,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Summary of batch processing results
#[derive(Debug, Clone, Default)]
pub struct ProcessingSummary {
    pub total_files: usize,
    pub successful_files: usize,
    pub failed_files: usize,
    pub files_with_warnings: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub dropped_events: usize,
    pub total_processing_time: Duration,
    pub average_file_time: Duration,
}

impl ProcessingSummary {
    pub fn success_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            self.successful_files as f64 / self.total_files as f64
        }
    }

    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }
}

#[derive(Default)]
struct CollectorState {
    file_events: BTreeMap<PathBuf, Vec<LogEvent>>,
    file_times: BTreeMap<PathBuf, Duration>,
    total_events: usize,
    dropped_events: usize,
}

/// Thread-safe event collector keyed by file path
pub struct ErrorCollector {
    state: Mutex<CollectorState>,
    processing_start: Instant,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(CollectorState::default()),
            processing_start: Instant::now(),
        }
    }

    fn state(&self) -> MutexGuard<'_, CollectorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record an event for a file, honouring the per-file and global caps
    pub fn record_event(&self, file_path: &Path, event: LogEvent) {
        let mut state = self.state();

        if state.total_events >= config::MAX_COLLECTED_EVENTS {
            state.dropped_events += 1;
            return;
        }

        let file_events = state.file_events.entry(file_path.to_path_buf()).or_default();

        if file_events.len() < config::MAX_EVENTS_PER_FILE {
            file_events.push(event);
        } else if file_events.len() == config::MAX_EVENTS_PER_FILE {
            file_events.push(LogEvent::warning(&format!(
                "further events for this file suppressed (limit {})",
                config::MAX_EVENTS_PER_FILE
            )));
        } else {
            state.dropped_events += 1;
            return;
        }

        state.total_events += 1;
    }

    /// Register a file so it is counted even when it produces no events
    pub fn record_file_context(&self, context: &FileProcessingContext) {
        let mut state = self.state();
        state
            .file_events
            .entry(context.file_path.clone())
            .or_default();
    }

    /// Store the wall time spent on a file
    pub fn record_file_time(&self, file_path: &Path, elapsed: Duration) {
        self.state()
            .file_times
            .insert(file_path.to_path_buf(), elapsed);
    }

    pub fn get_file_events(&self, file_path: &Path) -> Vec<LogEvent> {
        self.state()
            .file_events
            .get(file_path)
            .cloned()
            .unwrap_or_default()
    }

    pub fn get_all_file_events(&self) -> BTreeMap<PathBuf, Vec<LogEvent>> {
        self.state().file_events.clone()
    }

    pub fn get_summary(&self) -> ProcessingSummary {
        let state = self.state();

        let mut summary = ProcessingSummary {
            total_files: state.file_events.len(),
            dropped_events: state.dropped_events,
            total_processing_time: self.processing_start.elapsed(),
            ..Default::default()
        };

        for events in state.file_events.values() {
            let errors = events.iter().filter(|e| e.is_error()).count();
            let warnings = events.iter().filter(|e| e.is_warning()).count();

            if errors > 0 {
                summary.failed_files += 1;
            } else if warnings > 0 {
                summary.files_with_warnings += 1;
            } else {
                summary.successful_files += 1;
            }

            summary.total_errors += errors;
            summary.total_warnings += warnings;
        }

        if !state.file_times.is_empty() {
            let total: Duration = state.file_times.values().sum();
            summary.average_file_time = total / state.file_times.len() as u32;
        }

        summary
    }

    pub fn total_event_count(&self) -> usize {
        self.state().total_events
    }

    pub fn clear(&self) {
        let mut state = self.state();
        *state = CollectorState::default();
    }
}

impl Default for ErrorCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn push_event_lines(output: &mut String, kind: &str, file_path: &Path, event: &LogEvent) {
    let location = event
        .loc
        .map(|loc| format!(" --> {}:{}", file_path.display(), loc))
        .unwrap_or_default();

    output.push_str(&format!(
        "{}[{}]: {}{}\n",
        kind,
        event.code.as_str(),
        event.message,
        location
    ));

    for (key, value) in &event.context {
        if key != "file" && key != "file_id" {
            output.push_str(&format!("  = {}: {}\n", key, value));
        }
    }
}

/// Render the collector grouped by file, the way cargo prints build errors
pub fn format_cargo_style_errors(collector: &ErrorCollector) -> String {
    let mut output = String::new();

    for (file_path, events) in &collector.get_all_file_events() {
        let errors: Vec<_> = events.iter().filter(|e| e.is_error()).collect();
        let warnings: Vec<_> = events.iter().filter(|e| e.is_warning()).collect();

        if errors.is_empty() && warnings.is_empty() {
            continue;
        }

        output.push_str(&format!("Checking {}...\n", file_path.display()));

        for event in errors {
            push_event_lines(&mut output, "error", file_path, event);
            output.push_str(&format!(
                "  = severity: {}, category: {}\n",
                event.severity(),
                event.category()
            ));

            let action = event.recommended_action();
            if action != "No specific action available" {
                output.push_str(&format!("  = help: {}\n", action));
            }
        }

        for event in warnings {
            push_event_lines(&mut output, "warning", file_path, event);
        }

        output.push('\n');
    }

    let summary = collector.get_summary();
    output.push_str(&format!(
        "Checked {} file(s): {} ok, {} with warnings, {} failed\n",
        summary.total_files,
        summary.successful_files,
        summary.files_with_warnings,
        summary.failed_files
    ));

    if summary.total_errors > 0 {
        output.push_str(&format!("Total errors: {}\n", summary.total_errors));
    }
    if summary.total_warnings > 0 {
        output.push_str(&format!("Total warnings: {}\n", summary.total_warnings));
    }
    if summary.dropped_events > 0 {
        output.push_str(&format!(
            "Events dropped after reaching limits: {}\n",
            summary.dropped_events
        ));
    }

    output
}
