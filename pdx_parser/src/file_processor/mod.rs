//! File processor module
//!
//! Reads script files for the pipeline after validating path, size and
//! extension against the compile-time limits.

mod processor;

use crate::config::compile_time::file_processing::{LARGE_FILE_THRESHOLD, MAX_FILE_SIZE};
use crate::config::runtime::FileProcessorPreferences;

pub use processor::{
    process_file, FileMetadata, FileProcessingResult, FileProcessor, FileProcessorError,
};

/// Create a file processor from runtime preferences
pub fn create_processor_from_preferences(prefs: &FileProcessorPreferences) -> FileProcessor {
    FileProcessor::from_preferences(prefs)
}

/// Compile-time maximum file size
pub fn get_max_file_size() -> u64 {
    MAX_FILE_SIZE
}

/// Compile-time size above which a file counts as large
pub fn get_large_file_threshold() -> u64 {
    LARGE_FILE_THRESHOLD
}
