//! File processor: validated reads of script files

use crate::config::compile_time::file_processing::{
    LARGE_FILE_THRESHOLD, MAX_FILE_SIZE, MAX_LINE_COUNT_FOR_ANALYSIS,
};
use crate::config::runtime::FileProcessorPreferences;
use crate::files::bom;
use crate::logging::codes;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// File processor specific errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid file extension: expected .txt, found {extension:?}")]
    InvalidExtension { extension: Option<String> },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("I/O error reading file: {message}")]
    IoError { message: String },

    #[error("Invalid file path: {path}")]
    InvalidPath { path: String },

    #[error("File exceeds maximum line count: {lines} (max: {max_lines})")]
    TooManyLines { lines: usize, max_lines: usize },
}

impl FileProcessorError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            FileProcessorError::FileNotFound { .. } => codes::file_processing::FILE_NOT_FOUND,
            FileProcessorError::InvalidExtension { .. } => {
                codes::file_processing::INVALID_EXTENSION
            }
            FileProcessorError::FileTooLarge { .. } | FileProcessorError::TooManyLines { .. } => {
                codes::file_processing::FILE_TOO_LARGE
            }
            FileProcessorError::PermissionDenied { .. } => {
                codes::file_processing::PERMISSION_DENIED
            }
            FileProcessorError::IoError { .. } => codes::file_processing::IO_ERROR,
            FileProcessorError::InvalidPath { .. } => codes::file_processing::INVALID_PATH,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    fn from_io(path: &Path, action: &str, error: &std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::PermissionDenied => FileProcessorError::PermissionDenied {
                path: path.display().to_string(),
            },
            std::io::ErrorKind::NotFound => FileProcessorError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => FileProcessorError::IoError {
                message: format!("Failed to {action} '{}': {error}", path.display()),
            },
        }
    }
}

/// Facts about a processed file
#[derive(Debug, Clone, Serialize)]
pub struct FileMetadata {
    /// Canonical file path
    pub path: PathBuf,
    pub size: u64,
    pub extension: Option<String>,
    pub line_count: usize,
    pub is_txt_file: bool,
    pub had_bom: bool,
    #[serde(skip)]
    pub modified: Option<std::time::SystemTime>,
}

impl FileMetadata {
    pub fn human_readable_size(&self) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
        let mut size = self.size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", self.size, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    pub fn is_large_file(&self) -> bool {
        self.size > LARGE_FILE_THRESHOLD
    }
}

/// Raw file contents plus what was learned while reading them
#[derive(Debug, Clone)]
pub struct FileProcessingResult {
    /// Contents with any byte order mark removed
    pub bytes: Vec<u8>,
    pub metadata: FileMetadata,
    pub processing_duration: Duration,
}

impl FileProcessingResult {
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Bytes per millisecond
    pub fn processing_rate(&self) -> f64 {
        let duration_ms = self.processing_duration.as_secs_f64() * 1000.0;
        if duration_ms > 0.0 {
            self.bytes.len() as f64 / duration_ms
        } else {
            0.0
        }
    }
}

/// Reads script files after checking path, size and extension
#[derive(Debug, Clone)]
pub struct FileProcessor {
    pub require_txt_extension: bool,
    pub strip_bom: bool,
    pub enable_performance_logging: bool,
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::from_preferences(&FileProcessorPreferences::default())
    }
}

impl FileProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_preferences(prefs: &FileProcessorPreferences) -> Self {
        Self {
            require_txt_extension: prefs.require_txt_extension,
            strip_bom: prefs.strip_bom,
            enable_performance_logging: prefs.enable_performance_logging,
        }
    }

    pub fn with_txt_extension_required(mut self, required: bool) -> Self {
        self.require_txt_extension = required;
        self
    }

    pub fn with_bom_stripping(mut self, enabled: bool) -> Self {
        self.strip_bom = enabled;
        self
    }

    pub fn with_performance_logging(mut self, enabled: bool) -> Self {
        self.enable_performance_logging = enabled;
        self
    }

    /// Compile-time maximum file size
    pub fn max_file_size() -> u64 {
        MAX_FILE_SIZE
    }

    /// Read a file. Empty files are valid and yield no bytes.
    pub fn process_file(
        &self,
        file_path: impl AsRef<Path>,
    ) -> Result<FileProcessingResult, FileProcessorError> {
        let start_time = Instant::now();
        let file_path = file_path.as_ref();
        let display = file_path.display().to_string();

        log_debug!("Starting file processing", "file" => display);

        let path = self.validate_path(file_path)?;
        let mut metadata = self.get_metadata(&path)?;
        self.validate_file(&metadata)?;

        let raw = fs::read(&path).map_err(|e| {
            let error = FileProcessorError::from_io(&path, "read", &e);
            log_error!(error.error_code(), "Failed to read file",
                "file" => display, "io_error" => e);
            error
        })?;

        metadata.had_bom = bom::has_bom(&raw);
        let bytes = if self.strip_bom && metadata.had_bom {
            bom::strip_bom(&raw).to_vec()
        } else {
            raw
        };

        metadata.line_count = count_lines(&bytes);
        if metadata.line_count > MAX_LINE_COUNT_FOR_ANALYSIS {
            let error = FileProcessorError::TooManyLines {
                lines: metadata.line_count,
                max_lines: MAX_LINE_COUNT_FOR_ANALYSIS,
            };
            log_error!(error.error_code(), "File exceeds maximum line count for safe analysis",
                "file" => display,
                "lines" => metadata.line_count,
                "max_lines" => MAX_LINE_COUNT_FOR_ANALYSIS);
            return Err(error);
        }

        let result = FileProcessingResult {
            bytes,
            metadata,
            processing_duration: start_time.elapsed(),
        };

        self.log_processing_success(&result, &display);
        Ok(result)
    }

    fn log_processing_success(&self, result: &FileProcessingResult, file_path: &str) {
        if self.enable_performance_logging {
            log_performance!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "File processed successfully with performance metrics",
                duration = result.processing_duration,
                "file" => file_path,
                "size_bytes" => result.metadata.size,
                "size_human" => result.metadata.human_readable_size(),
                "lines" => result.metadata.line_count,
                "bytes_per_ms" => format!("{:.2}", result.processing_rate()),
                "is_large_file" => result.metadata.is_large_file()
            );
        } else {
            log_success!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "File processed successfully",
                "file" => file_path,
                "size_bytes" => result.metadata.size,
                "lines" => result.metadata.line_count,
                "duration_ms" => format!("{:.2}", result.processing_duration.as_secs_f64() * 1000.0)
            );
        }
    }

    fn validate_path(&self, file_path: &Path) -> Result<PathBuf, FileProcessorError> {
        let display = file_path.display().to_string();

        if file_path.as_os_str().is_empty() {
            let error = FileProcessorError::InvalidPath { path: display };
            log_error!(error.error_code(), "Empty file path provided");
            return Err(error);
        }

        if !file_path.exists() {
            let error = FileProcessorError::FileNotFound { path: display.clone() };
            log_error!(error.error_code(), "File not found", "path" => display);
            return Err(error);
        }

        if !file_path.is_file() {
            let error = FileProcessorError::InvalidPath { path: display.clone() };
            log_error!(error.error_code(), "Path is not a file", "path" => display);
            return Err(error);
        }

        file_path.canonicalize().map_err(|e| {
            let error = FileProcessorError::from_io(file_path, "resolve path", &e);
            log_error!(error.error_code(), "Failed to canonicalize path",
                "path" => display, "io_error" => e);
            error
        })
    }

    fn get_metadata(&self, path: &Path) -> Result<FileMetadata, FileProcessorError> {
        let metadata = fs::metadata(path).map_err(|e| {
            let error = FileProcessorError::from_io(path, "read metadata for", &e);
            log_error!(error.error_code(), "Failed to read file metadata",
                "path" => path.display(), "io_error" => e);
            error
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);
        let is_txt_file = extension.as_deref() == Some("txt");

        Ok(FileMetadata {
            path: path.to_path_buf(),
            size: metadata.len(),
            extension,
            line_count: 0,
            is_txt_file,
            had_bom: false,
            modified: metadata.modified().ok(),
        })
    }

    fn validate_file(&self, metadata: &FileMetadata) -> Result<(), FileProcessorError> {
        if metadata.size > MAX_FILE_SIZE {
            let error = FileProcessorError::FileTooLarge {
                size: metadata.size,
                max_size: MAX_FILE_SIZE,
            };
            log_error!(error.error_code(), "File exceeds maximum size",
                "path" => metadata.path.display(),
                "size_bytes" => metadata.size,
                "max_size_bytes" => MAX_FILE_SIZE);
            return Err(error);
        }

        if self.require_txt_extension && !metadata.is_txt_file {
            let error = FileProcessorError::InvalidExtension {
                extension: metadata.extension.clone(),
            };
            log_error!(error.error_code(), "File does not have a .txt extension",
                "path" => metadata.path.display());
            return Err(error);
        }

        Ok(())
    }
}

fn count_lines(bytes: &[u8]) -> usize {
    if bytes.is_empty() {
        return 0;
    }
    let newlines = bytes.iter().filter(|&&b| b == b'\n').count();
    if bytes.ends_with(b"\n") {
        newlines
    } else {
        newlines + 1
    }
}

/// Read a file with default preferences
pub fn process_file(file_path: impl AsRef<Path>) -> Result<FileProcessingResult, FileProcessorError> {
    FileProcessor::new().process_file(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn test_reads_and_strips_bom() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("00_traits.txt");
        fs::write(&path, b"\xEF\xBB\xBFbrave = {\n}\n").unwrap();

        let result = FileProcessor::new().with_bom_stripping(true).process_file(&path).unwrap();

        assert_eq!(result.bytes, b"brave = {\n}\n");
        assert!(result.metadata.had_bom);
        assert!(result.metadata.is_txt_file);
        assert_eq!(result.metadata.line_count, 2);
    }

    #[test]
    fn test_performance_logging_reads_normally() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.txt");
        fs::write(&path, b"namespace = test\nid = 1\n").unwrap();

        let result = FileProcessor::new()
            .with_performance_logging(true)
            .process_file(&path)
            .unwrap();

        assert_eq!(result.metadata.line_count, 2);
        assert!(result.processing_rate() >= 0.0);
    }

    #[test]
    fn test_keeps_bom_when_disabled() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, b"\xEF\xBB\xBFx").unwrap();

        let result = FileProcessor::new().with_bom_stripping(false).process_file(&path).unwrap();
        assert_eq!(result.bytes.len(), 4);
    }

    #[test]
    fn test_empty_file_is_valid() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, b"").unwrap();

        let result = process_file(&path).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.metadata.line_count, 0);
    }

    #[test]
    fn test_missing_file_and_directory() {
        let dir = tempdir().unwrap();

        let missing = process_file(dir.path().join("nope.txt"));
        assert_matches!(missing, Err(FileProcessorError::FileNotFound { .. }));

        let directory = process_file(dir.path());
        assert_matches!(directory, Err(FileProcessorError::InvalidPath { .. }));

        assert_matches!(process_file(""), Err(FileProcessorError::InvalidPath { .. }));
    }

    #[test]
    fn test_extension_requirement() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.md");
        fs::write(&path, b"a = b").unwrap();

        assert!(FileProcessor::new().with_txt_extension_required(false).process_file(&path).is_ok());

        let result = FileProcessor::new()
            .with_txt_extension_required(true)
            .process_file(&path);
        assert_matches!(
            result,
            Err(FileProcessorError::InvalidExtension { extension: Some(ref ext) }) if ext == "md"
        );
    }

    #[test]
    fn test_error_codes() {
        let error = FileProcessorError::FileNotFound {
            path: "a.txt".to_string(),
        };
        assert_eq!(error.error_code().as_str(), "E005");
        assert!(error.is_recoverable());
    }

    #[test]
    fn test_count_lines() {
        assert_eq!(count_lines(b""), 0);
        assert_eq!(count_lines(b"a"), 1);
        assert_eq!(count_lines(b"a\nb"), 2);
        assert_eq!(count_lines(b"a\nb\n"), 2);
    }
}
