//! Batch processing of script directories
//!
//! Discovers `.txt` files under a directory (or a game + mod pair) and runs
//! the pipeline over each one, sequentially or on a set of worker threads.
//! All workers share one [`PathInterner`], so every location in the results
//! resolves against the same table.

use crate::config::compile_time::batch_processing::{MAX_FILES_PER_BATCH, MAX_WORKER_THREADS};
use crate::config::runtime::BatchPreferences;
use crate::config::RuntimeConfig;
use crate::files::{scan_game_and_mod, FileEntry, FileKind, PathInterner, ScanError};
use crate::logging::{codes, Code};
use crate::pipeline::{self, PipelineError, PipelineResult};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};
use walkdir::WalkDir;

const MIN_CHUNK_SIZE: usize = 1;
const MAX_CHUNK_SIZE: usize = 50;

// ============================================================================
// BATCH PROCESSING TYPES
// ============================================================================

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub max_threads: usize,
    pub recursive: bool,
    pub max_files: Option<usize>,
    pub progress_reporting: bool,
    /// Stop after the first file that fails to load or has Error diagnostics
    pub fail_fast: bool,
    /// Preferences handed to every pipeline run
    pub runtime: RuntimeConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::from_runtime(&RuntimeConfig::default())
    }
}

impl BatchConfig {
    pub fn from_runtime(runtime: &RuntimeConfig) -> Self {
        let BatchPreferences {
            max_threads,
            recursive,
        } = runtime.batch;

        Self {
            max_threads: max_threads.clamp(1, MAX_WORKER_THREADS),
            recursive,
            max_files: None,
            progress_reporting: true,
            fail_fast: false,
            runtime: runtime.clone(),
        }
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.max_threads = threads.clamp(1, MAX_WORKER_THREADS);
        self
    }

    pub fn is_sequential(&self) -> bool {
        self.max_threads <= 1
    }
}

#[derive(Debug, Default)]
pub struct BatchResults {
    pub successful_files: Vec<(PathBuf, PipelineResult)>,
    pub failed_files: Vec<(PathBuf, PipelineError)>,
    pub processing_duration: Duration,
    pub files_processed: usize,
    pub files_discovered: usize,
}

impl BatchResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success_count(&self) -> usize {
        self.successful_files.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed_files.len()
    }

    /// Files that loaded but produced Error or Critical diagnostics
    pub fn files_with_errors(&self) -> usize {
        self.successful_files
            .iter()
            .filter(|(_, result)| result.has_errors())
            .count()
    }

    pub fn diagnostic_count(&self) -> usize {
        self.successful_files
            .iter()
            .map(|(_, result)| result.diagnostics.len())
            .sum()
    }

    /// True if any file failed to load or has Error diagnostics
    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0 || self.files_with_errors() > 0
    }

    pub fn success_rate(&self) -> f64 {
        if self.files_processed == 0 {
            0.0
        } else {
            self.successful_files.len() as f64 / self.files_processed as f64
        }
    }

    pub fn add_success(&mut self, file_path: PathBuf, result: PipelineResult) {
        self.successful_files.push((file_path, result));
        self.files_processed += 1;
    }

    pub fn add_failure(&mut self, file_path: PathBuf, error: PipelineError) {
        self.failed_files.push((file_path, error));
        self.files_processed += 1;
    }

    pub fn merge(&mut self, other: BatchResults) {
        self.successful_files.extend(other.successful_files);
        self.failed_files.extend(other.failed_files);
        self.files_processed += other.files_processed;
    }

    fn sort(&mut self) {
        self.successful_files.sort_by(|a, b| a.0.cmp(&b.0));
        self.failed_files.sort_by(|a, b| a.0.cmp(&b.0));
    }

    pub fn summary(&self) -> String {
        format!(
            "Batch processing completed: {} files processed, {} parsed ({:.1}%), {} with errors, {} failed, {:.2}s total",
            self.files_processed,
            self.success_count(),
            self.success_rate() * 100.0,
            self.files_with_errors(),
            self.failure_count(),
            self.processing_duration.as_secs_f64()
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("No .txt files found in directory: {path}")]
    NoFilesFound { path: String },

    #[error("Too many files found: {count} (max: {max})")]
    TooManyFiles { count: usize, max: usize },

    #[error("IO error during directory traversal: {error}")]
    IoError { error: String },

    #[error("Worker thread error: {message}")]
    ThreadError { message: String },

    #[error("Project scan failed: {0}")]
    Scan(#[from] ScanError),
}

impl BatchError {
    pub fn error_code(&self) -> Code {
        match self {
            BatchError::DirectoryNotFound { .. }
            | BatchError::NoFilesFound { .. }
            | BatchError::IoError { .. } => codes::batch::DISCOVERY_FAILED,
            BatchError::TooManyFiles { .. } => codes::batch::FILE_LIMIT_EXCEEDED,
            BatchError::ThreadError { .. } => codes::batch::WORKER_PANIC,
            BatchError::Scan(e) => e.error_code(),
        }
    }
}

// ============================================================================
// FILE DISCOVERY
// ============================================================================

fn is_script_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
}

/// Find `.txt` files under `dir_path`, sorted by path
pub fn discover_script_files(
    dir_path: &Path,
    config: &BatchConfig,
) -> Result<Vec<FileEntry>, BatchError> {
    crate::log_info!("Starting file discovery",
        "directory" => dir_path.display(),
        "recursive" => config.recursive
    );

    if !dir_path.is_dir() {
        let error = BatchError::DirectoryNotFound {
            path: dir_path.display().to_string(),
        };
        crate::log_error!(error.error_code(), "Directory not found",
            "directory" => dir_path.display());
        return Err(error);
    }

    let mut walker = WalkDir::new(dir_path).follow_links(true).sort_by_file_name();
    if !config.recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| BatchError::IoError {
            error: e.to_string(),
        })?;

        if !entry.file_type().is_file() || !is_script_file(entry.path()) {
            continue;
        }

        let fullpath = entry.path().to_path_buf();
        let relative = fullpath
            .strip_prefix(dir_path)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| fullpath.clone());
        files.push(FileEntry::new(relative, fullpath, FileKind::Mod));
    }

    if files.is_empty() {
        return Err(BatchError::NoFilesFound {
            path: dir_path.display().to_string(),
        });
    }

    let files = apply_file_limits(files, config)?;

    crate::log_info!("File discovery completed",
        "files_found" => files.len(),
        "directory" => dir_path.display()
    );

    Ok(files)
}

fn apply_file_limits(
    mut files: Vec<FileEntry>,
    config: &BatchConfig,
) -> Result<Vec<FileEntry>, BatchError> {
    if let Some(max_files) = config.max_files {
        if files.len() > max_files {
            crate::log_warning!(code = codes::batch::FILE_LIMIT_EXCEEDED,
                "Reached maximum file limit, remaining files skipped",
                "files_found" => files.len(),
                "limit" => max_files
            );
            files.truncate(max_files);
        }
    }

    if files.len() > MAX_FILES_PER_BATCH {
        let error = BatchError::TooManyFiles {
            count: files.len(),
            max: MAX_FILES_PER_BATCH,
        };
        crate::log_error!(error.error_code(), "Batch exceeds the compile-time file limit",
            "files_found" => files.len(),
            "limit" => MAX_FILES_PER_BATCH);
        return Err(error);
    }

    Ok(files)
}

// ============================================================================
// BATCH PROCESSING
// ============================================================================

fn process_one(
    entry: &FileEntry,
    interner: &PathInterner,
    runtime: &RuntimeConfig,
    results: &mut BatchResults,
) -> bool {
    let path = entry.fullpath().to_path_buf();
    match pipeline::process_entry(entry, interner, runtime) {
        Ok(result) => {
            let failed = result.has_errors();
            results.add_success(path, result);
            !failed
        }
        Err(error) => {
            crate::log_error!(error.error_code(), "File processing failed",
                "file" => path.display(),
                "error" => error);
            results.add_failure(path, error);
            false
        }
    }
}

fn process_sequential(
    entries: &[FileEntry],
    config: &BatchConfig,
    interner: &PathInterner,
) -> BatchResults {
    let mut results = BatchResults::new();

    for (index, entry) in entries.iter().enumerate() {
        if config.progress_reporting {
            println!(
                "Processing file {} of {}: {}",
                index + 1,
                entries.len(),
                entry.path().display()
            );
        }

        let ok = process_one(entry, interner, &config.runtime, &mut results);
        if !ok && config.fail_fast {
            crate::log_warning!(code = codes::batch::FAIL_FAST_TRIGGERED,
                "Fail-fast mode enabled, stopping batch processing",
                "file" => entry.fullpath().display());
            break;
        }
    }

    results
}

fn process_parallel(
    entries: &[FileEntry],
    config: &BatchConfig,
    interner: &PathInterner,
) -> Result<BatchResults, BatchError> {
    let mut results = BatchResults::new();
    let chunk_size = calculate_chunk_size(entries.len(), config.max_threads);

    crate::log_debug!("Parallel processing configuration",
        "total_files" => entries.len(),
        "chunk_size" => chunk_size,
        "threads" => config.max_threads
    );

    for chunk in entries.chunks(chunk_size * config.max_threads) {
        let chunk_results = process_chunk_parallel(chunk, config, interner)?;
        results.merge(chunk_results);

        if config.progress_reporting {
            println!("Processed {} of {} files", results.files_processed, entries.len());
        }

        if config.fail_fast && results.has_failures() {
            crate::log_warning!(code = codes::batch::FAIL_FAST_TRIGGERED,
                "Fail-fast mode enabled, stopping batch processing");
            break;
        }
    }

    Ok(results)
}

/// Split `files` across up to `max_threads` workers and wait for them
fn process_chunk_parallel(
    files: &[FileEntry],
    config: &BatchConfig,
    interner: &PathInterner,
) -> Result<BatchResults, BatchError> {
    let results = Arc::new(Mutex::new(BatchResults::new()));
    let runtime = Arc::new(config.runtime.clone());
    let files_per_thread = files.len().div_ceil(config.max_threads).max(1);

    let mut handles = Vec::new();
    for thread_files in files.chunks(files_per_thread) {
        let thread_files = thread_files.to_vec();
        let results = Arc::clone(&results);
        let runtime = Arc::clone(&runtime);
        let interner = interner.clone();

        handles.push(thread::spawn(move || {
            let mut local = BatchResults::new();
            for entry in &thread_files {
                process_one(entry, &interner, &runtime, &mut local);
            }
            results
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .merge(local);
        }));
    }

    let mut panicked = 0;
    for handle in handles {
        if handle.join().is_err() {
            panicked += 1;
        }
    }

    if panicked > 0 {
        let error = BatchError::ThreadError {
            message: format!("{panicked} worker thread(s) panicked during processing"),
        };
        crate::log_error!(error.error_code(), "Worker thread panicked", "workers" => panicked);
        return Err(error);
    }

    let results = Arc::try_unwrap(results)
        .map_err(|_| BatchError::ThreadError {
            message: "Failed to collect results from worker threads".to_string(),
        })?
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner);

    Ok(results)
}

fn calculate_chunk_size(file_count: usize, max_threads: usize) -> usize {
    file_count
        .div_ceil(max_threads.max(1))
        .clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE)
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Run the pipeline over already discovered files
pub fn process_entries(
    entries: Vec<FileEntry>,
    config: &BatchConfig,
    interner: &PathInterner,
) -> Result<BatchResults, BatchError> {
    let start_time = Instant::now();
    let mode = if config.is_sequential() {
        "sequential"
    } else {
        "parallel"
    };

    crate::log_info!("Starting batch processing",
        "files" => entries.len(),
        "mode" => mode,
        "max_threads" => config.max_threads
    );

    let mut results = if config.is_sequential() {
        process_sequential(&entries, config, interner)
    } else {
        process_parallel(&entries, config, interner)?
    };

    results.files_discovered = entries.len();
    results.processing_duration = start_time.elapsed();
    results.sort();

    crate::log_success!(
        codes::success::BATCH_PROCESSING_COMPLETE,
        "Batch processing completed",
        "mode" => mode,
        "files_processed" => results.files_processed,
        "parsed" => results.success_count(),
        "with_errors" => results.files_with_errors(),
        "failed" => results.failure_count(),
        "duration_ms" => format!("{:.2}", results.processing_duration.as_secs_f64() * 1000.0)
    );

    Ok(results)
}

/// Discover and process every script file under `dir_path`
pub fn process_directory(
    dir_path: &Path,
    config: &BatchConfig,
    interner: &PathInterner,
) -> Result<BatchResults, BatchError> {
    let entries = discover_script_files(dir_path, config)?;
    process_entries(entries, config, interner)
}

/// Process a game directory overlaid with a mod directory.
///
/// Mod files replace vanilla files of the same name, and vanilla subtrees
/// under any of `replace_paths` are not read.
pub fn process_game_and_mod(
    game_dir: &Path,
    mod_dir: &Path,
    replace_paths: &[PathBuf],
    config: &BatchConfig,
    interner: &PathInterner,
) -> Result<BatchResults, BatchError> {
    let entries = scan_game_and_mod(game_dir, mod_dir, replace_paths).map_err(|e| {
        crate::log_error!(e.error_code(), "Project scan failed", "error" => e);
        e
    })?;
    let entries = apply_file_limits(entries, config)?;
    process_entries(entries, config, interner)
}
