// RUNTIME PREFERENCES (User Experience)
//
// Every preference defaults from a PDX_* environment variable and can be
// overridden by a TOML file passed on the command line. Compile-time limits
// in `config::compile_time` bound what a preference may ask for.

use super::compile_time;
use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;

/// Read an environment variable and parse it, falling back to `default`
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Errors raised while loading or validating runtime configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

impl ConfigError {
    pub fn error_code(&self) -> crate::logging::Code {
        crate::logging::codes::system::CONFIGURATION_ERROR
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Columns a tab character advances the cursor by
    pub tab_width: u16,

    /// Whether to collect per-type token counts
    pub collect_detailed_metrics: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            tab_width: env_or(env_vars::LEXICAL_TAB_WIDTH, compile_time::lexical::TAB_WIDTH),
            collect_detailed_metrics: env_or(env_vars::LEXICAL_DETAILED_METRICS, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserPreferences {
    /// Whether recovery warnings are mirrored into the operational log
    pub log_recovery_events: bool,

    /// Maximum `{` nesting before a block is skipped
    pub max_block_depth: usize,
}

impl Default for ParserPreferences {
    fn default() -> Self {
        Self {
            log_recovery_events: env_or(env_vars::PARSER_LOG_RECOVERY, false),
            max_block_depth: env_or(
                env_vars::PARSER_MAX_BLOCK_DEPTH,
                compile_time::syntax::MAX_BLOCK_DEPTH,
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProcessorPreferences {
    /// Whether to reject files without a .txt extension
    pub require_txt_extension: bool,

    /// Whether to drop a leading UTF-8 byte order mark
    pub strip_bom: bool,

    /// Whether to log size and throughput for every file
    pub enable_performance_logging: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_txt_extension: env_or(env_vars::REQUIRE_TXT_EXTENSION, false),
            strip_bom: env_or(env_vars::STRIP_BOM, true),
            enable_performance_logging: env_or(env_vars::ENABLE_PERFORMANCE_LOGGING, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Minimum level that reaches the logger
    pub min_log_level: LogLevel,

    /// Whether to print the cargo-style summary after a run
    pub enable_cargo_style_output: bool,

    /// Whether to attach the current file to every event
    pub include_file_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_or(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_or(env_vars::LOGGING_ENABLE_CONSOLE, false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            enable_cargo_style_output: env_or(env_vars::LOGGING_CARGO_STYLE, true),
            include_file_context: env_or(env_vars::LOGGING_INCLUDE_FILE_CONTEXT, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchPreferences {
    /// Worker threads for directory runs
    pub max_threads: usize,

    /// Whether to descend into subdirectories
    pub recursive: bool,
}

impl Default for BatchPreferences {
    fn default() -> Self {
        let detected = num_cpus::get().min(compile_time::batch_processing::MAX_WORKER_THREADS);
        Self {
            max_threads: env_or(env_vars::BATCH_MAX_THREADS, detected.max(1)),
            recursive: env_or(env_vars::BATCH_RECURSIVE, true),
        }
    }
}

/// Parse log level from string (used for environment variables)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub lexical: LexicalPreferences,
    pub parser: ParserPreferences,
    pub file_processor: FileProcessorPreferences,
    pub logging: LoggingPreferences,
    pub batch: BatchPreferences,
}

impl RuntimeConfig {
    /// Parse a TOML document; sections and keys that are absent keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config file from disk
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Check preferences against the compile-time limits
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lexical.tab_width == 0 || self.lexical.tab_width > 16 {
            return Err(ConfigError::Invalid {
                field: "lexical.tab_width",
                message: format!("{} is outside 1..=16", self.lexical.tab_width),
            });
        }

        if self.parser.max_block_depth == 0
            || self.parser.max_block_depth > compile_time::syntax::MAX_BLOCK_DEPTH
        {
            return Err(ConfigError::Invalid {
                field: "parser.max_block_depth",
                message: format!(
                    "{} is outside 1..={}",
                    self.parser.max_block_depth,
                    compile_time::syntax::MAX_BLOCK_DEPTH
                ),
            });
        }

        if self.batch.max_threads == 0
            || self.batch.max_threads > compile_time::batch_processing::MAX_WORKER_THREADS
        {
            return Err(ConfigError::Invalid {
                field: "batch.max_threads",
                message: format!(
                    "{} is outside 1..={}",
                    self.batch.max_threads,
                    compile_time::batch_processing::MAX_WORKER_THREADS
                ),
            });
        }

        Ok(())
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Lexical
    pub const LEXICAL_TAB_WIDTH: &str = "PDX_LEXICAL_TAB_WIDTH";
    pub const LEXICAL_DETAILED_METRICS: &str = "PDX_LEXICAL_DETAILED_METRICS";

    // Parser
    pub const PARSER_LOG_RECOVERY: &str = "PDX_PARSER_LOG_RECOVERY";
    pub const PARSER_MAX_BLOCK_DEPTH: &str = "PDX_PARSER_MAX_BLOCK_DEPTH";

    // File Processor
    pub const REQUIRE_TXT_EXTENSION: &str = "PDX_REQUIRE_TXT_EXTENSION";
    pub const STRIP_BOM: &str = "PDX_STRIP_BOM";
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "PDX_ENABLE_PERFORMANCE_LOGGING";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "PDX_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "PDX_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "PDX_LOGGING_MIN_LEVEL";
    pub const LOGGING_CARGO_STYLE: &str = "PDX_LOGGING_CARGO_STYLE";
    pub const LOGGING_INCLUDE_FILE_CONTEXT: &str = "PDX_LOGGING_INCLUDE_FILE_CONTEXT";

    // Batch
    pub const BATCH_MAX_THREADS: &str = "PDX_BATCH_MAX_THREADS";
    pub const BATCH_RECURSIVE: &str = "PDX_BATCH_RECURSIVE";
}
