//! Operational log codes and their classification
//!
//! Every code the tool logs is declared here together with its metadata.
//! These codes describe what the tool did; problems found in the parsed
//! input are reported separately as diagnostics.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// How bad a logged problem is for the run as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
    pub const CONFIGURATION_ERROR: Code = Code::new("ERR003");
}

/// File processing error codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
    pub const UNKNOWN_PATH_ID: Code = Code::new("E013");
    pub const SCAN_FAILED: Code = Code::new("E014");
}

/// Lexical analysis codes
pub mod lexical {
    use super::Code;

    pub const UNEXPECTED_CHARACTER: Code = Code::new("E020");
    pub const TOO_MANY_TOKENS: Code = Code::new("E021");
    pub const TOKEN_TOO_LONG: Code = Code::new("E022");
}

/// Syntax analysis codes
pub mod syntax {
    use super::Code;

    pub const UNEXPECTED_TOKEN: Code = Code::new("E040");
    pub const UNEXPECTED_EOF: Code = Code::new("E041");
    pub const UNMATCHED_BLOCK_DELIMITER: Code = Code::new("E042");
    pub const INVALID_STRING_ESCAPE: Code = Code::new("E043");
    pub const MAX_BLOCK_DEPTH: Code = Code::new("E044");
    pub const RECOVERY_SKIPPED_TOKENS: Code = Code::new("E050");
    pub const RECOVERY_FAILED: Code = Code::new("E051");
}

/// Batch processing codes
pub mod batch {
    use super::Code;

    pub const DISCOVERY_FAILED: Code = Code::new("E060");
    pub const WORKER_PANIC: Code = Code::new("E061");
    pub const FILE_LIMIT_EXCEEDED: Code = Code::new("E062");
    pub const FAIL_FAST_TRIGGERED: Code = Code::new("E063");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");

    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const AST_CONSTRUCTION_COMPLETE: Code = Code::new("I040");

    pub const BATCH_PROCESSING_COMPLETE: Code = Code::new("I060");
    pub const PROJECT_SCAN_COMPLETE: Code = Code::new("I061");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

use Severity::{Critical, High, Low, Medium};

// (code, category, severity, recoverable, requires_halt, description, action)
type MetadataRow = (
    &'static str,
    &'static str,
    Severity,
    bool,
    bool,
    &'static str,
    &'static str,
);

const METADATA_TABLE: &[MetadataRow] = &[
    // System
    ("ERR001", "System", Critical, false, true,
        "Critical internal error",
        "File a bug report with the input that triggered it"),
    ("ERR002", "System", Critical, false, true,
        "Logging or runtime initialization failed",
        "Check the runtime configuration and environment"),
    ("ERR003", "System", High, false, true,
        "Runtime configuration is invalid",
        "Fix the values reported in the config file or PDX_* variables"),
    // File processing
    ("E005", "FileProcessing", Medium, true, false,
        "File not found at specified path",
        "Check file path and ensure file exists"),
    ("E006", "FileProcessing", Low, true, false,
        "File does not have a .txt extension",
        "Rename the file or disable require_txt_extension"),
    ("E007", "FileProcessing", Medium, true, false,
        "File exceeds maximum size limit",
        "Split the file or rebuild with a larger max_file_size"),
    ("E009", "FileProcessing", Medium, true, false,
        "Permission denied accessing file",
        "Check file permissions and user access rights"),
    ("E010", "FileProcessing", Low, true, false,
        "File contains invalid UTF-8 sequences",
        "Re-save the file as UTF-8; invalid bytes were replaced"),
    ("E011", "FileProcessing", Medium, true, false,
        "I/O error during file operation",
        "Check disk space, permissions, and file system integrity"),
    ("E012", "FileProcessing", Medium, true, false,
        "Invalid file path provided",
        "Provide a path to a regular file"),
    ("E013", "FileProcessing", High, false, false,
        "Path id is not present in the path table",
        "Make sure locations are resolved against the interner that created them"),
    ("E014", "FileProcessing", Medium, true, false,
        "Directory scan failed",
        "Check that the game and mod directories exist and are readable"),
    // Lexical
    ("E020", "Lexical", Medium, true, false,
        "Character does not start any known token",
        "Remove the character or wrap it in a quoted string"),
    ("E021", "Lexical", High, false, false,
        "File produced more tokens than the configured limit",
        "Split the file or rebuild with a larger max_token_count"),
    ("E022", "Lexical", Low, true, false,
        "Token exceeds the configured maximum length",
        "Shorten the token or rebuild with a larger max_token_length"),
    // Syntax
    ("E040", "Syntax", Medium, true, false,
        "Token is not valid at this position",
        "Check the statement structure around the reported location"),
    ("E041", "Syntax", Medium, true, false,
        "Input ended in the middle of a statement",
        "Complete the statement or add the missing closing brace"),
    ("E042", "Syntax", Medium, true, false,
        "Closing brace without a matching opening brace",
        "Remove the extra '}' or add the missing '{'"),
    ("E043", "Syntax", Low, true, false,
        "Quoted string contains an invalid escape sequence",
        "Fix the escape; the raw string was kept"),
    ("E044", "Syntax", High, true, false,
        "Blocks are nested deeper than the configured limit",
        "Flatten the nesting or raise max_block_depth"),
    ("E050", "Syntax", Low, true, false,
        "Parser skipped tokens to recover from a syntax error",
        "Fix the earlier error; the skipped text was ignored"),
    ("E051", "Syntax", High, true, false,
        "Parser could not recover within its attempt limits",
        "Fix the syntax near the reported location"),
    // Batch
    ("E060", "Batch", Medium, false, true,
        "Could not enumerate input files",
        "Check that the directory exists and is readable"),
    ("E061", "Batch", Critical, false, true,
        "Worker thread panicked",
        "File a bug report with the file that was being processed"),
    ("E062", "Batch", Low, true, false,
        "More files were discovered than the batch limit allows",
        "Pass a larger --max-files or narrow the directory"),
    ("E063", "Batch", Medium, false, true,
        "Batch stopped at the first failure",
        "Fix the reported file or run without --fail-fast"),
];

/// Error metadata registry using OnceLock for thread safety
static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        METADATA_TABLE
            .iter()
            .map(
                |&(code, category, severity, recoverable, requires_halt, description, action)| {
                    (
                        code,
                        ErrorMetadata {
                            code,
                            category,
                            severity,
                            recoverable,
                            requires_halt,
                            description,
                            recommended_action: action,
                        },
                    )
                },
            )
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

pub fn requires_halt(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Category from the registry; success codes resolve to "Success"
pub fn get_category(code: &str) -> &'static str {
    match get_error_metadata(code) {
        Some(metadata) => metadata.category,
        None if code.starts_with('I') => "Success",
        None => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_error_code_has_metadata() {
        let declared = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            system::CONFIGURATION_ERROR,
            file_processing::FILE_NOT_FOUND,
            file_processing::INVALID_EXTENSION,
            file_processing::FILE_TOO_LARGE,
            file_processing::PERMISSION_DENIED,
            file_processing::INVALID_ENCODING,
            file_processing::IO_ERROR,
            file_processing::INVALID_PATH,
            file_processing::UNKNOWN_PATH_ID,
            file_processing::SCAN_FAILED,
            lexical::UNEXPECTED_CHARACTER,
            lexical::TOO_MANY_TOKENS,
            lexical::TOKEN_TOO_LONG,
            syntax::UNEXPECTED_TOKEN,
            syntax::UNEXPECTED_EOF,
            syntax::UNMATCHED_BLOCK_DELIMITER,
            syntax::INVALID_STRING_ESCAPE,
            syntax::MAX_BLOCK_DEPTH,
            syntax::RECOVERY_SKIPPED_TOKENS,
            syntax::RECOVERY_FAILED,
            batch::DISCOVERY_FAILED,
            batch::WORKER_PANIC,
            batch::FILE_LIMIT_EXCEEDED,
            batch::FAIL_FAST_TRIGGERED,
        ];

        for code in declared {
            let metadata = get_error_metadata(code.as_str());
            assert!(metadata.is_some(), "missing metadata for {}", code);
            assert_eq!(metadata.unwrap().code, code.as_str());
        }
    }

    #[test]
    fn test_classification() {
        assert_eq!(get_severity("ERR001"), Severity::Critical);
        assert!(requires_halt("ERR001"));
        assert!(!is_recoverable("E061"));
        assert!(is_recoverable("E050"));
        assert_eq!(get_category("E040"), "Syntax");
        assert_eq!(get_category("I006"), "Success");
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_description("E999"), "Unknown error");
        assert_eq!(get_action("E999"), "No specific action available");
        assert_eq!(get_category("E999"), "Unknown");
        assert_eq!(get_severity("E999"), Severity::Medium);
    }
}
