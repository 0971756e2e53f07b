// build.rs: turns config/<profile>.toml into compile-time limit constants
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    file_processing: FileProcessingLimits,
    lexical: LexicalLimits,
    syntax: SyntaxLimits,
    batch_processing: BatchProcessingLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct FileProcessingLimits {
    max_file_size: u64,
    large_file_threshold: u64,
    max_line_count_for_analysis: usize,
}

#[derive(serde::Deserialize)]
struct LexicalLimits {
    tab_width: u16,
    max_token_count: usize,
    max_token_length: usize,
}

#[derive(serde::Deserialize)]
struct SyntaxLimits {
    max_recovery_attempts: usize,
    max_skipped_tokens: usize,
    max_block_depth: usize,
}

#[derive(serde::Deserialize)]
struct BatchProcessingLimits {
    max_worker_threads: usize,
    max_files_per_batch: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    max_error_collection: usize,
    log_buffer_size: usize,
    max_log_events_per_file: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=PDX_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=PDX_CONFIG_DIR");

    let profile = env::var("PDX_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("PDX_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Profiles live in <workspace>/config, one level above this crate
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo");
    let config_path = Path::new(&manifest_dir)
        .parent()
        .unwrap_or_else(|| Path::new(&manifest_dir))
        .join(&config_dir)
        .join(format!("{profile}.toml"));

    println!("cargo:rerun-if-changed={}", config_path.display());

    let config: CompileTimeConfig = match fs::read_to_string(&config_path) {
        Ok(content) => toml::from_str(&content)
            .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e)),
        Err(e) => panic!(
            "Build profile `{profile}` not readable at {}: {e}",
            config_path.display()
        ),
    };

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_FILE_SIZE: u64 = 1_000_000_000;

    if config.file_processing.max_file_size > ABSOLUTE_MAX_FILE_SIZE {
        panic!("LIMITS: max_file_size exceeds absolute maximum");
    }

    if config.lexical.tab_width == 0 || config.lexical.tab_width > 16 {
        panic!("LIMITS: tab_width must be within 1..=16");
    }

    if config.syntax.max_recovery_attempts == 0 || config.syntax.max_skipped_tokens == 0 {
        panic!("LIMITS: recovery caps must be non-zero");
    }

    if config.syntax.max_block_depth == 0 {
        panic!("LIMITS: max_block_depth must be non-zero");
    }

    if config.logging.max_log_events_per_file > config.logging.log_buffer_size {
        panic!("LIMITS: max_log_events_per_file exceeds log_buffer_size");
    }

    if profile == "production" && config.file_processing.max_file_size > 50_000_000 {
        panic!("PRODUCTION: max_file_size too high for production");
    }
}

/// One generated `pub mod` of constants: (name, type, value)
type Section = (&'static str, Vec<(&'static str, &'static str, String)>);

fn sections(config: &CompileTimeConfig) -> Vec<Section> {
    let fp = &config.file_processing;
    let lex = &config.lexical;
    let syn = &config.syntax;
    let batch = &config.batch_processing;
    let log = &config.logging;

    vec![
        (
            "file_processing",
            vec![
                ("MAX_FILE_SIZE", "u64", fp.max_file_size.to_string()),
                ("LARGE_FILE_THRESHOLD", "u64", fp.large_file_threshold.to_string()),
                (
                    "MAX_LINE_COUNT_FOR_ANALYSIS",
                    "usize",
                    fp.max_line_count_for_analysis.to_string(),
                ),
            ],
        ),
        (
            "lexical",
            vec![
                ("TAB_WIDTH", "u16", lex.tab_width.to_string()),
                ("MAX_TOKEN_COUNT", "usize", lex.max_token_count.to_string()),
                ("MAX_TOKEN_LENGTH", "usize", lex.max_token_length.to_string()),
            ],
        ),
        (
            "syntax",
            vec![
                ("MAX_RECOVERY_ATTEMPTS", "usize", syn.max_recovery_attempts.to_string()),
                ("MAX_SKIPPED_TOKENS", "usize", syn.max_skipped_tokens.to_string()),
                ("MAX_BLOCK_DEPTH", "usize", syn.max_block_depth.to_string()),
            ],
        ),
        (
            "batch_processing",
            vec![
                ("MAX_WORKER_THREADS", "usize", batch.max_worker_threads.to_string()),
                ("MAX_FILES_PER_BATCH", "usize", batch.max_files_per_batch.to_string()),
            ],
        ),
        (
            "logging",
            vec![
                ("MAX_ERROR_COLLECTION", "usize", log.max_error_collection.to_string()),
                ("LOG_BUFFER_SIZE", "usize", log.log_buffer_size.to_string()),
                ("MAX_LOG_EVENTS_PER_FILE", "usize", log.max_log_events_per_file.to_string()),
            ],
        ),
    ]
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let mut code = format!(
        "// Generated by build.rs from the `{profile}` profile. Do not edit.\n\npub mod compile_time {{\n"
    );

    for (module, constants) in sections(config) {
        code.push_str(&format!("    pub mod {module} {{\n"));
        for (name, ty, value) in constants {
            code.push_str(&format!("        pub const {name}: {ty} = {value};\n"));
        }
        code.push_str("    }\n");
    }
    code.push_str("}\n");

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    let output_path = Path::new(&out_dir).join("constants.rs");
    fs::write(&output_path, code)
        .unwrap_or_else(|e| panic!("Failed to write {}: {}", output_path.display(), e));
}
