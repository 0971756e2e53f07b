use clap::{Parser, Subcommand};
use pdx_parser::batch::{self, BatchConfig, BatchResults};
use pdx_parser::config::{build_info, RuntimeConfig};
use pdx_parser::files::{PathInterner, SourceCache};
use pdx_parser::pipeline::{self, PipelineOutput, PipelineResult};
use pdx_parser::report::render_diagnostic_with_tab_width;
use pdx_parser::{log_debug, log_error, logging};
use std::path::{Path, PathBuf};
use std::process;

/// Error-tolerant parser for Paradox-style script files
#[derive(Parser)]
#[command(name = "pdx", version, about)]
struct Cli {
    /// Runtime preferences file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit operational logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Also append operational logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one file and print its diagnostics
    Parse {
        file: PathBuf,
        /// Write the AST and diagnostics as JSON
        #[arg(long)]
        save_ast: Option<PathBuf>,
        /// Print the token stream
        #[arg(long)]
        tokens: bool,
    },

    /// Parse every .txt file under a directory
    Check {
        dir: PathBuf,
        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Parse a game directory overlaid with a mod directory
    Project {
        game_dir: PathBuf,
        mod_dir: PathBuf,
        /// Vanilla subdirectory the mod replaces entirely (repeatable)
        #[arg(long = "replace-path")]
        replace_paths: Vec<PathBuf>,
        #[command(flatten)]
        batch: BatchArgs,
    },
}

#[derive(clap::Args, Debug, Default)]
struct BatchArgs {
    /// Worker threads (default: from config, one per CPU)
    #[arg(long)]
    threads: Option<usize>,
    /// Process files one at a time
    #[arg(long)]
    sequential: bool,
    /// Don't search subdirectories
    #[arg(long)]
    no_recursive: bool,
    /// Stop after this many files
    #[arg(long)]
    max_files: Option<usize>,
    /// Stop at the first file with errors
    #[arg(long)]
    fail_fast: bool,
    /// Suppress progress reporting
    #[arg(long)]
    quiet: bool,
}

impl BatchArgs {
    fn apply(&self, mut config: BatchConfig) -> BatchConfig {
        if let Some(threads) = self.threads {
            config = config.with_threads(threads);
        }
        if self.sequential {
            config.max_threads = 1;
        }
        if self.no_recursive {
            config.recursive = false;
        }
        config.max_files = self.max_files;
        config.fail_fast = self.fail_fast;
        config.progress_reporting = !self.quiet;
        config
    }
}

fn main() {
    let cli = Cli::parse();

    let runtime = match load_runtime_config(&cli) {
        Ok(runtime) => runtime,
        Err(message) => {
            eprintln!("error: {message}");
            process::exit(2);
        }
    };

    let ok = match &cli.command {
        Commands::Parse {
            file,
            save_ast,
            tokens,
        } => run_parse(file, save_ast.as_deref(), *tokens, &runtime),
        Commands::Check { dir, batch } => {
            let config = batch.apply(BatchConfig::from_runtime(&runtime));
            let interner = PathInterner::new();
            let outcome = batch::process_directory(dir, &config, &interner);
            report_batch(outcome, &interner, &runtime)
        }
        Commands::Project {
            game_dir,
            mod_dir,
            replace_paths,
            batch,
        } => {
            let config = batch.apply(BatchConfig::from_runtime(&runtime));
            let interner = PathInterner::new();
            let outcome =
                batch::process_game_and_mod(game_dir, mod_dir, replace_paths, &config, &interner);
            report_batch(outcome, &interner, &runtime)
        }
    };

    if !ok {
        process::exit(1);
    }
}

fn load_runtime_config(cli: &Cli) -> Result<RuntimeConfig, String> {
    let mut runtime = match cli.config.as_deref() {
        Some(path) => RuntimeConfig::from_toml_file(path)
            .map_err(|e| format!("[{}] {e}", e.error_code()))?,
        None => RuntimeConfig::default(),
    };

    if cli.json_logs {
        runtime.logging.use_structured_logging = true;
        runtime.logging.enable_console_logging = true;
    }

    logging::config::init_runtime_preferences(runtime.logging.clone())?;
    match cli.log_file.as_deref() {
        Some(log_file) => logging::init_global_logging_with_file(log_file)?,
        None => logging::init_global_logging()?,
    }
    log_debug!("Build configuration", "source" => build_info::source_info());
    Ok(runtime)
}

fn print_diagnostics(
    result: &PipelineResult,
    interner: &PathInterner,
    cache: &mut SourceCache,
    runtime: &RuntimeConfig,
) {
    for item in &result.diagnostics {
        eprintln!(
            "{}\n",
            render_diagnostic_with_tab_width(item, interner, cache, runtime.lexical.tab_width)
        );
    }
}

fn run_parse(
    file: &Path,
    save_ast: Option<&Path>,
    show_tokens: bool,
    runtime: &RuntimeConfig,
) -> bool {
    let interner = PathInterner::new();

    let result = match pipeline::process_file_with_config(file, &interner, runtime) {
        Ok(result) => result,
        Err(error) => {
            eprintln!("FAILED: {}: {error}", file.display());
            return false;
        }
    };

    if show_tokens {
        for token in result.tokens.iter() {
            println!("{token}");
        }
    }

    print_diagnostics(&result, &interner, &mut SourceCache::new(), runtime);

    if let Some(out) = save_ast {
        if let Err(error) = PipelineOutput::new(&result).save_ast_json(out) {
            log_error!(error.error_code(), "Failed to save AST", "path" => out.display());
            eprintln!("FAILED: {error}");
            return false;
        }
        println!("AST written to {}", out.display());
    }

    println!(
        "{}: {} fields, {} tokens, {} diagnostics",
        file.display(),
        result.ast.len(),
        result.token_count(),
        result.diagnostics.len()
    );

    !result.has_errors()
}

fn report_batch(
    outcome: Result<BatchResults, batch::BatchError>,
    interner: &PathInterner,
    runtime: &RuntimeConfig,
) -> bool {
    let results = match outcome {
        Ok(results) => results,
        Err(error) => {
            eprintln!("Batch processing failed: {error}");
            logging::print_cargo_style_summary();
            return false;
        }
    };

    let mut cache = SourceCache::new();
    for (_, result) in &results.successful_files {
        print_diagnostics(result, interner, &mut cache, runtime);
    }

    print_batch_results(&results);
    logging::print_cargo_style_summary();

    !results.has_failures()
}

fn print_batch_results(results: &BatchResults) {
    println!("Batch Processing Summary:");
    println!("  Files discovered: {}", results.files_discovered);
    println!("  Files processed: {}", results.files_processed);
    println!(
        "  Parsed: {} ({:.1}%)",
        results.success_count(),
        results.success_rate() * 100.0
    );
    println!("  With errors: {}", results.files_with_errors());
    println!("  Failed: {}", results.failure_count());
    println!("  Diagnostics: {}", results.diagnostic_count());
    println!(
        "  Total time: {:.2}s",
        results.processing_duration.as_secs_f64()
    );

    let seconds = results.processing_duration.as_secs_f64();
    if seconds > 0.0 && !results.successful_files.is_empty() {
        let total_bytes: u64 = results
            .successful_files
            .iter()
            .map(|(_, result)| result.file_metadata.size)
            .sum();
        let total_tokens: usize = results
            .successful_files
            .iter()
            .map(|(_, result)| result.token_count())
            .sum();

        println!(
            "  Processing rate: {:.0} bytes/sec, {:.0} tokens/sec",
            total_bytes as f64 / seconds,
            total_tokens as f64 / seconds
        );
    }

    if results.failure_count() > 0 {
        println!("\nFailed Files:");
        for (file_path, error) in &results.failed_files {
            println!("  {} [{}]: {error}", file_path.display(), error.error_code());
        }
    }
}
