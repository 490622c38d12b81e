/*!
 * Command-line interface for reposcribe
 */

use std::fs;
use std::io::{self, BufRead, Write};
use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};

use reposcribe::config::{Args, Config};
use reposcribe::error::{Result, ResultExt, ScribeError};
use reposcribe::patterns::{read_ignore_files, PatternSet, DEFAULT_IGNORE_PATTERNS};
use reposcribe::report::{ExportReport, Reporter};
use reposcribe::walker::Walker;
use reposcribe::writer::Exporter;

fn main() {
    let args = Args::parse();

    setup_logging(args.quiet, args.verbose);
    log::debug!("CLI args parsed: {:?}", args);

    if let Some(shell) = args.generate {
        let mut command = Args::command();
        clap_complete::generate(shell, &mut command, "reposcribe", &mut io::stdout());
        return;
    }

    let quiet = args.quiet;
    if let Err(e) = run(args, quiet) {
        eprintln!("Error: {}", e);
        let code = e.exit_code();
        log::debug!("Exiting with code {}", code);
        process::exit(code);
    }
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
}

fn run(args: Args, quiet: bool) -> Result<()> {
    // Create and validate configuration
    let config = Config::from_args(args)?;
    config.validate()?;

    if config.default_output {
        if let Some(dir) = config.output_file.parent() {
            fs::create_dir_all(dir).map_err(|source| ScribeError::Output {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        eprintln!(
            "Using default output file: {}",
            config.output_file.display()
        );
    }

    // Collect ignore rules: defaults, ignore files, --ignore, then the output file itself
    let mut ignore_contents = read_ignore_files(&config.ignore_files);
    if !config.ignore_patterns.is_empty() {
        ignore_contents.push(config.ignore_patterns.join("\n"));
    }
    if let Some(pattern) = config.output_ignore_pattern() {
        log::info!("Dynamically ignoring output file: {}", pattern);
        ignore_contents.push(pattern);
    }
    let patterns = PatternSet::build(DEFAULT_IGNORE_PATTERNS, &ignore_contents)?;

    let start_time = Instant::now();

    let spinner = new_progress(quiet, 0);
    spinner.set_prefix("📂 Scanning");
    spinner.set_message(config.project_root.display().to_string());
    let files = Walker::new(&patterns).walk(&config.project_root)?;
    spinner.finish_and_clear();
    let scan_duration = start_time.elapsed();

    if files.is_empty() {
        println!("No files found to scribe (after applying ignore rules). Nothing to do.");
        return Ok(());
    }

    println!("\nThe following files will be scribed:");
    for file in &files {
        println!("  - {}", file);
    }
    println!("\nTotal files: {}", files.len());

    if !config.assume_yes && !confirm(&config)? {
        println!("Scribing cancelled by user.");
        return Ok(());
    }
    let export_start = Instant::now();

    let progress = Arc::new(new_progress(quiet, files.len() as u64));
    progress.set_prefix("📝 Scribing");

    let mut exporter = Exporter::new(config.export_options(), Arc::clone(&progress));
    let result = exporter.export_to_path(&config.output_file, &config.project_root, &files)?;

    progress.finish_and_clear();

    // Time spent waiting on the prompt is not part of the work
    let duration = scan_duration + export_start.elapsed();

    let report = ExportReport::new(
        config.output_file.display().to_string(),
        duration,
        result,
        exporter.statistics().clone(),
    );
    Reporter::new(config.report).print_report(&report)?;

    Ok(())
}

/// Ask before writing; anything but `y`/`yes` declines
fn confirm(config: &Config) -> Result<bool> {
    print!(
        "Proceed with scribing to '{}'? [y/N]: ",
        config.output_file.display()
    );
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .with_context(|| "Failed to read confirmation")?;

    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn new_progress(quiet: bool, len: u64) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len} ({percent}%) ⏱️  Elapsed: {elapsed_precise}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress.set_style(style);
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}
