//! hashsum: digest every file below a directory into a CSV report

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use hashsum::hash::{scan, ScanEngine, ScanStats, SkipRule};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "hashsum")]
#[command(author, version, about = "Compute MD5, SHA1, SHA256, SHA512 and SM3 for every file in a directory", long_about = None)]
struct Cli {
    /// Directory to scan
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Report path (default: HashSum_result_<dir>.csv in the current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Digest files in parallel
    #[arg(short, long)]
    parallel: bool,

    /// Worker threads for --parallel (default: one per core)
    #[arg(short, long, requires = "parallel")]
    jobs: Option<usize>,

    /// Also skip files whose name starts with this prefix
    #[arg(long = "skip-prefix", value_name = "PREFIX")]
    skip_prefixes: Vec<String>,

    /// Seconds to wait before exiting, 0 to exit at once
    #[arg(long, default_value_t = 10)]
    exit_delay: u64,

    /// Print scan statistics as JSON
    #[arg(long)]
    stats_json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env("HASHSUM_LOG").unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if let Some(jobs) = cli.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    let output = cli.output.clone().unwrap_or_else(|| scan::default_output(&cli.dir));
    let skip_rule = SkipRule::new().with_prefixes(cli.skip_prefixes.iter().cloned());

    let stats = run_scan(&cli, &output, skip_rule)?;
    print_summary(&stats, &output);

    if cli.stats_json {
        let json = serde_json::to_string_pretty(&stats).context("Failed to serialize statistics")?;
        println!("{}", json);
    }

    countdown(cli.exit_delay);
    Ok(())
}

fn run_scan(cli: &Cli, output: &Path, skip_rule: SkipRule) -> anyhow::Result<ScanStats> {
    let engine = ScanEngine::new()
        .with_parallel(cli.parallel)
        .with_skip_rule(skip_rule);

    // Counting walk, only for the progress bar
    let total = engine
        .count_files(&cli.dir, output)
        .with_context(|| format!("Failed to walk {}", cli.dir.display()))?;
    println!("Found {} files to process", total);

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) | {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("=>-"),
    );

    let pb_callback = pb.clone();
    let engine = engine.with_progress_callback(move |progress| {
        // Parallel workers may report out of order; one event per file
        pb_callback.inc(1);
        pb_callback.set_message(format!("{} OK, {} failed", progress.processed, progress.failed));
    });

    let result = engine.scan_to_file(&cli.dir, output);
    pb.finish_and_clear();

    result.with_context(|| format!("Failed to scan {}", cli.dir.display()))
}

fn print_summary(stats: &ScanStats, output: &Path) {
    let absolute = output.canonicalize().unwrap_or_else(|_| output.to_path_buf());

    println!("\n{}", "Scan complete!".green().bold());
    println!("Files processed: {}", stats.files_processed);
    if stats.files_failed > 0 {
        println!("Files failed: {}", stats.files_failed.to_string().yellow());
    } else {
        println!("Files failed: 0");
    }
    println!(
        "Total bytes: {} ({})",
        stats.total_bytes,
        humansize::format_size(stats.total_bytes, humansize::BINARY)
    );
    println!("Duration: {:.2}s", stats.duration.as_secs_f64());
    if stats.duration.as_secs_f64() > 0.0 {
        println!("Throughput: {:.2} MB/s", stats.throughput_mbps());
    }
    println!("Output written to: {}", absolute.display().to_string().cyan());
}

fn countdown(seconds: u64) {
    if seconds == 0 {
        return;
    }
    println!("\nExiting in {} seconds...", seconds);
    let pb = ProgressBar::new(seconds);
    if let Ok(style) = ProgressStyle::default_spinner().template("Countdown: {msg}s") {
        pb.set_style(style);
    }
    for remaining in (1..=seconds).rev() {
        pb.set_message(remaining.to_string());
        thread::sleep(Duration::from_secs(1));
    }
    pb.finish_and_clear();
    println!("Bye!");
}
