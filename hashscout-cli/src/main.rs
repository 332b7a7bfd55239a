use anyhow::{anyhow, Context, Result};
use clap::Parser;
use colored::Colorize;
use hashscout::{
    search, HashAlgorithm, ProgressUpdate, SearchConfig, SearchHooks, SearchOutput,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Concurrent hash preimage search", long_about = None)]
struct Cli {
    /// Target digest, hex encoded
    target: String,

    /// Hash algorithm of the target (md5|sha1|sha256|sha512)
    #[arg(short, long, default_value = "sha256")]
    algorithm: String,

    /// Longest candidate the brute-force phase will try
    #[arg(short = 'm', long, default_value_t = 4)]
    max_length: usize,

    /// Number of threads to use (default: CPU cores)
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// Skip the dictionary phase
    #[arg(long)]
    no_dictionary: bool,

    /// Skip the brute-force phase
    #[arg(long)]
    no_brute_force: bool,

    /// Enumerate oversized lengths without asking
    #[arg(short = 'y', long)]
    yes: bool,

    /// Path to config file (default: .hashscout.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let algorithm: HashAlgorithm = cli
        .algorithm
        .parse()
        .map_err(|e| anyhow!("{e}"))
        .context("unsupported --algorithm value")?;

    let cli_config = SearchConfig {
        target: cli.target,
        algorithm,
        max_length: cli.max_length,
        thread_count: cli
            .threads
            .unwrap_or_else(|| NonZeroUsize::new(num_cpus::get()).unwrap()),
        dictionary: !cli.no_dictionary,
        brute_force: !cli.no_brute_force,
        log_level: cli.log_level,
    };

    let config = SearchConfig::load_from(cli.config.as_deref())
        .unwrap_or_default()
        .merge_with_cli(cli_config);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(io::stderr)
        .init();
    tracing::debug!(
        "Merged configuration: {} target, max length {}, {} threads",
        config.algorithm,
        config.max_length,
        config.thread_count
    );

    let progress = ProgressBar::new_spinner().with_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .expect("static spinner template is valid"),
    );

    let confirm: Box<dyn Fn(usize, u128) -> bool + Send + Sync> = if cli.yes {
        Box::new(|_, _| true)
    } else {
        Box::new(confirm_oversized)
    };
    let hooks = SearchHooks {
        confirm_length: Some(confirm),
        on_progress: Some(Box::new({
            let progress = progress.clone();
            move |update: &ProgressUpdate| {
                progress.set_message(format!(
                    "{} phase: {} attempts in {}",
                    update.phase,
                    update.attempts,
                    humantime::format_duration(std::time::Duration::from_secs(
                        update.elapsed.as_secs()
                    ))
                ));
                progress.tick();
            }
        })),
    };

    let output = search(&config, &hooks)?;
    progress.finish_and_clear();
    print_output(&output);

    if !output.found {
        std::process::exit(1);
    }
    Ok(())
}

/// Interactive decision point for a length whose search space exceeds
/// the safety threshold; declining skips just that length
fn confirm_oversized(length: usize, combinations: u128) -> bool {
    print!(
        "Length {} has {} combinations. Enumerate anyway? [y/N] ",
        length, combinations
    );
    io::stdout().flush().ok();

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim(), "y" | "Y" | "yes")
}

fn print_output(output: &SearchOutput) {
    if let Some(candidate) = &output.candidate {
        println!("{} {}", "Preimage found:".green().bold(), candidate.bold());
        if let Some(phase) = output.matched_in {
            println!("  phase:    {phase}");
        }
    } else if output.cancelled {
        println!("{}", "Search cancelled".yellow().bold());
    } else {
        println!("{}", "No preimage found".red().bold());
    }
    println!("  attempts: {}", output.attempts);
    println!(
        "  elapsed:  {} ({:.0} hashes/s)",
        humantime::format_duration(std::time::Duration::from_millis(
            output.elapsed.as_millis() as u64
        )),
        output.rate()
    );
}
