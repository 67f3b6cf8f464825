use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use extract::StartupSearcher;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use startup_scraper::checkpoint::{self, PARTIAL_RESULTS_FILE};
use startup_scraper::config::API_KEY_ENV;
use startup_scraper::logging::init_tracing;
use startup_scraper::{BatchEvent, BatchRunner, ScraperConfig};

/// Rough per-request latency used for the time estimate.
const ESTIMATED_REQUEST_SECS: f64 = 5.0;
const PREVIEW_COUNT: usize = 5;

/// Look up startups with an LLM and summarize who is hiring
#[derive(Parser)]
#[command(name = "startup-scraper", version)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Anthropic API key (falls back to ANTHROPIC_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Model to query
    #[arg(long, global = true)]
    model: Option<String>,

    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up every startup listed in a file
    Batch {
        /// Newline-delimited list of startup names
        #[arg(short, long, default_value = ingest::DEFAULT_LIST_FILE)]
        input: PathBuf,

        /// Final results file (defaults to a timestamped name)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Rewrite this file with all results after every startup
        #[arg(long)]
        checkpoint: Option<PathBuf>,

        /// Seconds to wait between requests
        #[arg(long)]
        delay: Option<f64>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Look up a single startup
    Search {
        /// Name of the startup
        name: String,

        /// Save the result to <name>_info.json
        #[arg(long)]
        save: bool,
    },
    /// Print the summary report for a saved results file
    Summarize {
        /// Results file written by a previous batch
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("❌ {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Summarize { ref file } => summarize(file).await,
        Commands::Search { ref name, save } => {
            let config = load_config(&cli, None)?;
            search(&config, name, save).await
        }
        Commands::Batch {
            ref input,
            ref output,
            ref checkpoint,
            delay,
            yes,
        } => {
            let config = load_config(&cli, delay)?;
            batch(&config, input, output.as_deref(), checkpoint.as_deref(), yes).await
        }
    }
}

/// Defaults <- config file <- CLI flags <- environment for the key.
/// A missing key is fatal here, before any startup is queried.
fn load_config(cli: &Cli, delay: Option<f64>) -> Result<ScraperConfig> {
    dotenvy::dotenv().ok();

    let mut config = ScraperConfig::load(cli.config.as_deref())?;
    if let Some(key) = &cli.api_key {
        config.api_key = Some(key.clone());
    }
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }
    if let Some(delay) = delay {
        config.delay_secs = delay;
    }
    config.resolve_api_key(std::env::var(API_KEY_ENV).ok());
    config.validate()?;

    info!(model = %config.model, delay_secs = config.delay_secs, "Configuration loaded");
    Ok(config)
}

fn build_searcher(config: &ScraperConfig) -> Result<StartupSearcher> {
    let client = config.build_client()?;
    Ok(StartupSearcher::new(Arc::new(client)))
}

async fn summarize(file: &Path) -> Result<()> {
    let results = checkpoint::read_results(file).await?;
    let summary = report::SummaryReport::from_results(&results);
    println!("{}", report::render_summary(summary.as_ref()));
    Ok(())
}

async fn search(config: &ScraperConfig, name: &str, save: bool) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Please enter a valid startup name.");
    }

    let searcher = build_searcher(config)?;

    println!("\n🔍 Searching for information about '{name}'...");
    println!("This may take a moment...");

    let info = searcher.search(name).await;
    print!("{}", report::render_startup(&info));

    if save {
        let path = PathBuf::from(checkpoint::single_result_filename(name));
        checkpoint::write_single(&path, &info).await?;
        println!("✅ Information saved to {}", path.display());
    }

    Ok(())
}

async fn batch(
    config: &ScraperConfig,
    input: &Path,
    output: Option<&Path>,
    checkpoint_path: Option<&Path>,
    skip_confirm: bool,
) -> Result<()> {
    println!("🔍 Batch Startup Information Scraper");
    println!("{}", "=".repeat(40));

    let searcher = build_searcher(config)?;

    let names = ingest::load_startup_list(input).await;
    if names.is_empty() {
        println!("No startups to process.");
        println!("\n💡 Create a '{}' file with startup names like this:", input.display());
        for example in ["OpenAI", "Anthropic", "Scale AI", "Replicate"] {
            println!("   {example}");
        }
        return Ok(());
    }

    println!("✅ Successfully loaded {} startups from {}", names.len(), input.display());
    println!("\nFound {} startups to process:", names.len());
    for (i, name) in names.iter().take(PREVIEW_COUNT).enumerate() {
        println!("   {}. {}", i + 1, name);
    }
    if names.len() > PREVIEW_COUNT {
        println!("   ... and {} more", names.len() - PREVIEW_COUNT);
    }

    if !skip_confirm && !confirm("\nProceed with scraping? (y/n): ")? {
        println!("Cancelled.");
        return Ok(());
    }

    let cancel = CancellationToken::new();
    watch_for_interrupt(cancel.clone());

    let runner = BatchRunner::new(searcher, config.delay()).with_observer(print_event);
    let estimate = names.len() as f64 * (runner.delay().as_secs_f64() + ESTIMATED_REQUEST_SECS);
    println!("\n🚀 Starting batch scrape of {} startups...", names.len());
    println!("⏱️  Estimated time: ~{estimate:.0} seconds");
    println!("{}", "=".repeat(60));

    let outcome = runner.run(&names, checkpoint_path, &cancel).await;

    let saved = if outcome.interrupted {
        println!("\n\n⏹️  Scraping interrupted by user.");
        if outcome.results.is_empty() {
            None
        } else {
            println!("Saving partial results...");
            save_or_report(&outcome.results, Some(Path::new(PARTIAL_RESULTS_FILE))).await
        }
    } else {
        println!(
            "\n✅ Batch scrape completed! Processed {} startups.",
            outcome.results.len()
        );
        save_or_report(&outcome.results, output).await
    };

    let summary = report::SummaryReport::from_results(&outcome.results);
    println!("{}", report::render_summary(summary.as_ref()));

    if let (false, Some(path)) = (outcome.interrupted, saved) {
        println!("\n🎉 All done! Check {} for detailed results.", path.display());
    }

    Ok(())
}

/// A failed final save is reported but does not discard the summary.
async fn save_or_report(
    results: &[extract::StartupInfo],
    path: Option<&Path>,
) -> Option<PathBuf> {
    match checkpoint::save_results(results, path).await {
        Ok(Some(path)) => {
            println!("💾 Results saved to: {}", path.display());
            Some(path)
        }
        Ok(None) => {
            println!("No results to save.");
            None
        }
        Err(e) => {
            warn!(error = %format!("{e:#}"), "Could not save results");
            println!("❌ Error saving results: {e:#}");
            None
        }
    }
}

fn print_event(event: BatchEvent<'_>) {
    match event {
        BatchEvent::Started { .. } => {}
        BatchEvent::Processing {
            index,
            total,
            startup_name,
        } => println!("\n[{}/{}] Processing: {}", index + 1, total, startup_name),
        BatchEvent::Finished { info, .. } => println!("{}", report::render_progress(info)),
        BatchEvent::Waiting { delay } => {
            println!("   ⏳ Waiting {} seconds...", delay.as_secs_f64())
        }
    }
}

/// First Ctrl-C stops the batch after the current startup; a second one
/// exits immediately.
fn watch_for_interrupt(cancel: CancellationToken) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C signal: {}", e);
            return;
        }
        info!("Received Ctrl+C, stopping after the current startup");
        cancel.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received second Ctrl+C, exiting");
            std::process::exit(130);
        }
    });
}

fn confirm(question: &str) -> Result<bool> {
    print!("{question}");
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
