//! Normalize → Dedupe → Cache pipeline CLI
//!
//! Usage:
//!   truline_pipeline normalize --input payloads.jsonl --output events.jsonl
//!   truline_pipeline dedupe --input opportunities.jsonl --output deduped.jsonl
//!   truline_pipeline run-all --mock --games 8
//!   truline_pipeline run-all --mock --config config/truline.toml

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use truline::config::Config;
use truline::odds::cache::ResultCache;
use truline::odds::dedupe::dedupe_opportunities;
use truline::odds::types::{MarketType, Opportunity};
use truline::pipeline::{
    load_payloads_jsonl, normalize_batch, write_events_jsonl, write_opportunities_jsonl, Pipeline,
};
use truline::provider::MockFeed;

#[derive(Parser)]
#[command(name = "truline_pipeline")]
#[command(about = "Event normalization and odds dedup pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize raw provider payloads (JSONL) into canonical events
    Normalize {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// Dedupe an opportunities file (JSONL)
    Dedupe {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// Run the full pipeline against the mock feed
    RunAll {
        #[arg(long)]
        mock: bool,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override the number of mock games
        #[arg(long)]
        games: Option<usize>,
        /// Override the mock feed seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn run_normalize(input: &PathBuf, output: &PathBuf) -> Result<()> {
    let payloads = load_payloads_jsonl(input)?;
    tracing::info!("Loaded {} payloads", payloads.len());

    let events = normalize_batch(&payloads);
    write_events_jsonl(output, &events)?;

    let unknown = events
        .iter()
        .filter(|e| e.truth_status == truline::status::TruthStatus::Unknown)
        .count();
    println!(
        "Normalized {} events ({} with unknown truth status)",
        events.len(),
        unknown
    );
    Ok(())
}

fn run_dedupe(input: &PathBuf, output: &PathBuf) -> Result<()> {
    let lines = std::fs::read_to_string(input)?;
    let mut opportunities: Vec<Opportunity> = Vec::new();
    for line in lines.lines() {
        if line.trim().is_empty() {
            continue;
        }
        opportunities.push(serde_json::from_str(line)?);
    }
    let before = opportunities.len();

    let surviving = dedupe_opportunities(opportunities);
    write_opportunities_jsonl(output, &surviving)?;

    println!(
        "Deduped {} opportunities down to {}",
        before,
        surviving.len()
    );
    Ok(())
}

async fn run_all(
    mock: bool,
    config_path: Option<PathBuf>,
    games: Option<usize>,
    seed: Option<u64>,
) -> Result<()> {
    if !mock {
        anyhow::bail!("no live feeds are wired into this binary; pass --mock");
    }

    let config = match config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let cache = Arc::new(ResultCache::with_durations(
        config.cache.duration(),
        config.cache.sweep_interval(),
    ));
    let sweeper = cache.start_sweeper();

    let feed = MockFeed::new(
        games.unwrap_or(config.mock.game_count),
        seed.or(config.mock.seed),
    );
    let pipeline = Pipeline::new(
        Arc::clone(&cache),
        vec![MarketType::Moneyline, MarketType::Spread, MarketType::Total],
    );

    let (events, opportunities, stats) = pipeline.process_feed(&feed).await?;
    stats.log_summary();

    let data_dir = PathBuf::from(&config.data_dir);
    write_events_jsonl(data_dir.join("events.jsonl"), &events)?;
    write_opportunities_jsonl(data_dir.join("opportunities.jsonl"), &opportunities)?;

    println!("\n=== Pipeline Summary ===");
    println!("Events: {}", events.len());
    println!("Opportunities: {}", opportunities.len());
    println!("Quotes dropped as duplicates: {}", stats.quotes_dropped);
    println!("Outputs written to {:?}", data_dir);

    sweeper.stop().await;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Normalize { input, output } => run_normalize(&input, &output)?,
        Commands::Dedupe { input, output } => run_dedupe(&input, &output)?,
        Commands::RunAll {
            mock,
            config,
            games,
            seed,
        } => run_all(mock, config, games, seed).await?,
    }

    Ok(())
}
