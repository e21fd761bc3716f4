//! # News Digest
//!
//! Turns a day's news on one topic into a short, sentiment-tagged digest.
//! Articles are found through NewsAPI (or read from a JSON file), their full
//! text is scraped from the publisher's page, summarized through an
//! OpenAI-compatible LLM (Groq by default), classified as positive, negative
//! or neutral, and rendered into a plain-text report plus a JSON export.
//!
//! ## Usage
//!
//! ```sh
//! GROQ_API_KEY=... NEWSAPI_KEY=... news_digest --topic "AI Startups" -o ./digests
//! ```
//!
//! ## Architecture
//!
//! 1. **Configuration**: YAML file, CLI flags and environment, validated once
//! 2. **Sourcing**: NewsAPI search or a local article file
//! 3. **Processing**: extract, summarize, classify (bounded parallelism)
//! 4. **Output**: digest printed to stdout and written as text and JSON

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod chunker;
mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod pipeline;
mod prompts;
mod scrapers;
mod sentiment;
mod summarizer;
mod text;
mod utils;

use cli::Cli;
use config::PipelineConfig;
use models::SentimentLabel;
use outputs::{json, text as text_output};
use pipeline::Pipeline;
use scrapers::newsapi::{ArticleQuery, NewsApiSource, load_articles};
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_digest starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.topic, ?args.input, output_dir = %args.output_dir, "Parsed CLI arguments");

    // ---- Configuration ----
    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    args.apply_to(&mut config);

    let pipeline = match Pipeline::from_config(&config) {
        Ok(p) => p,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    // Early check: ensure output dir is writable
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // ---- Articles ----
    let articles = match &args.input {
        Some(path) => load_articles(path).await?,
        None => {
            let Some(key) = args.newsapi_key.as_deref().filter(|k| !k.trim().is_empty()) else {
                error!("No NewsAPI key; set NEWSAPI_KEY or pass --input");
                return Err("missing NewsAPI key".into());
            };
            let query = ArticleQuery {
                query: config.topic.clone(),
                page_size: args.num_articles,
                days_back: args.days_back,
                language: args.language.clone(),
                sources: args.sources.clone(),
            };
            NewsApiSource::new(key).fetch_articles(&query).await?
        }
    };
    info!(count = articles.len(), topic = %config.topic, "Articles to process");

    if articles.is_empty() {
        warn!("No articles found; nothing to digest");
        return Ok(());
    }

    // ---- Process ----
    let (processed, digest) = pipeline.run(&articles).await;
    println!("{}", digest.text);

    // ---- Outputs ----
    match text_output::write_digest_text(&digest, &args.output_dir).await {
        Ok(path) => info!(path = %path.display(), "Digest saved"),
        Err(e) => error!(error = %e, "Failed to write digest text"),
    }
    if let Err(e) = json::write_digest_json(&digest, &processed, &args.output_dir).await {
        error!(error = %e, "Failed to write digest JSON");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        articles = digest.article_count,
        positive = digest.count(SentimentLabel::Positive),
        neutral = digest.count(SentimentLabel::Neutral),
        negative = digest.count(SentimentLabel::Negative),
        "Execution complete"
    );

    Ok(())
}
