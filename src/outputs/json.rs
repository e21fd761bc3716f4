//! JSON export of a finished digest.
//!
//! The file carries the digest metadata and the processed articles so that
//! downstream tools do not have to parse the text report:
//!
//! ```text
//! output_dir/
//! └── news_digest_20250506.json
//! ```

use super::dated_path;
use crate::models::{Digest, ProcessedArticle, SentimentLabel};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

#[derive(Serialize)]
struct DigestExport<'a> {
    topic: &'a str,
    date: NaiveDate,
    article_count: usize,
    sentiment_counts: &'a BTreeMap<SentimentLabel, usize>,
    articles: &'a [ProcessedArticle],
}

/// Write the digest and its articles to `{output_dir}/news_digest_{YYYYMMDD}.json`.
///
/// Returns the path written.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir))]
pub async fn write_digest_json(
    digest: &Digest,
    articles: &[ProcessedArticle],
    output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let export = DigestExport {
        topic: &digest.topic,
        date: digest.date,
        article_count: digest.article_count,
        sentiment_counts: &digest.sentiment_counts,
        articles,
    };
    let json = serde_json::to_string_pretty(&export)?;

    if let Err(e) = fs::create_dir_all(output_dir).await {
        error!(output_dir, error = %e, "Failed to create output dir");
        return Err(e.into());
    }

    let path = dated_path(output_dir, digest.date, "json");
    info!(path = %path.display(), "Writing JSON");
    fs::write(&path, json).await?;
    info!(path = %path.display(), articles = articles.len(), "Wrote digest JSON");

    Ok(path)
}
