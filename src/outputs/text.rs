//! Plain-text export of the digest report.

use super::dated_path;
use crate::models::Digest;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument};

/// Write the rendered report to `{output_dir}/news_digest_{YYYYMMDD}.txt`.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir))]
pub async fn write_digest_text(digest: &Digest, output_dir: &str) -> Result<PathBuf, Box<dyn Error>> {
    fs::create_dir_all(output_dir).await?;
    let path = dated_path(output_dir, digest.date, "txt");
    fs::write(&path, &digest.text).await?;
    info!(path = %path.display(), bytes = digest.text.len(), "Wrote digest text");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProcessedArticle, SentimentLabel};
    use crate::outputs::digest::DigestAggregator;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn writes_report_verbatim() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("reports");
        let dir = dir.to_str().unwrap();
        let articles = vec![ProcessedArticle {
            title: "Beta lays off staff".into(),
            source: "Example Wire".into(),
            url: "https://example.com/beta".into(),
            summary: "Beta cut 10% of its workforce.".into(),
            sentiment: SentimentLabel::Negative,
        }];
        let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let digest = DigestAggregator::new("AI Startups").generate(&articles, date);

        let path = write_digest_text(&digest, dir).await.unwrap();
        assert!(path.ends_with("news_digest_20250131.txt"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), digest.text);
    }
}
