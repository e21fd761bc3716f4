//! Data models for raw articles, their processed form, and the final digest.
//!
//! - [`RawArticle`]: an article as delivered by an upstream source
//! - [`ProcessedArticle`]: the summarized and sentiment-tagged article
//! - [`SentimentLabel`]: the closed set of sentiment classes
//! - [`Digest`]: the rendered report plus its sentiment distribution

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A news item as returned by the article source.
///
/// `content` is the API snippet, often truncated with a `[+N chars]` marker
/// and sometimes missing altogether.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawArticle {
    /// Headline of the article.
    pub title: String,
    /// Canonical URL of the article page.
    pub url: String,
    /// Short snippet provided by the source, if any.
    #[serde(default)]
    pub content: Option<String>,
    /// Human-readable name of the publisher.
    pub source: String,
    /// Publication timestamp.
    pub published: DateTime<Utc>,
}

impl RawArticle {
    /// The snippet, or an empty string when the source did not provide one.
    pub fn snippet(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

/// Sentiment class of a summary.
///
/// Ordering is declaration order, which keeps counts maps stable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl SentimentLabel {
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
    ];

    /// Upper-case wire name, as used in prompts and the digest.
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "POSITIVE",
            SentimentLabel::Negative => "NEGATIVE",
            SentimentLabel::Neutral => "NEUTRAL",
        }
    }

    /// Marker glyph shown next to articles and counts in the digest.
    pub fn marker(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "🔥",
            SentimentLabel::Negative => "⚡",
            SentimentLabel::Neutral => "⚠️",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One article after summarization and classification.
///
/// Created exactly once per [`RawArticle`]; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProcessedArticle {
    pub title: String,
    pub source: String,
    pub url: String,
    pub summary: String,
    pub sentiment: SentimentLabel,
}

impl ProcessedArticle {
    pub fn new(article: &RawArticle, summary: String, sentiment: SentimentLabel) -> Self {
        Self {
            title: article.title.clone(),
            source: article.source.clone(),
            url: article.url.clone(),
            summary,
            sentiment,
        }
    }
}

/// The rendered report for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Digest {
    /// Topic the digest was generated for.
    pub topic: String,
    /// Date stamp embedded in the report.
    pub date: NaiveDate,
    /// Number of articles covered; always equals the processed list length.
    pub article_count: usize,
    /// Count per label; always contains all three labels.
    pub sentiment_counts: BTreeMap<SentimentLabel, usize>,
    /// The formatted, newline-joined document.
    pub text: String,
}

impl Digest {
    pub fn count(&self, label: SentimentLabel) -> usize {
        self.sentiment_counts.get(&label).copied().unwrap_or(0)
    }
}
