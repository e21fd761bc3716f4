//! Rendering of the daily digest document.
//!
//! ```text
//! DAILY NEWS DIGEST: AI STARTUPS
//! Date: 2025-05-06
//! Articles: 2
//! 🔥 1 Positive | ⚠️ 0 Neutral | ⚡ 1 Negative
//!
//! KEY TAKEAWAYS:
//! • 🔥 Acme raises $40M (POSITIVE)
//!    - Acme closed a Series B ...
//!    - Source: TechCrunch
//! • ⚡ Beta lays off staff (NEGATIVE)
//!    - ...
//!    - Source: The Verge
//!
//! SOURCES:
//! [1] https://...
//! [2] https://...
//! ```

use crate::models::{Digest, ProcessedArticle, SentimentLabel};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{info, instrument};

/// Indent for summary lines after the first, aligned with the `- ` bullet text.
const CONTINUATION_INDENT: &str = "\n     ";

#[derive(Debug, Clone)]
pub struct DigestAggregator {
    topic: String,
}

impl DigestAggregator {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
        }
    }

    /// Render the digest for `articles` in the given order, stamped with `date`.
    #[instrument(level = "info", skip_all, fields(topic = %self.topic, count = articles.len()))]
    pub fn generate(&self, articles: &[ProcessedArticle], date: NaiveDate) -> Digest {
        let sentiment_counts = count_labels(articles);
        let count = |label: SentimentLabel| sentiment_counts.get(&label).copied().unwrap_or(0);

        let mut lines = vec![
            format!("DAILY NEWS DIGEST: {}", self.topic.to_uppercase()),
            format!("Date: {}", date.format("%Y-%m-%d")),
            format!("Articles: {}", articles.len()),
            format!(
                "{} {} Positive | {} {} Neutral | {} {} Negative",
                SentimentLabel::Positive.marker(),
                count(SentimentLabel::Positive),
                SentimentLabel::Neutral.marker(),
                count(SentimentLabel::Neutral),
                SentimentLabel::Negative.marker(),
                count(SentimentLabel::Negative),
            ),
            String::new(),
            "KEY TAKEAWAYS:".to_string(),
        ];

        for article in articles {
            lines.push(format!(
                "• {} {} ({})",
                article.sentiment.marker(),
                article.title,
                article.sentiment
            ));
            lines.push(format!("   - {}", indent_summary(&article.summary)));
            lines.push(format!("   - Source: {}", article.source));
        }

        lines.push(String::new());
        lines.push("SOURCES:".to_string());
        for (i, article) in articles.iter().enumerate() {
            lines.push(format!("[{}] {}", i + 1, article.url));
        }

        info!(
            positive = count(SentimentLabel::Positive),
            neutral = count(SentimentLabel::Neutral),
            negative = count(SentimentLabel::Negative),
            "Digest generated"
        );

        Digest {
            topic: self.topic.clone(),
            date,
            article_count: articles.len(),
            sentiment_counts,
            text: lines.join("\n"),
        }
    }
}

/// Count per label, with every label present even when zero.
pub fn count_labels(articles: &[ProcessedArticle]) -> BTreeMap<SentimentLabel, usize> {
    let mut counts: BTreeMap<SentimentLabel, usize> =
        SentimentLabel::ALL.iter().map(|&l| (l, 0)).collect();
    for article in articles {
        *counts.entry(article.sentiment).or_insert(0) += 1;
    }
    counts
}

/// Keep multi-paragraph summaries inside their takeaway block.
fn indent_summary(summary: &str) -> String {
    summary
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(CONTINUATION_INDENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processed(title: &str, sentiment: SentimentLabel) -> ProcessedArticle {
        ProcessedArticle {
            title: title.to_string(),
            source: format!("{title} Times"),
            url: format!("https://example.com/{}", title.to_lowercase()),
            summary: format!("{title} summary."),
            sentiment,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 6).unwrap()
    }

    #[test]
    fn mixed_batch_counts_and_order() {
        let articles = vec![
            processed("Alpha", SentimentLabel::Positive),
            processed("Beta", SentimentLabel::Positive),
            processed("Gamma", SentimentLabel::Negative),
        ];
        let digest = DigestAggregator::new("AI Startups").generate(&articles, date());

        assert_eq!(digest.article_count, 3);
        assert_eq!(digest.count(SentimentLabel::Positive), 2);
        assert_eq!(digest.count(SentimentLabel::Neutral), 0);
        assert_eq!(digest.count(SentimentLabel::Negative), 1);

        let lines: Vec<&str> = digest.text.lines().collect();
        assert_eq!(lines[0], "DAILY NEWS DIGEST: AI STARTUPS");
        assert_eq!(lines[1], "Date: 2025-05-06");
        assert_eq!(lines[2], "Articles: 3");
        assert_eq!(lines[3], "🔥 2 Positive | ⚠️ 0 Neutral | ⚡ 1 Negative");
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "KEY TAKEAWAYS:");
        assert_eq!(lines[6], "• 🔥 Alpha (POSITIVE)");
        assert_eq!(lines[7], "   - Alpha summary.");
        assert_eq!(lines[8], "   - Source: Alpha Times");
        assert_eq!(lines[12], "• ⚡ Gamma (NEGATIVE)");

        let takeaways = lines.iter().filter(|l| l.starts_with("• ")).count();
        assert_eq!(takeaways, 3);

        let sources_at = lines.iter().position(|l| *l == "SOURCES:").unwrap();
        assert_eq!(lines[sources_at - 1], "");
        assert_eq!(
            &lines[sources_at + 1..],
            &[
                "[1] https://example.com/alpha",
                "[2] https://example.com/beta",
                "[3] https://example.com/gamma",
            ]
        );
    }

    #[test]
    fn empty_batch_has_all_labels_at_zero() {
        let digest = DigestAggregator::new("Climate").generate(&[], date());
        assert_eq!(digest.article_count, 0);
        assert_eq!(digest.sentiment_counts.len(), 3);
        assert_eq!(digest.sentiment_counts.values().sum::<usize>(), 0);
        assert!(digest.text.contains("Articles: 0"));
        assert!(digest.text.ends_with("SOURCES:"));
    }

    #[test]
    fn counts_sum_to_article_count() {
        let articles: Vec<_> = SentimentLabel::ALL
            .iter()
            .cycle()
            .take(10)
            .enumerate()
            .map(|(i, &l)| processed(&format!("A{i}"), l))
            .collect();
        let digest = DigestAggregator::new("t").generate(&articles, date());
        assert_eq!(digest.sentiment_counts.values().sum::<usize>(), 10);
        assert_eq!(digest.article_count, articles.len());
    }

    #[test]
    fn generation_is_deterministic() {
        let articles = vec![processed("Alpha", SentimentLabel::Neutral)];
        let agg = DigestAggregator::new("t");
        assert_eq!(agg.generate(&articles, date()), agg.generate(&articles, date()));
    }

    #[test]
    fn multi_paragraph_summary_stays_indented() {
        let mut article = processed("Alpha", SentimentLabel::Neutral);
        article.summary = "First paragraph.\n\nSecond paragraph.".into();
        let digest = DigestAggregator::new("t").generate(&[article], date());
        assert!(digest
            .text
            .contains("   - First paragraph.\n     Second paragraph.\n   - Source: Alpha Times"));
    }
}
