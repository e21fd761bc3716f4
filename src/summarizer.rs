//! Article summarization.
//!
//! [`Summarizer::summarize`] is the whole per-article text path: extract the
//! page, fall back to the cleaned snippet, strip boilerplate, then summarize.
//! Documents longer than one chunk are summarized map-then-reduce: every
//! chunk is summarized on its own and the joined partial summaries are
//! summarized once more. If the joined partials are themselves too long they
//! are chunked again, for at most [`MAX_REDUCE_PASSES`] passes.
//!
//! Nothing here returns an error. Missing content yields
//! [`UNAVAILABLE_SUMMARY`], a failed model call yields [`FAILED_SUMMARY`].

use crate::api::AskAsync;
use crate::chunker::DocumentChunker;
use crate::config::ExtractorConfig;
use crate::error::ModelError;
use crate::models::RawArticle;
use crate::prompts::summary_prompt;
use crate::scrapers::article::TextExtractor;
use crate::text::{clean_snippet, strip_boilerplate};
use crate::utils::{char_len, truncate_for_log};
use tracing::{debug, info, instrument, warn};

pub const UNAVAILABLE_SUMMARY: &str = "Summary unavailable: Could not retrieve content";
pub const FAILED_SUMMARY: &str = "Summary generation failed";

/// Upper bound on chunk-and-summarize passes before the final reduce.
pub const MAX_REDUCE_PASSES: usize = 3;

pub struct Summarizer<M> {
    model: M,
    extractor: TextExtractor,
    chunker: DocumentChunker,
    min_full_text_chars: usize,
    min_snippet_chars: usize,
}

impl<M: AskAsync> Summarizer<M> {
    pub fn new(
        model: M,
        extractor: TextExtractor,
        chunker: DocumentChunker,
        thresholds: &ExtractorConfig,
    ) -> Self {
        Self {
            model,
            extractor,
            chunker,
            min_full_text_chars: thresholds.min_full_text_chars,
            min_snippet_chars: thresholds.min_snippet_chars,
        }
    }

    /// Summarize one article. Always returns a string.
    #[instrument(level = "info", skip_all, fields(url = %article.url))]
    pub async fn summarize(&self, article: &RawArticle) -> String {
        let full_text = self.extractor.extract(&article.url).await;
        let full_chars = char_len(&full_text);

        let text = if full_chars >= self.min_full_text_chars {
            debug!(chars = full_chars, "Using extracted page text");
            full_text
        } else {
            let snippet = clean_snippet(article.snippet());
            let snippet_chars = char_len(&snippet);
            if snippet_chars < self.min_snippet_chars {
                info!(
                    extracted_chars = full_chars,
                    snippet_chars, "No usable content; skipping model"
                );
                return UNAVAILABLE_SUMMARY.to_string();
            }
            debug!(
                extracted_chars = full_chars,
                snippet_chars, "Falling back to API snippet"
            );
            snippet
        };

        self.summarize_text(&text).await
    }

    /// Summarize already-extracted text: strip boilerplate, chunk if the
    /// text is too long, summarize.
    pub async fn summarize_text(&self, text: &str) -> String {
        let mut text = strip_boilerplate(text);
        if text.is_empty() {
            return UNAVAILABLE_SUMMARY.to_string();
        }

        let mut pass = 0;
        while self.chunker.needs_split(&text) && pass < MAX_REDUCE_PASSES {
            let chunks = self.chunker.split(&text);
            info!(pass, chars = char_len(&text), chunks = chunks.len(), "Summarizing chunks");

            let mut partials = Vec::with_capacity(chunks.len());
            for (i, chunk) in chunks.iter().enumerate() {
                match self.try_summarize_chunk(chunk).await {
                    Ok(summary) => partials.push(summary),
                    Err(e) => warn!(pass, chunk = i, error = %e, "Dropping failed chunk summary"),
                }
            }
            if partials.is_empty() {
                warn!(pass, "Every chunk summary failed");
                return FAILED_SUMMARY.to_string();
            }

            text = partials.join("\n\n");
            pass += 1;
        }

        if self.chunker.needs_split(&text) {
            warn!(
                passes = pass,
                chars = char_len(&text),
                "Partial summaries still exceed one chunk; truncating for the final pass"
            );
            text = text.chars().take(self.chunker.max_size()).collect();
        }

        self.summarize_chunk(&text).await
    }

    /// Summarize one chunk, degrading to [`FAILED_SUMMARY`] on any error.
    pub async fn summarize_chunk(&self, text: &str) -> String {
        match self.try_summarize_chunk(text).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(error = %e, "Summary generation failed");
                FAILED_SUMMARY.to_string()
            }
        }
    }

    /// One model call over one chunk. An empty completion is an error.
    pub async fn try_summarize_chunk(&self, text: &str) -> Result<String, ModelError> {
        let reply = self.model.ask(&summary_prompt(text)).await?;
        let summary = reply.trim();
        if summary.is_empty() {
            return Err(ModelError::Malformed("empty completion".to_string()));
        }
        debug!(preview = %truncate_for_log(summary, 120), "Chunk summarized");
        Ok(summary.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::ScriptedModel;
    use chrono::Utc;
    use std::time::Duration;

    fn summarizer(model: ScriptedModel, max_size: usize, overlap: usize) -> Summarizer<ScriptedModel> {
        Summarizer::new(
            model,
            TextExtractor::new(Duration::from_secs(2)).unwrap(),
            DocumentChunker::new(max_size, overlap),
            &ExtractorConfig::default(),
        )
    }

    fn article(url: &str, content: Option<&str>) -> RawArticle {
        RawArticle {
            title: "Startup ships new chip".into(),
            url: url.into(),
            content: content.map(str::to_string),
            source: "Example Wire".into(),
            published: Utc::now(),
        }
    }

    fn long_article(target: usize) -> String {
        let mut text = String::new();
        let mut i = 0;
        while char_len(&text) < target {
            text.push_str(&format!(
                "Paragraph {i}: the startup reported {i} new enterprise customers this quarter.\n\n"
            ));
            i += 1;
        }
        text
    }

    #[tokio::test]
    async fn unreachable_page_and_empty_snippet_is_unavailable() {
        let model = ScriptedModel::answering("should not be used");
        let s = summarizer(model, 8000, 300);
        let out = s.summarize(&article("http://127.0.0.1:1/story", None)).await;
        assert_eq!(out, UNAVAILABLE_SUMMARY);
        assert_eq!(s.model.calls(), 0);
    }

    #[tokio::test]
    async fn short_snippet_is_unavailable() {
        let s = summarizer(ScriptedModel::answering("x"), 8000, 300);
        let out = s
            .summarize(&article("http://127.0.0.1:1/story", Some("Too short [+999 chars]")))
            .await;
        assert_eq!(out, UNAVAILABLE_SUMMARY);
        assert_eq!(s.model.calls(), 0);
    }

    #[tokio::test]
    async fn usable_snippet_is_summarized() {
        let snippet = format!("<p>{}</p> [+4021 chars]", "The startup raised forty million dollars. ".repeat(4));
        let s = summarizer(ScriptedModel::answering("  Acme raised $40M.  "), 8000, 300);
        let out = s.summarize(&article("http://127.0.0.1:1/story", Some(&snippet))).await;
        assert_eq!(out, "Acme raised $40M.");
        assert_eq!(s.model.calls(), 1);
        let prompt = s.model.prompt(0);
        assert!(!prompt.contains("<p>"));
        assert!(!prompt.contains("[+4021 chars]"));
    }

    #[tokio::test]
    async fn long_text_is_mapped_then_reduced_once() {
        let text = long_article(20_000);
        let s = summarizer(ScriptedModel::answering("Partial summary."), 8000, 300);
        let expected_chunks = s.chunker.split(&text).len();
        assert!(expected_chunks >= 3);

        let out = s.summarize_text(&text).await;
        assert_eq!(out, "Partial summary.");
        assert_eq!(s.model.calls(), expected_chunks + 1);

        let reduce_prompt = s.model.prompt(expected_chunks);
        let joined = vec!["Partial summary."; expected_chunks].join("\n\n");
        assert!(reduce_prompt.contains(&joined));
    }

    #[tokio::test]
    async fn short_text_is_one_call() {
        let s = summarizer(ScriptedModel::answering("Done."), 8000, 300);
        assert_eq!(s.summarize_text("A short article body.").await, "Done.");
        assert_eq!(s.model.calls(), 1);
    }

    #[tokio::test]
    async fn boilerplate_never_reaches_the_model() {
        let s = summarizer(ScriptedModel::answering("Done."), 8000, 300);
        s.summarize_text("Acme raised $40M.\nSubscribe to our newsletter for updates\nAdvertisement")
            .await;
        let prompt = s.model.prompt(0).to_lowercase();
        assert!(!prompt.contains("subscribe to our newsletter"));
        assert!(!prompt.contains("advertisement"));
    }

    #[tokio::test]
    async fn model_failure_yields_failed_sentinel() {
        let s = summarizer(ScriptedModel::failing("connection reset"), 8000, 300);
        assert_eq!(s.summarize_text("Some article body.").await, FAILED_SUMMARY);
        assert_eq!(s.model.calls(), 1);
    }

    #[tokio::test]
    async fn empty_completion_counts_as_failure() {
        let s = summarizer(ScriptedModel::answering("   "), 8000, 300);
        assert_eq!(s.summarize_text("Some article body.").await, FAILED_SUMMARY);
    }

    #[tokio::test]
    async fn failed_chunks_are_left_out_of_the_reduce() {
        let text = long_article(2_500);
        let model = ScriptedModel::answering("Reduced.")
            .then(Err(ModelError::Transport("reset".into())))
            .then(Ok("Second part."));
        let s = summarizer(model, 1000, 50);
        let chunks = s.chunker.split(&text).len();

        let out = s.summarize_text(&text).await;
        assert_eq!(out, "Reduced.");
        assert_eq!(s.model.calls(), chunks + 1);
        let reduce_prompt = s.model.prompt(chunks);
        assert!(reduce_prompt.contains("Second part."));
        assert!(!reduce_prompt.contains("reset"));
    }

    #[tokio::test]
    async fn all_chunks_failing_skips_the_reduce() {
        let text = long_article(2_500);
        let s = summarizer(ScriptedModel::failing("down"), 1000, 50);
        let chunks = s.chunker.split(&text).len();
        assert_eq!(s.summarize_text(&text).await, FAILED_SUMMARY);
        assert_eq!(s.model.calls(), chunks);
    }

    #[tokio::test]
    async fn oversized_partials_are_chunked_again() {
        let text = long_article(3_000);
        let verbose = "word ".repeat(150);
        let s = summarizer(ScriptedModel::answering(&verbose), 500, 20);
        let first_pass = s.chunker.split(&text).len();

        let out = s.summarize_text(&text).await;
        assert_eq!(out, verbose.trim());
        assert!(s.model.calls() > first_pass + 1);
    }
}
