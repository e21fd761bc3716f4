//! Batch orchestration.
//!
//! A [`Pipeline`] is assembled once from a validated [`PipelineConfig`] and
//! then turns a slice of [`RawArticle`]s into one [`ProcessedArticle`] each
//! plus the rendered [`Digest`]. Articles are processed on a bounded pool of
//! `concurrency` in-flight tasks; results are put back into input order
//! before aggregation, so the output does not depend on completion order.

use crate::api::{AskAsync, ChatClient};
use crate::chunker::DocumentChunker;
use crate::config::PipelineConfig;
use crate::error::ConfigError;
use crate::models::{Digest, ProcessedArticle, RawArticle};
use crate::outputs::digest::DigestAggregator;
use crate::scrapers::article::TextExtractor;
use crate::sentiment::SentimentClassifier;
use crate::summarizer::Summarizer;
use chrono::{NaiveDate, Utc};
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use std::time::Instant;
use tracing::{info, instrument};

pub struct Pipeline<S, C> {
    summarizer: Summarizer<S>,
    classifier: SentimentClassifier<C>,
    aggregator: DigestAggregator,
    concurrency: usize,
}

impl Pipeline<ChatClient, ChatClient> {
    /// Validate `config` and build every component from it.
    ///
    /// This is the only place a run can fail; nothing has been fetched yet.
    #[instrument(level = "info", skip_all, fields(topic = %config.topic))]
    pub fn from_config(config: &PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let extractor = TextExtractor::new(config.extractor.timeout())?;
        let chunker = DocumentChunker::new(config.chunking.max_size, config.chunking.overlap);
        let summarizer = Summarizer::new(
            ChatClient::new(&config.summary_model, "summary_model")?,
            extractor,
            chunker,
            &config.extractor,
        );
        let classifier =
            SentimentClassifier::new(ChatClient::new(&config.sentiment_model, "sentiment_model")?);

        info!(
            summary_model = %config.summary_model.model,
            sentiment_model = %config.sentiment_model.model,
            concurrency = config.concurrency,
            "Pipeline assembled"
        );
        Ok(Self::new(
            summarizer,
            classifier,
            DigestAggregator::new(config.topic.as_str()),
            config.concurrency,
        ))
    }
}

impl<S: AskAsync, C: AskAsync> Pipeline<S, C> {
    pub fn new(
        summarizer: Summarizer<S>,
        classifier: SentimentClassifier<C>,
        aggregator: DigestAggregator,
        concurrency: usize,
    ) -> Self {
        Self {
            summarizer,
            classifier,
            aggregator,
            concurrency: concurrency.max(1),
        }
    }

    /// Summarize and classify one article. Never fails.
    #[instrument(level = "info", skip_all, fields(index = index, url = %article.url))]
    pub async fn process_article(&self, index: usize, article: &RawArticle) -> ProcessedArticle {
        let summary = self.summarizer.summarize(article).await;
        let sentiment = self.classifier.classify(&summary).await;
        info!(%sentiment, "Processed article");
        ProcessedArticle::new(article, summary, sentiment)
    }

    /// Process every article, returning results in input order.
    pub async fn process(&self, articles: &[RawArticle]) -> Vec<ProcessedArticle> {
        let t0 = Instant::now();
        info!(
            count = articles.len(),
            concurrency = self.concurrency,
            "Starting article processing"
        );

        let results: Vec<(usize, ProcessedArticle)> = stream::iter(articles.iter().enumerate())
            .map(|(i, article)| async move { (i, self.process_article(i, article).await) })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let processed: Vec<ProcessedArticle> = results
            .into_iter()
            .sorted_by_key(|(i, _)| *i)
            .map(|(_, p)| p)
            .collect();

        info!(
            count = processed.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Completed article processing"
        );
        processed
    }

    /// Process the batch and render the digest stamped with `date`.
    pub async fn run_for_date(
        &self,
        articles: &[RawArticle],
        date: NaiveDate,
    ) -> (Vec<ProcessedArticle>, Digest) {
        let processed = self.process(articles).await;
        let digest = self.aggregator.generate(&processed, date);
        (processed, digest)
    }

    /// Process the batch and render today's (UTC) digest.
    pub async fn run(&self, articles: &[RawArticle]) -> (Vec<ProcessedArticle>, Digest) {
        self.run_for_date(articles, Utc::now().date_naive()).await
    }
}
