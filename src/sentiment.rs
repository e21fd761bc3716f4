//! Sentiment classification of finished summaries.

use crate::api::AskAsync;
use crate::models::SentimentLabel;
use crate::prompts::sentiment_prompt;
use crate::utils::{char_len, truncate_for_log};
use tracing::{debug, instrument, warn};

/// Summaries shorter than this carry no signal worth a model call.
const MIN_CLASSIFIABLE_CHARS: usize = 20;

pub struct SentimentClassifier<M> {
    model: M,
}

impl<M: AskAsync> SentimentClassifier<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// Label `summary`. Degenerate input and every failure map to `NEUTRAL`.
    #[instrument(level = "info", skip_all, fields(chars = char_len(summary)))]
    pub async fn classify(&self, summary: &str) -> SentimentLabel {
        if is_degenerate(summary) {
            debug!("Degenerate summary; not calling the model");
            return SentimentLabel::Neutral;
        }
        match self.model.ask(&sentiment_prompt(summary)).await {
            Ok(reply) => {
                let label = parse_label(&reply);
                debug!(reply = %truncate_for_log(&reply, 40), %label, "Classified summary");
                label
            }
            Err(e) => {
                warn!(error = %e, "Sentiment call failed; defaulting to NEUTRAL");
                SentimentLabel::Neutral
            }
        }
    }
}

/// Sentinel summaries and near-empty text are never sent to the model.
pub fn is_degenerate(summary: &str) -> bool {
    summary.to_lowercase().contains("unavailable") || char_len(summary) < MIN_CLASSIFIABLE_CHARS
}

/// Map a free-form model reply onto a label. `POSITIVE` wins over
/// `NEGATIVE` when both appear; anything else is `NEUTRAL`.
pub fn parse_label(reply: &str) -> SentimentLabel {
    let normalized = reply.trim().to_uppercase();
    if normalized.contains("POSITIVE") {
        SentimentLabel::Positive
    } else if normalized.contains("NEGATIVE") {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}
