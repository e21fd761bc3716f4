//! Command-line interface definitions for the news digest.
//!
//! Every option can also come from the environment where noted. Flags that
//! are left unset keep the value from the config file (or its default).

use crate::config::PipelineConfig;
use clap::Parser;

/// Command-line arguments for the news digest.
///
/// # Examples
///
/// ```sh
/// # Search NewsAPI and write the digest to ./digests
/// news_digest --topic "AI Startups" -n 10 -o ./digests
///
/// # Offline run over a saved article list
/// news_digest --input articles.json -o ./digests
///
/// # Custom model settings
/// news_digest --config digest.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Topic to search for and to title the digest with
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Number of articles to request from NewsAPI
    #[arg(short, long, default_value_t = 5)]
    pub num_articles: u32,

    /// How many days back to search
    #[arg(short, long, default_value_t = 1)]
    pub days_back: i64,

    /// Article language (ISO 639-1)
    #[arg(short, long, default_value = "en")]
    pub language: String,

    /// Comma-separated NewsAPI source ids
    #[arg(short, long)]
    pub sources: Option<String>,

    /// Read articles from a JSON file instead of calling NewsAPI
    #[arg(short, long)]
    pub input: Option<String>,

    /// Output directory for the digest files
    #[arg(short, long, default_value = ".")]
    pub output_dir: String,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Number of articles processed at the same time
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Groq (or other OpenAI-compatible) API key for both models
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub groq_api_key: Option<String>,

    /// NewsAPI key
    #[arg(long, env = "NEWSAPI_KEY", hide_env_values = true)]
    pub newsapi_key: Option<String>,
}

impl Cli {
    /// Apply command-line overrides on top of a loaded configuration.
    pub fn apply_to(&self, config: &mut PipelineConfig) {
        if let Some(topic) = &self.topic {
            config.topic = topic.clone();
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        config.apply_api_key(self.groq_api_key.as_deref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["news_digest"]);
        assert_eq!(cli.num_articles, 5);
        assert_eq!(cli.days_back, 1);
        assert_eq!(cli.language, "en");
        assert_eq!(cli.output_dir, ".");
        assert!(cli.topic.is_none());
        assert!(cli.input.is_none());
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "news_digest",
            "--topic",
            "Climate Tech",
            "--num-articles",
            "10",
            "--days-back",
            "3",
            "--sources",
            "techcrunch,the-verge",
            "--output-dir",
            "/tmp/digests",
            "--concurrency",
            "2",
        ]);

        assert_eq!(cli.topic.as_deref(), Some("Climate Tech"));
        assert_eq!(cli.num_articles, 10);
        assert_eq!(cli.days_back, 3);
        assert_eq!(cli.sources.as_deref(), Some("techcrunch,the-verge"));
        assert_eq!(cli.output_dir, "/tmp/digests");
        assert_eq!(cli.concurrency, Some(2));
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["news_digest", "-t", "AI", "-n", "3", "-i", "a.json", "-o", "out"]);

        assert_eq!(cli.topic.as_deref(), Some("AI"));
        assert_eq!(cli.num_articles, 3);
        assert_eq!(cli.input.as_deref(), Some("a.json"));
        assert_eq!(cli.output_dir, "out");
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let cli = Cli::parse_from([
            "news_digest",
            "--topic",
            "Robotics",
            "--concurrency",
            "1",
            "--groq-api-key",
            "gsk_cli",
        ]);
        let mut config = PipelineConfig::default();
        cli.apply_to(&mut config);

        assert_eq!(config.topic, "Robotics");
        assert_eq!(config.concurrency, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unset_flags_keep_config_values() {
        let cli = Cli::parse_from(["news_digest"]);
        let mut config = PipelineConfig::from_yaml("topic: Fintech\nconcurrency: 7\n").unwrap();
        cli.apply_to(&mut config);

        assert_eq!(config.topic, "Fintech");
        assert_eq!(config.concurrency, 7);
    }
}
