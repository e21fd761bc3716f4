//! Article search through the [NewsAPI](https://newsapi.org) `everything`
//! endpoint, plus a JSON file source for offline runs.
//!
//! NewsAPI returns only a truncated `content` snippet (`... [+1234 chars]`);
//! full text is fetched later by the extractor. When `content` is null the
//! `description` is used instead.

use crate::error::SourceError;
use crate::models::RawArticle;
use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

pub const NEWSAPI_EVERYTHING_URL: &str = "https://newsapi.org/v2/everything";

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    #[serde(default)]
    title: Option<String>,
    url: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    description: Option<String>,
    source: NewsApiSourceName,
    published_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSourceName {
    #[serde(default)]
    name: Option<String>,
}

impl From<NewsApiArticle> for RawArticle {
    fn from(a: NewsApiArticle) -> Self {
        let content = [a.content, a.description]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty());
        RawArticle {
            title: a.title.unwrap_or_default(),
            url: a.url,
            content,
            source: a.source.name.unwrap_or_else(|| "Unknown".to_string()),
            published: a.published_at,
        }
    }
}

/// Search parameters for one fetch.
#[derive(Debug, Clone)]
pub struct ArticleQuery {
    pub query: String,
    pub page_size: u32,
    pub days_back: i64,
    pub language: String,
    /// Comma-separated NewsAPI source ids; empty means all sources.
    pub sources: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewsApiSource {
    client: Client,
    api_key: String,
    base_url: String,
}

impl NewsApiSource {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, NEWSAPI_EVERYTHING_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    /// Fetch the most relevant articles published in the last `days_back` days.
    #[instrument(level = "info", skip_all, fields(query = %q.query, page_size = q.page_size))]
    pub async fn fetch_articles(&self, q: &ArticleQuery) -> Result<Vec<RawArticle>, SourceError> {
        let to = Utc::now();
        let from = to - Duration::days(q.days_back);

        let mut params = vec![
            ("q", q.query.clone()),
            ("pageSize", q.page_size.to_string()),
            ("from", from.format("%Y-%m-%d").to_string()),
            ("to", to.format("%Y-%m-%d").to_string()),
            ("language", q.language.clone()),
            ("sortBy", "relevancy".to_string()),
        ];
        if let Some(sources) = q.sources.as_deref().filter(|s| !s.trim().is_empty()) {
            params.push(("sources", sources.to_string()));
        }
        debug!(?params, "NewsAPI request");
        params.push(("apiKey", self.api_key.clone()));

        let response = self.client.get(&self.base_url).query(&params).send().await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!("NewsAPI rejected the API key");
            return Err(SourceError::Unauthorized);
        }
        if !status.is_success() {
            return Err(SourceError::Status(status));
        }

        let body = response.text().await?;
        let articles = parse_everything(&body)?;
        info!(count = articles.len(), "Fetched articles from NewsAPI");
        Ok(articles)
    }
}

/// Decode an `everything` response body.
pub fn parse_everything(body: &str) -> Result<Vec<RawArticle>, SourceError> {
    let response: EverythingResponse = serde_json::from_str(body)?;
    if response.status != "ok" {
        return Err(SourceError::Api(
            response.message.unwrap_or_else(|| "Unknown error".to_string()),
        ));
    }
    Ok(response.articles.into_iter().map(RawArticle::from).collect())
}

/// Read a JSON array of [`RawArticle`] from `path`.
#[instrument(level = "info")]
pub async fn load_articles(path: &str) -> Result<Vec<RawArticle>, SourceError> {
    let raw = fs::read_to_string(path)
        .await
        .map_err(|source| SourceError::Read {
            path: path.to_string(),
            source,
        })?;
    let articles: Vec<RawArticle> = serde_json::from_str(&raw)?;
    info!(count = articles.len(), "Loaded articles from file");
    Ok(articles)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OK_BODY: &str = r#"{
        "status": "ok",
        "totalResults": 3,
        "articles": [
            {
                "source": {"id": "techcrunch", "name": "TechCrunch"},
                "title": "Acme raises $40M",
                "description": "Acme raised money.",
                "url": "https://techcrunch.com/acme",
                "publishedAt": "2025-05-06T08:00:00Z",
                "content": "Acme, the AI chip startup, raised $40M… [+2143 chars]"
            },
            {
                "source": {"id": null, "name": "The Verge"},
                "title": "Beta lays off staff",
                "description": "Beta is cutting jobs.",
                "url": "https://theverge.com/beta",
                "publishedAt": "2025-05-06T09:30:00Z",
                "content": null
            },
            {
                "source": {"id": null, "name": null},
                "title": null,
                "description": null,
                "url": "https://example.com/removed",
                "publishedAt": "2025-05-06T10:00:00Z",
                "content": ""
            }
        ]
    }"#;

    #[test]
    fn parses_articles_with_fallbacks() {
        let articles = parse_everything(OK_BODY).unwrap();
        assert_eq!(articles.len(), 3);

        assert_eq!(articles[0].source, "TechCrunch");
        assert!(articles[0].snippet().contains("[+2143 chars]"));

        assert_eq!(articles[1].snippet(), "Beta is cutting jobs.");

        assert_eq!(articles[2].title, "");
        assert_eq!(articles[2].source, "Unknown");
        assert_eq!(articles[2].content, None);
    }

    #[test]
    fn api_error_carries_message() {
        let body = r#"{"status":"error","code":"rateLimited","message":"You have made too many requests"}"#;
        match parse_everything(body) {
            Err(SourceError::Api(msg)) => assert!(msg.contains("too many requests")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn garbage_body_is_parse_error() {
        assert!(matches!(parse_everything("<html>"), Err(SourceError::Parse(_))));
    }

    #[tokio::test]
    async fn unreachable_api_is_network_error() {
        let source = NewsApiSource::with_base_url("key", "http://127.0.0.1:9/v2/everything");
        let q = ArticleQuery {
            query: "AI".into(),
            page_size: 5,
            days_back: 1,
            language: "en".into(),
            sources: None,
        };
        assert!(matches!(
            source.fetch_articles(&q).await,
            Err(SourceError::Network(_))
        ));
    }

    #[tokio::test]
    async fn loads_articles_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("articles.json");
        std::fs::write(
            &path,
            r#"[{"title":"t","url":"https://example.com/a","content":null,"source":"s","published":"2025-05-06T08:00:00Z"}]"#,
        )
        .unwrap();
        let articles = load_articles(path.to_str().unwrap()).await.unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].url, "https://example.com/a");
    }

    #[tokio::test]
    async fn missing_file_is_read_error() {
        assert!(matches!(
            load_articles("/nonexistent/articles.json").await,
            Err(SourceError::Read { .. })
        ));
    }
}
