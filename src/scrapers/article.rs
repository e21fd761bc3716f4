//! Full-text extraction from arbitrary news pages.
//!
//! Fetching uses a browser-like header set, with a short list of
//! site-specific overrides for known paywalled domains. Parsing is a pure
//! function over the HTML: non-content elements are removed, the article
//! root is chosen by the first matching entry of [`CONTENT_STRATEGIES`], and
//! the paragraphs, headings and quotes under it are rendered as plain text.

use crate::error::{ConfigError, ExtractError};
use crate::text::{collapse_blank_lines, strip_truncation_markers};
use once_cell::sync::Lazy;
use reqwest::Client;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CONNECTION, CONTENT_TYPE, COOKIE, HeaderMap, HeaderValue, REFERER,
    USER_AGENT,
};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const DEFAULT_REFERER: &str = "https://www.google.com/";

/// Request tweaks for a domain that rejects plain browser traffic.
#[derive(Debug)]
pub struct SiteOverride {
    /// Matches the host itself and any subdomain of it.
    pub domain: &'static str,
    pub referer: &'static str,
    pub cookie: Option<&'static str>,
}

/// Site-specific exceptions. This is a closed list, not a general bypass.
pub const SITE_OVERRIDES: &[SiteOverride] = &[SiteOverride {
    domain: "businessinsider.com",
    referer: "https://www.facebook.com/",
    cookie: Some("bounceClientVisit=1; bounceClientFirstVisit=1"),
}];

/// How the article root is located, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentStrategy {
    /// First element matching a CSS selector.
    Selector(&'static str),
    /// The document `<body>`.
    Body,
}

pub const CONTENT_STRATEGIES: &[ContentStrategy] = &[
    ContentStrategy::Selector("article"),
    ContentStrategy::Selector("div.article-body"),
    ContentStrategy::Selector("div.post-content"),
    ContentStrategy::Selector("div.story-content"),
    ContentStrategy::Selector("div.entry-content"),
    ContentStrategy::Selector("div.content-wrapper"),
    ContentStrategy::Selector("div.main-content"),
    ContentStrategy::Selector("section.main"),
    ContentStrategy::Selector("div.article-content"),
    ContentStrategy::Selector("div#article-body"),
    ContentStrategy::Selector("div.article-text"),
    ContentStrategy::Selector("div.post-body"),
    ContentStrategy::Body,
];

static NON_CONTENT: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        "script, style, nav, footer, aside, form, header, iframe, button, svg, figure, noscript, img, link",
    )
    .expect("static selector")
});

static TEXT_BLOCKS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p, h1, h2, h3, h4, blockquote").expect("static selector"));

static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").expect("static selector"));

/// Fetches article pages and turns them into plain text.
#[derive(Debug, Clone)]
pub struct TextExtractor {
    client: Client,
}

impl TextExtractor {
    /// Build an extractor whose page requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, ConfigError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Extract the article text at `url`, or an empty string if extraction
    /// is unavailable for any reason. Failures are logged, never raised.
    pub async fn extract(&self, url: &str) -> String {
        match self.try_extract(url).await {
            Ok(text) => text,
            Err(e) => {
                warn!(%url, error = %e, "Extraction failed");
                String::new()
            }
        }
    }

    /// Fetch and parse `url`, reporting why extraction failed.
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn try_extract(&self, url: &str) -> Result<String, ExtractError> {
        let parsed = Url::parse(url).map_err(|e| ExtractError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let headers = request_headers(&parsed);

        let response = self.client.get(parsed).headers(headers).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::Status(status));
        }
        if let Some(ct) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !ct.contains("html") {
                return Err(ExtractError::Parse(format!("unsupported content type {ct}")));
            }
        }

        let body = response.text().await?;
        let text = extract_article_text(&body);
        debug!(html_bytes = body.len(), text_chars = text.chars().count(), "Parsed article page");
        Ok(text)
    }
}

/// Browser-like headers, adjusted for domains listed in [`SITE_OVERRIDES`].
pub fn request_headers(url: &Url) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(REFERER, HeaderValue::from_static(DEFAULT_REFERER));

    if let Some(site) = site_override(url) {
        debug!(domain = site.domain, "Applying site-specific request headers");
        headers.insert(REFERER, HeaderValue::from_static(site.referer));
        if let Some(cookie) = site.cookie {
            headers.insert(COOKIE, HeaderValue::from_static(cookie));
        }
    }
    headers
}

fn site_override(url: &Url) -> Option<&'static SiteOverride> {
    let host = url.host_str()?;
    SITE_OVERRIDES.iter().find(|site| {
        host == site.domain
            || host
                .strip_suffix(site.domain)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

/// Render the main article content of an HTML page as plain text.
///
/// Paragraphs become text blocks, quotes are prefixed with `> `, headings are
/// upper-cased on their own line. Runs of blank lines and `[+N chars]`
/// markers are removed.
pub fn extract_article_text(html: &str) -> String {
    let mut document = Html::parse_document(html);
    strip_non_content(&mut document);

    let Some((root, strategy)) = select_content_root(&document) else {
        return String::new();
    };
    debug!(?strategy, "Selected article root");

    let mut out = String::new();
    for block in root.select(&TEXT_BLOCKS) {
        let name = block.value().name();
        if name != "blockquote" && inside_quote(block, root) {
            continue;
        }
        let text = normalized_text(block);
        if text.is_empty() {
            continue;
        }
        match name {
            "p" => {
                out.push_str(&text);
                out.push_str("\n\n");
            }
            "blockquote" => {
                out.push_str("> ");
                out.push_str(&text);
                out.push_str("\n\n");
            }
            _ => {
                out.push_str("\n\n");
                out.push_str(&text.to_uppercase());
                out.push_str("\n\n");
            }
        }
    }

    let out = collapse_blank_lines(&out);
    strip_truncation_markers(&out).trim().to_string()
}

/// Evaluate [`CONTENT_STRATEGIES`] in order; the first one that matches wins.
pub fn select_content_root(document: &Html) -> Option<(ElementRef<'_>, ContentStrategy)> {
    CONTENT_STRATEGIES.iter().find_map(|strategy| {
        let found = match strategy {
            ContentStrategy::Selector(css) => Selector::parse(css)
                .ok()
                .and_then(|sel| document.select(&sel).next()),
            ContentStrategy::Body => document.select(&BODY).next(),
        };
        found.map(|el| (el, *strategy))
    })
}

fn strip_non_content(document: &mut Html) {
    let ids: Vec<_> = document.select(&NON_CONTENT).map(|el| el.id()).collect();
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// Whether `el` sits inside a `<blockquote>` below `root`; such paragraphs
/// are already rendered as part of the quote.
fn inside_quote(el: ElementRef<'_>, root: ElementRef<'_>) -> bool {
    el.ancestors()
        .take_while(|node| node.id() != root.id())
        .filter_map(ElementRef::wrap)
        .any(|anc| anc.value().name() == "blockquote")
}

fn normalized_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
