//! Plain-text clean-up applied between extraction and summarization.
//!
//! - [`clean_snippet`]: normalizes a short API snippet used as fallback content
//! - [`strip_boilerplate`]: removes newsletter, subscribe, "read more" and
//!   similar phrases before chunking
//! - [`strip_truncation_markers`] / [`collapse_blank_lines`]: shared
//!   post-processing for extracted page text

use once_cell::sync::Lazy;
use regex::Regex;

/// NewsAPI-style truncation marker, e.g. `[+1234 chars]`.
static TRUNCATION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\+[0-9,]+\s*chars?\]").expect("static regex"));

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("static regex"));

static BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("static regex"));

/// Case-insensitive boilerplate phrases. `.*` stops at the end of a line.
const BOILERPLATE_PATTERNS: &[&str] = &[
    r"Sign up for.*newsletters?",
    r"Subscribe to.*(?:channel|newsletters?)",
    r"Follow us on.*",
    r"Download our.*app",
    r"Read more:.*",
    r"Continue reading.*",
    r"Advertisement",
    r"Recommended for you",
    r"Related:.*",
    r"Please enter your email",
    r"Already have an account\? Log in",
    r"Create a free account",
    r"© Copyright.*",
];

static BOILERPLATE: Lazy<Vec<Regex>> = Lazy::new(|| {
    BOILERPLATE_PATTERNS
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")).expect("static regex"))
        .collect()
});

/// Remove `[+N chars]` truncation markers.
pub fn strip_truncation_markers(text: &str) -> String {
    TRUNCATION_MARKER.replace_all(text, "").into_owned()
}

/// Collapse three or more consecutive newlines into a single blank line.
pub fn collapse_blank_lines(text: &str) -> String {
    BLANK_RUN.replace_all(text, "\n\n").into_owned()
}

/// Clean an API-provided snippet: drop truncation markers and HTML tags.
pub fn clean_snippet(snippet: &str) -> String {
    let text = strip_truncation_markers(snippet);
    HTML_TAG.replace_all(&text, "").trim().to_string()
}

/// Strip boilerplate phrases so they never reach the model.
pub fn strip_boilerplate(text: &str) -> String {
    let mut out = text.to_string();
    for re in BOILERPLATE.iter() {
        if re.is_match(&out) {
            out = re.replace_all(&out, "").into_owned();
        }
    }
    out.trim().to_string()
}
