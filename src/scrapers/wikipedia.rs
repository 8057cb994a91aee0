//! Wikipedia article scraper.
//!
//! Wikipedia keeps the whole article body inside `div#mw-content-text`, and
//! the lead paragraph of a biography opens with the subject's name in bold.
//! That gives a cheap heuristic for "the first biographical paragraph": the
//! first `<p>` inside the content container that has a `<b>` descendant.
//!
//! # Cleaning
//!
//! Quote characters are stripped from the raw paragraph text first, then the
//! selected text is cleaned in order: literal `\n` two-character sequences
//! are removed, bracketed reference markers like `[3]` are removed, and
//! non-breaking spaces become ordinary spaces. Note that a real newline
//! character is NOT removed, only the backslash-n spelling of one.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, instrument};

use crate::error::ScrapeError;

static CONTENT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div#mw-content-text").unwrap());
static PARAGRAPH_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());
static BOLD_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("b").unwrap());

/// Matches the two-character sequence backslash-n, not a newline.
static LITERAL_NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\n").unwrap());
/// Bracketed numeric reference markers, e.g. `[12]`.
static REFERENCE_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\d+\]").unwrap());

/// Fetch the raw HTML of a Wikipedia article. No authentication, no retry;
/// a failure here is the caller's signal to leave the biography empty.
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn fetch_article(http: &reqwest::Client, url: &str) -> Result<String, ScrapeError> {
    let body = http.get(url).send().await?.text().await?;
    debug!(bytes = body.len(), "Fetched Wikipedia article");
    Ok(body)
}

/// Extract the first bold-led paragraph of a parsed Wikipedia article.
///
/// Returns the cleaned paragraph text, or the empty string when the page has
/// no content container or no bold-led paragraph. Absence is a signal, not
/// an error.
pub fn extract_first_paragraph(document: &Html) -> String {
    let Some(content) = document.select(&CONTENT_SELECTOR).next() else {
        return String::new();
    };

    for paragraph in content.select(&PARAGRAPH_SELECTOR) {
        if paragraph.select(&BOLD_SELECTOR).next().is_none() {
            continue;
        }
        let text: String = paragraph.text().collect();
        let unquoted = text.replace(['\'', '"'], "");
        return clean_paragraph(&unquoted);
    }

    String::new()
}

/// Apply the cleaning steps to a paragraph: drop literal `\n` sequences,
/// drop `[N]` reference markers, replace non-breaking spaces with spaces.
pub fn clean_paragraph(text: &str) -> String {
    let stripped = LITERAL_NEWLINE.replace_all(text, "");
    let stripped = REFERENCE_MARKER.replace_all(&stripped, "");
    stripped.replace('\u{a0}', " ")
}
