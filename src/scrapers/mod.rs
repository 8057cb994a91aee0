//! Scraper modules for external HTML sources.
//!
//! Only one source exists today: Wikipedia, which supplies the biography
//! excerpt for each leader. The module exports:
//! - `fetch_article(client, url)`: download an article's raw HTML
//! - `extract_first_paragraph(&Html)`: isolate the bold-led lead paragraph
//!
//! Fetch failures are logged and skipped by callers; a page without a
//! qualifying paragraph yields an empty biography rather than an error.

pub mod wikipedia;
