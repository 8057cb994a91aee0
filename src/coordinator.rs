//! Drives the scraping phase: one Wikipedia fetch per leader, then the
//! exports.
//!
//! Leaders are processed sequentially. A fetch or parse problem on one page
//! leaves that leader's biography empty and moves on; the run never dies on
//! a single article. Export failures are logged with their specific cause
//! and do not abort the process either.

use scraper::Html;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::error::ScrapeError;
use crate::repository::LeaderRepository;
use crate::scrapers::wikipedia;
use crate::utils::APP_USER_AGENT;

/// Iterates leaders, enriches each with its biography paragraph, and writes
/// the exports.
pub struct ScrapeCoordinator {
    http: reqwest::Client,
}

impl ScrapeCoordinator {
    /// Build the coordinator's own HTTP client; Wikipedia fetches share the
    /// same timeout as the API traffic.
    pub fn new(timeout: Duration) -> Result<Self, ScrapeError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(APP_USER_AGENT)
            .build()?;
        Ok(ScrapeCoordinator { http })
    }

    /// Fetch every leader's Wikipedia page and fill in
    /// `bio_first_paragraph`. Re-running overwrites previous values, so the
    /// operation is idempotent per leader.
    #[instrument(level = "info", skip_all)]
    pub async fn enrich(&self, repository: &mut LeaderRepository) {
        let total = repository.leaders().len();
        let mut enriched = 0usize;

        for leader in repository.leaders_mut() {
            let body = match wikipedia::fetch_article(&self.http, &leader.wikipedia_url).await {
                Ok(body) => body,
                Err(e) => {
                    error!(
                        url = %leader.wikipedia_url,
                        error = %e,
                        "Wikipedia fetch failed; leaving biography empty"
                    );
                    continue;
                }
            };

            let document = Html::parse_document(&body);
            leader.bio_first_paragraph = wikipedia::extract_first_paragraph(&document);
            if leader.bio_first_paragraph.is_empty() {
                warn!(url = %leader.wikipedia_url, "No bold-led paragraph found");
            } else {
                enriched += 1;
                debug!(
                    url = %leader.wikipedia_url,
                    chars = leader.bio_first_paragraph.len(),
                    "Extracted biography paragraph"
                );
            }
        }

        info!(total, enriched, "Biography enrichment complete");
    }

    /// Run the full scraping phase: enrich every leader, then write the JSON
    /// and CSV exports. Export failures are reported, not propagated.
    #[instrument(level = "info", skip_all)]
    pub async fn run(
        &self,
        repository: &mut LeaderRepository,
        json_path: &Path,
        csv_path: &Path,
    ) {
        self.enrich(repository).await;

        if let Err(e) = repository.export_to_json(json_path).await {
            error!(path = %json_path.display(), error = %e, "JSON export failed");
        }
        if let Err(e) = repository.export_to_csv(csv_path) {
            error!(path = %csv_path.display(), error = %e, "CSV export failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Leader, RawLeader};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEST_TIMEOUT: Duration = Duration::from_secs(5);

    fn leader_pointing_at(url: &str) -> Leader {
        Leader::new(
            RawLeader {
                id: "Q1".to_string(),
                first_name: "Test".to_string(),
                last_name: "Leader".to_string(),
                birth_date: "1900-01-01".to_string(),
                death_date: None,
                place_of_birth: "Testville".to_string(),
                wikipedia_url: url.to_string(),
                start_mandate: "1950-01-01".to_string(),
                end_mandate: None,
            },
            "us",
        )
    }

    const ARTICLE: &str = "<html><body><div id=\"mw-content-text\">\
        <p>Hatnote first.</p>\
        <p><b>Test Leader</b> led the tests.[1]</p>\
        </div></body></html>";

    #[tokio::test]
    async fn test_enrich_fills_biography() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wiki/Test"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE))
            .mount(&server)
            .await;

        let url = format!("{}/wiki/Test", server.uri());
        let mut repository = LeaderRepository::with_data(
            vec!["us".to_string()],
            vec![leader_pointing_at(&url)],
        );

        let coordinator = ScrapeCoordinator::new(TEST_TIMEOUT).unwrap();
        coordinator.enrich(&mut repository).await;

        assert_eq!(
            repository.leaders()[0].bio_first_paragraph,
            "Test Leader led the tests."
        );
    }

    #[tokio::test]
    async fn test_enrich_leaves_biography_empty_on_fetch_failure() {
        let mut repository = LeaderRepository::with_data(
            vec!["us".to_string()],
            vec![leader_pointing_at("http://127.0.0.1:9/wiki/Unreachable")],
        );

        let coordinator = ScrapeCoordinator::new(Duration::from_secs(1)).unwrap();
        coordinator.enrich(&mut repository).await;

        assert_eq!(repository.leaders()[0].bio_first_paragraph, "");
    }

    #[tokio::test]
    async fn test_run_writes_both_exports() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wiki/Test"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE))
            .mount(&server)
            .await;

        let url = format!("{}/wiki/Test", server.uri());
        let mut repository = LeaderRepository::with_data(
            vec!["us".to_string()],
            vec![leader_pointing_at(&url)],
        );

        let scratch = tempfile::tempdir().unwrap();
        let json_path = scratch.path().join("leaders.json");
        let csv_path = scratch.path().join("leaders.csv");

        let coordinator = ScrapeCoordinator::new(TEST_TIMEOUT).unwrap();
        coordinator.run(&mut repository, &json_path, &csv_path).await;

        let json_body = std::fs::read_to_string(&json_path).unwrap();
        assert!(json_body.contains("Test Leader led the tests."));
        let csv_body = std::fs::read_to_string(&csv_path).unwrap();
        assert_eq!(csv_body.lines().count(), 2);
    }
}
