//! Leaders API session client with cookie refresh and bounded retry logic.
//!
//! The leaders API guards its data endpoints behind a short-lived session
//! cookie. This module owns that protocol:
//! - [`SessionClient::check_status`]: liveness probe against `/status/`
//! - [`SessionClient::refresh_cookie`]: acquire a fresh cookie from `/cookie`,
//!   retrying transient transport failures with exponential backoff
//! - [`SessionClient::fetch_countries`] / [`SessionClient::fetch_leaders`]:
//!   authenticated GETs that refresh the cookie and retry in place when the
//!   API answers 401/403
//!
//! # Retry Strategy
//!
//! Auth rejections are retried immediately after a cookie refresh, under a
//! hard cap of 5 attempts per operation; retries re-issue only the rejected
//! request, so leaders collected before the rejection are never duplicated.
//! Transport failures during cookie acquisition back off exponentially:
//!
//! ```text
//! delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
//! ```
//!
//! Every other failure (transport, decode, unexpected status) is logged and
//! the operation degrades to whatever data was already accumulated.

use rand::{Rng, rng};
use reqwest::{StatusCode, header};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::error::ScrapeError;
use crate::models::{Leader, RawLeader};
use crate::utils::{APP_USER_AGENT, truncate_for_log};

const STATUS_ENDPOINT: &str = "/status/";
const COOKIE_ENDPOINT: &str = "/cookie";
const COUNTRIES_ENDPOINT: &str = "/countries/";
const LEADERS_ENDPOINT: &str = "/leaders";

/// Auth-rejection budget per fetch operation.
const MAX_AUTH_ATTEMPTS: usize = 5;
/// Transport-failure budget for one cookie acquisition.
const MAX_COOKIE_ATTEMPTS: usize = 5;

/// One HTTP session against the leaders API.
///
/// Holds the current cookie value; every authenticated request reads it and
/// only [`refresh_cookie`](SessionClient::refresh_cookie) writes it.
#[derive(Debug)]
pub struct SessionClient {
    http: reqwest::Client,
    root_url: String,
    cookie: Option<String>,
    cookie_max_attempts: usize,
    cookie_base_delay: Duration,
    cookie_max_delay: Duration,
}

impl SessionClient {
    /// Create a session client for the API at `root_url`.
    ///
    /// The URL is validated up front; a trailing slash is tolerated. The
    /// timeout applies to every request this client issues.
    pub fn new(root_url: &str, timeout: Duration) -> Result<Self, ScrapeError> {
        Url::parse(root_url)?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(APP_USER_AGENT)
            .build()?;

        Ok(SessionClient {
            http,
            root_url: root_url.trim_end_matches('/').to_string(),
            cookie: None,
            cookie_max_attempts: MAX_COOKIE_ATTEMPTS,
            cookie_base_delay: Duration::from_secs(1),
            cookie_max_delay: Duration::from_secs(30),
        })
    }

    /// Override the cookie-acquisition retry schedule. Tests use millisecond
    /// delays here; the defaults (5 attempts, 1s base, 30s cap) suit the
    /// real API.
    pub fn with_cookie_backoff(
        mut self,
        max_attempts: usize,
        base_delay: Duration,
        max_delay: Duration,
    ) -> Self {
        self.cookie_max_attempts = max_attempts.max(1);
        self.cookie_base_delay = base_delay;
        self.cookie_max_delay = max_delay;
        self
    }

    /// Probe `/status/`; true iff the API answered 200.
    ///
    /// Transport failures are logged and reported as `false`; callers treat
    /// an unreachable API the same as an unhealthy one.
    #[instrument(level = "info", skip_all)]
    pub async fn check_status(&self) -> bool {
        let url = format!("{}{}", self.root_url, STATUS_ENDPOINT);
        match self.http.get(&url).send().await {
            Ok(resp) => {
                let healthy = resp.status() == StatusCode::OK;
                debug!(status = %resp.status(), healthy, "Status probe answered");
                healthy
            }
            Err(e) => {
                warn!(error = %e, "Status probe failed");
                false
            }
        }
    }

    /// Acquire a fresh session cookie from `/cookie`, storing and returning
    /// its value.
    ///
    /// Transport failures back off exponentially with jitter; once the
    /// attempt budget is spent the last error is surfaced to the caller. A
    /// response without a `Set-Cookie` header fails immediately.
    #[instrument(level = "info", skip_all)]
    pub async fn refresh_cookie(&mut self) -> Result<String, ScrapeError> {
        let url = format!("{}{}", self.root_url, COOKIE_ENDPOINT);
        let mut attempt = 0usize;

        loop {
            match self.http.get(&url).send().await {
                Ok(resp) => {
                    let cookie = cookie_from_response(&resp)?;
                    info!("Acquired session cookie");
                    self.cookie = Some(cookie.clone());
                    return Ok(cookie);
                }
                Err(e) => {
                    attempt += 1;
                    if attempt >= self.cookie_max_attempts {
                        error!(
                            attempt,
                            max = self.cookie_max_attempts,
                            error = %e,
                            "Cookie acquisition exhausted retries"
                        );
                        return Err(e.into());
                    }

                    let delay = self.backoff_delay(attempt);
                    warn!(
                        attempt,
                        max = self.cookie_max_attempts,
                        ?delay,
                        error = %e,
                        "Cookie acquisition failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }

    /// Fetch the list of country codes the API knows about.
    ///
    /// Returns empty when the API is down, the cookie cannot be acquired, or
    /// the request keeps being rejected; partial failure never propagates as
    /// an error.
    #[instrument(level = "info", skip_all)]
    pub async fn fetch_countries(&mut self) -> Vec<String> {
        if !self.check_status().await {
            warn!("API is not healthy; skipping country fetch");
            return Vec::new();
        }
        if let Err(e) = self.refresh_cookie().await {
            error!(error = %e, "Could not obtain a session cookie");
            return Vec::new();
        }

        let url = format!("{}{}", self.root_url, COUNTRIES_ENDPOINT);
        for attempt in 1..=MAX_AUTH_ATTEMPTS {
            match self.get_json::<Vec<String>>(&url, &[]).await {
                Ok(countries) => {
                    info!(count = countries.len(), "Fetched country list");
                    return countries;
                }
                Err(ScrapeError::AuthExpired { status }) => {
                    warn!(
                        attempt,
                        max = MAX_AUTH_ATTEMPTS,
                        status,
                        "Session cookie rejected while fetching countries"
                    );
                    if attempt == MAX_AUTH_ATTEMPTS {
                        break;
                    }
                    if let Err(e) = self.refresh_cookie().await {
                        error!(error = %e, "Cookie refresh failed; abandoning country fetch");
                        return Vec::new();
                    }
                }
                Err(e) => {
                    error!(error = %e, "Country fetch failed");
                    return Vec::new();
                }
            }
        }

        warn!(
            attempts = MAX_AUTH_ATTEMPTS,
            "Gave up fetching countries after repeated auth rejections"
        );
        Vec::new()
    }

    /// Fetch every leader for every country in `countries`.
    ///
    /// Countries are queried sequentially. An auth rejection refreshes the
    /// cookie and re-requests the same country, so leaders already collected
    /// are never duplicated; once the auth budget is spent the remaining
    /// countries are abandoned and the accumulated list is returned. Any
    /// other per-country failure is logged and that country is skipped.
    #[instrument(level = "info", skip_all, fields(countries = countries.len()))]
    pub async fn fetch_leaders(&mut self, countries: &[String]) -> Vec<Leader> {
        if !self.check_status().await {
            warn!("API is not healthy; skipping leader fetch");
            return Vec::new();
        }

        let url = format!("{}{}", self.root_url, LEADERS_ENDPOINT);
        let mut leaders: Vec<Leader> = Vec::new();
        let mut auth_attempts = 0usize;
        let mut idx = 0usize;

        while idx < countries.len() {
            let country = &countries[idx];
            match self
                .get_json::<Vec<RawLeader>>(&url, &[("country", country.as_str())])
                .await
            {
                Ok(raw) => {
                    info!(%country, count = raw.len(), "Fetched leaders for country");
                    leaders.extend(raw.into_iter().map(|r| Leader::new(r, country)));
                    idx += 1;
                }
                Err(ScrapeError::AuthExpired { status }) => {
                    auth_attempts += 1;
                    warn!(
                        %country,
                        attempt = auth_attempts,
                        max = MAX_AUTH_ATTEMPTS,
                        status,
                        "Session cookie rejected while fetching leaders"
                    );
                    if auth_attempts >= MAX_AUTH_ATTEMPTS {
                        warn!(
                            collected = leaders.len(),
                            "Auth budget spent; abandoning remaining countries"
                        );
                        break;
                    }
                    if let Err(e) = self.refresh_cookie().await {
                        error!(
                            error = %e,
                            collected = leaders.len(),
                            "Cookie refresh failed; abandoning remaining countries"
                        );
                        break;
                    }
                    // retry the same country with the fresh cookie
                }
                Err(e) => {
                    error!(%country, error = %e, "Leader fetch failed; skipping country");
                    idx += 1;
                }
            }
        }

        leaders
    }

    /// Authenticated GET returning the decoded JSON body.
    ///
    /// 401/403 map to [`ScrapeError::AuthExpired`] so callers can refresh and
    /// retry; other non-2xx statuses and undecodable bodies are terminal for
    /// the request.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ScrapeError> {
        let mut request = self.http.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie.as_str());
        }

        let resp = request.send().await?;
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ScrapeError::AuthExpired {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(ScrapeError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        match serde_json::from_str::<T>(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(
                    response_preview = %truncate_for_log(&body, 300),
                    "Response body was not the expected JSON"
                );
                Err(e.into())
            }
        }
    }

    fn backoff_delay(&self, attempt: usize) -> Duration {
        let mut delay = self.cookie_base_delay.saturating_mul(1 << (attempt - 1));
        if delay > self.cookie_max_delay {
            delay = self.cookie_max_delay;
        }
        let jitter_ms: u64 = rng().random_range(0..=250);
        delay + Duration::from_millis(jitter_ms)
    }
}

/// Extract the cookie pairs from a response's `Set-Cookie` headers,
/// dropping attributes like `Path` and `HttpOnly`.
fn cookie_from_response(resp: &reqwest::Response) -> Result<String, ScrapeError> {
    let mut pairs: Vec<String> = Vec::new();
    for value in resp.headers().get_all(header::SET_COOKIE) {
        if let Ok(raw) = value.to_str() {
            if let Some(pair) = raw.split(';').next() {
                let pair = pair.trim();
                if !pair.is_empty() {
                    pairs.push(pair.to_string());
                }
            }
        }
    }
    if pairs.is_empty() {
        return Err(ScrapeError::MissingCookie);
    }
    Ok(pairs.join("; "))
}
