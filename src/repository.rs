//! In-memory store of the fetched countries and leaders, plus the export
//! operations over them.
//!
//! [`LeaderRepository::populate`] drives the [`SessionClient`] through both
//! fetches; the repository then owns the data for the rest of the run. The
//! JSON export groups leaders per country in the order the countries
//! endpoint returned them (serde_json is built with `preserve_order`, so the
//! file keeps that order too).

use serde_json::{Map, Value};
use std::path::Path;
use tracing::{info, instrument};

use crate::api::SessionClient;
use crate::error::ExportError;
use crate::models::Leader;
use crate::outputs;

/// Owns the country and leader lists once fetched.
#[derive(Debug, Default)]
pub struct LeaderRepository {
    countries: Vec<String>,
    leaders: Vec<Leader>,
}

impl LeaderRepository {
    pub fn new() -> Self {
        LeaderRepository::default()
    }

    /// Fetch the country list, then every country's leaders.
    ///
    /// Both fetches degrade to empty on failure, so a populated repository
    /// may legitimately hold partial or no data; callers decide what that
    /// means for them.
    #[instrument(level = "info", skip_all)]
    pub async fn populate(&mut self, session: &mut SessionClient) {
        self.countries = session.fetch_countries().await;
        self.leaders = session.fetch_leaders(&self.countries).await;
        info!(
            countries = self.countries.len(),
            leaders = self.leaders.len(),
            "Repository populated"
        );
    }

    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    pub fn leaders(&self) -> &[Leader] {
        &self.leaders
    }

    /// Mutable view for the scraping phase, which fills in biographies.
    pub fn leaders_mut(&mut self) -> &mut [Leader] {
        &mut self.leaders
    }

    /// Group the leaders per country, preserving country order.
    ///
    /// Every country from the country list gets a key, even with zero
    /// leaders; a leader whose country is somehow absent from the list still
    /// gets its own entry rather than being dropped.
    pub fn leaders_per_country(&self) -> Result<Map<String, Value>, ExportError> {
        let mut map = Map::new();
        for country in &self.countries {
            map.insert(country.clone(), Value::Array(Vec::new()));
        }
        for leader in &self.leaders {
            let record = serde_json::to_value(leader)?;
            if let Value::Array(records) = map
                .entry(leader.country.clone())
                .or_insert_with(|| Value::Array(Vec::new()))
            {
                records.push(record);
            }
        }
        Ok(map)
    }

    /// Serialize the country→leaders mapping to a JSON file.
    pub async fn export_to_json(&self, path: &Path) -> Result<(), ExportError> {
        let map = self.leaders_per_country()?;
        outputs::json::write_leaders_per_country(&map, path).await
    }

    /// Serialize the leader list to a CSV file.
    ///
    /// An empty leader list has no header row to derive, so it is a defined
    /// error instead of a panic.
    pub fn export_to_csv(&self, path: &Path) -> Result<(), ExportError> {
        if self.leaders.is_empty() {
            return Err(ExportError::NoLeaders);
        }
        outputs::csv::write_leader_rows(&self.leaders, path)
    }

    #[cfg(test)]
    pub(crate) fn with_data(countries: Vec<String>, leaders: Vec<Leader>) -> Self {
        LeaderRepository { countries, leaders }
    }
}
