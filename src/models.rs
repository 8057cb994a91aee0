//! Data models for leaders and their API wire format.
//!
//! This module defines the two shapes a leader takes on:
//! - [`RawLeader`]: one record exactly as the leaders API returns it
//! - [`Leader`]: the enriched record, tagged with its country and carrying
//!   the biography paragraph filled in by the scraping phase
//!
//! The serde field order on [`Leader`] is load-bearing: it defines both the
//! JSON object layout and the CSV column order of the exports.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The API returns the string `"None"` where a leader has no last name.
const ABSENT_NAME: &str = "None";

/// One leader record as returned by `GET /leaders?country=<code>`.
///
/// Dates are kept as the API's opaque strings; nothing downstream does date
/// arithmetic on them. `death_date` and `end_mandate` are null for leaders
/// who are alive or still in office.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLeader {
    /// Opaque identifier, unique within a country.
    pub id: String,
    pub first_name: String,
    /// May carry the sentinel string `"None"` meaning "absent".
    pub last_name: String,
    pub birth_date: String,
    pub death_date: Option<String>,
    pub place_of_birth: String,
    /// Absolute URL of the leader's Wikipedia article.
    pub wikipedia_url: String,
    pub start_mandate: String,
    pub end_mandate: Option<String>,
}

/// A leader tagged with its country, plus the scraped biography excerpt.
///
/// Everything except `bio_first_paragraph` is fixed at construction; the
/// biography starts empty and is assigned exactly once when the Wikipedia
/// scraping phase runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leader {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
    pub death_date: Option<String>,
    pub place_of_birth: String,
    pub wikipedia_url: String,
    pub start_mandate: String,
    pub end_mandate: Option<String>,
    /// ISO-style country code this leader was fetched under.
    pub country: String,
    /// First biographical paragraph from Wikipedia; empty until scraped.
    #[serde(default)]
    pub bio_first_paragraph: String,
}

impl Leader {
    /// Build a [`Leader`] from a raw API record and the country it was
    /// queried under.
    pub fn new(raw: RawLeader, country: &str) -> Self {
        Leader {
            id: raw.id,
            first_name: raw.first_name,
            last_name: raw.last_name,
            birth_date: raw.birth_date,
            death_date: raw.death_date,
            place_of_birth: raw.place_of_birth,
            wikipedia_url: raw.wikipedia_url,
            start_mandate: raw.start_mandate,
            end_mandate: raw.end_mandate,
            country: country.to_string(),
            bio_first_paragraph: String::new(),
        }
    }
}

impl fmt::Display for Leader {
    /// One-line summary: `"Jacques Chirac president of FR from 1995-05-17 to
    /// 2007-05-16"`. An absent last name is elided; an ongoing mandate
    /// renders as today's date.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last_name = if self.last_name == ABSENT_NAME {
            ""
        } else {
            self.last_name.as_str()
        };
        let end = match &self.end_mandate {
            Some(end) => end.clone(),
            None => Local::now().date_naive().to_string(),
        };
        write!(
            f,
            "{} {} president of {} from {} to {}",
            self.first_name,
            last_name,
            self.country.to_uppercase(),
            self.start_mandate,
            end
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_raw() -> RawLeader {
        RawLeader {
            id: "Q329-fr-3".to_string(),
            first_name: "Jacques".to_string(),
            last_name: "Chirac".to_string(),
            birth_date: "1932-11-29".to_string(),
            death_date: Some("2019-09-26".to_string()),
            place_of_birth: "Paris".to_string(),
            wikipedia_url: "https://fr.wikipedia.org/wiki/Jacques_Chirac".to_string(),
            start_mandate: "1995-05-17".to_string(),
            end_mandate: Some("2007-05-16".to_string()),
        }
    }

    #[test]
    fn test_leader_preserves_raw_fields() {
        let raw = sample_raw();
        let leader = Leader::new(raw.clone(), "fr");

        assert_eq!(leader.id, raw.id);
        assert_eq!(leader.first_name, raw.first_name);
        assert_eq!(leader.last_name, raw.last_name);
        assert_eq!(leader.birth_date, raw.birth_date);
        assert_eq!(leader.death_date, raw.death_date);
        assert_eq!(leader.place_of_birth, raw.place_of_birth);
        assert_eq!(leader.wikipedia_url, raw.wikipedia_url);
        assert_eq!(leader.start_mandate, raw.start_mandate);
        assert_eq!(leader.end_mandate, raw.end_mandate);
        assert_eq!(leader.country, "fr");
        assert_eq!(leader.bio_first_paragraph, "");
    }

    #[test]
    fn test_raw_leader_deserializes_nulls() {
        let json = r#"{
            "id": "Q1",
            "first_name": "Ada",
            "last_name": "None",
            "birth_date": "1815-12-10",
            "death_date": null,
            "place_of_birth": "London",
            "wikipedia_url": "https://en.wikipedia.org/wiki/Ada_Lovelace",
            "start_mandate": "2000-01-01",
            "end_mandate": null
        }"#;

        let raw: RawLeader = serde_json::from_str(json).unwrap();
        assert_eq!(raw.death_date, None);
        assert_eq!(raw.end_mandate, None);
        assert_eq!(raw.last_name, "None");
    }

    #[test]
    fn test_leader_serialization_round_trip() {
        let mut leader = Leader::new(sample_raw(), "fr");
        leader.bio_first_paragraph = "Jacques Chirac was a French politician.".to_string();

        let json = serde_json::to_string(&leader).unwrap();
        let back: Leader = serde_json::from_str(&json).unwrap();
        assert_eq!(back, leader);
    }

    #[test]
    fn test_serialization_field_order() {
        let leader = Leader::new(sample_raw(), "fr");
        let value = serde_json::to_value(&leader).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "id",
                "first_name",
                "last_name",
                "birth_date",
                "death_date",
                "place_of_birth",
                "wikipedia_url",
                "start_mandate",
                "end_mandate",
                "country",
                "bio_first_paragraph",
            ]
        );
    }

    #[test]
    fn test_display_elides_absent_last_name() {
        let mut raw = sample_raw();
        raw.last_name = "None".to_string();
        let leader = Leader::new(raw, "fr");
        let line = leader.to_string();
        assert!(line.starts_with("Jacques  president of FR"));
        assert!(!line.contains("None"));
    }

    #[test]
    fn test_display_ongoing_mandate_uses_today() {
        let mut raw = sample_raw();
        raw.end_mandate = None;
        let leader = Leader::new(raw, "fr");
        let today = Local::now().date_naive().to_string();
        assert!(leader.to_string().ends_with(&today));
    }
}
