use crate::core::distance::Coordinates;
use crate::models::de::{self, take_field};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use validator::Validate;

/// Student profile with study preferences and optional location
///
/// Only `group_size`, `comfort_level`, `space_prefs` and the coordinates
/// take part in scoring. Every other key is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", try_from = "Map<String, Value>")]
pub struct UserProfile {
    #[validate(email)]
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comfort_level: Option<String>,
    pub space_prefs: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Descriptive fields (major, bio, subjects, ...) kept as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Read a profile from a JSON object
///
/// Only a missing or non-string `email` rejects the document. Legacy
/// snake_case keys are read when the camelCase key is absent or invalid.
impl TryFrom<Map<String, Value>> for UserProfile {
    type Error = String;

    fn try_from(mut map: Map<String, Value>) -> Result<Self, Self::Error> {
        let email = match map.remove("email") {
            Some(Value::String(email)) => email,
            Some(_) => return Err("field `email` must be a string".to_string()),
            None => return Err("missing field `email`".to_string()),
        };

        Ok(Self {
            email,
            name: take_field(&mut map, &["name"], de::token),
            group_size: take_field(&mut map, &["groupSize", "desired_group_size"], de::token),
            comfort_level: take_field(&mut map, &["comfortLevel", "comfort_level"], de::token),
            space_prefs: take_field(&mut map, &["spacePrefs", "study_space_prefs"], de::tag_set)
                .unwrap_or_default(),
            latitude: take_field(&mut map, &["latitude", "lat"], de::coordinate),
            longitude: take_field(&mut map, &["longitude", "lng"], de::coordinate),
            created_at: take_field(&mut map, &["createdAt", "created_at"], de::timestamp),
            updated_at: take_field(&mut map, &["updatedAt", "updated_at"], de::timestamp),
            extra: map,
        })
    }
}

impl UserProfile {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    /// Normalized identity used for lookups and equality
    pub fn email_key(&self) -> String {
        normalize_email(&self.email)
    }

    /// Coordinates when both components are present and valid
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.latitude, self.longitude)
    }

    /// Same identity, ignoring case and surrounding whitespace
    pub fn is_same_user(&self, email: &str) -> bool {
        self.email_key() == normalize_email(email)
    }
}

/// Trim and lower-case an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Study-match request between two students
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    pub id: uuid::Uuid,
    pub from: String,
    pub to: String,
    pub status: MatchRequestStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchRequestStatus {
    Pending,
    Accepted,
}

/// A study spot from the campus catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySpot {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub lat: f64,
    pub lng: f64,
}

impl StudySpot {
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::new(self.lat, self.lng)
    }
}

/// Spot suggested by the recommender
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub spot: String,
    pub reason: String,
}

/// Per-signal compatibility amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub group_size: u32,
    pub comfort_level: u32,
    pub space_pref: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            group_size: 2,
            comfort_level: 2,
            space_pref: 1,
        }
    }
}

/// How a compatibility score was assembled
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub group_size: u32,
    pub comfort_level: u32,
    pub space_prefs: u32,
    pub shared_space_prefs: Vec<String>,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.group_size
            .saturating_add(self.comfort_level)
            .saturating_add(self.space_prefs)
    }
}

/// One ranked candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate<'a> {
    pub candidate: &'a UserProfile,
    pub score: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    pub breakdown: ScoreBreakdown,
}
