use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_TITLE: &str = "Untitled Trip";

/// Stored itinerary record. Always owned by exactly one user.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Itinerary {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub title: String,
    pub destination: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub days_count: u32,
    pub budget_range: String,
    pub interests: Vec<String>,
    pub days_plan: Vec<Value>,
    pub ai_generated: bool,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Incoming itinerary fields for both create and partial update.
///
/// The double options distinguish "absent" from an explicit `null`, which
/// matters for partial updates where `null` clears or resets a field. Dates and
/// lists stay loosely typed so any falsy value can reset them.
#[derive(Debug, Default, Deserialize)]
pub struct ItineraryPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub budget_range: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub start_date: Option<Option<Value>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub end_date: Option<Option<Value>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub days_count: Option<Option<Value>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub interests: Option<Option<Value>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub days_plan: Option<Option<Value>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub ai_generated: Option<Option<Value>>,
}

#[derive(Debug, Serialize)]
pub struct ItineraryView {
    pub id: String,
    pub title: String,
    pub destination: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub days_count: u32,
    pub budget_range: String,
    pub interests: Vec<String>,
    pub days_plan: Vec<Value>,
    pub ai_generated: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Itinerary> for ItineraryView {
    fn from(itinerary: Itinerary) -> Self {
        Self {
            id: itinerary.id.to_hex(),
            title: itinerary.title,
            destination: itinerary.destination,
            start_date: itinerary.start_date.map(|d| d.to_string()),
            end_date: itinerary.end_date.map(|d| d.to_string()),
            days_count: itinerary.days_count,
            budget_range: itinerary.budget_range,
            interests: itinerary.interests,
            days_plan: itinerary.days_plan,
            ai_generated: itinerary.ai_generated,
            created_at: itinerary
                .created_at
                .to_rfc3339_opts(SecondsFormat::Millis, false),
            updated_at: itinerary
                .updated_at
                .to_rfc3339_opts(SecondsFormat::Millis, false),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ItineraryEnvelope {
    pub itinerary: ItineraryView,
}

#[derive(Debug, Serialize)]
pub struct ItineraryList {
    pub itineraries: Vec<ItineraryView>,
}
