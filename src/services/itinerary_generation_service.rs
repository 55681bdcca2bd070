//! Deterministic itinerary skeletons.
//!
//! No external calls and no persistence: the caller decides whether to save
//! the result by posting it back as a regular itinerary.

use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFAULT_DESTINATION: &str = "Your Destination";
const DEFAULT_DURATION: u32 = 3;
const DEFAULT_BUDGET_RANGE: &str = "moderate";
const MAX_DURATION: u32 = 365;
const ACTIVITY_TIME: &str = "09:00";
const ACTIVITY_NOTES: &str = "Auto-generated activity based on your interests.";

/// Loosely-typed generator input. Anything missing or malformed is defaulted.
#[derive(Debug, Default, Deserialize)]
pub struct GenerationRequest {
    #[serde(default)]
    pub destination: Option<Value>,
    #[serde(default)]
    pub duration: Option<Value>,
    #[serde(default)]
    pub budget_range: Option<Value>,
    #[serde(default)]
    pub interests: Option<Value>,
}

impl GenerationRequest {
    /// Parse a raw body; an empty or malformed body behaves like `{}`.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value @ Value::Object(_)) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlannedActivity {
    pub time: String,
    pub activity: String,
    pub location: String,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DayPlan {
    pub title: String,
    pub description: String,
    pub activities: Vec<PlannedActivity>,
    pub meals: Vec<Value>,
    pub tips: Vec<Value>,
}

/// Same shape as a stored itinerary, minus identity and timestamps.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedItinerary {
    pub title: String,
    pub destination: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub days_count: u32,
    pub budget_range: String,
    pub interests: Vec<Value>,
    pub days_plan: Vec<DayPlan>,
    pub ai_generated: bool,
}

#[derive(Debug, Serialize)]
pub struct GeneratedEnvelope {
    pub itinerary: GeneratedItinerary,
}

fn text_or(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => default.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Numbers truncate toward zero; strings must hold an integer.
fn duration_from(value: Option<&Value>) -> u32 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64().map(f64::trunc),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok().map(|n| n as f64),
        _ => None,
    };
    match parsed {
        Some(n) if n >= 1.0 => n.min(f64::from(MAX_DURATION)) as u32,
        _ => DEFAULT_DURATION,
    }
}

fn day_plan(day: u32, destination: &str) -> DayPlan {
    DayPlan {
        title: format!("Day {} in {}", day, destination),
        description: format!("Day {} of your trip in {}.", day, destination),
        activities: vec![PlannedActivity {
            time: ACTIVITY_TIME.to_string(),
            activity: format!("Explore {} - Day {}", destination, day),
            location: destination.to_string(),
            notes: ACTIVITY_NOTES.to_string(),
        }],
        meals: Vec::new(),
        tips: Vec::new(),
    }
}

pub fn generate_itinerary(request: &GenerationRequest) -> GeneratedItinerary {
    let destination = text_or(request.destination.as_ref(), DEFAULT_DESTINATION);
    let duration = duration_from(request.duration.as_ref());
    let budget_range = text_or(request.budget_range.as_ref(), DEFAULT_BUDGET_RANGE);
    let interests = match &request.interests {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    };

    let days_plan = (1..=duration).map(|day| day_plan(day, &destination)).collect();

    GeneratedItinerary {
        title: format!("{}-Day Trip to {}", duration, destination),
        destination,
        start_date: None,
        end_date: None,
        days_count: duration,
        budget_range,
        interests,
        days_plan,
        ai_generated: true,
    }
}
