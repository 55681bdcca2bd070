use chrono::{DateTime, Duration, NaiveDate, Utc};
use mongodb::bson::oid::ObjectId;
use serde_json::Value;

use crate::{
    error::ApiError,
    models::itinerary::{Itinerary, ItineraryPayload, DEFAULT_TITLE},
};

/// JSON truthiness: `false`, `null`, `0`, `""`, `[]` and `{}` are falsy.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Falsy values become 1; positive integers (or numeric strings) pass through.
pub fn coerce_days_count(value: Option<&Value>) -> Result<u32, ApiError> {
    let value = match value {
        Some(v) if truthy(v) => v,
        _ => return Ok(1),
    };

    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        Value::Bool(true) => Some(1),
        _ => None,
    };

    parsed
        .filter(|n| *n > 0)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| ApiError::validation("days_count must be a positive integer."))
}

/// Lenient ISO date parse. Blank or unparsable input yields `None`.
pub fn parse_date(field: &str, value: Option<&str>) -> Option<NaiveDate> {
    let raw = value.map(str::trim).filter(|s| !s.is_empty())?;
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(err) => {
            log::warn!("Ignoring unparsable {} {:?}: {}", field, raw, err);
            None
        }
    }
}

/// `start + (days - 1)` days.
pub fn derive_end_date(start: NaiveDate, days_count: u32) -> Option<NaiveDate> {
    start.checked_add_signed(Duration::days(i64::from(days_count) - 1))
}

/// A falsy value clears the date; a string is parsed leniently.
fn date_from(field: &str, value: Option<&Value>) -> Option<NaiveDate> {
    match value {
        Some(Value::String(raw)) => parse_date(field, Some(raw)),
        Some(other) if truthy(other) => {
            log::warn!("Ignoring non-string {} {}", field, other);
            None
        }
        _ => None,
    }
}

/// Whether a date field carries anything beyond a falsy or blank value.
fn date_supplied(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(raw)) => !raw.trim().is_empty(),
        Some(other) => truthy(other),
        None => false,
    }
}

/// Falsy values become an empty list. Anything else must already be a list.
fn list_from(field: &str, value: Option<&Value>) -> Result<Vec<Value>, ApiError> {
    match value {
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(other) if truthy(other) => {
            Err(ApiError::validation(format!("{} must be a list.", field)))
        }
        _ => Ok(Vec::new()),
    }
}

fn interests_from(value: Option<&Value>) -> Result<Vec<String>, ApiError> {
    Ok(list_from("interests", value)?
        .into_iter()
        .map(|item| match item {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .collect())
}

/// Build a new itinerary for `owner`, applying create-time defaults.
pub fn new_itinerary(
    owner: ObjectId,
    payload: ItineraryPayload,
    now: DateTime<Utc>,
) -> Result<Itinerary, ApiError> {
    let title = payload.title.as_deref().map(str::trim).unwrap_or_default();
    let title = if title.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        title.to_string()
    };

    let days_count = coerce_days_count(payload.days_count.as_ref().and_then(Option::as_ref))?;

    let interests = interests_from(payload.interests.as_ref().and_then(Option::as_ref))?;
    let days_plan = list_from("days_plan", payload.days_plan.as_ref().and_then(Option::as_ref))?;

    let start_date = date_from("start_date", payload.start_date.as_ref().and_then(Option::as_ref));
    let end_value = payload.end_date.as_ref().and_then(Option::as_ref);
    let end_date = if date_supplied(end_value) {
        date_from("end_date", end_value)
    } else {
        start_date.and_then(|start| derive_end_date(start, days_count))
    };

    Ok(Itinerary {
        id: ObjectId::new(),
        user_id: owner,
        title,
        destination: payload
            .destination
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
        start_date,
        end_date,
        days_count,
        budget_range: payload.budget_range.unwrap_or_default(),
        interests,
        days_plan,
        ai_generated: payload.ai_generated.flatten().as_ref().map_or(false, truthy),
        created_at: now,
        updated_at: now,
    })
}

/// Partial update: only fields present in the payload change.
pub fn apply_update(
    itinerary: &mut Itinerary,
    payload: ItineraryPayload,
    now: DateTime<Utc>,
) -> Result<(), ApiError> {
    // Validate first so a rejected payload leaves the record untouched.
    let days_count = match &payload.days_count {
        Some(value) => Some(coerce_days_count(value.as_ref())?),
        None => None,
    };
    let interests = match &payload.interests {
        Some(value) => Some(interests_from(value.as_ref())?),
        None => None,
    };
    let days_plan = match &payload.days_plan {
        Some(value) => Some(list_from("days_plan", value.as_ref())?),
        None => None,
    };

    if let Some(title) = payload.title {
        itinerary.title = title;
    }
    if let Some(destination) = payload.destination {
        itinerary.destination = destination;
    }
    if let Some(budget_range) = payload.budget_range {
        itinerary.budget_range = budget_range;
    }
    if let Some(start_date) = payload.start_date {
        itinerary.start_date = date_from("start_date", start_date.as_ref());
    }
    if let Some(end_date) = payload.end_date {
        itinerary.end_date = date_from("end_date", end_date.as_ref());
    }
    if let Some(days_count) = days_count {
        itinerary.days_count = days_count;
    }
    if let Some(interests) = interests {
        itinerary.interests = interests;
    }
    if let Some(days_plan) = days_plan {
        itinerary.days_plan = days_plan;
    }
    if let Some(ai_generated) = payload.ai_generated {
        itinerary.ai_generated = ai_generated.as_ref().map_or(false, truthy);
    }

    itinerary.updated_at = now;
    Ok(())
}
