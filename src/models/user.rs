use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String, // Always lowercased
    pub name: String,
    pub password_hash: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

/// Opaque bearer credential. A user may hold any number of these at once.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiToken {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub key: String,
    pub user_id: ObjectId,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserPreferences {
    #[serde(rename = "_id")]
    pub user_id: ObjectId,
    pub data: Value,
}

impl UserPreferences {
    pub fn empty(user_id: ObjectId) -> Self {
        Self {
            user_id,
            data: Value::Object(Default::default()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Public shape of a user. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub name: String,
    pub preferences: Value,
}

impl UserView {
    pub fn new(user: &User, preferences: Option<Value>) -> Self {
        Self {
            id: user.id.to_hex(),
            email: user.email.clone(),
            name: user.name.clone(),
            preferences: preferences.unwrap_or_else(|| Value::Object(Default::default())),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub user: UserView,
}
