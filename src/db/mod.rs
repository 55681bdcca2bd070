//! Persistence ports and their adapters.
//!
//! Handlers only ever talk to [`Store`]; MongoDB backs it in production and
//! [`memory::MemoryStore`] backs local runs and the test suite.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use serde_json::Value;

use crate::models::{
    itinerary::Itinerary,
    user::{ApiToken, User},
};

pub mod memory;
pub mod mongo;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate key")]
    Duplicate,
    #[error("database error: {0}")]
    Database(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails with [`StoreError::Duplicate`] when the email is taken.
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_user_by_id(&self, id: &ObjectId) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait TokenRepository: Send + Sync {
    async fn insert_token(&self, token: &ApiToken) -> Result<(), StoreError>;

    async fn find_token(&self, key: &str) -> Result<Option<ApiToken>, StoreError>;

    /// Delete a single token. Returns whether anything was removed.
    async fn delete_token(&self, id: &ObjectId) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait PreferencesRepository: Send + Sync {
    async fn find_preferences(&self, user_id: &ObjectId) -> Result<Option<Value>, StoreError>;

    /// Get-or-create: returns the stored document, creating `{}` if absent.
    async fn preferences_or_default(&self, user_id: &ObjectId) -> Result<Value, StoreError>;

    /// Replace the whole document, creating the record if absent.
    async fn replace_preferences(
        &self,
        user_id: &ObjectId,
        data: Value,
    ) -> Result<Value, StoreError>;
}

/// Every itinerary lookup is scoped by owner.
#[async_trait]
pub trait ItineraryRepository: Send + Sync {
    async fn insert_itinerary(&self, itinerary: &Itinerary) -> Result<(), StoreError>;

    /// Newest-created first.
    async fn list_itineraries(&self, owner: &ObjectId) -> Result<Vec<Itinerary>, StoreError>;

    async fn find_itinerary(
        &self,
        id: &ObjectId,
        owner: &ObjectId,
    ) -> Result<Option<Itinerary>, StoreError>;

    /// Overwrite a stored itinerary. Returns false if it no longer exists for this owner.
    async fn update_itinerary(&self, itinerary: &Itinerary) -> Result<bool, StoreError>;

    async fn delete_itinerary(&self, id: &ObjectId, owner: &ObjectId) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait Store:
    UserRepository + TokenRepository + PreferencesRepository + ItineraryRepository
{
    /// Cheap connectivity check used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}
