use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{
    ItineraryRepository, PreferencesRepository, Store, StoreError, TokenRepository,
    UserRepository,
};
use crate::models::{
    itinerary::Itinerary,
    user::{ApiToken, User},
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    tokens: HashMap<String, ApiToken>,
    preferences: HashMap<ObjectId, Value>,
    // Kept in insertion order; listing relies on it for tie-breaking.
    itineraries: Vec<Itinerary>,
}

/// Process-local store with the same contract as the MongoDB adapter.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate);
        }
        tables.users.push(user.clone());
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: &ObjectId) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| &u.id == id).cloned())
    }
}

#[async_trait]
impl TokenRepository for MemoryStore {
    async fn insert_token(&self, token: &ApiToken) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.tokens.contains_key(&token.key) {
            return Err(StoreError::Duplicate);
        }
        tables.tokens.insert(token.key.clone(), token.clone());
        Ok(())
    }

    async fn find_token(&self, key: &str) -> Result<Option<ApiToken>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.tokens.get(key).cloned())
    }

    async fn delete_token(&self, id: &ObjectId) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.tokens.len();
        tables.tokens.retain(|_, token| &token.id != id);
        Ok(tables.tokens.len() != before)
    }
}

#[async_trait]
impl PreferencesRepository for MemoryStore {
    async fn find_preferences(&self, user_id: &ObjectId) -> Result<Option<Value>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.preferences.get(user_id).cloned())
    }

    async fn preferences_or_default(&self, user_id: &ObjectId) -> Result<Value, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .preferences
            .entry(*user_id)
            .or_insert_with(|| Value::Object(Default::default()))
            .clone())
    }

    async fn replace_preferences(
        &self,
        user_id: &ObjectId,
        data: Value,
    ) -> Result<Value, StoreError> {
        let mut tables = self.tables.write().await;
        tables.preferences.insert(*user_id, data.clone());
        Ok(data)
    }
}

#[async_trait]
impl ItineraryRepository for MemoryStore {
    async fn insert_itinerary(&self, itinerary: &Itinerary) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables.itineraries.push(itinerary.clone());
        Ok(())
    }

    async fn list_itineraries(&self, owner: &ObjectId) -> Result<Vec<Itinerary>, StoreError> {
        let tables = self.tables.read().await;
        let mut owned: Vec<Itinerary> = tables
            .itineraries
            .iter()
            .rev()
            .filter(|i| &i.user_id == owner)
            .cloned()
            .collect();
        // Stable sort keeps newest-inserted first among equal timestamps.
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn find_itinerary(
        &self,
        id: &ObjectId,
        owner: &ObjectId,
    ) -> Result<Option<Itinerary>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .itineraries
            .iter()
            .find(|i| &i.id == id && &i.user_id == owner)
            .cloned())
    }

    async fn update_itinerary(&self, itinerary: &Itinerary) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        match tables
            .itineraries
            .iter_mut()
            .find(|i| i.id == itinerary.id && i.user_id == itinerary.user_id)
        {
            Some(stored) => {
                *stored = itinerary.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_itinerary(&self, id: &ObjectId, owner: &ObjectId) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.itineraries.len();
        tables
            .itineraries
            .retain(|i| !(&i.id == id && &i.user_id == owner));
        Ok(tables.itineraries.len() != before)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
