use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    error::{ErrorKind, WriteFailure},
    options::{ClientOptions, IndexOptions, ReturnDocument, ServerApi, ServerApiVersion},
    Client, Collection, Database, IndexModel,
};
use serde_json::Value;

use super::{
    ItineraryRepository, PreferencesRepository, Store, StoreError, TokenRepository,
    UserRepository,
};
use crate::models::{
    itinerary::Itinerary,
    user::{ApiToken, User, UserPreferences},
};

const DUPLICATE_KEY: i32 = 11000;

const USERS: &str = "users";
const TOKENS: &str = "api_tokens";
const PREFERENCES: &str = "user_preferences";
const ITINERARIES: &str = "itineraries";

pub async fn create_mongo_client(uri: &str) -> Result<Arc<Client>, mongodb::error::Error> {
    log::info!("Connecting to MongoDB");

    let mut client_options = ClientOptions::parse(uri).await?;

    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client = Client::with_options(client_options)?;

    match client
        .database("admin")
        .run_command(doc! {"ping": 1})
        .await
    {
        Ok(_) => log::info!("Connected to MongoDB and verified with ping"),
        Err(e) => {
            log::warn!("Connected to MongoDB but ping failed: {}", e);
            log::warn!("The API will start, but store operations may fail");
        }
    }

    Ok(Arc::new(client))
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(write_error))
                if write_error.code == DUPLICATE_KEY =>
            {
                StoreError::Duplicate
            }
            ErrorKind::BsonSerialization(e) => StoreError::Serialization(e.to_string()),
            ErrorKind::BsonDeserialization(e) => StoreError::Serialization(e.to_string()),
            _ => StoreError::Database(err.to_string()),
        }
    }
}

pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(client: &Client, database: &str) -> Self {
        Self {
            db: client.database(database),
        }
    }

    /// Create the unique and lookup indexes the store relies on. Idempotent.
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let unique = || IndexOptions::builder().unique(true).build();

        self.users()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "email": 1 })
                    .options(unique())
                    .build(),
            )
            .await?;
        self.tokens()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "key": 1 })
                    .options(unique())
                    .build(),
            )
            .await?;
        self.itineraries()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "user_id": 1, "created_at": -1 })
                    .build(),
            )
            .await?;

        log::info!("MongoDB indexes ensured");
        Ok(())
    }

    fn users(&self) -> Collection<User> {
        self.db.collection(USERS)
    }

    fn tokens(&self) -> Collection<ApiToken> {
        self.db.collection(TOKENS)
    }

    fn preferences(&self) -> Collection<UserPreferences> {
        self.db.collection(PREFERENCES)
    }

    fn itineraries(&self) -> Collection<Itinerary> {
        self.db.collection(ITINERARIES)
    }
}

#[async_trait]
impl UserRepository for MongoStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        self.users().insert_one(user).await?;
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users().find_one(doc! { "email": email }).await?)
    }

    async fn find_user_by_id(&self, id: &ObjectId) -> Result<Option<User>, StoreError> {
        Ok(self.users().find_one(doc! { "_id": *id }).await?)
    }
}

#[async_trait]
impl TokenRepository for MongoStore {
    async fn insert_token(&self, token: &ApiToken) -> Result<(), StoreError> {
        self.tokens().insert_one(token).await?;
        Ok(())
    }

    async fn find_token(&self, key: &str) -> Result<Option<ApiToken>, StoreError> {
        Ok(self.tokens().find_one(doc! { "key": key }).await?)
    }

    async fn delete_token(&self, id: &ObjectId) -> Result<bool, StoreError> {
        let result = self.tokens().delete_one(doc! { "_id": *id }).await?;
        Ok(result.deleted_count > 0)
    }
}

#[async_trait]
impl PreferencesRepository for MongoStore {
    async fn find_preferences(&self, user_id: &ObjectId) -> Result<Option<Value>, StoreError> {
        let prefs = self.preferences().find_one(doc! { "_id": *user_id }).await?;
        Ok(prefs.map(|p| p.data))
    }

    async fn preferences_or_default(&self, user_id: &ObjectId) -> Result<Value, StoreError> {
        let prefs = self
            .preferences()
            .find_one_and_update(
                doc! { "_id": *user_id },
                doc! { "$setOnInsert": { "data": {} } },
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?;

        Ok(prefs
            .unwrap_or_else(|| UserPreferences::empty(*user_id))
            .data)
    }

    async fn replace_preferences(
        &self,
        user_id: &ObjectId,
        data: Value,
    ) -> Result<Value, StoreError> {
        let prefs = UserPreferences {
            user_id: *user_id,
            data,
        };
        self.preferences()
            .replace_one(doc! { "_id": *user_id }, &prefs)
            .upsert(true)
            .await?;
        Ok(prefs.data)
    }
}

#[async_trait]
impl ItineraryRepository for MongoStore {
    async fn insert_itinerary(&self, itinerary: &Itinerary) -> Result<(), StoreError> {
        self.itineraries().insert_one(itinerary).await?;
        Ok(())
    }

    async fn list_itineraries(&self, owner: &ObjectId) -> Result<Vec<Itinerary>, StoreError> {
        let cursor = self
            .itineraries()
            .find(doc! { "user_id": *owner })
            .sort(doc! { "created_at": -1, "_id": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_itinerary(
        &self,
        id: &ObjectId,
        owner: &ObjectId,
    ) -> Result<Option<Itinerary>, StoreError> {
        Ok(self
            .itineraries()
            .find_one(doc! { "_id": *id, "user_id": *owner })
            .await?)
    }

    async fn update_itinerary(&self, itinerary: &Itinerary) -> Result<bool, StoreError> {
        let result = self
            .itineraries()
            .replace_one(
                doc! { "_id": itinerary.id, "user_id": itinerary.user_id },
                itinerary,
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_itinerary(&self, id: &ObjectId, owner: &ObjectId) -> Result<bool, StoreError> {
        let result = self
            .itineraries()
            .delete_one(doc! { "_id": *id, "user_id": *owner })
            .await?;
        Ok(result.deleted_count > 0)
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
