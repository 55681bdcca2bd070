use std::sync::{Arc, OnceLock};

use actix_web::web;
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use rand::Rng;
use regex::Regex;

use crate::{
    db::{Store, StoreError, TokenRepository, UserRepository},
    error::{ApiError, INVALID_TOKEN},
    models::user::{ApiToken, Credentials, User},
    services::password::PasswordHasher,
};

const TOKEN_BYTES: usize = 20;

pub const CREDENTIALS_REQUIRED: &str = "Email and password are required.";
pub const EMAIL_TAKEN: &str = "Email already registered.";
pub const INVALID_EMAIL: &str = "Enter a valid email address.";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";

/// Fresh 40-character hex key.
pub fn generate_token_key() -> String {
    let bytes: [u8; TOKEN_BYTES] = rand::thread_rng().gen();
    hex::encode(bytes)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE
        .get_or_init(|| {
            Regex::new(
                r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)*$",
            )
            .expect("email pattern is a valid regex")
        })
        .is_match(email)
}

/// Display name fallback: the local part of the address.
fn default_name(email: &str) -> String {
    email.split('@').next().unwrap_or_default().to_string()
}

/// Registration, login and bearer-token lifecycle.
pub struct AccountService {
    store: Arc<dyn Store>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AccountService {
    pub fn new(store: Arc<dyn Store>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    /// Create a user and hand back a freshly issued token for it.
    pub async fn register(&self, input: Credentials) -> Result<(String, User), ApiError> {
        let email = normalize_email(input.email.as_deref().unwrap_or_default());
        let password = input.password.unwrap_or_default();

        if email.is_empty() || password.is_empty() {
            return Err(ApiError::validation(CREDENTIALS_REQUIRED));
        }
        if !is_valid_email(&email) {
            return Err(ApiError::validation(INVALID_EMAIL));
        }
        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(ApiError::validation(EMAIL_TAKEN));
        }

        let name = input
            .name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| default_name(&email));

        let user = User {
            id: ObjectId::new(),
            password_hash: self.hash_password(password).await?,
            email,
            name,
            created_at: Utc::now(),
        };

        match self.store.insert_user(&user).await {
            Ok(()) => {}
            // Lost a race with a concurrent registration for the same address.
            Err(StoreError::Duplicate) => return Err(ApiError::validation(EMAIL_TAKEN)),
            Err(err) => return Err(err.into()),
        }
        log::info!("Registered user {}", user.id);

        let token = self.issue_token(&user).await?;
        Ok((token, user))
    }

    /// Verify credentials and mint a new token. Existing tokens stay valid.
    pub async fn login(&self, input: Credentials) -> Result<(String, User), ApiError> {
        let email = normalize_email(input.email.as_deref().unwrap_or_default());
        let password = input.password.unwrap_or_default();
        let invalid = || ApiError::Authentication(INVALID_CREDENTIALS.to_string());

        if email.is_empty() || password.is_empty() {
            return Err(invalid());
        }

        let user = match self.store.find_user_by_email(&email).await? {
            Some(user) => user,
            None => {
                log::info!("Failed sign-in attempt for unknown account");
                return Err(invalid());
            }
        };

        if !self.verify_password(password, user.password_hash.clone()).await? {
            log::info!("Failed sign-in attempt for user {}", user.id);
            return Err(invalid());
        }

        let token = self.issue_token(&user).await?;
        log::info!("User {} signed in", user.id);
        Ok((token, user))
    }

    /// Resolve a bearer key to its owner and the token record itself.
    pub async fn authenticate(&self, key: &str) -> Result<(User, ApiToken), ApiError> {
        let invalid = || ApiError::Authentication(INVALID_TOKEN.to_string());

        let token = self.store.find_token(key).await?.ok_or_else(invalid)?;
        // A token whose user has vanished is as good as unknown.
        let user = self
            .store
            .find_user_by_id(&token.user_id)
            .await?
            .ok_or_else(invalid)?;
        Ok((user, token))
    }

    /// Delete the token used for this request. Failures are logged, not surfaced.
    pub async fn logout(&self, token: &ApiToken) {
        match self.store.delete_token(&token.id).await {
            Ok(true) => log::info!("User {} signed out", token.user_id),
            Ok(false) => log::debug!("Token for user {} already removed", token.user_id),
            Err(err) => log::warn!("Failed to delete token for user {}: {}", token.user_id, err),
        }
    }

    pub async fn issue_token(&self, user: &User) -> Result<String, ApiError> {
        let token = ApiToken {
            id: ObjectId::new(),
            key: generate_token_key(),
            user_id: user.id,
            created_at: Utc::now(),
        };
        self.store.insert_token(&token).await?;
        Ok(token.key)
    }

    async fn hash_password(&self, password: String) -> Result<String, ApiError> {
        let hasher = self.hasher.clone();
        web::block(move || hasher.hash(&password))
            .await
            .map_err(|e| {
                log::error!("Password hashing task failed: {}", e);
                ApiError::Internal
            })?
            .map_err(|e| {
                log::error!("{}", e);
                ApiError::Internal
            })
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, ApiError> {
        let hasher = self.hasher.clone();
        web::block(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| {
                log::error!("Password verification task failed: {}", e);
                ApiError::Internal
            })
    }
}
