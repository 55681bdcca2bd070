use std::sync::Arc;

use crate::{
    db::Store,
    services::{account_service::AccountService, password::PasswordHasher},
};

/// Shared application state handed to every worker via `web::Data`.
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub accounts: AccountService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            accounts: AccountService::new(store.clone(), hasher),
            store,
        }
    }
}
