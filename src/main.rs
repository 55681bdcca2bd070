use std::sync::Arc;

use actix_web::{middleware::Logger, web, HttpServer};
use env_logger::Env;

use travel_planner_api::{
    build_app,
    config::{Config, StoreBackend},
    db::{
        memory::MemoryStore,
        mongo::{create_mongo_client, MongoStore},
        Store,
    },
    services::password::BcryptHasher,
    state::AppState,
};

fn other_error<E: std::fmt::Display>(err: E) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
}

async fn open_store(config: &Config) -> std::io::Result<Arc<dyn Store>> {
    match config.store_backend {
        StoreBackend::Memory => {
            log::warn!("Using the in-memory store; data will not survive a restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Mongo => {
            let uri = config
                .mongo_uri
                .as_deref()
                .ok_or_else(|| other_error("MONGODB_URI must be set"))?;
            let client = create_mongo_client(uri).await.map_err(other_error)?;
            let store = MongoStore::new(&client, &config.mongo_database);
            store.ensure_indexes().await.map_err(other_error)?;
            Ok(Arc::new(store))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        other_error(e)
    })?;

    let store = open_store(&config).await?;
    let hasher = Arc::new(BcryptHasher::new(config.bcrypt_cost));
    let state = web::Data::new(AppState::new(store, hasher));

    log::info!("Starting HTTP server on {}:{}", config.host, config.port);

    HttpServer::new(move || build_app(state.clone()).wrap(Logger::default()))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}
