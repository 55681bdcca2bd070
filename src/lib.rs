//! REST backend for travel itineraries: bearer-token accounts, per-user
//! preferences, owner-scoped itinerary CRUD and a deterministic itinerary
//! skeleton generator.

use actix_web::{
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, Error,
};

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use state::AppState;

/// Assemble the application around shared state. Used by the server and the
/// integration tests alike; access logging is layered on by the caller.
pub fn build_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .route("/health", web::get().to(|| async { "OK" }))
        .configure(routes::configure)
}
