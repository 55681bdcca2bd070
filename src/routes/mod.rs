use actix_web::web;
use serde_json::Value;

use crate::{error::ApiError, middleware::auth::BearerAuth};

pub mod account;
pub mod health;
pub mod itinerary;

/// Lenient body read for endpoints that accept a missing body. Blank input
/// is `null`; only malformed JSON is rejected.
pub(crate) fn json_body(body: &[u8]) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::validation(format!("Malformed request body: {}", e)))
}

/// Route table for everything under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("")
                    .wrap(BearerAuth)
                    .service(
                        web::scope("/auth")
                            .route("/register", web::post().to(account::register))
                            .route("/login", web::post().to(account::login))
                            .route("/logout", web::post().to(account::logout))
                            .route("/me", web::get().to(account::me)),
                    )
                    .service(
                        web::resource("/user/preferences")
                            .route(web::get().to(account::get_preferences))
                            .route(web::put().to(account::put_preferences)),
                    )
                    .service(
                        web::resource("/itineraries")
                            .route(web::get().to(itinerary::get_all))
                            .route(web::post().to(itinerary::create)),
                    )
                    .service(
                        web::resource("/itineraries/{id}")
                            .route(web::get().to(itinerary::get_by_id))
                            .route(web::put().to(itinerary::update))
                            .route(web::delete().to(itinerary::delete)),
                    )
                    .route(
                        "/generate-itinerary",
                        web::post().to(itinerary::generate),
                    ),
            ),
    );
}
