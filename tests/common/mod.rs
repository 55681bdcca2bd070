#![allow(dead_code)]

use std::sync::Arc;

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::header::{self, HeaderName},
    test, web, Error,
};
use serde_json::{json, Value};

use travel_planner_api::{
    db::memory::MemoryStore, services::password::BcryptHasher, state::AppState,
};

pub use travel_planner_api::build_app;

/// Fresh state backed by an empty in-memory store. Lowest bcrypt cost keeps
/// the suite fast.
pub fn test_state() -> web::Data<AppState> {
    web::Data::new(AppState::new(
        Arc::new(MemoryStore::new()),
        Arc::new(BcryptHasher::new(4)),
    ))
}

pub fn bearer(token: &str) -> (HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

pub fn get_test_password() -> String {
    "testpassword123".to_string()
}

pub async fn register<S, B>(app: &S, email: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "email": email, "password": get_test_password() }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 201, "registration of {} failed", email);

    let body: Value = test::read_body_json(resp).await;
    body["token"].as_str().unwrap().to_string()
}

pub async fn create_itinerary<S, B>(app: &S, token: &str, payload: Value) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/itineraries")
        .insert_header(bearer(token))
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 201);

    let body: Value = test::read_body_json(resp).await;
    body["itinerary"].clone()
}

pub async fn list_itineraries<S, B>(app: &S, token: &str) -> Vec<Value>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::get()
        .uri("/api/itineraries")
        .insert_header(bearer(token))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    body["itineraries"].as_array().unwrap().clone()
}
