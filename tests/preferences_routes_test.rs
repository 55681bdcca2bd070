mod common;

use actix_web::test;
use serde_json::{json, Value};

use common::{bearer, build_app, register, test_state};

#[actix_rt::test]
async fn test_get_preferences_creates_empty_document() {
    let app = test::init_service(build_app(test_state())).await;
    let token = register(&app, "test@example.com").await;

    let req = test::TestRequest::get()
        .uri("/api/user/preferences")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "preferences": {} }));
}

#[actix_rt::test]
async fn test_put_preferences_replaces_wholesale() {
    let app = test::init_service(build_app(test_state())).await;
    let token = register(&app, "test@example.com").await;

    let req = test::TestRequest::put()
        .uri("/api/user/preferences")
        .insert_header(bearer(&token))
        .set_json(json!({ "currency": "EUR", "pace": "slow" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["preferences"], json!({ "currency": "EUR", "pace": "slow" }));

    let req = test::TestRequest::put()
        .uri("/api/user/preferences")
        .insert_header(bearer(&token))
        .set_json(json!({ "currency": "JPY", "nested": { "seats": ["aisle"] } }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let req = test::TestRequest::get()
        .uri("/api/user/preferences")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(
        body["preferences"],
        json!({ "currency": "JPY", "nested": { "seats": ["aisle"] } })
    );
}

#[actix_rt::test]
async fn test_me_includes_preferences() {
    let app = test::init_service(build_app(test_state())).await;
    let token = register(&app, "test@example.com").await;

    let req = test::TestRequest::put()
        .uri("/api/user/preferences")
        .insert_header(bearer(&token))
        .set_json(json!({ "theme": "dark" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["user"]["preferences"], json!({ "theme": "dark" }));
}

#[actix_rt::test]
async fn test_preferences_are_per_user() {
    let app = test::init_service(build_app(test_state())).await;
    let alice = register(&app, "alice@example.com").await;
    let bob = register(&app, "bob@example.com").await;

    let req = test::TestRequest::put()
        .uri("/api/user/preferences")
        .insert_header(bearer(&alice))
        .set_json(json!({ "diet": "vegan" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/user/preferences")
        .insert_header(bearer(&bob))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["preferences"], json!({}));
}

#[actix_rt::test]
async fn test_empty_put_stores_empty_document() {
    let app = test::init_service(build_app(test_state())).await;
    let token = register(&app, "test@example.com").await;

    let req = test::TestRequest::put()
        .uri("/api/user/preferences")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["preferences"], json!({}));
}

#[actix_rt::test]
async fn test_preferences_require_auth() {
    let app = test::init_service(build_app(test_state())).await;

    let req = test::TestRequest::get().uri("/api/user/preferences").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let req = test::TestRequest::put()
        .uri("/api/user/preferences")
        .set_json(json!({ "theme": "dark" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}
