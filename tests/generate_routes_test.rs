mod common;

use actix_web::test;
use serde_json::{json, Value};

use common::{bearer, build_app, list_itineraries, register, test_state};

#[actix_rt::test]
async fn test_generate_five_day_itinerary() {
    let app = test::init_service(build_app(test_state())).await;
    let token = register(&app, "test@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/generate-itinerary")
        .insert_header(bearer(&token))
        .set_json(json!({
            "destination": "Tokyo",
            "duration": 5,
            "budget_range": "budget",
            "interests": ["culture", "food"]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    let itinerary = &body["itinerary"];
    assert_eq!(itinerary["title"], "5-Day Trip to Tokyo");
    assert_eq!(itinerary["destination"], "Tokyo");
    assert_eq!(itinerary["days_count"], 5);
    assert_eq!(itinerary["budget_range"], "budget");
    assert_eq!(itinerary["interests"], json!(["culture", "food"]));
    assert_eq!(itinerary["ai_generated"], true);

    let days = itinerary["days_plan"].as_array().unwrap();
    assert_eq!(days.len(), 5);
    for (i, day) in days.iter().enumerate() {
        assert_eq!(day["title"], format!("Day {} in Tokyo", i + 1));
        assert_eq!(day["activities"][0]["time"], "09:00");
        assert_eq!(day["meals"], json!([]));
        assert_eq!(day["tips"], json!([]));
    }
}

#[actix_rt::test]
async fn test_generate_is_not_persisted() {
    let app = test::init_service(build_app(test_state())).await;
    let token = register(&app, "test@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/generate-itinerary")
        .insert_header(bearer(&token))
        .set_json(json!({ "destination": "Rome", "duration": 2 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    assert!(list_itineraries(&app, &token).await.is_empty());
}

#[actix_rt::test]
async fn test_generate_with_empty_body_uses_defaults() {
    let app = test::init_service(build_app(test_state())).await;
    let token = register(&app, "test@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/generate-itinerary")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["itinerary"]["title"], "3-Day Trip to Your Destination");
    assert_eq!(body["itinerary"]["budget_range"], "moderate");
    assert_eq!(body["itinerary"]["days_plan"].as_array().unwrap().len(), 3);
}

#[actix_rt::test]
async fn test_generate_coerces_bad_duration() {
    let app = test::init_service(build_app(test_state())).await;
    let token = register(&app, "test@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/generate-itinerary")
        .insert_header(bearer(&token))
        .set_json(json!({ "destination": "Berlin", "duration": "lots" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["itinerary"]["days_count"], 3);
}

#[actix_rt::test]
async fn test_generated_itinerary_can_be_saved() {
    let app = test::init_service(build_app(test_state())).await;
    let token = register(&app, "test@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/generate-itinerary")
        .insert_header(bearer(&token))
        .set_json(json!({ "destination": "Oslo", "duration": 2 }))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;

    let saved = common::create_itinerary(&app, &token, body["itinerary"].clone()).await;
    assert_eq!(saved["title"], "2-Day Trip to Oslo");
    assert_eq!(saved["ai_generated"], true);
    assert_eq!(saved["days_plan"], body["itinerary"]["days_plan"]);
    assert_eq!(list_itineraries(&app, &token).await.len(), 1);
}

#[actix_rt::test]
async fn test_generate_requires_auth() {
    let app = test::init_service(build_app(test_state())).await;

    let req = test::TestRequest::post()
        .uri("/api/generate-itinerary")
        .set_json(json!({ "destination": "Paris" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}
