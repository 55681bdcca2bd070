use actix_web::{web, HttpResponse};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    db::PreferencesRepository,
    error::ApiError,
    middleware::auth_context::AuthenticatedUser,
    models::user::{Credentials, TokenResponse, UserView},
    routes::json_body,
    services::itinerary_service::truthy,
    state::AppState,
};

#[derive(Serialize)]
struct UserEnvelope {
    user: UserView,
}

#[derive(Serialize)]
struct PreferencesEnvelope {
    preferences: Value,
}

/*
    /api/auth/register
*/
pub async fn register(
    state: web::Data<AppState>,
    input: web::Json<Credentials>,
) -> Result<HttpResponse, ApiError> {
    let (token, user) = state.accounts.register(input.into_inner()).await?;
    Ok(HttpResponse::Created().json(TokenResponse {
        token,
        user: UserView::new(&user, None),
    }))
}

/*
    /api/auth/login
*/
pub async fn login(
    state: web::Data<AppState>,
    input: web::Json<Credentials>,
) -> Result<HttpResponse, ApiError> {
    let (token, user) = state.accounts.login(input.into_inner()).await?;
    let preferences = state.store.find_preferences(&user.id).await?;
    Ok(HttpResponse::Ok().json(TokenResponse {
        token,
        user: UserView::new(&user, preferences),
    }))
}

/*
    /api/auth/logout
*/
pub async fn logout(state: web::Data<AppState>, identity: AuthenticatedUser) -> HttpResponse {
    state.accounts.logout(&identity.token).await;
    HttpResponse::Ok().json(json!({ "success": true }))
}

/*
    /api/auth/me
*/
pub async fn me(
    state: web::Data<AppState>,
    identity: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let preferences = state.store.find_preferences(&identity.user.id).await?;
    Ok(HttpResponse::Ok().json(UserEnvelope {
        user: UserView::new(&identity.user, preferences),
    }))
}

/*
    GET /api/user/preferences
*/
pub async fn get_preferences(
    state: web::Data<AppState>,
    identity: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let preferences = state.store.preferences_or_default(&identity.user.id).await?;
    Ok(HttpResponse::Ok().json(PreferencesEnvelope { preferences }))
}

/*
    PUT /api/user/preferences
*/
pub async fn put_preferences(
    state: web::Data<AppState>,
    identity: AuthenticatedUser,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let document = json_body(&body)?;
    // Falsy bodies store an empty document.
    let document = if truthy(&document) {
        document
    } else {
        json!({})
    };

    let preferences = state
        .store
        .replace_preferences(&identity.user.id, document)
        .await?;
    Ok(HttpResponse::Ok().json(PreferencesEnvelope { preferences }))
}
