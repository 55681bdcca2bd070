use actix_web::{web, HttpResponse};
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use serde_json::Value;

use crate::{
    db::ItineraryRepository,
    error::ApiError,
    middleware::auth_context::AuthenticatedUser,
    models::itinerary::{Itinerary, ItineraryEnvelope, ItineraryList, ItineraryPayload},
    routes::json_body,
    services::{
        itinerary_generation_service::{generate_itinerary, GeneratedEnvelope, GenerationRequest},
        itinerary_service::{apply_update, new_itinerary, truthy},
    },
    state::AppState,
};

/// Malformed ids are indistinguishable from missing ones.
fn parse_id(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::not_found())
}

/// A missing or falsy body is an empty payload.
fn itinerary_payload(body: &[u8]) -> Result<ItineraryPayload, ApiError> {
    match json_body(body)? {
        value @ Value::Object(_) => serde_json::from_value(value)
            .map_err(|e| ApiError::validation(format!("Malformed request body: {}", e))),
        value if !truthy(&value) => Ok(ItineraryPayload::default()),
        _ => Err(ApiError::validation("Request body must be a JSON object.")),
    }
}

async fn owned_itinerary(
    state: &AppState,
    raw_id: &str,
    owner: &ObjectId,
) -> Result<Itinerary, ApiError> {
    let id = parse_id(raw_id)?;
    state
        .store
        .find_itinerary(&id, owner)
        .await?
        .ok_or_else(ApiError::not_found)
}

/*
    GET /api/itineraries
*/
pub async fn get_all(
    state: web::Data<AppState>,
    identity: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let itineraries = state.store.list_itineraries(&identity.user.id).await?;
    Ok(HttpResponse::Ok().json(ItineraryList {
        itineraries: itineraries.into_iter().map(Into::into).collect(),
    }))
}

/*
    POST /api/itineraries
*/
pub async fn create(
    state: web::Data<AppState>,
    identity: AuthenticatedUser,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let payload = itinerary_payload(&body)?;
    let itinerary = new_itinerary(identity.user.id, payload, Utc::now())?;
    state.store.insert_itinerary(&itinerary).await?;
    log::info!("User {} created itinerary {}", identity.user.id, itinerary.id);

    Ok(HttpResponse::Created().json(ItineraryEnvelope {
        itinerary: itinerary.into(),
    }))
}

/*
    GET /api/itineraries/{id}
*/
pub async fn get_by_id(
    state: web::Data<AppState>,
    identity: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let itinerary = owned_itinerary(&state, &path, &identity.user.id).await?;
    Ok(HttpResponse::Ok().json(ItineraryEnvelope {
        itinerary: itinerary.into(),
    }))
}

/*
    PUT /api/itineraries/{id}
*/
pub async fn update(
    state: web::Data<AppState>,
    identity: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let mut itinerary = owned_itinerary(&state, &path, &identity.user.id).await?;
    apply_update(&mut itinerary, itinerary_payload(&body)?, Utc::now())?;

    // Deleted between the read and the write.
    if !state.store.update_itinerary(&itinerary).await? {
        return Err(ApiError::not_found());
    }

    Ok(HttpResponse::Ok().json(ItineraryEnvelope {
        itinerary: itinerary.into(),
    }))
}

/*
    DELETE /api/itineraries/{id}
*/
pub async fn delete(
    state: web::Data<AppState>,
    identity: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    if !state.store.delete_itinerary(&id, &identity.user.id).await? {
        return Err(ApiError::not_found());
    }
    log::info!("User {} deleted itinerary {}", identity.user.id, id);
    Ok(HttpResponse::NoContent().finish())
}

/*
    POST /api/generate-itinerary
*/
pub async fn generate(_identity: AuthenticatedUser, body: web::Bytes) -> HttpResponse {
    let request = GenerationRequest::from_body(&body);
    HttpResponse::Ok().json(GeneratedEnvelope {
        itinerary: generate_itinerary(&request),
    })
}
