use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;

use crate::{db::Store, state::AppState};

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    database: bool,
    version: &'static str,
}

/*
    /api/health
*/
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let database = match state.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            log::error!("Store health check failed: {}", e);
            false
        }
    };

    HttpResponse::Ok().json(HealthStatus {
        status: if database { "ok" } else { "degraded" },
        database,
        version: env!("CARGO_PKG_VERSION"),
    })
}
