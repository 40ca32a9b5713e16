//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub storage: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

/// GET /health
///
/// Reports `degraded` with a 503 when the database stops answering.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let (status, storage) = match &state.db {
        Some(db) => match ping(db).await {
            true => ("ok", "postgres"),
            false => ("degraded", "postgres"),
        },
        None => ("ok", "memory"),
    };

    let response = HealthResponse {
        status,
        storage,
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    if status == "ok" {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

#[cfg(feature = "postgres")]
async fn ping(db: &havamal_infra::DatabaseConnections) -> bool {
    match db.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database ping failed");
            false
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn ping(_db: &havamal_infra::DatabaseConnections) -> bool {
    true
}
