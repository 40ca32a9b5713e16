//! Post version handlers.

use actix_web::{HttpResponse, web};

use havamal_core::services::VersionInput;
use havamal_shared::ApiResponse;
use havamal_shared::dto::MessageResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::ok(state.versions.list().await?)))
}

pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let version = state.versions.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(version)))
}

/// GET /blog/posts/{id}/versions
pub async fn list_for_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let versions = state.versions.list_for_post(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(versions)))
}

pub async fn create(
    state: web::Data<AppState>,
    _identity: Identity,
    body: web::Json<VersionInput>,
) -> AppResult<HttpResponse> {
    let version = state.versions.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(version)))
}

pub async fn update(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
    body: web::Json<VersionInput>,
) -> AppResult<HttpResponse> {
    let version = state
        .versions
        .update(&path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(version)))
}

pub async fn delete(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    state.versions.delete(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Version deleted")))
}
