//! Category handlers.

use actix_web::{HttpResponse, web};

use havamal_core::services::CategoryInput;
use havamal_shared::ApiResponse;
use havamal_shared::dto::MessageResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::ok(state.categories.list().await?)))
}

pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let category = state.categories.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(category)))
}

pub async fn get_by_slug(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let category = state.categories.get_by_slug(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(category)))
}

pub async fn create(
    state: web::Data<AppState>,
    _identity: Identity,
    body: web::Json<CategoryInput>,
) -> AppResult<HttpResponse> {
    let category = state.categories.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(category)))
}

pub async fn update(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
    body: web::Json<CategoryInput>,
) -> AppResult<HttpResponse> {
    let category = state
        .categories
        .update(&path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(category)))
}

/// Detaches the category's posts before deleting it.
pub async fn delete(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    state.categories.delete(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Category deleted")))
}
