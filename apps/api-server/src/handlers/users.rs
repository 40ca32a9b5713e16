//! User administration handlers. Creating and listing users needs the admin role.

use actix_web::{HttpResponse, web};

use havamal_core::domain::{Role, parse_id};
use havamal_core::services::UserInput;
use havamal_shared::ApiResponse;
use havamal_shared::dto::{MessageResponse, UserResponse};

use super::auth::user_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UserInput>,
) -> AppResult<HttpResponse> {
    let user = state.users.create(identity.role, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(user_response(user))))
}

pub async fn list(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let users: Vec<UserResponse> = state
        .users
        .list(identity.role)
        .await?
        .into_iter()
        .map(user_response)
        .collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(users)))
}

pub async fn get(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let user = state.users.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(user_response(user))))
}

/// Members may only change or remove their own account.
fn require_self_or_admin(identity: &Identity, id: &str) -> AppResult<()> {
    if identity.role == Role::Admin || parse_id(id)? == identity.user_id {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// An empty `password` keeps the current one.
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<UserInput>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    require_self_or_admin(&identity, &id)?;

    let user = state.users.update(&id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(user_response(user))))
}

pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    require_self_or_admin(&identity, &id)?;

    state.users.delete(&id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("User deleted")))
}
