//! Authentication handlers.

use actix_web::{HttpResponse, web};

use havamal_core::domain::User;
use havamal_shared::dto::{AuthResponse, LoginRequest, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

pub(crate) fn user_response(user: User) -> UserResponse {
    UserResponse {
        role: user.role().as_str().to_string(),
        id: user.id,
        username: user.username,
        email: user.email,
        is_active: user.is_active,
        created_at: user.created_at,
    }
}

/// POST /auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let user = state.users.authenticate(&req.email, &req.password).await?;

    let token = state
        .tokens
        .generate_token(&user)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(HttpResponse::Ok().json(AuthResponse::bearer(
        token,
        state.tokens.expiration_seconds().max(0) as u64,
        user_response(user),
    )))
}

/// GET /auth/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state.users.get(&identity.user_id.to_string()).await?;
    Ok(HttpResponse::Ok().json(user_response(user)))
}
