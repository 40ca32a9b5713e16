//! Post handlers: public `/blog` reads and authenticated `/api/posts` writes.

use actix_web::{HttpResponse, web};

use havamal_core::services::{NewPost, PostChanges};
use havamal_shared::ApiResponse;
use havamal_shared::dto::{AssociationRequest, MessageResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /blog/posts/published
pub async fn list_published(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::ok(state.posts.list_published().await?)))
}

/// GET /blog/author/{author_id}
pub async fn list_by_author(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let rows = state.posts.list_by_author(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(rows)))
}

/// GET /blog/slug/{slug}
pub async fn get_by_slug(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get_by_slug(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// GET /blog/category/{category} - category id or slug
pub async fn list_by_category(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let rows = state.posts.list_by_category(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(rows)))
}

/// GET /api/posts - every categorized post, drafts included
pub async fn list(state: web::Data<AppState>, _identity: Identity) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::ok(state.posts.list().await?)))
}

/// GET /api/posts/{id}
pub async fn get(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// POST /api/posts
///
/// 201 even when the requested category could not be attached; the body's
/// `category.outcome` says what happened.
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<NewPost>,
) -> AppResult<HttpResponse> {
    let created = state.posts.create(body.into_inner()).await?;
    tracing::debug!(post_id = %created.post.id, by = %identity.user_id, "Post created via API");
    Ok(HttpResponse::Created().json(ApiResponse::ok(created)))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
    body: web::Json<PostChanges>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .update(&path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    state.posts.delete(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted")))
}

/// POST /api/posts/category
pub async fn attach_category(
    state: web::Data<AppState>,
    _identity: Identity,
    body: web::Json<AssociationRequest>,
) -> AppResult<HttpResponse> {
    let link = state
        .categories
        .attach(&body.post_id, &body.category_id)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(link)))
}

/// DELETE /api/posts/category
pub async fn detach_category(
    state: web::Data<AppState>,
    _identity: Identity,
    body: web::Json<AssociationRequest>,
) -> AppResult<HttpResponse> {
    state
        .categories
        .detach(&body.post_id, &body.category_id)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Category detached")))
}
