//! Navigation handlers.

use std::collections::HashSet;

use actix_web::{HttpResponse, web};
use serde::Serialize;
use uuid::Uuid;

use havamal_core::domain::{NavigationItem, NavigationTree};
use havamal_core::services::NavigationInput;
use havamal_shared::ApiResponse;
use havamal_shared::dto::MessageResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /blog/navigation - flat, in menu order
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::ok(state.navigation.list().await?)))
}

/// A menu entry with its children nested below it.
#[derive(Serialize)]
pub struct MenuNode<'a> {
    #[serde(flatten)]
    item: &'a NavigationItem,
    children: Vec<MenuNode<'a>>,
}

#[derive(Serialize)]
pub struct Menu<'a> {
    roots: Vec<MenuNode<'a>>,
    /// Entries whose parent no longer exists.
    orphans: Vec<&'a NavigationItem>,
}

fn nest<'a>(
    tree: &'a NavigationTree,
    item: &'a NavigationItem,
    seen: &mut HashSet<Uuid>,
) -> MenuNode<'a> {
    let children = tree
        .children(item.id)
        .into_iter()
        .filter(|child| seen.insert(child.id))
        .collect::<Vec<_>>()
        .into_iter()
        .map(|child| nest(tree, child, seen))
        .collect();

    MenuNode { item, children }
}

/// GET /blog/navigation/tree
pub async fn tree(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let tree = state.navigation.tree().await?;
    let mut seen = HashSet::new();

    let roots = tree
        .roots()
        .into_iter()
        .map(|root| {
            seen.insert(root.id);
            nest(&tree, root, &mut seen)
        })
        .collect();
    let menu = Menu {
        roots,
        orphans: tree.orphans(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::ok(menu)))
}

pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let item = state.navigation.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(item)))
}

pub async fn get_by_slug(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let item = state.navigation.get_by_slug(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(item)))
}

pub async fn create(
    state: web::Data<AppState>,
    _identity: Identity,
    body: web::Json<NavigationInput>,
) -> AppResult<HttpResponse> {
    let item = state.navigation.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(item)))
}

pub async fn update(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
    body: web::Json<NavigationInput>,
) -> AppResult<HttpResponse> {
    let item = state
        .navigation
        .update(&path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(item)))
}

pub async fn delete(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    state.navigation.delete(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Navigation item deleted")))
}
