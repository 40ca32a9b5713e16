//! HTTP handlers and route configuration.
//!
//! `/blog` serves the public site and needs no token. Everything under
//! `/api` requires a bearer token.

mod auth;
mod categories;
mod health;
mod navigation;
mod posts;
mod users;
mod versions;

use actix_web::web;

use crate::middleware::error::AppError;

/// Reject unreadable JSON bodies as problem documents instead of plain text.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest("malformed-body", err.to_string()).into())
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/auth")
                .route("/login", web::post().to(auth::login))
                .route("/me", web::get().to(auth::me)),
        )
        .service(
            web::scope("/blog")
                .route("/posts/published", web::get().to(posts::list_published))
                .route("/posts/{id}/versions", web::get().to(versions::list_for_post))
                .route("/author/{author_id}", web::get().to(posts::list_by_author))
                .route("/slug/{slug}", web::get().to(posts::get_by_slug))
                .route("/category/{category}", web::get().to(posts::list_by_category))
                .route("/categories", web::get().to(categories::list))
                .route("/categories/slug/{slug}", web::get().to(categories::get_by_slug))
                .route("/categories/{id}", web::get().to(categories::get))
                .route("/navigation", web::get().to(navigation::list))
                .route("/navigation/tree", web::get().to(navigation::tree))
                .route("/navigation/slug/{slug}", web::get().to(navigation::get_by_slug))
                .route("/navigation/{id}", web::get().to(navigation::get))
                .route("/versions", web::get().to(versions::list))
                .route("/versions/{id}", web::get().to(versions::get)),
        )
        .service(
            web::scope("/api")
                .service(
                    web::scope("/posts")
                        .route("", web::get().to(posts::list))
                        .route("", web::post().to(posts::create))
                        .route("/category", web::post().to(posts::attach_category))
                        .route("/category", web::delete().to(posts::detach_category))
                        .route("/{id}", web::get().to(posts::get))
                        .route("/{id}", web::put().to(posts::update))
                        .route("/{id}", web::delete().to(posts::delete)),
                )
                .service(
                    web::scope("/categories")
                        .route("", web::post().to(categories::create))
                        .route("/{id}", web::put().to(categories::update))
                        .route("/{id}", web::delete().to(categories::delete)),
                )
                .service(
                    web::scope("/navigation")
                        .route("", web::post().to(navigation::create))
                        .route("/{id}", web::put().to(navigation::update))
                        .route("/{id}", web::delete().to(navigation::delete)),
                )
                .service(
                    web::scope("/versions")
                        .route("", web::post().to(versions::create))
                        .route("/{id}", web::put().to(versions::update))
                        .route("/{id}", web::delete().to(versions::delete)),
                )
                .service(
                    web::scope("/users")
                        .route("", web::get().to(users::list))
                        .route("", web::post().to(users::create))
                        .route("/{id}", web::get().to(users::get))
                        .route("/{id}", web::put().to(users::update))
                        .route("/{id}", web::delete().to(users::delete)),
                ),
        );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use serde_json::{Value, json};

    use havamal_core::domain::{Role, User};
    use havamal_core::services::UserInput;

    use crate::config::AppConfig;
    use crate::state::{AppState, Repositories};

    const ADMIN_EMAIL: &str = "admin@example.com";
    const ADMIN_PASSWORD: &str = "correct-horse-battery";

    async fn state_with_admin() -> (AppState, User) {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        let state = AppState::from_parts(Repositories::in_memory(), &config);
        let admin = state
            .users
            .ensure_admin("admin", ADMIN_EMAIL, ADMIN_PASSWORD)
            .await
            .unwrap();
        (state, admin)
    }

    fn bearer(state: &AppState, user: &User) -> (header::HeaderName, String) {
        let token = state.tokens.generate_token(user).unwrap();
        (header::AUTHORIZATION, format!("Bearer {token}"))
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state.clone()))
                    .app_data(json_config())
                    .configure(configure_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_health_reports_memory_storage() {
        let (state, _) = state_with_admin().await;
        let app = app!(state);

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "ok");
        assert_eq!(body["storage"], "memory");
    }

    #[actix_web::test]
    async fn test_login_then_me() {
        let (state, admin) = state_with_admin().await;
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["token_type"], "Bearer");
        assert_eq!(body["user"]["role"], "admin");
        let token = body["access_token"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri("/auth/me")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        let me: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(me["id"], admin.id.to_string());
    }

    #[actix_web::test]
    async fn test_login_with_wrong_password_is_unauthorized() {
        let (state, _) = state_with_admin().await;
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": ADMIN_EMAIL, "password": "not-the-password" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_api_requires_token() {
        let (state, _) = state_with_admin().await;
        let app = app!(state);

        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_created_post_is_listed_under_its_category() {
        let (state, admin) = state_with_admin().await;
        let auth = bearer(&state, &admin);
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/categories")
            .insert_header(auth.clone())
            .set_json(json!({ "name": "Rust", "slug": "rust", "order": 1 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let category: Value = test::read_body_json(resp).await;
        let category_id = category["data"]["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(auth)
            .set_json(json!({
                "title": "Ownership",
                "slug": "ownership",
                "status": "published",
                "author": ADMIN_EMAIL,
                "categoryId": category_id,
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        assert_eq!(created["data"]["category"]["outcome"], "attached");

        let req = test::TestRequest::get().uri("/blog/category/rust").to_request();
        let listed: Value = test::call_and_read_body_json(&app, req).await;
        let rows = listed["data"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["slug"], "ownership");
        assert_eq!(rows[0]["category_slug"], "rust");
    }

    #[actix_web::test]
    async fn test_unknown_post_is_problem_document() {
        let (state, _) = state_with_admin().await;
        let app = app!(state);

        let req = test::TestRequest::get().uri("/blog/slug/missing").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["type"], "/problems/not-found");
    }

    #[actix_web::test]
    async fn test_malformed_body_is_bad_request() {
        let (state, admin) = state_with_admin().await;
        let auth = bearer(&state, &admin);
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/categories")
            .insert_header(auth)
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{ not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["type"], "/problems/malformed-body");
    }

    #[actix_web::test]
    async fn test_member_cannot_list_users() {
        let (state, admin) = state_with_admin().await;
        let member = state
            .users
            .create(
                admin.role(),
                UserInput {
                    username: "bob".into(),
                    email: "bob@example.com".into(),
                    password: "long-enough-password".into(),
                    is_active: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(member.role(), Role::Member);
        let auth = bearer(&state, &member);
        let app = app!(state);

        let req = test::TestRequest::get()
            .uri("/api/users")
            .insert_header(auth)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_member_can_only_edit_own_account() {
        let (state, admin) = state_with_admin().await;
        let member = state
            .users
            .create(
                admin.role(),
                UserInput {
                    username: "bob".into(),
                    email: "bob@example.com".into(),
                    password: "long-enough-password".into(),
                    is_active: None,
                },
            )
            .await
            .unwrap();
        let auth = bearer(&state, &member);
        let app = app!(state);

        let req = test::TestRequest::put()
            .uri(&format!("/api/users/{}", admin.id))
            .insert_header(auth.clone())
            .set_json(json!({ "username": "admin", "email": "bob@example.com" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/users/{}", admin.id))
            .insert_header(auth.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::put()
            .uri(&format!("/api/users/{}", member.id))
            .insert_header(auth)
            .set_json(json!({ "username": "robert", "email": "bob@example.com" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["username"], "robert");

        let stored = state.users.get(&admin.id.to_string()).await.unwrap();
        assert_eq!(stored.email, ADMIN_EMAIL);
    }

    #[actix_web::test]
    async fn test_navigation_tree_nests_children() {
        let (state, admin) = state_with_admin().await;
        let auth = bearer(&state, &admin);
        let app = app!(state);

        let req = test::TestRequest::post()
            .uri("/api/navigation")
            .insert_header(auth.clone())
            .set_json(json!({ "label": "Docs", "slug": "docs", "type": "internal", "order": 1 }))
            .to_request();
        let parent: Value = test::call_and_read_body_json(&app, req).await;
        let parent_id = parent["data"]["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri("/api/navigation")
            .insert_header(auth)
            .set_json(json!({
                "label": "Guide",
                "slug": "guide",
                "type": "internal",
                "order": 1,
                "parent_id": parent_id,
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::get().uri("/blog/navigation/tree").to_request();
        let tree: Value = test::call_and_read_body_json(&app, req).await;
        let roots = tree["data"]["roots"].as_array().unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0]["children"][0]["slug"], "guide");
    }
}
