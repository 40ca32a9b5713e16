mod common;

use common::Fixture;
use havamal_core::DomainError;
use havamal_core::domain::Role;
use havamal_core::services::UserInput;

fn input(email: &str, password: &str) -> UserInput {
    UserInput {
        username: "grace".to_string(),
        email: email.to_string(),
        password: password.to_string(),
        is_active: None,
    }
}

#[tokio::test]
async fn members_cannot_create_users() {
    let fx = Fixture::new();
    let err = fx
        .users
        .create(Role::Member, input("grace@example.com", "long-enough"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));

    let err = fx.users.list(Role::Member).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));
}

#[tokio::test]
async fn admins_create_regular_users() {
    let fx = Fixture::new();
    let user = fx
        .users
        .create(Role::Admin, input("grace@example.com", "long-enough"))
        .await
        .unwrap();

    assert!(!user.is_admin);
    assert!(user.is_active);
    assert_ne!(user.password_hash, "long-enough");
    assert_eq!(fx.users.list(Role::Admin).await.unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_input_is_rejected() {
    let fx = Fixture::new();
    let err = fx
        .users
        .create(Role::Admin, input("no-at-sign", "long-enough"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = fx
        .users
        .create(Role::Admin, input("grace@example.com", "short"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let fx = Fixture::new();
    fx.users
        .create(Role::Admin, input("grace@example.com", "long-enough"))
        .await
        .unwrap();

    let err = fx
        .users
        .create(Role::Admin, input("grace@example.com", "long-enough"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Duplicate(_)));
}

#[tokio::test]
async fn authenticate_checks_password_and_status() {
    let fx = Fixture::new();
    let user = fx
        .users
        .create(Role::Admin, input("grace@example.com", "long-enough"))
        .await
        .unwrap();

    let ok = fx
        .users
        .authenticate("grace@example.com", "long-enough")
        .await
        .unwrap();
    assert_eq!(ok.id, user.id);

    for (email, password) in [
        ("grace@example.com", "wrong-password"),
        ("nobody@example.com", "long-enough"),
    ] {
        let err = fx.users.authenticate(email, password).await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized));
    }

    let mut deactivate = input("grace@example.com", "");
    deactivate.is_active = Some(false);
    let updated = fx
        .users
        .update(&user.id.to_string(), deactivate)
        .await
        .unwrap();
    assert_eq!(updated.password_hash, user.password_hash);

    let err = fx
        .users
        .authenticate("grace@example.com", "long-enough")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized));
}

#[tokio::test]
async fn ensure_admin_is_idempotent() {
    let fx = Fixture::new();
    let first = fx
        .users
        .ensure_admin("admin", "admin@example.com", "bootstrap-password")
        .await
        .unwrap();
    let second = fx
        .users
        .ensure_admin("admin", "admin@example.com", "bootstrap-password")
        .await
        .unwrap();

    assert!(first.is_admin);
    assert_eq!(first.id, second.id);
    assert_eq!(first.role(), Role::Admin);
}

#[tokio::test]
async fn authors_with_posts_cannot_be_deleted() {
    let fx = Fixture::new();
    let ada = fx.author("ada").await;
    let mut post = common::new_post("kept");
    post.author_id = Some(ada.id.to_string());
    fx.posts.create(post).await.unwrap();

    let err = fx.users.delete(&ada.id.to_string()).await.unwrap_err();
    assert!(matches!(err, DomainError::Persistence(_)));
}

#[tokio::test]
async fn update_rejects_short_password_before_lookup() {
    let fx = Fixture::new();

    let err = fx
        .users
        .update(&uuid::Uuid::new_v4().to_string(), input("grace@example.com", "short"))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Validation(_)));
}
