mod common;

use common::{Fixture, new_post};
use havamal_core::services::VersionInput;
use havamal_core::{DomainError, RepoError};
use uuid::Uuid;

fn version(post_id: Uuid, number: i32) -> VersionInput {
    VersionInput {
        version: format!("v{number}"),
        post_id: post_id.to_string(),
        version_number: number,
        content: format!("revision {number}"),
    }
}

async fn post(fx: &Fixture) -> Uuid {
    let ada = fx.author("ada").await;
    let mut input = new_post("versioned");
    input.author_id = Some(ada.id.to_string());
    fx.posts.create(input).await.unwrap().post.id
}

#[tokio::test]
async fn versions_list_by_number() {
    let fx = Fixture::new();
    let post_id = post(&fx).await;
    fx.versions.create(version(post_id, 2)).await.unwrap();
    fx.versions.create(version(post_id, 1)).await.unwrap();

    let numbers: Vec<i32> = fx
        .versions
        .list_for_post(&post_id.to_string())
        .await
        .unwrap()
        .into_iter()
        .map(|v| v.version_number)
        .collect();
    assert_eq!(numbers, [1, 2]);
    assert_eq!(fx.versions.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn update_preserves_created_at() {
    let fx = Fixture::new();
    let post_id = post(&fx).await;
    let original = fx.versions.create(version(post_id, 1)).await.unwrap();

    let mut input = version(post_id, 1);
    input.content = "rewritten".to_string();
    let updated = fx
        .versions
        .update(&original.id.to_string(), input)
        .await
        .unwrap();

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.created_at, original.created_at);
    assert_eq!(updated.content, "rewritten");
}

#[tokio::test]
async fn version_needs_existing_post() {
    let fx = Fixture::new();
    let err = fx
        .versions
        .create(version(Uuid::new_v4(), 1))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Persistence(RepoError::Constraint(_))
    ));
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let fx = Fixture::new();
    let post_id = post(&fx).await;
    let created = fx.versions.create(version(post_id, 1)).await.unwrap();
    let id = created.id.to_string();

    fx.versions.delete(&id).await.unwrap();

    assert!(matches!(
        fx.versions.get(&id).await.unwrap_err(),
        DomainError::NotFound { .. }
    ));
    assert!(matches!(
        fx.versions.delete(&id).await.unwrap_err(),
        DomainError::NotFound { .. }
    ));
}

#[tokio::test]
async fn update_rejects_malformed_post_id_before_lookup() {
    let fx = Fixture::new();
    let mut input = version(Uuid::new_v4(), 1);
    input.post_id = "not-a-uuid".to_string();

    let err = fx
        .versions
        .update(&Uuid::new_v4().to_string(), input)
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::InvalidIdentifier(_)));
}
