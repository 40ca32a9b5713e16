mod common;

use common::{Fixture, nav};
use havamal_core::domain::{CascadePolicy, DeletePolicy, LinkSource, NavigationLink};
use havamal_core::{DomainError, RepoError};
use uuid::Uuid;

#[tokio::test]
async fn custom_item_round_trips() {
    let fx = Fixture::new();
    let mut input = nav("About", None);
    input.sort_order = 3;
    let created = fx.navigation.create(input).await.unwrap();

    let fetched = fx.navigation.get(&created.id.to_string()).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.link, NavigationLink::Custom);
    assert_eq!(fetched.parent_id, None);
    assert_eq!(fx.navigation.get_by_slug("about").await.unwrap().id, created.id);
}

#[tokio::test]
async fn blank_parent_means_root() {
    let fx = Fixture::new();
    let created = fx
        .navigation
        .create(nav("Home", Some(String::new())))
        .await
        .unwrap();
    assert_eq!(created.parent_id, None);
}

#[tokio::test]
async fn unknown_parent_is_rejected() {
    let fx = Fixture::new();
    let ghost = Uuid::new_v4();
    let err = fx
        .navigation
        .create(nav("Child", Some(ghost.to_string())))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::ParentNotFound(id) if id == ghost));
}

#[tokio::test]
async fn deleting_a_parent_orphans_children_by_default() {
    let fx = Fixture::new();
    let parent = fx.navigation.create(nav("Docs", None)).await.unwrap();
    let child = fx
        .navigation
        .create(nav("Guide", Some(parent.id.to_string())))
        .await
        .unwrap();

    fx.navigation.delete(&parent.id.to_string()).await.unwrap();

    let kept = fx.navigation.get(&child.id.to_string()).await.unwrap();
    assert_eq!(kept.parent_id, Some(parent.id));
    let tree = fx.navigation.tree().await.unwrap();
    let orphans: Vec<Uuid> = tree.orphans().iter().map(|n| n.id).collect();
    assert_eq!(orphans, [child.id]);
}

#[tokio::test]
async fn cascade_policy_deletes_subtree() {
    let fx = Fixture::with_policy(CascadePolicy {
        navigation_children: DeletePolicy::Cascade,
        ..CascadePolicy::default()
    });
    let root = fx.navigation.create(nav("Docs", None)).await.unwrap();
    let child = fx
        .navigation
        .create(nav("Guide", Some(root.id.to_string())))
        .await
        .unwrap();
    fx.navigation
        .create(nav("Chapter", Some(child.id.to_string())))
        .await
        .unwrap();
    let other = fx.navigation.create(nav("Blog", None)).await.unwrap();

    fx.navigation.delete(&root.id.to_string()).await.unwrap();

    let left = fx.navigation.list().await.unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].id, other.id);
}

#[tokio::test]
async fn restrict_policy_refuses_parents() {
    let fx = Fixture::with_policy(CascadePolicy {
        navigation_children: DeletePolicy::Restrict,
        ..CascadePolicy::default()
    });
    let root = fx.navigation.create(nav("Docs", None)).await.unwrap();
    let leaf = fx
        .navigation
        .create(nav("Guide", Some(root.id.to_string())))
        .await
        .unwrap();

    let err = fx.navigation.delete(&root.id.to_string()).await.unwrap_err();
    assert!(matches!(err, DomainError::HasDependents { .. }));

    fx.navigation.delete(&leaf.id.to_string()).await.unwrap();
    fx.navigation.delete(&root.id.to_string()).await.unwrap();
}

#[tokio::test]
async fn reparenting_under_a_descendant_is_a_cycle() {
    let fx = Fixture::new();
    let a = fx.navigation.create(nav("A", None)).await.unwrap();
    let b = fx
        .navigation
        .create(nav("B", Some(a.id.to_string())))
        .await
        .unwrap();
    let c = fx
        .navigation
        .create(nav("C", Some(b.id.to_string())))
        .await
        .unwrap();

    let err = fx
        .navigation
        .update(&a.id.to_string(), nav("A", Some(c.id.to_string())))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::CycleDetected { node, parent } if node == a.id && parent == c.id
    ));

    let err = fx
        .navigation
        .update(&a.id.to_string(), nav("A", Some(a.id.to_string())))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::CycleDetected { .. }));

    let moved = fx
        .navigation
        .update(&c.id.to_string(), nav("C", Some(a.id.to_string())))
        .await
        .unwrap();
    assert_eq!(moved.parent_id, Some(a.id));
}

#[tokio::test]
async fn mismatched_link_is_invalid() {
    let fx = Fixture::new();
    let mut input = nav("Broken", None);
    input.link_source = LinkSource::Category;

    let err = fx.navigation.create(input).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn category_link_must_reference_a_category() {
    let fx = Fixture::new();
    let mut input = nav("Rust", None);
    input.link_source = LinkSource::Category;
    input.category_id = Some(Uuid::new_v4().to_string());

    let err = fx.navigation.create(input).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Persistence(RepoError::Constraint(_))
    ));

    let rust = fx.category("Rust", "rust", 1).await;
    let mut input = nav("Rust", None);
    input.link_source = LinkSource::Category;
    input.category_id = Some(rust.id.to_string());
    let item = fx.navigation.create(input).await.unwrap();
    assert_eq!(item.link, NavigationLink::Category(rust.id));
}

#[tokio::test]
async fn update_unknown_item_is_not_found() {
    let fx = Fixture::new();
    let err = fx
        .navigation
        .update(&Uuid::new_v4().to_string(), nav("X", None))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}
