//! Services wired to one in-memory store.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use havamal_core::domain::{
    CascadePolicy, Category, LinkSource, NavigationKind, PostStatus, Role, User,
};
use havamal_core::ports::PasswordService;
use havamal_core::services::{
    CategoryInput, CategoryService, IdentityResolver, NavigationInput, NavigationService, NewPost,
    PostChanges, PostService, UserInput, UserService, VersionService,
};
use havamal_infra::{Argon2PasswordService, InMemoryStore};

pub struct Fixture {
    pub store: Arc<InMemoryStore>,
    pub posts: PostService,
    pub categories: CategoryService,
    pub navigation: NavigationService,
    pub versions: VersionService,
    pub users: UserService,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_policy(CascadePolicy::default())
    }

    pub fn with_policy(policy: CascadePolicy) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
        let identity = IdentityResolver::new(store.clone());

        Self {
            posts: PostService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                store.clone(),
                identity,
                policy,
            ),
            categories: CategoryService::new(store.clone(), store.clone(), store.clone()),
            navigation: NavigationService::new(store.clone(), policy),
            versions: VersionService::new(store.clone()),
            users: UserService::new(store.clone(), passwords),
            store,
        }
    }

    pub async fn author(&self, username: &str) -> User {
        self.users
            .create(
                Role::Admin,
                UserInput {
                    username: username.to_string(),
                    email: format!("{username}@example.com"),
                    password: "long-enough-password".to_string(),
                    is_active: None,
                },
            )
            .await
            .unwrap()
    }

    pub async fn category(&self, name: &str, slug: &str, order: i32) -> Category {
        self.categories
            .create(CategoryInput {
                name: name.to_string(),
                slug: slug.to_string(),
                description: format!("All about {name}"),
                sort_order: order,
            })
            .await
            .unwrap()
    }
}

pub fn at(minutes_ago: i64) -> DateTime<Utc> {
    Utc::now() - TimeDelta::minutes(minutes_ago)
}

pub fn new_post(slug: &str) -> NewPost {
    NewPost {
        title: slug.replace('-', " "),
        slug: slug.to_string(),
        summary: String::new(),
        content: format!("Body of {slug}"),
        status: PostStatus::Published,
        published_at: at(0),
        updated_at: at(0),
        author_id: None,
        author_email: None,
        category_id: None,
    }
}

pub fn changes(slug: &str) -> PostChanges {
    PostChanges {
        title: "Updated".to_string(),
        slug: slug.to_string(),
        summary: "changed".to_string(),
        content: "new body".to_string(),
        status: PostStatus::Published,
        published_at: at(0),
        updated_at: at(0),
        author_id: None,
    }
}

pub fn nav(label: &str, parent: Option<String>) -> NavigationInput {
    NavigationInput {
        label: label.to_string(),
        slug: label.to_lowercase(),
        kind: NavigationKind::Internal,
        sort_order: 0,
        parent_id: parent,
        link_source: LinkSource::Custom,
        category_id: None,
        post_id: None,
    }
}
