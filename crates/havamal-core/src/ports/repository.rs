use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Category, NavigationItem, NavigationLink, Post, PostCategory, PostDetail, PostVersion, User,
};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Every stored entity.
    async fn find_all(&self) -> Result<Vec<T>, RepoError>;

    /// Store a new entity. Fails with `Constraint` on a key or unique clash.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Replace an existing entity. Fails with `NotFound` when the id is unknown.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Selection for the joined post read model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Id(Uuid),
    Published,
    Author(Uuid),
    Slug(String),
    /// Category id text or category slug.
    Category(String),
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Joined rows (post x category x author) matching `filter`.
    async fn find_details(&self, filter: PostFilter) -> Result<Vec<PostDetail>, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;
}

/// Post/category join table. Pairs are unique; integrity of both ends is the store's.
#[async_trait]
pub trait PostCategoryRepository: Send + Sync {
    /// Insert a pair. A duplicate pair fails with `Constraint`.
    async fn add(&self, link: PostCategory) -> Result<(), RepoError>;

    /// Remove a pair. Fails with `NotFound` when it does not exist.
    async fn remove(&self, link: PostCategory) -> Result<(), RepoError>;

    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<PostCategory>, RepoError>;

    /// Remove every pair for a post, returning how many were removed.
    async fn remove_for_post(&self, post_id: Uuid) -> Result<u64, RepoError>;

    /// Remove every pair for a category, returning how many were removed.
    async fn remove_for_category(&self, category_id: Uuid) -> Result<u64, RepoError>;
}

/// Navigation item repository. Results are flat; hierarchy is built by callers.
#[async_trait]
pub trait NavigationRepository: BaseRepository<NavigationItem, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<NavigationItem>, RepoError>;

    /// Entries pointing at `link`'s target. For `Custom`, every custom entry.
    async fn find_by_link(&self, link: NavigationLink) -> Result<Vec<NavigationItem>, RepoError>;
}

/// Post version repository.
#[async_trait]
pub trait PostVersionRepository: BaseRepository<PostVersion, Uuid> {
    /// Versions of one post, ordered by version number.
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<PostVersion>, RepoError>;

    /// Remove every version of a post, returning how many were removed.
    async fn delete_for_post(&self, post_id: Uuid) -> Result<u64, RepoError>;
}
