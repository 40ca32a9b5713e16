//! In-memory store - used when no database is configured, and by tests.
//!
//! One instance backs every repository port. It enforces the same unique and
//! foreign key contracts as the PostgreSQL schema, so services behave the same
//! against either backend. Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use havamal_core::domain::{
    Category, NavigationItem, NavigationLink, Post, PostCategory, PostDetail, PostStatus,
    PostVersion, User, join_details, mask_email,
};
use havamal_core::error::RepoError;
use havamal_core::ports::{
    BaseRepository, CategoryRepository, NavigationRepository, PostCategoryRepository, PostFilter,
    PostRepository, PostVersionRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
    categories: HashMap<Uuid, Category>,
    links: Vec<PostCategory>,
    navigation: HashMap<Uuid, NavigationItem>,
    versions: HashMap<Uuid, PostVersion>,
}

fn unique_violation(table: &str, column: &str, value: &str) -> RepoError {
    RepoError::Constraint(format!(
        "duplicate key value violates unique constraint {table}_{column}_key ({value})"
    ))
}

fn foreign_key_violation(table: &str, column: &str, value: Uuid) -> RepoError {
    RepoError::Constraint(format!("{table}.{column} violates foreign key constraint ({value})"))
}

fn still_referenced(table: &str, id: Uuid, by: &str) -> RepoError {
    RepoError::Constraint(format!("{table} {id} is still referenced by foreign key from {by}"))
}

/// A row type held in [`Tables`], with the integrity rules of its table.
trait Stored: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;
    fn table(tables: &Tables) -> &HashMap<Uuid, Self>;
    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self>;
    /// Unique and foreign key checks for writing `self`.
    fn check_write(&self, tables: &Tables) -> Result<(), RepoError>;
    /// Checks that nothing still references the row before it is removed.
    fn check_delete(id: Uuid, tables: &Tables) -> Result<(), RepoError>;
}

impl Stored for User {
    fn id(&self) -> Uuid {
        self.id
    }

    fn table(tables: &Tables) -> &HashMap<Uuid, Self> {
        &tables.users
    }

    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self> {
        &mut tables.users
    }

    fn check_write(&self, tables: &Tables) -> Result<(), RepoError> {
        if tables
            .users
            .values()
            .any(|u| u.id != self.id && u.email == self.email)
        {
            return Err(unique_violation("users", "email", &mask_email(&self.email)));
        }
        Ok(())
    }

    fn check_delete(id: Uuid, tables: &Tables) -> Result<(), RepoError> {
        if tables.posts.values().any(|p| p.author_id == id) {
            return Err(still_referenced("users", id, "posts"));
        }
        Ok(())
    }
}

impl Stored for Post {
    fn id(&self) -> Uuid {
        self.id
    }

    fn table(tables: &Tables) -> &HashMap<Uuid, Self> {
        &tables.posts
    }

    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self> {
        &mut tables.posts
    }

    fn check_write(&self, tables: &Tables) -> Result<(), RepoError> {
        if tables
            .posts
            .values()
            .any(|p| p.id != self.id && p.slug == self.slug)
        {
            return Err(unique_violation("posts", "slug", &self.slug));
        }
        if !tables.users.contains_key(&self.author_id) {
            return Err(foreign_key_violation("posts", "author_id", self.author_id));
        }
        Ok(())
    }

    fn check_delete(id: Uuid, tables: &Tables) -> Result<(), RepoError> {
        if tables.links.iter().any(|l| l.post_id == id) {
            return Err(still_referenced("posts", id, "post_categories"));
        }
        if tables.versions.values().any(|v| v.post_id == id) {
            return Err(still_referenced("posts", id, "post_versions"));
        }
        if tables
            .navigation
            .values()
            .any(|n| n.link.post_id() == Some(id))
        {
            return Err(still_referenced("posts", id, "navigation"));
        }
        Ok(())
    }
}

impl Stored for Category {
    fn id(&self) -> Uuid {
        self.id
    }

    fn table(tables: &Tables) -> &HashMap<Uuid, Self> {
        &tables.categories
    }

    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self> {
        &mut tables.categories
    }

    fn check_write(&self, tables: &Tables) -> Result<(), RepoError> {
        if tables
            .categories
            .values()
            .any(|c| c.id != self.id && c.slug == self.slug)
        {
            return Err(unique_violation("categories", "slug", &self.slug));
        }
        Ok(())
    }

    fn check_delete(id: Uuid, tables: &Tables) -> Result<(), RepoError> {
        if tables.links.iter().any(|l| l.category_id == id) {
            return Err(still_referenced("categories", id, "post_categories"));
        }
        if tables
            .navigation
            .values()
            .any(|n| n.link.category_id() == Some(id))
        {
            return Err(still_referenced("categories", id, "navigation"));
        }
        Ok(())
    }
}

impl Stored for NavigationItem {
    fn id(&self) -> Uuid {
        self.id
    }

    fn table(tables: &Tables) -> &HashMap<Uuid, Self> {
        &tables.navigation
    }

    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self> {
        &mut tables.navigation
    }

    // parent_id carries no foreign key.
    fn check_write(&self, tables: &Tables) -> Result<(), RepoError> {
        if tables
            .navigation
            .values()
            .any(|n| n.id != self.id && n.slug == self.slug)
        {
            return Err(unique_violation("navigation", "slug", &self.slug));
        }
        if let Some(category_id) = self.link.category_id() {
            if !tables.categories.contains_key(&category_id) {
                return Err(foreign_key_violation("navigation", "category_id", category_id));
            }
        }
        if let Some(post_id) = self.link.post_id() {
            if !tables.posts.contains_key(&post_id) {
                return Err(foreign_key_violation("navigation", "post_id", post_id));
            }
        }
        Ok(())
    }

    fn check_delete(_id: Uuid, _tables: &Tables) -> Result<(), RepoError> {
        Ok(())
    }
}

impl Stored for PostVersion {
    fn id(&self) -> Uuid {
        self.id
    }

    fn table(tables: &Tables) -> &HashMap<Uuid, Self> {
        &tables.versions
    }

    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self> {
        &mut tables.versions
    }

    fn check_write(&self, tables: &Tables) -> Result<(), RepoError> {
        if !tables.posts.contains_key(&self.post_id) {
            return Err(foreign_key_violation("post_versions", "post_id", self.post_id));
        }
        Ok(())
    }

    fn check_delete(_id: Uuid, _tables: &Tables) -> Result<(), RepoError> {
        Ok(())
    }
}

/// In-memory implementation of every repository port, behind one async RwLock.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn get<T: Stored>(&self, id: Uuid) -> Option<T> {
        let tables = self.tables.read().await;
        T::table(&tables).get(&id).cloned()
    }

    async fn all<T: Stored>(&self) -> Vec<T> {
        let tables = self.tables.read().await;
        T::table(&tables).values().cloned().collect()
    }

    async fn insert_row<T: Stored>(&self, row: T) -> Result<T, RepoError> {
        let mut tables = self.tables.write().await;
        if T::table(&tables).contains_key(&row.id()) {
            return Err(RepoError::Constraint(format!(
                "duplicate key value violates primary key ({})",
                row.id()
            )));
        }
        row.check_write(&tables)?;
        T::table_mut(&mut tables).insert(row.id(), row.clone());
        Ok(row)
    }

    async fn update_row<T: Stored>(&self, row: T) -> Result<T, RepoError> {
        let mut tables = self.tables.write().await;
        if !T::table(&tables).contains_key(&row.id()) {
            return Err(RepoError::NotFound);
        }
        row.check_write(&tables)?;
        T::table_mut(&mut tables).insert(row.id(), row.clone());
        Ok(row)
    }

    async fn delete_row<T: Stored>(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if !T::table(&tables).contains_key(&id) {
            return Err(RepoError::NotFound);
        }
        T::check_delete(id, &tables)?;
        T::table_mut(&mut tables).remove(&id);
        Ok(())
    }
}

macro_rules! stored_repository {
    ($($ty:ty),* $(,)?) => {
        $(
            #[async_trait]
            impl BaseRepository<$ty, Uuid> for InMemoryStore {
                async fn find_by_id(&self, id: Uuid) -> Result<Option<$ty>, RepoError> {
                    Ok(self.get::<$ty>(id).await)
                }

                async fn find_all(&self) -> Result<Vec<$ty>, RepoError> {
                    Ok(self.all::<$ty>().await)
                }

                async fn insert(&self, entity: $ty) -> Result<$ty, RepoError> {
                    self.insert_row(entity).await
                }

                async fn update(&self, entity: $ty) -> Result<$ty, RepoError> {
                    self.update_row(entity).await
                }

                async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
                    self.delete_row::<$ty>(id).await
                }
            }
        )*
    };
}

stored_repository!(User, Post, Category, NavigationItem, PostVersion);

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find_details(&self, filter: PostFilter) -> Result<Vec<PostDetail>, RepoError> {
        let tables = self.tables.read().await;

        let posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| match &filter {
                PostFilter::All | PostFilter::Category(_) => true,
                PostFilter::Id(id) => p.id == *id,
                PostFilter::Published => p.status == PostStatus::Published,
                PostFilter::Author(id) => p.author_id == *id,
                PostFilter::Slug(slug) => p.slug == *slug,
            })
            .cloned()
            .collect();

        let categories: Vec<Category> = match &filter {
            PostFilter::Category(key) => tables
                .categories
                .values()
                .filter(|c| c.matches_key(key.trim()))
                .cloned()
                .collect(),
            _ => tables.categories.values().cloned().collect(),
        };

        let users: Vec<User> = tables.users.values().cloned().collect();

        Ok(join_details(&posts, &tables.links, &categories, &users))
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.categories.values().find(|c| c.slug == slug).cloned())
    }
}

#[async_trait]
impl PostCategoryRepository for InMemoryStore {
    async fn add(&self, link: PostCategory) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&link.post_id) {
            return Err(foreign_key_violation("post_categories", "post_id", link.post_id));
        }
        if !tables.categories.contains_key(&link.category_id) {
            return Err(foreign_key_violation(
                "post_categories",
                "category_id",
                link.category_id,
            ));
        }
        if tables.links.contains(&link) {
            return Err(RepoError::Constraint(format!(
                "duplicate key value violates primary key post_categories_pkey ({}, {})",
                link.post_id, link.category_id
            )));
        }
        tables.links.push(link);
        Ok(())
    }

    async fn remove(&self, link: PostCategory) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let before = tables.links.len();
        tables.links.retain(|l| *l != link);
        if tables.links.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<PostCategory>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .links
            .iter()
            .filter(|l| l.post_id == post_id)
            .copied()
            .collect())
    }

    async fn remove_for_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        let mut tables = self.tables.write().await;
        let before = tables.links.len();
        tables.links.retain(|l| l.post_id != post_id);
        Ok((before - tables.links.len()) as u64)
    }

    async fn remove_for_category(&self, category_id: Uuid) -> Result<u64, RepoError> {
        let mut tables = self.tables.write().await;
        let before = tables.links.len();
        tables.links.retain(|l| l.category_id != category_id);
        Ok((before - tables.links.len()) as u64)
    }
}

#[async_trait]
impl NavigationRepository for InMemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<NavigationItem>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.navigation.values().find(|n| n.slug == slug).cloned())
    }

    async fn find_by_link(&self, link: NavigationLink) -> Result<Vec<NavigationItem>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .navigation
            .values()
            .filter(|n| n.link == link)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PostVersionRepository for InMemoryStore {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<PostVersion>, RepoError> {
        let tables = self.tables.read().await;
        let mut versions: Vec<PostVersion> = tables
            .versions
            .values()
            .filter(|v| v.post_id == post_id)
            .cloned()
            .collect();
        versions.sort_by_key(|v| v.version_number);
        Ok(versions)
    }

    async fn delete_for_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        let mut tables = self.tables.write().await;
        let before = tables.versions.len();
        tables.versions.retain(|_, v| v.post_id != post_id);
        Ok((before - tables.versions.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn author() -> User {
        User::new("ada".into(), "ada@example.com".into(), "hash".into())
    }

    fn post(author_id: Uuid, slug: &str) -> Post {
        let now = Utc::now();
        Post {
            id: Uuid::new_v4(),
            title: slug.into(),
            slug: slug.into(),
            summary: String::new(),
            content: String::new(),
            status: PostStatus::Draft,
            published_at: now,
            updated_at: now,
            author_id,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = InMemoryStore::new();
        store.insert(author()).await.unwrap();

        let err = store.insert(author()).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_post_requires_existing_author() {
        let store = InMemoryStore::new();
        let err = store.insert(post(Uuid::new_v4(), "orphan")).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_update_unknown_row_is_not_found() {
        let store = InMemoryStore::new();
        let err = store.update(author()).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
    }

    #[tokio::test]
    async fn test_referenced_post_cannot_be_deleted() {
        let store = InMemoryStore::new();
        let user = store.insert(author()).await.unwrap();
        let post = store.insert(post(user.id, "first")).await.unwrap();
        let category = store
            .insert(Category::new("Rust".into(), "rust".into(), String::new(), 1))
            .await
            .unwrap();
        store
            .add(PostCategory::new(post.id, category.id))
            .await
            .unwrap();

        let err = BaseRepository::<Post, Uuid>::delete(&store, post.id)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));

        assert_eq!(store.remove_for_post(post.id).await.unwrap(), 1);
        BaseRepository::<Post, Uuid>::delete(&store, post.id)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_find_details_by_category_slug() {
        let store = InMemoryStore::new();
        let user = store.insert(author()).await.unwrap();
        let post = store.insert(post(user.id, "first")).await.unwrap();
        let rust = store
            .insert(Category::new("Rust".into(), "rust".into(), String::new(), 1))
            .await
            .unwrap();
        let misc = store
            .insert(Category::new("Misc".into(), "misc".into(), String::new(), 2))
            .await
            .unwrap();
        store.add(PostCategory::new(post.id, rust.id)).await.unwrap();
        store.add(PostCategory::new(post.id, misc.id)).await.unwrap();

        let all = store.find_details(PostFilter::All).await.unwrap();
        assert_eq!(all.len(), 2);

        let rows = store
            .find_details(PostFilter::Category("rust".into()))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category_id, rust.id);
        assert_eq!(rows[0].author_name, "ada");
    }
}
