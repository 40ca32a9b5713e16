//! Post manager: authorship, initial category and delete policy around posts.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::identity::IdentityResolver;
use crate::domain::{
    CascadePolicy, DeletePolicy, NavigationLink, Post, PostCategory, PostDetail, PostStatus,
    parse_id, supplied,
};
use crate::error::{DomainError, RepoError};
use crate::ports::{
    NavigationRepository, PostCategoryRepository, PostFilter, PostRepository,
    PostVersionRepository,
};

fn draft() -> PostStatus {
    PostStatus::Draft
}

/// Fields for a new post.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "draft")]
    pub status: PostStatus,
    #[serde(default = "Utc::now")]
    pub published_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    pub author_id: Option<String>,
    #[serde(alias = "author")]
    pub author_email: Option<String>,
    #[serde(alias = "categoryId")]
    pub category_id: Option<String>,
}

/// Replacement fields for an existing post.
#[derive(Debug, Clone, Deserialize)]
pub struct PostChanges {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "draft")]
    pub status: PostStatus,
    #[serde(default = "Utc::now")]
    pub published_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    pub author_id: Option<String>,
}

/// What happened to the category requested alongside a new post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CategoryAttachment {
    NotRequested,
    Attached { category_id: Uuid },
    Failed { category_id: String, reason: String },
}

/// Result of post creation: the stored post plus the separate attach outcome.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedPost {
    pub post: Post,
    pub category: CategoryAttachment,
}

/// Refuse a post delete that `policy` would not clear `count` dependents for.
/// `Orphan` leaves them to the store, whose foreign keys reject the delete.
fn check_dependents(
    policy: DeletePolicy,
    count: usize,
    what: &str,
    id: Uuid,
) -> Result<(), DomainError> {
    if count == 0 {
        return Ok(());
    }
    match policy {
        DeletePolicy::Cascade => Ok(()),
        DeletePolicy::Restrict => Err(DomainError::HasDependents {
            entity_type: "Post",
            id,
        }),
        DeletePolicy::Orphan => Err(DomainError::Persistence(RepoError::Constraint(format!(
            "post {id} still has {count} {what}"
        )))),
    }
}

/// Creates, updates, deletes and reads posts.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    links: Arc<dyn PostCategoryRepository>,
    versions: Arc<dyn PostVersionRepository>,
    navigation: Arc<dyn NavigationRepository>,
    identity: IdentityResolver,
    policy: CascadePolicy,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        links: Arc<dyn PostCategoryRepository>,
        versions: Arc<dyn PostVersionRepository>,
        navigation: Arc<dyn NavigationRepository>,
        identity: IdentityResolver,
        policy: CascadePolicy,
    ) -> Self {
        Self {
            posts,
            links,
            versions,
            navigation,
            identity,
            policy,
        }
    }

    /// Store a new post, then try to attach the requested category.
    ///
    /// Only author resolution and the post write itself can fail the call.
    pub async fn create(&self, input: NewPost) -> Result<CreatedPost, DomainError> {
        let author_id = self
            .identity
            .resolve(input.author_id.as_deref(), input.author_email.as_deref())
            .await?;

        let post = self
            .posts
            .insert(Post {
                id: Uuid::new_v4(),
                title: input.title,
                slug: input.slug,
                summary: input.summary,
                content: input.content,
                status: input.status,
                published_at: input.published_at,
                updated_at: input.updated_at,
                author_id,
            })
            .await?;

        tracing::info!(post_id = %post.id, slug = %post.slug, "Post created");

        let category = match supplied(input.category_id.as_deref()) {
            None => CategoryAttachment::NotRequested,
            Some(raw) => self.attach_initial_category(post.id, raw).await,
        };

        Ok(CreatedPost { post, category })
    }

    async fn attach_initial_category(&self, post_id: Uuid, raw: &str) -> CategoryAttachment {
        let attached = match parse_id(raw) {
            Ok(category_id) => self
                .links
                .add(PostCategory::new(post_id, category_id))
                .await
                .map(|()| category_id)
                .map_err(DomainError::from),
            Err(err) => Err(err),
        };

        match attached {
            Ok(category_id) => CategoryAttachment::Attached { category_id },
            Err(err) => {
                tracing::warn!(
                    post_id = %post_id,
                    category_id = raw,
                    error = %err,
                    "Post stored without its requested category"
                );
                CategoryAttachment::Failed {
                    category_id: raw.to_string(),
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Replace a post's fields. The author is kept unless a valid new id is given.
    pub async fn update(&self, id: &str, changes: PostChanges) -> Result<Post, DomainError> {
        let id = parse_id(id)?;
        let existing = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))?;

        let author_id = match supplied(changes.author_id.as_deref()) {
            None => existing.author_id,
            Some(raw) => match parse_id(raw) {
                Ok(author_id) => author_id,
                Err(_) => {
                    tracing::warn!(post_id = %id, author_id = raw, "Ignoring malformed author id");
                    existing.author_id
                }
            },
        };

        let post = Post {
            id,
            title: changes.title,
            slug: changes.slug,
            summary: changes.summary,
            content: changes.content,
            status: changes.status,
            published_at: changes.published_at,
            updated_at: changes.updated_at,
            author_id,
        };

        let post = self
            .posts
            .update(post)
            .await
            .map_err(|e| DomainError::from_keyed(e, "Post", id))?;
        tracing::info!(post_id = %post.id, "Post updated");
        Ok(post)
    }

    /// Delete a post, applying the configured policy to its associations and versions.
    ///
    /// Every blocker is checked before the first write, so a refused delete
    /// leaves the post's links and history in place.
    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let id = parse_id(id)?;

        if !self.navigation.find_by_link(NavigationLink::Post(id)).await?.is_empty() {
            return Err(DomainError::HasDependents {
                entity_type: "Post",
                id,
            });
        }

        let links = self.links.find_by_post(id).await?.len();
        let versions = self.versions.find_by_post(id).await?.len();
        check_dependents(self.policy.post_categories, links, "category links", id)?;
        check_dependents(self.policy.post_versions, versions, "versions", id)?;

        if self.policy.post_categories == DeletePolicy::Cascade && links > 0 {
            let removed = self.links.remove_for_post(id).await?;
            tracing::debug!(post_id = %id, removed, "Detached categories");
        }
        if self.policy.post_versions == DeletePolicy::Cascade && versions > 0 {
            let removed = self.versions.delete_for_post(id).await?;
            tracing::debug!(post_id = %id, removed, "Deleted versions");
        }

        self.posts
            .delete(id)
            .await
            .map_err(|e| DomainError::from_keyed(e, "Post", id))?;
        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<PostDetail, DomainError> {
        let id = parse_id(id)?;
        self.first(PostFilter::Id(id), id).await
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<PostDetail, DomainError> {
        self.first(PostFilter::Slug(slug.to_string()), slug).await
    }

    pub async fn list(&self) -> Result<Vec<PostDetail>, DomainError> {
        Ok(self.posts.find_details(PostFilter::All).await?)
    }

    pub async fn list_published(&self) -> Result<Vec<PostDetail>, DomainError> {
        Ok(self.posts.find_details(PostFilter::Published).await?)
    }

    pub async fn list_by_author(&self, author_id: &str) -> Result<Vec<PostDetail>, DomainError> {
        let author_id = parse_id(author_id)?;
        Ok(self.posts.find_details(PostFilter::Author(author_id)).await?)
    }

    /// Posts filed under the category with this id or slug. Unknown keys give an empty list.
    pub async fn list_by_category(&self, category: &str) -> Result<Vec<PostDetail>, DomainError> {
        Ok(self
            .posts
            .find_details(PostFilter::Category(category.to_string()))
            .await?)
    }

    async fn first(
        &self,
        filter: PostFilter,
        key: impl ToString,
    ) -> Result<PostDetail, DomainError> {
        self.posts
            .find_details(filter)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::not_found("Post", key))
    }
}
