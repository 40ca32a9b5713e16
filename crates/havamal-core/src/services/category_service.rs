//! Categories and their many-to-many association with posts.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;

use crate::domain::{Category, NavigationLink, PostCategory, parse_id};
use crate::error::DomainError;
use crate::ports::{CategoryRepository, NavigationRepository, PostCategoryRepository};

/// Fields accepted when creating or replacing a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "order")]
    pub sort_order: i32,
}

pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
    links: Arc<dyn PostCategoryRepository>,
    navigation: Arc<dyn NavigationRepository>,
}

impl CategoryService {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        links: Arc<dyn PostCategoryRepository>,
        navigation: Arc<dyn NavigationRepository>,
    ) -> Self {
        Self {
            categories,
            links,
            navigation,
        }
    }

    pub async fn create(&self, input: CategoryInput) -> Result<Category, DomainError> {
        let category = Category::new(input.name, input.slug, input.description, input.sort_order);
        let category = self.categories.insert(category).await?;
        tracing::info!(category_id = %category.id, slug = %category.slug, "Category created");
        Ok(category)
    }

    /// All categories in display order.
    pub async fn list(&self) -> Result<Vec<Category>, DomainError> {
        let mut categories = self.categories.find_all().await?;
        categories
            .sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.name.cmp(&b.name)));
        Ok(categories)
    }

    pub async fn get(&self, id: &str) -> Result<Category, DomainError> {
        let id = parse_id(id)?;
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Category", id))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Category, DomainError> {
        self.categories
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Category", slug))
    }

    pub async fn update(&self, id: &str, input: CategoryInput) -> Result<Category, DomainError> {
        let existing = self.get(id).await?;
        let category = Category {
            name: input.name,
            slug: input.slug,
            description: input.description,
            sort_order: input.sort_order,
            updated_at: Utc::now(),
            ..existing
        };

        let id = category.id;
        self.categories
            .update(category)
            .await
            .map_err(|e| DomainError::from_keyed(e, "Category", id))
    }

    /// Delete a category. Its post associations are detached first; a menu
    /// entry linking to it refuses the delete before anything is detached.
    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let id = parse_id(id)?;
        if !self.navigation.find_by_link(NavigationLink::Category(id)).await?.is_empty() {
            return Err(DomainError::HasDependents {
                entity_type: "Category",
                id,
            });
        }

        let detached = self.links.remove_for_category(id).await?;
        self.categories
            .delete(id)
            .await
            .map_err(|e| DomainError::from_keyed(e, "Category", id))?;
        tracing::info!(category_id = %id, detached, "Category deleted");
        Ok(())
    }

    /// File a post under a category. Both ends are checked by the store, not here.
    pub async fn attach(
        &self,
        post_id: &str,
        category_id: &str,
    ) -> Result<PostCategory, DomainError> {
        let link = PostCategory::new(parse_id(post_id)?, parse_id(category_id)?);
        self.links.add(link).await?;
        tracing::debug!(
            post_id = %link.post_id,
            category_id = %link.category_id,
            "Category attached"
        );
        Ok(link)
    }

    pub async fn detach(&self, post_id: &str, category_id: &str) -> Result<(), DomainError> {
        let link = PostCategory::new(parse_id(post_id)?, parse_id(category_id)?);
        let key = format!("{}/{}", link.post_id, link.category_id);
        self.links
            .remove(link)
            .await
            .map_err(|e| DomainError::from_keyed(e, "PostCategory", key))
    }
}
