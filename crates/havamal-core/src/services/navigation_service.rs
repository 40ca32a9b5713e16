//! Navigation tree manager.

use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use crate::domain::{
    CascadePolicy, DeletePolicy, LinkSource, NavigationItem, NavigationKind, NavigationLink,
    NavigationTree, parse_id, parse_optional_id,
};
use crate::error::DomainError;
use crate::ports::NavigationRepository;

/// Flat input shape for a navigation entry. Blank or missing ids mean "none".
#[derive(Debug, Clone, Deserialize)]
pub struct NavigationInput {
    pub label: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub kind: NavigationKind,
    #[serde(default, rename = "order")]
    pub sort_order: i32,
    pub parent_id: Option<String>,
    #[serde(default)]
    pub link_source: LinkSource,
    pub category_id: Option<String>,
    pub post_id: Option<String>,
}

impl NavigationInput {
    fn parse(&self) -> Result<(Option<Uuid>, NavigationLink), DomainError> {
        let optional = |raw: &Option<String>| parse_optional_id(raw.as_deref().unwrap_or(""));

        let parent_id = optional(&self.parent_id)?;
        let category_id = optional(&self.category_id)?;
        let post_id = optional(&self.post_id)?;
        let link = NavigationLink::from_parts(self.link_source, category_id, post_id)?;

        Ok((parent_id, link))
    }
}

pub struct NavigationService {
    items: Arc<dyn NavigationRepository>,
    policy: CascadePolicy,
}

impl NavigationService {
    pub fn new(items: Arc<dyn NavigationRepository>, policy: CascadePolicy) -> Self {
        Self { items, policy }
    }

    pub async fn create(&self, input: NavigationInput) -> Result<NavigationItem, DomainError> {
        let (parent_id, link) = input.parse()?;

        // A fresh id cannot appear in any existing chain, so only existence matters.
        if let Some(parent) = parent_id {
            if self.items.find_by_id(parent).await?.is_none() {
                return Err(DomainError::ParentNotFound(parent));
            }
        }

        let item = self
            .items
            .insert(NavigationItem {
                id: Uuid::new_v4(),
                label: input.label,
                slug: input.slug,
                kind: input.kind,
                sort_order: input.sort_order,
                parent_id,
                link,
            })
            .await?;

        tracing::info!(navigation_id = %item.id, slug = %item.slug, "Navigation item created");
        Ok(item)
    }

    /// Replace every mutable field of an item, rejecting parents that would form a loop.
    pub async fn update(
        &self,
        id: &str,
        input: NavigationInput,
    ) -> Result<NavigationItem, DomainError> {
        let id = parse_id(id)?;
        let (parent_id, link) = input.parse()?;

        let tree = self.tree().await?;
        if !tree.contains(id) {
            return Err(DomainError::not_found("NavigationItem", id));
        }
        if let Some(parent) = parent_id {
            if tree.creates_cycle(id, parent) {
                return Err(DomainError::CycleDetected { node: id, parent });
            }
            if !tree.contains(parent) {
                return Err(DomainError::ParentNotFound(parent));
            }
        }

        let item = NavigationItem {
            id,
            label: input.label,
            slug: input.slug,
            kind: input.kind,
            sort_order: input.sort_order,
            parent_id,
            link,
        };

        self.items
            .update(item)
            .await
            .map_err(|e| DomainError::from_keyed(e, "NavigationItem", id))
    }

    /// Delete an item. What happens to its children follows `navigation_children`.
    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let id = parse_id(id)?;

        match self.policy.navigation_children {
            DeletePolicy::Orphan => {}
            policy => {
                let tree = self.tree().await?;
                if !tree.contains(id) {
                    return Err(DomainError::not_found("NavigationItem", id));
                }

                let descendants = tree.descendants(id);
                if policy == DeletePolicy::Restrict && !descendants.is_empty() {
                    return Err(DomainError::HasDependents {
                        entity_type: "NavigationItem",
                        id,
                    });
                }
                for child in &descendants {
                    self.items.delete(*child).await?;
                }
                if !descendants.is_empty() {
                    tracing::debug!(
                        navigation_id = %id,
                        removed = descendants.len(),
                        "Deleted subtree"
                    );
                }
            }
        }

        self.items
            .delete(id)
            .await
            .map_err(|e| DomainError::from_keyed(e, "NavigationItem", id))?;
        tracing::info!(navigation_id = %id, "Navigation item deleted");
        Ok(())
    }

    /// Flat list in menu order.
    pub async fn list(&self) -> Result<Vec<NavigationItem>, DomainError> {
        let mut items = self.items.find_all().await?;
        items.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.label.cmp(&b.label)));
        Ok(items)
    }

    pub async fn get(&self, id: &str) -> Result<NavigationItem, DomainError> {
        let id = parse_id(id)?;
        self.items
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("NavigationItem", id))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<NavigationItem, DomainError> {
        self.items
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("NavigationItem", slug))
    }

    /// Arena over every stored item.
    pub async fn tree(&self) -> Result<NavigationTree, DomainError> {
        Ok(NavigationTree::new(self.items.find_all().await?))
    }
}
